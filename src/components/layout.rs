//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Areas shared by the wizard and the log view
pub struct ScreenLayout {
    pub title: Rect,
    pub body: Rect,
    pub status: Option<Rect>,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = (area.width.saturating_sub(width)) / 2;
    let popup_y = (area.height.saturating_sub(height)) / 2;

    Rect::new(
        area.x + popup_x,
        area.y + popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Title bar, body, optional one-line status and a bordered help bar
pub fn calculate_screen_layout(area: Rect, has_status: bool) -> ScreenLayout {
    let mut constraints = vec![Constraint::Length(3), Constraint::Min(0)];
    if has_status {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(3));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    if has_status {
        ScreenLayout {
            title: chunks[0],
            body: chunks[1],
            status: Some(chunks[2]),
            help: chunks[3],
        }
    } else {
        ScreenLayout {
            title: chunks[0],
            body: chunks[1],
            status: None,
            help: chunks[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_popup_clamps_to_area() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_popup(area, 20, 4), Rect::new(10, 3, 20, 4));
        assert_eq!(centered_popup(area, 80, 20), Rect::new(0, 0, 40, 10));
    }

    #[test]
    fn test_screen_layout_with_status() {
        let layout = calculate_screen_layout(Rect::new(0, 0, 80, 24), true);
        assert_eq!(layout.title.height, 3);
        assert_eq!(layout.help.height, 3);
        assert_eq!(layout.status.map(|r| r.height), Some(1));
        assert_eq!(layout.body.height, 24 - 3 - 1 - 3);
    }

    #[test]
    fn test_screen_layout_without_status() {
        let layout = calculate_screen_layout(Rect::new(0, 0, 80, 24), false);
        assert!(layout.status.is_none());
        assert_eq!(layout.body.height, 24 - 6);
    }
}
