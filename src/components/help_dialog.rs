//! Help dialog component
//!
//! Lists the keys of every wizard step, the start confirmation and the log.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Help dialog showing all keyboard shortcuts
#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::F(1) => {
                Some(Action::CloseModal)
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        // Clear the area
        frame.render_widget(Clear, area);

        let margin = 4;
        let dialog_area = Rect::new(
            margin,
            margin,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin * 2),
        );

        let content = build_help_content();
        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;

        // Clamp scroll offset
        let max_scroll = total.saturating_sub(visible_height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        let paragraph = Paragraph::new(content.clone())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Keyboard Shortcuts ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, dialog_area);

        // Render scrollbar if content exceeds visible area
        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll_offset);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                dialog_area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

/// Build the help content with all keyboard shortcuts
fn build_help_content() -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    // Helper to add a section header
    let add_section = |lines: &mut Vec<Line<'static>>, title: &str| {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {} ", title),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", "─".repeat(title.len() + 2)),
            Style::default().fg(Color::DarkGray),
        )));
    };

    // Helper to add a shortcut line
    let add_shortcut = |lines: &mut Vec<Line<'static>>, key: &str, description: &str| {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:12}", key),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(description.to_string(), Style::default().fg(Color::White)),
        ]));
    };

    add_section(&mut lines, "Anywhere");
    add_shortcut(&mut lines, "F1", "Show this help");
    add_shortcut(&mut lines, "Ctrl+c", "Quit (asks first)");

    add_section(&mut lines, "Step 1: Enter URLs");
    add_shortcut(&mut lines, "Type / Paste", "Edit the URL list, one per line");
    add_shortcut(&mut lines, "Enter", "New line");
    add_shortcut(&mut lines, "Ctrl+u", "Clear the list");
    add_shortcut(&mut lines, "Tab", "Next step");
    add_shortcut(&mut lines, "Esc", "Quit");

    add_section(&mut lines, "Step 2: Download Settings");
    add_shortcut(&mut lines, "Space / ←→", "Toggle Automatic / Custom");
    add_shortcut(&mut lines, "↑ / ↓", "Switch between mode and options");
    add_shortcut(&mut lines, "Ctrl+p", "Append an option preset");
    add_shortcut(&mut lines, "Tab", "Next step");
    add_shortcut(&mut lines, "Esc", "Previous step");

    add_section(&mut lines, "Step 3: Start");
    add_shortcut(&mut lines, "Enter / s", "Start the download");
    add_shortcut(&mut lines, "o", "Choose output directory");
    add_shortcut(&mut lines, "f", "Choose FFmpeg directory");
    add_shortcut(&mut lines, "r", "Re-check tools");
    add_shortcut(&mut lines, "1 / 2", "yt-dlp / FFmpeg details");
    add_shortcut(&mut lines, "Esc", "Previous step");

    add_section(&mut lines, "Start Confirmation");
    add_shortcut(&mut lines, "Space", "Acknowledge risks");
    add_shortcut(&mut lines, "Enter / y", "Start");
    add_shortcut(&mut lines, "Esc / n", "Cancel");

    add_section(&mut lines, "Log");
    add_shortcut(&mut lines, "j / ↓", "Scroll down");
    add_shortcut(&mut lines, "k / ↑", "Scroll up");
    add_shortcut(&mut lines, "PgUp / PgDn", "Scroll one page");
    add_shortcut(&mut lines, "G / End", "Follow new output");
    add_shortcut(&mut lines, "r", "New job (once finished)");
    add_shortcut(&mut lines, "q", "Quit");

    // Footer
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press q, Esc, F1 or ? to close",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_covers_every_screen() {
        let text: Vec<String> = build_help_content()
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        for section in ["Step 1", "Step 2", "Step 3", "Start Confirmation", "Log"] {
            assert!(text.iter().any(|l| l.contains(section)), "{}", section);
        }
    }

    #[test]
    fn test_scroll_keys() {
        let mut dialog = HelpDialog::default();
        dialog.handle_key_event(KeyEvent::from(KeyCode::PageDown)).unwrap();
        assert_eq!(dialog.scroll_offset, 10);
        assert_eq!(
            dialog.handle_key_event(KeyEvent::from(KeyCode::F(1))).unwrap(),
            Some(Action::CloseModal)
        );
    }
}
