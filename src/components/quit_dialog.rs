//! Quit confirmation dialog component

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Quit confirmation dialog
#[derive(Default)]
pub struct QuitDialog {
    /// A download is still running and will stop being watched
    pub job_running: bool,
}

impl Component for QuitDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::ForceQuit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let height = if self.job_running { 9 } else { 7 };
        let popup_area = centered_popup(area, 46, height);

        frame.render_widget(Clear, popup_area);

        let mut content = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Are you sure you want to quit?",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
        ];
        if self.job_running {
            content.push(Line::from(Span::styled(
                "yt-dlp is still downloading.",
                Style::default().fg(Color::Red),
            )));
            content.push(Line::from(Span::styled(
                "Its output will no longer be shown.",
                Style::default().fg(Color::Red),
            )));
        }
        content.push(Line::from(""));
        content.push(Line::from(vec![
            Span::styled(
                " y ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Yes, quit  "),
            Span::styled(
                " n/Esc ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw("No, cancel"),
        ]));

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(" Quit? ")
                    .title_style(
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .alignment(ratatui::layout::Alignment::Center);

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_dialog_keys() {
        let mut dialog = QuitDialog::default();
        assert_eq!(
            dialog.handle_key_event(KeyEvent::from(KeyCode::Char('y'))).unwrap(),
            Some(Action::ForceQuit)
        );
        assert_eq!(
            dialog.handle_key_event(KeyEvent::from(KeyCode::Esc)).unwrap(),
            Some(Action::CloseModal)
        );
        assert_eq!(dialog.handle_key_event(KeyEvent::from(KeyCode::Char('x'))).unwrap(), None);
    }
}
