//! Start confirmation dialog
//!
//! Lists the risks of starting now. With risks present, the user has to tick
//! the acknowledgement before Start is accepted.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

#[derive(Default)]
pub struct ConfirmDialog;

impl Component for ConfirmDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char(' ') | KeyCode::Char('a') => Some(Action::ToggleAcknowledge),
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::ConfirmModal),
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Risks live in the orchestrator, so we use draw_with_risks
        Ok(())
    }
}

impl ConfirmDialog {
    pub fn draw_with_risks(
        &self,
        frame: &mut Frame,
        area: Rect,
        risks: &[String],
        acknowledged: bool,
        can_confirm: bool,
    ) -> Result<()> {
        let height = (risks.len() as u16).saturating_add(if risks.is_empty() { 8 } else { 10 });
        let popup_area = centered_popup(area, 64, height);
        frame.render_widget(Clear, popup_area);

        let mut content = vec![Line::from("")];
        let border_color = if risks.is_empty() {
            content.push(Line::from(Span::styled(
                "All checks passed. Start the download?",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )));
            Color::Green
        } else {
            content.push(Line::from(Span::styled(
                "Starting now may fail:",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )));
            content.push(Line::from(""));
            for risk in risks {
                content.push(Line::from(vec![
                    Span::styled("  ⚠ ", Style::default().fg(Color::Yellow)),
                    Span::raw(risk.clone()),
                ]));
            }
            content.push(Line::from(""));
            let checkbox = if acknowledged { "[x]" } else { "[ ]" };
            content.push(Line::from(vec![
                Span::styled(
                    format!("{} ", checkbox),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("I understand the risks and want to start anyway"),
            ]));
            Color::Yellow
        };

        content.push(Line::from(""));
        let start_style = if can_confirm {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut keys = vec![Span::styled(" Enter ", start_style), Span::styled("Start  ", start_style)];
        if !risks.is_empty() {
            keys.push(Span::styled(
                " Space ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
            keys.push(Span::raw("Acknowledge  "));
        }
        keys.push(Span::styled(
            " Esc ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
        keys.push(Span::raw("Cancel"));
        content.push(Line::from(keys));

        let paragraph = Paragraph::new(content)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color))
                    .title(" Start Download? ")
                    .title_style(
                        Style::default()
                            .fg(border_color)
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
    fn test_confirm_dialog_keys() {
        let mut dialog = ConfirmDialog;
        let key = |c| KeyEvent::from(c);
        assert_eq!(
            dialog.handle_key_event(key(KeyCode::Char(' '))).unwrap(),
            Some(Action::ToggleAcknowledge)
        );
        assert_eq!(
            dialog.handle_key_event(key(KeyCode::Enter)).unwrap(),
            Some(Action::ConfirmModal)
        );
        assert_eq!(
            dialog.handle_key_event(key(KeyCode::Esc)).unwrap(),
            Some(Action::CloseModal)
        );
        assert_eq!(dialog.handle_key_event(key(KeyCode::Char('x'))).unwrap(), None);
    }
}
