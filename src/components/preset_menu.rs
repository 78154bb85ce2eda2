//! Option preset picker for custom mode

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::presets::all_presets;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub struct PresetMenu {
    pub selected_index: usize,
    presets: Vec<(&'static str, &'static str)>,
}

impl Default for PresetMenu {
    fn default() -> Self {
        Self {
            selected_index: 0,
            presets: all_presets(),
        }
    }
}

impl PresetMenu {
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn selected(&self) -> Option<&'static str> {
        self.presets.get(self.selected_index).map(|(_, opt)| *opt)
    }
}

impl Component for PresetMenu {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ModalDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ModalUp),
            KeyCode::Enter => Some(Action::ConfirmModal),
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::ModalUp => {
                self.selected_index = self.selected_index.saturating_sub(1);
            }
            Action::ModalDown => {
                if self.selected_index + 1 < self.presets.len() {
                    self.selected_index += 1;
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let width = area.width.saturating_sub(8).min(110);
        let height = area.height.saturating_sub(4);
        let popup_area = centered_popup(area, width, height);
        frame.render_widget(Clear, popup_area);

        let mut lines = Vec::new();
        let mut selected_line = 0;
        let mut group = "";
        for (i, (title, option)) in self.presets.iter().enumerate() {
            if *title != group {
                if !group.is_empty() {
                    lines.push(Line::from(""));
                }
                lines.push(Line::from(Span::styled(
                    format!(" {} ", title),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )));
                group = title;
            }
            let line = if i == self.selected_index {
                selected_line = lines.len();
                Line::from(Span::styled(
                    format!(" ▶ {}", option),
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(format!("   {}", option))
            };
            lines.push(line);
        }

        let visible = popup_area.height.saturating_sub(2) as usize;
        let scroll = (selected_line + 1).saturating_sub(visible);

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Option Presets (Enter to append) ")
                    .title_style(
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((scroll as u16, 0));
        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_is_clamped() {
        let mut menu = PresetMenu::default();
        menu.update(Action::ModalUp).unwrap();
        assert_eq!(menu.selected_index, 0);
        for _ in 0..menu.len() + 5 {
            menu.update(Action::ModalDown).unwrap();
        }
        assert_eq!(menu.selected_index, menu.len() - 1);
        assert_eq!(menu.selected(), Some("--continue"));
    }

    #[test]
    fn test_first_preset_is_default_format() {
        let menu = PresetMenu::default();
        assert!(menu.selected().is_some_and(|p| p.starts_with("-f \"bv*+ba/b\"")));
    }
}
