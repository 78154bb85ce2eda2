//! Full probe output or error text for one tool

use crate::action::Action;
use crate::component::Component;
use crate::components::wizard::tool_badge;
use crate::model::tool_status::{ToolKind, ToolStatus};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

#[derive(Default)]
pub struct ToolDetailsDialog {
    pub scroll_offset: usize,
}

impl Component for ToolDetailsDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Char('r') => Some(Action::CheckTools),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs the tool status, so we use draw_with_status
        Ok(())
    }
}

impl ToolDetailsDialog {
    pub fn draw_with_status(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        kind: ToolKind,
        status: &ToolStatus,
    ) -> Result<()> {
        let margin = 4;
        let dialog_area = Rect::new(
            area.x + margin,
            area.y + margin / 2,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin),
        );
        frame.render_widget(Clear, dialog_area);

        let (badge, color) = tool_badge(status);
        let mut content = vec![
            Line::from(Span::styled(
                badge,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        let body = match status {
            ToolStatus::Loading => "Check in progress...",
            ToolStatus::Ready { full_output, .. } => full_output.as_str(),
            ToolStatus::Failed { error } => error.as_str(),
        };
        content.extend(body.lines().map(|l| Line::from(l.to_string())));
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            "r  Re-check   j/k  Scroll   Esc  Close",
            Style::default().fg(Color::DarkGray),
        )));

        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;
        let max_scroll = total.saturating_sub(visible_height);
        self.scroll_offset = self.scroll_offset.min(max_scroll);

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", kind.label()))
                    .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(color)),
            )
            .scroll((self.scroll_offset as u16, 0));
        frame.render_widget(paragraph, dialog_area);

        if total > visible_height {
            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(self.scroll_offset);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                dialog_area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }
        Ok(())
    }
}
