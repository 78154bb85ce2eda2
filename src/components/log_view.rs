//! Job log view
//!
//! Shows the log of the running or finished job. While following, the view
//! stays pinned to the newest line; scrolling up stops following until the
//! user jumps back to the bottom.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::calculate_screen_layout;
use crate::model::job::{JobOutcome, JobPhase};
use crate::model::log_buffer::{LineKind, LogBuffer, LogLine};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use std::time::Duration;

const PAGE: usize = 20;

pub struct LogView {
    pub scroll_offset: usize,
    pub follow: bool,
    /// Largest valid offset at the last draw
    max_scroll: usize,
}

impl Default for LogView {
    fn default() -> Self {
        Self {
            scroll_offset: 0,
            follow: true,
            max_scroll: 0,
        }
    }
}

impl LogView {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn scroll_up(&mut self, lines: usize) {
        if self.follow {
            self.scroll_offset = self.max_scroll;
        }
        self.follow = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    fn scroll_down(&mut self, lines: usize) {
        if self.follow {
            return;
        }
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
        if self.scroll_offset >= self.max_scroll {
            self.follow = true;
        }
    }
}

impl Component for LogView {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::Char('G') | KeyCode::End => Some(Action::ScrollToBottom),
            KeyCode::Char('r') => Some(Action::ResetJob),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let action = match mouse.kind {
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::ScrollUp => self.scroll_up(1),
            Action::ScrollDown => self.scroll_down(1),
            Action::PageUp => self.scroll_up(PAGE),
            Action::PageDown => self.scroll_down(PAGE),
            Action::ScrollToBottom => self.follow = true,
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // This needs the job log, so we use draw_with_log
        Ok(())
    }
}

impl LogView {
    pub fn draw_with_log(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        log: &LogBuffer,
        phase: JobPhase,
        elapsed: Option<Duration>,
        status_message: Option<&str>,
    ) -> Result<()> {
        frame.render_widget(Clear, area);
        let layout = calculate_screen_layout(area, status_message.is_some());

        let (status_text, status_color) = status_indicator(phase);
        let mut title_spans = vec![
            Span::styled(
                " ytdlp-tui ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {} ", status_text),
                Style::default()
                    .fg(status_color)
                    .add_modifier(Modifier::BOLD),
            ),
        ];
        if let Some(elapsed) = elapsed {
            title_spans.push(Span::styled(
                format!(" {}", format_elapsed(elapsed)),
                Style::default().fg(Color::DarkGray),
            ));
        }
        let title = Paragraph::new(Line::from(title_spans))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, layout.title);

        let content_area = layout.body;
        let content: Vec<Line> = log.iter().map(styled_line).collect();
        let total = content.len();
        let visible_height = content_area.height.saturating_sub(2) as usize;
        self.max_scroll = total.saturating_sub(visible_height);
        if self.follow {
            self.scroll_offset = self.max_scroll;
        } else {
            self.scroll_offset = self.scroll_offset.min(self.max_scroll);
        }

        let follow_marker = if self.follow { "" } else { " [paused]" };
        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(status_color))
                    .title(format!(" Log ({} lines){} ", total, follow_marker))
                    .title_style(
                        Style::default()
                            .fg(status_color)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .scroll((self.scroll_offset as u16, 0));
        frame.render_widget(paragraph, content_area);

        if total > visible_height {
            let mut scrollbar_state = ScrollbarState::new(self.max_scroll).position(self.scroll_offset);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                content_area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        if let (Some(area), Some(message)) = (layout.status, status_message) {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {}", message),
                    Style::default().fg(Color::Yellow),
                )),
                area,
            );
        }

        let reset_style = if phase.is_running() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        };
        let help = Paragraph::new(Line::from(vec![
            Span::styled(" r ", reset_style),
            Span::styled("New job  ", reset_style),
            Span::styled(
                " j/k ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Scroll  "),
            Span::styled(
                " G ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Follow  "),
            Span::styled(
                " q ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Quit"),
        ]))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, layout.help);

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helper functions
// ─────────────────────────────────────────────────────────────────────────────

fn status_indicator(phase: JobPhase) -> (&'static str, Color) {
    match phase {
        JobPhase::Running => ("⏳ RUNNING", Color::Yellow),
        JobPhase::Terminal(JobOutcome::Success) => ("✓ COMPLETED", Color::Green),
        JobPhase::Terminal(JobOutcome::Failure) => ("✗ FAILED", Color::Red),
        JobPhase::Idle | JobPhase::Confirming { .. } => ("IDLE", Color::DarkGray),
    }
}

fn styled_line(line: &LogLine) -> Line<'static> {
    let color = match line.kind {
        LineKind::Info => Color::Cyan,
        LineKind::Error => Color::Red,
        LineKind::Success => Color::Green,
        LineKind::Raw => return Line::from(line.text.clone()),
    };
    Line::from(Span::styled(line.to_string(), Style::default().fg(color)))
}

/// `mm:ss`, or `h:mm:ss` past an hour
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let (h, m, s) = (secs / 3600, (secs / 60) % 60, secs % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "00:00");
        assert_eq!(format_elapsed(Duration::from_secs(75)), "01:15");
        assert_eq!(format_elapsed(Duration::from_secs(3725)), "1:02:05");
    }

    #[test]
    fn test_scrolling_up_pauses_follow() {
        let mut view = LogView {
            max_scroll: 50,
            ..Default::default()
        };
        view.update(Action::ScrollUp).unwrap();
        assert!(!view.follow);
        assert_eq!(view.scroll_offset, 49);

        view.update(Action::PageUp).unwrap();
        assert_eq!(view.scroll_offset, 29);
    }

    #[test]
    fn test_scrolling_to_bottom_resumes_follow() {
        let mut view = LogView {
            max_scroll: 10,
            ..Default::default()
        };
        view.update(Action::PageUp).unwrap();
        assert_eq!(view.scroll_offset, 0);
        view.update(Action::PageDown).unwrap();
        assert!(view.follow);

        view.update(Action::ScrollUp).unwrap();
        assert!(!view.follow);
        view.update(Action::ScrollToBottom).unwrap();
        assert!(view.follow);
    }

    #[test]
    fn test_line_colours_follow_kind() {
        let error = styled_line(&LogLine::error("boom"));
        assert_eq!(error.spans[0].style.fg, Some(Color::Red));
        assert_eq!(error.spans[0].content, "[ERROR] boom");
        let raw = styled_line(&LogLine::raw("[download] 5%"));
        assert_eq!(raw.spans[0].style.fg, None);
    }

    #[test]
    fn test_status_indicator_per_phase() {
        assert_eq!(status_indicator(JobPhase::Running).1, Color::Yellow);
        assert_eq!(
            status_indicator(JobPhase::Terminal(JobOutcome::Failure)).0,
            "✗ FAILED"
        );
    }
}
