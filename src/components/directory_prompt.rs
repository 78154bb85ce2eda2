//! Directory entry prompt
//!
//! Accepts a path typed or pasted by the user. The path must name an existing
//! directory; an empty entry clears the setting. Cancelling changes nothing.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::modal::DirectoryPurpose;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::env;
use std::path::{Path, PathBuf};

pub struct DirectoryPrompt {
    pub purpose: DirectoryPurpose,
    pub input: String,
    pub error: Option<String>,
}

impl Default for DirectoryPrompt {
    fn default() -> Self {
        Self {
            purpose: DirectoryPurpose::Output,
            input: String::new(),
            error: None,
        }
    }
}

impl DirectoryPrompt {
    /// Prepare the prompt for `purpose`, pre-filled with the current value
    pub fn open(&mut self, purpose: DirectoryPurpose, current: Option<&Path>) {
        self.purpose = purpose;
        self.input = current
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.error = None;
    }

    fn submit(&mut self) -> Option<Action> {
        let trimmed = self.input.trim();
        if trimmed.is_empty() {
            return Some(Action::SetDirectory(self.purpose, PathBuf::new()));
        }
        match validate_directory(trimmed) {
            Ok(path) => Some(Action::SetDirectory(self.purpose, path)),
            Err(message) => {
                self.error = Some(message);
                None
            }
        }
    }
}

/// Resolve `~` and check that `input` is an existing directory
pub fn validate_directory(input: &str) -> Result<PathBuf, String> {
    let path = expand_home(input);
    if !path.exists() {
        return Err(format!("Path does not exist: {}", path.display()));
    }
    if !path.is_dir() {
        return Err("Path must be a directory".to_string());
    }
    Ok(path)
}

fn expand_home(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix('~') {
        if rest.is_empty() || rest.starts_with('/') {
            if let Ok(home) = env::var("HOME") {
                return PathBuf::from(format!("{}{}", home, rest));
            }
        }
    }
    PathBuf::from(input)
}

impl Component for DirectoryPrompt {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.clear();
                self.error = None;
                None
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.error = None;
                None
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(c);
                self.error = None;
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn handle_paste(&mut self, text: String) -> Result<Option<Action>> {
        self.input.push_str(text.trim_end_matches(['\r', '\n']));
        self.error = None;
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_area = centered_popup(area, 70, 10);
        frame.render_widget(Clear, popup_area);

        let hint = match self.purpose {
            DirectoryPurpose::Output => "Downloads are saved here.",
            DirectoryPurpose::Transcode => "Folder with ffmpeg and ffprobe; empty uses PATH.",
        };
        let mut content = vec![
            Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("{}_", self.input),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
        ];

        if let Some(ref error) = self.error {
            content.push(Line::from(Span::styled(
                format!("Error: {}", error),
                Style::default().fg(Color::Red),
            )));
        } else {
            content.push(Line::from(""));
        }
        content.push(Line::from(vec![
            Span::styled(
                " Enter ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Select  "),
            Span::styled(
                " Esc ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw("Cancel"),
        ]));

        let paragraph = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" {} ", self.purpose.title()))
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        );
        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(prompt: &mut DirectoryPrompt, text: &str) {
        for c in text.chars() {
            prompt.handle_key_event(KeyEvent::from(KeyCode::Char(c))).unwrap();
        }
    }

    fn enter(prompt: &mut DirectoryPrompt) -> Option<Action> {
        prompt.handle_key_event(KeyEvent::from(KeyCode::Enter)).unwrap()
    }

    #[test]
    fn test_existing_directory_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let mut prompt = DirectoryPrompt::default();
        prompt.open(DirectoryPurpose::Transcode, None);
        type_text(&mut prompt, &dir.path().display().to_string());
        assert_eq!(
            enter(&mut prompt),
            Some(Action::SetDirectory(
                DirectoryPurpose::Transcode,
                dir.path().to_path_buf()
            ))
        );
    }

    #[test]
    fn test_missing_path_and_file_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();

        let mut prompt = DirectoryPrompt::default();
        prompt.open(DirectoryPurpose::Output, Some(file.as_path()));
        assert_eq!(enter(&mut prompt), None);
        assert_eq!(prompt.error.as_deref(), Some("Path must be a directory"));

        prompt.open(DirectoryPurpose::Output, Some(dir.path().join("missing").as_path()));
        assert_eq!(enter(&mut prompt), None);
        assert!(prompt
            .error
            .as_deref()
            .is_some_and(|e| e.starts_with("Path does not exist")));

        // typing clears the error
        type_text(&mut prompt, "x");
        assert!(prompt.error.is_none());
    }

    #[test]
    fn test_empty_input_clears_and_escape_cancels() {
        let mut prompt = DirectoryPrompt::default();
        prompt.open(DirectoryPurpose::Output, Some(Path::new("/tmp")));
        assert_eq!(prompt.input, "/tmp");
        prompt
            .handle_key_event(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(
            enter(&mut prompt),
            Some(Action::SetDirectory(DirectoryPurpose::Output, PathBuf::new()))
        );
        assert_eq!(
            prompt.handle_key_event(KeyEvent::from(KeyCode::Esc)).unwrap(),
            Some(Action::CloseModal)
        );
    }

    #[test]
    fn test_paste_drops_trailing_newline() {
        let mut prompt = DirectoryPrompt::default();
        prompt.handle_paste("/srv/videos\n".to_string()).unwrap();
        assert_eq!(prompt.input, "/srv/videos");
    }
}
