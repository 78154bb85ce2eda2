//! Job settings collected by the wizard

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How download options are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Let the download tool pick formats
    #[default]
    Automatic,
    /// Append user supplied options verbatim
    Custom,
}

impl SelectionMode {
    pub fn label(&self) -> &'static str {
        match self {
            SelectionMode::Automatic => "Automatic",
            SelectionMode::Custom => "Custom",
        }
    }

    pub fn toggled(&self) -> SelectionMode {
        match self {
            SelectionMode::Automatic => SelectionMode::Custom,
            SelectionMode::Custom => SelectionMode::Automatic,
        }
    }
}

/// Everything the user configured for one job
///
/// Read-only to the core; a clone is taken as a snapshot when a job starts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobSettings {
    /// URL input, one entry per line as typed
    pub url_list: Vec<String>,
    pub selection_mode: SelectionMode,
    pub custom_options: String,
    /// Directory holding ffmpeg/ffprobe, PATH lookup when unset
    pub tool_directory: Option<PathBuf>,
    pub output_directory: Option<PathBuf>,
}

impl JobSettings {
    /// The URL input as newline separated text
    pub fn url_text(&self) -> String {
        self.url_list.join("\n")
    }

    /// Replace the URL input from raw text
    pub fn set_url_text(&mut self, text: &str) {
        self.url_list = text.lines().map(str::to_string).collect();
    }

    /// True when every URL line is blank
    pub fn urls_blank(&self) -> bool {
        self.url_list.iter().all(|line| line.trim().is_empty())
    }

    /// Number of non-blank URL lines
    pub fn url_count(&self) -> usize {
        self.url_list
            .iter()
            .filter(|line| !line.trim().is_empty())
            .count()
    }

    pub fn set_output_directory(&mut self, dir: Option<PathBuf>) {
        self.output_directory = dir.filter(|d| !is_blank_path(d));
    }

    pub fn set_tool_directory(&mut self, dir: Option<PathBuf>) {
        self.tool_directory = dir.filter(|d| !is_blank_path(d));
    }

    /// Custom options that will actually be passed, if any
    pub fn effective_custom_options(&self) -> Option<&str> {
        let trimmed = self.custom_options.trim();
        if self.selection_mode == SelectionMode::Custom && !trimmed.is_empty() {
            Some(trimmed)
        } else {
            None
        }
    }
}

/// A path whose textual form is empty or whitespace
pub fn is_blank_path(path: &std::path::Path) -> bool {
    path.to_string_lossy().trim().is_empty()
}
