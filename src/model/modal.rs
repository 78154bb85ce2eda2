//! Modal stack for managing overlays
//!
//! Only the top modal receives input; modals are drawn bottom to top.

use crate::model::tool_status::ToolKind;

/// What a directory prompt will set when confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryPurpose {
    /// Where downloads are saved
    Output,
    /// Where ffmpeg and ffprobe live
    Transcode,
}

impl DirectoryPurpose {
    pub fn title(&self) -> &'static str {
        match self {
            DirectoryPurpose::Output => "Select Output Directory",
            DirectoryPurpose::Transcode => "Select FFmpeg Directory",
        }
    }
}

/// Represents a modal overlay that can be displayed on top of the main UI
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Quit confirmation dialog
    QuitConfirm,
    /// Start confirmation with the risk list
    StartConfirm,
    /// Free text directory entry
    DirectoryPrompt { purpose: DirectoryPurpose },
    /// Option preset list
    PresetMenu { selected_index: usize },
    /// Full probe output or error of one tool
    ToolDetails { kind: ToolKind },
    /// Help dialog showing all keyboard shortcuts
    Help,
}

/// A stack of modal overlays
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Modal> {
        self.stack.last_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Iterate from bottom to top
    pub fn iter(&self) -> impl Iterator<Item = &Modal> {
        self.stack.iter()
    }

    /// Drop every modal matching the predicate
    pub fn remove_where(&mut self, predicate: impl Fn(&Modal) -> bool) {
        self.stack.retain(|m| !predicate(m));
    }
}
