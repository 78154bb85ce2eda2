//! Action enum - All possible application actions
//!
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::modal::DirectoryPurpose;
use crate::model::tool_status::ToolKind;
use std::fmt;
use std::path::PathBuf;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for polling background work
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Wizard
    // ─────────────────────────────────────────────────────────────────────────
    NextStep,
    PrevStep,
    /// URL or custom option text was edited
    SettingsEdited,
    ToggleSelectionMode,
    OpenPresetMenu,
    OpenDirectoryPrompt(DirectoryPurpose),
    /// Directory prompt accepted; an empty path clears the setting
    SetDirectory(DirectoryPurpose, PathBuf),
    CheckTools,
    OpenToolDetails(ToolKind),

    // ─────────────────────────────────────────────────────────────────────────
    // Job
    // ─────────────────────────────────────────────────────────────────────────
    RequestStart,
    ToggleAcknowledge,
    ResetJob,

    // ─────────────────────────────────────────────────────────────────────────
    // Scrolling
    // ─────────────────────────────────────────────────────────────────────────
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    /// Jump to the newest line and follow new output
    ScrollToBottom,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    OpenQuitDialog,
    OpenHelp,
    CloseModal,
    ConfirmModal,
    ModalUp,
    ModalDown,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NextStep => write!(f, "NextStep"),
            Action::PrevStep => write!(f, "PrevStep"),
            Action::SettingsEdited => write!(f, "SettingsEdited"),
            Action::ToggleSelectionMode => write!(f, "ToggleSelectionMode"),
            Action::OpenPresetMenu => write!(f, "OpenPresetMenu"),
            Action::OpenDirectoryPrompt(purpose) => write!(f, "OpenDirectoryPrompt({:?})", purpose),
            Action::SetDirectory(purpose, path) => {
                write!(f, "SetDirectory({:?}, {})", purpose, path.display())
            }
            Action::CheckTools => write!(f, "CheckTools"),
            Action::OpenToolDetails(kind) => write!(f, "OpenToolDetails({})", kind.label()),
            Action::RequestStart => write!(f, "RequestStart"),
            Action::ToggleAcknowledge => write!(f, "ToggleAcknowledge"),
            Action::ResetJob => write!(f, "ResetJob"),
            Action::ScrollUp => write!(f, "ScrollUp"),
            Action::ScrollDown => write!(f, "ScrollDown"),
            Action::PageUp => write!(f, "PageUp"),
            Action::PageDown => write!(f, "PageDown"),
            Action::ScrollToBottom => write!(f, "ScrollToBottom"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ConfirmModal => write!(f, "ConfirmModal"),
            Action::ModalUp => write!(f, "ModalUp"),
            Action::ModalDown => write!(f, "ModalDown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_display() {
        assert_eq!(Action::Tick.to_string(), "Tick");
        assert_eq!(Action::Resize(80, 24).to_string(), "Resize(80, 24)");
        assert_eq!(
            Action::OpenToolDetails(ToolKind::Transcode).to_string(),
            "OpenToolDetails(FFmpeg FFprobe)"
        );
        assert_eq!(
            Action::SetDirectory(DirectoryPurpose::Output, PathBuf::from("/out")).to_string(),
            "SetDirectory(Output, /out)"
        );
    }
}
