//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod confirm_dialog;
pub mod directory_prompt;
pub mod help_dialog;
pub mod layout;
pub mod log_view;
pub mod preset_menu;
pub mod quit_dialog;
pub mod tool_details;
pub mod wizard;

pub use confirm_dialog::ConfirmDialog;
pub use directory_prompt::DirectoryPrompt;
pub use help_dialog::HelpDialog;
pub use layout::centered_popup;
pub use log_view::LogView;
pub use preset_menu::PresetMenu;
pub use quit_dialog::QuitDialog;
pub use tool_details::ToolDetailsDialog;
pub use wizard::Wizard;
