//! Model layer - job state shared by services, orchestrator and components
//!
//! - `JobSettings` - what the user configured
//! - `ToolStatuses` - availability of yt-dlp and FFmpeg
//! - `LogBuffer` - bounded, display-ready job log
//! - `JobEvent` / `JobPhase` - process events and lifecycle
//! - `ModalStack` - modal overlay management

pub mod job;
pub mod log_buffer;
pub mod modal;
pub mod presets;
pub mod settings;
pub mod tool_status;
