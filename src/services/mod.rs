//! External service interactions
//!
//! - yt-dlp command line construction and risk checks
//! - Tool availability probes and the yt-dlp updater
//! - URL list persistence
//! - Child process supervision and output splitting

pub mod batch_file;
pub mod command_line;
pub mod host;
pub mod output_stream;
pub mod risk;
pub mod supervisor;
pub mod tools;
pub mod updater;

pub use host::SystemHost;
pub use tools::{SystemToolProbe, ToolStatusMonitor};
