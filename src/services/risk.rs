//! Pre-start risk evaluation

use crate::model::settings::{is_blank_path, JobSettings};
use crate::model::tool_status::ToolStatuses;

pub const RISK_DOWNLOAD_TOOL: &str = "yt-dlp tool is not available or has errors";
pub const RISK_TRANSCODE_TOOL: &str = "FFmpeg/FFprobe tools are not available or have errors";
pub const RISK_OUTPUT_DIRECTORY: &str = "Output directory is not specified";
pub const RISK_NO_URLS: &str = "No download URLs provided";

/// Known precondition violations, in fixed display order
///
/// A tool that is still loading is not a risk. An empty list only means none
/// of the checked preconditions failed.
pub fn evaluate(statuses: &ToolStatuses, settings: &JobSettings) -> Vec<String> {
    let mut risks = Vec::new();

    if statuses.download.error().is_some() {
        risks.push(RISK_DOWNLOAD_TOOL.to_string());
    }
    if statuses.transcode.error().is_some() {
        risks.push(RISK_TRANSCODE_TOOL.to_string());
    }
    if settings
        .output_directory
        .as_deref()
        .map_or(true, is_blank_path)
    {
        risks.push(RISK_OUTPUT_DIRECTORY.to_string());
    }
    if settings.urls_blank() {
        risks.push(RISK_NO_URLS.to_string());
    }

    risks
}
