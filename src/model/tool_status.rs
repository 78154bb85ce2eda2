//! Availability of the two external tools

/// Which external tool a status belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// yt-dlp
    Download,
    /// ffmpeg + ffprobe
    Transcode,
}

impl ToolKind {
    pub fn label(&self) -> &'static str {
        match self {
            ToolKind::Download => "yt-dlp",
            ToolKind::Transcode => "FFmpeg FFprobe",
        }
    }
}

/// Result of the most recent check of one tool
///
/// Loading, success and failure are mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ToolStatus {
    #[default]
    Loading,
    Ready {
        version: String,
        full_output: String,
    },
    Failed {
        error: String,
    },
}

impl ToolStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, ToolStatus::Loading)
    }

    /// Short version text, empty unless the check succeeded
    pub fn version(&self) -> &str {
        match self {
            ToolStatus::Ready { version, .. } => version,
            _ => "",
        }
    }

    /// Raw probe output, empty unless the check succeeded
    pub fn full_output(&self) -> &str {
        match self {
            ToolStatus::Ready { full_output, .. } => full_output,
            _ => "",
        }
    }

    /// Recorded failure, if any
    pub fn error(&self) -> Option<&str> {
        match self {
            ToolStatus::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// The pair of statuses the risk evaluator and the Start step read
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolStatuses {
    pub download: ToolStatus,
    pub transcode: ToolStatus,
}

impl ToolStatuses {
    pub fn get(&self, kind: ToolKind) -> &ToolStatus {
        match kind {
            ToolKind::Download => &self.download,
            ToolKind::Transcode => &self.transcode,
        }
    }

    pub fn set(&mut self, kind: ToolKind, status: ToolStatus) {
        match kind {
            ToolKind::Download => self.download = status,
            ToolKind::Transcode => self.transcode = status,
        }
    }

    pub fn any_loading(&self) -> bool {
        self.download.is_loading() || self.transcode.is_loading()
    }
}
