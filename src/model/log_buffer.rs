//! Bounded, display-ready log of a job
//!
//! Lines carry a typed kind; the `[INFO]`/`[ERROR]`/`[SUCCESS]` prefixes are
//! only produced when a line is rendered.

use std::collections::VecDeque;
use std::fmt;

/// Maximum number of lines kept for one job
pub const MAX_LOG_LINES: usize = 1000;

/// Classification of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Info,
    Error,
    Success,
    /// Unprefixed process output
    Raw,
}

impl LineKind {
    /// Display prefix for this kind
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            LineKind::Info => Some("[INFO]"),
            LineKind::Error => Some("[ERROR]"),
            LineKind::Success => Some("[SUCCESS]"),
            LineKind::Raw => None,
        }
    }
}

/// One line in the job log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub kind: LineKind,
    pub text: String,
}

impl LogLine {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(LineKind::Info, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(LineKind::Error, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(LineKind::Success, text)
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Self::new(LineKind::Raw, text)
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.prefix() {
            Some(prefix) => write!(f, "{} {}", prefix, self.text),
            None => f.write_str(&self.text),
        }
    }
}

/// FIFO log with a fixed capacity
///
/// Appends evict the oldest lines once the capacity is exceeded; a
/// coalescing replace never grows the buffer and so never evicts.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: VecDeque<LogLine>,
    capacity: usize,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::with_capacity(MAX_LOG_LINES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(MAX_LOG_LINES)),
            capacity: capacity.max(1),
        }
    }

    /// Add a line as the newest entry
    pub fn append(&mut self, line: LogLine) {
        self.lines.push_back(line);
        while self.lines.len() > self.capacity {
            self.lines.pop_front();
        }
    }

    /// Replace the newest entry when `overwrite` is set, otherwise append
    pub fn coalesce_or_append(&mut self, line: LogLine, overwrite: bool) {
        match self.lines.back_mut() {
            Some(last) if overwrite => *last = line,
            _ => self.append(line),
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }

    pub fn first(&self) -> Option<&LogLine> {
        self.lines.front()
    }

    pub fn last(&self) -> Option<&LogLine> {
        self.lines.back()
    }

    /// Number of lines of the given kind
    pub fn count_kind(&self, kind: LineKind) -> usize {
        self.lines.iter().filter(|l| l.kind == kind).count()
    }
}
