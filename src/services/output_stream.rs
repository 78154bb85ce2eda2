//! Splitting raw process output into display chunks
//!
//! yt-dlp redraws its progress line with a bare `\r`. A chunk that follows a
//! `\r` terminator replaces the previously shown line; a chunk that follows
//! `\n` starts a new one. `\r\n` is a single newline.

use chardetng::EncodingDetector;

/// One decoded piece of output, ready for the event channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputChunk {
    pub content: String,
    pub overwrite: bool,
}

/// Incremental splitter for one output stream
pub struct OutputSplitter {
    pending: Vec<u8>,
    detector: EncodingDetector,
    replace_next: bool,
    after_cr: bool,
}

impl Default for OutputSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSplitter {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            detector: EncodingDetector::new(),
            replace_next: false,
            after_cr: false,
        }
    }

    /// Consume a block of bytes, returning every chunk it completes
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<OutputChunk> {
        let mut chunks = Vec::new();

        for &byte in bytes {
            match byte {
                b'\n' if self.after_cr => {
                    // tail of a \r\n pair: the segment was already flushed
                    self.after_cr = false;
                    self.replace_next = false;
                }
                b'\n' => {
                    let segment = std::mem::take(&mut self.pending);
                    chunks.push(self.chunk(&segment));
                    self.replace_next = false;
                }
                b'\r' => {
                    self.after_cr = true;
                    if self.pending.is_empty() {
                        continue;
                    }
                    let segment = std::mem::take(&mut self.pending);
                    chunks.push(self.chunk(&segment));
                    self.replace_next = true;
                }
                _ => {
                    self.after_cr = false;
                    self.pending.push(byte);
                }
            }
        }

        chunks
    }

    /// Flush unterminated trailing output at end of stream
    pub fn finish(&mut self) -> Option<OutputChunk> {
        if self.pending.is_empty() {
            return None;
        }
        let segment = std::mem::take(&mut self.pending);
        Some(self.chunk(&segment))
    }

    fn chunk(&mut self, segment: &[u8]) -> OutputChunk {
        OutputChunk {
            content: self.decode(segment),
            overwrite: self.replace_next,
        }
    }

    fn decode(&mut self, segment: &[u8]) -> String {
        self.detector.feed(segment, false);
        let encoding = self.detector.guess(None, true);
        let (text, _, had_errors) = encoding.decode(segment);
        if had_errors {
            String::from_utf8_lossy(segment).into_owned()
        } else {
            text.into_owned()
        }
    }
}
