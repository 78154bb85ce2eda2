//! Routing of process events into the job log

use crate::model::job::{CompletionStatus, JobEvent, JobOutcome};
use crate::model::log_buffer::{LogBuffer, LogLine};
use regex::Regex;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::LazyLock;

/// Upper bound on events applied per drain so a chatty process cannot stall a frame
const MAX_EVENTS_PER_DRAIN: usize = 2000;

/// Matches CSI and OSC escape sequences
static ANSI_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)").unwrap()
});

/// Strip ANSI escape codes from a string
pub fn strip_ansi_codes(s: &str) -> String {
    ANSI_REGEX.replace_all(s, "").into_owned()
}

/// Receiving end of one job's event channel
///
/// Once closed (explicitly or by drop) the log is never touched again, and
/// the supervisor's readers stop at their next send.
#[derive(Debug)]
pub struct Subscription {
    receiver: Option<Receiver<JobEvent>>,
    /// A terminal event has already been routed
    terminated: bool,
}

/// Open a channel for one job
pub fn subscribe() -> (Subscription, Sender<JobEvent>) {
    let (tx, rx) = mpsc::channel();
    (
        Subscription {
            receiver: Some(rx),
            terminated: false,
        },
        tx,
    )
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.receiver.is_some()
    }

    /// Apply pending events to `buffer` in arrival order
    ///
    /// Returns the job's first terminal outcome, once, on the call that sees
    /// it. If every sender is gone before any terminal event the job is
    /// reported failed.
    pub fn drain(&mut self, buffer: &mut LogBuffer) -> Option<JobOutcome> {
        let receiver = self.receiver.as_ref()?;
        let mut outcome = None;
        let mut disconnected = false;

        for _ in 0..MAX_EVENTS_PER_DRAIN {
            match receiver.try_recv() {
                Ok(event) => {
                    let terminal = event.outcome();
                    route(event, buffer);
                    if terminal.is_some() && !self.terminated {
                        self.terminated = true;
                        outcome = terminal;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        if disconnected {
            if !self.terminated {
                self.terminated = true;
                log::warn!("event stream closed without a terminal event");
                buffer.append(LogLine::error("yt-dlp event stream closed unexpectedly."));
                outcome = Some(JobOutcome::Failure);
            }
            self.close();
        }

        outcome
    }

    /// Stop receiving; later events are discarded unseen
    pub fn close(&mut self) {
        if self.receiver.take().is_some() {
            log::debug!("job event subscription closed");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.close();
    }
}

fn route(event: JobEvent, buffer: &mut LogBuffer) {
    match event {
        JobEvent::Started => buffer.append(LogLine::info("yt-dlp process started...")),
        JobEvent::Stdout { content, overwrite } => {
            buffer.coalesce_or_append(LogLine::raw(strip_ansi_codes(&content)), overwrite)
        }
        JobEvent::Stderr { content, overwrite } => {
            buffer.coalesce_or_append(LogLine::error(strip_ansi_codes(&content)), overwrite)
        }
        JobEvent::Completed {
            status: CompletionStatus::Success,
        } => buffer.append(LogLine::success("yt-dlp process completed successfully.")),
        JobEvent::Completed {
            status: CompletionStatus::Failure,
        } => buffer.append(LogLine::error("yt-dlp process failed.")),
        JobEvent::Error { message } => buffer.append(LogLine::error(message)),
    }
}
