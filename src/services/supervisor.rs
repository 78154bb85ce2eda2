//! Child process supervision for the download tool
//!
//! Starting a job spawns the binary directly (never through a shell) and
//! pushes every observation onto a [`JobEvent`] channel. Progress reaches the
//! caller only through that channel.

use crate::error::SetupError;
use crate::model::job::{CompletionStatus, JobEvent};
use crate::services::output_stream::OutputSplitter;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::Sender;
use std::thread;

const READ_BLOCK: usize = 4096;

/// Launches one program and reports on it
#[derive(Debug, Clone)]
pub struct ProcessSupervisor {
    program: PathBuf,
}

impl ProcessSupervisor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Spawn the program with `command_line` split by shell word rules
    ///
    /// Returns the child's pid once it exists. A `Started` event is sent
    /// first, then output chunks, then exactly one `Completed` or `Error`.
    pub fn start(&self, command_line: &str, events: Sender<JobEvent>) -> Result<u32, SetupError> {
        let args = shlex::split(command_line).ok_or_else(|| {
            log::error!("could not parse command line: {}", command_line);
            SetupError::CommandLine
        })?;
        log::info!("spawning {} with {:?}", self.program.display(), args);

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                log::error!("failed to spawn {}: {}", self.program.display(), e);
                SetupError::Spawn(e)
            })?;
        let pid = child.id();
        log::info!("download tool running as pid {}", pid);

        let _ = events.send(JobEvent::Started);

        let mut readers = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            let tx = events.clone();
            readers.push(thread::spawn(move || {
                pump(stdout, &tx, |content, overwrite| JobEvent::Stdout {
                    content,
                    overwrite,
                })
            }));
        }
        if let Some(stderr) = child.stderr.take() {
            let tx = events.clone();
            readers.push(thread::spawn(move || {
                pump(stderr, &tx, |content, overwrite| JobEvent::Stderr {
                    content,
                    overwrite,
                })
            }));
        }

        thread::spawn(move || {
            for reader in readers {
                let _ = reader.join();
            }
            let event = match child.wait() {
                Ok(status) => {
                    log::info!("download tool (pid {}) exited with {}", pid, status);
                    JobEvent::Completed {
                        status: if status.success() {
                            CompletionStatus::Success
                        } else {
                            CompletionStatus::Failure
                        },
                    }
                }
                Err(e) => {
                    log::error!("failed to wait for download tool: {}", e);
                    JobEvent::Error {
                        message: format!("Failed to wait for yt-dlp: {}", e),
                    }
                }
            };
            let _ = events.send(event);
        });

        Ok(pid)
    }
}

/// Forward one stream until EOF or until nobody is listening
fn pump<R: Read>(mut reader: R, tx: &Sender<JobEvent>, wrap: fn(String, bool) -> JobEvent) {
    let mut splitter = OutputSplitter::new();
    let mut buffer = [0u8; READ_BLOCK];

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                log::warn!("output stream read failed: {}", e);
                break;
            }
        };
        for chunk in splitter.feed(&buffer[..n]) {
            if tx.send(wrap(chunk.content, chunk.overwrite)).is_err() {
                log::debug!("event receiver gone, dropping output stream");
                return;
            }
        }
    }

    if let Some(chunk) = splitter.finish() {
        let _ = tx.send(wrap(chunk.content, chunk.overwrite));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    fn collect(rx: &mpsc::Receiver<JobEvent>) -> Vec<JobEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.recv_timeout(Duration::from_secs(10)) {
            let done = event.outcome().is_some();
            events.push(event);
            if done {
                break;
            }
        }
        events
    }

    #[test]
    fn test_invalid_command_line_is_rejected() {
        let (tx, rx) = mpsc::channel();
        let supervisor = ProcessSupervisor::new("/bin/true");
        let err = supervisor.start("--paths \"unterminated", tx).unwrap_err();
        assert!(matches!(err, SetupError::CommandLine));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_missing_binary_fails_to_spawn() {
        let (tx, rx) = mpsc::channel();
        let supervisor = ProcessSupervisor::new("/definitely/not/here/yt-dlp");
        let err = supervisor.start("--version", tx).unwrap_err();
        assert!(matches!(err, SetupError::Spawn(_)));
        assert!(rx.try_recv().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_streams_and_success() {
        let (tx, rx) = mpsc::channel();
        let supervisor = ProcessSupervisor::new("sh");
        let pid = supervisor
            .start(
                "-c 'printf \"a\\rb\\n\"; printf oops >&2'",
                tx,
            )
            .unwrap();
        assert!(pid > 0);
        let events = collect(&rx);

        assert_eq!(events.first(), Some(&JobEvent::Started));
        assert_eq!(
            events.last(),
            Some(&JobEvent::Completed {
                status: CompletionStatus::Success
            })
        );
        let stdout: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                JobEvent::Stdout { content, overwrite } => Some((content.as_str(), *overwrite)),
                _ => None,
            })
            .collect();
        assert_eq!(stdout, vec![("a", false), ("b", true)]);
        assert!(events.contains(&JobEvent::Stderr {
            content: "oops".to_string(),
            overwrite: false
        }));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_failure() {
        let (tx, rx) = mpsc::channel();
        ProcessSupervisor::new("sh")
            .start("-c 'exit 3'", tx)
            .unwrap();
        let events = collect(&rx);
        assert_eq!(
            events.last(),
            Some(&JobEvent::Completed {
                status: CompletionStatus::Failure
            })
        );
    }
}
