//! External tool availability checks
//!
//! [`ToolStatusMonitor`] runs one background query per tool and applies the
//! results when polled from the UI loop. The queries themselves sit behind
//! [`ToolProbe`] so they can be replaced in tests.

use crate::error::ToolError;
use crate::model::tool_status::{ToolKind, ToolStatus, ToolStatuses};
use crate::services::updater::Updater;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;

/// Queries for the two external tools
pub trait ToolProbe: Send + Sync {
    /// Make sure yt-dlp is present and current, returning a status message
    fn fetch_or_update_download_tool(&self) -> Result<String, ToolError>;

    /// Version text of ffmpeg and ffprobe, from PATH when `directory` is None
    fn probe_transcode_tool(&self, directory: Option<&Path>) -> Result<String, ToolError>;
}

/// Probe backed by real processes and the network
#[derive(Debug, Clone)]
pub struct SystemToolProbe {
    updater: Updater,
}

impl SystemToolProbe {
    pub fn new(work_dir: impl Into<PathBuf>, update_check_minutes: u64) -> Self {
        Self {
            updater: Updater::new(work_dir, update_check_minutes),
        }
    }
}

impl ToolProbe for SystemToolProbe {
    fn fetch_or_update_download_tool(&self) -> Result<String, ToolError> {
        self.updater.fetch_or_update()
    }

    fn probe_transcode_tool(&self, directory: Option<&Path>) -> Result<String, ToolError> {
        probe_transcode(directory)
    }
}

/// Run `ffmpeg -version` and `ffprobe -version`
///
/// Both must succeed. The result starts with a banner line so the version
/// line of ffmpeg is always the second line.
pub fn probe_transcode(directory: Option<&Path>) -> Result<String, ToolError> {
    log::info!("probing ffmpeg/ffprobe in {:?}", directory);
    let ffmpeg = version_output(&transcode_binary(directory, "ffmpeg"), "ffmpeg")?;
    let ffprobe = version_output(&transcode_binary(directory, "ffprobe"), "ffprobe")?;
    Ok(format!(
        "ffmpeg version:\n{}\nffprobe version:\n{}",
        ffmpeg, ffprobe
    ))
}

fn transcode_binary(directory: Option<&Path>, name: &str) -> OsString {
    let file_name = if cfg!(windows) {
        format!("{}.exe", name)
    } else {
        name.to_string()
    };
    match directory {
        Some(dir) => dir.join(file_name).into_os_string(),
        None => OsString::from(name),
    }
}

fn version_output(program: &OsString, tool: &str) -> Result<String, ToolError> {
    let output = Command::new(program)
        .arg("-version")
        .output()
        .map_err(|source| {
            log::warn!("failed to launch {}: {}", tool, source);
            ToolError::Launch {
                tool: tool.to_string(),
                source,
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        log::warn!("{} exited with {}: {}", tool, output.status, stderr);
        return Err(ToolError::Failed {
            tool: tool.to_string(),
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Result of one background check, tagged with the round that issued it
struct ToolCheck {
    generation: u64,
    kind: ToolKind,
    result: Result<String, String>,
}

/// Owns the two tool statuses and refreshes them in the background
pub struct ToolStatusMonitor {
    probe: Arc<dyn ToolProbe>,
    statuses: ToolStatuses,
    generation: u64,
    sender: Sender<ToolCheck>,
    receiver: Receiver<ToolCheck>,
}

impl ToolStatusMonitor {
    pub fn new(probe: Arc<dyn ToolProbe>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            probe,
            statuses: ToolStatuses::default(),
            generation: 0,
            sender,
            receiver,
        }
    }

    pub fn statuses(&self) -> &ToolStatuses {
        &self.statuses
    }

    /// Reset both tools to loading and query them again
    ///
    /// Results from an earlier round that arrive late are discarded.
    pub fn check_tools(&mut self, override_directory: Option<PathBuf>) {
        self.generation += 1;
        let generation = self.generation;
        log::info!(
            "checking tools (round {}, transcode dir {:?})",
            generation,
            override_directory
        );

        self.statuses.set(ToolKind::Download, ToolStatus::Loading);
        self.statuses.set(ToolKind::Transcode, ToolStatus::Loading);

        let probe = Arc::clone(&self.probe);
        let tx = self.sender.clone();
        thread::spawn(move || {
            let result = probe
                .fetch_or_update_download_tool()
                .map_err(|e| e.to_string());
            let _ = tx.send(ToolCheck {
                generation,
                kind: ToolKind::Download,
                result,
            });
        });

        let probe = Arc::clone(&self.probe);
        let tx = self.sender.clone();
        thread::spawn(move || {
            let result = probe
                .probe_transcode_tool(override_directory.as_deref())
                .map_err(|e| e.to_string());
            let _ = tx.send(ToolCheck {
                generation,
                kind: ToolKind::Transcode,
                result,
            });
        });
    }

    /// Apply finished checks, returns true if any status changed
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.receiver.try_recv() {
                Ok(check) if check.generation == self.generation => {
                    let status = status_from(check.kind, check.result);
                    if let ToolStatus::Failed { error } = &status {
                        log::warn!("{} unavailable: {}", check.kind.label(), error);
                    }
                    self.statuses.set(check.kind, status);
                    changed = true;
                }
                Ok(stale) => {
                    log::debug!("dropping stale {} result", stale.kind.label());
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        changed
    }
}

fn status_from(kind: ToolKind, result: Result<String, String>) -> ToolStatus {
    match result {
        Ok(output) => {
            let version = match kind {
                ToolKind::Download => output.clone(),
                ToolKind::Transcode => output.lines().nth(1).unwrap_or_default().to_string(),
            };
            ToolStatus::Ready {
                version,
                full_output: output,
            }
        }
        Err(error) => ToolStatus::Failed { error },
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    /// Probe answering from fixed values
    pub(crate) struct FakeProbe {
        pub download: Result<String, String>,
        pub transcode_ok: bool,
    }

    impl ToolProbe for FakeProbe {
        fn fetch_or_update_download_tool(&self) -> Result<String, ToolError> {
            self.download.clone().map_err(|e| ToolError::Failed {
                tool: "yt-dlp".to_string(),
                stderr: e,
            })
        }

        fn probe_transcode_tool(&self, directory: Option<&Path>) -> Result<String, ToolError> {
            let dir = directory
                .map(|d| d.display().to_string())
                .unwrap_or_else(|| "PATH".to_string());
            if self.transcode_ok {
                Ok(format!("ffmpeg version:\nffmpeg 6.1 from {}\nmore", dir))
            } else {
                Err(ToolError::Failed {
                    tool: "ffmpeg".to_string(),
                    stderr: format!("not found in {}", dir),
                })
            }
        }
    }

    pub(crate) fn settle(monitor: &mut ToolStatusMonitor) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while monitor.statuses().any_loading() && Instant::now() < deadline {
            monitor.poll();
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_check_tools_populates_both_statuses() {
        let mut monitor = ToolStatusMonitor::new(Arc::new(FakeProbe {
            download: Ok("yt-dlp is already up to date.".to_string()),
            transcode_ok: true,
        }));
        monitor.check_tools(None);
        assert!(monitor.statuses().any_loading());
        settle(&mut monitor);

        let statuses = monitor.statuses();
        assert_eq!(statuses.download.version(), "yt-dlp is already up to date.");
        assert_eq!(statuses.transcode.version(), "ffmpeg 6.1 from PATH");
        assert!(statuses.transcode.full_output().starts_with("ffmpeg version:"));
    }

    #[test]
    fn test_one_failure_does_not_affect_the_other() {
        let mut monitor = ToolStatusMonitor::new(Arc::new(FakeProbe {
            download: Err("offline".to_string()),
            transcode_ok: true,
        }));
        monitor.check_tools(None);
        settle(&mut monitor);

        let statuses = monitor.statuses();
        assert_eq!(statuses.download.error(), Some("yt-dlp error: offline"));
        assert_eq!(statuses.download.version(), "");
        assert!(statuses.transcode.error().is_none());
    }

    #[test]
    fn test_recheck_ignores_earlier_round() {
        let mut monitor = ToolStatusMonitor::new(Arc::new(FakeProbe {
            download: Ok("ok".to_string()),
            transcode_ok: false,
        }));
        monitor.check_tools(Some(PathBuf::from("/first")));
        monitor.check_tools(Some(PathBuf::from("/second")));
        settle(&mut monitor);
        // give the first round time to arrive late
        thread::sleep(Duration::from_millis(50));
        monitor.poll();

        assert_eq!(
            monitor.statuses().transcode.error(),
            Some("ffmpeg error: not found in /second")
        );
    }

    #[test]
    fn test_transcode_binary_names() {
        assert_eq!(transcode_binary(None, "ffmpeg"), OsString::from("ffmpeg"));
        let in_dir = transcode_binary(Some(Path::new("/opt/bin")), "ffprobe");
        let expected = if cfg!(windows) {
            Path::new("/opt/bin").join("ffprobe.exe")
        } else {
            Path::new("/opt/bin").join("ffprobe")
        };
        assert_eq!(PathBuf::from(in_dir), expected);
    }

    #[test]
    fn test_probe_missing_directory_fails_to_launch() {
        let dir = tempfile::tempdir().unwrap();
        let err = probe_transcode(Some(&dir.path().join("nope"))).unwrap_err();
        assert!(matches!(err, ToolError::Launch { ref tool, .. } if tool == "ffmpeg"));
    }

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_reads_both_versions() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "ffmpeg", "echo 'ffmpeg version 6.1'");
        write_script(dir.path(), "ffprobe", "echo 'ffprobe version 6.1'");

        let output = probe_transcode(Some(dir.path())).unwrap();
        assert_eq!(
            output,
            "ffmpeg version:\nffmpeg version 6.1\n\nffprobe version:\nffprobe version 6.1\n"
        );
        assert_eq!(
            status_from(ToolKind::Transcode, Ok(output)).version(),
            "ffmpeg version 6.1"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_reports_stderr_of_failing_tool() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "ffmpeg", "echo 'ffmpeg version 6.1'");
        write_script(dir.path(), "ffprobe", "echo 'library missing' >&2; exit 1");

        let err = probe_transcode(Some(dir.path())).unwrap_err();
        assert_eq!(err.to_string(), "ffprobe error: library missing");
    }
}
