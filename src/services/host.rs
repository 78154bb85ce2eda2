//! Side effects the orchestrator needs from the outside world

use crate::error::SetupError;
use crate::model::job::JobEvent;
use crate::services::batch_file;
use crate::services::supervisor::ProcessSupervisor;
use crate::services::updater::asset_name_for;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

/// File writing and process launching for one job
pub trait JobHost {
    /// Write the URL list and return the batch file path
    fn persist_url_list(&mut self, urls: &str) -> Result<PathBuf, SetupError>;

    /// Launch yt-dlp and return its pid; progress arrives on `events`
    fn start_process(
        &mut self,
        command_line: &str,
        events: Sender<JobEvent>,
    ) -> Result<u32, SetupError>;
}

/// Host that writes into the work directory and runs the downloaded binary
#[derive(Debug, Clone)]
pub struct SystemHost {
    work_dir: PathBuf,
}

impl SystemHost {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }
}

impl JobHost for SystemHost {
    fn persist_url_list(&mut self, urls: &str) -> Result<PathBuf, SetupError> {
        batch_file::persist_url_list(urls, &self.work_dir)
    }

    fn start_process(
        &mut self,
        command_line: &str,
        events: Sender<JobEvent>,
    ) -> Result<u32, SetupError> {
        let os = std::env::consts::OS;
        let asset = asset_name_for(os).map_err(|_| SetupError::UnsupportedOs(os.to_string()))?;
        ProcessSupervisor::new(self.work_dir.join(asset)).start(command_line, events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_system_host_writes_into_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = SystemHost::new(dir.path());
        let path = host.persist_url_list("http://a\n").unwrap();
        assert_eq!(path.parent(), Some(dir.path()));
    }

    #[test]
    fn test_system_host_without_binary_rejects_start() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = SystemHost::new(dir.path());
        let (tx, _rx) = mpsc::channel();
        assert!(host.start_process("--version", tx).is_err());
    }
}
