use crate::model::settings::{JobSettings, SelectionMode};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where downloads are saved
    pub output_directory: String,
    /// Directory holding ffmpeg/ffprobe, empty for PATH lookup
    pub transcode_directory: String,
    pub selection_mode: SelectionMode,
    pub custom_options: String,
    /// Holds the yt-dlp binary, its release markers and the URL list
    pub work_directory: String,
    pub log_level: String,
    /// Minimum minutes between yt-dlp release checks
    pub update_check_minutes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_directory: String::new(),
            transcode_directory: String::new(),
            selection_mode: SelectionMode::Automatic,
            custom_options: String::new(),
            work_directory: "yt-dlp".to_string(),
            log_level: "info".to_string(),
            update_check_minutes: 60,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".ytdlp-tui"))
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn load() -> Option<Config> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }

        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("ignoring unreadable config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Save the config to disk
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Absolute work directory, relative paths resolve against the current directory
    pub fn work_dir(&self) -> PathBuf {
        let dir = PathBuf::from(self.work_directory.trim());
        if dir.is_absolute() {
            return dir;
        }
        match env::current_dir() {
            Ok(cwd) => cwd.join(dir),
            Err(_) => dir,
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.trim().parse().unwrap_or(LevelFilter::Info)
    }

    /// Job settings seeded from the last session; URLs always start empty
    pub fn job_settings(&self) -> JobSettings {
        let mut settings = JobSettings {
            selection_mode: self.selection_mode,
            custom_options: self.custom_options.clone(),
            ..Default::default()
        };
        settings.set_output_directory(Some(PathBuf::from(&self.output_directory)));
        settings.set_tool_directory(Some(PathBuf::from(&self.transcode_directory)));
        settings
    }

    /// Remember the directories and options of a confirmed job
    pub fn remember(&mut self, settings: &JobSettings) {
        self.output_directory = path_text(settings.output_directory.as_deref());
        self.transcode_directory = path_text(settings.tool_directory.as_deref());
        self.selection_mode = settings.selection_mode;
        self.custom_options = settings.custom_options.clone();
    }
}

fn path_text(path: Option<&Path>) -> String {
    path.map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}
