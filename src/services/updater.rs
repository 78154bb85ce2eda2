//! yt-dlp self-update from the nightly builds release feed
//!
//! The binary, its release marker and the last-check marker all live in the
//! work directory. Markers hold RFC3339 timestamps.

use crate::error::ToolError;
use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

const RELEASE_API_URL: &str =
    "https://api.github.com/repos/yt-dlp/yt-dlp-nightly-builds/releases/latest";
const USER_AGENT: &str = "ytdlp-tui";
const RELEASE_TIME_FILE: &str = "release-time.txt";
const LAST_CHECK_FILE: &str = "last-check-time.txt";
const MAX_INTERVAL_MINUTES: u64 = 60 * 24 * 365;

/// Release asset name for an operating system
pub fn asset_name_for(os: &str) -> Result<&'static str, ToolError> {
    match os {
        "windows" => Ok("yt-dlp.exe"),
        "macos" => Ok("yt-dlp_macos"),
        "linux" => Ok("yt-dlp_linux"),
        other => Err(ToolError::UnsupportedOs(other.to_string())),
    }
}

/// Where the yt-dlp binary for this platform lives
pub fn download_tool_path(work_dir: &Path) -> Result<PathBuf, ToolError> {
    Ok(work_dir.join(asset_name_for(std::env::consts::OS)?))
}

/// Keeps the yt-dlp binary in `work_dir` current
#[derive(Debug, Clone)]
pub struct Updater {
    work_dir: PathBuf,
    check_interval: Duration,
}

impl Updater {
    pub fn new(work_dir: impl Into<PathBuf>, check_interval_minutes: u64) -> Self {
        let minutes = check_interval_minutes.min(MAX_INTERVAL_MINUTES) as i64;
        Self {
            work_dir: work_dir.into(),
            check_interval: Duration::minutes(minutes),
        }
    }

    /// Download or confirm the latest yt-dlp, returning a status message
    pub fn fetch_or_update(&self) -> Result<String, ToolError> {
        log::info!("checking yt-dlp in {}", self.work_dir.display());
        fs::create_dir_all(&self.work_dir).map_err(|source| ToolError::Io {
            path: self.work_dir.clone(),
            source,
        })?;

        let binary = download_tool_path(&self.work_dir)?;
        let now = Utc::now();

        if self.checked_recently(now) {
            log::info!("last update check is recent, skipping server check");
            return Ok(format!(
                "yt-dlp is up to date (last checked less than {} ago)",
                describe_interval(self.check_interval)
            ));
        }

        let release = fetch_release_info()?;
        let published = published_at(&release)?;
        let local = read_marker(&self.work_dir.join(RELEASE_TIME_FILE));

        if is_current(local, published) && binary_runs(&binary) {
            log::info!("yt-dlp is already up to date");
            self.write_marker(LAST_CHECK_FILE, now)?;
            return Ok("yt-dlp is already up to date.".to_string());
        }

        let asset = asset_name_for(std::env::consts::OS)?;
        let url = asset_download_url(&release, asset)?;
        log::info!("downloading yt-dlp from {}", url);
        download_to(&url, &binary)?;

        self.write_marker(RELEASE_TIME_FILE, published)?;
        self.write_marker(LAST_CHECK_FILE, Utc::now())?;

        log::info!("yt-dlp download completed: {}", binary.display());
        Ok(format!("yt-dlp downloaded successfully: {}", binary.display()))
    }

    fn checked_recently(&self, now: DateTime<Utc>) -> bool {
        read_marker(&self.work_dir.join(LAST_CHECK_FILE))
            .map(|last| now.signed_duration_since(last) < self.check_interval)
            .unwrap_or(false)
    }

    fn write_marker(&self, name: &str, time: DateTime<Utc>) -> Result<(), ToolError> {
        let path = self.work_dir.join(name);
        fs::write(&path, time.to_rfc3339()).map_err(|source| {
            log::error!("could not write {}: {}", path.display(), source);
            ToolError::Io { path, source }
        })
    }
}

fn read_marker(path: &Path) -> Option<DateTime<Utc>> {
    let text = fs::read_to_string(path).ok()?;
    DateTime::parse_from_rfc3339(text.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn describe_interval(interval: Duration) -> String {
    let minutes = interval.num_minutes();
    match minutes {
        60 => "1 hour".to_string(),
        m if m > 0 && m % 60 == 0 => format!("{} hours", m / 60),
        1 => "1 minute".to_string(),
        m => format!("{} minutes", m),
    }
}

fn is_current(local: Option<DateTime<Utc>>, published: DateTime<Utc>) -> bool {
    local.map(|l| l >= published).unwrap_or(false)
}

fn binary_runs(binary: &Path) -> bool {
    match Command::new(binary).arg("--version").output() {
        Ok(output) => output.status.success(),
        Err(e) => {
            log::warn!("could not get existing yt-dlp version: {}", e);
            false
        }
    }
}

fn fetch_release_info() -> Result<serde_json::Value, ToolError> {
    let mut response = ureq::get(RELEASE_API_URL)
        .header("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| {
            log::error!("release info request failed: {}", e);
            ToolError::Http(e.to_string())
        })?;

    let mut body = String::new();
    response
        .body_mut()
        .as_reader()
        .read_to_string(&mut body)
        .map_err(|e| ToolError::Http(e.to_string()))?;

    serde_json::from_str(&body).map_err(|e| ToolError::ReleaseInfo(e.to_string()))
}

fn published_at(release: &serde_json::Value) -> Result<DateTime<Utc>, ToolError> {
    let raw = release
        .get("published_at")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolError::ReleaseInfo("missing published_at".to_string()))?;
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| ToolError::ReleaseInfo(format!("bad published_at {:?}: {}", raw, e)))
}

fn asset_download_url(release: &serde_json::Value, asset: &str) -> Result<String, ToolError> {
    let assets = release
        .get("assets")
        .and_then(|a| a.as_array())
        .ok_or_else(|| ToolError::ReleaseInfo("no assets in release".to_string()))?;

    assets
        .iter()
        .find(|a| a.get("name").and_then(|n| n.as_str()) == Some(asset))
        .and_then(|a| a.get("browser_download_url"))
        .and_then(|u| u.as_str())
        .map(str::to_string)
        .ok_or_else(|| ToolError::AssetMissing(asset.to_string()))
}

fn download_to(url: &str, destination: &Path) -> Result<(), ToolError> {
    let response = ureq::get(url)
        .header("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| ToolError::Download(e.to_string()))?;

    let tmp_path = destination.with_extension("download");
    let io_err = |source| ToolError::Io {
        path: tmp_path.clone(),
        source,
    };
    {
        let mut reader = response.into_body().into_reader();
        let mut file = fs::File::create(&tmp_path).map_err(io_err)?;
        std::io::copy(&mut reader, &mut file).map_err(|e| ToolError::Download(e.to_string()))?;
        file.flush().map_err(io_err)?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o755)).map_err(io_err)?;
    }

    fs::rename(&tmp_path, destination).map_err(|source| ToolError::Io {
        path: destination.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_asset_names() {
        assert_eq!(asset_name_for("linux").unwrap(), "yt-dlp_linux");
        assert_eq!(asset_name_for("macos").unwrap(), "yt-dlp_macos");
        assert_eq!(asset_name_for("windows").unwrap(), "yt-dlp.exe");
        let err = asset_name_for("haiku").unwrap_err();
        assert_eq!(err.to_string(), "Unsupported OS: haiku");
    }

    #[test]
    fn test_recent_check_skips_network() {
        if asset_name_for(std::env::consts::OS).is_err() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LAST_CHECK_FILE), Utc::now().to_rfc3339()).unwrap();
        let message = Updater::new(dir.path(), 60).fetch_or_update().unwrap();
        assert_eq!(
            message,
            "yt-dlp is up to date (last checked less than 1 hour ago)"
        );
    }

    #[test]
    fn test_stale_or_missing_marker_is_not_recent() {
        let dir = tempfile::tempdir().unwrap();
        let updater = Updater::new(dir.path(), 60);
        let now = Utc::now();
        assert!(!updater.checked_recently(now));

        let old = now - Duration::minutes(61);
        fs::write(dir.path().join(LAST_CHECK_FILE), old.to_rfc3339()).unwrap();
        assert!(!updater.checked_recently(now));

        fs::write(dir.path().join(LAST_CHECK_FILE), "garbage").unwrap();
        assert!(!updater.checked_recently(now));
    }

    #[test]
    fn test_is_current() {
        let published = DateTime::parse_from_rfc3339("2025-03-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert!(is_current(Some(published), published));
        assert!(!is_current(Some(published - Duration::days(1)), published));
        assert!(!is_current(None, published));
    }

    #[test]
    fn test_release_parsing() {
        let release = json!({
            "published_at": "2025-03-01T12:30:00Z",
            "assets": [
                {"name": "yt-dlp.exe", "browser_download_url": "https://x/yt-dlp.exe"},
                {"name": "yt-dlp_linux", "browser_download_url": "https://x/yt-dlp_linux"}
            ]
        });
        assert_eq!(
            published_at(&release).unwrap().to_rfc3339(),
            "2025-03-01T12:30:00+00:00"
        );
        assert_eq!(
            asset_download_url(&release, "yt-dlp_linux").unwrap(),
            "https://x/yt-dlp_linux"
        );
        assert!(matches!(
            asset_download_url(&release, "yt-dlp_macos"),
            Err(ToolError::AssetMissing(_))
        ));
        assert!(published_at(&json!({})).is_err());
    }

    #[test]
    fn test_describe_interval() {
        assert_eq!(describe_interval(Duration::minutes(60)), "1 hour");
        assert_eq!(describe_interval(Duration::minutes(120)), "2 hours");
        assert_eq!(describe_interval(Duration::minutes(15)), "15 minutes");
    }
}
