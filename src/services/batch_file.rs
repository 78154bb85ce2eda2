//! URL list persistence for `--batch-file`

use crate::error::SetupError;
use std::fs;
use std::path::{Path, PathBuf};

pub const URL_LIST_FILE: &str = "url-list.txt";

/// Write the non-blank, trimmed URLs to `<dir>/url-list.txt`
///
/// The file is overwritten on every call. Returns the path written.
pub fn persist_url_list(urls: &str, dir: &Path) -> Result<PathBuf, SetupError> {
    let lines: Vec<&str> = urls
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        log::warn!("refusing to write empty URL list");
        return Err(SetupError::NoUrls);
    }

    fs::create_dir_all(dir).map_err(|source| SetupError::BatchFile {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(URL_LIST_FILE);
    let mut contents = lines.join("\n");
    contents.push('\n');
    fs::write(&path, contents).map_err(|source| SetupError::BatchFile {
        path: path.clone(),
        source,
    })?;

    log::info!("wrote {} URL(s) to {}", lines.len(), path.display());
    Ok(path)
}
