//! yt-dlp argument string construction

use crate::model::settings::{is_blank_path, JobSettings};
use std::path::Path;

/// Staging directory for partial downloads, relative to the working directory
pub const TEMP_PATH: &str = "./tmp";

/// Wrap `value` in double quotes, escaping the characters word splitting
/// treats specially inside them
fn quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Build the yt-dlp argument string for a job
///
/// The string is built deterministically from:
/// - `--batch-file` pointing at the persisted URL list
/// - `--paths "temp:..."` for the staging directory
/// - `--paths "home:..."` when an output directory is set
/// - `--ffmpeg-location` when a transcode directory is set
/// - the trimmed custom options in custom mode, appended verbatim
pub fn build_command_line(settings: &JobSettings, batch_file: &Path) -> String {
    let mut parts = vec![
        format!("--batch-file {}", quoted(&batch_file.display().to_string())),
        format!("--paths {}", quoted(&format!("temp:{}", TEMP_PATH))),
    ];

    if let Some(dir) = settings.output_directory.as_deref() {
        if !is_blank_path(dir) {
            parts.push(format!("--paths {}", quoted(&format!("home:{}", dir.display()))));
        }
    }

    if let Some(dir) = settings.tool_directory.as_deref() {
        if !is_blank_path(dir) {
            parts.push(format!("--ffmpeg-location {}", quoted(&dir.display().to_string())));
        }
    }

    if let Some(custom) = settings.effective_custom_options() {
        parts.push(custom.to_string());
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::settings::SelectionMode;
    use std::path::PathBuf;

    fn full_settings() -> JobSettings {
        JobSettings {
            url_list: vec!["http://x/1".to_string()],
            selection_mode: SelectionMode::Custom,
            custom_options: "  -f \"best\"  ".to_string(),
            tool_directory: Some(PathBuf::from("/opt/ffmpeg")),
            output_directory: Some(PathBuf::from("/home/me/Videos")),
        }
    }

    #[test]
    fn test_minimal_command_line() {
        let cmd = build_command_line(&JobSettings::default(), Path::new("/w/url-list.txt"));
        assert_eq!(
            cmd,
            "--batch-file \"/w/url-list.txt\" --paths \"temp:./tmp\""
        );
    }

    #[test]
    fn test_full_command_line() {
        let cmd = build_command_line(&full_settings(), Path::new("/w/url-list.txt"));
        assert_eq!(
            cmd,
            "--batch-file \"/w/url-list.txt\" --paths \"temp:./tmp\" \
             --paths \"home:/home/me/Videos\" --ffmpeg-location \"/opt/ffmpeg\" -f \"best\""
        );
    }

    #[test]
    fn test_deterministic() {
        let settings = full_settings();
        let batch = Path::new("list.txt");
        assert_eq!(
            build_command_line(&settings, batch),
            build_command_line(&settings.clone(), batch)
        );
    }

    #[test]
    fn test_missing_output_directory_omits_home_flag() {
        let mut settings = full_settings();
        settings.output_directory = None;
        let cmd = build_command_line(&settings, Path::new("list.txt"));
        assert!(!cmd.contains("home:"));

        settings.output_directory = Some(PathBuf::from("   "));
        let cmd = build_command_line(&settings, Path::new("list.txt"));
        assert!(!cmd.contains("home:"));
    }

    #[test]
    fn test_blank_custom_options_add_nothing() {
        let mut settings = full_settings();
        settings.custom_options = " \t ".to_string();
        let cmd = build_command_line(&settings, Path::new("list.txt"));
        assert!(cmd.ends_with("--ffmpeg-location \"/opt/ffmpeg\""));
    }

    #[test]
    fn test_backslashes_and_quotes_survive_word_splitting() {
        let settings = JobSettings {
            output_directory: Some(PathBuf::from("D:\\")),
            tool_directory: Some(PathBuf::from("C:\\Tools\\ffmpeg \"x\"")),
            ..Default::default()
        };
        let cmd = build_command_line(&settings, Path::new("C:\\w\\url-list.txt"));
        assert_eq!(
            shlex::split(&cmd).unwrap(),
            vec![
                "--batch-file",
                "C:\\w\\url-list.txt",
                "--paths",
                "temp:./tmp",
                "--paths",
                "home:D:\\",
                "--ffmpeg-location",
                "C:\\Tools\\ffmpeg \"x\"",
            ]
        );
    }

    #[test]
    fn test_custom_options_ignored_in_automatic_mode() {
        let mut settings = full_settings();
        settings.selection_mode = SelectionMode::Automatic;
        let cmd = build_command_line(&settings, Path::new("list.txt"));
        assert!(!cmd.contains("-f"));
    }
}
