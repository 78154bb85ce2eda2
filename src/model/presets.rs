//! Ready-made yt-dlp option strings offered in custom mode

/// A titled group of option presets
#[derive(Debug, Clone, Copy)]
pub struct PresetGroup {
    pub title: &'static str,
    pub options: &'static [&'static str],
}

pub const PRESET_GROUPS: &[PresetGroup] = &[
    PresetGroup {
        title: "Format Selection",
        options: &[
            r#"-f "bv*+ba/b" -o "%(title).200B [%(id)s].%(ext)s" --no-continue --sleep-requests 2 --sleep-interval 3 --max-sleep-interval 8 --remux-video mp4/mkv --embed-metadata --embed-thumbnail --convert-thumbnails png"#,
            r#"-f "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best""#,
            r#"-f "bestvideo[ext=webm]+bestaudio[ext=webm]/best[ext=webm]/best""#,
            r#"-f "bestvideo+bestaudio""#,
            r#"-f "best""#,
        ],
    },
    PresetGroup {
        title: "Audio Extraction",
        options: &[
            "--extract-audio",
            "--audio-format mp3",
            "--audio-format m4a",
            "--audio-format flac",
            "--audio-quality 0",
        ],
    },
    PresetGroup {
        title: "Remuxing & Post-processing",
        options: &[
            "--remux-video mkv",
            "--remux-video mp4",
            r#"-P "ffmpeg:-c:v libx264 -crf 23""#,
            r#"-P "ffmpeg:-c:v copy -c:a aac -b:a 192k""#,
            r#"-P "ffmpeg:-vf scale=1280:-1""#,
        ],
    },
    PresetGroup {
        title: "Output & Metadata",
        options: &[
            r#"-o "%(title)s.%(ext)s""#,
            r#"-o "%(playlist_index)s - %(title)s.%(ext)s""#,
            "--embed-metadata",
            "--embed-thumbnail",
        ],
    },
    PresetGroup {
        title: "Subtitles",
        options: &["--embed-subs", "--write-subs", "--all-subs"],
    },
    PresetGroup {
        title: "Download Control",
        options: &["--limit-rate 5M", "--no-overwrites", "--continue"],
    },
];

/// Every preset in display order, paired with its group title
pub fn all_presets() -> Vec<(&'static str, &'static str)> {
    PRESET_GROUPS
        .iter()
        .flat_map(|group| group.options.iter().map(move |opt| (group.title, *opt)))
        .collect()
}

/// Append a preset to the existing custom option text
pub fn append_preset(current: &str, preset: &str) -> String {
    let trimmed = current.trim();
    if trimmed.is_empty() {
        preset.to_string()
    } else {
        format!("{} {}", trimmed, preset)
    }
}
