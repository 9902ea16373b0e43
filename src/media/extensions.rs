use std::path::Path;

pub const SUBTITLE_EXTENSIONS: &[&str] = &["srt", "sub", "smi", "ssa", "ass", "mpl"];

pub const VIDEO_EXTENSIONS: &[&str] = &[
    "3g2", "3gp", "3gp2", "3gpp", "60d", "ajp", "asf", "asx", "avchd", "avi", "bik", "bix", "box",
    "cam", "dat", "divx", "dmf", "dv", "dvr-ms", "evo", "flc", "fli", "flic", "flv", "flx", "gvi",
    "gvp", "h264", "m1v", "m2p", "m2ts", "m2v", "m4e", "m4v", "mjp", "mjpeg", "mjpg", "mkv",
    "moov", "mov", "movhd", "movie", "movx", "mp4", "mpe", "mpeg", "mpg", "mpv", "mpv2", "mxf",
    "nsv", "nut", "ogg", "ogm", "ogv", "omf", "ps", "qt", "ram", "rm", "rmvb", "swf", "ts", "vfw",
    "vid", "video", "viv", "vivo", "vob", "vro", "wm", "wmv", "wmx", "wrap", "wvx", "wx", "x264",
    "xvid",
];

const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "rar", "7z"];

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

pub fn is_video(path: &Path) -> bool {
    lowercase_extension(path).is_some_and(|e| VIDEO_EXTENSIONS.contains(&e.as_str()))
}

pub fn is_subtitle(path: &Path) -> bool {
    lowercase_extension(path).is_some_and(|e| SUBTITLE_EXTENSIONS.contains(&e.as_str()))
}

/// Removes a trailing video, subtitle or archive extension from a name.
pub fn strip_known_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) => {
            let ext = ext.to_lowercase();
            let known = VIDEO_EXTENSIONS.contains(&ext.as_str())
                || SUBTITLE_EXTENSIONS.contains(&ext.as_str())
                || ARCHIVE_EXTENSIONS.contains(&ext.as_str());
            if known {
                stem
            } else {
                name
            }
        }
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_checks_are_case_insensitive() {
        assert!(is_video(Path::new("/a/Show.S01E01.MKV")));
        assert!(is_subtitle(Path::new("Show.S01E01.Srt")));
        assert!(!is_video(Path::new("Show.S01E01.srt")));
        assert!(!is_subtitle(Path::new("README")));
    }

    #[test]
    fn test_strip_known_extension() {
        assert_eq!(strip_known_extension("Show.S01E01.mkv"), "Show.S01E01");
        assert_eq!(strip_known_extension("Show.S01E01.en.srt"), "Show.S01E01.en");
        assert_eq!(strip_known_extension("Show.S01.720p.WEB-DL"), "Show.S01.720p.WEB-DL");
    }
}
