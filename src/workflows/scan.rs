use anyhow::{bail, Context, Result};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::media::extensions::{is_subtitle, is_video};

/// Lists video files under `path` that do not have a subtitle yet.
///
/// A directory is walked recursively; a single file is kept only if it is a
/// video. Results are sorted so runs are reproducible.
pub fn find_video_files(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        bail!("Input path does not exist: {path:?}");
    }

    let mut videos = if path.is_dir() {
        scan_directory(path)
    } else if path.is_file() {
        scan_single_file(path)?
    } else {
        bail!("Input path is neither a file nor a directory: {path:?}");
    };

    videos.sort();
    Ok(videos)
}

fn scan_directory(dir_path: &Path) -> Vec<PathBuf> {
    let mut videos = Vec::new();
    let mut subtitle_stems: HashMap<PathBuf, HashSet<String>> = HashMap::new();

    for entry in WalkDir::new(dir_path).into_iter() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable path");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if is_video(&path) {
            videos.push(path);
        } else if is_subtitle(&path) {
            if let (Some(parent), Some(stem)) = (path.parent(), file_stem(&path)) {
                subtitle_stems
                    .entry(parent.to_path_buf())
                    .or_default()
                    .insert(stem);
            }
        }
    }

    videos.retain(|video| {
        let stems = video.parent().and_then(|p| subtitle_stems.get(p));
        let keep = !stems.is_some_and(|stems| has_subtitle_sibling(video, stems.iter()));
        if !keep {
            debug!(path = %video.display(), "Subtitle already present, skipping");
        }
        keep
    });
    videos
}

fn scan_single_file(file_path: &Path) -> Result<Vec<PathBuf>> {
    if !is_video(file_path) {
        warn!(path = %file_path.display(), "Not a recognized video file");
        return Ok(Vec::new());
    }

    let directory = match file_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let entries = fs::read_dir(directory)
        .with_context(|| format!("Failed to list {}", directory.display()))?;

    let mut stems = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && is_subtitle(&path) {
            if let Some(stem) = file_stem(&path) {
                stems.push(stem);
            }
        }
    }

    if has_subtitle_sibling(file_path, stems.iter()) {
        debug!(path = %file_path.display(), "Subtitle already present, skipping");
        return Ok(Vec::new());
    }
    Ok(vec![file_path.to_path_buf()])
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}

/// `Movie.srt` and language-tagged `Movie.en.srt` both count for `Movie.mkv`.
fn has_subtitle_sibling<'a>(
    video: &Path,
    mut subtitle_stems: impl Iterator<Item = &'a String>,
) -> bool {
    let Some(video_stem) = file_stem(video) else {
        return false;
    };
    let tagged_prefix = format!("{video_stem}.");
    subtitle_stems.any(|stem| *stem == video_stem || stem.starts_with(&tagged_prefix))
}
