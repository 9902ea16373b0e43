use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::domain::models::{ReleaseTags, SubtitleCandidate, VideoMeta};
use crate::error::DownloadError;
use crate::infra::catalog::Catalog;
use crate::media::archive::{extract_subtitles, SubtitleEntry};
use crate::media::guess::{guess, GuessOptions};
use crate::media::text::clean_chars;
use crate::workflows::matchers::auto::is_meta_match;

/// Resolves, fetches and unpacks the archive behind a candidate.
pub fn fetch_subtitles(
    catalog: &dyn Catalog,
    config: &RunConfig,
    candidate: &SubtitleCandidate,
) -> Result<Vec<SubtitleEntry>, DownloadError> {
    if config.deadline_passed() {
        return Err(DownloadError::DeadlineExceeded);
    }
    let token = catalog
        .resolve_download(&candidate.source)
        .map_err(DownloadError::Resolve)?;

    if config.deadline_passed() {
        return Err(DownloadError::DeadlineExceeded);
    }
    let bytes = catalog
        .fetch_archive(&token)
        .map_err(DownloadError::Fetch)?;

    let entries = extract_subtitles(&bytes)?;
    debug!(
        release = %candidate.release_name,
        entries = entries.len(),
        "Archive extracted"
    );
    Ok(entries)
}

/// `<video stem><ext>`, next to the video unless an output directory is set.
pub fn subtitle_path(video: &Path, extension: &str, savepath: Option<&Path>) -> PathBuf {
    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{stem}{extension}");

    match savepath {
        Some(dir) => dir.join(name),
        None => video.with_file_name(name),
    }
}

/// Writes through a temp file in the destination directory, then renames it
/// into place.
pub fn write_subtitle(path: &Path, data: &[u8]) -> Result<(), DownloadError> {
    let write_err = |source| DownloadError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(write_err)?;

    let mut temp = NamedTempFile::new_in(parent).map_err(write_err)?;
    temp.write_all(data).map_err(write_err)?;
    temp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

fn write_for_video(video: &VideoMeta, entry: &SubtitleEntry, config: &RunConfig) -> bool {
    let path = subtitle_path(&video.filename, &entry.extension, config.savepath.as_deref());
    match write_subtitle(&path, &entry.data) {
        Ok(()) => {
            info!(path = %path.display(), "File downloaded");
            true
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to write subtitle");
            false
        }
    }
}

/// Downloads one candidate for one video and writes every subtitle it holds.
///
/// Returns the number of files written. The video is marked downloaded when at
/// least one write succeeded.
pub fn download_for_video(
    catalog: &dyn Catalog,
    config: &RunConfig,
    candidate: &SubtitleCandidate,
    video: &mut VideoMeta,
) -> Result<usize, DownloadError> {
    let entries = fetch_subtitles(catalog, config, candidate)?;

    let written = entries
        .iter()
        .filter(|entry| write_for_video(video, entry, config))
        .count();
    if written > 0 {
        video.mark_downloaded();
    }
    Ok(written)
}

/// Extracts a season pack and hands each entry to the videos it matches.
///
/// Only videos still pending when the pack is opened are considered, so a
/// pack never overwrites a subtitle fetched earlier in the run. Returns the
/// number of videos newly marked downloaded.
pub fn download_season_pack(
    catalog: &dyn Catalog,
    config: &RunConfig,
    candidate: &SubtitleCandidate,
    videos: &mut [VideoMeta],
) -> Result<usize, DownloadError> {
    let entries = fetch_subtitles(catalog, config, candidate)?;
    let pending: Vec<bool> = videos.iter().map(|v| !v.downloaded).collect();
    let mut newly_downloaded = 0;

    for entry in &entries {
        let meta = guess(&clean_chars(&entry.name), &GuessOptions::default());
        let tags = ReleaseTags::from_meta(&meta);

        for (video, _) in videos.iter_mut().zip(&pending).filter(|(_, open)| **open) {
            if !is_meta_match(video, &tags) || !write_for_video(video, entry, config) {
                continue;
            }
            if !video.downloaded {
                video.mark_downloaded();
                newly_downloaded += 1;
            }
        }
    }

    Ok(newly_downloaded)
}
