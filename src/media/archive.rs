use std::io::{Cursor, Read};
use std::path::Path;

use crate::error::DownloadError;
use crate::media::extensions::is_subtitle;

/// One subtitle file pulled out of a release archive.
#[derive(Debug, Clone)]
pub struct SubtitleEntry {
    /// File name inside the archive, without any directory part.
    pub name: String,
    /// Extension including the leading dot, as found in the archive.
    pub extension: String,
    pub data: Vec<u8>,
}

/// Reads every entry with a recognized subtitle extension.
///
/// Entries are returned in archive order. An archive without a single subtitle
/// entry is rejected so the caller can report it like any other bad archive.
pub fn extract_subtitles(bytes: &[u8]) -> Result<Vec<SubtitleEntry>, DownloadError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut entries = Vec::new();

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        if file.is_dir() {
            continue;
        }

        let full_name = file.name().replace('\\', "/");
        let name = full_name.rsplit('/').next().unwrap_or(&full_name).to_string();
        let path = Path::new(&name);
        if !is_subtitle(path) {
            continue;
        }
        let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        let extension = format!(".{extension}");

        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| DownloadError::Archive(format!("{name}: {e}")))?;

        entries.push(SubtitleEntry {
            name,
            extension,
            data,
        });
    }

    if entries.is_empty() {
        return Err(DownloadError::Archive("no subtitle entries".to_string()));
    }

    Ok(entries)
}
