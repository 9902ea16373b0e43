use std::path::{Path, PathBuf};
use tracing::warn;

use crate::domain::models::{MatchGroup, VideoMeta};
use crate::error::ClassifyError;
use crate::media::guess::{guess_path, GuessOptions};
use crate::media::text::normalize_title;

pub fn classify_file(path: &Path) -> Result<VideoMeta, ClassifyError> {
    let meta = guess_path(path, &GuessOptions::default());
    let title = normalize_title(&meta.title);
    if title.trim().is_empty() {
        return Err(ClassifyError::MissingTitle(path.to_path_buf()));
    }

    Ok(VideoMeta {
        filename: path.to_path_buf(),
        title,
        kind: meta.kind,
        season: meta.season.unwrap_or(1),
        episode: meta.episode,
        date: meta.date,
        downloaded: false,
    })
}

/// Buckets videos by normalized title and season. Unusable files are skipped.
pub fn classify<I>(files: I) -> MatchGroup
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut groups = MatchGroup::new();
    for file in files {
        match classify_file(&file) {
            Ok(video) => groups
                .entry(video.title.clone())
                .or_default()
                .entry(video.season)
                .or_default()
                .push(video),
            Err(e) => warn!(error = %e, "Skipping file"),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{EpisodeSpec, MediaKind};

    #[test]
    fn test_groups_by_title_and_season() {
        let groups = classify(vec![
            PathBuf::from("/tv/Show.S01E01.mkv"),
            PathBuf::from("/tv/Show.S01E02.mkv"),
            PathBuf::from("/tv/Show.S02E01.mkv"),
            PathBuf::from("/tv/Other.Show.S01E01.mkv"),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups["Show"][&1].len(), 2);
        assert_eq!(groups["Show"][&2].len(), 1);
        assert_eq!(groups["Other Show"][&1].len(), 1);
    }

    #[test]
    fn test_missing_season_defaults_to_one() {
        let video = classify_file(Path::new("/movies/Movie.Title.2019.1080p.mkv")).unwrap();
        assert_eq!(video.kind, MediaKind::Movie);
        assert_eq!(video.season, 1);
        assert!(!video.downloaded);

        let video = classify_file(Path::new("/anime/[Group] Anime - 12 [1080p].mkv")).unwrap();
        assert_eq!(video.season, 1);
        assert_eq!(video.episode, Some(EpisodeSpec::Single(12)));
    }

    #[test]
    fn test_plex_style_movie_title() {
        let video = classify_file(Path::new("/m/Movie Title (2019).mkv")).unwrap();
        assert_eq!(video.title, "Movie Title");
        assert_eq!(video.kind, MediaKind::Movie);
    }

    #[test]
    fn test_season_and_absolute_number_anime() {
        let video = classify_file(Path::new("/anime/[Group] Show S2 - 05 [1080p].mkv")).unwrap();
        assert_eq!(video.title, "Show");
        assert_eq!(video.season, 2);
        assert_eq!(video.episode, Some(EpisodeSpec::Single(5)));
    }

    #[test]
    fn test_equivalent_unicode_titles_share_a_bucket() {
        let groups = classify(vec![
            PathBuf::from("/tv/Am\u{00E9}lie.S01E01.mkv"),
            PathBuf::from("/tv/Ame\u{0301}lie.S01E02.mkv"),
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.values().next().unwrap()[&1].len(), 2);
    }

    #[test]
    fn test_untitled_file_is_skipped() {
        assert!(classify_file(Path::new("S01E01.mkv")).is_err());
        assert!(classify(vec![PathBuf::from("S01E01.mkv")]).is_empty());
    }
}
