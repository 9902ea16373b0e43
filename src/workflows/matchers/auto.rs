use super::Matcher;
use crate::domain::models::{EpisodeSpec, MediaKind, ReleaseTags, SubtitleCandidate, VideoMeta};

pub struct MetadataMatcher;

impl Matcher for MetadataMatcher {
    fn is_match(&self, video: &VideoMeta, candidate: &SubtitleCandidate) -> bool {
        candidate
            .tags
            .as_ref()
            .is_some_and(|tags| is_meta_match(video, tags))
    }

    fn uses_season_packs(&self) -> bool {
        true
    }
}

fn same_date(video: &VideoMeta, tags: &ReleaseTags) -> bool {
    matches!((video.date, tags.date), (Some(a), Some(b)) if a == b)
}

/// Metadata equality between a video and a release (or a pack entry).
///
/// Movies always match movies. Episodes of the same season compare episode
/// numbers, falling back to air dates when either side has no number. Episodes
/// of different seasons only match on equal air dates.
pub fn is_meta_match(video: &VideoMeta, tags: &ReleaseTags) -> bool {
    match (video.kind, tags.kind) {
        (MediaKind::Movie, MediaKind::Movie) => true,
        (MediaKind::Episode, MediaKind::Episode) if video.season == tags.season => {
            match (&video.episode, &tags.episode) {
                (Some(EpisodeSpec::Multiple(wanted)), Some(offered)) => {
                    !wanted.is_disjoint(&offered.numbers())
                }
                (Some(EpisodeSpec::Single(wanted)), Some(offered)) => offered.contains(*wanted),
                _ => same_date(video, tags),
            }
        }
        (MediaKind::Episode, MediaKind::Episode) => same_date(video, tags),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn video(kind: MediaKind, season: u32, episode: Option<EpisodeSpec>) -> VideoMeta {
        VideoMeta {
            filename: PathBuf::from("/tv/video.mkv"),
            title: "Show".to_string(),
            kind,
            season,
            episode,
            date: None,
            downloaded: false,
        }
    }

    fn tags(kind: MediaKind, season: u32, episode: Option<EpisodeSpec>) -> ReleaseTags {
        ReleaseTags {
            kind,
            season,
            episode,
            date: None,
        }
    }

    fn list(numbers: &[u32]) -> Option<EpisodeSpec> {
        Some(EpisodeSpec::Multiple(numbers.iter().copied().collect::<BTreeSet<_>>()))
    }

    #[test]
    fn test_movies_always_match() {
        let mut movie = video(MediaKind::Movie, 1, None);
        movie.date = NaiveDate::from_ymd_opt(2020, 1, 1);
        assert!(is_meta_match(
            &movie,
            &tags(MediaKind::Movie, 4, Some(EpisodeSpec::Single(9)))
        ));
    }

    #[test]
    fn test_mixed_kinds_never_match() {
        let episode = video(MediaKind::Episode, 1, Some(EpisodeSpec::Single(1)));
        assert!(!is_meta_match(&episode, &tags(MediaKind::Movie, 1, None)));
        let movie = video(MediaKind::Movie, 1, None);
        assert!(!is_meta_match(
            &movie,
            &tags(MediaKind::Episode, 1, Some(EpisodeSpec::Single(1)))
        ));
    }

    #[test]
    fn test_single_episode_numbers() {
        let v = video(MediaKind::Episode, 1, Some(EpisodeSpec::Single(3)));
        assert!(is_meta_match(
            &v,
            &tags(MediaKind::Episode, 1, Some(EpisodeSpec::Single(3)))
        ));
        assert!(!is_meta_match(
            &v,
            &tags(MediaKind::Episode, 1, Some(EpisodeSpec::Single(4)))
        ));
        assert!(!is_meta_match(
            &v,
            &tags(MediaKind::Episode, 2, Some(EpisodeSpec::Single(3)))
        ));
    }

    #[test]
    fn test_episode_lists() {
        let v = video(MediaKind::Episode, 1, list(&[1, 2]));
        assert!(is_meta_match(
            &v,
            &tags(MediaKind::Episode, 1, Some(EpisodeSpec::Single(2)))
        ));
        assert!(!is_meta_match(
            &v,
            &tags(MediaKind::Episode, 1, Some(EpisodeSpec::Single(5)))
        ));
        assert!(is_meta_match(&v, &tags(MediaKind::Episode, 1, list(&[2, 3]))));

        let single = video(MediaKind::Episode, 1, Some(EpisodeSpec::Single(4)));
        assert!(is_meta_match(&single, &tags(MediaKind::Episode, 1, list(&[3, 4]))));
        assert!(!is_meta_match(&single, &tags(MediaKind::Episode, 1, list(&[5, 6]))));
    }

    #[test]
    fn test_missing_episode_needs_equal_dates() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 7);
        let mut v = video(MediaKind::Episode, 1, None);
        let mut t = tags(MediaKind::Episode, 1, Some(EpisodeSpec::Single(1)));
        assert!(!is_meta_match(&v, &t));

        v.date = date;
        t.date = date;
        assert!(is_meta_match(&v, &t));

        t.date = NaiveDate::from_ymd_opt(2026, 1, 8);
        assert!(!is_meta_match(&v, &t));
    }

    #[test]
    fn test_different_season_matches_only_on_date() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 7);
        let mut v = video(MediaKind::Episode, 2026, Some(EpisodeSpec::Single(5)));
        let mut t = tags(MediaKind::Episode, 1, Some(EpisodeSpec::Single(5)));
        assert!(!is_meta_match(&v, &t));

        v.date = date;
        t.date = date;
        assert!(is_meta_match(&v, &t));
    }

    #[test]
    fn test_matcher_requires_tags() {
        let v = video(MediaKind::Movie, 1, None);
        let candidate = SubtitleCandidate {
            release_name: "Movie.2019".to_string(),
            filename: "Movie.2019".to_string(),
            tags: None,
            is_season_pack: false,
            source: crate::workflows::testing::release("movie", 1, "Movie.2019", "English"),
        };
        assert!(!MetadataMatcher.is_match(&v, &candidate));
    }
}
