use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use crate::infra::catalog::ReleaseEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Movie,
    Episode,
}

/// Episode number(s) carried by a filename or release name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeSpec {
    Single(u32),
    Multiple(BTreeSet<u32>),
}

impl EpisodeSpec {
    /// Collapses a parsed list to `Single` when it holds exactly one number.
    pub fn from_numbers(numbers: impl IntoIterator<Item = u32>) -> Option<Self> {
        let set: BTreeSet<u32> = numbers.into_iter().collect();
        match set.len() {
            0 => None,
            1 => set.into_iter().next().map(EpisodeSpec::Single),
            _ => Some(EpisodeSpec::Multiple(set)),
        }
    }

    pub fn numbers(&self) -> BTreeSet<u32> {
        match self {
            EpisodeSpec::Single(n) => BTreeSet::from([*n]),
            EpisodeSpec::Multiple(set) => set.clone(),
        }
    }

    pub fn contains(&self, number: u32) -> bool {
        match self {
            EpisodeSpec::Single(n) => *n == number,
            EpisodeSpec::Multiple(set) => set.contains(&number),
        }
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, EpisodeSpec::Multiple(_))
    }
}

/// Raw output of the metadata extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaMeta {
    pub title: String,
    pub kind: MediaKind,
    pub season: Option<u32>,
    pub episode: Option<EpisodeSpec>,
    pub date: Option<NaiveDate>,
    pub year: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct VideoMeta {
    pub filename: PathBuf,
    pub title: String,
    pub kind: MediaKind,
    pub season: u32,
    pub episode: Option<EpisodeSpec>,
    pub date: Option<NaiveDate>,
    pub downloaded: bool,
}

impl VideoMeta {
    pub fn mark_downloaded(&mut self) {
        self.downloaded = true;
    }
}

/// Matching-relevant metadata of a release or of one entry inside a pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTags {
    pub kind: MediaKind,
    pub season: u32,
    pub episode: Option<EpisodeSpec>,
    pub date: Option<NaiveDate>,
}

impl ReleaseTags {
    pub fn from_meta(meta: &MediaMeta) -> Self {
        Self {
            kind: meta.kind,
            season: meta.season.unwrap_or(1),
            episode: meta.episode.clone(),
            date: meta.date,
        }
    }

    /// An episode release with no single resolvable episode number.
    pub fn is_season_pack(&self) -> bool {
        self.kind == MediaKind::Episode
            && self.episode.as_ref().map_or(true, EpisodeSpec::is_multiple)
    }
}

#[derive(Debug, Clone)]
pub struct SubtitleCandidate {
    pub release_name: String,
    pub filename: String,
    /// `None` when the match policy decides membership from the name alone.
    pub tags: Option<ReleaseTags>,
    pub is_season_pack: bool,
    pub source: ReleaseEntry,
}

/// title -> season -> videos
pub type MatchGroup = HashMap<String, HashMap<u32, Vec<VideoMeta>>>;

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(kind: MediaKind, episode: Option<EpisodeSpec>) -> ReleaseTags {
        ReleaseTags {
            kind,
            season: 1,
            episode,
            date: None,
        }
    }

    #[test]
    fn test_from_numbers_collapses_single() {
        assert_eq!(EpisodeSpec::from_numbers([4]), Some(EpisodeSpec::Single(4)));
        assert_eq!(EpisodeSpec::from_numbers([4, 4]), Some(EpisodeSpec::Single(4)));
        assert_eq!(EpisodeSpec::from_numbers(Vec::new()), None);
        assert_eq!(
            EpisodeSpec::from_numbers([2, 1]),
            Some(EpisodeSpec::Multiple(BTreeSet::from([1, 2])))
        );
    }

    #[test]
    fn test_season_pack_flag() {
        assert!(tags(MediaKind::Episode, None).is_season_pack());
        assert!(tags(MediaKind::Episode, EpisodeSpec::from_numbers([1, 2])).is_season_pack());
        assert!(!tags(MediaKind::Episode, Some(EpisodeSpec::Single(3))).is_season_pack());
        assert!(!tags(MediaKind::Movie, None).is_season_pack());
    }
}
