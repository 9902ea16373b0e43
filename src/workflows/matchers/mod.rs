use crate::cli::MatchMode;
use crate::domain::models::{SubtitleCandidate, VideoMeta};

/// Decides whether a release belongs to a video.
pub trait Matcher {
    fn is_match(&self, video: &VideoMeta, candidate: &SubtitleCandidate) -> bool;

    /// Whether larger seasons should try season packs before per-video releases.
    fn uses_season_packs(&self) -> bool {
        false
    }
}

pub fn for_mode(mode: &MatchMode) -> Box<dyn Matcher> {
    match mode {
        MatchMode::Auto => Box::new(auto::MetadataMatcher),
        MatchMode::SingleSessionEpisode => Box::new(episode_token::EpisodeTokenMatcher),
    }
}

pub mod auto;
pub mod episode_token;
