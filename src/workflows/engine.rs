use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::domain::models::{EpisodeSpec, MatchGroup, SubtitleCandidate, VideoMeta};
use crate::infra::catalog::Catalog;
use crate::workflows::download::{download_for_video, download_season_pack};
use crate::workflows::matchers::{self, Matcher};
use crate::workflows::resolver::resolve_candidates;

/// Seasons with fewer videos go straight to per-video matching.
pub const SEASON_PACK_MIN_GROUP: usize = 5;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub groups: usize,
    pub failed_lookups: usize,
    pub downloaded: usize,
    pub pending: usize,
}

fn pending_episodes(videos: &[VideoMeta]) -> BTreeSet<u32> {
    videos
        .iter()
        .filter(|v| !v.downloaded)
        .filter_map(|v| v.episode.as_ref())
        .flat_map(EpisodeSpec::numbers)
        .collect()
}

fn try_season_packs(
    catalog: &dyn Catalog,
    config: &RunConfig,
    videos: &mut [VideoMeta],
    candidates: &[SubtitleCandidate],
) {
    for pack in candidates.iter().filter(|c| c.is_season_pack) {
        if videos.iter().all(|v| v.downloaded) {
            break;
        }

        let offered = pack.tags.as_ref().and_then(|t| t.episode.as_ref());
        if let Some(EpisodeSpec::Multiple(offered)) = offered {
            if offered.is_disjoint(&pending_episodes(videos)) {
                debug!(release = %pack.release_name, "Season pack covers no pending episode");
                continue;
            }
        }

        match download_season_pack(catalog, config, pack, videos) {
            Ok(count) => info!(release = %pack.release_name, videos = count, "Season pack applied"),
            Err(e) => warn!(release = %pack.release_name, error = %e, "Season pack failed"),
        }
    }
}

/// Matches one season's videos against its candidates and downloads the winners.
///
/// Large seasons try season packs first when the matcher allows it. Every video
/// still pending afterwards takes the first matching candidate in catalog order.
/// That candidate is the only one attempted: a failed download leaves the video
/// pending rather than falling through to the next match.
pub fn process_season(
    catalog: &dyn Catalog,
    config: &RunConfig,
    matcher: &dyn Matcher,
    videos: &mut [VideoMeta],
    candidates: &[SubtitleCandidate],
) {
    if matcher.uses_season_packs() && videos.len() >= SEASON_PACK_MIN_GROUP {
        try_season_packs(catalog, config, videos, candidates);
    }

    for video in videos.iter_mut().filter(|v| !v.downloaded) {
        let Some(candidate) = candidates.iter().find(|c| matcher.is_match(video, c)) else {
            debug!(video = %video.filename.display(), "No matching release");
            continue;
        };

        match download_for_video(catalog, config, candidate, video) {
            Ok(0) => warn!(release = %candidate.release_name, "No subtitle could be written"),
            Ok(_) => {}
            Err(e) => warn!(release = %candidate.release_name, error = %e, "Download failed"),
        }
    }
}

/// Runs every (title, season) group in sorted order. Lookup failures only skip
/// their own group.
pub fn process_groups(
    catalog: &dyn Catalog,
    config: &RunConfig,
    groups: &mut MatchGroup,
) -> RunSummary {
    let matcher = matchers::for_mode(&config.match_mode);
    let mut summary = RunSummary::default();

    let mut titles: Vec<_> = groups.iter_mut().collect();
    titles.sort_by(|a, b| a.0.cmp(b.0));

    for (title, seasons) in titles {
        let mut seasons: Vec<_> = seasons.iter_mut().collect();
        seasons.sort_by_key(|(season, _)| **season);

        for (&season, videos) in seasons {
            summary.groups += 1;
            info!(title = %title, season = season, videos = videos.len(), "Processing group");

            match resolve_candidates(catalog, title, season, config) {
                Ok(candidates) => {
                    process_season(catalog, config, matcher.as_ref(), videos, &candidates)
                }
                Err(e) => {
                    warn!(title = %title, season = season, error = %e, "Catalog lookup failed");
                    summary.failed_lookups += 1;
                }
            }

            let done = videos.iter().filter(|v| v.downloaded).count();
            summary.downloaded += done;
            summary.pending += videos.len() - done;
        }
    }

    summary
}
