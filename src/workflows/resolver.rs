use tracing::debug;

use crate::cli::MatchMode;
use crate::config::RunConfig;
use crate::domain::models::{ReleaseTags, SubtitleCandidate};
use crate::error::{CatalogError, LookupError};
use crate::infra::catalog::{Catalog, ReleaseEntry};
use crate::media::guess::{guess, GuessOptions};
use crate::media::text::clean_chars;
use crate::workflows::fuzzy::extract_one;

/// Title similarity must be strictly above this.
pub const TITLE_THRESHOLD: f64 = 90.0;
/// Season similarity must be strictly above this.
pub const SEASON_THRESHOLD: f64 = 95.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTitle {
    pub link_name: String,
    /// `season-N`, or `None` for titles without seasons.
    pub season_label: Option<String>,
}

fn ensure_time_left(config: &RunConfig) -> Result<(), CatalogError> {
    if config.deadline_passed() {
        return Err(CatalogError::DeadlineExceeded);
    }
    Ok(())
}

/// Finds the catalog entry for a title and picks the season to query.
///
/// Only the single best title is considered. The requested season must match
/// an advertised one almost exactly; otherwise season 1, then season 0, is used.
pub fn resolve_title(
    catalog: &dyn Catalog,
    title: &str,
    season: u32,
    config: &RunConfig,
) -> Result<ResolvedTitle, LookupError> {
    ensure_time_left(config)?;
    let found = catalog.search_title(title)?;
    let names: Vec<&str> = found.iter().map(|t| t.title.as_str()).collect();

    let best = extract_one(title, &names);
    debug!(title = title, best = ?best, "Title search scored");
    let entry = match best {
        Some((index, score)) if score > TITLE_THRESHOLD => &found[index],
        other => {
            return Err(LookupError::TitleNotFound {
                title: title.to_string(),
                best: other.map_or(0.0, |(_, score)| score),
            })
        }
    };

    if entry.seasons.is_empty() {
        return Ok(ResolvedTitle {
            link_name: entry.link_name.clone(),
            season_label: None,
        });
    }

    let seasons: Vec<String> = entry.seasons.iter().map(|s| s.number.to_string()).collect();
    let chosen = match extract_one(&season.to_string(), &seasons) {
        Some((index, score)) if score > SEASON_THRESHOLD => seasons[index].clone(),
        _ => ["1", "0"]
            .into_iter()
            .find(|fallback| seasons.iter().any(|s| s == fallback))
            .map(str::to_string)
            .ok_or_else(|| LookupError::NoMatchingSeason {
                title: title.to_string(),
                season,
            })?,
    };

    Ok(ResolvedTitle {
        link_name: entry.link_name.clone(),
        season_label: Some(format!("season-{chosen}")),
    })
}

/// Wraps a release for matching; metadata is only extracted in `auto` mode.
pub fn build_candidate(release: ReleaseEntry, mode: &MatchMode) -> SubtitleCandidate {
    let filename = clean_chars(&release.release_name);
    let tags = match mode {
        MatchMode::SingleSessionEpisode => None,
        MatchMode::Auto => Some(ReleaseTags::from_meta(&guess(
            &filename,
            &GuessOptions::default(),
        ))),
    };
    let is_season_pack = tags.as_ref().is_some_and(ReleaseTags::is_season_pack);

    SubtitleCandidate {
        release_name: release.release_name.clone(),
        filename,
        tags,
        is_season_pack,
        source: release,
    }
}

/// Releases of a resolved title in the target language, in catalog order.
pub fn fetch_candidates(
    catalog: &dyn Catalog,
    resolved: &ResolvedTitle,
    config: &RunConfig,
) -> Result<Vec<SubtitleCandidate>, LookupError> {
    ensure_time_left(config)?;
    let releases = catalog.list_releases(&resolved.link_name, resolved.season_label.as_deref())?;
    let total = releases.len();

    let candidates: Vec<SubtitleCandidate> = releases
        .into_iter()
        .filter(|r| r.lang.eq_ignore_ascii_case(&config.language))
        .map(|r| build_candidate(r, &config.match_mode))
        .collect();

    debug!(
        link_name = %resolved.link_name,
        season = ?resolved.season_label,
        total = total,
        kept = candidates.len(),
        "Fetched releases"
    );
    Ok(candidates)
}

pub fn resolve_candidates(
    catalog: &dyn Catalog,
    title: &str,
    season: u32,
    config: &RunConfig,
) -> Result<Vec<SubtitleCandidate>, LookupError> {
    let resolved = resolve_title(catalog, title, season, config)?;
    fetch_candidates(catalog, &resolved, config)
}
