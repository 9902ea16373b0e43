use chrono::NaiveDate;
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

use crate::domain::models::{EpisodeSpec, MediaKind, MediaMeta};
use crate::media::extensions::strip_known_extension;
use crate::media::text::clean_chars;

static SXXEYY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bS(\d{1,2})\s?E(\d{1,3})((?:-?E\d{1,3}|-\d{1,3})*)\b").unwrap()
});
static EPISODE_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(-)?E?(\d{1,3})").unwrap());
static NXNN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})x(\d{2,3})\b").unwrap());
static VERBOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bSeason\s?(\d{1,2})\s?Episode\s?(\d{1,3})\b").unwrap()
});
static SEASON_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:S|Season\s?)(\d{1,2})\b").unwrap());
static EPISODE_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:E|Ep|Episode)\s?(\d{1,3})\b").unwrap());
static ABSOLUTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s-\s(\d{1,4})\b").unwrap());
static DATE_YMD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b((?:19|20)\d{2})[ -](\d{1,2})[ -](\d{1,2})\b").unwrap()
});
static DATE_DMY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})[ -](\d{1,2})[ -]((?:19|20)\d{2})\b").unwrap()
});
static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").unwrap());
static TRAILING_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s\(?((?:19|20)\d{2})\)?$").unwrap());
static QUALITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:2160p|1080p|720p|576p|480p|4k|uhd|bluray|blu-ray|bdrip|brrip|web|webrip|web-dl|webdl|hdtv|dvdrip|hdrip|x264|x265|h264|h265|hevc|xvid|remux|proper|repack|extended|unrated)\b",
    )
    .unwrap()
});
static BRACKETED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\[(][^\])]*[\])]").unwrap());
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// How ambiguous numbers are read.
#[derive(Debug, Clone, Copy)]
pub struct GuessOptions {
    /// `2019.05.04` is year-month-day; day-first dates are only tried when false.
    pub date_year_first: bool,
    /// Read a bare ` - 05` after the title as an episode number.
    pub prefer_number: bool,
}

impl Default for GuessOptions {
    fn default() -> Self {
        Self {
            date_year_first: true,
            prefer_number: true,
        }
    }
}

struct Marker {
    start: usize,
    season: Option<u32>,
    episode: Option<EpisodeSpec>,
}

fn number(caps: &Captures, index: usize) -> Option<u32> {
    caps.get(index).and_then(|m| m.as_str().parse().ok())
}

/// `E01E02` lists episodes, `E01-E03` and `E01-03` are inclusive ranges.
fn parse_episode_list(first: u32, tail: &str) -> Option<EpisodeSpec> {
    let mut episodes = vec![first];
    let mut previous = first;
    for caps in EPISODE_PART.captures_iter(tail) {
        let Some(n) = number(&caps, 2) else {
            continue;
        };
        if caps.get(1).is_some() && n > previous && n - previous <= 100 {
            episodes.extend(previous + 1..=n);
        } else {
            episodes.push(n);
        }
        previous = n;
    }
    EpisodeSpec::from_numbers(episodes)
}

fn find_marker(spaced: &str, options: &GuessOptions) -> Option<Marker> {
    if let Some(caps) = SXXEYY.captures(spaced) {
        let first = number(&caps, 2)?;
        let tail = caps.get(3).map_or("", |m| m.as_str());
        return Some(Marker {
            start: caps.get(0)?.start(),
            season: number(&caps, 1),
            episode: parse_episode_list(first, tail),
        });
    }

    for re in [&*NXNN, &*VERBOSE] {
        if let Some(caps) = re.captures(spaced) {
            return Some(Marker {
                start: caps.get(0)?.start(),
                season: number(&caps, 1),
                episode: number(&caps, 2).map(EpisodeSpec::Single),
            });
        }
    }

    if let Some(caps) = SEASON_ONLY.captures(spaced) {
        let season_match = caps.get(0)?;
        // `Show S2 - 05` and `Show S01 Ep05` carry the episode after the season.
        let episode = find_episode_only(&spaced[season_match.end()..], options)
            .and_then(|caps| number(&caps, 1))
            .map(EpisodeSpec::Single);
        return Some(Marker {
            start: season_match.start(),
            season: number(&caps, 1),
            episode,
        });
    }

    if let Some(caps) = find_episode_only(spaced, options) {
        return Some(Marker {
            start: caps.get(0)?.start(),
            season: None,
            episode: number(&caps, 1).map(EpisodeSpec::Single),
        });
    }

    None
}

fn find_episode_only<'t>(text: &'t str, options: &GuessOptions) -> Option<Captures<'t>> {
    EPISODE_ONLY.captures(text).or_else(|| {
        options
            .prefer_number
            .then(|| ABSOLUTE.captures(text))
            .flatten()
    })
}

fn find_date(spaced: &str, options: &GuessOptions) -> Option<(usize, NaiveDate)> {
    let ymd = DATE_YMD.captures_iter(spaced).find_map(|caps| {
        let date = NaiveDate::from_ymd_opt(
            number(&caps, 1)? as i32,
            number(&caps, 2)?,
            number(&caps, 3)?,
        )?;
        Some((caps.get(0)?.start(), date))
    });
    if ymd.is_some() || options.date_year_first {
        return ymd;
    }

    DATE_DMY.captures_iter(spaced).find_map(|caps| {
        let date = NaiveDate::from_ymd_opt(
            number(&caps, 3)? as i32,
            number(&caps, 2)?,
            number(&caps, 1)?,
        )?;
        Some((caps.get(0)?.start(), date))
    })
}

fn clean_title(raw: &str) -> String {
    let without_groups = BRACKETED.replace_all(raw, " ");
    SPACES
        .replace_all(&without_groups, " ")
        .trim_matches(|c: char| c.is_whitespace() || c == '-')
        .to_string()
}

/// Splits a trailing `2005` or `(2005)` off an episode title.
fn split_trailing_year(title: &str) -> (String, Option<u32>) {
    let Some(caps) = TRAILING_YEAR.captures(title) else {
        return (title.to_string(), None);
    };
    let year = number(&caps, 1);
    let start = caps.get(0).map_or(title.len(), |m| m.start());
    (clean_title(&title[..start]), year)
}

/// Drops bracketed groups but keeps a bracketed year as plain text.
fn unwrap_bracketed_years(text: &str) -> String {
    BRACKETED
        .replace_all(text, |caps: &Captures| {
            let inner = &caps[0][1..caps[0].len() - 1];
            if inner.len() == 4 && YEAR.is_match(inner) {
                format!(" {inner}")
            } else {
                " ".to_string()
            }
        })
        .into_owned()
}

/// Extracts metadata from an already-cleaned name.
pub fn guess(text: &str, options: &GuessOptions) -> MediaMeta {
    let name = strip_known_extension(text.trim());
    let spaced = name.replace(['.', '_'], " ");

    let marker = find_marker(&spaced, options);
    let date = find_date(&spaced, options);

    let meta = if marker.is_some() || date.is_some() {
        let cut = [
            marker.as_ref().map(|m| m.start),
            date.as_ref().map(|(start, _)| *start),
        ]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(spaced.len());
        let before_year = unwrap_bracketed_years(&spaced[..cut]);
        let (title, year) = split_trailing_year(&clean_title(&before_year));
        let (season, episode) = marker.map_or((None, None), |m| (m.season, m.episode));
        MediaMeta {
            title,
            kind: MediaKind::Episode,
            season,
            episode,
            date: date.map(|(_, d)| d),
            year,
        }
    } else {
        let unbracketed = unwrap_bracketed_years(&spaced);
        let text = unbracketed.trim_start();
        let year = YEAR
            .captures_iter(text)
            .find(|caps| caps.get(0).is_some_and(|m| m.start() > 0));
        let cut = year
            .as_ref()
            .and_then(|caps| caps.get(0))
            .map(|m| m.start())
            .or_else(|| QUALITY.find(text).map(|m| m.start()))
            .unwrap_or(text.len());
        MediaMeta {
            title: clean_title(&text[..cut]),
            kind: MediaKind::Movie,
            season: None,
            episode: None,
            date: None,
            year: year.as_ref().and_then(|caps| number(caps, 1)),
        }
    };

    debug!(
        name = name,
        title = %meta.title,
        kind = ?meta.kind,
        season = ?meta.season,
        episode = ?meta.episode,
        date = ?meta.date,
        year = ?meta.year,
        "Extracted metadata"
    );

    meta
}

/// Extracts metadata from a file path.
///
/// The file name is parsed; when it carries no title (e.g. `S01E01.mkv`) the
/// nearest ancestor directory that yields one supplies it.
pub fn guess_path(path: &Path, options: &GuessOptions) -> MediaMeta {
    let name = path
        .file_name()
        .map(|n| clean_chars(&n.to_string_lossy()))
        .unwrap_or_default();
    let mut meta = guess(&name, options);

    if meta.title.is_empty() {
        for ancestor in path.ancestors().skip(1).take(2) {
            let Some(dir_name) = ancestor.file_name() else {
                break;
            };
            let title = guess(&clean_chars(&dir_name.to_string_lossy()), options).title;
            if !title.is_empty() {
                meta.title = title;
                break;
            }
        }
    }

    meta
}
