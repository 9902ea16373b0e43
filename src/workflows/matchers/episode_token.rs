use super::Matcher;
use crate::domain::models::{SubtitleCandidate, VideoMeta};

/// Matches on an `E<n>` token in the release name, ignoring all other metadata.
pub struct EpisodeTokenMatcher;

impl Matcher for EpisodeTokenMatcher {
    fn is_match(&self, video: &VideoMeta, candidate: &SubtitleCandidate) -> bool {
        video.episode.as_ref().is_some_and(|episode| {
            episode
                .numbers()
                .into_iter()
                .any(|n| has_episode_token(&candidate.filename, n))
        })
    }
}

/// True if `name` has `E` + the episode number as a whole token.
///
/// The `E` must not continue a word and the digits must not continue into a
/// larger number, so episode 1 does not match `E10` and episode 7 does not
/// match `E17`. Leading zeros (`E07`) are accepted.
pub fn has_episode_token(name: &str, episode: u32) -> bool {
    let chars: Vec<char> = name.chars().collect();
    chars.iter().enumerate().any(|(i, c)| {
        if !c.eq_ignore_ascii_case(&'e') || (i > 0 && chars[i - 1].is_alphabetic()) {
            return false;
        }
        let digits: String = chars[i + 1..]
            .iter()
            .take_while(|d| d.is_ascii_digit())
            .collect();
        !digits.is_empty() && digits.parse::<u32>() == Ok(episode)
    })
}
