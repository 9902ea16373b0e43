use rapidfuzz::fuzz;
use std::collections::BTreeSet;

fn process(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    replaced
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    fuzz::ratio(a.chars(), b.chars()) * 100.0
}

fn partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long): (Vec<char>, Vec<char>) = if a.chars().count() <= b.chars().count() {
        (a.chars().collect(), b.chars().collect())
    } else {
        (b.chars().collect(), a.chars().collect())
    };
    if short.is_empty() {
        return 0.0;
    }

    let mut best = 0.0_f64;
    for window in long.windows(short.len()) {
        let score = fuzz::ratio(short.iter().copied(), window.iter().copied()) * 100.0;
        best = best.max(score);
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn token_sort(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

struct TokenSets {
    common: String,
    only_a: String,
    only_b: String,
}

fn token_sets(a: &str, b: &str) -> TokenSets {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    let join = |set: Vec<&str>| set.join(" ");
    TokenSets {
        common: join(tokens_a.intersection(&tokens_b).copied().collect()),
        only_a: join(tokens_a.difference(&tokens_b).copied().collect()),
        only_b: join(tokens_b.difference(&tokens_a).copied().collect()),
    }
}

fn token_set_ratio(a: &str, b: &str) -> f64 {
    let sets = token_sets(a, b);
    let with_a = format!("{} {}", sets.common, sets.only_a).trim().to_string();
    let with_b = format!("{} {}", sets.common, sets.only_b).trim().to_string();

    let mut best = ratio(&with_a, &with_b);
    if !sets.common.is_empty() {
        best = best
            .max(ratio(&sets.common, &with_a))
            .max(ratio(&sets.common, &with_b));
    }
    best
}

/// Any shared token is a perfect partial match.
fn partial_token_ratio(a: &str, b: &str) -> f64 {
    let sets = token_sets(a, b);
    if !sets.common.is_empty() {
        return 100.0;
    }
    partial_ratio(&token_sort(a), &token_sort(b)).max(partial_ratio(&sets.only_a, &sets.only_b))
}

/// WRatio-style score, rounded to a whole number like the reference scorer.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = process(a);
    let b = process(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let base = ratio(&a, &b);
    let (len_a, len_b) = (a.chars().count() as f64, b.chars().count() as f64);
    let length_ratio = len_a.max(len_b) / len_a.min(len_b);

    let score = if length_ratio < 1.5 {
        let token_score = ratio(&token_sort(&a), &token_sort(&b)).max(token_set_ratio(&a, &b));
        base.max(token_score * 0.95)
    } else {
        let scale = if length_ratio <= 8.0 { 0.9 } else { 0.6 };
        base.max(partial_ratio(&a, &b) * scale)
            .max(partial_token_ratio(&a, &b) * 0.95 * scale)
    };
    score.round()
}

/// Index and score of the best choice. Ties keep the earliest choice.
pub fn extract_one<S: AsRef<str>>(query: &str, choices: &[S]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (index, choice) in choices.iter().enumerate() {
        let score = similarity(query, choice.as_ref());
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((index, score));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_after_processing() {
        assert_eq!(similarity("Breaking Bad", "breaking.bad"), 100.0);
        assert_eq!(similarity("Mr. Robot", "mr robot"), 100.0);
    }

    #[test]
    fn test_scores_are_indel_based_and_rounded() {
        // Levenshtein would give 0 for a transposition; indel keeps one shared char.
        assert_eq!(similarity("ab", "ba"), 50.0);
        // 2 * 2 / 6 = 66.67
        assert_eq!(similarity("abc", "abd"), 67.0);
    }

    #[test]
    fn test_uneven_lengths_use_partial_token_match() {
        assert_eq!(similarity("Show", "Show Name Returns"), 90.0);

        // Shared tokens out of order: 100 * 0.95 * 0.9, beating every aligned window
        let score = similarity("Name Show", "Show is the Name here");
        assert!((85.0..=86.0).contains(&score));
    }

    #[test]
    fn test_subset_title_scores_high() {
        assert!(similarity("The Office", "The Office US") > 90.0);
    }

    #[test]
    fn test_unrelated_titles_score_low() {
        assert!(similarity("Breaking Bad", "Better Call Saul") < 60.0);
        assert_eq!(similarity("", "anything"), 0.0);
    }

    #[test]
    fn test_extract_one_prefers_first_on_tie() {
        let choices = ["Show", "Other Thing", "Show"];
        assert_eq!(extract_one("Show", &choices), Some((0, 100.0)));
        assert_eq!(extract_one::<&str>("Show", &[]), None);
    }

    #[test]
    fn test_season_numbers() {
        let seasons = ["1", "2", "3"];
        assert_eq!(extract_one("2", &seasons), Some((1, 100.0)));

        // "12" only partially matches "1" and "2", well below an exact match
        let (_, score) = extract_one("12", &["1", "2"]).unwrap();
        assert!(score <= 95.0);
    }
}
