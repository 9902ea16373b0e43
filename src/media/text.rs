use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static DASH_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[\u{2013}\u{2014}\u{3161}\u{1173}\u{FFDA}]").unwrap());

static DOT_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[\u{00B7}\u{2000}-\u{206F}\u{22C5}\u{318D}]").unwrap());

/// Canonicalizes release and file names before metadata extraction.
///
/// NFKD decomposition, then dash-like code points become `-` and middle dots
/// (plus the General Punctuation block) become `.`. Dashes are replaced first
/// because U+2013/U+2014 also sit inside the punctuation block.
pub fn clean_chars(text: &str) -> String {
    let decomposed: String = text.nfkd().collect();
    let dashed = DASH_LIKE.replace_all(&decomposed, "-");
    DOT_LIKE.replace_all(&dashed, ".").into_owned()
}

/// Grouping key for titles: visually equivalent strings compare equal.
pub fn normalize_title(title: &str) -> String {
    title.nfkd().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_chars_replaces_dashes_and_dots() {
        assert_eq!(clean_chars("Show \u{2013} Part"), "Show - Part");
        assert_eq!(clean_chars("Show\u{00B7}S01E01"), "Show.S01E01");
        assert_eq!(clean_chars("Show\u{2022}S01"), "Show.S01");
    }

    #[test]
    fn test_normalize_title_groups_equivalent_forms() {
        let composed = "Am\u{00E9}lie";
        let decomposed = "Ame\u{0301}lie";
        assert_ne!(composed, decomposed);
        assert_eq!(normalize_title(composed), normalize_title(decomposed));
    }
}
