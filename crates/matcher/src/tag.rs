//! Match key extraction from raw tag strings.

use anchorwall_core::content::MatchKey;

/// Characters that separate tags in a raw tag string.
pub const TAG_DELIMITERS: &[char] = &[',', ';', '|', ' '];

/// First non-empty tag token, trimmed, case preserved.
///
/// `None` for empty input or input made only of delimiters and whitespace.
pub fn extract_key(raw_tags: &str) -> Option<MatchKey> {
    raw_tags
        .split(TAG_DELIMITERS)
        .map(str::trim)
        .find(|token| !token.is_empty())
        .and_then(MatchKey::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> Option<String> {
        extract_key(raw).map(|k| k.as_str().to_string())
    }

    #[test]
    fn first_token_wins() {
        assert_eq!(key("sunset, lake").as_deref(), Some("sunset"));
        assert_eq!(key("  lake|bridge").as_deref(), Some("lake"));
        assert_eq!(key("a;b;c").as_deref(), Some("a"));
        assert_eq!(key(",,;| forest").as_deref(), Some("forest"));
    }

    #[test]
    fn case_is_preserved() {
        assert_eq!(key("Beach,Sun").as_deref(), Some("Beach"));
    }

    #[test]
    fn tabs_are_trimmed_but_not_delimiters() {
        assert_eq!(key("\tpier\t,dock").as_deref(), Some("pier"));
    }

    #[test]
    fn nothing_extractable() {
        for raw in ["", "   ", ",", ";;||", " , ; | ", "\t\n"] {
            assert!(extract_key(raw).is_none(), "expected no key for {raw:?}");
        }
    }
}
