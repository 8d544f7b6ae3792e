use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bTag (\d+)\b").unwrap());

/// Rewrite German "Tag <N>" day markers in event names to "Day <N>".
pub fn translate(name: &str) -> Cow<'_, str> {
    TAG_RE.replace_all(name, "Day $1")
}

/// Applies [`translate`] when enabled, identity otherwise.
pub fn translate_if(name: &str, enabled: bool) -> String {
    if enabled {
        translate(name).into_owned()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_becomes_day() {
        assert_eq!(
            translate("NJPW G1 Climax 2019 - Tag 12"),
            "NJPW G1 Climax 2019 - Day 12"
        );
    }

    #[test]
    fn keeps_trailing_context() {
        assert_eq!(
            translate("wXw 16 Carat Gold 2020 - Tag 3 (Abend)"),
            "wXw 16 Carat Gold 2020 - Day 3 (Abend)"
        );
    }

    #[test]
    fn no_pattern_is_identity() {
        assert_eq!(translate("PROGRESS Chapter 100"), "PROGRESS Chapter 100");
        assert!(matches!(translate("PROGRESS Chapter 100"), Cow::Borrowed(_)));
    }

    #[test]
    fn case_and_word_boundary_sensitive() {
        assert_eq!(translate("tag 4"), "tag 4");
        assert_eq!(translate("Tag Team Turmoil"), "Tag Team Turmoil");
        assert_eq!(translate("Vintage 2"), "Vintage 2");
        assert_eq!(translate("Tag 12b"), "Tag 12b");
    }

    #[test]
    fn disabled_is_identity() {
        assert_eq!(translate_if("Super Sunday - Tag 2", false), "Super Sunday - Tag 2");
        assert_eq!(translate_if("Super Sunday - Tag 2", true), "Super Sunday - Day 2");
    }
}
