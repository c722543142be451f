//! Title normalization shared by catalog names and file names

use regex::Regex;
use std::sync::LazyLock;

static SQUARE_TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\[.*?\]").unwrap());
static ROUND_TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\(.*?\)").unwrap());
static CURLY_TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*?\}").unwrap());

const STOP_WORDS: &[&str] = &["the", "a", "an", "of", "in", "on", "at", "to", "for"];

/// Canonicalize a title for comparison.
///
/// Drops bracketed annotations such as `(USA)` or `[!]`, folds punctuation,
/// lower-cases, and removes short filler words. Applying it twice gives the
/// same result as applying it once.
pub fn normalize(title: &str) -> String {
    let stripped = SQUARE_TAGS.replace_all(title, "");
    let stripped = ROUND_TAGS.replace_all(&stripped, "");
    let stripped = CURLY_TAGS.replace_all(&stripped, "");

    let mut folded = String::with_capacity(stripped.len());
    for c in stripped.chars() {
        match c {
            ':' | '\'' | '!' | '.' | ',' => {}
            '-' | '_' => folded.push(' '),
            '&' => folded.push_str("and"),
            _ => folded.push(c),
        }
    }

    folded
        .to_lowercase()
        .split_whitespace()
        .filter(|word| !STOP_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_region_and_dump_tags() {
        assert_eq!(normalize("Super Mario Bros. 3 (USA) [!]"), "super mario bros 3");
        assert_eq!(normalize("Chrono Trigger (USA)"), "chrono trigger");
        assert_eq!(normalize("Pokemon Red (U) (Rev 1) {SGB}"), "pokemon red");
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            normalize("Castlevania: Symphony of the Night"),
            "castlevania symphony night"
        );
        assert_eq!(normalize("Link's Awakening"), "links awakening");
        assert_eq!(normalize("Sonic & Knuckles"), "sonic and knuckles");
        assert_eq!(normalize("Mega_Man-X"), "mega man x");
        assert_eq!(normalize("Yoshi!"), "yoshi");
    }

    #[test]
    fn test_stop_words_removed() {
        assert_eq!(normalize("The Legend of Zelda"), "legend zelda");
        assert_eq!(normalize("A Boy and His Blob"), "boy and his blob");
        assert_eq!(normalize("the"), "");
    }

    #[test]
    fn test_tags_are_non_greedy() {
        assert_eq!(normalize("Tetris (USA) DX (Rev A)"), "tetris dx");
        assert_eq!(normalize("F-Zero [b1] X [h2]"), "f zero x");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "Super Mario Bros. 3 (USA) [!]",
            "((nested)) leftovers)",
            "[unclosed (x) tail",
            "a(b[c)d]e{f}g",
            "Sonic & Knuckles: The Ride!",
            "  spaced   out   ",
            "line\n(break\n) here",
            "",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
        }
    }
}
