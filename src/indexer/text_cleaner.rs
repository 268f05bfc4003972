use regex::Regex;
use std::sync::LazyLock;

/// A line holding nothing but digits (page-number artifacts)
static DIGIT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[^\S\n]*\d+[^\S\n]*$").expect("valid digit-line pattern"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Normalize extracted page text before chunking
///
/// Drops non-ASCII characters, removes lines that consist only of digits,
/// collapses whitespace runs to a single space and trims. Applying it twice
/// gives the same result as applying it once.
pub fn clean_text(text: &str) -> String {
    let ascii: String = text
        .chars()
        .filter(|c| c.is_whitespace() || (' '..='~').contains(c))
        .collect();

    let without_page_numbers = DIGIT_LINE.replace_all(&ascii, "");

    WHITESPACE_RUN
        .replace_all(&without_page_numbers, " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(
            clean_text("  Squat \t deep\n\n and   drive  "),
            "Squat deep and drive"
        );
    }

    #[test]
    fn test_removes_page_number_lines() {
        let page = "Progressive overload means adding load.\n  12  \nKeep a training log.";
        assert_eq!(
            clean_text(page),
            "Progressive overload means adding load. Keep a training log."
        );
    }

    #[test]
    fn test_keeps_inline_numbers() {
        assert_eq!(clean_text("Do 3 sets of 10\nreps"), "Do 3 sets of 10 reps");
    }

    #[test]
    fn test_drops_non_ascii() {
        assert_eq!(clean_text("Caf\u{e9} protein \u{2014} 30g"), "Caf protein 30g");
    }

    #[test]
    fn test_only_artifacts_yields_empty() {
        assert_eq!(clean_text("\n 42 \n\n"), "");
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("\u{e9}\u{e8}"), "");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "Bench press\n\n\n7\nIncline   press",
            "1\u{e9}2",
            "  \u{a0}heavy\u{a0}\u{a0}singles ",
            "line one\r\n  3\r\nline two",
            "4 2",
        ];
        for input in inputs {
            let once = clean_text(input);
            assert_eq!(clean_text(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_no_double_spaces_or_outer_whitespace() {
        let cleaned = clean_text("\t Rows\n\n\n and  pull-ups \n");
        assert!(!cleaned.contains("  "));
        assert_eq!(cleaned, cleaned.trim());
    }
}
