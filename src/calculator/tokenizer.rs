//! Candidate extraction from OCR text.
//!
//! Splits recognized text into lines and pulls out substrings that look like
//! numbers, then runs a cleanup pass over each one to undo the usual OCR
//! damage (stray spaces, doubled or trailing separators, `.` read as `,`).

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use super::separators::{Separator, SeparatorConfig};

lazy_static! {
    /// Letters and currency glyphs removed from a line before scanning.
    static ref LINE_NOISE: Regex = Regex::new(r"[A-Za-z$€£¥₹]+").unwrap();

    /// A signed number: digit run, 3-digit groups, optional trailing fraction.
    /// The `\b` keeps `1,2345` from being cut after `,234`.
    static ref NUMBER_RUN: Regex = Regex::new(
        r"-?[0-9]+(?:[.,][0-9]{3}\b)*(?:[.,][0-9]+)?"
    ).unwrap();

    /// Same as `NUMBER_RUN`, but a space may also join 3-digit groups.
    static ref NUMBER_RUN_SPACED: Regex = Regex::new(
        r"-?[0-9]+(?:[., ][0-9]{3}\b)*(?:[.,][0-9]+)?"
    ).unwrap();

    /// Everything a row-mode line is stripped of.
    static ref ROW_NOISE: Regex = Regex::new(r"[^0-9.,\-]").unwrap();

    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    /// Two or more separators in a row; the first one is kept.
    static ref SEPARATOR_RUN: Regex = Regex::new(r"([.,])[.,]+").unwrap();

    /// A lone `.` sitting inside a comma-grouped run, e.g. `1.234,567`.
    static ref MISREAD_GROUP: Regex = Regex::new(r"\.([0-9]{3},[0-9]{3})\b").unwrap();
}

/// Extract candidate tokens from recognized text.
///
/// In row mode every non-empty line yields exactly one token; otherwise each
/// line is scanned for any number of tokens. Order is top-to-bottom,
/// left-to-right. An empty result is not an error.
pub fn tokenize(text: &str, config: &SeparatorConfig, row_mode: bool) -> Vec<String> {
    let mut tokens = Vec::new();

    for line in text.split(['\r', '\n']).map(str::trim).filter(|l| !l.is_empty()) {
        trace!(line, row_mode, "tokenizing line");

        if row_mode {
            let stripped = ROW_NOISE.replace_all(line, "");
            let token = clean_token(&stripped, config);
            if !token.is_empty() {
                tokens.push(token);
            }
            continue;
        }

        let cleaned = LINE_NOISE.replace_all(line, "");
        let pattern = if config.thousand_separator == Separator::Space {
            &*NUMBER_RUN_SPACED
        } else {
            &*NUMBER_RUN
        };

        tokens.extend(
            pattern
                .find_iter(cleaned.trim())
                .map(|m| clean_token(m.as_str(), config))
                .filter(|t| !t.is_empty()),
        );
    }

    tokens
}

/// OCR cleanup for a single candidate.
pub fn clean_token(raw: &str, config: &SeparatorConfig) -> String {
    let no_spaces = WHITESPACE.replace_all(raw, "");
    let collapsed = SEPARATOR_RUN.replace_all(&no_spaces, "$1");
    let trimmed = collapsed.trim_end_matches(['.', ',']);

    // `1.234,567` in a comma-grouped locale is almost always a misread comma.
    if config.thousand_separator != Separator::Period
        && trimmed.matches('.').count() == 1
        && MISREAD_GROUP.is_match(trimmed)
    {
        return MISREAD_GROUP.replace(trimmed, ",$1").into_owned();
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> SeparatorConfig {
        SeparatorConfig::default()
    }

    #[test]
    fn test_no_numbers_is_empty() {
        assert!(tokenize("hello world", &english(), false).is_empty());
        assert!(tokenize("", &english(), false).is_empty());
        assert!(tokenize("\n\r\n  \n", &english(), true).is_empty());
    }

    #[test]
    fn test_scan_multiple_per_line() {
        let tokens = tokenize("Total $1,234.50 and €99\nTax: 12.5", &english(), false);
        assert_eq!(tokens, vec!["1,234.50", "99", "12.5"]);
    }

    #[test]
    fn test_scan_keeps_sign_and_groups() {
        let tokens = tokenize("-1.234.567,89 EUR", &english(), false);
        assert_eq!(tokens, vec!["-1.234.567,89"]);
    }

    #[test]
    fn test_scan_does_not_split_long_fraction() {
        assert_eq!(tokenize("1,2345", &english(), false), vec!["1,2345"]);
    }

    #[test]
    fn test_crlf_lines() {
        let tokens = tokenize("10\r\n20\r\n\r\n30\r40", &english(), false);
        assert_eq!(tokens, vec!["10", "20", "30", "40"]);
    }

    #[test]
    fn test_row_mode_one_token_per_line() {
        let text = "Item A   1,234.50 USD\n  \nItem B 2 000\n";
        let tokens = tokenize(text, &english(), true);
        assert_eq!(tokens, vec!["1,234.50", "2000"]);
    }

    #[test]
    fn test_row_mode_does_not_split_separators() {
        let tokens = tokenize("1.2.3,4", &english(), true);
        assert_eq!(tokens, vec!["1.2.3,4"]);
    }

    #[test]
    fn test_space_grouping_when_configured() {
        let config = SeparatorConfig::new(Separator::Space, Separator::Comma);
        assert_eq!(tokenize("1 234 567,5", &config, false), vec!["1234567,5"]);
        assert_eq!(tokenize("1 234", &english(), false), vec!["1", "234"]);
    }

    #[test]
    fn test_cleanup_collapses_and_trims() {
        assert_eq!(clean_token("1,,234", &english()), "1,234");
        assert_eq!(clean_token("1.,234", &english()), "1.234");
        assert_eq!(clean_token("42.", &english()), "42");
        assert_eq!(clean_token("4 2 0", &english()), "420");
    }

    #[test]
    fn test_cleanup_rewrites_misread_group() {
        assert_eq!(clean_token("1.234,567", &english()), "1,234,567");
        assert_eq!(clean_token("12.345,678.9", &english()), "12.345,678.9");
        assert_eq!(clean_token("1.234,567", &SeparatorConfig::european()), "1.234,567");
        assert_eq!(clean_token("1.234,56", &english()), "1.234,56");
    }
}
