//! Thousand-separator / decimal-point resolution.
//!
//! OCR keeps digit counts around a separator far more reliably than it keeps
//! the separator glyph itself, so when a token does not fit the configured
//! convention exactly, the length of the trailing digit run decides what the
//! separators mean. The configuration is a fast path and a tie-breaker.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::separators::SeparatorConfig;

lazy_static! {
    /// Shape every resolved numeral must have.
    static ref CANONICAL: Regex = Regex::new(r"^-?[0-9]+(?:\.[0-9]+)?$").unwrap();
}

/// A token rewritten with `.` as decimal point and no grouping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Numeral(String);

impl Numeral {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Numeral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the matcher for tokens written exactly in the configured convention:
/// optional `-`, digits grouped in threes by the thousand separator (or not
/// grouped at all), optional decimal point and fraction.
///
/// Returns `None` when both slots hold the same symbol, since such a pattern
/// cannot tell the roles apart.
pub fn build_pattern(config: &SeparatorConfig) -> Option<Regex> {
    if config.is_ambiguous() {
        return None;
    }

    let integer = match config.thousand_separator.as_char() {
        Some(t) => {
            let t = regex::escape(&t.to_string());
            format!("(?:[0-9]{{1,3}}(?:{t}[0-9]{{3}})+|[0-9]+)")
        }
        None => "[0-9]+".to_string(),
    };
    let fraction = match config.decimal_point.as_char() {
        Some(d) => format!("(?:{}[0-9]+)?", regex::escape(&d.to_string())),
        None => String::new(),
    };

    Regex::new(&format!("^-?{integer}{fraction}$")).ok()
}

/// Resolves tokens against one separator configuration.
///
/// Build once per batch; the pattern is a pure function of the configuration.
pub struct Resolver {
    config: SeparatorConfig,
    pattern: Option<Regex>,
}

impl Resolver {
    pub fn new(config: SeparatorConfig) -> Self {
        Self {
            pattern: build_pattern(&config),
            config,
        }
    }

    pub fn config(&self) -> &SeparatorConfig {
        &self.config
    }

    /// Resolve one token, or `None` if it cannot be read as a number.
    pub fn resolve(&self, token: &str) -> Option<Numeral> {
        let token = token.trim();
        if !token.bytes().any(|b| b.is_ascii_digit()) {
            debug!(token, "dropping token without digits");
            return None;
        }

        let resolved = if self.pattern.as_ref().is_some_and(|p| p.is_match(token)) {
            self.normalize_configured(token)
        } else if self.config.decimal_point.is_disabled() {
            token
                .chars()
                .filter(|&c| !matches!(c, '.' | ',') && !self.config.thousand_separator.matches(c))
                .collect()
        } else {
            match autodetect(token, &self.config) {
                Some(resolved) => resolved,
                None => {
                    debug!(token, "autodetection rejected token");
                    return None;
                }
            }
        };

        if !CANONICAL.is_match(&resolved) {
            debug!(token, resolved, "resolved token is not a plain decimal");
            return None;
        }

        debug!(token, resolved, "resolved token");
        Some(Numeral(resolved))
    }

    fn normalize_configured(&self, token: &str) -> String {
        token
            .chars()
            .filter(|&c| !self.config.thousand_separator.matches(c))
            .map(|c| {
                if self.config.decimal_point.matches(c) {
                    '.'
                } else {
                    c
                }
            })
            .collect()
    }
}

/// Convenience wrapper for resolving a single token.
pub fn resolve(token: &str, config: &SeparatorConfig) -> Option<Numeral> {
    Resolver::new(*config).resolve(token)
}

/// Decide separator roles from the token alone.
///
/// - one separator: 1-2 trailing digits make it a decimal point; exactly 3 is
///   ambiguous and goes to whichever role the configured decimal point says;
///   anything else makes it a grouping mark.
/// - several separators with unequal `,`/`.` counts: the majority symbol
///   groups, and the minority symbol is the decimal point when it occurs once
///   as the last separator.
/// - several separators with equal counts: the last one is the decimal point
///   when 1-3 digits follow it.
fn autodetect(token: &str, config: &SeparatorConfig) -> Option<String> {
    let (sign, body) = match token.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", token),
    };
    if !body.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return None;
    }

    let separators: Vec<(usize, char)> = body
        .char_indices()
        .filter(|&(_, c)| c == '.' || c == ',')
        .collect();
    let commas = separators.iter().filter(|&&(_, c)| c == ',').count();
    let periods = separators.len() - commas;
    let trailing_digits = |pos: usize| body.len() - pos - 1;

    let decimal_at = match separators.as_slice() {
        [] => None,
        [(pos, symbol)] => match trailing_digits(*pos) {
            1 | 2 => Some(*pos),
            3 => config.decimal_point.matches(*symbol).then_some(*pos),
            _ => None,
        },
        [.., (last_pos, last_symbol)] => {
            if commas != periods {
                let (minority, minority_count) = if commas < periods {
                    (',', commas)
                } else {
                    ('.', periods)
                };
                (*last_symbol == minority && minority_count == 1).then_some(*last_pos)
            } else {
                (1..=3)
                    .contains(&trailing_digits(*last_pos))
                    .then_some(*last_pos)
            }
        }
    };

    let digits_only = |s: &str| s.chars().filter(char::is_ascii_digit).collect::<String>();

    let resolved = match decimal_at {
        Some(pos) => {
            let integer = digits_only(&body[..pos]);
            let fraction = &body[pos + 1..];
            let integer = if integer.is_empty() { "0".to_string() } else { integer };
            if fraction.is_empty() {
                format!("{sign}{integer}")
            } else {
                format!("{sign}{integer}.{fraction}")
            }
        }
        None => format!("{sign}{}", digits_only(body)),
    };

    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::separators::Separator;

    fn resolved(token: &str, config: &SeparatorConfig) -> Option<String> {
        resolve(token, config).map(|n| n.as_str().to_string())
    }

    fn english() -> SeparatorConfig {
        SeparatorConfig::default()
    }

    #[test]
    fn test_configured_fast_path() {
        assert_eq!(resolved("1,234,567.89", &english()).as_deref(), Some("1234567.89"));
        assert_eq!(resolved("-12.5", &english()).as_deref(), Some("-12.5"));
        assert_eq!(resolved("1234", &english()).as_deref(), Some("1234"));
        assert_eq!(
            resolved("1.234.567,89", &SeparatorConfig::european()).as_deref(),
            Some("1234567.89")
        );
    }

    #[test]
    fn test_trailing_digit_run_overrides_stale_configuration() {
        assert_eq!(resolved("1.234.567,89", &english()).as_deref(), Some("1234567.89"));
        assert_eq!(
            resolved("1,234,567.89", &SeparatorConfig::european()).as_deref(),
            Some("1234567.89")
        );
    }

    #[test]
    fn test_disabled_decimal_point_strips_everything() {
        let config = SeparatorConfig::new(Separator::Comma, Separator::Disabled);
        assert_eq!(resolved("1,234", &config).as_deref(), Some("1234"));
        assert_eq!(resolved("12.50", &config).as_deref(), Some("1250"));
        assert_eq!(resolved("1.2,3", &config).as_deref(), Some("123"));
    }

    #[test]
    fn test_single_separator_by_position() {
        let config = SeparatorConfig::new(Separator::Disabled, Separator::Period);
        assert_eq!(resolved("12,5", &config).as_deref(), Some("12.5"));
        assert_eq!(resolved("12,50", &config).as_deref(), Some("12.50"));
        assert_eq!(resolved("1,2345", &config).as_deref(), Some("12345"));
    }

    #[test]
    fn test_three_trailing_digits_follow_configured_decimal_point() {
        // Under the european config `1,234` matches the fast path as 1.234.
        let eu = SeparatorConfig::european();
        assert_eq!(resolved("1,234", &eu).as_deref(), Some("1.234"));
        // Without grouping `1.234` misses the fast path and the comma wins the tie.
        let no_grouping = SeparatorConfig::new(Separator::Disabled, Separator::Comma);
        assert_eq!(resolved("1.234", &no_grouping).as_deref(), Some("1234"));
        assert_eq!(resolved("1,234", &no_grouping).as_deref(), Some("1.234"));
    }

    #[test]
    fn test_majority_symbol_groups() {
        let config = SeparatorConfig::new(Separator::Disabled, Separator::Period);
        assert_eq!(resolved("1,234,567", &config).as_deref(), Some("1234567"));
        assert_eq!(resolved("1,234,56", &config).as_deref(), Some("123456"));
        assert_eq!(resolved("1.234.567,8901", &config).as_deref(), Some("1234567.8901"));
        assert_eq!(resolved("1,234.567.890", &config).as_deref(), Some("1234567890"));
    }

    #[test]
    fn test_equal_counts_use_last_separator() {
        let config = SeparatorConfig::new(Separator::Disabled, Separator::Period);
        assert_eq!(resolved("1.234,56", &config).as_deref(), Some("1234.56"));
        assert_eq!(resolved("1,234.5678", &config).as_deref(), Some("12345678"));
    }

    #[test]
    fn test_invalid_tokens() {
        assert_eq!(resolved("", &english()), None);
        assert_eq!(resolved(",.", &english()), None);
        assert_eq!(resolved("-", &english()), None);
        assert_eq!(resolved("12-34", &english()), None);
        assert_eq!(resolved("--5", &english()), None);
    }

    #[test]
    fn test_leading_separator_gets_zero_integer_part() {
        assert_eq!(resolved(",5", &english()).as_deref(), Some("0.5"));
    }

    #[test]
    fn test_ambiguous_configuration_skips_fast_path() {
        let config = SeparatorConfig::new(Separator::Comma, Separator::Comma);
        assert!(build_pattern(&config).is_none());
        assert_eq!(resolved("1,234,567", &config).as_deref(), Some("1234567"));
        assert_eq!(resolved("3,14", &config).as_deref(), Some("3.14"));
    }

    #[test]
    fn test_pattern_for_space_grouping() {
        let pattern = build_pattern(&SeparatorConfig::new(Separator::Space, Separator::Comma))
            .unwrap();
        assert!(pattern.is_match("1 234 567,5"));
        assert!(pattern.is_match("1234567"));
        assert!(!pattern.is_match("1 23"));
    }
}
