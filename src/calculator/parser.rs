//! Numeric parsing: the text -> numbers pipeline.

use serde::Serialize;
use tracing::debug;

use super::resolver::{Numeral, Resolver};
use super::separators::SeparatorConfig;
use super::tokenizer::tokenize;
use crate::error::{CalcError, Result};

/// A value extracted from recognized text, with the token it came from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParsedNumber {
    pub value: f64,
    pub source: String,
}

/// Convert a resolved numeral into a finite float.
pub fn parse_numeral(numeral: &Numeral) -> Option<f64> {
    numeral
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Run tokenizer, resolver and parser over recognized text.
///
/// Tokens that fail to resolve or parse are dropped; the rest keep their
/// recognition order.
pub fn parse_batch(text: &str, config: &SeparatorConfig, row_mode: bool) -> Vec<ParsedNumber> {
    let resolver = Resolver::new(*config);

    tokenize(text, config, row_mode)
        .into_iter()
        .filter_map(|token| {
            let value = resolver.resolve(&token).as_ref().and_then(parse_numeral);
            if value.is_none() {
                debug!(token, "dropping unparseable token");
            }
            value.map(|value| ParsedNumber {
                value,
                source: token,
            })
        })
        .collect()
}

/// Parse a value typed in by the user to replace a recognized one.
///
/// Accepts anything the resolver understands under `config`, and falls back
/// to plain float syntax (`1e3`, `.5`).
pub fn parse_edit_value(input: &str, config: &SeparatorConfig) -> Result<f64> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();

    Resolver::new(*config)
        .resolve(&compact)
        .as_ref()
        .and_then(parse_numeral)
        .or_else(|| compact.parse::<f64>().ok().filter(|v| v.is_finite()))
        .ok_or_else(|| CalcError::InvalidEditValue {
            input: input.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn values(batch: &[ParsedNumber]) -> Vec<f64> {
        batch.iter().map(|n| n.value).collect()
    }

    #[test]
    fn test_batch_from_receipt() {
        let text = "Coffee  $3.50\nBagel $2.25\nTOTAL $1,005.75\n";
        let batch = parse_batch(text, &SeparatorConfig::default(), false);
        assert_eq!(values(&batch), vec![3.5, 2.25, 1005.75]);
        assert_eq!(batch[2].source, "1,005.75");
    }

    #[test]
    fn test_batch_drops_invalid_tokens() {
        let text = "12-34\n--\n56";
        let batch = parse_batch(text, &SeparatorConfig::default(), true);
        assert_eq!(values(&batch), vec![56.0]);
    }

    #[test]
    fn test_empty_batch() {
        assert!(parse_batch("hello world", &SeparatorConfig::default(), false).is_empty());
    }

    #[test]
    fn test_european_batch() {
        let text = "Summe: 1.234,56 €\n-7,5";
        let batch = parse_batch(text, &SeparatorConfig::european(), false);
        assert_eq!(values(&batch), vec![1234.56, -7.5]);
    }

    #[test]
    fn test_edit_value() {
        let config = SeparatorConfig::default();
        assert_eq!(parse_edit_value("1,500", &config), Ok(1500.0));
        assert_eq!(parse_edit_value(" 2.5 ", &config), Ok(2.5));
        assert_eq!(parse_edit_value("1e3", &config), Ok(1000.0));
        assert_eq!(
            parse_edit_value("abc", &config),
            Err(CalcError::InvalidEditValue {
                input: "abc".to_string()
            })
        );
        assert!(parse_edit_value("", &config).is_err());
    }

    proptest! {
        #[test]
        fn prop_digit_runs_parse_as_themselves(negative in any::<bool>(), digits in "[1-9][0-9]{0,14}") {
            let token = if negative { format!("-{digits}") } else { digits };
            let batch = parse_batch(&token, &SeparatorConfig::default(), false);
            prop_assert_eq!(batch.len(), 1);
            prop_assert_eq!(batch[0].value, token.parse::<f64>().unwrap());
        }
    }
}
