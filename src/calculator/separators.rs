//! Thousand-separator / decimal-point configuration.

use serde::{Deserialize, Serialize};

/// One of the symbols a user can pick for a separator slot.
///
/// Serialized as the literal symbol so config files read naturally
/// (`thousand_separator = ","`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Separator {
    #[serde(rename = ",")]
    #[value(name = "comma")]
    Comma,
    #[serde(rename = ".")]
    #[value(name = "period")]
    Period,
    #[serde(rename = " ")]
    #[value(name = "space")]
    Space,
    /// Slot disabled.
    #[serde(rename = "")]
    #[value(name = "none")]
    Disabled,
}

impl Separator {
    /// The character this separator stands for, or `None` when disabled.
    pub fn as_char(self) -> Option<char> {
        match self {
            Self::Comma => Some(','),
            Self::Period => Some('.'),
            Self::Space => Some(' '),
            Self::Disabled => None,
        }
    }

    /// Whether the slot is switched off.
    pub fn is_disabled(self) -> bool {
        matches!(self, Self::Disabled)
    }

    /// Whether `c` is this separator's symbol.
    pub fn matches(self, c: char) -> bool {
        self.as_char() == Some(c)
    }
}

/// The two separator slots. They are independent: ambiguity between them is
/// resolved per token, never rejected here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeparatorConfig {
    pub thousand_separator: Separator,
    pub decimal_point: Separator,
}

impl Default for SeparatorConfig {
    fn default() -> Self {
        Self {
            thousand_separator: Separator::Comma,
            decimal_point: Separator::Period,
        }
    }
}

impl SeparatorConfig {
    /// Configuration from both slots.
    pub fn new(thousand_separator: Separator, decimal_point: Separator) -> Self {
        Self {
            thousand_separator,
            decimal_point,
        }
    }

    /// Continental style: `1.234.567,89`.
    pub fn european() -> Self {
        Self::new(Separator::Period, Separator::Comma)
    }

    pub fn with_thousand_separator(self, thousand_separator: Separator) -> Self {
        Self {
            thousand_separator,
            ..self
        }
    }

    pub fn with_decimal_point(self, decimal_point: Separator) -> Self {
        Self {
            decimal_point,
            ..self
        }
    }

    /// True when both slots hold the same non-empty symbol, which makes the
    /// configured pattern useless for telling them apart.
    pub fn is_ambiguous(&self) -> bool {
        !self.decimal_point.is_disabled() && self.thousand_separator == self.decimal_point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_english_style() {
        let config = SeparatorConfig::default();
        assert_eq!(config.thousand_separator.as_char(), Some(','));
        assert_eq!(config.decimal_point.as_char(), Some('.'));
        assert!(!config.is_ambiguous());
    }

    #[test]
    fn test_ambiguous_only_when_both_set_and_equal() {
        assert!(SeparatorConfig::new(Separator::Comma, Separator::Comma).is_ambiguous());
        assert!(!SeparatorConfig::new(Separator::Disabled, Separator::Disabled).is_ambiguous());
        assert!(!SeparatorConfig::european().is_ambiguous());
    }

    #[test]
    fn test_serializes_as_symbols() {
        let json = serde_json::to_string(&SeparatorConfig::new(Separator::Space, Separator::Disabled))
            .unwrap();
        assert_eq!(json, r#"{"thousand_separator":" ","decimal_point":""}"#);

        let parsed: SeparatorConfig =
            serde_json::from_str(r#"{"thousand_separator":".","decimal_point":","}"#).unwrap();
        assert_eq!(parsed, SeparatorConfig::european());
    }
}
