//! Record of completed evaluations.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::evaluation::Evaluation;
use super::expression::Operator;
use super::format::format_display;
use super::separators::SeparatorConfig;

/// One completed evaluation. Immutable once recorded.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistoryEntry {
    numbers: Vec<f64>,
    operators: Vec<Operator>,
    result: f64,
    timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(evaluation: Evaluation, timestamp: DateTime<Utc>) -> Self {
        Self {
            numbers: evaluation.numbers,
            operators: evaluation.operators,
            result: evaluation.result,
            timestamp,
        }
    }

    pub fn numbers(&self) -> &[f64] {
        &self.numbers
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn result(&self) -> f64 {
        self.result
    }

    /// When the evaluation happened.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Render as `10 + 20 × 3 = 90` using the given display format.
    pub fn expression_text(&self, config: &SeparatorConfig) -> String {
        let mut text = String::new();
        for (i, value) in self.numbers.iter().enumerate() {
            if i > 0 {
                text.push_str(&format!(" {} ", self.operators[i - 1]));
            }
            text.push_str(&format_display(*value, config));
        }
        format!("{text} = {}", format_display(self.result, config))
    }
}

/// Append-only log, stored oldest first. Readers wanting the display order
/// use [`History::newest_first`].
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Entries in creation order.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    /// The `n`-th most recent entry, `0` being the latest.
    pub fn recent(&self, n: usize) -> Option<&HistoryEntry> {
        self.newest_first().nth(n)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
