//! A calculation session: the live expression, its last result, and history.
//!
//! The session decides how newly recognized numbers merge into the current
//! expression and evaluates right after every merge. Calls are expected to be
//! sequential; callers feeding OCR batches must serialize them.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::evaluation::evaluate;
use super::expression::{Expression, Operator};
use super::history::{History, HistoryEntry};
use super::parser::{ParsedNumber, parse_batch, parse_edit_value};
use super::separators::SeparatorConfig;
use crate::config::CalcConfig;
use crate::error::{CalcError, Result};

/// How a batch was merged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MergeMode {
    /// The previous expression was discarded.
    Replaced,
    /// The batch was appended with a bridging `+`.
    Appended,
}

/// What happened when a batch arrived.
#[derive(Clone, Debug, PartialEq)]
pub struct MergeOutcome {
    pub mode: MergeMode,
    pub added: usize,
    /// Outcome of the automatic evaluation that follows every merge.
    pub evaluation: Result<Option<f64>>,
}

/// Live expression, its last result and the evaluation history.
#[derive(Clone, Debug, Default)]
pub struct Session {
    config: CalcConfig,
    expression: Expression,
    result: Option<f64>,
    history: History,
}

impl Session {
    pub fn new(config: CalcConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &CalcConfig {
        &self.config
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    /// The last displayed result; `None` after edits that invalidate it.
    pub fn result(&self) -> Option<f64> {
        self.result
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Only affects numbers parsed from now on.
    pub fn set_separators(&mut self, separators: SeparatorConfig) {
        self.config.separators = separators;
    }

    /// Only affects text ingested from now on.
    pub fn set_row_mode(&mut self, enabled: bool) {
        self.config.row_mode = enabled;
    }

    /// Whether the next non-empty batch appends instead of replacing.
    pub fn set_combine_mode(&mut self, enabled: bool) {
        self.config.combine_mode = enabled;
    }

    /// Parse recognized text and merge the numbers into the expression.
    ///
    /// Text without numbers yields [`CalcError::NoNumbersFound`] and leaves
    /// the session untouched.
    pub fn ingest(&mut self, text: &str) -> Result<MergeOutcome> {
        let batch = parse_batch(text, &self.config.separators, self.config.row_mode);
        self.merge_batch(batch)
    }

    /// Merge an already parsed batch, then evaluate.
    ///
    /// An empty expression is always replaced. Otherwise combine mode decides
    /// between appending and replacing. If the evaluation fails, the previous
    /// result and history stay as they were.
    pub fn merge_batch(&mut self, batch: Vec<ParsedNumber>) -> Result<MergeOutcome> {
        if batch.is_empty() {
            info!("no numbers in batch");
            return Err(CalcError::NoNumbersFound);
        }

        let added = batch.len();
        let mode = if !self.expression.is_empty() && self.config.combine_mode {
            self.expression.append_batch(batch);
            MergeMode::Appended
        } else {
            self.expression.start_new(batch);
            MergeMode::Replaced
        };
        info!(?mode, added, total = self.expression.len(), "merged batch");

        let evaluation = self.evaluate();

        Ok(MergeOutcome {
            mode,
            added,
            evaluation,
        })
    }

    /// Evaluate the current expression and record it in history.
    ///
    /// On error the result and history are left as they were.
    pub fn evaluate(&mut self) -> Result<Option<f64>> {
        let Some(evaluation) = evaluate(&self.expression)? else {
            return Ok(None);
        };

        let result = evaluation.result;
        self.history.record(HistoryEntry::new(evaluation, Utc::now()));
        self.result = Some(result);
        info!(result, entries = self.history.len(), "evaluated expression");
        Ok(Some(result))
    }

    /// Change the operator after item `index`. The result is kept.
    pub fn set_operator(&mut self, index: usize, op: Operator) -> Result<()> {
        self.expression.set_operator(index, op)
    }

    /// Overwrite a value. Clears the result; evaluate again to refresh it.
    pub fn set_value(&mut self, index: usize, value: f64) -> Result<()> {
        self.expression.set_value(index, value)?;
        self.result = None;
        Ok(())
    }

    /// Overwrite a value from user-typed text. An unparseable edit is
    /// rejected and the previous value stays.
    pub fn edit_value(&mut self, index: usize, input: &str) -> Result<f64> {
        let len = self.expression.len();
        if index >= len {
            return Err(CalcError::IndexOutOfRange { index, len });
        }

        let value = parse_edit_value(input, &self.config.separators).inspect_err(|_| {
            warn!(index, input, "rejected value edit");
        })?;
        self.set_value(index, value)?;
        Ok(value)
    }

    /// Remove item `index` and clear the result.
    pub fn delete_at(&mut self, index: usize) -> Result<()> {
        self.expression.delete_at(index)?;
        self.result = None;
        Ok(())
    }

    /// Drop the expression and result. History is kept.
    pub fn clear(&mut self) {
        self.expression.clear();
        self.result = None;
    }
}
