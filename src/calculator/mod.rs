//! Calculator core for recognized numbers.
//!
//! This module provides functionality to:
//! - Extract numeric tokens from noisy OCR text
//! - Resolve which separators are grouping marks and which is the decimal point
//! - Build an editable chain of numbers and operators and evaluate it left to right
//! - Keep a history of evaluations
//! - Copy results to the clipboard

mod clipboard;
mod evaluation;
mod expression;
mod format;
mod history;
mod parser;
mod resolver;
mod separators;
mod session;
mod tokenizer;

pub use clipboard::{copy_to_clipboard, copy_value};
pub use evaluation::{Evaluation, evaluate};
pub use expression::{Expression, NumberItem, Operator};
pub use format::{format_clipboard, format_display};
pub use history::{History, HistoryEntry};
pub use parser::{ParsedNumber, parse_batch, parse_edit_value, parse_numeral};
pub use resolver::{Numeral, Resolver, build_pattern, resolve};
pub use separators::{Separator, SeparatorConfig};
pub use session::{MergeMode, MergeOutcome, Session};
pub use tokenizer::{clean_token, tokenize};
