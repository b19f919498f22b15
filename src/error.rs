//! Error taxonomy for the calculator core.
//!
//! Every variant is recoverable: the operation that produced it leaves the
//! expression, result and history exactly as they were before the call.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// Recognized text contained no numeric tokens.
    #[error("No numbers found in the recognized text")]
    NoNumbersFound,

    /// A `÷` operand was exactly zero. `position` is the index of the zero operand.
    #[error("Cannot divide by zero (number {position})")]
    DivisionByZero { position: usize },

    /// The evaluation overflowed to infinity or produced NaN.
    #[error("Result is not a finite number")]
    NonFiniteResult,

    /// A manual value edit could not be parsed as a number.
    #[error("'{input}' is not a valid number")]
    InvalidEditValue { input: String },

    #[error("Index {index} is out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

pub type Result<T> = std::result::Result<T, CalcError>;
