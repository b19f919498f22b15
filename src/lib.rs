//! ocrcalc – turn screenshots of numbers into an editable calculation.
//!
//! Text recognized from an image goes through three steps before it becomes
//! numbers: [`calculator::tokenize`] finds candidate tokens,
//! [`calculator::Resolver`] decides which of `,` / `.` is the decimal point
//! for each token, and [`calculator::parse_numeral`] produces the value.
//! A [`calculator::Session`] merges each batch into a left-to-right
//! [`calculator::Expression`], evaluates it, and records the result in its
//! [`calculator::History`].
//!
//! ```
//! use ocrcalc::calculator::{Operator, Session};
//! use ocrcalc::config::CalcConfig;
//!
//! let mut session = Session::new(CalcConfig::default());
//! session.ingest("Subtotal $1,200.00\nShipping $50\nQty 2").unwrap();
//! session.set_operator(1, Operator::Multiply).unwrap();
//! assert_eq!(session.evaluate().unwrap(), Some(2500.0));
//! ```
//!
//! Image capture and OCR are outside the core; [`ocr::Recognizer`] is the
//! seam, with a `tesseract` command-line adapter.

pub mod calculator;
pub mod config;
pub mod error;
pub mod ocr;

pub use error::{CalcError, Result};
