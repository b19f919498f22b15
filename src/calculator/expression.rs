//! The editable chain of numbers and operators.
//!
//! Every item except the last carries the operator joining it to the next
//! one, so `operators().len() == max(len() - 1, 0)` holds after every
//! mutation.

use serde::{Deserialize, Serialize};

use super::parser::ParsedNumber;
use crate::error::{CalcError, Result};

/// Binary operator applied between two neighbouring items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[default]
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '×',
            Self::Divide => '÷',
        }
    }

    /// Parse an operator from user input. Accepts the display symbols and
    /// their ASCII spellings.
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s.trim() {
            "+" => Some(Self::Add),
            "-" | "−" => Some(Self::Subtract),
            "*" | "x" | "×" => Some(Self::Multiply),
            "/" | "÷" => Some(Self::Divide),
            _ => None,
        }
    }

    /// Apply to two operands without any range checks.
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide => lhs / rhs,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One number in the chain.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NumberItem {
    pub value: f64,
    /// The recognized token this value came from, if any.
    pub source: Option<String>,
    /// Operator to the next item; `None` only on the last item.
    modifier: Option<Operator>,
}

impl NumberItem {
    /// A typed-in value with no recognized source.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            source: None,
            modifier: None,
        }
    }

    pub fn modifier(&self) -> Option<Operator> {
        self.modifier
    }
}

impl From<f64> for NumberItem {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<ParsedNumber> for NumberItem {
    fn from(parsed: ParsedNumber) -> Self {
        Self {
            value: parsed.value,
            source: Some(parsed.source),
            modifier: None,
        }
    }
}

/// Numbers joined by operators, evaluated left to right.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Expression {
    items: Vec<NumberItem>,
}

impl Expression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[NumberItem] {
        &self.items
    }

    /// Item values in order.
    pub fn values(&self) -> Vec<f64> {
        self.items.iter().map(|item| item.value).collect()
    }

    /// Operators in order; always one fewer than the items.
    pub fn operators(&self) -> Vec<Operator> {
        self.items.iter().filter_map(|item| item.modifier).collect()
    }

    /// Replace the whole chain, joining the new items with `+`.
    pub fn start_new<I, T>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<NumberItem>,
    {
        self.items.clear();
        self.append_batch(values);
    }

    /// Append items, bridging from the current last item with `+`.
    pub fn append_batch<I, T>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<NumberItem>,
    {
        for value in values {
            if let Some(last) = self.items.last_mut() {
                last.modifier.get_or_insert(Operator::Add);
            }
            let mut item = value.into();
            item.modifier = None;
            self.items.push(item);
        }
    }

    /// Change the operator between item `index` and item `index + 1`.
    pub fn set_operator(&mut self, index: usize, op: Operator) -> Result<()> {
        let slots = self.items.len().saturating_sub(1);
        if index >= slots {
            return Err(CalcError::IndexOutOfRange { index, len: slots });
        }
        self.items[index].modifier = Some(op);
        Ok(())
    }

    /// Overwrite the value of item `index`, keeping its operators.
    pub fn set_value(&mut self, index: usize, value: f64) -> Result<()> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(CalcError::IndexOutOfRange { index, len })?;
        item.value = value;
        Ok(())
    }

    /// Remove item `index` together with one operator: the one before it, or
    /// for the first item the one after it.
    pub fn delete_at(&mut self, index: usize) -> Result<NumberItem> {
        let len = self.items.len();
        if index >= len {
            return Err(CalcError::IndexOutOfRange { index, len });
        }

        let removed = self.items.remove(index);
        if index > 0 {
            // The previous item takes over the removed item's outgoing operator,
            // which is `None` when the removed item was last.
            self.items[index - 1].modifier = removed.modifier;
        }
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", item.value)?;
            if let Some(op) = item.modifier {
                write!(f, " {op}")?;
            }
        }
        Ok(())
    }
}
