//! Left-to-right evaluation of an expression.
//!
//! Operators apply in the order they appear; there is no precedence, so
//! `100 + 50 × 2` is `300`.

use serde::Serialize;
use tracing::warn;

use super::expression::{Expression, Operator};
use crate::error::{CalcError, Result};

/// A successful evaluation with the operands and operators it used.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Evaluation {
    pub numbers: Vec<f64>,
    pub operators: Vec<Operator>,
    pub result: f64,
}

/// Evaluate an expression.
///
/// Returns `Ok(None)` for an empty expression. Division by a zero operand and
/// results that overflow to infinity or NaN are rejected before anything is
/// reported.
pub fn evaluate(expression: &Expression) -> Result<Option<Evaluation>> {
    let numbers = expression.values();
    let operators = expression.operators();

    let Some(&first) = numbers.first() else {
        return Ok(None);
    };

    let mut result = first;
    for (i, op) in operators.iter().enumerate() {
        let operand = numbers[i + 1];
        if *op == Operator::Divide && operand == 0.0 {
            warn!(position = i + 1, "division by zero");
            return Err(CalcError::DivisionByZero { position: i + 1 });
        }

        result = op.apply(result, operand);
        if !result.is_finite() {
            warn!(step = i, "evaluation left the finite range");
            return Err(CalcError::NonFiniteResult);
        }
    }

    Ok(Some(Evaluation {
        numbers,
        operators,
        result,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expression(values: &[f64], ops: &[Operator]) -> Expression {
        let mut expr = Expression::new();
        expr.start_new(values.iter().copied());
        for (i, op) in ops.iter().enumerate() {
            expr.set_operator(i, *op).unwrap();
        }
        expr
    }

    #[test]
    fn test_left_to_right_without_precedence() {
        let expr = expression(&[100.0, 50.0, 2.0], &[Operator::Add, Operator::Multiply]);
        let evaluation = evaluate(&expr).unwrap().unwrap();
        assert_eq!(evaluation.result, 300.0);
        assert_eq!(evaluation.numbers, vec![100.0, 50.0, 2.0]);
        assert_eq!(evaluation.operators, vec![Operator::Add, Operator::Multiply]);
    }

    #[test]
    fn test_all_operators() {
        let expr = expression(
            &[10.0, 4.0, 3.0, 2.0],
            &[Operator::Subtract, Operator::Multiply, Operator::Divide],
        );
        assert_eq!(evaluate(&expr).unwrap().unwrap().result, 9.0);
    }

    #[test]
    fn test_single_number() {
        let expr = expression(&[-42.5], &[]);
        assert_eq!(evaluate(&expr).unwrap().unwrap().result, -42.5);
    }

    #[test]
    fn test_empty_is_noop() {
        assert_eq!(evaluate(&Expression::new()), Ok(None));
    }

    #[test]
    fn test_division_by_zero() {
        let expr = expression(&[10.0, 0.0], &[Operator::Divide]);
        assert_eq!(evaluate(&expr), Err(CalcError::DivisionByZero { position: 1 }));
    }

    #[test]
    fn test_zero_operand_is_fine_for_other_operators() {
        let expr = expression(&[10.0, 0.0, 5.0], &[Operator::Multiply, Operator::Add]);
        assert_eq!(evaluate(&expr).unwrap().unwrap().result, 5.0);
    }

    #[test]
    fn test_overflow_rejected() {
        let expr = expression(&[1e308, 10.0], &[Operator::Multiply]);
        assert_eq!(evaluate(&expr), Err(CalcError::NonFiniteResult));
    }
}
