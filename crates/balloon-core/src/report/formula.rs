//! Acceptance formulas. Each report row carries the pass test for its
//! measured value as a small expression tree, so spreadsheet or PDF
//! writers can render it in their own formula language without the
//! engine taking sides.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Ge,
    Le,
}

/// One node of an acceptance formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormulaExpr {
    /// The inspector's measured value, filled in at inspection time.
    MeasuredCell,
    Literal {
        value: Decimal,
    },
    Compare {
        op: CompareOp,
        lhs: Box<FormulaExpr>,
        rhs: Box<FormulaExpr>,
    },
    AllOf {
        terms: Vec<FormulaExpr>,
    },
}

impl FormulaExpr {
    /// The standard acceptance test: measured within `[lower, upper]`.
    pub fn within_bounds(lower: Decimal, upper: Decimal) -> FormulaExpr {
        let ge = FormulaExpr::Compare {
            op: CompareOp::Ge,
            lhs: Box::new(FormulaExpr::MeasuredCell),
            rhs: Box::new(FormulaExpr::Literal { value: lower }),
        };
        let le = FormulaExpr::Compare {
            op: CompareOp::Le,
            lhs: Box::new(FormulaExpr::MeasuredCell),
            rhs: Box::new(FormulaExpr::Literal { value: upper }),
        };
        FormulaExpr::AllOf {
            terms: vec![ge, le],
        }
    }

    /// Evaluate the formula against a measured value.
    pub fn passes(&self, measured: Decimal) -> bool {
        match self {
            FormulaExpr::AllOf { terms } => terms.iter().all(|t| t.passes(measured)),
            FormulaExpr::Compare { op, lhs, rhs } => {
                let (l, r) = (lhs.value(measured), rhs.value(measured));
                match op {
                    CompareOp::Ge => l >= r,
                    CompareOp::Le => l <= r,
                }
            }
            other => other.value(measured) != Decimal::ZERO,
        }
    }

    fn value(&self, measured: Decimal) -> Decimal {
        match self {
            FormulaExpr::MeasuredCell => measured,
            FormulaExpr::Literal { value } => *value,
            // Boolean nodes used in value position read as 1 or 0.
            other => {
                if other.passes(measured) {
                    Decimal::ONE
                } else {
                    Decimal::ZERO
                }
            }
        }
    }
}

impl fmt::Display for FormulaExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaExpr::MeasuredCell => write!(f, "measured"),
            FormulaExpr::Literal { value } => write!(f, "{value}"),
            FormulaExpr::Compare { op, lhs, rhs } => {
                let op = match op {
                    CompareOp::Ge => ">=",
                    CompareOp::Le => "<=",
                };
                write!(f, "{lhs} {op} {rhs}")
            }
            FormulaExpr::AllOf { terms } => {
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        write!(f, " and ")?;
                    }
                    write!(f, "{term}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_within_bounds_passes_inside() {
        let formula = FormulaExpr::within_bounds(dec!(12.45), dec!(12.55));
        assert!(formula.passes(dec!(12.50)));
        assert!(formula.passes(dec!(12.45)));
        assert!(formula.passes(dec!(12.55)));
    }

    #[test]
    fn test_within_bounds_fails_outside() {
        let formula = FormulaExpr::within_bounds(dec!(12.45), dec!(12.55));
        assert!(!formula.passes(dec!(12.44)));
        assert!(!formula.passes(dec!(12.56)));
    }

    #[test]
    fn test_display_reads_as_a_sentence() {
        let formula = FormulaExpr::within_bounds(dec!(4.98), dec!(5.10));
        assert_eq!(
            formula.to_string(),
            "measured >= 4.98 and measured <= 5.10"
        );
    }

    #[test]
    fn test_serialized_shape_is_tagged() {
        let formula = FormulaExpr::within_bounds(dec!(0), dec!(0.1));
        let json = serde_json::to_string(&formula).unwrap();
        assert!(json.contains("\"kind\":\"all_of\""));
        assert!(json.contains("\"kind\":\"compare\""));
        assert!(json.contains("\"op\":\"ge\""));
    }
}
