use crate::model::Tolerance;
use crate::parse::values::scan_decimal;
use rust_decimal::Decimal;
use std::fmt;

/// A parsed value expression: nominal plus tolerance, before unit and
/// modifier handling.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    pub nominal: Decimal,
    pub tolerance: Tolerance,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueSpecError {
    /// No leading number, so this is not a value expression at all.
    NoValue,
    /// Both deviations lie on the same side of the nominal, e.g.
    /// `45 +0.015/+0.005`. The band would not bracket the nominal.
    BandMissesNominal {
        nominal: Decimal,
        lower: Decimal,
        upper: Decimal,
    },
    /// A limit pair with min above max, e.g. `5.20–5.00`.
    ReversedLimits { lower: Decimal, upper: Decimal },
}

impl fmt::Display for ValueSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSpecError::NoValue => write!(f, "no numeric value found"),
            ValueSpecError::BandMissesNominal {
                nominal,
                lower,
                upper,
            } => write!(
                f,
                "tolerance band [{lower}, {upper}] does not bracket nominal {nominal}"
            ),
            ValueSpecError::ReversedLimits { lower, upper } => {
                write!(f, "limit pair {lower}/{upper} is reversed")
            }
        }
    }
}

/// Parse the value expression at the start of `s`. Grammar rules are tried
/// in a fixed order: symmetric, bilateral, limit, then plain. Returns the
/// spec and the unconsumed rest of the text.
pub fn scan_value_expr(s: &str) -> Result<(ValueSpec, &str), ValueSpecError> {
    let (first, rest) = scan_decimal(s).ok_or(ValueSpecError::NoValue)?;

    if let Some((deviation, rest)) = scan_symmetric(rest) {
        return Ok((
            ValueSpec {
                nominal: first,
                tolerance: Tolerance::Symmetric { deviation },
            },
            rest,
        ));
    }

    if let Some((d1, d2, rest)) = scan_deviation_pair(rest) {
        // Deviations are signed relative to the nominal. Take the larger
        // one as the upper side regardless of print order.
        let upper_deviation = d1.max(d2);
        let lower_deviation = d1.min(d2);
        if upper_deviation < Decimal::ZERO || lower_deviation > Decimal::ZERO {
            return Err(ValueSpecError::BandMissesNominal {
                nominal: first,
                lower: first + lower_deviation,
                upper: first + upper_deviation,
            });
        }
        return Ok((
            ValueSpec {
                nominal: first,
                tolerance: Tolerance::Bilateral {
                    upper_deviation,
                    lower_deviation,
                },
            },
            rest,
        ));
    }

    if let Some((upper, rest)) = scan_limit_partner(rest) {
        if first >= upper {
            return Err(ValueSpecError::ReversedLimits {
                lower: first,
                upper,
            });
        }
        // The drawn pair is min and max; the nominal is the midpoint.
        let nominal = (first + upper) / Decimal::TWO;
        return Ok((
            ValueSpec {
                nominal,
                tolerance: Tolerance::Limit {
                    lower: first,
                    upper,
                },
            },
            rest,
        ));
    }

    Ok((
        ValueSpec {
            nominal: first,
            tolerance: Tolerance::Symmetric {
                deviation: Decimal::ZERO,
            },
        },
        rest,
    ))
}

/// `± Y` tail.
fn scan_symmetric(s: &str) -> Option<(Decimal, &str)> {
    let t = s.trim_start();
    let rest = t.strip_prefix('±')?;
    scan_decimal(rest)
}

/// Two signed-or-zero deviations, optionally separated by a slash:
/// `+0.10/-0.02`, `+0.1 0`, `0 -0.2`, `-0.1 -0.2`.
fn scan_deviation_pair(s: &str) -> Option<(Decimal, Decimal, &str)> {
    let (d1, rest) = scan_deviation(s)?;
    let rest_after_sep = {
        let t = rest.trim_start();
        t.strip_prefix('/').unwrap_or(t)
    };
    let (d2, rest) = scan_deviation(rest_after_sep)?;
    Some((d1, d2, rest))
}

/// One deviation token: `+number`, `-number`, or a bare `0`.
fn scan_deviation(s: &str) -> Option<(Decimal, &str)> {
    let t = s.trim_start();
    if let Some(after_sign) = t.strip_prefix('+') {
        let (d, rest) = scan_decimal(after_sign)?;
        return Some((d, rest));
    }
    if let Some(after_sign) = t.strip_prefix('-') {
        let (d, rest) = scan_decimal(after_sign)?;
        return Some((-d, rest));
    }
    // Bare zero, as printed when one side of the band collapses.
    if let Some(rest) = t.strip_prefix('0') {
        let boundary_ok = rest
            .chars()
            .next()
            .map(|c| !(c.is_ascii_digit() || c == '.' || c == ','))
            .unwrap_or(true);
        if boundary_ok {
            return Some((Decimal::ZERO, rest));
        }
    }
    None
}

/// The max half of a limit pair: a dash or slash separator and a second
/// unsigned number.
fn scan_limit_partner(s: &str) -> Option<(Decimal, &str)> {
    let t = s.trim_start();
    let rest = t
        .strip_prefix('–')
        .or_else(|| t.strip_prefix('-'))
        .or_else(|| t.strip_prefix('/'))?;
    scan_decimal(rest)
}
