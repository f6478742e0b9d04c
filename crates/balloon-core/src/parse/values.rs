use crate::model::Unit;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Scan a decimal number at the start of `s` (leading whitespace allowed).
/// Returns the value and the unconsumed rest. Accepts a decimal comma.
pub fn scan_decimal(s: &str) -> Option<(Decimal, &str)> {
    let s = s.trim_start();
    let mut end = 0;
    let mut digits = 0;
    for (i, c) in s.char_indices() {
        if c.is_ascii_digit() {
            digits += 1;
            end = i + c.len_utf8();
        } else if c == '.' || c == ',' {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    if digits == 0 {
        return None;
    }
    let (raw, rest) = s.split_at(end);
    parse_decimal(raw).map(|d| (d, rest))
}

/// Parse a whole string as a decimal, handling comma notation and bare
/// leading/trailing separators ("12," or ".5").
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let normalized = s.trim().replace(',', ".");
    let normalized = normalized.trim_end_matches('.');
    if normalized.is_empty() {
        return None;
    }
    if let Some(stripped) = normalized.strip_prefix('.') {
        return Decimal::from_str(&format!("0.{stripped}")).ok();
    }
    Decimal::from_str(normalized).ok()
}

/// Scan a unit suffix word at the start of `s`, case-insensitively. The
/// suffix must end at a word boundary so "10 MM" matches but "10 min"
/// does not.
pub fn scan_unit_suffix(s: &str) -> Option<(Unit, &str)> {
    let s = s.trim_start();
    for candidate in ["mm", "deg", "in", "°", "\""] {
        let matched = match s.get(..candidate.len()) {
            Some(head) => head.eq_ignore_ascii_case(candidate),
            None => false,
        };
        if matched {
            let rest = &s[candidate.len()..];
            let boundary_ok = rest
                .chars()
                .next()
                .map(|c| !c.is_alphanumeric())
                .unwrap_or(true);
            if boundary_ok {
                if let Some(unit) = Unit::from_str_loose(candidate) {
                    return Some((unit, rest));
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_scan_simple() {
        let (d, rest) = scan_decimal("12.50 ± 0.05").unwrap();
        assert_eq!(d, dec!(12.50));
        assert_eq!(rest, " ± 0.05");
    }

    #[test]
    fn test_scan_stops_at_dash() {
        let (d, rest) = scan_decimal("5.00–5.20").unwrap();
        assert_eq!(d, dec!(5.00));
        assert_eq!(rest, "–5.20");
    }

    #[test]
    fn test_scan_comma_decimal() {
        let (d, _) = scan_decimal("12,5").unwrap();
        assert_eq!(d, dec!(12.5));
    }

    #[test]
    fn test_scan_requires_digit() {
        assert!(scan_decimal("± 0.05").is_none());
        assert!(scan_decimal("abc").is_none());
    }

    #[test]
    fn test_parse_trailing_dot() {
        assert_eq!(parse_decimal("12."), Some(dec!(12)));
    }

    #[test]
    fn test_parse_leading_dot() {
        assert_eq!(parse_decimal(".5"), Some(dec!(0.5)));
    }

    #[test]
    fn test_parse_rejects_double_dot() {
        assert!(parse_decimal("1.2.3").is_none());
    }

    #[test]
    fn test_unit_suffix_mm() {
        let (unit, rest) = scan_unit_suffix(" mm TYP").unwrap();
        assert_eq!(unit, Unit::Mm);
        assert_eq!(rest, " TYP");
    }

    #[test]
    fn test_unit_suffix_degree_sign() {
        let (unit, _) = scan_unit_suffix("°").unwrap();
        assert_eq!(unit, Unit::Degree);
    }

    #[test]
    fn test_unit_suffix_word_boundary() {
        // "min" starts with "in"-like text but "m" then "in" must not match
        assert!(scan_unit_suffix("min").is_none());
        assert!(scan_unit_suffix("inch").is_none());
    }
}
