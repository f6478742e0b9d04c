//! Callout text interpretation.
//!
//! Turns the raw text of a detected callout into a [`Dimension`]: value
//! grammar, unit resolution, diameter and radius prefixes, feature control
//! frames, and trailing modifier words.

pub mod symbols;
pub mod tolerance;
pub mod values;

use crate::model::{Dimension, Tolerance, Unit};
use rust_decimal::Decimal;
use tolerance::{scan_value_expr, ValueSpecError};
use values::{scan_decimal, scan_unit_suffix};

/// Cheap probe used by the detector: does this text start like a value
/// expression? Count prefixes (`4X`) and a diameter or radius mark are
/// allowed before the number; a leading word (`SEE`, `NOTE`) is not.
pub fn looks_like_dimension(text: &str) -> bool {
    let mut t = text.trim_start();
    loop {
        match next_count_token(t) {
            Some((_, rest)) => t = rest.trim_start(),
            None => break,
        }
    }
    if t.chars().next().map(symbols::is_characteristic) == Some(true) {
        return true;
    }
    if let Some(rest) = strip_diameter_mark(t) {
        t = rest.trim_start();
    } else if let Some(rest) = strip_radius_mark(t) {
        t = rest;
    }
    let mut chars = t.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Interpret a callout's text as a dimension. The error string is the
/// reason recorded on the manual review item.
pub fn interpret_callout(raw: &str, unit_default: Unit) -> Result<Dimension, String> {
    let (text, marked_unit) = strip_unit_marks(raw.trim());
    let mut t = text.as_str();
    let mut note_parts: Vec<String> = Vec::new();

    loop {
        match next_count_token(t) {
            Some((count, rest)) => {
                note_parts.push(count.to_string());
                t = rest.trim_start();
            }
            None => break,
        }
    }

    if let Some(glyph) = t.chars().next().filter(|c| symbols::is_characteristic(*c)) {
        return interpret_feature_control(glyph, t, unit_default, note_parts);
    }

    let mut symbol = None;
    if let Some(rest) = strip_diameter_mark(t) {
        symbol = Some("⌀".to_string());
        t = rest.trim_start();
    } else if let Some(rest) = strip_radius_mark(t) {
        symbol = Some("R".to_string());
        t = rest;
    }

    let (spec, rest) = scan_value_expr(t).map_err(|e| match e {
        ValueSpecError::NoValue => "no numeric value found".to_string(),
        other => other.to_string(),
    })?;

    let (unit, rest) = match scan_unit_suffix(rest) {
        Some((u, rest)) => (Some(u), rest),
        None => (marked_unit, rest),
    };

    let leftover = rest.split_whitespace().collect::<Vec<_>>().join(" ");
    if !leftover.is_empty() {
        note_parts.push(leftover);
    }

    Ok(Dimension {
        nominal: spec.nominal,
        tolerance: spec.tolerance,
        unit: unit.unwrap_or(unit_default),
        symbol,
        note: join_note(note_parts),
        critical: false,
    })
}

/// A geometric tolerance frame: characteristic glyph, optional diameter
/// mark, zone value, then datum references. The zone value is an upper
/// limit on a deviation that is ideally zero.
fn interpret_feature_control(
    glyph: char,
    t: &str,
    unit_default: Unit,
    mut note_parts: Vec<String>,
) -> Result<Dimension, String> {
    let name = symbols::characteristic_name(glyph)
        .ok_or_else(|| format!("unknown characteristic glyph {glyph}"))?;
    let mut rest = t[glyph.len_utf8()..].trim_start();
    if let Some(after) = strip_diameter_mark(rest) {
        rest = after.trim_start();
    }
    let (zone, rest) = scan_decimal(rest)
        .ok_or_else(|| format!("{name} frame has no tolerance value"))?;

    let mut frame = vec![name.to_string()];
    for c in rest.chars() {
        if c.is_ascii_uppercase() {
            frame.push(c.to_string());
        } else if let Some(modifier) = symbols::condition_modifier_name(c) {
            frame.push(modifier.to_string());
        }
    }
    note_parts.push(frame.join(" "));

    Ok(Dimension {
        nominal: zone,
        tolerance: Tolerance::Limit {
            lower: Decimal::ZERO,
            upper: zone,
        },
        unit: unit_default,
        symbol: Some(glyph.to_string()),
        note: join_note(note_parts),
        critical: false,
    })
}

/// A repetition count such as `4X` or `12x`.
pub(crate) fn next_count_token(s: &str) -> Option<(&str, &str)> {
    let t = s.trim_start();
    let token_len = t.find(char::is_whitespace).unwrap_or(t.len());
    let token = &t[..token_len];
    if token.len() < 2 || !token.ends_with(['x', 'X']) {
        return None;
    }
    let digits = &token[..token.len() - 1];
    if digits.len() <= 3 && digits.chars().all(|c| c.is_ascii_digit()) {
        Some((token, &t[token_len..]))
    } else {
        None
    }
}

fn strip_diameter_mark(s: &str) -> Option<&str> {
    let c = s.chars().next()?;
    if symbols::is_diameter_glyph(c) {
        Some(&s[c.len_utf8()..])
    } else {
        None
    }
}

/// `R` is a radius mark only when a number follows directly, so that
/// datum and zone labels keep their text.
fn strip_radius_mark(s: &str) -> Option<&str> {
    let rest = s.strip_prefix('R')?;
    match rest.chars().next() {
        Some(c) if c.is_ascii_digit() || c == '.' => Some(rest),
        _ => None,
    }
}

/// Degree and inch marks bind tightly to each number (`45° ±0.5°`), so
/// they are lifted out before the value grammar runs.
fn strip_unit_marks(s: &str) -> (String, Option<Unit>) {
    if s.contains('°') {
        (s.replace('°', " "), Some(Unit::Degree))
    } else if s.contains('"') {
        (s.replace('"', " "), Some(Unit::Inch))
    } else {
        (s.to_string(), None)
    }
}

fn join_note(parts: Vec<String>) -> Option<String> {
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}
