use crate::geometry::{BBox, Point};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "mm")]
    #[default]
    Mm,
    #[serde(rename = "in")]
    Inch,
    #[serde(rename = "deg")]
    Degree,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Mm => write!(f, "mm"),
            Unit::Inch => write!(f, "in"),
            Unit::Degree => write!(f, "°"),
        }
    }
}

impl Unit {
    pub fn from_str_loose(s: &str) -> Option<Unit> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "mm" | "millimeter" | "millimetre" => Some(Unit::Mm),
            "in" | "inch" | "\"" => Some(Unit::Inch),
            "deg" | "degree" | "°" => Some(Unit::Degree),
            _ => None,
        }
    }
}

/// Tolerance spec of a dimension. The kind determines how the bounds are
/// derived from the nominal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Tolerance {
    /// `X ± d`; bounds are nominal − d and nominal + d. A zero deviation
    /// is a bare dimension graded against its exact nominal.
    Symmetric { deviation: Decimal },
    /// `X +u/-l`; deviations are signed and relative to the nominal, zero
    /// on one side is allowed.
    Bilateral {
        upper_deviation: Decimal,
        lower_deviation: Decimal,
    },
    /// Explicit `min–max` pair; the nominal is the band midpoint.
    Limit { lower: Decimal, upper: Decimal },
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tolerance::Symmetric { deviation } => write!(f, "± {deviation}"),
            Tolerance::Bilateral {
                upper_deviation,
                lower_deviation,
            } => {
                write!(
                    f,
                    "{}/{}",
                    signed(*upper_deviation),
                    signed(*lower_deviation)
                )
            }
            Tolerance::Limit { lower, upper } => write!(f, "{lower}–{upper}"),
        }
    }
}

fn signed(d: Decimal) -> String {
    if d.is_sign_negative() {
        d.to_string()
    } else {
        format!("+{d}")
    }
}

/// An interpreted dimension. Invariant: lower_bound() ≤ nominal ≤
/// upper_bound(); the interpreter rejects text that would break it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub nominal: Decimal,
    pub tolerance: Tolerance,
    pub unit: Unit,
    /// Geometric characteristic glyph preceding the value (`⌀`, `R`, `⏊`,
    /// …), carried through for display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Modifier words and datum letters found alongside the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub critical: bool,
}

impl Dimension {
    pub fn lower_bound(&self) -> Decimal {
        match &self.tolerance {
            Tolerance::Symmetric { deviation } => self.nominal - deviation,
            Tolerance::Bilateral {
                lower_deviation, ..
            } => self.nominal + lower_deviation,
            Tolerance::Limit { lower, .. } => *lower,
        }
    }

    pub fn upper_bound(&self) -> Decimal {
        match &self.tolerance {
            Tolerance::Symmetric { deviation } => self.nominal + deviation,
            Tolerance::Bilateral {
                upper_deviation, ..
            } => self.nominal + upper_deviation,
            Tolerance::Limit { upper, .. } => *upper,
        }
    }

    pub fn band_width(&self) -> Decimal {
        self.upper_bound() - self.lower_bound()
    }
}

/// A detected callout: the text cluster plus its leader anchor. Read-only
/// once the detector emits it.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionCallout {
    pub page_index: usize,
    /// Indices into the page's token list for the tokens composing the
    /// callout, in cluster order.
    pub token_indices: Vec<usize>,
    pub bbox: BBox,
    pub font_size: f32,
    pub raw_text: String,
    /// Nearest stroke endpoint, or a point on the bbox edge when none was
    /// in range.
    pub anchor: Point,
    pub self_anchored: bool,
}

/// Shapes accepted as critical-dimension markers. `Any` accepts every
/// closed loop regardless of its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerShape {
    Rectangle,
    Diamond,
    Triangle,
    Circle,
    Any,
}

impl fmt::Display for MarkerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerShape::Rectangle => write!(f, "rectangle"),
            MarkerShape::Diamond => write!(f, "diamond"),
            MarkerShape::Triangle => write!(f, "triangle"),
            MarkerShape::Circle => write!(f, "circle"),
            MarkerShape::Any => write!(f, "any"),
        }
    }
}

/// A placed, numbered balloon marker. Ids start at 1 and increase in page
/// order then reading order; the report row with the same id carries the
/// dimension the balloon references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balloon {
    pub id: u32,
    pub page_index: usize,
    pub center: Point,
    pub radius: f32,
    pub callout_bbox: BBox,
    /// Stub from the callout anchor to the balloon center, present when
    /// the balloon sits away from its anchor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader: Option<LeaderStub>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeaderStub {
    pub from: Point,
    pub to: Point,
}

/// Title-block fields harvested from labelled text lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    PartNumber,
    Title,
    Material,
    Revision,
    Scale,
    Sheet,
    Date,
    Weight,
}

impl DocumentMetadata {
    /// First occurrence wins; later pages never overwrite earlier fields.
    pub fn set_if_empty(&mut self, field: MetadataField, value: &str) {
        let slot = match field {
            MetadataField::PartNumber => &mut self.part_number,
            MetadataField::Title => &mut self.title,
            MetadataField::Material => &mut self.material,
            MetadataField::Revision => &mut self.revision,
            MetadataField::Scale => &mut self.scale,
            MetadataField::Sheet => &mut self.sheet,
            MetadataField::Date => &mut self.date,
            MetadataField::Weight => &mut self.weight,
        };
        if slot.is_none() {
            *slot = Some(value.trim().to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.part_number.is_none()
            && self.title.is_none()
            && self.material.is_none()
            && self.revision.is_none()
            && self.scale.is_none()
            && self.sheet.is_none()
            && self.date.is_none()
            && self.weight.is_none()
    }

    /// Fold another page's fields into this one. Fields already filled
    /// stay as they are.
    pub fn merge_missing(&mut self, other: &DocumentMetadata) {
        let pairs = [
            (MetadataField::PartNumber, &other.part_number),
            (MetadataField::Title, &other.title),
            (MetadataField::Material, &other.material),
            (MetadataField::Revision, &other.revision),
            (MetadataField::Scale, &other.scale),
            (MetadataField::Sheet, &other.sheet),
            (MetadataField::Date, &other.date),
            (MetadataField::Weight, &other.weight),
        ];
        for (field, value) in pairs {
            if let Some(value) = value {
                self.set_if_empty(field, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn dim(nominal: Decimal, tolerance: Tolerance) -> Dimension {
        Dimension {
            nominal,
            tolerance,
            unit: Unit::Mm,
            symbol: None,
            note: None,
            critical: false,
        }
    }

    #[test]
    fn test_symmetric_bounds() {
        let d = dim(
            dec!(12.50),
            Tolerance::Symmetric {
                deviation: dec!(0.05),
            },
        );
        assert_eq!(d.lower_bound(), dec!(12.45));
        assert_eq!(d.upper_bound(), dec!(12.55));
        assert_eq!(d.band_width(), dec!(0.10));
    }

    #[test]
    fn test_bilateral_bounds_signed() {
        let d = dim(
            dec!(8.00),
            Tolerance::Bilateral {
                upper_deviation: dec!(0.10),
                lower_deviation: dec!(-0.02),
            },
        );
        assert_eq!(d.lower_bound(), dec!(7.98));
        assert_eq!(d.upper_bound(), dec!(8.10));
    }

    #[test]
    fn test_bilateral_zero_side() {
        let d = dim(
            dec!(12.1),
            Tolerance::Bilateral {
                upper_deviation: dec!(0.1),
                lower_deviation: dec!(0),
            },
        );
        assert_eq!(d.lower_bound(), dec!(12.1));
        assert_eq!(d.upper_bound(), dec!(12.2));
    }

    #[test]
    fn test_limit_bounds() {
        let d = dim(
            dec!(5.10),
            Tolerance::Limit {
                lower: dec!(5.00),
                upper: dec!(5.20),
            },
        );
        assert_eq!(d.lower_bound(), dec!(5.00));
        assert_eq!(d.upper_bound(), dec!(5.20));
    }

    #[test]
    fn test_tolerance_display() {
        assert_eq!(
            Tolerance::Symmetric {
                deviation: dec!(0.05)
            }
            .to_string(),
            "± 0.05"
        );
        assert_eq!(
            Tolerance::Bilateral {
                upper_deviation: dec!(0.10),
                lower_deviation: dec!(-0.02)
            }
            .to_string(),
            "+0.10/-0.02"
        );
    }

    #[test]
    fn test_unit_from_str_loose() {
        assert_eq!(Unit::from_str_loose("mm"), Some(Unit::Mm));
        assert_eq!(Unit::from_str_loose("\""), Some(Unit::Inch));
        assert_eq!(Unit::from_str_loose("°"), Some(Unit::Degree));
        assert_eq!(Unit::from_str_loose("mg/kg"), None);
    }

    #[test]
    fn test_metadata_first_wins() {
        let mut meta = DocumentMetadata::default();
        meta.set_if_empty(MetadataField::Title, "BRACKET");
        meta.set_if_empty(MetadataField::Title, "OTHER");
        assert_eq!(meta.title.as_deref(), Some("BRACKET"));
    }
}
