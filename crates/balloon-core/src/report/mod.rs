//! Report assembly types. Rows, per page balloon overlays, the document
//! level aggregate that ties them together, and the lighter listing a
//! detector-only scan produces.

pub mod formula;

use crate::error::PageFailure;
use crate::model::{Balloon, Dimension, DocumentMetadata, Unit};
use crate::review::ReviewItem;
use formula::FormulaExpr;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One numbered inspection row. `lower` and `upper` are the resolved
/// acceptance bounds, whatever tolerance form the drawing used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub balloon_id: u32,
    pub page_index: usize,
    pub nominal: Decimal,
    pub lower: Decimal,
    pub upper: Decimal,
    pub unit: Unit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub critical: bool,
    pub formula: FormulaExpr,
}

impl ReportRow {
    pub fn from_dimension(balloon_id: u32, page_index: usize, dim: &Dimension) -> ReportRow {
        let (lower, upper) = (dim.lower_bound(), dim.upper_bound());
        ReportRow {
            balloon_id,
            page_index,
            nominal: dim.nominal,
            lower,
            upper,
            unit: dim.unit,
            symbol: dim.symbol.clone(),
            note: dim.note.clone(),
            critical: dim.critical,
            formula: FormulaExpr::within_bounds(lower, upper),
        }
    }
}

/// Balloons drawn over one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageOverlay {
    pub page_index: usize,
    pub balloons: Vec<Balloon>,
}

/// The complete inspection report for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionReport {
    pub metadata: DocumentMetadata,
    pub rows: Vec<ReportRow>,
    pub pages: Vec<PageOverlay>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub review: Vec<ReviewItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub page_failures: Vec<PageFailure>,
}

impl InspectionReport {
    pub fn critical_rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(|r| r.critical)
    }
}

/// Outcome of a detector-only pass over a document, without balloon
/// placement or numbering. Produced by `scan_dimensions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScan {
    pub pages: Vec<PageScan>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub page_failures: Vec<PageFailure>,
}

/// Dimensions found on one page, in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageScan {
    pub page_index: usize,
    pub findings: Vec<ScanFinding>,
}

/// One detected callout and what the interpreter made of it. Exactly one
/// of `dimension` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanFinding {
    pub raw_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Balloon number generator. Numbering starts at 1 and never reuses a
/// value, so rows, overlays and review items always agree on ids.
#[derive(Debug)]
pub struct BalloonSequence {
    next: u32,
}

impl BalloonSequence {
    pub fn new() -> BalloonSequence {
        BalloonSequence { next: 1 }
    }

    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for BalloonSequence {
    fn default() -> Self {
        BalloonSequence::new()
    }
}
