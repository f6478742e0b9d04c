use serde::{Deserialize, Serialize};

/// Why an item needs a human in the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewKind {
    /// Callout text looked like a dimension but matched no tolerance
    /// grammar (or its band did not bracket the nominal).
    UnparseableDimension,
    /// The balloon could not be placed clear of everything within the
    /// attempt budget; it was placed at the least-overlapping candidate.
    UnresolvedPlacementConflict,
}

/// A manual-review marker carried in the report. Whatever the pipeline
/// detected but could not fully resolve ends up here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub page_index: usize,
    pub kind: ReviewKind,
    pub raw_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balloon_id: Option<u32>,
    pub reason: String,
}

impl ReviewItem {
    pub fn unparseable(page_index: usize, raw_text: &str, reason: String) -> Self {
        Self {
            page_index,
            kind: ReviewKind::UnparseableDimension,
            raw_text: raw_text.to_string(),
            balloon_id: None,
            reason,
        }
    }

    pub fn placement_conflict(
        page_index: usize,
        raw_text: &str,
        balloon_id: u32,
        reason: String,
    ) -> Self {
        Self {
            page_index,
            kind: ReviewKind::UnresolvedPlacementConflict,
            raw_text: raw_text.to_string(),
            balloon_id: Some(balloon_id),
            reason,
        }
    }
}
