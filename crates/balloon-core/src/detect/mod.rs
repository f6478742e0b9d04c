//! Callout detection. One page of raw geometry goes in; dimension
//! callouts in reading order plus any harvested title block fields come
//! out.
//!
//! The funnel: cluster tokens into lines, harvest title block and table
//! vocabulary, drop noise and excluded text, merge stacked tolerance
//! lines, keep what reads like a value expression, then tie each survivor
//! to its leader.

pub mod cluster;
pub mod leader;
pub mod vocab;
pub mod zones;

use crate::geometry::PageGeometry;
use crate::model::{DimensionCallout, DocumentMetadata};
use cluster::Cluster;
use tracing::debug;
use zones::ExclusionZones;

const TEXT_MAX: usize = 30;
const READING_BAND: f32 = 4.0;
const VALUE_RIGHT_MAX_GAP: f32 = 150.0;
const VALUE_BELOW_MAX_GAP: f32 = 20.0;

/// Detection result for one page.
pub struct PageDetection {
    pub callouts: Vec<DimensionCallout>,
    pub metadata: DocumentMetadata,
}

pub fn detect_callouts(page: &PageGeometry) -> PageDetection {
    let lines = cluster::cluster_lines(page);

    let mut consumed = vec![false; lines.len()];
    let mut metadata = DocumentMetadata::default();
    let mut metadata_boxes = Vec::new();
    let mut header_boxes = Vec::new();

    for i in 0..lines.len() {
        if consumed[i] {
            continue;
        }
        if let Some((field, value)) = vocab::metadata_label(&lines[i].text) {
            consumed[i] = true;
            metadata_boxes.push(lines[i].bbox);
            if !value.is_empty() {
                metadata.set_if_empty(field, value);
            } else if let Some(j) = find_value_neighbor(&lines, &consumed, i) {
                consumed[j] = true;
                metadata_boxes.push(lines[j].bbox);
                let text = lines[j].text.clone();
                metadata.set_if_empty(field, &text);
            }
            continue;
        }
        if vocab::is_table_header(&lines[i].text) {
            consumed[i] = true;
            header_boxes.push(lines[i].bbox);
        }
    }

    let exclusions = ExclusionZones::build(page, &header_boxes, &metadata_boxes);

    let survivors: Vec<Cluster> = lines
        .into_iter()
        .zip(consumed)
        .filter_map(|(line, used)| (!used).then_some(line))
        .filter(|line| {
            if line.text.chars().count() > TEXT_MAX {
                debug!(page = page.index, text = %line.text, "dropped oversized text");
                return false;
            }
            if vocab::is_excluded_text(&line.text) {
                debug!(page = page.index, text = %line.text, "dropped excluded annotation");
                return false;
            }
            if exclusions.excludes(&line.bbox) {
                debug!(page = page.index, text = %line.text, "dropped text inside exclusion zone");
                return false;
            }
            if exclusions.is_border_noise(&line.bbox, &line.text) {
                debug!(page = page.index, text = %line.text, "dropped border fragment");
                return false;
            }
            true
        })
        .collect();

    let mut callouts: Vec<DimensionCallout> = cluster::merge_stacked(survivors)
        .into_iter()
        .filter(|c| {
            let keep = crate::parse::looks_like_dimension(&c.text);
            if !keep {
                debug!(page = page.index, text = %c.text, "not a value expression");
            }
            keep
        })
        .map(|c| {
            let (anchor, self_anchored) = leader::find_anchor(&c.bbox, c.font_size, &page.strokes);
            if self_anchored {
                debug!(page = page.index, text = %c.text, "no leader found, anchoring to text");
            }
            DimensionCallout {
                page_index: page.index,
                token_indices: c.token_indices,
                bbox: c.bbox,
                font_size: c.font_size,
                raw_text: c.text,
                anchor,
                self_anchored,
            }
        })
        .collect();

    // Reading order: coarse top to bottom bands, left to right inside a
    // band, token order as the final tie break.
    callouts.sort_by(|a, b| {
        let band_a = (a.bbox.y0 / READING_BAND).floor();
        let band_b = (b.bbox.y0 / READING_BAND).floor();
        band_a
            .total_cmp(&band_b)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
            .then_with(|| first_token(a).cmp(&first_token(b)))
    });

    PageDetection { callouts, metadata }
}

fn first_token(c: &DimensionCallout) -> usize {
    c.token_indices.first().copied().unwrap_or(0)
}

/// A label with no value on its own line takes the nearest cell to the
/// right, or failing that the cell directly below.
fn find_value_neighbor(lines: &[Cluster], consumed: &[bool], label: usize) -> Option<usize> {
    let lb = &lines[label].bbox;
    let font = lines[label].font_size;

    let candidate = |j: usize| -> bool {
        !consumed[j] && j != label && vocab::metadata_label(&lines[j].text).is_none()
    };

    let mut right: Option<(f32, usize)> = None;
    for (j, line) in lines.iter().enumerate() {
        if !candidate(j) {
            continue;
        }
        let b = &line.bbox;
        let same_band = (b.center().y - lb.center().y).abs() <= font;
        let gap = b.x0 - lb.x1;
        if same_band && gap >= 0.0 && gap < VALUE_RIGHT_MAX_GAP {
            let replaces = right.map(|(g, _)| gap < g).unwrap_or(true);
            if replaces {
                right = Some((gap, j));
            }
        }
    }
    if let Some((_, j)) = right {
        return Some(j);
    }

    let mut below: Option<(f32, usize)> = None;
    for (j, line) in lines.iter().enumerate() {
        if !candidate(j) {
            continue;
        }
        let b = &line.bbox;
        let overlaps = b.x0 < lb.x1 && b.x1 > lb.x0;
        let gap = b.y0 - lb.y1;
        if overlaps && gap >= 0.0 && gap < VALUE_BELOW_MAX_GAP {
            let replaces = below.map(|(g, _)| gap < g).unwrap_or(true);
            if replaces {
                below = Some((gap, j));
            }
        }
    }
    below.map(|(_, j)| j)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BBox, Point, TextToken, VectorStroke};

    fn tok(text: &str, x0: f32, y0: f32) -> TextToken {
        let w = 6.0 * text.chars().count() as f32;
        TextToken {
            text: text.to_string(),
            bbox: BBox::new(x0, y0, x0 + w, y0 + 8.0),
            font_size: 8.0,
        }
    }

    fn leader_line(x: f32, y: f32) -> VectorStroke {
        VectorStroke::Line {
            from: Point::new(x, y),
            to: Point::new(x, y + 60.0),
        }
    }

    fn corners() -> Vec<TextToken> {
        vec![tok(".", 0.0, 0.0), tok(".", 794.0, 592.0)]
    }

    fn page(mut tokens: Vec<TextToken>, strokes: Vec<VectorStroke>) -> PageGeometry {
        tokens.extend(corners());
        PageGeometry {
            index: 0,
            tokens,
            strokes,
        }
    }

    #[test]
    fn test_detects_a_simple_callout() {
        let p = page(
            vec![
                tok("12.50", 200.0, 200.0),
                tok("±", 234.0, 200.0),
                tok("0.05", 244.0, 200.0),
            ],
            vec![leader_line(220.0, 212.0)],
        );
        let found = detect_callouts(&p);
        assert_eq!(found.callouts.len(), 1);
        assert_eq!(found.callouts[0].raw_text, "12.50 ± 0.05");
        assert!(!found.callouts[0].self_anchored);
        assert_eq!(found.callouts[0].anchor.y, 212.0);
    }

    #[test]
    fn test_prose_and_annotations_are_dropped() {
        let p = page(
            vec![
                tok("SEE", 200.0, 100.0),
                tok("NOTE", 224.0, 100.0),
                tok("4", 254.0, 100.0),
                tok("M8x1.25", 200.0, 150.0),
                tok("58-62", 200.0, 180.0),
                tok("HRC", 240.0, 180.0),
                tok("30.00", 200.0, 300.0),
            ],
            vec![],
        );
        let found = detect_callouts(&p);
        assert_eq!(found.callouts.len(), 1);
        assert_eq!(found.callouts[0].raw_text, "30.00");
        assert!(found.callouts[0].self_anchored);
    }

    #[test]
    fn test_metadata_inline_value() {
        let p = page(
            vec![tok("MATERIAL: 6061-T6", 600.0, 500.0), tok("12.50", 200.0, 200.0)],
            vec![],
        );
        let found = detect_callouts(&p);
        assert_eq!(found.metadata.material.as_deref(), Some("6061-T6"));
        assert_eq!(found.callouts.len(), 1);
    }

    #[test]
    fn test_metadata_value_in_next_cell() {
        let p = page(
            vec![tok("REV", 600.0, 500.0), tok("B2", 640.0, 500.0)],
            vec![],
        );
        let found = detect_callouts(&p);
        assert_eq!(found.metadata.revision.as_deref(), Some("B2"));
        // The harvested value must not surface as a callout.
        assert!(found.callouts.is_empty());
    }

    #[test]
    fn test_numbers_under_a_table_header_are_dropped() {
        let p = page(
            vec![
                tok("QTY", 300.0, 50.0),
                tok("12", 302.0, 80.0),
                // A neighbouring column of the same table.
                tok("25.40", 360.0, 110.0),
                tok("30.00", 100.0, 300.0),
            ],
            vec![],
        );
        let found = detect_callouts(&p);
        assert_eq!(found.callouts.len(), 1);
        assert_eq!(found.callouts[0].raw_text, "30.00");
    }

    #[test]
    fn test_hole_table_columns_are_dropped() {
        let p = page(
            vec![
                tok("HOLE TABLE", 500.0, 40.0),
                tok("12.70", 500.0, 80.0),
                tok("25.40", 560.0, 110.0),
                tok("30.00", 100.0, 300.0),
            ],
            vec![],
        );
        let found = detect_callouts(&p);
        assert_eq!(found.callouts.len(), 1);
        assert_eq!(found.callouts[0].raw_text, "30.00");
    }

    #[test]
    fn test_mid_page_label_leaves_dimensions_alone() {
        let p = page(
            vec![
                tok("SCALE 2:1", 300.0, 250.0),
                tok("12.50 ± 0.05", 400.0, 380.0),
                tok("TITLE: BRACKET", 600.0, 520.0),
            ],
            vec![],
        );
        let found = detect_callouts(&p);
        assert_eq!(found.callouts.len(), 1);
        assert_eq!(found.callouts[0].raw_text, "12.50 ± 0.05");
        assert_eq!(found.metadata.scale.as_deref(), Some("2:1"));
        assert_eq!(found.metadata.title.as_deref(), Some("BRACKET"));
    }

    #[test]
    fn test_stacked_count_modifier_rides_along() {
        let p = page(
            vec![tok("5.00 ± 0.05", 150.0, 200.0), tok("4X", 150.0, 212.0)],
            vec![],
        );
        let found = detect_callouts(&p);
        assert_eq!(found.callouts.len(), 1);
        assert_eq!(found.callouts[0].raw_text, "5.00 ± 0.05 4X");
    }

    #[test]
    fn test_reading_order_rows_then_columns() {
        let p = page(
            vec![
                tok("30.00", 500.0, 100.0),
                tok("10.00", 100.0, 100.0),
                tok("20.00", 300.0, 101.0),
                tok("40.00", 100.0, 300.0),
            ],
            vec![],
        );
        let found = detect_callouts(&p);
        let texts: Vec<&str> = found.callouts.iter().map(|c| c.raw_text.as_str()).collect();
        assert_eq!(texts, vec!["10.00", "20.00", "30.00", "40.00"]);
    }
}
