//! Spatial exclusion zones. Title blocks, parts lists and the drawing
//! border all carry numeric text that is never a dimension, and they all
//! have recognizable geometry: dense cell linework, header rows, or
//! proximity to the sheet edge.

use crate::classify::marker;
use crate::geometry::{BBox, PageGeometry, VectorStroke};

const BORDER_MARGIN: f32 = 30.0;
const BORDER_TEXT_MAX: usize = 2;
const TOUCH_TOLERANCE: f32 = 1.0;
const CLUSTER_MIN: usize = 3;
const BOTTOM_BAND: f32 = 0.70;
const ZONE_PADDING: f32 = 10.0;
const TABLE_PADDING: f32 = 5.0;

/// Regions of a page where candidate callouts are discarded.
pub struct ExclusionZones {
    zones: Vec<BBox>,
    content: BBox,
}

impl ExclusionZones {
    /// Derive the zones for one page. `header_boxes` are table header
    /// tokens and `metadata_boxes` are title block label and value tokens,
    /// both found by the vocabulary scan.
    pub fn build(
        page: &PageGeometry,
        header_boxes: &[BBox],
        metadata_boxes: &[BBox],
    ) -> ExclusionZones {
        let content = content_bbox(page);
        let bottom_cut = content.y0 + BOTTOM_BAND * content.height();
        let mut zones = cell_linework_zones(page, bottom_cut);

        // Only fields in the bottom band form the title block zone; a
        // label harvested up in the drawing area stays unzoned.
        let block = metadata_boxes
            .iter()
            .filter(|b| b.center().y > bottom_cut)
            .copied()
            .reduce(|acc, b| acc.union(&b));
        if let Some(block) = block {
            zones.push(block.expanded(ZONE_PADDING));
        }

        for header in header_boxes {
            // A table owns everything below and right of its header,
            // down to the edge of the drawn content.
            zones.push(BBox {
                x0: header.x0 - TABLE_PADDING,
                y0: header.y0 - TABLE_PADDING,
                x1: content.x1,
                y1: content.y1,
            });
        }

        ExclusionZones { zones, content }
    }

    /// True when the box center falls inside any zone.
    pub fn excludes(&self, bbox: &BBox) -> bool {
        let center = bbox.center();
        self.zones.iter().any(|z| z.contains(center))
    }

    /// Short fragments hugging the sheet edge are border decoration, not
    /// dimensions.
    pub fn is_border_noise(&self, bbox: &BBox, text: &str) -> bool {
        if text.trim().chars().count() > BORDER_TEXT_MAX {
            return false;
        }
        bbox.x0 < self.content.x0 + BORDER_MARGIN
            || bbox.x1 > self.content.x1 - BORDER_MARGIN
            || bbox.y0 < self.content.y0 + BORDER_MARGIN
            || bbox.y1 > self.content.y1 - BORDER_MARGIN
    }
}

/// The extent of everything drawn on the page.
fn content_bbox(page: &PageGeometry) -> BBox {
    let mut boxes = page
        .tokens
        .iter()
        .map(|t| t.bbox)
        .chain(page.strokes.iter().map(|s| s.bbox()));
    let first = boxes.next().unwrap_or(BBox {
        x0: 0.0,
        y0: 0.0,
        x1: 1.0,
        y1: 1.0,
    });
    boxes.fold(first, |acc, b| acc.union(&b))
}

struct Candidate<'a> {
    stroke: &'a VectorStroke,
    bbox: BBox,
    boxy: bool,
}

/// Find clusters of cell sized linework. Title blocks and tables are drawn
/// as grids of small boxes, so touching cell strokes form large connected
/// groups, while leader lines and arrowheads stay isolated.
fn cell_linework_zones(page: &PageGeometry, bottom_cut: f32) -> Vec<BBox> {
    let candidates: Vec<Candidate> = page
        .strokes
        .iter()
        .filter_map(|s| {
            let b = s.bbox();
            let (w, h) = (b.width(), b.height());
            let boxy = w > 10.0 && w < 400.0 && h > 5.0 && h < 200.0;
            let edge = (w > 10.0 && w < 400.0 && h <= 5.0)
                || (h > 5.0 && h < 200.0 && w <= 10.0);
            (boxy || edge).then_some(Candidate {
                stroke: s,
                bbox: b,
                boxy,
            })
        })
        .collect();

    let mut zones = Vec::new();
    let mut assigned = vec![false; candidates.len()];
    for start in 0..candidates.len() {
        if assigned[start] {
            continue;
        }
        assigned[start] = true;
        let mut stack = vec![start];
        let mut members = Vec::new();
        while let Some(i) = stack.pop() {
            members.push(i);
            let reach = candidates[i].bbox.expanded(TOUCH_TOLERANCE);
            for (j, other) in candidates.iter().enumerate() {
                if !assigned[j] && reach.intersects(&other.bbox) {
                    assigned[j] = true;
                    stack.push(j);
                }
            }
        }

        if is_marker_frame(&candidates, &members) {
            continue;
        }

        let in_bottom_band = members
            .iter()
            .any(|&i| candidates[i].boxy && candidates[i].bbox.center().y > bottom_cut);
        if members.len() >= CLUSTER_MIN || in_bottom_band {
            let union = members
                .iter()
                .skip(1)
                .fold(candidates[members[0]].bbox, |acc, &i| {
                    acc.union(&candidates[i].bbox)
                });
            zones.push(union);
        }
    }
    zones
}

/// A small closed loop of edge strokes is a critical dimension frame, not
/// cell linework. Zoning it would swallow the text it flags. Leader lines
/// meet frames, so extra strokes are allowed as long as none of them runs
/// inside the loop; an internal edge is a cell divider.
fn is_marker_frame(candidates: &[Candidate], members: &[usize]) -> bool {
    if members.iter().any(|&i| candidates[i].boxy) {
        return false;
    }
    let strokes: Vec<&VectorStroke> = members.iter().map(|&i| candidates[i].stroke).collect();
    for start in 0..strokes.len() {
        let Some(loop_members) = marker::chain_loop(&strokes, start) else {
            continue;
        };
        let Some(loop_bbox) = loop_members
            .iter()
            .map(|&j| strokes[j].bbox())
            .reduce(|a, b| a.union(&b))
        else {
            continue;
        };
        let divided = (0..strokes.len())
            .filter(|j| !loop_members.contains(j))
            .any(|j| loop_bbox.contains_box(&strokes[j].bbox()));
        if !divided {
            return true;
        }
    }
    false
}
