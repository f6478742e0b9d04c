//! Leader anchoring. A callout's balloon wants to sit near the point
//! where its leader line meets the text, so each callout is tied to the
//! closest stroke endpoint.

use crate::geometry::{BBox, Point, VectorStroke};

const SEARCH_FACTOR: f32 = 2.0;
const SEARCH_MIN: f32 = 12.0;
const TIE_BAND: f32 = 0.5;

/// Find the anchor point for a callout. Returns the point and whether the
/// callout had to anchor to itself because no stroke endpoint was in
/// reach.
pub fn find_anchor(bbox: &BBox, font_size: f32, strokes: &[VectorStroke]) -> (Point, bool) {
    let radius = (SEARCH_FACTOR * font_size).max(SEARCH_MIN);
    let mut best: Option<(f32, f32, Point)> = None;
    for stroke in strokes {
        // Leaders approach dimension text roughly perpendicular to the
        // baseline, so near ties go to the steeper stroke.
        let steepness = stroke.direction().map(|(_, dy)| dy.abs()).unwrap_or(0.0);
        let (a, b) = stroke.endpoints();
        for p in [a, b] {
            let dist = bbox.distance_to_point(p);
            if dist > radius {
                continue;
            }
            let replaces = match best {
                None => true,
                Some((best_dist, best_steepness, _)) => {
                    if (dist - best_dist).abs() <= TIE_BAND {
                        steepness > best_steepness
                    } else {
                        dist < best_dist
                    }
                }
            };
            if replaces {
                best = Some((dist, steepness, p));
            }
        }
    }
    match best {
        Some((_, _, p)) => (p, false),
        None => (Point::new(bbox.x1, bbox.center().y), true),
    }
}
