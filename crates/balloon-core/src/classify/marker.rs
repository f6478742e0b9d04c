//! Critical dimension markers. Drawings flag a critical dimension by
//! enclosing the callout in drawn linework, most often a box or a
//! diamond. A marker is a closed loop of strokes whose extent contains
//! the callout box without being much larger than it.

use crate::geometry::{BBox, PageGeometry, VectorStroke};
use crate::model::MarkerShape;

const CHAIN_EPSILON: f32 = 1.5;
const ENCLOSE_SLACK: f32 = 40.0;
const MAX_LOOP_EDGES: usize = 8;

/// Find a closed stroke loop enclosing `bbox` and name its shape. Loops
/// that close but match no known outline come back as [`MarkerShape::Any`].
pub fn enclosing_marker(page: &PageGeometry, bbox: &BBox) -> Option<MarkerShape> {
    let reach = bbox.expanded(ENCLOSE_SLACK);
    let max_w = bbox.width() + 2.0 * ENCLOSE_SLACK;
    let max_h = bbox.height() + 2.0 * ENCLOSE_SLACK;
    let candidates: Vec<&VectorStroke> = page
        .strokes
        .iter()
        .filter(|s| {
            let b = s.bbox();
            b.intersects(&reach) && b.width() <= max_w && b.height() <= max_h
        })
        .collect();

    // A closed arc is a circle marker all by itself.
    for s in &candidates {
        if let VectorStroke::Arc { from, to, .. } = s {
            if from.distance_to(*to) <= CHAIN_EPSILON && s.bbox().contains_box(bbox) {
                return Some(MarkerShape::Circle);
            }
        }
    }

    for start in 0..candidates.len() {
        if let Some(shape) = walk_loop(&candidates, start, bbox) {
            return Some(shape);
        }
    }
    None
}

/// Chain strokes end to start from `start` until the walk returns to its
/// origin. None when the chain dead ends or overruns the edge budget.
pub(crate) fn chain_loop(candidates: &[&VectorStroke], start: usize) -> Option<Vec<usize>> {
    let (origin, mut cursor) = candidates[start].endpoints();
    let mut used = vec![false; candidates.len()];
    used[start] = true;
    let mut members = vec![start];

    while members.len() < MAX_LOOP_EDGES {
        if members.len() >= 3 && cursor.distance_to(origin) <= CHAIN_EPSILON {
            return Some(members);
        }
        let next = candidates.iter().enumerate().find(|(j, s)| {
            if used[*j] {
                return false;
            }
            let (a, b) = s.endpoints();
            a.distance_to(cursor) <= CHAIN_EPSILON || b.distance_to(cursor) <= CHAIN_EPSILON
        });
        match next {
            Some((j, s)) => {
                used[j] = true;
                members.push(j);
                let (a, b) = s.endpoints();
                cursor = if a.distance_to(cursor) <= CHAIN_EPSILON {
                    b
                } else {
                    a
                };
            }
            None => return None,
        }
    }
    None
}

/// The loop must enclose the callout to count as its marker.
fn walk_loop(candidates: &[&VectorStroke], start: usize, callout: &BBox) -> Option<MarkerShape> {
    let members = chain_loop(candidates, start)?;
    let loop_bbox = members
        .iter()
        .map(|&j| candidates[j].bbox())
        .reduce(|a, b| a.union(&b))?;
    if !loop_bbox.contains_box(callout) {
        return None;
    }
    Some(identify_shape(candidates, &members))
}

fn identify_shape(candidates: &[&VectorStroke], members: &[usize]) -> MarkerShape {
    if members
        .iter()
        .any(|&j| matches!(candidates[j], VectorStroke::Arc { .. }))
    {
        return MarkerShape::Circle;
    }
    match members.len() {
        3 => MarkerShape::Triangle,
        4 => {
            let all_axis = members.iter().all(|&j| {
                candidates[j]
                    .direction()
                    .map(|(dx, dy)| dx.abs() >= 0.97 || dy.abs() >= 0.97)
                    .unwrap_or(false)
            });
            if all_axis {
                MarkerShape::Rectangle
            } else {
                MarkerShape::Diamond
            }
        }
        _ => MarkerShape::Any,
    }
}
