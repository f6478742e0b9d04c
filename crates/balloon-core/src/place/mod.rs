//! Balloon placement. Each callout gets a circular balloon near its
//! anchor, clear of page text and of balloons already placed. Candidates
//! are tried on growing rings around the anchor, starting in the
//! direction that points away from the local linework.
//!
//! Placement never fails. When every candidate collides the least
//! overlapping one is taken and the overlap depth is carried on the
//! result so it can be reported.

pub mod occupancy;

use crate::config::EngineConfig;
use crate::geometry::{PageGeometry, Point};
use crate::model::DimensionCallout;
use occupancy::Occupancy;
use tracing::debug;

/// Balloon radius in page units.
pub const BALLOON_RADIUS: f32 = 8.0;

const RING_START: f32 = 15.0;
const RING_GROWTH: f32 = 15.0;
const LOCAL_STROKE_REACH: f32 = 50.0;
const ANGLE_STEPS_DEG: [f32; 8] = [0.0, -45.0, 45.0, -90.0, 90.0, -135.0, 135.0, 180.0];

/// A balloon position before numbering. `residual_overlap` is zero for a
/// clean spot, or the summed penetration depth of the least bad spot on a
/// page too crowded for a clean one.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBalloon {
    pub callout_index: usize,
    pub center: Point,
    pub radius: f32,
    pub residual_overlap: f32,
}

/// Place one balloon per callout, in callout order.
pub fn place_balloons(
    page: &PageGeometry,
    callouts: &[DimensionCallout],
    config: &EngineConfig,
) -> Vec<PlacedBalloon> {
    let clearance = config.placement_clearance_margin;
    let mut occ = Occupancy::new(2.0 * (BALLOON_RADIUS + clearance));
    for tok in &page.tokens {
        occ.insert_box(tok.bbox);
    }

    let mut placed = Vec::with_capacity(callouts.len());
    for (idx, callout) in callouts.iter().enumerate() {
        let (bx, by) = away_direction(page, callout.anchor);
        let base_angle = by.atan2(bx);

        let mut best: Option<(f32, Point)> = None;
        for attempt in 0..config.placement_max_attempts {
            let ring = attempt as usize / ANGLE_STEPS_DEG.len();
            let step = attempt as usize % ANGLE_STEPS_DEG.len();
            let angle = base_angle + ANGLE_STEPS_DEG[step].to_radians();
            let offset = RING_START + ring as f32 * RING_GROWTH;
            let center = Point::new(
                callout.anchor.x + offset * angle.cos(),
                callout.anchor.y + offset * angle.sin(),
            );
            let pen = occ.penetration(center, BALLOON_RADIUS, clearance);
            if pen == 0.0 {
                best = Some((0.0, center));
                break;
            }
            if best.map(|(b, _)| pen < b).unwrap_or(true) {
                best = Some((pen, center));
            }
        }

        // Config validation guarantees at least one attempt.
        let (residual, center) = best.unwrap_or((
            0.0,
            Point::new(callout.anchor.x + RING_START, callout.anchor.y),
        ));
        if residual > 0.0 {
            debug!(
                page = page.index,
                text = %callout.raw_text,
                residual,
                "no clear spot, taking least overlapping candidate"
            );
        }
        occ.insert_circle(center, BALLOON_RADIUS);
        placed.push(PlacedBalloon {
            callout_index: idx,
            center,
            radius: BALLOON_RADIUS,
            residual_overlap: residual,
        });
    }
    placed
}

/// Direction from the centroid of nearby stroke endpoints to the anchor,
/// so the first candidate lands in open space. Falls back to +x when the
/// neighbourhood is empty or symmetric.
fn away_direction(page: &PageGeometry, anchor: Point) -> (f32, f32) {
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut count = 0u32;
    for stroke in &page.strokes {
        let (a, b) = stroke.endpoints();
        for p in [a, b] {
            if p.distance_to(anchor) <= LOCAL_STROKE_REACH {
                sum_x += p.x;
                sum_y += p.y;
                count += 1;
            }
        }
    }
    if count == 0 {
        return (1.0, 0.0);
    }
    let n = count as f32;
    let dx = anchor.x - sum_x / n;
    let dy = anchor.y - sum_y / n;
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1.0 {
        (1.0, 0.0)
    } else {
        (dx / len, dy / len)
    }
}
