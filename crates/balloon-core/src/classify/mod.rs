//! Critical dimension classification.
//!
//! Two independent triggers mark a dimension critical: a tolerance band
//! that is tight relative to the nominal, or a marker drawn around the
//! callout on the page.

pub mod marker;

use crate::config::EngineConfig;
use crate::geometry::PageGeometry;
use crate::model::{Dimension, DimensionCallout, MarkerShape};
use rust_decimal::Decimal;
use tracing::debug;

/// Set the `critical` flag on a parsed dimension.
pub fn classify_critical(
    dim: &mut Dimension,
    callout: &DimensionCallout,
    page: &PageGeometry,
    config: &EngineConfig,
) {
    if band_trigger(dim, config) {
        debug!(page = page.index, text = %callout.raw_text, "critical by tolerance band");
        dim.critical = true;
        return;
    }
    if let Some(shape) = marker::enclosing_marker(page, &callout.bbox) {
        if shape_allowed(&config.critical_marker_shapes, shape) {
            debug!(page = page.index, text = %callout.raw_text, %shape, "critical by marker");
            dim.critical = true;
        }
    }
}

/// A band is tight when it is positive and narrower than the configured
/// fraction of the nominal. A zero width band is an untoleranced value,
/// not a critical one.
fn band_trigger(dim: &Dimension, config: &EngineConfig) -> bool {
    let band = dim.band_width();
    if band <= Decimal::ZERO {
        return false;
    }
    band < config.critical_tolerance_fraction * dim.nominal.abs()
}

fn shape_allowed(allowed: &[MarkerShape], detected: MarkerShape) -> bool {
    allowed.contains(&MarkerShape::Any)
        || (detected != MarkerShape::Any && allowed.contains(&detected))
}
