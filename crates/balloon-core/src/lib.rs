pub mod classify;
pub mod config;
pub mod detect;
pub mod error;
pub mod geometry;
pub mod model;
pub mod parse;
pub mod place;
pub mod report;
pub mod review;

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use config::EngineConfig;
use error::{EngineError, PageFailure};
use geometry::{BBox, GeometrySource, PageGeometry, Point};
use model::{Balloon, Dimension, DimensionCallout, DocumentMetadata, LeaderStub};
use report::{
    BalloonSequence, DimensionScan, InspectionReport, PageOverlay, PageScan, ReportRow,
    ScanFinding,
};
use review::ReviewItem;

/// Main API entry point: turn raw drawing geometry into an inspection report.
///
/// Pages are processed independently; a page that fails validation is
/// recorded in the report instead of aborting the run. Callout text the
/// interpreter rejects and balloons that could not be placed cleanly end
/// up in the report's review list.
pub fn build_report(
    bytes: &[u8],
    source: &dyn GeometrySource,
    config: &EngineConfig,
) -> Result<InspectionReport, EngineError> {
    info!(
        source = source.source_name(),
        len = bytes.len(),
        "loading drawing geometry"
    );
    let pages = source.load_pages(bytes)?;
    Ok(build_report_from_pages(&pages, config))
}

/// Build a report from already-loaded page geometry.
pub fn build_report_from_pages(pages: &[PageGeometry], config: &EngineConfig) -> InspectionReport {
    // Detect, interpret and place per page, in parallel.
    let mut outcomes: Vec<Result<PageOutcome, PageFailure>> = pages
        .par_iter()
        .map(|page| process_page(page, config))
        .collect();

    // Balloon numbering is global and follows page order, so the merge
    // below runs sequentially over pages sorted by index.
    outcomes.sort_by_key(|outcome| match outcome {
        Ok(out) => out.page_index,
        Err(failure) => failure.page_index,
    });

    let mut seen_pages = HashSet::new();
    let mut metadata = DocumentMetadata::default();
    let mut rows = Vec::new();
    let mut pages_out = Vec::new();
    let mut review = Vec::new();
    let mut page_failures = Vec::new();
    let mut seq = BalloonSequence::new();

    for outcome in outcomes {
        let out = match outcome {
            Ok(out) => out,
            Err(failure) => {
                warn!(page = failure.page_index, reason = %failure.reason, "skipping page");
                page_failures.push(failure);
                continue;
            }
        };
        if !seen_pages.insert(out.page_index) {
            page_failures.push(PageFailure::new(out.page_index, "duplicate page index"));
            continue;
        }

        metadata.merge_missing(&out.metadata);

        let mut balloons = Vec::new();
        for entry in out.entries {
            let id = seq.next_id();
            if entry.residual_overlap > 0.0 {
                review.push(ReviewItem::placement_conflict(
                    out.page_index,
                    &entry.raw_text,
                    id,
                    format!(
                        "balloon overlaps nearby content by {:.1} units",
                        entry.residual_overlap
                    ),
                ));
            }
            let leader = (!entry.self_anchored).then(|| LeaderStub {
                from: entry.anchor,
                to: entry.center,
            });
            balloons.push(Balloon {
                id,
                page_index: out.page_index,
                center: entry.center,
                radius: entry.radius,
                callout_bbox: entry.bbox,
                leader,
            });
            rows.push(ReportRow::from_dimension(id, out.page_index, &entry.dimension));
        }

        review.extend(out.review);
        pages_out.push(PageOverlay {
            page_index: out.page_index,
            balloons,
        });
    }

    info!(
        rows = rows.len(),
        review = review.len(),
        failed_pages = page_failures.len(),
        "report assembled"
    );

    InspectionReport {
        metadata,
        rows,
        pages: pages_out,
        review,
        page_failures,
    }
}

/// List every dimension the detector and interpreter can recover, without
/// placing balloons. Same page containment as `build_report`: a page that
/// fails validation is carried as a failure, the rest are scanned.
pub fn scan_dimensions(
    bytes: &[u8],
    source: &dyn GeometrySource,
    config: &EngineConfig,
) -> Result<DimensionScan, EngineError> {
    let pages = source.load_pages(bytes)?;
    Ok(scan_pages(&pages, config))
}

/// Scan already-loaded page geometry for dimensions.
pub fn scan_pages(pages: &[PageGeometry], config: &EngineConfig) -> DimensionScan {
    let mut scanned = Vec::new();
    let mut page_failures = Vec::new();
    for page in pages {
        match scan_page(page, config) {
            Ok(scan) => scanned.push(scan),
            Err(failure) => page_failures.push(failure),
        }
    }
    scanned.sort_by_key(|scan| scan.page_index);
    page_failures.sort_by_key(|failure| failure.page_index);
    DimensionScan {
        pages: scanned,
        page_failures,
    }
}

fn scan_page(page: &PageGeometry, config: &EngineConfig) -> Result<PageScan, PageFailure> {
    geometry::validate_page(page)?;
    let detection = detect::detect_callouts(page);
    let findings = detection
        .callouts
        .into_iter()
        .map(
            |callout| match parse::interpret_callout(&callout.raw_text, config.unit_default) {
                Ok(mut dim) => {
                    classify::classify_critical(&mut dim, &callout, page, config);
                    ScanFinding {
                        raw_text: callout.raw_text,
                        dimension: Some(dim),
                        error: None,
                    }
                }
                Err(reason) => ScanFinding {
                    raw_text: callout.raw_text,
                    dimension: None,
                    error: Some(reason),
                },
            },
        )
        .collect();
    Ok(PageScan {
        page_index: page.index,
        findings,
    })
}

struct PageOutcome {
    page_index: usize,
    metadata: DocumentMetadata,
    entries: Vec<PageEntry>,
    review: Vec<ReviewItem>,
}

struct PageEntry {
    dimension: Dimension,
    raw_text: String,
    bbox: BBox,
    anchor: Point,
    self_anchored: bool,
    center: Point,
    radius: f32,
    residual_overlap: f32,
}

/// Run the single-page pipeline: detect callouts, interpret their text,
/// classify criticality and place balloons.
fn process_page(page: &PageGeometry, config: &EngineConfig) -> Result<PageOutcome, PageFailure> {
    geometry::validate_page(page)?;

    let detection = detect::detect_callouts(page);
    let mut review = Vec::new();
    let mut callouts: Vec<DimensionCallout> = Vec::new();
    let mut dims: Vec<Dimension> = Vec::new();

    for callout in detection.callouts {
        match parse::interpret_callout(&callout.raw_text, config.unit_default) {
            Ok(mut dim) => {
                classify::classify_critical(&mut dim, &callout, page, config);
                dims.push(dim);
                callouts.push(callout);
            }
            Err(reason) => {
                warn!(
                    page = page.index,
                    text = %callout.raw_text,
                    %reason,
                    "dimension not interpretable"
                );
                review.push(ReviewItem::unparseable(page.index, &callout.raw_text, reason));
            }
        }
    }

    let placed = place::place_balloons(page, &callouts, config);
    debug!(page = page.index, callouts = callouts.len(), "page processed");

    let entries = placed
        .into_iter()
        .map(|p| {
            let callout = &callouts[p.callout_index];
            PageEntry {
                dimension: dims[p.callout_index].clone(),
                raw_text: callout.raw_text.clone(),
                bbox: callout.bbox,
                anchor: callout.anchor,
                self_anchored: callout.self_anchored,
                center: p.center,
                radius: p.radius,
                residual_overlap: p.residual_overlap,
            }
        })
        .collect();

    Ok(PageOutcome {
        page_index: page.index,
        metadata: detection.metadata,
        entries,
        review,
    })
}
