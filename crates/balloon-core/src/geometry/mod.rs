pub mod json;

use crate::error::{EngineError, PageFailure};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned bounding box in page units. y grows downward, so y0 is the
/// top edge and y1 the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn center(&self) -> Point {
        Point::new((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x0 && p.x <= self.x1 && p.y >= self.y0 && p.y <= self.y1
    }

    pub fn contains_box(&self, other: &BBox) -> bool {
        other.x0 >= self.x0 && other.x1 <= self.x1 && other.y0 >= self.y0 && other.y1 <= self.y1
    }

    pub fn intersects(&self, other: &BBox) -> bool {
        !(other.x0 > self.x1 || other.x1 < self.x0 || other.y0 > self.y1 || other.y1 < self.y0)
    }

    pub fn union(&self, other: &BBox) -> BBox {
        BBox::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }

    pub fn expanded(&self, pad: f32) -> BBox {
        BBox::new(self.x0 - pad, self.y0 - pad, self.x1 + pad, self.y1 + pad)
    }

    /// Distance from a point to the nearest edge of the box (0 if inside).
    pub fn distance_to_point(&self, p: Point) -> f32 {
        let dx = (self.x0 - p.x).max(0.0).max(p.x - self.x1);
        let dy = (self.y0 - p.y).max(0.0).max(p.y - self.y1);
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }
}

/// A run of text on the page as the decoder emitted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextToken {
    pub text: String,
    pub bbox: BBox,
    pub font_size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VectorStroke {
    Line {
        from: Point,
        to: Point,
    },
    /// Quadratic arc segment; `control` bounds the curve for bbox purposes.
    Arc {
        from: Point,
        to: Point,
        control: Point,
    },
}

impl VectorStroke {
    pub fn endpoints(&self) -> (Point, Point) {
        match *self {
            VectorStroke::Line { from, to } => (from, to),
            VectorStroke::Arc { from, to, .. } => (from, to),
        }
    }

    pub fn bbox(&self) -> BBox {
        match *self {
            VectorStroke::Line { from, to } => BBox::new(
                from.x.min(to.x),
                from.y.min(to.y),
                from.x.max(to.x),
                from.y.max(to.y),
            ),
            VectorStroke::Arc { from, to, control } => BBox::new(
                from.x.min(to.x).min(control.x),
                from.y.min(to.y).min(control.y),
                from.x.max(to.x).max(control.x),
                from.y.max(to.y).max(control.y),
            ),
        }
    }

    /// Unit direction vector for line strokes; None for degenerate lines
    /// and for arcs.
    pub fn direction(&self) -> Option<(f32, f32)> {
        match *self {
            VectorStroke::Line { from, to } => {
                let dx = to.x - from.x;
                let dy = to.y - from.y;
                let len = (dx * dx + dy * dy).sqrt();
                if len > f32::EPSILON {
                    Some((dx / len, dy / len))
                } else {
                    None
                }
            }
            VectorStroke::Arc { .. } => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        match *self {
            VectorStroke::Line { from, to } => from.is_finite() && to.is_finite(),
            VectorStroke::Arc { from, to, control } => {
                from.is_finite() && to.is_finite() && control.is_finite()
            }
        }
    }
}

/// Parsed content of a single drawing page. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub index: usize,
    pub tokens: Vec<TextToken>,
    pub strokes: Vec<VectorStroke>,
}

/// Check that a page's coordinates are structurally usable. A failing page
/// is skipped with a page-scoped error; other pages continue.
pub fn validate_page(page: &PageGeometry) -> Result<(), PageFailure> {
    for (i, token) in page.tokens.iter().enumerate() {
        if !token.bbox.is_finite() {
            return Err(PageFailure::new(
                page.index,
                format!("token {} has non-finite bounding box", i),
            ));
        }
        if token.bbox.x1 < token.bbox.x0 || token.bbox.y1 < token.bbox.y0 {
            return Err(PageFailure::new(
                page.index,
                format!("token {} has inverted bounding box", i),
            ));
        }
        if !(token.font_size.is_finite() && token.font_size > 0.0) {
            return Err(PageFailure::new(
                page.index,
                format!("token {} has non-positive font size", i),
            ));
        }
    }

    for (i, stroke) in page.strokes.iter().enumerate() {
        if !stroke.is_finite() {
            return Err(PageFailure::new(
                page.index,
                format!("stroke {} has non-finite coordinates", i),
            ));
        }
    }

    Ok(())
}

/// Trait for page-geometry providers. The PDF decoding side lives behind
/// this boundary; the engine only ever sees PageGeometry.
pub trait GeometrySource: Send + Sync {
    /// Decode input bytes into one PageGeometry per page.
    fn load_pages(&self, bytes: &[u8]) -> Result<Vec<PageGeometry>, EngineError>;

    /// Name of this geometry source (for diagnostics).
    fn source_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(tokens: Vec<TextToken>, strokes: Vec<VectorStroke>) -> PageGeometry {
        PageGeometry {
            index: 0,
            tokens,
            strokes,
        }
    }

    fn tok(text: &str, x0: f32, y0: f32, x1: f32, y1: f32) -> TextToken {
        TextToken {
            text: text.into(),
            bbox: BBox::new(x0, y0, x1, y1),
            font_size: 10.0,
        }
    }

    #[test]
    fn test_valid_page_passes() {
        let p = page(
            vec![tok("10.0", 5.0, 5.0, 25.0, 15.0)],
            vec![VectorStroke::Line {
                from: Point::new(0.0, 0.0),
                to: Point::new(10.0, 0.0),
            }],
        );
        assert!(validate_page(&p).is_ok());
    }

    #[test]
    fn test_inverted_bbox_rejected() {
        let p = page(vec![tok("10.0", 25.0, 5.0, 5.0, 15.0)], vec![]);
        let err = validate_page(&p).unwrap_err();
        assert!(err.reason.contains("inverted"));
    }

    #[test]
    fn test_nan_coordinate_rejected() {
        let p = page(
            vec![],
            vec![VectorStroke::Line {
                from: Point::new(f32::NAN, 0.0),
                to: Point::new(10.0, 0.0),
            }],
        );
        assert!(validate_page(&p).is_err());
    }

    #[test]
    fn test_zero_font_size_rejected() {
        let mut t = tok("5", 0.0, 0.0, 5.0, 5.0);
        t.font_size = 0.0;
        assert!(validate_page(&page(vec![t], vec![])).is_err());
    }

    #[test]
    fn test_bbox_distance_to_point() {
        let b = BBox::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(b.distance_to_point(Point::new(15.0, 15.0)), 0.0);
        assert_eq!(b.distance_to_point(Point::new(25.0, 15.0)), 5.0);
        let d = b.distance_to_point(Point::new(23.0, 24.0));
        assert!((d - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_stroke_direction() {
        let s = VectorStroke::Line {
            from: Point::new(0.0, 0.0),
            to: Point::new(0.0, 8.0),
        };
        let (dx, dy) = s.direction().unwrap();
        assert!(dx.abs() < 1e-6);
        assert!((dy - 1.0).abs() < 1e-6);
    }
}
