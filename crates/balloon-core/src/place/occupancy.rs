//! Uniform grid occupancy index for balloon placement. Tracks what
//! already sits on the page, so candidate positions only check entries
//! in nearby cells instead of the whole page.

use crate::geometry::{BBox, Point};
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Entry {
    Circle { center: Point, radius: f32 },
    Box(BBox),
}

impl Entry {
    fn bbox(&self) -> BBox {
        match *self {
            Entry::Circle { center, radius } => BBox::new(
                center.x - radius,
                center.y - radius,
                center.x + radius,
                center.y + radius,
            ),
            Entry::Box(b) => b,
        }
    }
}

#[derive(Debug)]
pub struct Occupancy {
    cell: f32,
    grid: HashMap<(i64, i64), Vec<usize>>,
    entries: Vec<Entry>,
}

impl Occupancy {
    pub fn new(cell: f32) -> Occupancy {
        Occupancy {
            cell: cell.max(1.0),
            grid: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn insert_box(&mut self, bbox: BBox) {
        self.insert(Entry::Box(bbox));
    }

    pub fn insert_circle(&mut self, center: Point, radius: f32) {
        self.insert(Entry::Circle { center, radius });
    }

    fn insert(&mut self, entry: Entry) {
        let idx = self.entries.len();
        let b = entry.bbox();
        self.entries.push(entry);
        let (c0, r0) = self.cell_of(b.x0, b.y0);
        let (c1, r1) = self.cell_of(b.x1, b.y1);
        for row in r0..=r1 {
            for col in c0..=c1 {
                self.grid.entry((col, row)).or_default().push(idx);
            }
        }
    }

    /// Summed overlap depth of a circle at `center` against everything
    /// nearby. Zero means the spot is free with `clearance` to spare.
    pub fn penetration(&self, center: Point, radius: f32, clearance: f32) -> f32 {
        let reach = radius + clearance;
        let (c0, r0) = self.cell_of(center.x - reach, center.y - reach);
        let (c1, r1) = self.cell_of(center.x + reach, center.y + reach);
        let mut seen: Vec<usize> = Vec::new();
        for row in r0..=r1 {
            for col in c0..=c1 {
                if let Some(indices) = self.grid.get(&(col, row)) {
                    seen.extend_from_slice(indices);
                }
            }
        }
        seen.sort_unstable();
        seen.dedup();

        let mut total = 0.0;
        for idx in seen {
            let depth = match self.entries[idx] {
                Entry::Circle {
                    center: other,
                    radius: other_radius,
                } => {
                    let required = radius + other_radius + clearance;
                    required - center.distance_to(other)
                }
                Entry::Box(b) => {
                    let required = radius + clearance;
                    required - b.distance_to_point(center)
                }
            };
            if depth > 0.0 {
                total += depth;
            }
        }
        total
    }

    pub fn is_free(&self, center: Point, radius: f32, clearance: f32) -> bool {
        self.penetration(center, radius, clearance) == 0.0
    }

    fn cell_of(&self, x: f32, y: f32) -> (i64, i64) {
        ((x / self.cell).floor() as i64, (y / self.cell).floor() as i64)
    }
}
