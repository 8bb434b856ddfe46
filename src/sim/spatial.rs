//! Uniform grid for broad-phase brick queries
//!
//! Bricks never move, so the grid is rebuilt only on level load or when the
//! brick set changes. Queries return a superset of true contacts; the exact
//! circle/rect test runs downstream.

use std::collections::HashMap;

use super::brick::Brick;
use super::geometry::Rect;

type CellKey = (i32, i32);

/// Grid of brick indices keyed by cell coordinate
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    cell_width: f32,
    cell_height: f32,
    buckets: HashMap<CellKey, Vec<usize>>,
    /// Brick id per indexed slot, for removal by id
    ids: HashMap<u32, usize>,
    /// Occupied cell range, min and max corners
    extent: Option<(CellKey, CellKey)>,
}

impl SpatialIndex {
    pub fn new(cell_width: f32, cell_height: f32) -> Self {
        Self {
            cell_width: cell_width.max(1.0),
            cell_height: cell_height.max(1.0),
            buckets: HashMap::new(),
            ids: HashMap::new(),
            extent: None,
        }
    }

    fn key(&self, x: f32, y: f32) -> CellKey {
        let cx = (x / self.cell_width).floor() as i32;
        let cy = (y / self.cell_height).floor() as i32;
        (cx, cy)
    }

    /// Cell range covered by `rect`, inclusive
    fn cell_span(&self, rect: &Rect) -> (CellKey, CellKey) {
        (
            self.key(rect.left(), rect.top()),
            self.key(rect.right(), rect.bottom()),
        )
    }

    /// Re-index all active bricks; `bricks[i]` is stored as index `i`
    pub fn rebuild(&mut self, bricks: &[Brick]) {
        self.buckets.clear();
        self.ids.clear();
        self.extent = None;
        for (index, brick) in bricks.iter().enumerate() {
            if brick.is_destroyed() || !crate::is_finite_vec(brick.rect.pos) {
                continue;
            }
            let ((x0, y0), (x1, y1)) = self.cell_span(&brick.rect);
            for cx in x0..=x1 {
                for cy in y0..=y1 {
                    self.buckets.entry((cx, cy)).or_default().push(index);
                }
            }
            self.ids.insert(brick.id, index);
            self.extent = Some(match self.extent {
                None => ((x0, y0), (x1, y1)),
                Some(((ax, ay), (bx, by))) => ((ax.min(x0), ay.min(y0)), (bx.max(x1), by.max(y1))),
            });
        }
        log::debug!(
            "Spatial index rebuilt: {} bricks in {} cells",
            self.ids.len(),
            self.buckets.len()
        );
    }

    /// Drop one brick (by id) from every cell it occupies
    pub fn remove(&mut self, brick_id: u32) {
        if let Some(index) = self.ids.remove(&brick_id) {
            self.buckets.retain(|_, slots| {
                slots.retain(|&i| i != index);
                !slots.is_empty()
            });
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Brick indices in the cells overlapping `rect`, plus a one-cell margin
    ///
    /// Sorted and deduplicated, so iteration order is stable across runs.
    /// An empty index or empty region yields an empty result.
    pub fn query(&self, rect: &Rect) -> Vec<usize> {
        if self.buckets.is_empty() || !crate::is_finite_vec(rect.pos) || !crate::is_finite_vec(rect.size) {
            return Vec::new();
        }
        let Some(((min_x, min_y), (max_x, max_y))) = self.extent else {
            return Vec::new();
        };
        // Huge coordinates saturate in the cast; clip to occupied cells
        let ((x0, y0), (x1, y1)) = self.cell_span(rect);
        let (x0, x1) = (x0.saturating_sub(1).max(min_x), x1.saturating_add(1).min(max_x));
        let (y0, y1) = (y0.saturating_sub(1).max(min_y), y1.saturating_add(1).min(max_y));
        let mut out = Vec::new();
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                if let Some(slots) = self.buckets.get(&(cx, cy)) {
                    out.extend_from_slice(slots);
                }
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Candidates near a circle
    pub fn query_circle(&self, center: glam::Vec2, radius: f32) -> Vec<usize> {
        self.query(&Rect::around_circle(center, radius))
    }
}
