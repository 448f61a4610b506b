//! Transient occupancy matrix built fresh for each resolution pass.

use homegrid_core::{CellPos, CellRect, GridDims};
use tracing::warn;

/// Boolean matrix marking which cells of one `(surface, page)` are taken.
///
/// Rebuilt per pass; never persisted. Marking a rect whose cells fall
/// partially outside the grid skips the out-of-bounds cells and logs a
/// warning — legacy data with stale coordinates must degrade, not crash.
#[derive(Debug, Clone)]
pub struct Occupancy {
    rows: u16,
    cols: u16,
    cells: Vec<bool>,
}

impl Occupancy {
    /// Allocate an all-free matrix for the given dimensions.
    pub fn new(dims: GridDims) -> Self {
        Self {
            rows: dims.rows(),
            cols: dims.cols(),
            cells: vec![false; usize::from(dims.rows()) * usize::from(dims.cols())],
        }
    }

    /// Row count.
    pub const fn rows(&self) -> u16 {
        self.rows
    }

    /// Column count.
    pub const fn cols(&self) -> u16 {
        self.cols
    }

    /// True if the cell lies within the matrix.
    pub fn contains(&self, pos: CellPos) -> bool {
        pos.row >= 0 && pos.col >= 0 && pos.row < self.rows as i16 && pos.col < self.cols as i16
    }

    #[inline]
    fn idx(&self, pos: CellPos) -> usize {
        usize::from(pos.row as u16) * usize::from(self.cols) + usize::from(pos.col as u16)
    }

    /// True if the in-bounds cell is already taken.
    ///
    /// Out-of-bounds cells report free: they carry no occupancy and cannot
    /// conflict with anything.
    pub fn is_occupied(&self, pos: CellPos) -> bool {
        self.contains(pos) && self.cells[self.idx(pos)]
    }

    /// Mark every in-bounds cell of the rect as taken.
    ///
    /// Cells outside the matrix are skipped and reported once per rect.
    pub fn mark_rect(&mut self, rect: &CellRect) {
        let mut skipped = 0u32;
        for pos in rect.cells() {
            if self.contains(pos) {
                let i = self.idx(pos);
                self.cells[i] = true;
            } else {
                skipped += 1;
            }
        }
        if skipped > 0 {
            warn!(
                origin = %rect.origin,
                rows = rect.span.rows(),
                cols = rect.span.cols(),
                skipped,
                "rect extends outside the grid; out-of-bounds cells not marked"
            );
        }
    }

    /// True if the rect is fully in-bounds and every cell is free.
    pub fn is_free_rect(&self, rect: &CellRect) -> bool {
        if rect.origin.row < 0
            || rect.origin.col < 0
            || rect.row_end() > i32::from(self.rows)
            || rect.col_end() > i32::from(self.cols)
        {
            return false;
        }
        rect.cells().all(|pos| !self.cells[self.idx(pos)])
    }

    /// True if any in-bounds cell of the rect is already taken.
    pub fn intersects(&self, rect: &CellRect) -> bool {
        rect.cells().any(|pos| self.is_occupied(pos))
    }
}
