//! Pixel/cell conversions for pointer-driven placement.
//!
//! All functions are pure and total over validated inputs: [`GridDims`] and
//! [`ScreenSize`] cannot be zero on either axis, so the divisions below are
//! always defined. Cell pixel sizes use floor division; the last row and
//! column absorb the integer remainder so cell rects always tile the screen
//! exactly.

use crate::types::{CellPos, CellRect, GridDims, PxRect, ScreenSize, Span};

/// Screen edge hit by a drag, used to trigger page flips.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    /// Dragged item touches the left screen edge.
    Left,
    /// Dragged item touches the right screen edge.
    Right,
}

/// Pixel width of one cell (floor, at least 1).
#[inline]
fn tile_w(dims: GridDims, screen: ScreenSize) -> u32 {
    (screen.width() / u32::from(dims.cols())).max(1)
}

/// Pixel height of one cell (floor, at least 1).
#[inline]
fn tile_h(dims: GridDims, screen: ScreenSize) -> u32 {
    (screen.height() / u32::from(dims.rows())).max(1)
}

/// Map a pointer position to the cell under it, clamped into bounds.
///
/// Positions left of or above the screen map to row/column 0; positions past
/// the far edge map to the last row/column.
pub fn cell_at_point(x: i32, y: i32, dims: GridDims, screen: ScreenSize) -> CellPos {
    let tw = i64::from(tile_w(dims, screen));
    let th = i64::from(tile_h(dims, screen));
    let mut col = i64::from(x).div_euclid(tw);
    let mut row = i64::from(y).div_euclid(th);
    if col < 0 {
        col = 0;
    }
    if row < 0 {
        row = 0;
    }
    if col >= i64::from(dims.cols()) {
        col = i64::from(dims.cols()) - 1;
    }
    if row >= i64::from(dims.rows()) {
        row = i64::from(dims.rows()) - 1;
    }
    CellPos::new(row as i16, col as i16)
}

/// Pixel rectangle covered by a cell rectangle.
///
/// The final row and column absorb the remainder of the integer division so
/// a full-width rect spans the entire screen, matching how the renderer
/// tiles cells.
pub fn cell_rect_px(rect: &CellRect, dims: GridDims, screen: ScreenSize) -> PxRect {
    let tw = tile_w(dims, screen);
    let th = tile_h(dims, screen);
    let rem_w = screen.width() - tw * u32::from(dims.cols());
    let rem_h = screen.height() - th * u32::from(dims.rows());

    let x = i64::from(rect.origin.col) * i64::from(tw);
    let y = i64::from(rect.origin.row) * i64::from(th);
    let mut width = u32::from(rect.span.cols()) * tw;
    if rect.col_end() == i32::from(dims.cols()) {
        width += rem_w;
    }
    let mut height = u32::from(rect.span.rows()) * th;
    if rect.row_end() == i32::from(dims.rows()) {
        height += rem_h;
    }
    PxRect::new(x as i32, y as i32, width, height)
}

/// Derive a span from a pixel extent: rounded cell count, floored at 1.
pub fn span_from_px(width_px: u32, height_px: u32, dims: GridDims, screen: ScreenSize) -> Span {
    let tw = u64::from(tile_w(dims, screen));
    let th = u64::from(tile_h(dims, screen));
    let cols = (u64::from(width_px) + tw / 2) / tw;
    let rows = (u64::from(height_px) + th / 2) / th;
    Span::new(rows.min(u64::from(u16::MAX)) as u16, cols.min(u64::from(u16::MAX)) as u16)
}

/// Map a dragged bounding box to its candidate cell rectangle.
///
/// The pointer position anchors the origin cell; the box's pixel extent
/// carries the span so a move is span-preserving. The resulting rect may
/// overhang the grid; callers bounds-check before resolving.
pub fn drag_cell_rect(
    x: i32,
    y: i32,
    drag: &PxRect,
    dims: GridDims,
    screen: ScreenSize,
) -> CellRect {
    let origin = cell_at_point(x, y, dims, screen);
    let span = span_from_px(drag.width, drag.height, dims, screen);
    CellRect::new(origin, span)
}

/// Detect whether a dragged box is touching a screen edge.
///
/// `x` is the box's left edge. Returns `None` while the box is fully inside
/// the horizontal extent of the screen.
pub fn edge_at(x: i32, screen_width: u32, drag_width: u32) -> Option<Edge> {
    if x <= 0 {
        return Some(Edge::Left);
    }
    if i64::from(x) + i64::from(drag_width) >= i64::from(screen_width) {
        return Some(Edge::Right);
    }
    None
}
