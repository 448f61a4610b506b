//! Value types shared across the homegrid crates.

use std::{collections::BTreeMap, fmt, result::Result as StdResult};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// One cell of the grid, addressed by `(row, col)`.
///
/// Rows grow downward, columns grow rightward. Signed so that legacy data
/// with out-of-range coordinates stays representable; such cells are skipped
/// during occupancy marking rather than wrapped or rejected.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct CellPos {
    /// Row index, `0` at the top.
    pub row: i16,
    /// Column index, `0` at the left.
    pub col: i16,
}

impl CellPos {
    /// Construct a cell position.
    pub const fn new(row: i16, col: i16) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another cell.
    pub fn distance(&self, other: Self) -> u32 {
        self.row.abs_diff(other.row) as u32 + self.col.abs_diff(other.col) as u32
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Item extent in cells. Both axes are at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    rows: u16,
    cols: u16,
}

impl<'de> Deserialize<'de> for Span {
    // Routed through `new` so stored zero spans are floored, not trusted.
    fn deserialize<D>(deserializer: D) -> StdResult<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            rows: u16,
            cols: u16,
        }
        let raw = Raw::deserialize(deserializer)?;
        Ok(Self::new(raw.rows, raw.cols))
    }
}

impl Span {
    /// Construct a span, flooring each axis at 1.
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    /// Height in cells.
    pub const fn rows(&self) -> u16 {
        self.rows
    }

    /// Width in cells.
    pub const fn cols(&self) -> u16 {
        self.cols
    }
}

impl Default for Span {
    fn default() -> Self {
        Self { rows: 1, cols: 1 }
    }
}

/// A rectangular block of cells: an origin plus a span.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRect {
    /// Top-left cell.
    pub origin: CellPos,
    /// Extent in cells.
    pub span: Span,
}

impl CellRect {
    /// Construct a cell rectangle.
    pub const fn new(origin: CellPos, span: Span) -> Self {
        Self { origin, span }
    }

    /// Exclusive bottom row, widened to avoid i16 overflow.
    pub fn row_end(&self) -> i32 {
        i32::from(self.origin.row) + i32::from(self.span.rows())
    }

    /// Exclusive right column, widened to avoid i16 overflow.
    pub fn col_end(&self) -> i32 {
        i32::from(self.origin.col) + i32::from(self.span.cols())
    }

    /// Iterate the covered cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellPos> + '_ {
        let rows = i32::from(self.origin.row)..self.row_end();
        rows.flat_map(move |row| {
            (i32::from(self.origin.col)..self.col_end())
                .map(move |col| CellPos::new(row as i16, col as i16))
        })
    }

    /// True if the two rectangles share at least one cell.
    pub fn intersects(&self, other: &Self) -> bool {
        i32::from(self.origin.row) < other.row_end()
            && i32::from(other.origin.row) < self.row_end()
            && i32::from(self.origin.col) < other.col_end()
            && i32::from(other.origin.col) < self.col_end()
    }
}

/// Stable item identity. Survives relocation; only removal retires it.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The logical surface an item lives on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Surface {
    /// The paged primary grid.
    Grid,
    /// The dock row. Not paged; items carry page 0.
    Dock,
}

/// Addressing key for one resolution pass: a surface plus a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceKey {
    /// Surface the pass operates on.
    pub surface: Surface,
    /// Page within the surface; always 0 for the dock.
    pub page: u16,
}

/// What an item carries. Fully opaque to placement: the engine reads only
/// geometry, never payload content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemPayload {
    /// Application launcher icon.
    App {
        /// Application bundle or package identifier.
        bundle: String,
    },
    /// Hosted widget.
    Widget {
        /// Widget provider identifier.
        kind: String,
    },
    /// Deep-link shortcut.
    Shortcut {
        /// Shortcut target URI.
        target: String,
    },
    /// Folder of other launchables.
    Folder {
        /// Display name.
        name: String,
    },
}

/// One placed item: identity, location, extent, and an opaque payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridItem {
    /// Stable identity.
    pub id: ItemId,
    /// Page within the surface.
    pub page: u16,
    /// Surface the item lives on.
    pub surface: Surface,
    /// Top-left cell.
    pub origin: CellPos,
    /// Extent in cells.
    pub span: Span,
    /// Opaque content.
    pub payload: ItemPayload,
}

impl GridItem {
    /// The rectangular cell set this item covers.
    pub const fn cells(&self) -> CellRect {
        CellRect::new(self.origin, self.span)
    }

    /// The `(surface, page)` key this item resolves under.
    pub const fn key(&self) -> SurfaceKey {
        SurfaceKey {
            surface: self.surface,
            page: self.page,
        }
    }

    /// Clone with a new origin. Identity, span, and payload are unchanged.
    pub fn with_origin(&self, origin: CellPos) -> Self {
        Self {
            origin,
            ..self.clone()
        }
    }
}

/// Validated grid dimensions for one surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridDims {
    rows: u16,
    cols: u16,
}

impl GridDims {
    /// Construct dimensions, rejecting zero on either axis.
    pub fn new(rows: u16, cols: u16) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(CoreError::EmptyDims { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    /// Row count.
    pub const fn rows(&self) -> u16 {
        self.rows
    }

    /// Column count.
    pub const fn cols(&self) -> u16 {
        self.cols
    }

    /// True if the rectangle lies fully within `[0, rows) x [0, cols)`.
    pub fn contains_rect(&self, rect: &CellRect) -> bool {
        rect.origin.row >= 0
            && rect.origin.col >= 0
            && rect.row_end() <= i32::from(self.rows)
            && rect.col_end() <= i32::from(self.cols)
    }

    /// True if the single cell lies within bounds.
    pub fn contains(&self, pos: CellPos) -> bool {
        pos.row >= 0 && pos.col >= 0 && pos.row < self.rows as i16 && pos.col < self.cols as i16
    }
}

/// Validated screen dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    width: u32,
    height: u32,
}

impl ScreenSize {
    /// Construct a screen size, rejecting zero on either axis.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::EmptyScreen { width, height });
        }
        Ok(Self { width, height })
    }

    /// Pixel width.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height.
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Axis-aligned pixel rectangle, used for drag bounding boxes and rendering
/// frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PxRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PxRect {
    /// Construct a pixel rectangle.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Items of one page, grouped for rendering. Derived projection; never stored.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageLayout {
    /// Page index.
    pub page: u16,
    /// Items on the page, sorted by id.
    pub items: Vec<GridItem>,
}

/// Group a snapshot's items by page for one surface.
///
/// Pages appear in ascending order; items within a page are sorted by id so
/// the projection is deterministic for identical snapshots.
pub fn paginate(items: &[GridItem], surface: Surface) -> Vec<PageLayout> {
    let mut pages: BTreeMap<u16, Vec<GridItem>> = BTreeMap::new();
    for item in items.iter().filter(|i| i.surface == surface) {
        pages.entry(item.page).or_default().push(item.clone());
    }
    pages
        .into_iter()
        .map(|(page, mut items)| {
            items.sort_by_key(|i| i.id);
            PageLayout { page, items }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, page: u16, row: i16, col: i16) -> GridItem {
        GridItem {
            id: ItemId(id),
            page,
            surface: Surface::Grid,
            origin: CellPos::new(row, col),
            span: Span::default(),
            payload: ItemPayload::App {
                bundle: format!("app.{id}"),
            },
        }
    }

    #[test]
    fn span_floors_at_one() {
        let s = Span::new(0, 0);
        assert_eq!((s.rows(), s.cols()), (1, 1));
        let s = Span::new(3, 0);
        assert_eq!((s.rows(), s.cols()), (3, 1));
    }

    #[test]
    fn rect_cells_row_major() {
        let r = CellRect::new(CellPos::new(1, 2), Span::new(2, 2));
        let cells: Vec<_> = r.cells().collect();
        assert_eq!(
            cells,
            vec![
                CellPos::new(1, 2),
                CellPos::new(1, 3),
                CellPos::new(2, 2),
                CellPos::new(2, 3),
            ]
        );
    }

    #[test]
    fn rect_intersection() {
        let a = CellRect::new(CellPos::new(0, 0), Span::new(2, 2));
        let b = CellRect::new(CellPos::new(1, 1), Span::new(2, 2));
        let c = CellRect::new(CellPos::new(2, 2), Span::new(1, 1));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(b.intersects(&c));
    }

    #[test]
    fn dims_reject_zero() {
        assert_eq!(
            GridDims::new(0, 4),
            Err(CoreError::EmptyDims { rows: 0, cols: 4 })
        );
        assert!(GridDims::new(4, 4).is_ok());
        assert_eq!(
            ScreenSize::new(1080, 0),
            Err(CoreError::EmptyScreen {
                width: 1080,
                height: 0
            })
        );
    }

    #[test]
    fn dims_contains_rect_edges() {
        let dims = GridDims::new(4, 4).unwrap();
        assert!(dims.contains_rect(&CellRect::new(CellPos::new(3, 3), Span::new(1, 1))));
        assert!(!dims.contains_rect(&CellRect::new(CellPos::new(3, 3), Span::new(1, 2))));
        assert!(!dims.contains_rect(&CellRect::new(CellPos::new(-1, 0), Span::new(1, 1))));
    }

    #[test]
    fn paginate_groups_and_sorts() {
        let items = vec![item(3, 1, 0, 0), item(1, 0, 0, 0), item(2, 1, 1, 1)];
        let pages = paginate(&items, Surface::Grid);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page, 0);
        assert_eq!(pages[1].page, 1);
        assert_eq!(
            pages[1].items.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![ItemId(2), ItemId(3)]
        );
        assert!(paginate(&items, Surface::Dock).is_empty());
    }

    #[test]
    fn manhattan_distance() {
        assert_eq!(CellPos::new(0, 0).distance(CellPos::new(2, 3)), 5);
        assert_eq!(CellPos::new(2, 3).distance(CellPos::new(0, 0)), 5);
        assert_eq!(CellPos::new(-1, 0).distance(CellPos::new(1, 0)), 2);
    }
}
