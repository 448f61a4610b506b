//! Render a committed layout for the terminal.

use homegrid_core::{GridDims, GridItem, PageLayout, Surface, paginate};
use serde::Serialize;

/// JSON-serializable report of the final state.
#[derive(Debug, Serialize)]
pub struct Report {
    /// Per-page layouts of the primary grid.
    pub grid: Vec<PageLayout>,
    /// The dock layout, if any items live there.
    pub dock: Vec<PageLayout>,
}

impl Report {
    /// Build a report from a committed snapshot.
    pub fn new(items: &[GridItem]) -> Self {
        Self {
            grid: paginate(items, Surface::Grid),
            dock: paginate(items, Surface::Dock),
        }
    }
}

/// Render one page as an ASCII grid: each cell shows the last digit of the
/// occupying item's id, `.` when free, `#` when two items overlap (the
/// accepted no-free-region fallback).
pub fn render_page(layout: &PageLayout, dims: GridDims) -> String {
    let rows = usize::from(dims.rows());
    let cols = usize::from(dims.cols());
    let mut counts = vec![0u8; rows * cols];
    let mut glyphs = vec!['.'; rows * cols];

    for item in &layout.items {
        for cell in item.cells().cells() {
            if !dims.contains(cell) {
                continue;
            }
            let i = cell.row as usize * cols + cell.col as usize;
            counts[i] += 1;
            glyphs[i] = char::from_digit((item.id.0 % 10) as u32, 10).unwrap_or('?');
        }
    }

    let mut out = String::with_capacity(rows * (cols + 1));
    for row in 0..rows {
        for col in 0..cols {
            let i = row * cols + col;
            out.push(if counts[i] > 1 { '#' } else { glyphs[i] });
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use homegrid_core::{CellPos, ItemId, ItemPayload, Span};

    use super::*;

    fn item(id: u64, row: i16, col: i16, rows: u16, cols: u16) -> GridItem {
        GridItem {
            id: ItemId(id),
            page: 0,
            surface: Surface::Grid,
            origin: CellPos::new(row, col),
            span: Span::new(rows, cols),
            payload: ItemPayload::App {
                bundle: format!("app.{id}"),
            },
        }
    }

    #[test]
    fn renders_items_and_overlap() {
        let dims = GridDims::new(2, 3).unwrap();
        let items = vec![item(1, 0, 0, 1, 2), item(2, 1, 2, 1, 1), item(3, 0, 1, 1, 1)];
        let layout = &paginate(&items, Surface::Grid)[0];
        let rendered = render_page(layout, dims);
        // (0,1) holds both item 1 and item 3.
        assert_eq!(rendered, "1#.\n..2\n");
    }
}
