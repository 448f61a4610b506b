//! RON scenario files: an initial layout plus a scripted gesture sequence.

use std::{fs, path::Path};

use homegrid_core::{
    CellPos, GridDims, GridItem, ItemId, ItemPayload, ScreenSize, Span, Surface,
};
use serde::Deserialize;

use crate::error::{Error, Result};

/// A complete tester scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Primary grid dimensions as `(rows, cols)`.
    pub grid: (u16, u16),
    /// Dock dimensions as `(rows, cols)`.
    pub dock: (u16, u16),
    /// Screen size in pixels as `(width, height)`.
    pub screen: (u32, u32),
    /// Items present before the first step.
    #[serde(default)]
    pub items: Vec<SeedItem>,
    /// Gesture steps, applied in order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One pre-placed item.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedItem {
    /// Stable id.
    pub id: u64,
    /// Page within the surface.
    #[serde(default)]
    pub page: u16,
    /// Surface; defaults to the primary grid.
    #[serde(default)]
    pub dock: bool,
    /// Anchor row.
    pub row: i16,
    /// Anchor column.
    pub col: i16,
    /// Row span; defaults to 1.
    #[serde(default)]
    pub rows: u16,
    /// Column span; defaults to 1.
    #[serde(default)]
    pub cols: u16,
    /// Display label carried as the opaque payload.
    pub label: String,
}

/// One scripted gesture.
#[derive(Debug, Clone, Deserialize)]
pub enum Step {
    /// Add a fresh 1x1 item at a pointer position.
    Add {
        /// Target page.
        page: u16,
        /// Pointer x in pixels.
        x: i32,
        /// Pointer y in pixels.
        y: i32,
        /// Payload label for the new item.
        label: String,
    },
    /// Move an item: one pointer tick of a drag.
    Move {
        /// Item to move.
        id: u64,
        /// Target page.
        page: u16,
        /// Pointer x in pixels.
        x: i32,
        /// Pointer y in pixels.
        y: i32,
        /// Dragged bounding box width in pixels.
        w: u32,
        /// Dragged bounding box height in pixels.
        h: u32,
    },
    /// Resize an item to a new pixel extent.
    Resize {
        /// Item to resize.
        id: u64,
        /// Target page.
        page: u16,
        /// New width in pixels.
        w: u32,
        /// New height in pixels.
        h: u32,
    },
}

impl Scenario {
    /// Load and parse a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::ScenarioRead {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&text).map_err(|source| Error::ScenarioParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validated primary grid dimensions.
    pub fn grid_dims(&self) -> Result<GridDims> {
        Ok(GridDims::new(self.grid.0, self.grid.1)?)
    }

    /// Validated dock dimensions.
    pub fn dock_dims(&self) -> Result<GridDims> {
        Ok(GridDims::new(self.dock.0, self.dock.1)?)
    }

    /// Validated screen size.
    pub fn screen_size(&self) -> Result<ScreenSize> {
        Ok(ScreenSize::new(self.screen.0, self.screen.1)?)
    }

    /// The seeded item list in engine form.
    pub fn seed_items(&self) -> Vec<GridItem> {
        self.items
            .iter()
            .map(|seed| GridItem {
                id: ItemId(seed.id),
                page: seed.page,
                surface: if seed.dock {
                    Surface::Dock
                } else {
                    Surface::Grid
                },
                origin: CellPos::new(seed.row, seed.col),
                span: Span::new(seed.rows, seed.cols),
                payload: ItemPayload::App {
                    bundle: seed.label.clone(),
                },
            })
            .collect()
    }
}
