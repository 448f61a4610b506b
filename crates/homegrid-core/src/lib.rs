//! Core data model and geometry for the homegrid placement engine.
//!
//! This crate owns the vocabulary shared by every other homegrid crate:
//! cells, spans, items, surfaces, and the pure pixel/cell conversions that
//! translate pointer input into grid coordinates. It has no state and no
//! async surface; everything here is plain value types and total functions.

mod error;
pub mod geom;
mod types;

pub use error::{CoreError, Result};
pub use types::{
    CellPos, CellRect, GridDims, GridItem, ItemId, ItemPayload, PageLayout, PxRect, ScreenSize,
    Span, Surface, SurfaceKey, paginate,
};
