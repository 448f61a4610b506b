//! homegrid placement engine.
//!
//! The engine is the orchestration layer between the UI boundary and the
//! grid state: it converts pixel input into grid coordinates, runs the
//! conflict-resolution pass, and commits the result to the world service.
//! Every add/move/resize call is one full, independent pass over the latest
//! committed snapshot; a drag gesture is simply a stream of such passes.
//!
//! Guarantees:
//! - at most one pass in flight per `(surface, page)`; other keys proceed
//!   concurrently
//! - a move or resize superseded by a newer call on the same key never
//!   commits (no snap-back from stale results)
//! - out-of-bounds targets are a silent no-op, never a partial placement

mod error;
mod pass;

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use homegrid_core::{
    CellRect, GridDims, GridItem, ItemId, ItemPayload, PxRect, ScreenSize, Span, Surface,
    SurfaceKey, geom,
};
use homegrid_place::resolve;
use homegrid_world::{CommitSource, WorldHandle, Writer};
use tokio::sync::RwLock;
use tracing::{debug, trace};

pub use error::{Error, Result};
use pass::PassRegistry;

/// Grid dimensions per surface, user-configurable at runtime.
#[derive(Clone, Copy, Debug)]
pub struct DimsConfig {
    /// Dimensions of each primary grid page.
    pub grid: GridDims,
    /// Dimensions of the dock row.
    pub dock: GridDims,
}

impl DimsConfig {
    /// Dimensions for the given surface.
    pub const fn for_surface(&self, surface: Surface) -> GridDims {
        match surface {
            Surface::Grid => self.grid,
            Surface::Dock => self.dock,
        }
    }
}

/// Outcome of one move/resize pass. Nothing here is user-fatal: the worst
/// case is a no-op or an accepted overlap reported via `unplaced`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PassOutcome {
    /// The pass resolved and committed.
    Committed {
        /// Ids relocated to make room.
        relocated: Vec<ItemId>,
        /// Ids left overlapping; no free region existed for them.
        unplaced: Vec<ItemId>,
    },
    /// The target rectangle fell outside the grid; nothing changed.
    OutOfBounds,
    /// A newer pass on the same key superseded this one before it could
    /// commit; its result was discarded.
    Superseded,
}

/// The placement engine. Cheap to clone; all state is shared.
#[derive(Clone, Debug)]
pub struct Engine {
    /// Read-only world access.
    world: WorldHandle,
    /// The single write capability for the world.
    writer: Arc<Writer>,
    /// Per-surface grid dimensions.
    dims: Arc<RwLock<DimsConfig>>,
    /// Source of fresh item ids.
    next_id: Arc<AtomicU64>,
    /// Per-key pass serialization.
    passes: Arc<PassRegistry>,
}

impl Engine {
    /// Create the engine, taking the world's single write capability.
    ///
    /// Fails with [`Error::WriterTaken`] if another engine already owns it.
    pub async fn new(world: WorldHandle, dims: DimsConfig) -> Result<Self> {
        let writer = world.take_writer().ok_or(Error::WriterTaken)?;
        let snapshot = world.snapshot().await?;
        let next_id = snapshot.iter().map(|i| i.id.0).max().map_or(1, |m| m + 1);
        Ok(Self {
            world,
            writer: Arc::new(writer),
            dims: Arc::new(RwLock::new(dims)),
            next_id: Arc::new(AtomicU64::new(next_id)),
            passes: Arc::new(PassRegistry::default()),
        })
    }

    /// Read-only handle to the underlying world.
    pub fn world(&self) -> &WorldHandle {
        &self.world
    }

    /// Current per-surface dimensions.
    pub async fn dims(&self) -> DimsConfig {
        *self.dims.read().await
    }

    /// Replace the per-surface dimensions (user settings changed).
    pub async fn set_dims(&self, dims: DimsConfig) {
        *self.dims.write().await = dims;
    }

    /// Add a new 1x1 item at the cell under the pointer.
    ///
    /// Commits directly without a conflict pass; a drop onto an occupied
    /// cell overlaps silently. Callers wanting displacement semantics route
    /// the drop through [`Engine::move_item`] instead.
    pub async fn add(
        &self,
        surface: Surface,
        page: u16,
        x: i32,
        y: i32,
        screen: ScreenSize,
        payload: ItemPayload,
    ) -> Result<ItemId> {
        let key = SurfaceKey { surface, page };
        let lock = self.passes.enter(key);
        let _guard = lock.lock().await;

        let dims = self.dims.read().await.for_surface(surface);
        let origin = geom::cell_at_point(x, y, dims, screen);
        let id = ItemId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let item = GridItem {
            id,
            page,
            surface,
            origin,
            span: Span::default(),
            payload,
        };
        debug!(%id, at = %origin, ?surface, page, "adding item");

        let snapshot = self.world.snapshot().await?;
        let mut items = snapshot.as_ref().clone();
        items.push(item);
        self.writer
            .commit(items, CommitSource::Add, Vec::new(), Vec::new())
            .await?;
        Ok(id)
    }

    /// Move an item to the cell under the pointer, preserving its span.
    ///
    /// `drag` is the dragged item's current pixel bounding box; its extent
    /// carries the span so the placement stays span-preserving. Called once
    /// per pointer tick during a drag.
    pub async fn move_item(
        &self,
        surface: Surface,
        page: u16,
        id: ItemId,
        x: i32,
        y: i32,
        screen: ScreenSize,
        drag: PxRect,
    ) -> Result<PassOutcome> {
        let key = SurfaceKey { surface, page };
        let ticket = self.passes.begin(key);
        let _guard = tokio::select! {
            guard = ticket.lock.lock() => guard,
            () = ticket.cancel.cancelled() => {
                trace!(%id, seq = ticket.seq, "move superseded while queued");
                return Ok(PassOutcome::Superseded);
            }
        };

        let snapshot = self.world.snapshot().await?;
        let existing = snapshot
            .iter()
            .find(|i| i.id == id)
            .ok_or(Error::UnknownItem(id))?;

        let dims = self.dims.read().await.for_surface(surface);
        let rect = geom::drag_cell_rect(x, y, &drag, dims, screen);
        if !dims.contains_rect(&rect) {
            trace!(%id, target = %rect.origin, "move target out of bounds; no-op");
            return Ok(PassOutcome::OutOfBounds);
        }

        let candidate = GridItem {
            id,
            page,
            surface,
            origin: rect.origin,
            span: rect.span,
            payload: existing.payload.clone(),
        };
        self.resolve_and_commit(&snapshot, candidate, dims, CommitSource::Move, &ticket)
            .await
    }

    /// Resize an item in place: same anchor cell, new span from pixels.
    ///
    /// The span never drops below 1x1 regardless of how small the pixel
    /// extent is.
    pub async fn resize(
        &self,
        surface: Surface,
        page: u16,
        id: ItemId,
        width_px: u32,
        height_px: u32,
        screen: ScreenSize,
    ) -> Result<PassOutcome> {
        let key = SurfaceKey { surface, page };
        let ticket = self.passes.begin(key);
        let _guard = tokio::select! {
            guard = ticket.lock.lock() => guard,
            () = ticket.cancel.cancelled() => {
                trace!(%id, seq = ticket.seq, "resize superseded while queued");
                return Ok(PassOutcome::Superseded);
            }
        };

        let snapshot = self.world.snapshot().await?;
        let existing = snapshot
            .iter()
            .find(|i| i.id == id)
            .ok_or(Error::UnknownItem(id))?;

        let dims = self.dims.read().await.for_surface(surface);
        let span = geom::span_from_px(width_px, height_px, dims, screen);
        let rect = CellRect::new(existing.origin, span);
        if !dims.contains_rect(&rect) {
            trace!(%id, rows = span.rows(), cols = span.cols(), "resize exceeds bounds; no-op");
            return Ok(PassOutcome::OutOfBounds);
        }

        let candidate = GridItem {
            id,
            page,
            surface,
            origin: existing.origin,
            span,
            payload: existing.payload.clone(),
        };
        self.resolve_and_commit(&snapshot, candidate, dims, CommitSource::Resize, &ticket)
            .await
    }

    /// Pixel frame of an item under the current dimensions, for rendering.
    pub async fn frame_of(&self, item: &GridItem, screen: ScreenSize) -> PxRect {
        let dims = self.dims.read().await.for_surface(item.surface);
        geom::cell_rect_px(&item.cells(), dims, screen)
    }

    /// Run the conflict pass and commit unless superseded meanwhile.
    async fn resolve_and_commit(
        &self,
        snapshot: &[GridItem],
        candidate: GridItem,
        dims: GridDims,
        source: CommitSource,
        ticket: &pass::PassTicket,
    ) -> Result<PassOutcome> {
        let res = resolve(snapshot, &candidate, dims);
        if ticket.cancel.is_cancelled() {
            trace!(id = %candidate.id, seq = ticket.seq, "pass superseded before commit");
            return Ok(PassOutcome::Superseded);
        }
        debug!(
            id = %candidate.id,
            seq = ticket.seq,
            relocated = res.relocated.len(),
            unplaced = res.unplaced.len(),
            "committing resolution pass"
        );
        self.writer
            .commit(
                res.items,
                source,
                res.relocated.clone(),
                res.unplaced.clone(),
            )
            .await?;
        Ok(PassOutcome::Committed {
            relocated: res.relocated,
            unplaced: res.unplaced,
        })
    }
}
