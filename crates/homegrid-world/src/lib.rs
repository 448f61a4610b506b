//! homegrid-world: the grid item state service.
//!
//! Owns the authoritative list of placed items across every page and
//! surface. State lives inside a single actor task; readers talk to it over
//! a command channel and subscribe to committed snapshots through a
//! replay-of-last-value channel, so a late subscriber immediately observes
//! the newest state and a slow subscriber only ever skips intermediate
//! values — the writer never blocks on either.
//!
//! Writes are restricted to a single [`Writer`], handed out exactly once
//! per spawned world. The placement engine takes it at construction; every
//! other handle clone is read-only by design.

mod storage;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use homegrid_core::{GridItem, ItemId, PageLayout, Surface, paginate};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, warn};

pub use storage::{MemStorage, Storage, StorageError};

/// Convenient result type for the world crate.
pub type Result<T> = std::result::Result<T, WorldError>;

/// Errors surfaced by the world service.
#[derive(Debug, Error)]
pub enum WorldError {
    /// Initial load through the storage seam failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The actor task is gone; the world was shut down.
    #[error("world service closed")]
    Closed,
}

/// Which operation produced a commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitSource {
    /// Initial load from storage.
    Load,
    /// A new item was added.
    Add,
    /// An item was moved.
    Move,
    /// An item was resized.
    Resize,
}

/// Events emitted on state changes, for diagnostics and tests.
#[derive(Clone, Debug)]
pub enum GridEvent {
    /// A resolution pass committed a new snapshot.
    Committed {
        /// Operation that produced the commit.
        source: CommitSource,
        /// Ids relocated to make room during the pass.
        relocated: Vec<ItemId>,
        /// Ids left overlapping because no free region existed.
        unplaced: Vec<ItemId>,
    },
    /// An item was removed.
    Removed(ItemId),
}

/// Configuration for the world service.
#[derive(Clone, Copy, Debug)]
pub struct WorldCfg {
    /// Capacity of the event broadcast buffer. Overflow drops the oldest
    /// events for lagging subscribers; the writer is never blocked.
    pub events_buffer: usize,
}

impl Default for WorldCfg {
    fn default() -> Self {
        Self { events_buffer: 256 }
    }
}

/// A committed snapshot: the full item list, sorted by id.
pub type Snapshot = Arc<Vec<GridItem>>;

enum Command {
    Snapshot {
        respond: oneshot::Sender<Snapshot>,
    },
    Get {
        id: ItemId,
        respond: oneshot::Sender<Option<GridItem>>,
    },
    Pages {
        surface: Surface,
        respond: oneshot::Sender<Vec<PageLayout>>,
    },
    Commit {
        items: Vec<GridItem>,
        source: CommitSource,
        relocated: Vec<ItemId>,
        unplaced: Vec<ItemId>,
        respond: oneshot::Sender<()>,
    },
    Remove {
        id: ItemId,
        respond: oneshot::Sender<bool>,
    },
}

/// Cheap, clonable, read-only handle to the world service.
#[derive(Clone, Debug)]
pub struct WorldHandle {
    tx: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<Snapshot>,
    events: broadcast::Sender<GridEvent>,
    writer_taken: Arc<AtomicBool>,
}

impl WorldHandle {
    /// Subscribe to committed snapshots with replay of the latest value.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Subscribe to the discrete change event stream.
    pub fn events(&self) -> broadcast::Receiver<GridEvent> {
        self.events.subscribe()
    }

    /// Get the current full snapshot.
    pub async fn snapshot(&self) -> Result<Snapshot> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(Command::Snapshot { respond: tx })
            .map_err(|_| WorldError::Closed)?;
        rx.await.map_err(|_| WorldError::Closed)
    }

    /// Look up one item by id.
    pub async fn get(&self, id: ItemId) -> Result<Option<GridItem>> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(Command::Get { id, respond: tx })
            .map_err(|_| WorldError::Closed)?;
        rx.await.map_err(|_| WorldError::Closed)
    }

    /// Project the current snapshot into per-page layouts for a surface.
    pub async fn pages(&self, surface: Surface) -> Result<Vec<PageLayout>> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(Command::Pages {
                surface,
                respond: tx,
            })
            .map_err(|_| WorldError::Closed)?;
        rx.await.map_err(|_| WorldError::Closed)
    }

    /// Take the single write capability. Succeeds exactly once per world.
    pub fn take_writer(&self) -> Option<Writer> {
        if self.writer_taken.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(Writer {
            handle: self.clone(),
        })
    }
}

/// The single write capability for a spawned world.
#[derive(Debug)]
pub struct Writer {
    handle: WorldHandle,
}

impl Writer {
    /// Replace the authoritative item list with a resolved candidate list.
    pub async fn commit(
        &self,
        items: Vec<GridItem>,
        source: CommitSource,
        relocated: Vec<ItemId>,
        unplaced: Vec<ItemId>,
    ) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.handle
            .tx
            .send(Command::Commit {
                items,
                source,
                relocated,
                unplaced,
                respond: tx,
            })
            .map_err(|_| WorldError::Closed)?;
        rx.await.map_err(|_| WorldError::Closed)
    }

    /// Remove one item by id. Returns whether it was present.
    pub async fn remove(&self, id: ItemId) -> Result<bool> {
        let (tx, rx) = oneshot::channel();
        self.handle
            .tx
            .send(Command::Remove { id, respond: tx })
            .map_err(|_| WorldError::Closed)?;
        rx.await.map_err(|_| WorldError::Closed)
    }

    /// Read-only view of the same world.
    pub fn handle(&self) -> &WorldHandle {
        &self.handle
    }
}

/// World constructor. Loads initial state, spawns the actor, returns a
/// handle.
pub struct GridWorld;

impl GridWorld {
    /// Spawn the world service.
    ///
    /// The initial item list is loaded through the storage seam; a load
    /// failure is fatal here since there is no sensible empty-state
    /// fallback for a user's home screen.
    pub async fn spawn(storage: Arc<dyn Storage>, cfg: WorldCfg) -> Result<WorldHandle> {
        let mut items = storage.load().await?;
        items.sort_by_key(|i| i.id);
        debug!(count = items.len(), "world loaded");

        let (tx, rx) = mpsc::unbounded_channel();
        let (snap_tx, snap_rx) = watch::channel::<Snapshot>(Arc::new(items.clone()));
        let (evt_tx, _evt_rx) = broadcast::channel(cfg.events_buffer.max(8));

        tokio::spawn(run_actor(rx, snap_tx, evt_tx.clone(), storage, items));

        Ok(WorldHandle {
            tx,
            snapshots: snap_rx,
            events: evt_tx,
            writer_taken: Arc::new(AtomicBool::new(false)),
        })
    }
}

async fn run_actor(
    mut rx: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<Snapshot>,
    events: broadcast::Sender<GridEvent>,
    storage: Arc<dyn Storage>,
    mut items: Vec<GridItem>,
) {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            Command::Snapshot { respond } => {
                let _ = respond.send(Arc::new(items.clone()));
            }
            Command::Get { id, respond } => {
                let _ = respond.send(items.iter().find(|i| i.id == id).cloned());
            }
            Command::Pages { surface, respond } => {
                let _ = respond.send(paginate(&items, surface));
            }
            Command::Commit {
                items: new_items,
                source,
                relocated,
                unplaced,
                respond,
            } => {
                items = new_items;
                items.sort_by_key(|i| i.id);
                publish(&snapshots, &items);
                let _ = events.send(GridEvent::Committed {
                    source,
                    relocated,
                    unplaced,
                });
                persist(storage.as_ref(), &items).await;
                let _ = respond.send(());
            }
            Command::Remove { id, respond } => {
                let before = items.len();
                items.retain(|i| i.id != id);
                let removed = items.len() != before;
                if removed {
                    publish(&snapshots, &items);
                    let _ = events.send(GridEvent::Removed(id));
                    persist(storage.as_ref(), &items).await;
                }
                let _ = respond.send(removed);
            }
        }
    }
}

/// Push a new snapshot to subscribers. Replay-of-last-value: only the
/// newest committed state is retained for late or slow readers.
fn publish(snapshots: &watch::Sender<Snapshot>, items: &[GridItem]) {
    let _ = snapshots.send_replace(Arc::new(items.to_vec()));
}

/// Persist the committed list. Save failures degrade to a warning; a pass
/// never fails because the disk did.
async fn persist(storage: &dyn Storage, items: &[GridItem]) {
    if let Err(err) = storage.save(items).await {
        warn!(%err, "failed to persist committed items");
    }
}
