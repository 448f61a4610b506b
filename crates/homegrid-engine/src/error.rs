use std::result::Result as StdResult;

use homegrid_core::ItemId;
use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the placement engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The world's write capability was already taken by another engine.
    #[error("world writer already taken")]
    WriterTaken,

    /// A move or resize referenced an id missing from the snapshot.
    #[error("unknown item {0}")]
    UnknownItem(ItemId),

    /// Errors originating from the world service.
    #[error(transparent)]
    World(#[from] homegrid_world::WorldError),
}
