//! The opaque persistence seam.
//!
//! The world neither owns nor inspects the on-disk schema; it loads a list
//! once at startup and hands the committed list back after every change.

use std::io;

use async_trait::async_trait;
use homegrid_core::GridItem;
use parking_lot::Mutex;
use thiserror::Error;

/// Errors crossing the storage seam.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backend returned data it could not decode.
    #[error("corrupt storage: {0}")]
    Corrupt(String),
}

/// Load/save contract implemented by the (external) persistence layer.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Load the full item list.
    async fn load(&self) -> Result<Vec<GridItem>, StorageError>;

    /// Persist the full item list.
    async fn save(&self, items: &[GridItem]) -> Result<(), StorageError>;
}

/// In-memory storage for tests and the tester binary.
#[derive(Debug, Default)]
pub struct MemStorage {
    items: Mutex<Vec<GridItem>>,
}

impl MemStorage {
    /// Create storage pre-seeded with an item list.
    pub fn seeded(items: Vec<GridItem>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }

    /// The most recently saved list.
    pub fn saved(&self) -> Vec<GridItem> {
        self.items.lock().clone()
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn load(&self) -> Result<Vec<GridItem>, StorageError> {
        Ok(self.items.lock().clone())
    }

    async fn save(&self, items: &[GridItem]) -> Result<(), StorageError> {
        *self.items.lock() = items.to_vec();
        Ok(())
    }
}
