//! Per-key pass serialization and supersession.
//!
//! Every `(surface, page)` gets its own async mutex so at most one
//! resolution pass is in flight per key while passes for different keys run
//! concurrently. Each `begin` also rotates the key's cancellation token: a
//! drag emits move passes faster than they resolve, and a pass that has
//! been superseded while still queued on the lock must wake and bail
//! instead of committing a stale result over a newer one.

use std::{
    collections::HashMap,
    sync::{Arc, atomic::AtomicU64, atomic::Ordering},
};

use homegrid_core::SurfaceKey;
use parking_lot::Mutex as SyncMutex;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Serialization state for one `(surface, page)` key.
#[derive(Clone, Default, Debug)]
struct KeyState {
    /// Single-writer lock for the key.
    lock: Arc<Mutex<()>>,
    /// Monotonic pass counter, for tracing.
    seq: Arc<AtomicU64>,
    /// Token cancelling the most recently begun supersedable pass.
    current: Arc<SyncMutex<CancellationToken>>,
}

/// Admission ticket for one supersedable pass.
pub(crate) struct PassTicket {
    /// Pass number within its key, for tracing.
    pub(crate) seq: u64,
    /// The key's single-writer lock.
    pub(crate) lock: Arc<Mutex<()>>,
    /// Cancelled when a newer pass begins on the same key.
    pub(crate) cancel: CancellationToken,
}

/// Registry of per-key serialization state.
#[derive(Default, Debug)]
pub(crate) struct PassRegistry {
    keys: SyncMutex<HashMap<SurfaceKey, KeyState>>,
}

impl PassRegistry {
    fn state(&self, key: SurfaceKey) -> KeyState {
        self.keys.lock().entry(key).or_default().clone()
    }

    /// Begin a supersedable pass: rotates the key's cancellation token so
    /// any earlier pass still pending on this key aborts.
    pub(crate) fn begin(&self, key: SurfaceKey) -> PassTicket {
        let state = self.state(key);
        let seq = state.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let fresh = CancellationToken::new();
        let stale = std::mem::replace(&mut *state.current.lock(), fresh.clone());
        stale.cancel();
        PassTicket {
            seq,
            lock: state.lock,
            cancel: fresh,
        }
    }

    /// The key's lock alone, for passes that serialize but never supersede
    /// (add does not cancel a drag in progress).
    pub(crate) fn enter(&self, key: SurfaceKey) -> Arc<Mutex<()>> {
        self.state(key).lock
    }
}

#[cfg(test)]
mod tests {
    use homegrid_core::Surface;

    use super::*;

    fn key(page: u16) -> SurfaceKey {
        SurfaceKey {
            surface: Surface::Grid,
            page,
        }
    }

    #[test]
    fn newer_pass_cancels_older() {
        let reg = PassRegistry::default();
        let first = reg.begin(key(0));
        assert!(!first.cancel.is_cancelled());
        let second = reg.begin(key(0));
        assert!(first.cancel.is_cancelled());
        assert!(!second.cancel.is_cancelled());
        assert_eq!(first.seq, 1);
        assert_eq!(second.seq, 2);
    }

    #[test]
    fn keys_are_independent() {
        let reg = PassRegistry::default();
        let page0 = reg.begin(key(0));
        let page1 = reg.begin(key(1));
        assert!(!page0.cancel.is_cancelled());
        assert!(!page1.cancel.is_cancelled());
    }

    #[test]
    fn enter_does_not_supersede() {
        let reg = PassRegistry::default();
        let pass = reg.begin(key(0));
        let _lock = reg.enter(key(0));
        assert!(!pass.cancel.is_cancelled());
    }

    #[tokio::test]
    async fn same_key_shares_one_lock() {
        let reg = PassRegistry::default();
        let a = reg.begin(key(0));
        let guard = a.lock.lock().await;
        let b = reg.enter(key(0));
        assert!(b.try_lock().is_err());
        drop(guard);
        assert!(b.try_lock().is_ok());
    }
}
