//! Shared application state for the event display server.
//!
//! [`AppState`] is injected into every handler via Axum's `State`
//! extractor. It holds the immutable detector geometry, the event data
//! store behind a read-write lock, and the lifecycle controller that
//! `/quit` signals.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hepevd_types::DetectorGeometry;

use crate::lifecycle::Lifecycle;
use crate::store::EventStore;

/// Shared state for the Axum application.
///
/// Handlers only ever take the read side of the store lock. The write side
/// is used by the embedding host, normally before the server starts.
#[derive(Debug)]
pub struct AppState {
    /// Detector geometry, fixed for the lifetime of the server.
    pub geometry: Arc<DetectorGeometry>,
    /// The event data (hits, MC hits, markers, particles, truth).
    store: RwLock<EventStore>,
    /// Start/stop controller.
    pub lifecycle: Lifecycle,
}

impl AppState {
    /// Create application state from a geometry and an initial store.
    pub fn new(geometry: impl Into<Arc<DetectorGeometry>>, store: EventStore) -> Self {
        Self {
            geometry: geometry.into(),
            store: RwLock::new(store),
            lifecycle: Lifecycle::new(),
        }
    }

    /// Read access to the event data.
    ///
    /// A poisoned lock is recovered: the store has no invariants a
    /// panicking writer could leave half-applied.
    pub fn store(&self) -> RwLockReadGuard<'_, EventStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write access to the event data.
    pub fn store_mut(&self) -> RwLockWriteGuard<'_, EventStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}
