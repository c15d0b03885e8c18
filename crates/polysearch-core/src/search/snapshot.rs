//! Atomically swappable engine snapshot.
//!
//! Readers grab the current `Arc<SearchEngine>` and keep using it for as long
//! as they like; a rebuild publishes a new engine without disturbing queries
//! already in flight.

use super::engine::SearchEngine;
use std::sync::{Arc, RwLock};
use tracing::info;

/// Shared handle to the currently published engine.
///
/// Cloning the handle shares the same slot.
///
/// ```ignore
/// let handle = EngineHandle::new(SearchEngine::build(&loader, embedder.clone(), config.clone()).await?);
///
/// // Query path
/// let engine = handle.current();
/// let response = engine.search("electric cars", None, 12)?;
///
/// // Refresh path
/// let fresh = SearchEngine::build(&loader, embedder, config).await?;
/// handle.publish(fresh);
/// ```
#[derive(Debug, Clone)]
pub struct EngineHandle {
    current: Arc<RwLock<Arc<SearchEngine>>>,
}

impl EngineHandle {
    /// Wraps an initial engine.
    pub fn new(engine: SearchEngine) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(engine))),
        }
    }

    /// Returns the published engine.
    ///
    /// The lock is held only for the pointer clone.
    pub fn current(&self) -> Arc<SearchEngine> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replaces the published engine and returns the previous one.
    pub fn publish(&self, engine: SearchEngine) -> Arc<SearchEngine> {
        let engine = Arc::new(engine);
        let previous = match self.current.write() {
            Ok(mut guard) => std::mem::replace(&mut *guard, engine),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), engine),
        };
        info!("Published new search engine snapshot");
        previous
    }
}
