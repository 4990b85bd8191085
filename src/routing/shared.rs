//! Hot-swappable router snapshots.
//!
//! Readers load an `Arc<Router>` and match against it without locking.
//! Writers serialize on a mutex, build a new router off to the side and
//! publish it with a single atomic store, so a reader sees either the old
//! table or the new one, never a partially built one.

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use axum::http::Method;

use crate::routing::error::RouteError;
use crate::routing::router::Router;

/// A [`Router`] shared between request workers that can still change
/// after serving has started.
pub struct SharedRouter<H> {
    current: ArcSwap<Router<H>>,
    writer: Mutex<()>,
}

impl<H> SharedRouter<H> {
    pub fn new(router: Router<H>) -> Self {
        Self {
            current: ArcSwap::from_pointee(router),
            writer: Mutex::new(()),
        }
    }

    /// Current snapshot.
    pub fn load(&self) -> Arc<Router<H>> {
        self.current.load_full()
    }

    /// Publish `router` as the new snapshot, returning the previous one.
    pub fn replace(&self, router: Router<H>) -> Arc<Router<H>> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.current.swap(Arc::new(router))
    }
}

impl<H: Clone> SharedRouter<H> {
    /// Apply `f` to a copy of the current router and publish the result.
    /// If `f` fails the live snapshot is left untouched.
    pub fn update<F>(&self, f: F) -> Result<(), RouteError>
    where
        F: FnOnce(&mut Router<H>) -> Result<(), RouteError>,
    {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = Router::clone(&self.current.load());
        f(&mut next)?;
        self.current.store(Arc::new(next));
        Ok(())
    }

    /// Register one route on a new snapshot.
    pub fn register(
        &self,
        method: Method,
        pattern: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> Result<(), RouteError> {
        self.update(|router| router.register(method, pattern, handlers))
    }
}

impl<H> Default for SharedRouter<H> {
    fn default() -> Self {
        Self::new(Router::new())
    }
}
