//! Global middleware registry
//!
//! Global middleware is registered in `bootstrap.rs` with `global_middleware!`
//! and wraps every request, matched or not, ahead of route middleware.

use super::{into_boxed, BoxedMiddleware, Middleware, MiddlewareChain};
use std::sync::{OnceLock, RwLock};

static GLOBAL_MIDDLEWARE: OnceLock<RwLock<Vec<BoxedMiddleware>>> = OnceLock::new();

/// Register a global middleware. Middleware runs in registration order.
pub fn register_global_middleware<M: Middleware + 'static>(middleware: M) {
    let registry = GLOBAL_MIDDLEWARE.get_or_init(|| RwLock::new(Vec::new()));
    if let Ok(mut vec) = registry.write() {
        vec.push(into_boxed(middleware));
    }
}

/// Snapshot of all registered global middleware
pub fn get_global_middleware() -> Vec<BoxedMiddleware> {
    GLOBAL_MIDDLEWARE
        .get()
        .and_then(|lock| lock.read().ok())
        .map(|vec| vec.clone())
        .unwrap_or_default()
}

/// Global middleware owned by one server instance
#[derive(Default, Clone)]
pub struct MiddlewareRegistry {
    global: Vec<BoxedMiddleware>,
}

impl MiddlewareRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded from `global_middleware!` registrations
    pub fn from_global() -> Self {
        Self {
            global: get_global_middleware(),
        }
    }

    /// Append global middleware that runs after the ones already present
    pub fn append<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.global.push(into_boxed(middleware));
        self
    }

    pub fn global_middleware(&self) -> &[BoxedMiddleware] {
        &self.global
    }

    /// A fresh chain holding the global middleware, ready for route middleware
    pub fn chain(&self) -> MiddlewareChain {
        let mut chain = MiddlewareChain::new();
        chain.extend(self.global.iter().cloned());
        chain
    }
}
