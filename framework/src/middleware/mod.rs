//! Middleware pipeline
//!
//! A middleware receives the request together with `next`, the rest of the
//! chain, and decides whether (and how) to call it:
//!
//! ```rust,ignore
//! use kit::{async_trait, Middleware, Next, Request, Response};
//!
//! pub struct Timing;
//!
//! #[async_trait]
//! impl Middleware for Timing {
//!     async fn handle(&self, request: Request, next: Next) -> Response {
//!         let started = std::time::Instant::now();
//!         let response = next(request).await;
//!         tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64);
//!         response
//!     }
//! }
//! ```

mod registry;

pub use registry::{get_global_middleware, register_global_middleware, MiddlewareRegistry};

use crate::http::{Request, Response};
use crate::routing::BoxedHandler;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The remainder of the middleware chain, ending in the route handler
pub type Next =
    Arc<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync>;

/// A request interceptor
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, request: Request, next: Next) -> Response;
}

/// Shared, type-erased middleware
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// Erase a middleware's concrete type
pub fn into_boxed<M: Middleware + 'static>(middleware: M) -> BoxedMiddleware {
    Arc::new(middleware)
}

/// Ordered middleware stack wrapped around one handler
///
/// The first middleware added is the outermost one.
#[derive(Default)]
pub struct MiddlewareChain {
    middleware: Vec<BoxedMiddleware>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, middleware: BoxedMiddleware) {
        self.middleware.push(middleware);
    }

    pub fn extend(&mut self, middleware: impl IntoIterator<Item = BoxedMiddleware>) {
        self.middleware.extend(middleware);
    }

    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    /// Run the request through every middleware and finally `handler`
    pub async fn execute(self, request: Request, handler: Arc<BoxedHandler>) -> Response {
        let mut next: Next = Arc::new(move |req: Request| handler(req));

        for middleware in self.middleware.into_iter().rev() {
            let inner = next;
            next = Arc::new(move |req: Request| {
                let middleware = middleware.clone();
                let inner = inner.clone();
                Box::pin(async move { middleware.handle(req, inner).await })
            });
        }

        next(request).await
    }
}

/// Register global middleware that runs on every request
///
/// ```rust,ignore
/// // In bootstrap.rs
/// global_middleware!(middleware::RequestLogger);
/// global_middleware!(middleware::Cors::from_config());
/// ```
#[macro_export]
macro_rules! global_middleware {
    ($middleware:expr) => {
        $crate::middleware::register_global_middleware($middleware)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use bytes::Bytes;
    use std::sync::Mutex;

    struct Tag {
        name: &'static str,
        seen: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl Middleware for Tag {
        async fn handle(&self, request: Request, next: Next) -> Response {
            self.seen.lock().unwrap().push(self.name);
            next(request).await
        }
    }

    struct Block;

    #[async_trait]
    impl Middleware for Block {
        async fn handle(&self, _request: Request, _next: Next) -> Response {
            Err(HttpResponse::text("blocked").status(403))
        }
    }

    fn handler() -> Arc<BoxedHandler> {
        let handler: BoxedHandler =
            Box::new(|_req| Box::pin(async { Ok(HttpResponse::text("done")) }));
        Arc::new(handler)
    }

    fn request() -> Request {
        Request::from_bytes(http::Request::new(Bytes::new()))
    }

    #[tokio::test]
    async fn test_chain_runs_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut chain = MiddlewareChain::new();
        chain.push(into_boxed(Tag { name: "outer", seen: seen.clone() }));
        chain.push(into_boxed(Tag { name: "inner", seen: seen.clone() }));

        let response = chain.execute(request(), handler()).await.unwrap();

        assert_eq!(response.body(), "done");
        assert_eq!(*seen.lock().unwrap(), vec!["outer", "inner"]);
    }

    #[tokio::test]
    async fn test_middleware_can_short_circuit() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut chain = MiddlewareChain::new();
        chain.push(into_boxed(Block));
        chain.push(into_boxed(Tag { name: "never", seen: seen.clone() }));

        let response = chain.execute(request(), handler()).await.unwrap_err();

        assert_eq!(response.status_code(), 403);
        assert!(seen.lock().unwrap().is_empty());
    }
}
