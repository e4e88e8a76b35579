//! Declarative route definitions
//!
//! ```rust,ignore
//! use kit::{routes, get, post, patch, group};
//!
//! routes! {
//!     get!("/", controllers::root::index),
//!
//!     group!("/api/v1/auth", {
//!         post!("/signup", controllers::auth::signup),
//!         post!("/login", controllers::auth::login),
//!     }),
//!
//!     group!("/api/v1", {
//!         get!("/workflows", controllers::workflows::index),
//!         patch!("/agents/{id}/deploy", controllers::agents::deploy),
//!     }).middleware(Authenticate),
//! }
//! ```

use crate::http::{Request, Response};
use crate::middleware::{into_boxed, BoxedMiddleware, Middleware};
use crate::routing::router::{BoxedHandler, HttpMethod, Router};
use std::future::Future;
use std::sync::Arc;

/// Const function to validate route paths start with '/'
///
/// # Panics
///
/// Panics at compile time if the path is empty or doesn't start with '/'.
pub const fn validate_route_path(path: &'static str) -> &'static str {
    let bytes = path.as_bytes();
    if bytes.is_empty() || bytes[0] != b'/' {
        panic!("Route path must start with '/'")
    }
    path
}

/// Builder for route definitions that supports `.middleware()` chaining
pub struct RouteDefBuilder<H> {
    method: HttpMethod,
    path: &'static str,
    handler: H,
    middlewares: Vec<BoxedMiddleware>,
}

impl<H, Fut> RouteDefBuilder<H>
where
    H: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    pub fn new(method: HttpMethod, path: &'static str, handler: H) -> Self {
        Self {
            method,
            path,
            handler,
            middlewares: Vec::new(),
        }
    }

    /// Add middleware to this route
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middlewares.push(into_boxed(middleware));
        self
    }

    /// Register this route definition with a router
    pub fn register(self, router: Router) -> Router {
        let builder = router.route(self.method, self.path, self.handler);
        self.middlewares
            .into_iter()
            .fold(builder, |b, m| b.middleware_boxed(m))
            .into()
    }

    /// Convert this route definition to a type-erased GroupRoute
    pub fn into_group_route(self) -> GroupRoute {
        let handler = self.handler;
        let boxed: BoxedHandler = Box::new(move |req| Box::pin(handler(req)));
        GroupRoute {
            method: self.method,
            path: self.path,
            handler: Arc::new(boxed),
            middlewares: self.middlewares,
        }
    }
}

#[doc(hidden)]
pub fn __route_impl<H, Fut>(method: HttpMethod, path: &'static str, handler: H) -> RouteDefBuilder<H>
where
    H: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    RouteDefBuilder::new(method, path, handler)
}

/// Create a GET route definition with compile-time path validation
#[macro_export]
macro_rules! get {
    ($path:expr, $handler:expr) => {{
        const _: &str = $crate::validate_route_path($path);
        $crate::__route_impl($crate::HttpMethod::Get, $path, $handler)
    }};
}

/// Create a POST route definition with compile-time path validation
#[macro_export]
macro_rules! post {
    ($path:expr, $handler:expr) => {{
        const _: &str = $crate::validate_route_path($path);
        $crate::__route_impl($crate::HttpMethod::Post, $path, $handler)
    }};
}

/// Create a PUT route definition with compile-time path validation
#[macro_export]
macro_rules! put {
    ($path:expr, $handler:expr) => {{
        const _: &str = $crate::validate_route_path($path);
        $crate::__route_impl($crate::HttpMethod::Put, $path, $handler)
    }};
}

/// Create a PATCH route definition with compile-time path validation
#[macro_export]
macro_rules! patch {
    ($path:expr, $handler:expr) => {{
        const _: &str = $crate::validate_route_path($path);
        $crate::__route_impl($crate::HttpMethod::Patch, $path, $handler)
    }};
}

/// Create a DELETE route definition with compile-time path validation
#[macro_export]
macro_rules! delete {
    ($path:expr, $handler:expr) => {{
        const _: &str = $crate::validate_route_path($path);
        $crate::__route_impl($crate::HttpMethod::Delete, $path, $handler)
    }};
}

/// A route stored within a group (type-erased handler)
pub struct GroupRoute {
    method: HttpMethod,
    path: &'static str,
    handler: Arc<BoxedHandler>,
    middlewares: Vec<BoxedMiddleware>,
}

/// Group definition that collects routes and applies prefix/middleware
pub struct GroupDef {
    prefix: &'static str,
    routes: Vec<GroupRoute>,
    group_middlewares: Vec<BoxedMiddleware>,
}

impl GroupDef {
    /// Use the `group!` macro instead for compile-time validation.
    #[doc(hidden)]
    pub fn __new_unchecked(prefix: &'static str) -> Self {
        Self {
            prefix,
            routes: Vec::new(),
            group_middlewares: Vec::new(),
        }
    }

    /// Add a route to this group
    pub fn route<H, Fut>(mut self, route: RouteDefBuilder<H>) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.routes.push(route.into_group_route());
        self
    }

    /// Add middleware to all routes in this group, in the order added
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.group_middlewares.push(into_boxed(middleware));
        self
    }

    /// Register all routes in this group with the router
    ///
    /// A route path of "/" maps to the bare prefix. Group middleware wraps
    /// route middleware.
    pub fn register(self, mut router: Router) -> Router {
        for route in self.routes {
            let full_path = if route.path == "/" {
                self.prefix.to_string()
            } else {
                format!("{}{}", self.prefix, route.path)
            };

            router.insert(route.method, &full_path, route.handler);

            for mw in &self.group_middlewares {
                router.add_middleware(route.method, &full_path, mw.clone());
            }
            for mw in route.middlewares {
                router.add_middleware(route.method, &full_path, mw);
            }
        }

        router
    }
}

/// Define a route group with a shared prefix and compile-time validation
#[macro_export]
macro_rules! group {
    ($prefix:expr, { $( $route:expr ),* $(,)? }) => {{
        const _: &str = $crate::validate_route_path($prefix);
        let mut group = $crate::GroupDef::__new_unchecked($prefix);
        $(
            group = group.route($route);
        )*
        group
    }};
}

/// Define routes; generates `pub fn register() -> Router`
#[macro_export]
macro_rules! routes {
    ( $( $route:expr ),* $(,)? ) => {
        pub fn register() -> $crate::Router {
            let mut router = $crate::Router::new();
            $(
                router = $route.register(router);
            )*
            router
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use crate::middleware::Next;
    use async_trait::async_trait;

    struct Guard;

    #[async_trait]
    impl Middleware for Guard {
        async fn handle(&self, request: Request, next: Next) -> Response {
            next(request).await
        }
    }

    async fn ok(_req: Request) -> Response {
        Ok(HttpResponse::text("ok"))
    }

    #[test]
    fn test_group_prefixes_and_applies_middleware() {
        let router = crate::group!("/api/v1", {
            crate::get!("/workflows", ok),
            crate::patch!("/agents/{id}/deploy", ok).middleware(Guard),
        })
        .middleware(Guard)
        .register(Router::new());

        let list = router.match_route(&hyper::Method::GET, "/api/v1/workflows").unwrap();
        assert_eq!(list.middleware.len(), 1);

        let deploy = router
            .match_route(&hyper::Method::PATCH, "/api/v1/agents/7/deploy")
            .unwrap();
        assert_eq!(deploy.middleware.len(), 2);
        assert!(router.match_route(&hyper::Method::GET, "/workflows").is_none());
    }

    #[test]
    fn test_group_root_route_maps_to_prefix() {
        let router = crate::group!("/api/v1/metrics", { crate::get!("/", ok) })
            .register(Router::new());
        assert!(router.match_route(&hyper::Method::GET, "/api/v1/metrics").is_some());
    }
}
