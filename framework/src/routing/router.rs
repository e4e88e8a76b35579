use crate::http::{Request, Response};
use crate::middleware::{into_boxed, BoxedMiddleware, Middleware};
use matchit::Router as MatchitRouter;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// HTTP methods the router dispatches on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Map a hyper method; anything else (OPTIONS, HEAD, ...) has no routes
    pub fn from_hyper(method: &hyper::Method) -> Option<Self> {
        match *method {
            hyper::Method::GET => Some(Self::Get),
            hyper::Method::POST => Some(Self::Post),
            hyper::Method::PUT => Some(Self::Put),
            hyper::Method::PATCH => Some(Self::Patch),
            hyper::Method::DELETE => Some(Self::Delete),
            _ => None,
        }
    }
}

/// Type alias for route handlers
pub type BoxedHandler =
    Box<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync>;

#[derive(Clone)]
struct RouteEntry {
    handler: Arc<BoxedHandler>,
    pattern: Arc<str>,
}

/// A matched route: handler, extracted path params and route middleware
pub struct RouteMatch {
    pub handler: Arc<BoxedHandler>,
    pub params: HashMap<String, String>,
    pub middleware: Vec<BoxedMiddleware>,
}

/// HTTP Router
///
/// Route middleware is keyed by method and path *pattern*, so
/// `/workflows/{id}` keeps its middleware for every concrete id.
#[derive(Default)]
pub struct Router {
    routes: HashMap<HttpMethod, MatchitRouter<RouteEntry>>,
    route_middleware: HashMap<(HttpMethod, String), Vec<BoxedMiddleware>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register middleware for a route (internal use)
    pub(crate) fn add_middleware(
        &mut self,
        method: HttpMethod,
        path: &str,
        middleware: BoxedMiddleware,
    ) {
        self.route_middleware
            .entry((method, path.to_string()))
            .or_default()
            .push(middleware);
    }

    /// Insert a pre-boxed handler (internal use for groups)
    pub(crate) fn insert(&mut self, method: HttpMethod, path: &str, handler: Arc<BoxedHandler>) {
        let entry = RouteEntry {
            handler,
            pattern: Arc::from(path),
        };
        let routes = self.routes.entry(method).or_insert_with(MatchitRouter::new);
        if let Err(e) = routes.insert(path, entry) {
            tracing::warn!(?method, path, error = %e, "route not registered");
        }
    }

    /// Register a handler for `method` and `path`
    pub fn route<H, Fut>(mut self, method: HttpMethod, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let handler: BoxedHandler = Box::new(move |req| Box::pin(handler(req)));
        self.insert(method, path, Arc::new(handler));
        RouteBuilder {
            router: self,
            last_method: method,
            last_path: path.to_string(),
        }
    }

    /// Register a GET route
    pub fn get<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(HttpMethod::Get, path, handler)
    }

    /// Register a POST route
    pub fn post<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(HttpMethod::Post, path, handler)
    }

    /// Register a PUT route
    pub fn put<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(HttpMethod::Put, path, handler)
    }

    /// Register a PATCH route
    pub fn patch<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(HttpMethod::Patch, path, handler)
    }

    /// Register a DELETE route
    pub fn delete<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(HttpMethod::Delete, path, handler)
    }

    /// Match a request and return the handler with extracted params
    pub fn match_route(&self, method: &hyper::Method, path: &str) -> Option<RouteMatch> {
        let method = HttpMethod::from_hyper(method)?;
        let matched = self.routes.get(&method)?.at(path).ok()?;

        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let middleware = self
            .route_middleware
            .get(&(method, matched.value.pattern.to_string()))
            .cloned()
            .unwrap_or_default();

        Some(RouteMatch {
            handler: matched.value.handler.clone(),
            params,
            middleware,
        })
    }
}

/// Builder returned after registering a route, enabling `.middleware()` chaining
pub struct RouteBuilder {
    pub(crate) router: Router,
    last_method: HttpMethod,
    last_path: String,
}

impl RouteBuilder {
    /// Apply middleware to the most recently registered route
    ///
    /// ```rust,ignore
    /// Router::new()
    ///     .get("/api/v1/workflows", list).middleware(Authenticate)
    /// ```
    pub fn middleware<M: Middleware + 'static>(self, middleware: M) -> RouteBuilder {
        self.middleware_boxed(into_boxed(middleware))
    }

    /// Apply pre-boxed middleware to the most recently registered route
    pub fn middleware_boxed(mut self, middleware: BoxedMiddleware) -> RouteBuilder {
        self.router
            .add_middleware(self.last_method, &self.last_path, middleware);
        self
    }

    /// Register a GET route (for chaining)
    pub fn get<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.get(path, handler)
    }

    /// Register a POST route (for chaining)
    pub fn post<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.post(path, handler)
    }
}

impl From<RouteBuilder> for Router {
    fn from(builder: RouteBuilder) -> Self {
        builder.router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use crate::middleware::Next;
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl Middleware for Noop {
        async fn handle(&self, request: Request, next: Next) -> Response {
            next(request).await
        }
    }

    async fn ok(_req: Request) -> Response {
        Ok(HttpResponse::text("ok"))
    }

    #[test]
    fn test_param_routes_keep_their_middleware() {
        let router: Router = Router::new()
            .get("/workflows/{id}", ok)
            .middleware(Noop)
            .into();

        let matched = router
            .match_route(&hyper::Method::GET, "/workflows/8f14e45f")
            .unwrap();
        assert_eq!(matched.params.get("id").map(String::as_str), Some("8f14e45f"));
        assert_eq!(matched.middleware.len(), 1);
    }

    #[test]
    fn test_middleware_is_per_method() {
        let router: Router = Router::new()
            .get("/workflows", ok)
            .post("/workflows", ok)
            .middleware(Noop)
            .into();

        let get = router.match_route(&hyper::Method::GET, "/workflows").unwrap();
        let post = router.match_route(&hyper::Method::POST, "/workflows").unwrap();
        assert!(get.middleware.is_empty());
        assert_eq!(post.middleware.len(), 1);
    }

    #[test]
    fn test_patch_and_unknown_methods() {
        let router: Router = Router::new().patch("/agents/{id}/deploy", ok).into();

        assert!(router
            .match_route(&hyper::Method::PATCH, "/agents/1/deploy")
            .is_some());
        assert!(router
            .match_route(&hyper::Method::OPTIONS, "/agents/1/deploy")
            .is_none());
    }
}
