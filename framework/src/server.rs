use crate::config::{Config, ServerConfig};
use crate::container::App;
use crate::error::FrameworkError;
use crate::http::{HttpResponse, Request, Response};
use crate::middleware::{Middleware, MiddlewareRegistry};
use crate::routing::{BoxedHandler, Router};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Routes a request through global middleware, route middleware and the handler
///
/// Requests that match no route still pass through global middleware and end
/// in a 404, so middleware such as CORS can answer them.
#[derive(Clone)]
pub struct Dispatcher {
    router: Arc<Router>,
    middleware: Arc<MiddlewareRegistry>,
    fallback: Arc<BoxedHandler>,
    max_body_size: Option<usize>,
}

impl Dispatcher {
    pub fn new(router: Router, middleware: MiddlewareRegistry) -> Self {
        let fallback: BoxedHandler = Box::new(|_req| Box::pin(not_found()));
        Self {
            router: Arc::new(router),
            middleware: Arc::new(middleware),
            fallback: Arc::new(fallback),
            max_body_size: None,
        }
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.max_body_size = Some(limit);
        self
    }

    pub async fn dispatch(&self, request: Request) -> HttpResponse {
        let request = match self.max_body_size {
            Some(limit) => request.with_body_limit(limit),
            None => request,
        };

        let mut chain = self.middleware.chain();
        let (request, handler) = match self.router.match_route(request.method(), request.path()) {
            Some(matched) => {
                chain.extend(matched.middleware);
                (request.with_params(matched.params), matched.handler)
            }
            None => (request, self.fallback.clone()),
        };

        // Both Ok and Err carry a response
        chain.execute(request, handler).await.unwrap_or_else(|e| e)
    }
}

async fn not_found() -> Response {
    Err(FrameworkError::domain("Not Found", 404).into())
}

pub struct Server {
    router: Router,
    middleware: MiddlewareRegistry,
    host: String,
    port: u16,
    max_body_size: usize,
}

impl Server {
    pub fn new(router: impl Into<Router>) -> Self {
        let defaults = ServerConfig::builder().build();
        Self {
            router: router.into(),
            middleware: MiddlewareRegistry::new(),
            host: defaults.host,
            port: defaults.port,
            max_body_size: defaults.max_body_size,
        }
    }

    /// Build a server from `ServerConfig` and the global middleware registry
    ///
    /// Also boots the container and every `#[injectable]` service.
    pub fn from_config(router: impl Into<Router>) -> Self {
        App::init();
        App::boot_services();

        let config = Config::get::<ServerConfig>().unwrap_or_else(ServerConfig::from_env);
        Self {
            router: router.into(),
            middleware: MiddlewareRegistry::from_global(),
            host: config.host,
            port: config.port,
            max_body_size: config.max_body_size,
        }
    }

    /// Add global middleware (runs on every request)
    ///
    /// For route-specific middleware, use `.middleware(M)` on the route itself.
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware = self.middleware.append(middleware);
        self
    }

    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    fn addr(&self) -> Result<SocketAddr, FrameworkError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| FrameworkError::internal(format!("Invalid SERVER_HOST '{}'", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Turn this server into a dispatcher without binding a socket
    pub fn into_dispatcher(self) -> Dispatcher {
        Dispatcher::new(self.router, self.middleware).with_body_limit(self.max_body_size)
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.addr()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("server listening on http://{}", addr);

        let dispatcher = self.into_dispatcher();

        loop {
            let (stream, peer) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let dispatcher = dispatcher.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: hyper::Request<hyper::body::Incoming>| {
                    let dispatcher = dispatcher.clone();
                    async move {
                        let response = dispatcher.dispatch(Request::new(req)).await;
                        Ok::<_, Infallible>(response.into_hyper())
                    }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::debug!(%peer, error = ?err, "connection closed with error");
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::Next;
    use async_trait::async_trait;
    use bytes::Bytes;

    struct Stamp;

    #[async_trait]
    impl Middleware for Stamp {
        async fn handle(&self, request: Request, next: Next) -> Response {
            next(request).await.map(|r| r.header("X-Stamp", "1")).map_err(|r| r.header("X-Stamp", "1"))
        }
    }

    async fn show(req: Request) -> Response {
        let id = req.param("id")?.to_string();
        Ok(HttpResponse::text(id))
    }

    fn request(method: &str, uri: &str) -> Request {
        Request::from_bytes(
            http::Request::builder()
                .method(method)
                .uri(uri)
                .body(Bytes::new())
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_dispatch_matches_params() {
        let router: Router = Router::new().get("/workflows/{id}", show).into();
        let dispatcher = Dispatcher::new(router, MiddlewareRegistry::new().append(Stamp));

        let response = dispatcher.dispatch(request("GET", "/workflows/abc")).await;
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.body(), "abc");
        assert_eq!(response.header_value("x-stamp"), Some("1"));
    }

    #[tokio::test]
    async fn test_unmatched_request_still_runs_global_middleware() {
        let dispatcher = Dispatcher::new(Router::new(), MiddlewareRegistry::new().append(Stamp));

        let response = dispatcher.dispatch(request("OPTIONS", "/anything")).await;
        assert_eq!(response.status_code(), 404);
        assert_eq!(response.body(), r#"{"detail":"Not Found"}"#);
        assert_eq!(response.header_value("x-stamp"), Some("1"));
    }

    #[test]
    fn test_invalid_host_is_an_error() {
        let server = Server::new(Router::new()).host("not an ip");
        assert!(server.addr().is_err());
    }
}
