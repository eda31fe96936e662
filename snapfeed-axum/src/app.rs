use std::path::Path;

use axum::handler::Handler;
use axum::http::HeaderName;
use axum::routing::get;
use axum::Router;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::FeedState;

const REQUEST_ID: &str = "x-request-id";

#[derive(Clone)]
pub struct AxumApp {
    pub state: FeedState,
    pub router: Router<()>,
}

impl AxumApp {
    pub fn new(state: FeedState) -> Self {
        let router = routes::feed_router(state.clone());
        Self { state, router }
    }

    /// Mount extra routes next to the feed routes
    pub fn merge(mut self, router: Router<()>) -> Self {
        self.router = self.router.merge(router);
        self
    }

    /// Mount a GET handler at `path`
    pub fn service<H, T>(mut self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()> + Clone + Send + Sync + 'static,
        T: 'static,
    {
        self.router = self.router.route(path, get(handler));
        self
    }

    /// Serve files (the client UI) for any path no route matched
    pub fn with_static_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.router = self.router.fallback_service(ServeDir::new(dir));
        self
    }

    /// Request ids, per-request tracing spans and permissive CORS.
    ///
    /// Call after every route is mounted; layers only wrap what is already
    /// on the router.
    pub fn with_http_layers(mut self) -> Self {
        let request_id = HeaderName::from_static(REQUEST_ID);

        self.router = self
            .router
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid));
        self
    }

    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(addr = %listener.local_addr()?, "listening");
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

pub fn axum(state: FeedState) -> AxumApp {
    AxumApp::new(state)
}
