//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, API timeout)
//! - Serve static files and the index fallback
//! - Bind server to listener with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{any, get},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ViewerConfig;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::proxy::{proxy_handler, ConcurrencyGate, Proxy};
use crate::site::{items, pages, races, IndexPage, ItemLookup};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<Proxy>,
    pub items: Arc<ItemLookup>,
    pub index: Arc<IndexPage>,
}

/// Errors raised while building or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// HTTP server for the viewer front end.
pub struct HttpServer {
    router: Router,
    config: ViewerConfig,
    proxy: Arc<Proxy>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ViewerConfig) -> Result<Self, ServerError> {
        let proxy = Arc::new(Proxy::new(&config.proxy)?);
        let state = AppState {
            proxy: proxy.clone(),
            items: Arc::new(ItemLookup::new(&config.items)?),
            index: Arc::new(IndexPage::new(config.site.default_region.clone())),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            proxy,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ViewerConfig, state: AppState) -> Router {
        let api = Router::new()
            .route("/get-races", get(races::get_races))
            .route("/item-lookup", any(items::item_lookup))
            .route("/broken", get(pages::broken))
            .layer(TimeoutLayer::new(Duration::from_secs(config.items.timeout_secs)));

        Router::new()
            .route("/", get(pages::index))
            .route("/proxy/", any(proxy_handler))
            .route("/proxy/{*path}", any(proxy_handler))
            .merge(api)
            .nest_service("/static", ServeDir::new(&config.site.static_dir))
            .fallback(pages::index)
            .with_state(state)
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    ///
    /// The proxy gate is closed at shutdown so requests still queued for an
    /// upstream slot fail with 503 instead of holding the drain open.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            origin = %self.proxy.upstream().origin(),
            max_in_flight = self.proxy.gate().capacity(),
            "HTTP server starting"
        );

        let gate = self.proxy.gate().clone();
        let signal = async move {
            let _ = shutdown.recv().await;
            tracing::info!("Shutdown signal received");
            gate.close();
        };

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(signal)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// A clone of the router, for serving on additional listeners.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The proxy's admission gate.
    pub fn gate(&self) -> Arc<ConcurrencyGate> {
        self.proxy.gate().clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }
}
