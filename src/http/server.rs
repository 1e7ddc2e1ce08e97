//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router from the route registry
//! - Mount the hash-addressed stylesheet endpoint
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener and shut down gracefully

use std::future::Future;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::dispatch::install_routes;
use crate::http::stylesheet::serve_stylesheet;
use crate::lifecycle::AppContext;

/// HTTP server for the application.
pub struct AppServer {
    router: Router,
    config: AppConfig,
}

impl AppServer {
    /// Create a new HTTP server from the configuration and the startup context.
    pub fn new(config: AppConfig, context: &AppContext) -> Self {
        let router = Self::build_router(&config, context);
        Self { router, config }
    }

    /// Build the axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &AppConfig, context: &AppContext) -> Router {
        install_routes(context, config.routing.max_form_bytes)
            .route(
                &config.css.url_template,
                get(serve_stylesheet).with_state(context.styles.clone()),
            )
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Wrap the router, e.g. with an authentication layer that attaches a
    /// [`Session`](crate::security::Session) to each request.
    pub fn map_router(mut self, f: impl FnOnce(Router) -> Router) -> Self {
        self.router = f(self.router);
        self
    }

    /// The router, for serving elsewhere or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
