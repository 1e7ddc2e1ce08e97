//! Ordered startup.
//!
//! # Sequence
//! ```text
//! AppConfig (validated) + Container
//!     → RouteRegistry::build (fail-fast)
//!     → stylesheet endpoint checked against route patterns
//!     → StyleRegistry::discover
//!     → AppContext, shared by every request
//! ```

use std::sync::Arc;

use crate::config::{AppConfig, ConfigError};
use crate::container::Container;
use crate::css::StyleRegistry;
use crate::observability::metrics;
use crate::routing::registry::pattern_shape;
use crate::routing::{RouteError, RouteRegistry};

/// The registries built at startup, handed to every endpoint.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub routes: Arc<RouteRegistry>,
    pub styles: Arc<StyleRegistry>,
}

/// Anything that stops the process before it serves traffic.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Build the registries from a validated configuration.
pub fn bootstrap(config: &AppConfig, container: &Container) -> Result<AppContext, RouteError> {
    let routes = RouteRegistry::build(container, &config.routing.mount_prefix)?;

    let stylesheet_shape = pattern_shape(&config.css.url_template);
    if let Some(binding) = routes
        .bindings()
        .iter()
        .find(|b| pattern_shape(b.pattern()) == stylesheet_shape)
    {
        return Err(RouteError::PatternConflict {
            pattern: config.css.url_template.clone(),
            first: binding.route(),
            second: "stylesheet",
        });
    }

    let styles = StyleRegistry::discover(container.styles(), &config.css);
    metrics::record_routes_registered(routes.len());

    Ok(AppContext {
        routes: Arc::new(routes),
        styles: Arc::new(styles),
    })
}
