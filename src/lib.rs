//! Typed server-side routes and a generated, content-hashed stylesheet for axum.

pub mod config;
pub mod container;
pub mod css;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::AppConfig;
pub use container::Container;
pub use http::AppServer;
pub use lifecycle::{bootstrap, AppContext};
pub use routing::{Route, RouteRegistry, RouteSchema};
