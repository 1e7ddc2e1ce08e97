//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, request ID, tracing, timeout)
//!     → dispatch.rs (pattern matched → access interceptor → endpoint)
//!     → request.rs (path, query and form parameters)
//!     → stylesheet.rs (hash-addressed CSS)
//! ```

pub mod dispatch;
pub mod request;
pub mod server;
pub mod stylesheet;

pub use dispatch::install_routes;
pub use server::AppServer;
