//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Binding (at startup):
//!     Container handlers
//!     → registry.rs (validate parameters, methods, uniqueness)
//!     → metadata.rs (prefix, path fields, query fields)
//!     → Freeze as immutable RouteRegistry
//!
//! Link/Form Resolution (per render):
//!     Route value
//!     → resolver.rs (path segments + query string)
//!     → form.rs (action, method, CSRF field)
//!
//! Dispatch (per request):
//!     matched pattern → params.rs → Route::from_params → handler
//! ```
//!
//! # Design Decisions
//! - Routes bound at startup, immutable at runtime
//! - Fixed scheme: prefix + ordered path fields, no URL grammar matching
//! - Exactly one handler per route type, checked before serving

pub mod error;
pub mod form;
pub mod handler;
pub mod metadata;
pub mod params;
pub mod registry;
pub mod resolver;
pub mod route;

pub use error::RouteError;
pub use form::{FormTarget, HiddenFieldSink};
pub use handler::{Endpoint, HandlerDef, HandlerParam, Invocation};
pub use metadata::RouteMetadata;
pub use params::{ParamError, RouteParams};
pub use registry::{RouteBinding, RouteRegistry};
pub use route::{
    Capabilities, Capability, FieldRole, FieldSpec, FieldValue, Route, RouteDescriptor,
    RouteSchema, ToFieldValue,
};
