//! Generated stylesheet subsystem.
//!
//! # Data Flow
//! ```text
//! Container style sources (startup)
//!     → registry.rs (class names in discovery order)
//!     → compiler.rs (rule lines, media groups, SHA-256)
//!     → Stylesheet served at the hash-addressed URL
//! ```

pub mod compiler;
pub mod declaration;
pub mod registry;

pub use compiler::{compile, content_hash, Stylesheet, DEV_HASH};
pub use declaration::{Pseudo, StyleDeclaration, StyleSource};
pub use registry::StyleRegistry;
