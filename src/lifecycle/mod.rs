//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build registries → Install routes → Listen
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain connections → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then registries, then listeners
//! - Any registry error aborts startup before the listener is bound

pub mod shutdown;
pub mod startup;

pub use startup::{bootstrap, AppContext, StartupError};
