//! Security subsystem.
//!
//! # Responsibilities
//! - Per-route access predicates, enforced before dispatch
//! - Session contract (authenticated flag, anti-forgery pair)
//!
//! # Design Decisions
//! - Predicates are resolved at startup and stored on the binding
//! - Denial is a normal response, not an error

pub mod access_control;
pub mod session;

pub use access_control::{predicate_fn, AccessPredicate, Denial, RequestContext};
pub use session::{CsrfPair, Session, SessionState};
