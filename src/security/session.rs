//! Session contract consumed from the authentication layer.
//!
//! Session storage and token issuance live outside this crate. An upstream
//! middleware attaches a [`Session`] to the request extensions; routes and
//! access predicates only read it.

use std::ops::Deref;
use std::sync::Arc;

/// Name and value of the hidden anti-forgery field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfPair {
    pub field: String,
    pub token: String,
}

impl CsrfPair {
    pub fn new(field: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            token: token.into(),
        }
    }
}

/// Request-scoped authentication state.
pub trait SessionState: Send + Sync {
    fn is_authenticated(&self) -> bool;

    /// Current anti-forgery pair, if one was issued.
    fn csrf_pair(&self) -> Option<CsrfPair>;
}

/// Request extension carrying the session state.
#[derive(Clone)]
pub struct Session(pub Arc<dyn SessionState>);

impl Session {
    pub fn new(state: impl SessionState + 'static) -> Self {
        Self(Arc::new(state))
    }
}

impl Deref for Session {
    type Target = dyn SessionState;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}
