//! Access Control Middleware.
//! Enforces per-route access predicates before the handler runs.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{request::Parts, HeaderMap, Method, Request, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::observability::metrics;
use crate::routing::RouteRegistry;
use crate::security::session::Session;

/// Status and message answered instead of running the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub status: StatusCode,
    pub message: String,
}

impl Denial {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for Denial {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

/// Read-only view of the request handed to predicates.
pub struct RequestContext<'a> {
    parts: &'a Parts,
}

impl<'a> RequestContext<'a> {
    pub fn new(parts: &'a Parts) -> Self {
        Self { parts }
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    pub fn session(&self) -> Option<&Session> {
        self.parts.extensions.get::<Session>()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some_and(|s| s.is_authenticated())
    }
}

/// A named access rule attached to route types.
pub trait AccessPredicate: Send + Sync {
    /// `None` allows the request.
    fn check(&self, request: &RequestContext<'_>) -> Option<Denial>;
}

/// Predicate backed by a closure.
pub struct PredicateFn<F>(F);

impl<F> AccessPredicate for PredicateFn<F>
where
    F: Fn(&RequestContext<'_>) -> Option<Denial> + Send + Sync,
{
    fn check(&self, request: &RequestContext<'_>) -> Option<Denial> {
        (self.0)(request)
    }
}

pub fn predicate_fn<F>(f: F) -> PredicateFn<F>
where
    F: Fn(&RequestContext<'_>) -> Option<Denial> + Send + Sync,
{
    PredicateFn(f)
}

/// Denies anonymous requests with 401.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireAuthenticated;

impl AccessPredicate for RequireAuthenticated {
    fn check(&self, request: &RequestContext<'_>) -> Option<Denial> {
        if request.is_authenticated() {
            None
        } else {
            Some(Denial::new(StatusCode::UNAUTHORIZED, "Authentication required"))
        }
    }
}

/// State of the interceptor installed on one handler's routes.
#[derive(Clone)]
pub struct InterceptorState {
    pub routes: Arc<RouteRegistry>,
    pub handler: &'static str,
}

/// Evaluate the access predicate bound to `handler`.
pub fn check_access(routes: &RouteRegistry, handler: &str, parts: &Parts) -> Option<Denial> {
    let binding = routes.binding_for_handler(handler)?;
    let denial = binding.access()?.check(&RequestContext::new(parts))?;

    tracing::debug!(
        route = binding.route(),
        status = denial.status.as_u16(),
        path = %parts.uri.path(),
        "Access denied"
    );
    metrics::record_access_denied(binding.route());
    Some(denial)
}

pub async fn access_interceptor(
    State(state): State<InterceptorState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (parts, body) = req.into_parts();

    match check_access(&state.routes, state.handler, &parts) {
        Some(denial) => denial.into_response(),
        None => next.run(Request::from_parts(parts, body)).await,
    }
}
