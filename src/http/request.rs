//! Request handling.
//!
//! # Responsibilities
//! - Collect decoded path parameters from the matched pattern
//! - Collect query pairs, and urlencoded form pairs for mutating methods
//!
//! # Design Decisions
//! - Multipart and other bodies are left untouched for the endpoint
//! - Form bodies are read up to a configured limit; larger ones answer 413

use axum::{
    body::Body,
    extract::{FromRequestParts, RawPathParams},
    http::{header, request::Parts, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};

use crate::routing::RouteParams;

/// Gather every parameter a route may be rebuilt from.
///
/// Returns the body to hand to the endpoint: empty when it was consumed as a form.
pub async fn collect_params(
    parts: &mut Parts,
    body: Body,
    max_form_bytes: usize,
) -> Result<(RouteParams, Body), Response> {
    let mut params = RouteParams::new();

    if let Ok(raw) = RawPathParams::from_request_parts(parts, &()).await {
        for (name, value) in &raw {
            params.push_path(name, value);
        }
    }

    if let Some(query) = parts.uri.query() {
        params.extend_urlencoded(query.as_bytes());
    }

    if parts.method == Method::GET || !is_urlencoded_form(&parts.headers) {
        return Ok((params, body));
    }

    match axum::body::to_bytes(body, max_form_bytes).await {
        Ok(bytes) => {
            params.extend_urlencoded(&bytes);
            Ok((params, Body::empty()))
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to read form body");
            Err((StatusCode::PAYLOAD_TOO_LARGE, "Form body too large or unreadable").into_response())
        }
    }
}

fn is_urlencoded_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}
