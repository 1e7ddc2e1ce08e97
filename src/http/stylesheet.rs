//! Hash-addressed stylesheet endpoint.
//!
//! Production hashes are served as immutable for a year; the live-reload
//! `dev` hash is never stored. A hash that is not the current one is a 404.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::css::StyleRegistry;

pub const IMMUTABLE: &str = "public, max-age=31536000, immutable";
pub const NO_STORE: &str = "no-store";

pub async fn serve_stylesheet(
    State(styles): State<Arc<StyleRegistry>>,
    Path(hash): Path<String>,
) -> Response {
    let sheet = styles.stylesheet();
    if sheet.hash != hash {
        tracing::debug!(requested = %hash, current = %sheet.hash, "Unknown stylesheet hash");
        return (StatusCode::NOT_FOUND, "Unknown stylesheet version").into_response();
    }

    let cache_control = if sheet.is_live() { NO_STORE } else { IMMUTABLE };
    (
        [
            (header::CONTENT_TYPE, "text/css"),
            (header::CACHE_CONTROL, cache_control),
        ],
        sheet.text.clone(),
    )
        .into_response()
}
