//! Installation of route bindings into the axum router.
//!
//! # Responsibilities
//! - One `MethodRouter` per URL pattern, merging the methods of every binding
//!   on that pattern
//! - Wrap each binding's endpoint with the access interceptor for its handler
//! - Rebuild route parameters and invoke the endpoint

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    middleware,
    response::Response,
    routing::{on, MethodFilter, MethodRouter},
    Router,
};

use crate::http::request::collect_params;
use crate::lifecycle::AppContext;
use crate::observability::metrics;
use crate::routing::{Invocation, RouteBinding};
use crate::security::access_control::{access_interceptor, InterceptorState};

/// Install every binding of the context's registry.
pub fn install_routes(context: &AppContext, max_form_bytes: usize) -> Router {
    let mut order: Vec<String> = Vec::new();
    let mut routers: HashMap<String, MethodRouter> = HashMap::new();

    for binding in context.routes.bindings() {
        let pattern = binding.pattern().to_string();
        let endpoint = endpoint_router(binding.clone(), context.clone(), max_form_bytes);

        let merged = match routers.remove(&pattern) {
            Some(existing) => existing.merge(endpoint),
            None => {
                order.push(pattern.clone());
                endpoint
            }
        };
        routers.insert(pattern, merged);
    }

    order.into_iter().fold(Router::new(), |router, pattern| {
        match routers.remove(&pattern) {
            Some(method_router) => router.route(&pattern, method_router),
            None => router,
        }
    })
}

fn endpoint_router(
    binding: Arc<RouteBinding>,
    context: AppContext,
    max_form_bytes: usize,
) -> MethodRouter {
    let filter = method_filter(binding.methods());
    let interceptor = InterceptorState {
        routes: context.routes.clone(),
        handler: binding.handler(),
    };

    on(filter, move |req: Request<Body>| {
        dispatch(binding.clone(), context.clone(), req, max_form_bytes)
    })
    .route_layer(middleware::from_fn_with_state(interceptor, access_interceptor))
}

fn method_filter(methods: &[Method]) -> MethodFilter {
    methods
        .iter()
        .filter_map(|m| MethodFilter::try_from(m.clone()).ok())
        .reduce(MethodFilter::or)
        .unwrap_or(MethodFilter::GET)
}

async fn dispatch(
    binding: Arc<RouteBinding>,
    context: AppContext,
    req: Request<Body>,
    max_form_bytes: usize,
) -> Response {
    let (mut parts, body) = req.into_parts();
    let (params, body) = match collect_params(&mut parts, body, max_form_bytes).await {
        Ok(collected) => collected,
        Err(response) => return response,
    };

    tracing::debug!(
        route = binding.route(),
        handler = binding.handler(),
        method = %parts.method,
        path = %parts.uri.path(),
        "Dispatching"
    );

    let invocation = Invocation {
        params,
        parts,
        body,
        context,
    };
    let response = (binding.endpoint())(invocation).await;
    metrics::record_request(binding.route(), response.status().as_u16());
    response
}
