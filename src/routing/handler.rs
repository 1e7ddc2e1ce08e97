//! Handler definitions: what the registry scans at startup.
//!
//! A handler definition carries its declared parameter list (the registry
//! checks that exactly one of them is a route) and a type-erased endpoint.

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;

use crate::css::StyleSource;
use crate::lifecycle::startup::AppContext;
use crate::routing::params::RouteParams;
use crate::routing::route::{Route, RouteDescriptor};
use crate::security::session::Session;

/// Type-erased handler body.
pub type Endpoint = Arc<dyn Fn(Invocation) -> BoxFuture<'static, Response> + Send + Sync>;

/// Everything an endpoint receives for one request.
pub struct Invocation {
    pub params: RouteParams,
    pub parts: Parts,
    /// Request body; empty when it was consumed as an urlencoded form.
    pub body: Body,
    pub context: AppContext,
}

impl Invocation {
    /// Session state attached by the authentication layer, if any.
    pub fn session(&self) -> Option<&Session> {
        self.parts.extensions.get::<Session>()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some_and(|s| s.is_authenticated())
    }

    /// Class name of a registered style declaration; empty, with a warning,
    /// when `S` was never registered.
    pub fn class_name<S: StyleSource>(&self) -> String {
        match self.context.styles.class_name::<S>() {
            Some(name) => name.into_owned(),
            None => {
                tracing::warn!(
                    style = std::any::type_name::<S>(),
                    "Style not registered, rendering empty class name"
                );
                String::new()
            }
        }
    }
}

/// One declared parameter of a handler.
#[derive(Debug, Clone)]
pub enum HandlerParam {
    Route(RouteDescriptor),
    /// Any non-route parameter, by name (session, form body, ...).
    Other(&'static str),
}

/// A route handler as seen by discovery.
#[derive(Clone)]
pub struct HandlerDef {
    id: &'static str,
    params: Vec<HandlerParam>,
    endpoint: Endpoint,
}

impl HandlerDef {
    /// A handler whose single route parameter is `R`. The endpoint receives the
    /// route rebuilt from the request; rebuild failures answer 400.
    pub fn for_route<R, F, Fut, T>(id: &'static str, f: F) -> Self
    where
        R: Route,
        F: Fn(R, Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: IntoResponse,
    {
        let f = Arc::new(f);
        let endpoint: Endpoint = Arc::new(move |invocation: Invocation| -> BoxFuture<'static, Response> {
            let f = f.clone();
            Box::pin(async move {
                match R::from_params(&invocation.params) {
                    Ok(route) => f(route, invocation).await.into_response(),
                    Err(e) => {
                        tracing::debug!(error = %e, "Rejected route parameters");
                        e.into_response()
                    }
                }
            })
        });

        Self {
            id,
            params: vec![HandlerParam::Route(RouteDescriptor::of::<R>())],
            endpoint,
        }
    }

    /// A handler with no declared parameters and a raw endpoint. Declare its
    /// parameters with [`with_route`](Self::with_route) and [`with_param`](Self::with_param).
    pub fn raw<F, Fut>(id: &'static str, f: F) -> Self
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Self {
            id,
            params: Vec::new(),
            endpoint: Arc::new(move |invocation: Invocation| -> BoxFuture<'static, Response> {
                Box::pin(f(invocation))
            }),
        }
    }

    pub fn with_route<R: Route>(mut self) -> Self {
        self.params.push(HandlerParam::Route(RouteDescriptor::of::<R>()));
        self
    }

    pub fn with_param(mut self, name: &'static str) -> Self {
        self.params.push(HandlerParam::Other(name));
        self
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn params(&self) -> &[HandlerParam] {
        &self.params
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl std::fmt::Debug for HandlerDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerDef")
            .field("id", &self.id)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::container::Container;
    use crate::css::StyleDeclaration;
    use crate::lifecycle::bootstrap;
    use crate::observability::logging::CapturedLogs;
    use axum::http::Request;

    struct Registered;

    impl StyleSource for Registered {
        fn declare(&self) -> StyleDeclaration {
            StyleDeclaration::new().style("color: red;")
        }
    }

    struct Forgotten;

    impl StyleSource for Forgotten {
        fn declare(&self) -> StyleDeclaration {
            StyleDeclaration::new()
        }
    }

    fn invocation() -> Invocation {
        let container = Container::new().with_style(Registered);
        let context = bootstrap(&AppConfig::default(), &container).unwrap();
        let (parts, body) = Request::builder().uri("/").body(Body::empty()).unwrap().into_parts();
        Invocation {
            params: RouteParams::new(),
            parts,
            body,
            context,
        }
    }

    #[test]
    fn test_class_name_of_registered_style() {
        assert_eq!(invocation().class_name::<Registered>(), "gossr-0");
    }

    #[test]
    fn test_unregistered_style_is_logged() {
        let inv = invocation();
        let logs = CapturedLogs::default();

        let name = logs.during(|| inv.class_name::<Forgotten>());

        assert_eq!(name, "");
        assert!(logs.text().contains("Style not registered"));
        assert!(logs.text().contains("Forgotten"));
    }
}
