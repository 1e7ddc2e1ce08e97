//! Shared routes, styles and helpers for integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    middleware::{self, Next},
    response::Response,
    Router,
};
use tower::ServiceExt;
use uuid::Uuid;

use gossr::config::AppConfig;
use gossr::css::{StyleDeclaration, StyleSource};
use gossr::routing::{
    Capability, FieldValue, ParamError, Route, RouteParams, RouteSchema, ToFieldValue,
};
use gossr::security::{CsrfPair, Session, SessionState};
use gossr::{bootstrap, AppServer, Container};

pub struct SimpleRoute {
    pub a: i32,
    pub b: String,
    pub c: Uuid,
    pub e: Vec<i32>,
}

impl Route for SimpleRoute {
    fn schema() -> RouteSchema {
        RouteSchema::of::<Self>()
            .capability(Capability::Get)
            .path("a")
            .query("b")
            .query("c")
            .query("e")
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("a", self.a.to_field()),
            ("b", self.b.to_field()),
            ("c", self.c.to_field()),
            ("e", self.e.to_field()),
        ]
    }

    fn from_params(params: &RouteParams) -> Result<Self, ParamError> {
        Ok(Self {
            a: params.path("a")?,
            b: params.required("b")?,
            c: params.required("c")?,
            e: params.list("e")?,
        })
    }
}

pub struct ShowUserRoute {
    pub id: u64,
    pub tab: Option<String>,
}

impl Route for ShowUserRoute {
    fn schema() -> RouteSchema {
        RouteSchema::of::<Self>()
            .capability(Capability::Get)
            .path("id")
            .optional("tab")
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![("id", self.id.to_field()), ("tab", self.tab.to_field())]
    }

    fn from_params(params: &RouteParams) -> Result<Self, ParamError> {
        Ok(Self {
            id: params.path("id")?,
            tab: params.optional("tab")?,
        })
    }
}

pub struct RenameUserRoute {
    pub id: u64,
    pub name: String,
}

impl Route for RenameUserRoute {
    fn schema() -> RouteSchema {
        RouteSchema::of::<Self>()
            .capabilities([Capability::Get, Capability::Post, Capability::Csrf])
            .path("id")
            .query("name")
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![("id", self.id.to_field()), ("name", self.name.to_field())]
    }

    fn from_params(params: &RouteParams) -> Result<Self, ParamError> {
        Ok(Self {
            id: params.path("id")?,
            name: params.or_default("name")?,
        })
    }
}

pub struct HiddenRoute;

impl Route for HiddenRoute {
    fn schema() -> RouteSchema {
        RouteSchema::of::<Self>()
            .capability(Capability::Get)
            .access("hidden")
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        Vec::new()
    }

    fn from_params(_: &RouteParams) -> Result<Self, ParamError> {
        Ok(Self)
    }
}

pub struct AccountRoute;

impl Route for AccountRoute {
    fn schema() -> RouteSchema {
        RouteSchema::of::<Self>()
            .capability(Capability::Get)
            .access("authenticated")
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        Vec::new()
    }

    fn from_params(_: &RouteParams) -> Result<Self, ParamError> {
        Ok(Self)
    }
}

pub struct CardStyle;

impl StyleSource for CardStyle {
    fn declare(&self) -> StyleDeclaration {
        StyleDeclaration::new()
            .style("padding: 8px;")
            .hover("color: red;")
            .media("max-width: 600px", StyleDeclaration::new().style("padding: 2px;"))
    }
}

pub struct ButtonStyle;

impl StyleSource for ButtonStyle {
    fn class_name(&self) -> Option<String> {
        Some("button".to_string())
    }

    fn declare(&self) -> StyleDeclaration {
        StyleDeclaration::new().style("border: none;")
    }
}

/// Session whose anti-forgery pair is fixed per test.
pub struct TestSession {
    pub authenticated: bool,
}

impl SessionState for TestSession {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn csrf_pair(&self) -> Option<CsrfPair> {
        self.authenticated
            .then(|| CsrfPair::new("_csrf", "test-token"))
    }
}

/// Marks requests carrying `x-test-user` as authenticated.
pub async fn test_session(mut req: Request<Body>, next: Next) -> Response {
    let authenticated = req.headers().contains_key("x-test-user");
    req.extensions_mut()
        .insert(Session::new(TestSession { authenticated }));
    next.run(req).await
}

/// Full application router for `container`, with the test session layer.
pub fn app(config: AppConfig, container: &Container) -> Router {
    let context = bootstrap(&config, container).expect("bootstrap");
    AppServer::new(config, &context)
        .map_router(|router| router.layer(middleware::from_fn(test_session)))
        .router()
}

pub async fn send(router: Router, req: Request<Body>) -> Response {
    router.oneshot(req).await.unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}
