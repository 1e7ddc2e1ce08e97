//! Demo site served by the binary.
//!
//! A handful of routes and styles exercising every binding feature: path and
//! query fields, collections, a GET/POST form with an anti-forgery field, and
//! access predicates.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use uuid::Uuid;

use gossr::container::Container;
use gossr::css::{StyleDeclaration, StyleSource};
use gossr::routing::{
    Capability, FieldValue, FormTarget, HandlerDef, Invocation, ParamError, Route, RouteParams,
    RouteSchema, ToFieldValue,
};
use gossr::security::access_control::RequireAuthenticated;
use gossr::security::{predicate_fn, CsrfPair, Denial, Session, SessionState};

pub struct HomeRoute;

impl Route for HomeRoute {
    fn schema() -> RouteSchema {
        RouteSchema::of::<Self>().prefix("/").capability(Capability::Get)
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        Vec::new()
    }

    fn from_params(_: &RouteParams) -> Result<Self, ParamError> {
        Ok(Self)
    }
}

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

pub struct EditUserRoute {
    pub id: u64,
    pub name: Option<String>,
}

impl Route for EditUserRoute {
    fn schema() -> RouteSchema {
        RouteSchema::of::<Self>()
            .capabilities([Capability::Get, Capability::Post, Capability::Csrf])
            .access("authenticated")
            .path("id")
            .optional("name")
            .present()
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![("id", self.id.to_field()), ("name", self.name.to_field())]
    }

    fn from_params(params: &RouteParams) -> Result<Self, ParamError> {
        Ok(Self {
            id: params.path("id")?,
            name: params.optional("name")?,
        })
    }
}

pub struct SecretRoute;

impl Route for SecretRoute {
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

pub struct PageStyle;

impl StyleSource for PageStyle {
    fn declare(&self) -> StyleDeclaration {
        StyleDeclaration::new()
            .style("font-family: sans-serif;\nmargin: 0 auto;\nmax-width: 960px;")
            .media("max-width: 991px", StyleDeclaration::new().style("padding: 0 8px;"))
    }
}

pub struct NavStyle;

impl StyleSource for NavStyle {
    fn declare(&self) -> StyleDeclaration {
        StyleDeclaration::new()
            .style("display: flex; gap: 12px;")
            .rule(">a", "color: #245;")
            .rule(">a:hover", "color: #48a;")
            .media("max-width: 991px", StyleDeclaration::new().style("flex-direction: column;"))
    }
}

pub struct ButtonStyle;

impl StyleSource for ButtonStyle {
    fn class_name(&self) -> Option<String> {
        Some("button".to_string())
    }

    fn declare(&self) -> StyleDeclaration {
        StyleDeclaration::new()
            .style("padding: 4px 12px; border: 1px solid #245;")
            .hover("background: #245; color: white;")
            .disabled("opacity: 0.5;")
    }
}

/// Everything the demo registers.
pub fn container() -> Container {
    Container::new()
        .with_predicate("authenticated", RequireAuthenticated)
        .with_predicate(
            "hidden",
            predicate_fn(|_| Some(Denial::new(StatusCode::NOT_FOUND, "not found"))),
        )
        .with_style(PageStyle)
        .with_style(NavStyle)
        .with_style(ButtonStyle)
        .with_handler(HandlerDef::for_route("home", home))
        .with_handler(HandlerDef::for_route("simple", simple))
        .with_handler(HandlerDef::for_route("edit_user", edit_user))
        .with_handler(HandlerDef::for_route("secret", |_: SecretRoute, _| async {
            "unreachable"
        }))
}

async fn home(_: HomeRoute, inv: Invocation) -> Response {
    let routes = &inv.context.routes;
    let simple = SimpleRoute {
        a: 123,
        b: "Hello".into(),
        c: Uuid::new_v4(),
        e: vec![1, 2, 3],
    };
    let edit = EditUserRoute { id: 1, name: None };

    let (simple_url, edit_url) = match (routes.resolve_url(&simple), routes.resolve_url(&edit)) {
        (Ok(simple), Ok(edit)) => (simple, edit),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!(error = %e, "Failed to resolve link");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    page(
        &inv,
        "Home",
        format!(
            r#"<a href="{}">simple</a><a href="{}">edit user 1</a>"#,
            attr(&simple_url),
            attr(&edit_url)
        ),
    )
}

async fn simple(route: SimpleRoute, inv: Invocation) -> Response {
    let body = format!(
        "<p>a={} b={} c={} e={:?}</p>",
        route.a,
        text(&route.b),
        route.c,
        route.e
    );
    page(&inv, "Simple", body)
}

async fn edit_user(route: EditUserRoute, inv: Invocation) -> Response {
    if inv.parts.method == axum::http::Method::POST {
        let name = route.name.unwrap_or_default();
        return page(&inv, "Saved", format!("<p>user {} is now {}</p>", route.id, text(&name)));
    }

    let session = inv.session().map(|s| &**s);
    let form = match FormTarget::for_route(&inv.context.routes, &route, session) {
        Ok(form) => form,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    let mut hidden = Vec::new();
    form.emit_hidden(&mut hidden);
    let hidden: String = hidden
        .iter()
        .map(|(name, value)| {
            format!(
                r#"<input type="hidden" name="{}" value="{}">"#,
                attr(name),
                attr(value)
            )
        })
        .collect();

    let button = inv.class_name::<ButtonStyle>();
    page(
        &inv,
        "Edit user",
        format!(
            r#"<form action="{}" method="{}" enctype="{}">{hidden}<input name="name" required><button class="{button}">Save</button></form>"#,
            attr(&form.action),
            form.method,
            form.enctype(),
        ),
    )
}

fn page(inv: &Invocation, title: &str, body: String) -> Response {
    let styles = &inv.context.styles;
    let page_class = inv.class_name::<PageStyle>();
    let nav_class = inv.class_name::<NavStyle>();
    let home = inv.context.routes.resolve_url(&HomeRoute).unwrap_or_else(|_| "/".into());

    Html(format!(
        r#"<!doctype html><html><head><title>{title}</title><link rel="stylesheet" href="{css}"></head><body class="{page_class}"><nav class="{nav_class}"><a href="{home}">home</a></nav>{body}</body></html>"#,
        css = attr(&styles.stylesheet_url()),
        home = attr(&home),
    ))
    .into_response()
}

/// Stand-in for a real authentication layer: `X-Demo-User` marks the request
/// authenticated and grants a fixed anti-forgery pair.
struct DemoSession {
    user: Option<String>,
}

impl SessionState for DemoSession {
    fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    fn csrf_pair(&self) -> Option<CsrfPair> {
        self.user.as_ref().map(|u| CsrfPair::new("_csrf", format!("demo-{u}")))
    }
}

pub async fn demo_session(mut req: Request<Body>, next: Next) -> Response {
    let user = req
        .headers()
        .get("x-demo-user")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    req.extensions_mut().insert(Session::new(DemoSession { user }));
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::middleware;
    use tower::ServiceExt;

    use gossr::config::AppConfig;
    use gossr::{bootstrap, AppServer};

    async fn fetch(req: Request<Body>) -> String {
        let config = AppConfig::default();
        let context = bootstrap(&config, &container()).unwrap();
        let router = AppServer::new(config, &context)
            .map_router(|router| router.layer(middleware::from_fn(demo_session)))
            .router();

        let response = router.oneshot(req).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_query_values_are_escaped_in_markup() {
        let uri = format!(
            "/simple/1?b=%3Cscript%3Ealert(1)%3C%2Fscript%3E&c={}",
            Uuid::new_v4()
        );
        let body = fetch(Request::builder().uri(uri).body(Body::empty()).unwrap()).await;

        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[tokio::test]
    async fn test_session_values_are_escaped_in_hidden_fields() {
        let req = Request::builder()
            .uri("/edit/user/1")
            .header("x-demo-user", r#"a"><b"#)
            .body(Body::empty())
            .unwrap();
        let body = fetch(req).await;

        assert!(body.contains(r#"name="_csrf" value="demo-a&quot;&gt;&lt;b""#));
        assert!(!body.contains(r#"demo-a"><b"#));
    }
}
