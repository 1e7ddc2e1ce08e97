//! Form targets: what a page needs to render a `<form>` aimed at a route.
//!
//! The HTML itself belongs to the rendering layer; this module only decides
//! action, method, encoding, the anti-forgery field and the field names a
//! submission must carry.

use axum::http::Method;

use crate::routing::error::RouteError;
use crate::routing::registry::RouteRegistry;
use crate::routing::route::{Capability, Route};
use crate::security::session::{CsrfPair, SessionState};

/// Receives hidden inputs from [`FormTarget::emit_hidden`].
pub trait HiddenFieldSink {
    fn hidden_field(&mut self, name: &str, value: &str);
}

impl HiddenFieldSink for Vec<(String, String)> {
    fn hidden_field(&mut self, name: &str, value: &str) {
        self.push((name.to_string(), value.to_string()));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormTarget {
    pub action: String,
    pub method: Method,
    pub multipart: bool,
    pub csrf: Option<CsrfPair>,
    pub required_fields: Vec<&'static str>,
}

impl FormTarget {
    pub fn for_route<R: Route>(
        registry: &RouteRegistry,
        route: &R,
        session: Option<&dyn SessionState>,
    ) -> Result<Self, RouteError> {
        let binding = registry.binding::<R>().ok_or(RouteError::NotRegistered {
            route: R::schema().name(),
        })?;

        let action = registry.resolve_path(route)?;
        // the mutating method wins over GET when both are bound
        let method = binding
            .methods()
            .last()
            .cloned()
            .unwrap_or(Method::GET);

        let capabilities = binding.capabilities();
        let csrf = if capabilities.contains(Capability::Csrf) {
            let pair = session
                .and_then(|s| s.csrf_pair())
                .ok_or(RouteError::MissingCsrf {
                    route: binding.route(),
                })?;
            Some(pair)
        } else {
            None
        };

        Ok(Self {
            action,
            method,
            multipart: capabilities.contains(Capability::Multipart),
            csrf,
            required_fields: binding.metadata().required_query_fields.clone(),
        })
    }

    pub fn enctype(&self) -> &'static str {
        if self.multipart {
            "multipart/form-data"
        } else {
            "application/x-www-form-urlencoded"
        }
    }

    /// Write the anti-forgery field, if the route wants one.
    pub fn emit_hidden(&self, sink: &mut impl HiddenFieldSink) {
        if let Some(pair) = &self.csrf {
            sink.hidden_field(&pair.field, &pair.token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;
    use crate::routing::handler::HandlerDef;
    use crate::routing::params::{ParamError, RouteParams};
    use crate::routing::route::{FieldValue, RouteSchema, ToFieldValue};

    struct UploadAvatarRoute {
        user: u64,
    }

    impl Route for UploadAvatarRoute {
        fn schema() -> RouteSchema {
            RouteSchema::of::<Self>()
                .capabilities([Capability::Get, Capability::Post, Capability::Csrf, Capability::Multipart])
                .path("user")
                .query("file")
                .optional("caption")
        }

        fn fields(&self) -> Vec<(&'static str, FieldValue)> {
            vec![("user", self.user.to_field())]
        }

        fn from_params(params: &RouteParams) -> Result<Self, ParamError> {
            Ok(Self {
                user: params.path("user")?,
            })
        }
    }

    struct FixedSession;

    impl SessionState for FixedSession {
        fn is_authenticated(&self) -> bool {
            true
        }

        fn csrf_pair(&self) -> Option<CsrfPair> {
            Some(CsrfPair::new("_csrf", "t0k3n"))
        }
    }

    fn registry() -> RouteRegistry {
        let container = Container::new().with_handler(HandlerDef::for_route(
            "upload",
            |_: UploadAvatarRoute, _| async { "" },
        ));
        RouteRegistry::build(&container, "").unwrap()
    }

    #[test]
    fn test_form_target() {
        let registry = registry();
        let session = FixedSession;
        let form = FormTarget::for_route(&registry, &UploadAvatarRoute { user: 7 }, Some(&session)).unwrap();

        assert_eq!(form.action, "/upload/avatar/7");
        assert_eq!(form.method, Method::POST);
        assert_eq!(form.enctype(), "multipart/form-data");
        assert_eq!(form.required_fields, vec!["file"]);

        let mut hidden = Vec::new();
        form.emit_hidden(&mut hidden);
        assert_eq!(hidden, vec![("_csrf".to_string(), "t0k3n".to_string())]);
    }

    #[test]
    fn test_csrf_route_without_session() {
        let registry = registry();
        assert_eq!(
            FormTarget::for_route(&registry, &UploadAvatarRoute { user: 7 }, None),
            Err(RouteError::MissingCsrf {
                route: "UploadAvatarRoute"
            })
        );
    }
}
