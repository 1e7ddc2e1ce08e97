//! Route registry: discovery, validation and the immutable binding table.
//!
//! # Responsibilities
//! - Scan handler definitions from the container (registration order)
//! - Validate: one route parameter per handler, consistent HTTP methods,
//!   one handler per route type, resolvable access predicates
//! - Detect dispatch patterns that would collide in the router
//! - Serve lookups by route type (resolver) and by handler id (interceptor)
//!
//! # Design Decisions
//! - Built once at startup, single-threaded, fail-fast on the first violation
//! - Immutable after construction (shared via `Arc` without locks)
//! - Bindings keep registration order so installation and logs are deterministic

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::container::Container;
use crate::routing::error::RouteError;
use crate::routing::handler::{Endpoint, HandlerDef, HandlerParam};
use crate::routing::metadata::RouteMetadata;
use crate::routing::route::{Capabilities, Capability, Route, RouteDescriptor};
use crate::security::access_control::AccessPredicate;

/// Validated association of a route type with its handler.
pub struct RouteBinding {
    route: &'static str,
    type_id: TypeId,
    methods: Vec<Method>,
    capabilities: Capabilities,
    metadata: RouteMetadata,
    pattern: String,
    handler: &'static str,
    access: Option<Arc<dyn AccessPredicate>>,
    endpoint: Endpoint,
}

impl RouteBinding {
    /// Route type name.
    pub fn route(&self) -> &'static str {
        self.route
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// GET first, then the mutating method if any.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn is_readable(&self) -> bool {
        self.capabilities.contains(Capability::Get)
    }

    pub fn metadata(&self) -> &RouteMetadata {
        &self.metadata
    }

    /// Dispatch pattern with `{field}` placeholders.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn handler(&self) -> &'static str {
        self.handler
    }

    pub fn access(&self) -> Option<&Arc<dyn AccessPredicate>> {
        self.access.as_ref()
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl fmt::Debug for RouteBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteBinding")
            .field("route", &self.route)
            .field("methods", &self.methods)
            .field("pattern", &self.pattern)
            .field("handler", &self.handler)
            .field("access", &self.access.is_some())
            .finish()
    }
}

/// All bindings of the process.
#[derive(Default)]
pub struct RouteRegistry {
    bindings: Vec<Arc<RouteBinding>>,
    by_type: HashMap<TypeId, usize>,
    by_handler: HashMap<&'static str, usize>,
}

impl fmt::Debug for RouteRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRegistry")
            .field("bindings", &self.bindings)
            .finish()
    }
}

impl RouteRegistry {
    /// Scan and validate every handler of `container`.
    pub fn build(container: &Container, mount_prefix: &str) -> Result<Self, RouteError> {
        let mut registry = Self::default();

        for handler in container.handlers() {
            let binding = bind(handler, container, mount_prefix)?;

            if let Some(&existing) = registry.by_type.get(&binding.type_id) {
                return Err(RouteError::DuplicateRoute {
                    route: binding.route,
                    first: registry.bindings[existing].handler,
                    second: binding.handler,
                });
            }
            if registry.by_handler.contains_key(binding.handler) {
                return Err(RouteError::DuplicateHandler {
                    handler: binding.handler,
                });
            }

            tracing::info!(
                route = binding.route,
                handler = binding.handler,
                methods = ?binding.methods,
                pattern = %binding.pattern,
                "Route bound"
            );

            let index = registry.bindings.len();
            registry.by_type.insert(binding.type_id, index);
            registry.by_handler.insert(binding.handler, index);
            registry.bindings.push(Arc::new(binding));
        }

        registry.check_patterns()?;

        tracing::info!(routes = registry.bindings.len(), "Route registry ready");
        Ok(registry)
    }

    /// Two bindings collide when their patterns only differ by placeholder
    /// names, or when they share a pattern and a method.
    fn check_patterns(&self) -> Result<(), RouteError> {
        let mut seen: HashMap<String, Vec<&RouteBinding>> = HashMap::new();

        for binding in &self.bindings {
            let shape = pattern_shape(&binding.pattern);
            let group = seen.entry(shape).or_default();
            for other in group.iter() {
                let overlapping = binding.methods.iter().any(|m| other.methods.contains(m));
                if other.pattern != binding.pattern || overlapping {
                    return Err(RouteError::PatternConflict {
                        pattern: binding.pattern.clone(),
                        first: other.route,
                        second: binding.route,
                    });
                }
            }
            group.push(binding);
        }
        Ok(())
    }

    /// Bindings in registration order.
    pub fn bindings(&self) -> &[Arc<RouteBinding>] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn binding<R: Route>(&self) -> Option<&Arc<RouteBinding>> {
        self.binding_by_type(TypeId::of::<R>())
    }

    pub fn binding_by_type(&self, type_id: TypeId) -> Option<&Arc<RouteBinding>> {
        self.by_type.get(&type_id).map(|&i| &self.bindings[i])
    }

    /// Lookup used by the access interceptor.
    pub fn binding_for_handler(&self, handler: &str) -> Option<&Arc<RouteBinding>> {
        self.by_handler.get(handler).map(|&i| &self.bindings[i])
    }
}

fn bind(
    handler: &HandlerDef,
    container: &Container,
    mount_prefix: &str,
) -> Result<RouteBinding, RouteError> {
    let descriptor = route_parameter(handler)?;
    let schema = (descriptor.schema)();
    let methods = methods_for(schema.name, schema.capabilities)?;
    let metadata = RouteMetadata::extract(&schema, mount_prefix);

    let access = match schema.access {
        Some(name) => Some(container.predicate(name).ok_or(
            RouteError::MissingAccessPredicate {
                route: schema.name,
                predicate: name,
            },
        )?),
        None => None,
    };

    Ok(RouteBinding {
        route: schema.name,
        type_id: descriptor.type_id,
        methods,
        capabilities: schema.capabilities,
        pattern: metadata.url_pattern(),
        metadata,
        handler: handler.id(),
        access,
        endpoint: handler.endpoint().clone(),
    })
}

fn route_parameter(handler: &HandlerDef) -> Result<RouteDescriptor, RouteError> {
    let routes: Vec<&RouteDescriptor> = handler
        .params()
        .iter()
        .filter_map(|p| match p {
            HandlerParam::Route(descriptor) => Some(descriptor),
            HandlerParam::Other(_) => None,
        })
        .collect();

    match routes.as_slice() {
        [] => Err(RouteError::MissingRouteParameter {
            handler: handler.id(),
        }),
        [descriptor] => Ok(**descriptor),
        _ => Err(RouteError::MultipleRouteParameters {
            handler: handler.id(),
            count: routes.len(),
        }),
    }
}

/// GET may combine with at most one of POST, PUT, DELETE.
pub(crate) fn methods_for(
    route: &'static str,
    capabilities: Capabilities,
) -> Result<Vec<Method>, RouteError> {
    let writes: Vec<Method> = [
        (Capability::Post, Method::POST),
        (Capability::Put, Method::PUT),
        (Capability::Delete, Method::DELETE),
    ]
    .into_iter()
    .filter(|(capability, _)| capabilities.contains(*capability))
    .map(|(_, method)| method)
    .collect();

    let readable = capabilities.contains(Capability::Get);
    if writes.len() > 1 || (writes.is_empty() && !readable) {
        return Err(RouteError::InvalidMethods { route });
    }

    let mut methods = Vec::with_capacity(2);
    if readable {
        methods.push(Method::GET);
    }
    methods.extend(writes);
    Ok(methods)
}

/// Pattern with placeholder names erased: `/a/{id}` → `/a/{}`.
pub(crate) fn pattern_shape(pattern: &str) -> String {
    pattern
        .split('/')
        .map(|segment| {
            if segment.starts_with('{') && segment.ends_with('}') {
                "{}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::params::{ParamError, RouteParams};
    use crate::routing::route::{FieldValue, RouteSchema};
    use crate::security::access_control::{predicate_fn, Denial};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    macro_rules! test_route {
        ($name:ident, $schema:expr) => {
            struct $name;

            impl Route for $name {
                fn schema() -> RouteSchema {
                    $schema
                }

                fn fields(&self) -> Vec<(&'static str, FieldValue)> {
                    Vec::new()
                }

                fn from_params(_: &RouteParams) -> Result<Self, ParamError> {
                    Ok($name)
                }
            }
        };
    }

    test_route!(PageRoute, RouteSchema::of::<PageRoute>().capability(Capability::Get).path("id"));
    test_route!(
        EditRoute,
        RouteSchema::of::<EditRoute>().capabilities([Capability::Get, Capability::Post, Capability::Csrf])
    );
    test_route!(
        BrokenRoute,
        RouteSchema::of::<BrokenRoute>().capabilities([Capability::Post, Capability::Delete])
    );
    test_route!(CsrfOnlyRoute, RouteSchema::of::<CsrfOnlyRoute>().capability(Capability::Csrf));
    test_route!(
        GuardedRoute,
        RouteSchema::of::<GuardedRoute>().capability(Capability::Get).access("admin")
    );
    test_route!(
        ItemRoute,
        RouteSchema::of::<ItemRoute>().prefix("/page").capability(Capability::Get).path("key")
    );

    fn ok_handler<R: Route>(id: &'static str) -> HandlerDef {
        HandlerDef::for_route(id, |_: R, _| async { "ok" })
    }

    #[test]
    fn test_build_registers_bindings() {
        let container = Container::new()
            .with_handler(ok_handler::<PageRoute>("page"))
            .with_handler(ok_handler::<EditRoute>("edit"));

        let registry = RouteRegistry::build(&container, "").unwrap();
        assert_eq!(registry.len(), 2);

        let page = registry.binding::<PageRoute>().unwrap();
        assert_eq!(page.methods(), &[Method::GET]);
        assert_eq!(page.pattern(), "/page/{id}");
        assert_eq!(page.handler(), "page");

        let edit = registry.binding_for_handler("edit").unwrap();
        assert_eq!(edit.route(), "EditRoute");
        assert_eq!(edit.methods(), &[Method::GET, Method::POST]);
    }

    #[test]
    fn test_duplicate_route_fails() {
        let container = Container::new()
            .with_handler(ok_handler::<PageRoute>("first"))
            .with_handler(ok_handler::<PageRoute>("second"));

        let err = RouteRegistry::build(&container, "").unwrap_err();
        assert_eq!(
            err,
            RouteError::DuplicateRoute {
                route: "PageRoute",
                first: "first",
                second: "second"
            }
        );
        assert!(err.to_string().contains("should be handled by one method only"));
    }

    #[test]
    fn test_two_mutating_methods_fail() {
        let container = Container::new().with_handler(ok_handler::<BrokenRoute>("broken"));
        let err = RouteRegistry::build(&container, "").unwrap_err();
        assert_eq!(err, RouteError::InvalidMethods { route: "BrokenRoute" });
        assert!(err.to_string().contains("GET, GET/POST, GET/PUT or GET/DELETE"));
    }

    #[test]
    fn test_route_without_method_fails() {
        let container = Container::new().with_handler(ok_handler::<CsrfOnlyRoute>("csrf"));
        assert!(matches!(
            RouteRegistry::build(&container, ""),
            Err(RouteError::InvalidMethods { .. })
        ));
    }

    #[test]
    fn test_route_parameter_count() {
        let none = Container::new().with_handler(
            HandlerDef::raw("nothing", |_| async { StatusCode::OK.into_response() })
                .with_param("Session"),
        );
        assert_eq!(
            RouteRegistry::build(&none, "").unwrap_err(),
            RouteError::MissingRouteParameter { handler: "nothing" }
        );

        let two = Container::new().with_handler(
            HandlerDef::raw("both", |_| async { StatusCode::OK.into_response() })
                .with_route::<PageRoute>()
                .with_param("Session")
                .with_route::<EditRoute>(),
        );
        assert_eq!(
            RouteRegistry::build(&two, "").unwrap_err(),
            RouteError::MultipleRouteParameters {
                handler: "both",
                count: 2
            }
        );
    }

    #[test]
    fn test_access_predicate_resolution() {
        let missing = Container::new().with_handler(ok_handler::<GuardedRoute>("guarded"));
        assert_eq!(
            RouteRegistry::build(&missing, "").unwrap_err(),
            RouteError::MissingAccessPredicate {
                route: "GuardedRoute",
                predicate: "admin"
            }
        );

        let present = Container::new()
            .with_predicate(
                "admin",
                predicate_fn(|_| Some(Denial::new(StatusCode::FORBIDDEN, "no"))),
            )
            .with_handler(ok_handler::<GuardedRoute>("guarded"));
        let registry = RouteRegistry::build(&present, "").unwrap();
        assert!(registry.binding::<GuardedRoute>().unwrap().access().is_some());
    }

    #[test]
    fn test_pattern_conflict() {
        // `/page/{key}` and `/page/{id}` differ only by placeholder name
        let container = Container::new()
            .with_handler(ok_handler::<PageRoute>("page"))
            .with_handler(ok_handler::<ItemRoute>("item"));

        assert_eq!(
            RouteRegistry::build(&container, "").unwrap_err(),
            RouteError::PatternConflict {
                pattern: "/page/{key}".into(),
                first: "PageRoute",
                second: "ItemRoute"
            }
        );
    }

    #[test]
    fn test_duplicate_handler_id() {
        let container = Container::new()
            .with_handler(ok_handler::<PageRoute>("same"))
            .with_handler(ok_handler::<EditRoute>("same"));
        assert_eq!(
            RouteRegistry::build(&container, "").unwrap_err(),
            RouteError::DuplicateHandler { handler: "same" }
        );
    }

    #[test]
    fn test_mount_prefix_applies_to_patterns() {
        let container = Container::new().with_handler(ok_handler::<PageRoute>("page"));
        let registry = RouteRegistry::build(&container, "/app").unwrap();
        assert_eq!(registry.bindings()[0].pattern(), "/app/page/{id}");
    }

    #[test]
    fn test_pattern_shape() {
        assert_eq!(pattern_shape("/a/{id}/b/{x}"), "/a/{}/b/{}");
        assert_eq!(pattern_shape("/"), "/");
    }
}
