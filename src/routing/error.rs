//! Route binding and resolution errors.

/// Startup configuration errors and link/form resolution errors.
///
/// Every variant raised by [`RouteRegistry::build`](crate::routing::RouteRegistry::build)
/// is fatal: the process must not start serving with a broken route map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("handler `{handler}` declares no route parameter")]
    MissingRouteParameter { handler: &'static str },

    #[error("handler `{handler}` declares {count} route parameters, expected exactly one")]
    MultipleRouteParameters { handler: &'static str, count: usize },

    #[error("route `{route}` should be GET, GET/POST, GET/PUT or GET/DELETE")]
    InvalidMethods { route: &'static str },

    #[error("route `{route}` should be handled by one method only (`{first}` and `{second}`)")]
    DuplicateRoute {
        route: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("handler id `{handler}` is registered twice")]
    DuplicateHandler { handler: &'static str },

    #[error("access predicate `{predicate}` of route `{route}` is not registered")]
    MissingAccessPredicate {
        route: &'static str,
        predicate: &'static str,
    },

    #[error("`{first}` and `{second}` conflict on `{pattern}`")]
    PatternConflict {
        pattern: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("route `{route}` is not registered")]
    NotRegistered { route: &'static str },

    #[error("route `{route}` is not readable via GET")]
    NotReadable { route: &'static str },

    #[error("path field `{field}` of route `{route}` must hold exactly one value")]
    InvalidPathField {
        route: &'static str,
        field: &'static str,
    },

    #[error("route `{route}` requires an anti-forgery token but the session has none")]
    MissingCsrf { route: &'static str },
}
