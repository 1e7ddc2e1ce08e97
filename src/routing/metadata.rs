//! Route metadata extraction.
//!
//! # Responsibilities
//! - Derive the path prefix of a route type (explicit or from its name)
//! - Partition fields into ordered path fields and query fields
//! - Report which query fields a submitted form must carry
//!
//! # Design Decisions
//! - Works on the type-level schema only, never on a live route value
//! - Pure function: no errors at this stage; the registry validates

use crate::routing::route::{FieldRole, RouteSchema};

/// Binding-relevant layout of a route type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMetadata {
    pub path_prefix: String,
    pub path_fields: Vec<&'static str>,
    pub query_fields: Vec<&'static str>,
    pub required_query_fields: Vec<&'static str>,
}

impl RouteMetadata {
    /// Extract the layout of `schema`, mounting it under `mount_prefix`.
    pub fn extract(schema: &RouteSchema, mount_prefix: &str) -> Self {
        let own_prefix = match &schema.prefix {
            Some(explicit) => normalize_prefix(explicit),
            None => derive_prefix(schema.name),
        };
        let path_prefix = mount(mount_prefix, &own_prefix);

        let mut path: Vec<_> = schema
            .fields
            .iter()
            .filter(|f| f.role == FieldRole::Path)
            .collect();
        // stable: equal positions keep declaration order
        path.sort_by_key(|f| f.position);

        let query: Vec<_> = schema
            .fields
            .iter()
            .filter(|f| f.role == FieldRole::Query)
            .collect();

        let required_query_fields = query
            .iter()
            .filter(|f| f.force_present || (!f.optional && !f.has_default))
            .map(|f| f.name)
            .collect();

        Self {
            path_prefix,
            path_fields: path.into_iter().map(|f| f.name).collect(),
            query_fields: query.into_iter().map(|f| f.name).collect(),
            required_query_fields,
        }
    }

    /// Dispatch pattern: the prefix followed by one `{field}` segment per path field.
    pub fn url_pattern(&self) -> String {
        self.path_fields
            .iter()
            .fold(self.path_prefix.clone(), |acc, field| {
                join_segment(&acc, &format!("{{{field}}}"))
            })
    }
}

/// Derive a prefix from a type name: `ShowUserRoute` → `/show/user`.
///
/// Words start at a capital following a lowercase letter or digit, or at the
/// last capital of a run followed by lowercase (`HTTPRoute` → `/http`).
pub fn derive_prefix(type_name: &str) -> String {
    let chars: Vec<char> = type_name.chars().collect();
    let mut path = String::with_capacity(type_name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        let boundary = i == 0
            || (c.is_uppercase()
                && (!chars[i - 1].is_uppercase()
                    || chars.get(i + 1).is_some_and(|next| next.is_lowercase())));
        if boundary {
            path.push('/');
        }
        path.extend(c.to_lowercase());
    }

    let path = path.strip_suffix("/route").unwrap_or(&path);
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

/// Append one path segment, avoiding a doubled slash after the root.
pub(crate) fn join_segment(prefix: &str, segment: &str) -> String {
    if prefix.ends_with('/') {
        format!("{prefix}{segment}")
    } else {
        format!("{prefix}/{segment}")
    }
}

fn normalize_prefix(explicit: &str) -> String {
    let trimmed = explicit.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn mount(mount_prefix: &str, path: &str) -> String {
    match (mount_prefix.is_empty(), path) {
        (true, _) => path.to_string(),
        (false, "/") => mount_prefix.to_string(),
        (false, _) => format!("{mount_prefix}{path}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::route::Capability;

    #[test]
    fn test_derive_prefix() {
        assert_eq!(derive_prefix("SimpleRoute"), "/simple");
        assert_eq!(derive_prefix("ShowUserProfileRoute"), "/show/user/profile");
        assert_eq!(derive_prefix("Dashboard"), "/dashboard");
        assert_eq!(derive_prefix("Route"), "/");
        assert_eq!(derive_prefix("RouteList"), "/route/list");
    }

    #[test]
    fn test_derive_prefix_keeps_acronyms_together() {
        assert_eq!(derive_prefix("HTTPRoute"), "/http");
        assert_eq!(derive_prefix("XMLHttpRoute"), "/xml/http");
        assert_eq!(derive_prefix("ShowAPIKeysRoute"), "/show/api/keys");
        assert_eq!(derive_prefix("Page2Route"), "/page2");
    }

    #[test]
    fn test_mount_prefix() {
        let schema = RouteSchema::named("SimpleRoute").capability(Capability::Get);
        assert_eq!(RouteMetadata::extract(&schema, "/app").path_prefix, "/app/simple");

        let root = RouteSchema::named("Route");
        assert_eq!(RouteMetadata::extract(&root, "/app").path_prefix, "/app");
        assert_eq!(RouteMetadata::extract(&root, "").path_prefix, "/");
    }

    #[test]
    fn test_explicit_prefix() {
        let schema = RouteSchema::named("Whatever").prefix("users/");
        assert_eq!(RouteMetadata::extract(&schema, "").path_prefix, "/users");
        assert_eq!(RouteMetadata::extract(&schema, "/app").path_prefix, "/app/users");
    }

    #[test]
    fn test_path_fields_follow_canonical_order() {
        let schema = RouteSchema::named("ItemRoute")
            .query("q")
            .path("item")
            .position(2)
            .path("shop")
            .position(1)
            .path("tab")
            .position(2);

        let meta = RouteMetadata::extract(&schema, "");
        assert_eq!(meta.path_fields, vec!["shop", "item", "tab"]);
        assert_eq!(meta.query_fields, vec!["q"]);
        assert_eq!(meta.url_pattern(), "/item/{shop}/{item}/{tab}");
    }

    #[test]
    fn test_required_query_fields() {
        let schema = RouteSchema::named("SaveRoute")
            .query("title")
            .optional("note")
            .defaulted("count")
            .optional("agree")
            .present();

        let meta = RouteMetadata::extract(&schema, "");
        assert_eq!(meta.required_query_fields, vec!["title", "agree"]);
    }

    #[test]
    fn test_root_pattern_has_single_slash() {
        let schema = RouteSchema::named("Route").path("id");
        assert_eq!(RouteMetadata::extract(&schema, "").url_pattern(), "/{id}");
    }
}
