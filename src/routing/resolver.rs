//! URL resolution: route value → concrete URL.
//!
//! # Encoding
//! - Path segments: percent-encoded, only RFC 3986 unreserved characters kept
//! - Query pairs: `application/x-www-form-urlencoded` (space becomes `+`)
//! - Collection fields repeat their key once per element, in order
//! - Null scalars and empty collections emit nothing

use std::collections::HashMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::form_urlencoded::byte_serialize;

use crate::routing::error::RouteError;
use crate::routing::metadata::join_segment;
use crate::routing::registry::{RouteBinding, RouteRegistry};
use crate::routing::route::{FieldValue, Route};

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

impl RouteRegistry {
    /// Path prefix followed by each path field value.
    pub fn resolve_path<R: Route>(&self, route: &R) -> Result<String, RouteError> {
        let binding = self.binding::<R>().ok_or(RouteError::NotRegistered {
            route: R::schema().name(),
        })?;
        resolve_path(binding, &route.fields())
    }

    /// Path plus query string. Only for routes readable via GET.
    pub fn resolve_url<R: Route>(&self, route: &R) -> Result<String, RouteError> {
        let binding = self.binding::<R>().ok_or(RouteError::NotRegistered {
            route: R::schema().name(),
        })?;
        if !binding.is_readable() {
            return Err(RouteError::NotReadable {
                route: binding.route(),
            });
        }
        resolve_url(binding, &route.fields())
    }
}

/// Resolve the path of a binding from already-extracted field values.
pub fn resolve_path(
    binding: &RouteBinding,
    fields: &[(&'static str, FieldValue)],
) -> Result<String, RouteError> {
    let values: HashMap<&str, &FieldValue> = fields.iter().map(|(k, v)| (*k, v)).collect();
    let metadata = binding.metadata();

    let mut path = metadata.path_prefix.clone();
    for &field in &metadata.path_fields {
        match values.get(field) {
            Some(FieldValue::Scalar(value)) => {
                let segment = utf8_percent_encode(value, PATH_SEGMENT).to_string();
                path = join_segment(&path, &segment);
            }
            _ => {
                return Err(RouteError::InvalidPathField {
                    route: binding.route(),
                    field,
                })
            }
        }
    }
    Ok(path)
}

/// Resolve path and query string of a binding from extracted field values.
pub fn resolve_url(
    binding: &RouteBinding,
    fields: &[(&'static str, FieldValue)],
) -> Result<String, RouteError> {
    let mut url = resolve_path(binding, fields)?;
    let values: HashMap<&str, &FieldValue> = fields.iter().map(|(k, v)| (*k, v)).collect();

    let mut separator = '?';
    let mut push = |out: &mut String, name: &str, value: &str| {
        out.push(separator);
        out.extend(byte_serialize(name.as_bytes()));
        out.push('=');
        out.extend(byte_serialize(value.as_bytes()));
        separator = '&';
    };

    for &field in &binding.metadata().query_fields {
        match values.get(field) {
            Some(FieldValue::Scalar(value)) => push(&mut url, field, value),
            Some(FieldValue::List(items)) => {
                for item in items {
                    push(&mut url, field, item);
                }
            }
            Some(FieldValue::Null) | None => {}
        }
    }
    Ok(url)
}
