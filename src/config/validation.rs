//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the shape of the mount prefix and stylesheet URL template
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::AppConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("routing.mount_prefix `{0}` must be empty or start with '/' and not end with '/'")]
    MountPrefix(String),

    #[error("css.class_prefix `{0}` is not a valid CSS identifier")]
    ClassPrefix(String),

    #[error("css.url_template `{0}` must start with '/' and contain `{{hash}}` once as a whole path segment")]
    UrlTemplate(String),

    #[error("timeouts.request_secs must be greater than zero")]
    RequestTimeout,

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),
}

/// Validate an already-deserialized configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mount = &config.routing.mount_prefix;
    if !mount.is_empty() && (!mount.starts_with('/') || mount.ends_with('/')) {
        errors.push(ValidationError::MountPrefix(mount.clone()));
    }

    if !is_css_identifier(&config.css.class_prefix) {
        errors.push(ValidationError::ClassPrefix(config.css.class_prefix.clone()));
    }

    if !is_url_template(&config.css.url_template) {
        errors.push(ValidationError::UrlTemplate(config.css.url_template.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }

    let metrics_address = &config.observability.metrics_address;
    if config.observability.metrics_enabled && metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::MetricsAddress(metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_css_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '-' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn is_url_template(s: &str) -> bool {
    s.starts_with('/')
        && s.matches("{hash}").count() == 1
        && s.split('/').any(|segment| segment == "{hash}")
}
