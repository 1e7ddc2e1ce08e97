//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Route binding settings.
    pub routing: RoutingConfig,

    /// Generated stylesheet settings.
    pub css: CssConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Route binding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Shared mount prefix prepended to every route path (e.g., "/app").
    /// Empty means routes are mounted at the root.
    pub mount_prefix: String,

    /// Maximum size of an urlencoded form body read for mutating routes.
    pub max_form_bytes: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            mount_prefix: String::new(),
            max_form_bytes: 1024 * 1024,
        }
    }
}

/// Generated stylesheet configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CssConfig {
    /// Prefix of generated class names (`<prefix>-0`, `<prefix>-1`, ...).
    pub class_prefix: String,

    /// URL the stylesheet is served at. Must contain `{hash}` as one path segment.
    pub url_template: String,

    /// Rebuild the stylesheet on every request instead of caching it.
    pub live_reload: bool,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            class_prefix: "gossr".to_string(),
            url_template: "/assets/{hash}/style.css".to_string(),
            live_reload: false,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
