//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the viewer.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the model viewer front end.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ViewerConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Asset proxy settings.
    pub proxy: ProxyConfig,

    /// Page and static asset settings.
    pub site: SiteConfig,

    /// Item display ID lookup settings.
    pub items: ItemLookupConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Plain HTTP bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional HTTPS listener, served alongside the plain one.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the HTTPS listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// HTTPS bind address.
    #[serde(default = "default_tls_bind")]
    pub bind_address: String,

    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

fn default_tls_bind() -> String {
    "0.0.0.0:443".to_string()
}

/// Asset proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Upstream origin prefix; the inbound path suffix is appended verbatim.
    pub origin: String,

    /// Maximum simultaneous upstream calls.
    pub max_in_flight: usize,

    /// Overall deadline per proxied request, measured from acceptance.
    pub request_timeout_secs: u64,

    /// Deadline for a single upstream call, measured from when it starts.
    pub upstream_timeout_secs: u64,

    /// Upstream connection establishment timeout.
    pub connect_timeout_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            origin: "https://wow.zamimg.com/modelviewer/live/".to_string(),
            max_in_flight: 10,
            request_timeout_secs: 10,
            upstream_timeout_secs: 10,
            connect_timeout_secs: 5,
        }
    }
}

/// Page rendering and static file configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory served under `/static/`.
    pub static_dir: String,

    /// Region rendered into the index page when the request names none.
    pub default_region: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            static_dir: "static".to_string(),
            default_region: None,
        }
    }
}

/// Item display ID lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ItemLookupConfig {
    /// Base URL of the XML item endpoint; `?item=<id>&xml` is appended.
    pub lookup_url: String,

    /// Timeout for one lookup request in seconds.
    pub timeout_secs: u64,
}

impl Default for ItemLookupConfig {
    fn default() -> Self {
        Self {
            lookup_url: "http://www.wowhead.com/".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output for development.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing filter directive, overridden by `RUST_LOG`.
    pub log_filter: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "model_viewer=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
