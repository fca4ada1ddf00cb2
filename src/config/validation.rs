//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, capacity > 0)
//! - Check that addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ViewerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::ViewerConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a parsed configuration.
pub fn validate_config(config: &ViewerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_socket_addr(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if let Some(tls) = &config.listener.tls {
        check_socket_addr(&mut errors, "listener.tls.bind_address", &tls.bind_address);
        if tls.cert_path.trim().is_empty() {
            errors.push(ValidationError::new("listener.tls.cert_path", "must not be empty"));
        }
        if tls.key_path.trim().is_empty() {
            errors.push(ValidationError::new("listener.tls.key_path", "must not be empty"));
        }
    }

    match Url::parse(&config.proxy.origin) {
        Ok(origin) => {
            if !matches!(origin.scheme(), "http" | "https") {
                errors.push(ValidationError::new("proxy.origin", "scheme must be http or https"));
            }
            if !config.proxy.origin.ends_with('/') {
                errors.push(ValidationError::new("proxy.origin", "must end with '/'"));
            }
            if origin.query().is_some() || origin.fragment().is_some() {
                errors.push(ValidationError::new(
                    "proxy.origin",
                    "must not carry a query or fragment",
                ));
            }
        }
        Err(e) => errors.push(ValidationError::new("proxy.origin", e.to_string())),
    }
    if config.proxy.max_in_flight == 0 {
        errors.push(ValidationError::new("proxy.max_in_flight", "must be greater than 0"));
    }
    for (field, secs) in [
        ("proxy.request_timeout_secs", config.proxy.request_timeout_secs),
        ("proxy.upstream_timeout_secs", config.proxy.upstream_timeout_secs),
        ("proxy.connect_timeout_secs", config.proxy.connect_timeout_secs),
        ("items.timeout_secs", config.items.timeout_secs),
    ] {
        if secs == 0 {
            errors.push(ValidationError::new(field, "must be greater than 0"));
        }
    }

    if let Err(e) = Url::parse(&config.items.lookup_url) {
        errors.push(ValidationError::new("items.lookup_url", e.to_string()));
    }

    if config.observability.metrics_enabled {
        check_socket_addr(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_socket_addr(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if let Err(e) = value.parse::<SocketAddr>() {
        errors.push(ValidationError::new(field, format!("invalid address {value:?}: {e}")));
    }
}
