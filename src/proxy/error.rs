//! Proxy error taxonomy.

use axum::http::{Method, StatusCode};
use thiserror::Error;

use crate::proxy::decode::ContentEncoding;
use crate::proxy::gate::GateError;

/// Everything that can end a proxied request early.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Only GET is proxied.
    #[error("method {0} not allowed")]
    MethodNotAllowed(Method),

    /// The path suffix does not form a URL under the origin prefix.
    #[error("invalid upstream path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// No upstream slot freed up before the request deadline.
    #[error("timed out waiting for an upstream slot")]
    AdmissionTimeout,

    /// The gate was closed for shutdown.
    #[error("proxy is shutting down")]
    ShuttingDown,

    /// Network, DNS or protocol failure talking to the origin.
    #[error("upstream request failed: {0}")]
    Upstream(#[source] reqwest::Error),

    /// The request deadline passed during the call or the body relay.
    #[error("upstream request exceeded its deadline")]
    DeadlineExceeded,

    /// The upstream body could not be decoded.
    #[error("failed to decode {encoding} upstream body: {source}")]
    Decode {
        encoding: ContentEncoding,
        #[source]
        source: std::io::Error,
    },
}

impl ProxyError {
    /// Status reported to the client when the error happens before the
    /// response status is committed.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::InvalidPath { .. } => StatusCode::BAD_REQUEST,
            ProxyError::AdmissionTimeout | ProxyError::DeadlineExceeded => {
                StatusCode::GATEWAY_TIMEOUT
            }
            ProxyError::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
            ProxyError::Upstream(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::Upstream(_) | ProxyError::Decode { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short client-facing message; internal details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            ProxyError::MethodNotAllowed(_) => "Method not allowed",
            ProxyError::InvalidPath { .. } => "Invalid proxy path",
            ProxyError::AdmissionTimeout => "Timed out waiting for upstream capacity",
            ProxyError::ShuttingDown => "Proxy is shutting down",
            ProxyError::Upstream(_) => "Error fetching data from external API",
            ProxyError::DeadlineExceeded => "Upstream request timed out",
            ProxyError::Decode { .. } => "Error decoding upstream response",
        }
    }

    /// Whether this is the client's fault rather than the upstream's.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl From<GateError> for ProxyError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::Timeout => ProxyError::AdmissionTimeout,
            GateError::Closed => ProxyError::ShuttingDown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_input_errors_are_4xx() {
        let err = ProxyError::MethodNotAllowed(Method::POST);
        assert_eq!(err.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(err.is_client_error());

        let err = ProxyError::InvalidPath {
            path: "../x".into(),
            reason: "escapes origin".into(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_side_errors_are_5xx() {
        let decode = ProxyError::Decode {
            encoding: ContentEncoding::Gzip,
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "bad header"),
        };
        assert_eq!(decode.status_code(), StatusCode::BAD_GATEWAY);
        assert!(decode.to_string().contains("gzip"));
        assert_eq!(
            ProxyError::DeadlineExceeded.status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert!(!ProxyError::DeadlineExceeded.is_client_error());
    }

    #[test]
    fn gate_errors_convert() {
        assert!(matches!(
            ProxyError::from(GateError::Timeout),
            ProxyError::AdmissionTimeout
        ));
        assert_eq!(
            ProxyError::from(GateError::Closed).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
