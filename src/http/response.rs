//! Error responses.
//!
//! Proxy failures that happen before the upstream status is committed are
//! turned into a plain-text response with the status from
//! [`ProxyError::status_code`]. Internal details stay in the logs.

use axum::{
    http::{header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue},
    response::{IntoResponse, Response},
};

use crate::proxy::ProxyError;

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let mut response = (self.status_code(), self.public_message()).into_response();
        response
            .headers_mut()
            .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        response
    }
}
