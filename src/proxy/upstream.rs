//! Outbound calls to the asset origin.
//!
//! # Responsibilities
//! - Build the upstream URL from the fixed origin prefix and the path suffix
//! - Copy inbound headers, force `Accept: application/json`
//! - Issue exactly one GET per request, bounded by a per-call timeout

use std::time::Duration;

use axum::http::{
    header::{ACCEPT, CONTENT_LENGTH, HOST, TRAILER, TRANSFER_ENCODING},
    HeaderMap, HeaderName, HeaderValue,
};
use url::Url;

use crate::config::ProxyConfig;
use crate::proxy::error::ProxyError;
use crate::resilience::Deadline;

/// Headers the HTTP client writes itself; inbound values are not copied.
const CLIENT_OWNED_HEADERS: [HeaderName; 4] = [HOST, CONTENT_LENGTH, TRANSFER_ENCODING, TRAILER];

/// A fully built request for the origin.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub url: Url,
    pub headers: HeaderMap,
}

/// Reusable client bound to one origin.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    origin: String,
}

impl UpstreamClient {
    pub fn new(config: &ProxyConfig) -> Result<Self, reqwest::Error> {
        // Compression is the relay's job; keep the client from negotiating or
        // decoding it on its own.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .no_gzip()
            .no_deflate()
            .no_brotli()
            .build()?;

        Ok(Self {
            client,
            origin: config.origin.clone(),
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Build the upstream request for an inbound path suffix.
    pub fn build_request(
        &self,
        suffix: &str,
        inbound: &HeaderMap,
    ) -> Result<UpstreamRequest, ProxyError> {
        let invalid = |reason: String| ProxyError::InvalidPath {
            path: suffix.to_string(),
            reason,
        };

        let url = Url::parse(&format!("{}{}", self.origin, suffix))
            .map_err(|e| invalid(e.to_string()))?;
        // Dot segments are resolved during parsing and could climb out of
        // the origin prefix.
        if !url.as_str().starts_with(&self.origin) {
            return Err(invalid("resolves outside the proxied origin".to_string()));
        }

        Ok(UpstreamRequest {
            url,
            headers: forwarded_headers(inbound),
        })
    }

    /// Perform the call. No retries; the first failure is returned.
    pub async fn call(
        &self,
        request: UpstreamRequest,
        deadline: Deadline,
    ) -> Result<reqwest::Response, ProxyError> {
        let send = self.client.get(request.url).headers(request.headers).send();
        deadline
            .run(send)
            .await
            .map_err(|_| ProxyError::DeadlineExceeded)?
            .map_err(ProxyError::Upstream)
    }
}

/// Copy every inbound header value in order, then force the JSON accept type.
pub fn forwarded_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.len() + 1);
    for (name, value) in inbound {
        if CLIENT_OWNED_HEADERS.contains(name) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{ACCEPT_ENCODING, COOKIE, USER_AGENT};

    fn client() -> UpstreamClient {
        UpstreamClient::new(&ProxyConfig {
            origin: "https://assets.example.com/modelviewer/live/".into(),
            ..ProxyConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn appends_suffix_to_origin() {
        let request = client()
            .build_request("meta/item/19019.json", &HeaderMap::new())
            .unwrap();
        assert_eq!(
            request.url.as_str(),
            "https://assets.example.com/modelviewer/live/meta/item/19019.json"
        );
    }

    #[test]
    fn empty_suffix_targets_origin() {
        let request = client().build_request("", &HeaderMap::new()).unwrap();
        assert_eq!(request.url.as_str(), "https://assets.example.com/modelviewer/live/");
    }

    #[test]
    fn rejects_suffix_escaping_origin() {
        let err = client()
            .build_request("../../admin", &HeaderMap::new())
            .unwrap_err();
        assert!(matches!(err, ProxyError::InvalidPath { .. }));

        let err = client()
            .build_request("%2e%2e/%2e%2e/admin", &HeaderMap::new())
            .unwrap_err();
        assert!(matches!(err, ProxyError::InvalidPath { .. }));
    }

    #[test]
    fn copies_multi_valued_headers_in_order() {
        let mut inbound = HeaderMap::new();
        inbound.append(COOKIE, HeaderValue::from_static("a=1"));
        inbound.append(COOKIE, HeaderValue::from_static("b=2"));
        inbound.insert(USER_AGENT, HeaderValue::from_static("viewer-test"));
        inbound.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate"));

        let headers = forwarded_headers(&inbound);
        let cookies: Vec<_> = headers.get_all(COOKIE).iter().collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);
        assert_eq!(headers[USER_AGENT], "viewer-test");
        assert_eq!(headers[ACCEPT_ENCODING], "gzip, deflate");
    }

    #[test]
    fn forces_json_accept() {
        let mut inbound = HeaderMap::new();
        inbound.append(ACCEPT, HeaderValue::from_static("text/html"));
        inbound.append(ACCEPT, HeaderValue::from_static("image/webp"));

        let headers = forwarded_headers(&inbound);
        let accept: Vec<_> = headers.get_all(ACCEPT).iter().collect();
        assert_eq!(accept, vec!["application/json"]);
    }

    #[test]
    fn skips_client_owned_headers() {
        let mut inbound = HeaderMap::new();
        inbound.insert(HOST, HeaderValue::from_static("viewer.local:8080"));
        inbound.insert(CONTENT_LENGTH, HeaderValue::from_static("0"));

        let headers = forwarded_headers(&inbound);
        assert!(headers.get(HOST).is_none());
        assert!(headers.get(CONTENT_LENGTH).is_none());
        assert_eq!(headers.len(), 1);
    }
}
