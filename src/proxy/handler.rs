//! Proxy request orchestration.
//!
//! ```text
//! Validating → Building → Admitting → Calling → RelayingHeaders → StreamingBody → Done
//!      └───────────┴───────────┴──────────┴──────────────┴──→ Failed(ProxyError)
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    response::{IntoResponse, Response},
};
use tokio::time::Instant;

use crate::config::ProxyConfig;
use crate::http::request::RequestIdExt;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::proxy::error::ProxyError;
use crate::proxy::gate::ConcurrencyGate;
use crate::proxy::relay::relay_response;
use crate::proxy::upstream::UpstreamClient;
use crate::resilience::Deadline;

/// Path prefix routed to the proxy; everything after it is the upstream suffix.
pub const ROUTE_PREFIX: &str = "/proxy/";

/// The asset proxy: one origin, one gate, one deadline policy.
#[derive(Debug)]
pub struct Proxy {
    gate: Arc<ConcurrencyGate>,
    upstream: UpstreamClient,
    request_timeout: Duration,
}

impl Proxy {
    pub fn new(config: &ProxyConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            gate: Arc::new(ConcurrencyGate::new(config.max_in_flight)),
            upstream: UpstreamClient::new(config)?,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }

    pub fn gate(&self) -> &Arc<ConcurrencyGate> {
        &self.gate
    }

    pub fn upstream(&self) -> &UpstreamClient {
        &self.upstream
    }

    /// Run one request through the state machine.
    ///
    /// `accepted_at` starts the request deadline, which covers admission, the
    /// upstream call and the body relay.
    pub async fn forward(
        &self,
        request: Request<Body>,
        accepted_at: Instant,
        request_id: &str,
    ) -> Result<Response, ProxyError> {
        let deadline = Deadline::from_start(accepted_at, self.request_timeout);

        if request.method() != Method::GET {
            return Err(ProxyError::MethodNotAllowed(request.method().clone()));
        }

        let path = request.uri().path();
        let suffix = path
            .strip_prefix(ROUTE_PREFIX)
            .ok_or_else(|| ProxyError::InvalidPath {
                path: path.to_string(),
                reason: format!("not under {ROUTE_PREFIX}"),
            })?;
        let upstream_request = self.upstream.build_request(suffix, request.headers())?;
        drop(request);

        let token = self.gate.acquire(deadline).await?;
        tracing::debug!(
            request_id = %request_id,
            url = %upstream_request.url,
            queued_ms = accepted_at.elapsed().as_millis() as u64,
            in_flight = self.gate.in_flight(),
            "Calling upstream"
        );

        let upstream = self.upstream.call(upstream_request, deadline).await?;

        relay_response(upstream, token, deadline, request_id.to_string()).await
    }
}

/// `/proxy/*` handler.
pub async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let accepted_at = Instant::now();
    let request_id = request.request_id().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Proxying request"
    );

    match state.proxy.forward(request, accepted_at, &request_id).await {
        Ok(response) => {
            metrics::record_proxy_request(response.status().as_u16(), accepted_at.into_std());
            response
        }
        Err(err) => {
            if err.is_client_error() {
                tracing::warn!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    error = %err,
                    "Rejected proxy request"
                );
            } else {
                tracing::error!(
                    request_id = %request_id,
                    path = %path,
                    elapsed_ms = accepted_at.elapsed().as_millis() as u64,
                    error = %err,
                    "Proxy request failed"
                );
            }
            metrics::record_proxy_request(err.status_code().as_u16(), accepted_at.into_std());
            err.into_response()
        }
    }
}
