//! Decoding relay: upstream response → client response.
//!
//! # Responsibilities
//! - Pick a decoder from the upstream `Content-Encoding`
//! - Validate the compressed stream up to its first output before the
//!   status line is committed
//! - Mirror status and `Content-Type`, add `Access-Control-Allow-Origin: *`
//! - Stream decoded bytes; the admission token rides along in the body
//!
//! # Design Decisions
//! - Once the status is committed, a failure can only truncate the body.
//!   It is logged and counted, never turned into a fake success.
//! - Client disconnect drops the body stream, which drops the upstream body,
//!   the decoder and the token together.

use axum::{
    body::Body,
    http::{
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
    response::Response,
};
use bytes::Bytes;
use futures_util::{Stream, StreamExt, TryStreamExt};

use crate::observability::metrics;
use crate::proxy::decode::{ContentEncoding, Decoder};
use crate::proxy::error::ProxyError;
use crate::proxy::gate::AdmissionToken;
use crate::resilience::Deadline;

/// Output decoded before the status line was committed.
#[derive(Debug)]
struct Primed {
    first: Bytes,
    finished: bool,
}

/// Turn an upstream response into the client response.
///
/// Errors returned here happen before any status is sent and can still be
/// reported to the client. Later errors terminate the body stream.
pub async fn relay_response(
    upstream: reqwest::Response,
    token: AdmissionToken,
    deadline: Deadline,
    request_id: String,
) -> Result<Response, ProxyError> {
    let status = upstream.status();
    let content_type = upstream.headers().get(CONTENT_TYPE).cloned();
    let encoding = if status_has_body(status) {
        ContentEncoding::from_headers(upstream.headers())
    } else {
        ContentEncoding::Identity
    };
    let mut decoder = Decoder::new(encoding);

    let mut body = Box::pin(upstream.bytes_stream());
    let primed = prime(&mut body, &mut decoder, deadline).await?;

    tracing::debug!(
        request_id = %request_id,
        status = status.as_u16(),
        encoding = %encoding,
        "Relaying upstream response"
    );

    let stream = decoded_stream(body, decoder, primed, token, deadline).inspect_err(move |err| {
        metrics::record_relay_error("stream");
        tracing::warn!(
            request_id = %request_id,
            encoding = %encoding,
            error = %err,
            "Response body truncated after status was sent"
        );
    });

    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    if let Some(content_type) = content_type {
        headers.insert(CONTENT_TYPE, content_type);
    }
    Ok(response)
}

/// 1xx, 204 and 304 responses never carry a body to decode.
fn status_has_body(status: StatusCode) -> bool {
    !(status.is_informational()
        || status == StatusCode::NO_CONTENT
        || status == StatusCode::NOT_MODIFIED)
}

/// Read until the decoder yields its first bytes or the body ends.
///
/// A body that ends before any byte arrived is empty, not a truncated
/// compressed stream.
async fn prime<S>(
    body: &mut S,
    decoder: &mut Decoder,
    deadline: Deadline,
) -> Result<Primed, ProxyError>
where
    S: Stream<Item = reqwest::Result<Bytes>> + Unpin,
{
    let encoding = decoder.encoding();
    let decode_error = |source: std::io::Error| ProxyError::Decode { encoding, source };
    let mut received = false;

    loop {
        let next = deadline
            .run(body.next())
            .await
            .map_err(|_| ProxyError::DeadlineExceeded)?;
        match next {
            Some(chunk) => {
                let chunk = chunk.map_err(ProxyError::Upstream)?;
                received |= !chunk.is_empty();
                let out = decoder.decode(chunk).map_err(decode_error)?;
                if !out.is_empty() {
                    return Ok(Primed {
                        first: out,
                        finished: false,
                    });
                }
            }
            None if !received => {
                return Ok(Primed {
                    first: Bytes::new(),
                    finished: true,
                });
            }
            None => {
                let tail = decoder.finish().map_err(decode_error)?;
                return Ok(Primed {
                    first: tail,
                    finished: true,
                });
            }
        }
    }
}

fn decoded_stream<S>(
    mut body: S,
    mut decoder: Decoder,
    primed: Primed,
    token: AdmissionToken,
    deadline: Deadline,
) -> impl Stream<Item = Result<Bytes, ProxyError>> + Send + 'static
where
    S: Stream<Item = reqwest::Result<Bytes>> + Unpin + Send + 'static,
{
    async_stream::try_stream! {
        let _token = token;
        let encoding = decoder.encoding();

        if !primed.first.is_empty() {
            yield primed.first;
        }
        if !primed.finished {
            while let Some(chunk) = deadline
                .run(body.next())
                .await
                .map_err(|_| ProxyError::DeadlineExceeded)?
            {
                let chunk = chunk.map_err(ProxyError::Upstream)?;
                let out = decoder
                    .decode(chunk)
                    .map_err(|source| ProxyError::Decode { encoding, source })?;
                if !out.is_empty() {
                    yield out;
                }
            }
            let tail = decoder
                .finish()
                .map_err(|source| ProxyError::Decode { encoding, source })?;
            if !tail.is_empty() {
                yield tail;
            }
        }
    }
}
