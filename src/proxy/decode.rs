//! Content-encoding removal.
//!
//! Upstream bodies arrive as chunks; each chunk is pushed through a
//! write-side `flate2` decoder and whatever plain bytes it has ready are
//! handed on, so the relay never holds more than about one chunk.

use std::fmt;
use std::io::{self, Write};

use axum::http::{header::CONTENT_ENCODING, HeaderMap};
use bytes::Bytes;
use flate2::write::{DeflateDecoder, MultiGzDecoder};

/// Encodings the relay knows how to undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Gzip,
    /// Raw DEFLATE (RFC 1951) without a zlib wrapper.
    Deflate,
    /// Absent, or anything we do not decode; passed through untouched.
    Identity,
}

impl ContentEncoding {
    /// Select from the first `Content-Encoding` value of a response.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .map(Self::from_token)
            .unwrap_or(ContentEncoding::Identity)
    }

    pub fn from_token(token: &str) -> Self {
        let token = token.trim();
        if token.eq_ignore_ascii_case("gzip") {
            ContentEncoding::Gzip
        } else if token.eq_ignore_ascii_case("deflate") {
            ContentEncoding::Deflate
        } else {
            ContentEncoding::Identity
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentEncoding::Gzip => "gzip",
            ContentEncoding::Deflate => "deflate",
            ContentEncoding::Identity => "identity",
        }
    }
}

impl fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Incremental decoder for one response body.
pub enum Decoder {
    Identity,
    /// Concatenated gzip members decode as one body.
    Gzip(MultiGzDecoder<Vec<u8>>),
    Deflate(DeflateDecoder<Vec<u8>>),
}

impl Decoder {
    pub fn new(encoding: ContentEncoding) -> Self {
        match encoding {
            ContentEncoding::Gzip => Decoder::Gzip(MultiGzDecoder::new(Vec::new())),
            ContentEncoding::Deflate => Decoder::Deflate(DeflateDecoder::new(Vec::new())),
            ContentEncoding::Identity => Decoder::Identity,
        }
    }

    pub fn encoding(&self) -> ContentEncoding {
        match self {
            Decoder::Identity => ContentEncoding::Identity,
            Decoder::Gzip(_) => ContentEncoding::Gzip,
            Decoder::Deflate(_) => ContentEncoding::Deflate,
        }
    }

    /// Feed one upstream chunk, returning the plain bytes that are ready.
    /// The result may be empty: the chunk held only a gzip header, or the
    /// decoder is still holding output back until the next write. `finish`
    /// drains whatever is left.
    pub fn decode(&mut self, chunk: Bytes) -> io::Result<Bytes> {
        match self {
            Decoder::Identity => Ok(chunk),
            Decoder::Gzip(inner) => {
                inner.write_all(&chunk)?;
                Ok(Bytes::from(std::mem::take(inner.get_mut())))
            }
            Decoder::Deflate(inner) => {
                inner.write_all(&chunk)?;
                Ok(Bytes::from(std::mem::take(inner.get_mut())))
            }
        }
    }

    /// Signal end of input. Fails if the compressed stream was truncated or,
    /// for gzip, its trailer does not match the data.
    pub fn finish(&mut self) -> io::Result<Bytes> {
        match self {
            Decoder::Identity => Ok(Bytes::new()),
            Decoder::Gzip(inner) => {
                inner.try_finish()?;
                Ok(Bytes::from(std::mem::take(inner.get_mut())))
            }
            Decoder::Deflate(inner) => {
                inner.try_finish()?;
                Ok(Bytes::from(std::mem::take(inner.get_mut())))
            }
        }
    }
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Decoder").field(&self.encoding()).finish()
    }
}
