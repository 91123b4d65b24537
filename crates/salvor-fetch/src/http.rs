//! Transport abstraction over plain HTTP GET.
//!
//! The download engine only ever issues GET requests and inspects the status
//! code, the `Retry-After` header and the body stream, so the trait carries
//! exactly that. Tests inject fakes; production uses [`ReqwestTransport`].

use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};

use crate::error::TransportError;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Response body as a stream of chunks.
pub type BodyStream = BoxStream<'static, Result<Bytes, TransportError>>;

/// One HTTP response, reduced to what the download loop inspects.
pub struct Response {
    pub status: u16,
    /// `Retry-After` header in whole seconds, when present and parseable.
    pub retry_after: Option<u64>,
    pub body: BodyStream,
}

/// Asynchronous GET-only HTTP client abstraction.
///
/// Implementations handle their own timeout configuration and error mapping.
/// A non-2xx status is NOT an error at this layer; the caller classifies
/// status codes.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<Response, TransportError>;
}

/// Production transport backed by `reqwest`.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client with a fixed User-Agent and a per-request socket
    /// timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<Response, TransportError> {
        let response = self.client.get(url).send().await.map_err(TransportError::from)?;
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok());
        let body: BodyStream =
            Box::pin(response.bytes_stream().map(|r| r.map_err(TransportError::from)));
        Ok(Response {
            status,
            retry_after,
            body,
        })
    }
}
