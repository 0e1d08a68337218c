//! Outbound HTTP transport for dispatching sub-requests.
//!
//! The executor is polymorphic over [`Transport`]: "send one request, get
//! one response or an error". [`HyperTransport`] is the shipped
//! implementation, a pooled hyper_util legacy client over a plain HTTP
//! connector. Retry, timeout, and pooling policy live here, not in the
//! batch core.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use http::{Request, Response};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};

/// A failed sub-request dispatch.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(String);

impl TransportError {
    pub fn new<S: Into<String>>(reason: S) -> Self {
        Self(reason.into())
    }
}

/// One-shot request dispatch capability, invoked exactly once per
/// sub-request by the executor.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>, TransportError>> + Send;
}

type PooledClient = Client<HttpConnector, Full<Bytes>>;

/// Pooled HTTP/1.1 transport built on hyper_util's legacy client.
#[derive(Clone)]
pub struct HyperTransport {
    client: PooledClient,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport").finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Create a transport with default pool settings.
    pub fn new() -> Self {
        let mut builder = Client::builder(TokioExecutor::new());
        builder.pool_timer(TokioTimer::new());
        builder.pool_idle_timeout(Duration::from_secs(90));
        Self {
            client: builder.build_http(),
        }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HyperTransport {
    async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
        let (parts, body) = request.into_parts();
        let request = Request::from_parts(parts, Full::new(body));

        let response: Response<Incoming> = self
            .client
            .request(request)
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| TransportError::new(format!("failed to read response body: {e}")))?
            .to_bytes();
        Ok(Response::from_parts(parts, body))
    }
}
