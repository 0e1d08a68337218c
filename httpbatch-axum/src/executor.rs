//! Batch execution strategies.

use std::future::Future;

use bytes::Bytes;
use http::{Request, Response};

use crate::transport::{Transport, TransportError};

/// A failed batch execution.
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    /// The first sub-request dispatch that failed. Remaining sub-requests
    /// were not executed.
    #[error("error occurred while executing http request: {0}")]
    Transport(#[from] TransportError),
}

/// Turns a request sequence into a response sequence, or fails the batch.
///
/// Implementations must preserve positional order: on success the Kth
/// response corresponds to the Kth request and the output length equals
/// the input length. The pipeline accepts any conforming implementation,
/// so a concurrent fan-out executor can be substituted without touching
/// the other stages.
pub trait RequestExecutor: Send + Sync {
    fn execute(
        &self,
        requests: Vec<Request<Bytes>>,
    ) -> impl Future<Output = Result<Vec<Response<Bytes>>, ExecuteError>> + Send;
}

/// The reference execution policy: strictly one sub-request at a time, in
/// order, each dispatched through the transport exactly once. The first
/// failure aborts the batch: no partial response sequence is returned and
/// no further sub-request is dispatched.
#[derive(Clone, Debug, Default)]
pub struct SerialExecutor<T> {
    transport: T,
}

impl<T> SerialExecutor<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }
}

impl<T: Transport> RequestExecutor for SerialExecutor<T> {
    async fn execute(
        &self,
        requests: Vec<Request<Bytes>>,
    ) -> Result<Vec<Response<Bytes>>, ExecuteError> {
        let mut responses = Vec::with_capacity(requests.len());
        for request in requests {
            responses.push(self.transport.send(request).await?);
        }
        Ok(responses)
    }
}
