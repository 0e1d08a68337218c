//! Pipeline error to HTTP response mapping.

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use httpbatch_axum_core::EnvelopeError;

use crate::executor::ExecuteError;

/// A failed pipeline stage. Each variant is terminal: the exchange is
/// answered with the mapped status and no later stage runs.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// The carrying request used a method other than POST.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// The carrying request's Content-Type failed the envelope gate.
    #[error(transparent)]
    Envelope(EnvelopeError),

    /// The request sequence could not be decoded from the envelope.
    #[error("requests extraction failed: {0}")]
    Extraction(EnvelopeError),

    /// A sub-request failed; the batch was aborted.
    #[error("request execution failed: {0}")]
    Execution(#[from] ExecuteError),

    /// The response sequence could not be encoded.
    #[error("response packing failed: {0}")]
    Packing(EnvelopeError),
}

impl IntoResponse for BatchError {
    fn into_response(self) -> Response {
        let (status, reason) = match &self {
            BatchError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, ""),
            BatchError::Envelope(err) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, gate_reason(err)),
            BatchError::Extraction(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "requests extraction failed")
            }
            BatchError::Execution(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "request execution failed")
            }
            BatchError::Packing(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "response packing failed")
            }
        };
        Response::builder()
            .status(status)
            .body(Body::from(reason))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
    }
}

/// Reason text for the 415 family. The texts are part of the server's
/// contract and asserted by clients.
fn gate_reason(err: &EnvelopeError) -> &'static str {
    match err {
        EnvelopeError::UnsupportedMediaType(_) => "Content-Type must be multipart/mixed",
        EnvelopeError::MissingBoundary => "Content-Type is missing boundary parameter",
        _ => "Content-Type malformed",
    }
}
