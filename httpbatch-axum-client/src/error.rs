//! Client-side batch protocol error types.

use httpbatch_axum_core::EnvelopeError;

/// Errors surfaced by the batch client façade.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Encoding or decoding an envelope failed.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// The batching endpoint URL is not a valid URI.
    #[error("invalid batch target: {0}")]
    InvalidTarget(String),

    /// The carrying response's status was not 200; decoding was skipped.
    /// Carries the raw body text for diagnostics.
    #[error("response status is {status}: {body}")]
    Upstream { status: u16, body: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_display() {
        let err = ClientError::Upstream {
            status: 400,
            body: "really bad error".into(),
        };
        assert_eq!(err.to_string(), "response status is 400: really bad error");
    }

    #[test]
    fn test_envelope_errors_pass_through() {
        let err = ClientError::from(EnvelopeError::MissingBoundary);
        assert_eq!(
            err.to_string(),
            "media type multipart/mixed requires a boundary parameter"
        );
    }
}
