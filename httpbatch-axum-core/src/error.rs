//! Envelope error taxonomy.
//!
//! Every failure the codecs and the validation gate can produce is a
//! variant of [`EnvelopeError`]. The server maps envelope-shape variants
//! to 415 responses and decode-time variants to 500; the client wraps
//! them into its own error type.

/// Errors produced while validating, encoding, or decoding a batch envelope.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    /// The carrying message's `Content-Type` header is absent or cannot be
    /// parsed as a MIME media type.
    #[error("malformed media type: {0}")]
    MalformedMediaType(String),

    /// The carrying message's media type is not `multipart/mixed`.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// The media type is `multipart/mixed` but carries no `boundary` parameter.
    #[error("media type multipart/mixed requires a boundary parameter")]
    MissingBoundary,

    /// A multipart part could not be parsed as an HTTP message.
    #[error("part {index} is not a valid HTTP message: {reason}")]
    MalformedPart { index: usize, reason: String },

    /// The multipart stream ended before the closing boundary delimiter.
    #[error("multipart stream ended before the closing boundary")]
    TruncatedEnvelope,

    /// No collision-free boundary token could be drawn.
    #[error("could not pick a collision-free boundary after {0} attempts")]
    BoundaryExhausted(usize),

    /// An individual message could not be serialized to its wire form.
    #[error("failed to serialize message: {0}")]
    Serialize(String),
}

impl EnvelopeError {
    /// Build a [`MalformedPart`](EnvelopeError::MalformedPart) for part `index`.
    pub fn malformed_part<S: Into<String>>(index: usize, reason: S) -> Self {
        EnvelopeError::MalformedPart {
            index,
            reason: reason.into(),
        }
    }
}
