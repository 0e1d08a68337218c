//! Request extraction strategies.

use bytes::Bytes;
use http::Request;
use httpbatch_axum_core::{EnvelopeError, decode_requests};

/// Decodes the inbound envelope body into the request sequence.
pub trait RequestExtractor: Send + Sync {
    fn extract(&self, boundary: &str, body: &[u8]) -> Result<Vec<Request<Bytes>>, EnvelopeError>;
}

/// Default extractor: the core multipart request codec.
#[derive(Clone, Copy, Debug, Default)]
pub struct MultipartExtractor;

impl RequestExtractor for MultipartExtractor {
    fn extract(&self, boundary: &str, body: &[u8]) -> Result<Vec<Request<Bytes>>, EnvelopeError> {
        decode_requests(boundary, body)
    }
}
