//! Response packing strategies.

use bytes::Bytes;
use http::Response;
use httpbatch_axum_core::{EnvelopeError, encode_responses};

/// Encodes the response sequence into an outbound envelope body.
///
/// Returns the body and the fresh boundary token to advertise in the
/// carrying response's Content-Type.
pub trait ResponsePacker: Send + Sync {
    fn pack(&self, responses: &[Response<Bytes>]) -> Result<(Bytes, String), EnvelopeError>;
}

/// Default packer: the core multipart response codec.
#[derive(Clone, Copy, Debug, Default)]
pub struct MultipartPacker;

impl ResponsePacker for MultipartPacker {
    fn pack(&self, responses: &[Response<Bytes>]) -> Result<(Bytes, String), EnvelopeError> {
        encode_responses(responses)
    }
}
