//! Request and response envelope codecs.
//!
//! An envelope is an ordered sequence of HTTP messages framed as one
//! multipart/mixed body. Part order equals sequence order on both sides;
//! the decoder relies on positional correspondence between request index
//! and response index, so the codecs never reorder, drop, or partially
//! emit parts. Encoding fails atomically: a message that cannot be
//! serialized yields an error and no envelope.

use bytes::Bytes;
use http::{Request, Response};

use crate::error::EnvelopeError;
use crate::multipart::{choose_boundary, frame_parts, split_parts};
use crate::wire::{read_request, read_response, write_request, write_response};

/// Encode an ordered sequence of requests into one multipart body.
///
/// Returns the envelope body and the fresh boundary token delimiting it.
pub fn encode_requests(requests: &[Request<Bytes>]) -> Result<(Bytes, String), EnvelopeError> {
    let parts = requests
        .iter()
        .map(write_request)
        .collect::<Result<Vec<_>, _>>()?;
    let boundary = choose_boundary(&parts)?;
    Ok((frame_parts(&boundary, &parts), boundary))
}

/// Decode a multipart body back into an ordered sequence of requests.
///
/// Each part is reparsed as a request message with its target normalized
/// for inbound replay. Zero parts decode as an empty sequence.
pub fn decode_requests(boundary: &str, body: &[u8]) -> Result<Vec<Request<Bytes>>, EnvelopeError> {
    split_parts(boundary, body)?
        .iter()
        .enumerate()
        .map(|(index, part)| read_request(part, index))
        .collect()
}

/// Encode an ordered sequence of responses into one multipart body.
pub fn encode_responses(responses: &[Response<Bytes>]) -> Result<(Bytes, String), EnvelopeError> {
    let parts = responses
        .iter()
        .map(write_response)
        .collect::<Result<Vec<_>, _>>()?;
    let boundary = choose_boundary(&parts)?;
    Ok((frame_parts(&boundary, &parts), boundary))
}

/// Decode a multipart body back into an ordered sequence of responses.
pub fn decode_responses(
    boundary: &str,
    body: &[u8],
) -> Result<Vec<Response<Bytes>>, EnvelopeError> {
    split_parts(boundary, body)?
        .iter()
        .enumerate()
        .map(|(index, part)| read_response(part, index))
        .collect()
}
