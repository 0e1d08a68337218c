//! multipart/mixed part framing.
//!
//! A batch envelope is a standard multipart stream: each part opens with a
//! `--boundary` delimiter line and a small header block (`Content-Type:
//! application/http`, `Content-Transfer-Encoding: binary`), and the stream
//! closes with `--boundary--`. Part payloads are complete serialized HTTP
//! messages; the boundary token is drawn fresh per envelope and re-drawn if
//! it collides with payload bytes.

use bytes::Bytes;

use crate::error::EnvelopeError;

/// Media type of every part inside a batch envelope.
pub const APPLICATION_HTTP: &str = "application/http";

/// How many fresh tokens to draw before giving up on a collision-free one.
const BOUNDARY_ATTEMPTS: usize = 10;

/// Draw a fresh boundary token.
pub fn generate_boundary() -> String {
    format!("batch-{:032x}", rand::random::<u128>())
}

/// Draw a boundary token that appears in none of the part payloads.
///
/// Collisions are astronomically unlikely; the retry loop exists so a
/// collision degrades into a clean error instead of a corrupt envelope.
pub fn choose_boundary(parts: &[Vec<u8>]) -> Result<String, EnvelopeError> {
    for _ in 0..BOUNDARY_ATTEMPTS {
        let boundary = generate_boundary();
        if !parts.iter().any(|p| find(p, boundary.as_bytes()).is_some()) {
            return Ok(boundary);
        }
    }
    Err(EnvelopeError::BoundaryExhausted(BOUNDARY_ATTEMPTS))
}

/// Frame part payloads into one multipart body under `boundary`.
pub fn frame_parts(boundary: &str, parts: &[Vec<u8>]) -> Bytes {
    let payload_len: usize = parts.iter().map(|p| p.len() + boundary.len() + 80).sum();
    let mut buf = Vec::with_capacity(payload_len + boundary.len() + 8);

    for part in parts {
        buf.extend_from_slice(b"--");
        buf.extend_from_slice(boundary.as_bytes());
        buf.extend_from_slice(b"\r\n");
        buf.extend_from_slice(b"Content-Type: application/http\r\n");
        buf.extend_from_slice(b"Content-Transfer-Encoding: binary\r\n");
        buf.extend_from_slice(b"\r\n");
        buf.extend_from_slice(part);
        buf.extend_from_slice(b"\r\n");
    }
    buf.extend_from_slice(b"--");
    buf.extend_from_slice(boundary.as_bytes());
    buf.extend_from_slice(b"--\r\n");
    Bytes::from(buf)
}

/// Split a multipart body into its part payloads, in order.
///
/// Part headers are consumed and discarded (`Content-ID` and transfer
/// encoding markers from other producers are tolerated). A body with no
/// delimiters at all decodes as zero parts; an opened stream without a
/// closing delimiter is [`EnvelopeError::TruncatedEnvelope`].
pub fn split_parts(boundary: &str, body: &[u8]) -> Result<Vec<Vec<u8>>, EnvelopeError> {
    let delimiter = format!("--{boundary}");
    let delimiter = delimiter.as_bytes();

    // Opening delimiter must sit at a line start; anything before it is preamble.
    let Some(open) = find_at_line_start(body, delimiter) else {
        return Ok(Vec::new());
    };

    let mut parts = Vec::new();
    let mut pos = open + delimiter.len();
    loop {
        let rest = &body[pos..];
        if rest.starts_with(b"--") {
            return Ok(parts);
        }
        // The delimiter line ends with CRLF (optionally padded with spaces).
        let Some(eol) = find(rest, b"\r\n") else {
            return Err(EnvelopeError::TruncatedEnvelope);
        };
        if !rest[..eol].iter().all(|b| *b == b' ' || *b == b'\t') {
            return Err(EnvelopeError::malformed_part(
                parts.len(),
                "garbage after boundary delimiter",
            ));
        }

        let content_start = pos + eol + 2;
        let Some(next) = find_delimiter(&body[content_start..], delimiter) else {
            return Err(EnvelopeError::TruncatedEnvelope);
        };
        let content = &body[content_start..content_start + next];
        parts.push(strip_part_headers(content, parts.len())?);
        pos = content_start + next + 2 + delimiter.len();
    }
}

/// Drop a part's MIME header block, returning the raw payload bytes.
fn strip_part_headers(content: &[u8], index: usize) -> Result<Vec<u8>, EnvelopeError> {
    if content.starts_with(b"\r\n") {
        // Empty header block.
        return Ok(content[2..].to_vec());
    }
    match find(content, b"\r\n\r\n") {
        Some(p) => Ok(content[p + 4..].to_vec()),
        None => Err(EnvelopeError::malformed_part(
            index,
            "part has no header/body separator",
        )),
    }
}

/// Position of the next `\r\n--boundary` sequence, relative to `haystack`,
/// pointing at the CRLF.
fn find_delimiter(haystack: &[u8], delimiter: &[u8]) -> Option<usize> {
    let mut needle = Vec::with_capacity(delimiter.len() + 2);
    needle.extend_from_slice(b"\r\n");
    needle.extend_from_slice(delimiter);
    find(haystack, &needle)
}

fn find_at_line_start(haystack: &[u8], delimiter: &[u8]) -> Option<usize> {
    if haystack.starts_with(delimiter) {
        return Some(0);
    }
    find_delimiter(haystack, delimiter).map(|p| p + 2)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_boundary_is_fresh_per_call() {
        assert_ne!(generate_boundary(), generate_boundary());
    }

    #[test]
    fn test_choose_boundary_avoids_payload_collision() {
        let parts = vec![b"hello world".to_vec()];
        let boundary = choose_boundary(&parts).unwrap();
        assert!(find(&parts[0], boundary.as_bytes()).is_none());
    }

    #[test]
    fn test_frame_and_split_round_trip() {
        let parts = vec![b"first part".to_vec(), b"second part".to_vec()];
        let boundary = choose_boundary(&parts).unwrap();
        let body = frame_parts(&boundary, &parts);

        let back = split_parts(&boundary, &body).unwrap();
        assert_eq!(back, parts);
    }

    #[test]
    fn test_frame_zero_parts() {
        let boundary = generate_boundary();
        let body = frame_parts(&boundary, &[]);
        assert_eq!(split_parts(&boundary, &body).unwrap(), Vec::<Vec<u8>>::new());
    }

    #[test]
    fn test_split_empty_body_is_zero_parts() {
        assert_eq!(split_parts("b", b"").unwrap(), Vec::<Vec<u8>>::new());
    }

    #[test]
    fn test_split_tolerates_preamble() {
        let body = b"this is a preamble\r\n--b\r\n\r\npayload\r\n--b--\r\n";
        assert_eq!(split_parts("b", body).unwrap(), vec![b"payload".to_vec()]);
    }

    #[test]
    fn test_split_tolerates_foreign_part_headers() {
        let body = b"--b\r\nContent-Type: application/http\r\nContent-Transfer-Encoding: binary\r\nContent-ID: <r1+1>\r\n\r\npayload\r\n--b--\r\n";
        assert_eq!(split_parts("b", body).unwrap(), vec![b"payload".to_vec()]);
    }

    #[test]
    fn test_split_missing_close_is_truncated() {
        let body = b"--b\r\n\r\npayload without a closing delimiter";
        assert_eq!(
            split_parts("b", body),
            Err(EnvelopeError::TruncatedEnvelope)
        );
    }

    #[test]
    fn test_split_mid_part_end_is_truncated() {
        let parts = vec![b"first".to_vec(), b"second".to_vec()];
        let body = frame_parts("b", &parts);
        let cut = &body[..body.len() - 10];
        assert_eq!(split_parts("b", cut), Err(EnvelopeError::TruncatedEnvelope));
    }

    #[test]
    fn test_split_preserves_part_order() {
        let parts: Vec<Vec<u8>> = (0..5).map(|i| format!("part {i}").into_bytes()).collect();
        let body = frame_parts("b", &parts);
        assert_eq!(split_parts("b", &body).unwrap(), parts);
    }

    #[test]
    fn test_split_payload_may_contain_crlf() {
        let parts = vec![b"line one\r\nline two\r\n\r\nline three".to_vec()];
        let body = frame_parts("b", &parts);
        assert_eq!(split_parts("b", &body).unwrap(), parts);
    }
}
