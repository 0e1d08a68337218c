//! Raw HTTP/1.x message serialization and parsing.
//!
//! Every multipart part in a batch envelope carries one complete serialized
//! HTTP message: request line or status line, headers, CRLF, body. Messages
//! are serialized in proxy (absolute-form) style so a sub-request keeps its
//! full target URL across the wire, and parsed back with `httparse`.

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, HOST};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Request, Response, StatusCode, Uri, Version};

use crate::error::EnvelopeError;

const MAX_PART_HEADERS: usize = 100;

/// Serialize a request to its wire form: request line + headers + CRLF + body.
///
/// The request line uses absolute form when the URI carries scheme and
/// authority; a `Host` header is derived from the authority when the header
/// map has none, and `Content-Length` is added for non-empty bodies.
pub fn write_request(req: &Request<Bytes>) -> Result<Vec<u8>, EnvelopeError> {
    let uri = req.uri();
    let target = if uri.scheme().is_some() && uri.authority().is_some() {
        uri.to_string()
    } else {
        uri.path_and_query()
            .map(|pq| pq.to_string())
            .unwrap_or_else(|| "/".to_string())
    };

    let mut buf = Vec::with_capacity(64 + req.body().len());
    buf.extend_from_slice(req.method().as_str().as_bytes());
    buf.push(b' ');
    buf.extend_from_slice(target.as_bytes());
    buf.push(b' ');
    buf.extend_from_slice(version_str(req.version()).as_bytes());
    buf.extend_from_slice(b"\r\n");

    if !req.headers().contains_key(HOST) {
        if let Some(authority) = uri.authority() {
            buf.extend_from_slice(b"Host: ");
            buf.extend_from_slice(authority.as_str().as_bytes());
            buf.extend_from_slice(b"\r\n");
        }
    }
    write_headers_and_body(&mut buf, req.headers(), req.body());
    Ok(buf)
}

/// Parse a part's raw bytes back into a request, normalizing the target for
/// inbound replay: an origin-form target is made absolute using the part's
/// own `Host` header, and a missing scheme defaults to `http`.
pub fn read_request(raw: &[u8], index: usize) -> Result<Request<Bytes>, EnvelopeError> {
    let mut header_buf = [httparse::EMPTY_HEADER; MAX_PART_HEADERS];
    let mut parsed = httparse::Request::new(&mut header_buf);

    let header_len = match parsed.parse(raw) {
        Ok(httparse::Status::Complete(len)) => len,
        Ok(httparse::Status::Partial) => {
            return Err(EnvelopeError::malformed_part(index, "incomplete request"));
        }
        Err(e) => return Err(EnvelopeError::malformed_part(index, e.to_string())),
    };

    let method = parsed
        .method
        .ok_or_else(|| EnvelopeError::malformed_part(index, "missing method"))?;
    let method = Method::from_bytes(method.as_bytes())
        .map_err(|e| EnvelopeError::malformed_part(index, e.to_string()))?;
    let target = parsed
        .path
        .ok_or_else(|| EnvelopeError::malformed_part(index, "missing request target"))?;
    let version = parse_version(parsed.version);

    let headers = collect_headers(parsed.headers, index)?;
    let uri = normalize_target(target, &headers, index)?;

    let mut req = Request::builder()
        .method(method)
        .uri(uri)
        .version(version)
        .body(Bytes::copy_from_slice(&raw[header_len..]))
        .map_err(|e| EnvelopeError::malformed_part(index, e.to_string()))?;
    *req.headers_mut() = headers;
    Ok(req)
}

/// Serialize a response to its wire form: status line + headers + CRLF + body.
pub fn write_response(resp: &Response<Bytes>) -> Result<Vec<u8>, EnvelopeError> {
    let status = resp.status();
    let mut buf = Vec::with_capacity(64 + resp.body().len());
    buf.extend_from_slice(version_str(resp.version()).as_bytes());
    buf.push(b' ');
    buf.extend_from_slice(status.as_str().as_bytes());
    buf.push(b' ');
    buf.extend_from_slice(status.canonical_reason().unwrap_or("").as_bytes());
    buf.extend_from_slice(b"\r\n");
    write_headers_and_body(&mut buf, resp.headers(), resp.body());
    Ok(buf)
}

/// Parse a part's raw bytes back into a response, preserving status code,
/// protocol version, headers, and body.
pub fn read_response(raw: &[u8], index: usize) -> Result<Response<Bytes>, EnvelopeError> {
    let mut header_buf = [httparse::EMPTY_HEADER; MAX_PART_HEADERS];
    let mut parsed = httparse::Response::new(&mut header_buf);

    let header_len = match parsed.parse(raw) {
        Ok(httparse::Status::Complete(len)) => len,
        Ok(httparse::Status::Partial) => {
            return Err(EnvelopeError::malformed_part(index, "incomplete response"));
        }
        Err(e) => return Err(EnvelopeError::malformed_part(index, e.to_string())),
    };

    let code = parsed
        .code
        .ok_or_else(|| EnvelopeError::malformed_part(index, "missing status code"))?;
    let status = StatusCode::from_u16(code)
        .map_err(|e| EnvelopeError::malformed_part(index, e.to_string()))?;
    let version = parse_version(parsed.version);
    let headers = collect_headers(parsed.headers, index)?;

    let mut resp = Response::builder()
        .status(status)
        .version(version)
        .body(Bytes::copy_from_slice(&raw[header_len..]))
        .map_err(|e| EnvelopeError::malformed_part(index, e.to_string()))?;
    *resp.headers_mut() = headers;
    Ok(resp)
}

fn write_headers_and_body(buf: &mut Vec<u8>, headers: &HeaderMap, body: &Bytes) {
    for (name, value) in headers {
        buf.extend_from_slice(name.as_str().as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(value.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }
    if !body.is_empty() && !headers.contains_key(CONTENT_LENGTH) {
        buf.extend_from_slice(format!("Content-Length: {}\r\n", body.len()).as_bytes());
    }
    buf.extend_from_slice(b"\r\n");
    buf.extend_from_slice(body);
}

fn collect_headers(
    parsed: &[httparse::Header<'_>],
    index: usize,
) -> Result<HeaderMap, EnvelopeError> {
    let mut headers = HeaderMap::new();
    for header in parsed {
        let name = HeaderName::from_bytes(header.name.as_bytes())
            .map_err(|e| EnvelopeError::malformed_part(index, e.to_string()))?;
        let value = HeaderValue::from_bytes(header.value)
            .map_err(|e| EnvelopeError::malformed_part(index, e.to_string()))?;
        headers.append(name, value);
    }
    Ok(headers)
}

fn normalize_target(
    target: &str,
    headers: &HeaderMap,
    index: usize,
) -> Result<Uri, EnvelopeError> {
    let uri = target
        .parse::<Uri>()
        .map_err(|e| EnvelopeError::malformed_part(index, e.to_string()))?;
    if uri.scheme().is_some() {
        return Ok(uri);
    }
    // Origin-form target: resolve the authority from the part's own Host
    // header, defaulting the scheme to http.
    match headers.get(HOST).and_then(|v| v.to_str().ok()) {
        Some(host) => format!("http://{host}{target}")
            .parse::<Uri>()
            .map_err(|e| EnvelopeError::malformed_part(index, e.to_string())),
        None => Ok(uri),
    }
}

// Parts are serialized as HTTP/1.x messages; HTTP/2+ callers fall back to 1.1.
fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "HTTP/1.0",
        _ => "HTTP/1.1",
    }
}

fn parse_version(minor: Option<u8>) -> Version {
    match minor {
        Some(0) => Version::HTTP_10,
        _ => Version::HTTP_11,
    }
}
