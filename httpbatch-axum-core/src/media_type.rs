//! Content-Type parsing and the envelope validation gate.
//!
//! Before either envelope decoder runs, the carrying HTTP message's
//! `Content-Type` header must parse as a MIME media type, be exactly
//! `multipart/mixed`, and carry a `boundary` parameter. The gate is a
//! distinct, reusable step: the server runs it on inbound requests and
//! the client runs it on inbound responses.

use http::HeaderMap;
use http::header;

use crate::error::EnvelopeError;

/// The only media type a batch envelope may carry.
pub const MULTIPART_MIXED: &str = "multipart/mixed";

/// A parsed MIME media type: lowercased `type/subtype` plus parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaType {
    essence: String,
    params: Vec<(String, String)>,
}

impl MediaType {
    /// The lowercased `type/subtype` without parameters.
    pub fn essence(&self) -> &str {
        &self.essence
    }

    /// Look up a parameter value by name (case-insensitive).
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Parse a `Content-Type` header value into a [`MediaType`].
///
/// Accepts `type/subtype` followed by `;`-separated `name=value` parameters,
/// with values either as bare tokens or double-quoted strings.
pub fn parse_media_type(value: &str) -> Result<MediaType, EnvelopeError> {
    let mut segments = value.split(';');

    let essence = segments
        .next()
        .map(str::trim)
        .unwrap_or_default()
        .to_ascii_lowercase();
    if essence.is_empty() {
        return Err(EnvelopeError::MalformedMediaType("no media type".into()));
    }
    let Some((kind, subtype)) = essence.split_once('/') else {
        return Err(EnvelopeError::MalformedMediaType(format!(
            "expected type/subtype, got {essence:?}"
        )));
    };
    if kind.is_empty() || subtype.is_empty() || essence.contains(char::is_whitespace) {
        return Err(EnvelopeError::MalformedMediaType(format!(
            "expected type/subtype, got {essence:?}"
        )));
    }

    let mut params = Vec::new();
    for segment in segments {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let Some((name, raw)) = segment.split_once('=') else {
            return Err(EnvelopeError::MalformedMediaType(format!(
                "invalid parameter {segment:?}"
            )));
        };
        let name = name.trim().to_ascii_lowercase();
        let raw = raw.trim();
        let value = raw
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(raw);
        params.push((name, value.to_string()));
    }

    Ok(MediaType { essence, params })
}

/// Format a `multipart/mixed` content type carrying `boundary`.
pub fn format_multipart_mixed(boundary: &str) -> String {
    format!("{MULTIPART_MIXED}; boundary=\"{boundary}\"")
}

/// Validate the carrying message's `Content-Type` and extract the boundary.
///
/// Check order is load-bearing for the server's 415 reason texts:
/// 1. missing or unparseable header -> [`EnvelopeError::MalformedMediaType`]
/// 2. essence other than `multipart/mixed` -> [`EnvelopeError::UnsupportedMediaType`]
/// 3. no `boundary` parameter -> [`EnvelopeError::MissingBoundary`]
pub fn envelope_boundary(headers: &HeaderMap) -> Result<String, EnvelopeError> {
    let value = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let media_type = parse_media_type(value)?;
    if media_type.essence() != MULTIPART_MIXED {
        return Err(EnvelopeError::UnsupportedMediaType(
            media_type.essence().to_string(),
        ));
    }
    match media_type.param("boundary") {
        Some(boundary) if !boundary.is_empty() => Ok(boundary.to_string()),
        _ => Err(EnvelopeError::MissingBoundary),
    }
}
