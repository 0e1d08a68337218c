//! Building batch requests and unpacking batch responses.

use bytes::Bytes;
use http::{Method, Request, Response, StatusCode, Uri, header};
use httpbatch_axum_core::{
    encode_requests, decode_responses, envelope_boundary, format_multipart_mixed,
};

use crate::error::ClientError;

/// Encode a sequence of requests into a single envelope request.
///
/// The result is a POST to `target_url` whose body is the multipart/mixed
/// envelope; parts appear in the same order as `requests`, and the response
/// envelope will answer them positionally.
pub fn build_request(
    requests: &[Request<Bytes>],
    target_url: &str,
) -> Result<Request<Bytes>, ClientError> {
    let target: Uri = target_url
        .parse()
        .map_err(|e: http::uri::InvalidUri| ClientError::InvalidTarget(e.to_string()))?;

    let (body, boundary) = encode_requests(requests)?;
    Request::builder()
        .method(Method::POST)
        .uri(target)
        .header(header::CONTENT_TYPE, format_multipart_mixed(&boundary))
        .body(body)
        .map_err(|e| ClientError::InvalidTarget(e.to_string()))
}

/// Decode an envelope response into the individual responses, in order.
///
/// A non-200 carrying response means the batch as a whole failed; decoding
/// is skipped and the status and raw body text are surfaced for diagnostics.
pub fn unpack_response(response: Response<Bytes>) -> Result<Vec<Response<Bytes>>, ClientError> {
    if response.status() != StatusCode::OK {
        return Err(ClientError::Upstream {
            status: response.status().as_u16(),
            body: String::from_utf8_lossy(response.body()).into_owned(),
        });
    }

    let boundary = envelope_boundary(response.headers())?;
    Ok(decode_responses(&boundary, response.body())?)
}

/// Thin façade bound to one batching endpoint.
#[derive(Clone, Debug)]
pub struct BatchClient {
    target: Uri,
}

impl BatchClient {
    pub fn new(target_url: &str) -> Result<Self, ClientError> {
        let target = target_url
            .parse()
            .map_err(|e: http::uri::InvalidUri| ClientError::InvalidTarget(e.to_string()))?;
        Ok(Self { target })
    }

    /// The batching endpoint this client posts to.
    pub fn target(&self) -> &Uri {
        &self.target
    }

    /// See [`build_request`].
    pub fn build_request(&self, requests: &[Request<Bytes>]) -> Result<Request<Bytes>, ClientError> {
        build_request(requests, &self.target.to_string())
    }

    /// See [`unpack_response`].
    pub fn unpack_response(
        &self,
        response: Response<Bytes>,
    ) -> Result<Vec<Response<Bytes>>, ClientError> {
        unpack_response(response)
    }
}

#[cfg(test)]
mod tests {
    use http::{HeaderValue, Version};
    use httpbatch_axum_core::{decode_requests, encode_responses};

    use super::*;

    fn some_requests(n: usize) -> Vec<Request<Bytes>> {
        (0..n)
            .map(|i| {
                Request::builder()
                    .method(Method::GET)
                    .uri(format!("http://somehost:{i}/resource/path"))
                    .body(Bytes::new())
                    .unwrap()
            })
            .collect()
    }

    fn a_response(status: StatusCode, body: &'static str) -> Response<Bytes> {
        Response::builder()
            .status(status)
            .version(Version::HTTP_10)
            .header("content-type", "text/plain")
            .body(Bytes::from_static(body.as_bytes()))
            .unwrap()
    }

    fn a_fat_response(responses: &[Response<Bytes>]) -> Response<Bytes> {
        let (body, boundary) = encode_responses(responses).unwrap();
        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, format_multipart_mixed(&boundary))
            .body(body)
            .unwrap()
    }

    #[test]
    fn test_build_request_creates_the_wrapper_request() {
        let envelope = build_request(&some_requests(3), "http://batcher/batch").unwrap();

        assert_eq!(envelope.method(), Method::POST);
        assert_eq!(envelope.uri(), "http://batcher/batch");

        let boundary = envelope_boundary(envelope.headers()).unwrap();
        assert!(!boundary.is_empty());
    }

    #[test]
    fn test_build_request_rejects_invalid_url() {
        let err = build_request(&some_requests(1), "http://bad url^").unwrap_err();
        assert!(matches!(err, ClientError::InvalidTarget(_)));
    }

    #[test]
    fn test_build_request_bundles_all_parts_in_order() {
        let envelope = build_request(&some_requests(3), "http://batcher/batch").unwrap();

        let boundary = envelope_boundary(envelope.headers()).unwrap();
        let decoded = decode_requests(&boundary, envelope.body()).unwrap();

        assert_eq!(decoded.len(), 3);
        for (i, req) in decoded.iter().enumerate() {
            assert_eq!(req.method(), Method::GET);
            assert_eq!(
                req.uri().to_string(),
                format!("http://somehost:{i}/resource/path")
            );
        }
    }

    #[test]
    fn test_build_request_preserves_body_header_and_scheme() {
        let mut with_header = Request::builder()
            .method(Method::POST)
            .uri("https://somehost/resource/path")
            .body(Bytes::from_static(b"some content"))
            .unwrap();
        with_header
            .headers_mut()
            .insert("custom-header", HeaderValue::from_static("custom value"));

        let envelope = build_request(&[with_header], "http://batcher/batch").unwrap();
        let boundary = envelope_boundary(envelope.headers()).unwrap();
        let decoded = decode_requests(&boundary, envelope.body()).unwrap();

        assert_eq!(decoded[0].body().as_ref(), b"some content");
        assert_eq!(
            decoded[0].headers().get("custom-header").unwrap(),
            "custom value"
        );
        assert_eq!(decoded[0].uri().scheme_str(), Some("https"));
    }

    #[test]
    fn test_unpack_response_fails_on_unparseable_content_type() {
        let mut fat = a_fat_response(&[a_response(StatusCode::OK, "valid response")]);
        fat.headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(""));

        let err = unpack_response(fat).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Envelope(httpbatch_axum_core::EnvelopeError::MalformedMediaType(_))
        ));
    }

    #[test]
    fn test_unpack_response_fails_on_wrong_content_type() {
        let mut fat = a_fat_response(&[a_response(StatusCode::OK, "valid response")]);
        fat.headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        let err = unpack_response(fat).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Envelope(httpbatch_axum_core::EnvelopeError::UnsupportedMediaType(_))
        ));
    }

    #[test]
    fn test_unpack_response_fails_on_missing_boundary() {
        let mut fat = a_fat_response(&[a_response(StatusCode::OK, "valid response")]);
        fat.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("multipart/mixed"),
        );

        let err = unpack_response(fat).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Envelope(httpbatch_axum_core::EnvelopeError::MissingBoundary)
        ));
    }

    #[test]
    fn test_unpack_response_fails_on_non_ok_status() {
        let fat = Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .body(Bytes::from_static(b"really bad error"))
            .unwrap();

        let err = unpack_response(fat).unwrap_err();
        assert_eq!(
            err,
            ClientError::Upstream {
                status: 400,
                body: "really bad error".into()
            }
        );
    }

    #[test]
    fn test_unpack_response_returns_responses_in_order() {
        let fat = a_fat_response(&[
            a_response(StatusCode::OK, "first"),
            a_response(StatusCode::OK, "second"),
        ]);

        let responses = unpack_response(fat).unwrap();
        assert_eq!(responses[0].body().as_ref(), b"first");
        assert_eq!(responses[1].body().as_ref(), b"second");
    }

    #[test]
    fn test_unpack_response_preserves_status_and_headers() {
        let mut first = a_response(StatusCode::NOT_FOUND, "first");
        first
            .headers_mut()
            .insert("x-first", HeaderValue::from_static("1st"));
        let mut second = a_response(StatusCode::OK, "second");
        second
            .headers_mut()
            .insert("x-second", HeaderValue::from_static("2nd"));

        let responses = unpack_response(a_fat_response(&[first, second])).unwrap();

        assert_eq!(responses[0].status(), StatusCode::NOT_FOUND);
        assert_eq!(responses[0].headers().get("x-first").unwrap(), "1st");
        assert_eq!(responses[0].version(), Version::HTTP_10);
        assert_eq!(responses[1].status(), StatusCode::OK);
        assert_eq!(responses[1].headers().get("x-second").unwrap(), "2nd");
    }

    #[test]
    fn test_batch_client_facade() {
        let client = BatchClient::new("http://batcher/batch").unwrap();
        assert_eq!(client.target(), &"http://batcher/batch".parse::<Uri>().unwrap());

        let envelope = client.build_request(&some_requests(2)).unwrap();
        assert_eq!(envelope.uri(), "http://batcher/batch");
    }
}
