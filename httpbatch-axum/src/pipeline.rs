//! The server-side batch pipeline.
//!
//! A fixed chain of stages with no back edges:
//! validate → extract → execute → pack. Each stage either extends the
//! [`BatchContext`] and passes it forward, or terminates the exchange with
//! an error response; after a failure no later stage runs.

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode, header};
use axum::response::IntoResponse;
use bytes::Bytes;
use httpbatch_axum_core::{EnvelopeError, envelope_boundary, format_multipart_mixed};

use crate::context::BatchContext;
use crate::error::BatchError;
use crate::executor::{RequestExecutor, SerialExecutor};
use crate::extract::{MultipartExtractor, RequestExtractor};
use crate::pack::{MultipartPacker, ResponsePacker};
use crate::transport::HyperTransport;

/// The batch pipeline, composed from its stage strategies at construction
/// time. The extractor, executor, and packer are independent seams; any
/// conforming implementation can be substituted.
#[derive(Clone, Debug)]
pub struct BatchPipeline<X, E, P> {
    extractor: X,
    executor: E,
    packer: P,
}

impl Default for BatchPipeline<MultipartExtractor, SerialExecutor<HyperTransport>, MultipartPacker> {
    fn default() -> Self {
        Self::new(
            MultipartExtractor,
            SerialExecutor::new(HyperTransport::new()),
            MultipartPacker,
        )
    }
}

impl<X, E, P> BatchPipeline<X, E, P>
where
    X: RequestExtractor,
    E: RequestExecutor,
    P: ResponsePacker,
{
    pub fn new(extractor: X, executor: E, packer: P) -> Self {
        Self {
            extractor,
            executor,
            packer,
        }
    }

    /// Run one batch exchange to a terminal response.
    pub async fn handle(&self, request: Request<Body>) -> Response<Body> {
        match self.run(request).await {
            Ok(response) => response,
            Err(err) => {
                match &err {
                    BatchError::MethodNotAllowed | BatchError::Envelope(_) => {
                        tracing::warn!(error = %err, "rejected batch request");
                    }
                    _ => tracing::error!(error = %err, "batch pipeline failed"),
                }
                err.into_response()
            }
        }
    }

    async fn run(&self, request: Request<Body>) -> Result<Response<Body>, BatchError> {
        // Validate. A non-POST method short-circuits before the
        // content-type gate runs.
        if request.method() != Method::POST {
            return Err(BatchError::MethodNotAllowed);
        }
        let boundary = envelope_boundary(request.headers()).map_err(BatchError::Envelope)?;
        let mut ctx = BatchContext::new(boundary);

        // Extract.
        let body = axum::body::to_bytes(request.into_body(), usize::MAX)
            .await
            .map_err(|e| BatchError::Extraction(EnvelopeError::Serialize(e.to_string())))?;
        let requests = self
            .extractor
            .extract(ctx.boundary(), &body)
            .map_err(BatchError::Extraction)?;
        ctx = ctx.with_requests(requests);

        // Execute.
        let responses = self.executor.execute(ctx.take_requests()).await?;
        ctx = ctx.with_responses(responses);

        // Pack.
        let (body, boundary) = self
            .packer
            .pack(ctx.responses())
            .map_err(BatchError::Packing)?;
        write_envelope_response(body, &boundary)
    }
}

fn write_envelope_response(body: Bytes, boundary: &str) -> Result<Response<Body>, BatchError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, format_multipart_mixed(boundary))
        .body(Body::from(body))
        .map_err(|e| BatchError::Packing(EnvelopeError::Serialize(e.to_string())))
}
