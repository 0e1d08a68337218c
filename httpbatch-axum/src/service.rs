//! Mounting the batch pipeline on an axum router.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::routing::any;

use crate::executor::{RequestExecutor, SerialExecutor};
use crate::extract::{MultipartExtractor, RequestExtractor};
use crate::pack::{MultipartPacker, ResponsePacker};
use crate::pipeline::BatchPipeline;
use crate::transport::HyperTransport;

/// An axum-mountable batch endpoint.
///
/// The route is registered for every method: the pipeline owns method
/// rejection, so non-POST requests get the pipeline's 405 rather than a
/// router-level fallback.
pub struct BatchService<X, E, P> {
    pipeline: Arc<BatchPipeline<X, E, P>>,
}

impl Default for BatchService<MultipartExtractor, SerialExecutor<HyperTransport>, MultipartPacker> {
    fn default() -> Self {
        Self::new(BatchPipeline::default())
    }
}

impl<X, E, P> BatchService<X, E, P>
where
    X: RequestExtractor + 'static,
    E: RequestExecutor + 'static,
    P: ResponsePacker + 'static,
{
    pub fn new(pipeline: BatchPipeline<X, E, P>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Mount the batching endpoint at `path`.
    pub fn into_router(self, path: &str) -> Router {
        let pipeline = self.pipeline;
        Router::new().route(
            path,
            any(move |request: Request<Body>| {
                let pipeline = pipeline.clone();
                async move { pipeline.handle(request).await }
            }),
        )
    }
}
