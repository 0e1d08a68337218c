//! Per-exchange pipeline state.

use bytes::Bytes;
use http::{Request, Response};

/// State threaded through the pipeline stages of one batch exchange.
///
/// Created when validation succeeds and populated incrementally (extraction
/// fills the request sequence, execution the response sequence), then
/// dropped once the outbound response is written. A context is owned by
/// exactly one in-flight exchange and never shared.
#[derive(Debug, Default)]
pub struct BatchContext {
    boundary: String,
    requests: Vec<Request<Bytes>>,
    responses: Vec<Response<Bytes>>,
}

impl BatchContext {
    /// Open a context with the boundary extracted by the validation stage.
    pub fn new(boundary: String) -> Self {
        Self {
            boundary,
            requests: Vec::new(),
            responses: Vec::new(),
        }
    }

    /// The inbound envelope's boundary token.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Record the decoded request sequence.
    pub fn with_requests(mut self, requests: Vec<Request<Bytes>>) -> Self {
        self.requests = requests;
        self
    }

    /// Record the produced response sequence.
    pub fn with_responses(mut self, responses: Vec<Response<Bytes>>) -> Self {
        self.responses = responses;
        self
    }

    /// Hand the decoded requests to the execution stage.
    pub fn take_requests(&mut self) -> Vec<Request<Bytes>> {
        std::mem::take(&mut self.requests)
    }

    /// The response sequence, in dispatch order.
    pub fn responses(&self) -> &[Response<Bytes>] {
        &self.responses
    }
}

#[cfg(test)]
mod tests {
    use http::Method;

    use super::*;

    #[test]
    fn test_context_builds_up_stage_by_stage() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("http://somehost/x")
            .body(Bytes::new())
            .unwrap();

        let mut ctx = BatchContext::new("tok".into()).with_requests(vec![req]);
        assert_eq!(ctx.boundary(), "tok");

        let requests = ctx.take_requests();
        assert_eq!(requests.len(), 1);
        assert!(ctx.take_requests().is_empty());

        let ctx = ctx.with_responses(vec![Response::new(Bytes::new())]);
        assert_eq!(ctx.responses().len(), 1);
    }
}
