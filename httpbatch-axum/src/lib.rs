//! # httpbatch-axum
//!
//! An [Axum](https://github.com/tokio-rs/axum) server for the HTTP request
//! batching protocol: clients POST a `multipart/mixed` envelope of serialized
//! HTTP requests to a single endpoint, the server executes them strictly in
//! order through an injected transport, and answers with a `multipart/mixed`
//! envelope of the responses in the same order.
//!
//! The server is a fixed pipeline of stages (validate, extract, execute,
//! pack), each of which is a swappable strategy:
//!
//! ```no_run
//! use httpbatch_axum::BatchService;
//!
//! let app = BatchService::default().into_router("/batch");
//! # let _ = app;
//! ```
//!
//! Substitute any stage for testing or alternative policies:
//!
//! ```no_run
//! use httpbatch_axum::{BatchPipeline, BatchService, HyperTransport, SerialExecutor};
//! use httpbatch_axum::{MultipartExtractor, MultipartPacker};
//!
//! let pipeline = BatchPipeline::new(
//!     MultipartExtractor,
//!     SerialExecutor::new(HyperTransport::new()),
//!     MultipartPacker,
//! );
//! let app = BatchService::new(pipeline).into_router("/batch");
//! # let _ = app;
//! ```

pub mod context;
pub mod error;
pub mod executor;
pub mod extract;
pub mod pack;
pub mod pipeline;
pub mod service;
pub mod transport;

pub use context::BatchContext;
pub use error::BatchError;
pub use executor::{ExecuteError, RequestExecutor, SerialExecutor};
pub use extract::{MultipartExtractor, RequestExtractor};
pub use pack::{MultipartPacker, ResponsePacker};
pub use pipeline::BatchPipeline;
pub use service::BatchService;
pub use transport::{HyperTransport, Transport, TransportError};
