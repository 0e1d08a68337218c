//! # httpbatch-axum-client
//!
//! Client façade for the HTTP request batching protocol: bundle a sequence
//! of requests into one `multipart/mixed` envelope request, and unpack a
//! batch response back into the individual responses, in order.
//!
//! Sending the envelope over the network is the caller's concern: any
//! HTTP client that can POST a `http::Request<Bytes>` works.
//!
//! ```no_run
//! use bytes::Bytes;
//! use http::Request;
//! use httpbatch_axum_client::BatchClient;
//!
//! # fn main() -> Result<(), httpbatch_axum_client::ClientError> {
//! let client = BatchClient::new("http://batcher/batch")?;
//! let requests = vec![Request::get("http://somehost/resource").body(Bytes::new()).unwrap()];
//! let envelope = client.build_request(&requests)?;
//! // POST `envelope` with your transport, then:
//! // let responses = client.unpack_response(fat_response)?;
//! # let _ = envelope;
//! # Ok(())
//! # }
//! ```

mod client;
mod error;

pub use client::*;
pub use error::*;
