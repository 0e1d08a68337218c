//! Core envelope types for the HTTP batch protocol.
//!
//! This crate provides shared types and functions used by both the server
//! (`httpbatch-axum`) and client (`httpbatch-axum-client`) crates.
//!
//! ## Modules
//!
//! - [`error`]: Envelope error taxonomy
//! - [`media_type`]: Content-Type parsing and the envelope validation gate
//! - [`wire`]: Raw HTTP/1.x message serialization and parsing
//! - [`multipart`]: multipart/mixed part framing
//! - [`codec`]: Request and response envelope codecs

mod codec;
mod error;
mod media_type;
mod multipart;
mod wire;

pub use codec::*;
pub use error::*;
pub use media_type::*;
pub use multipart::*;
pub use wire::*;
