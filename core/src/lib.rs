//! XML-RPC codec and synchronous client.
//!
//! # Overview
//! Converts a small dynamic value model to and from the XML-RPC wire format,
//! frames it into `methodCall` / `methodResponse` envelopes, and offers a
//! `call` primitive that performs one request/response exchange through an
//! injected HTTP transport.
//!
//! # Design
//! - `Value` is a sum type with an explicit `Unset` variant; accessors never
//!   fail and fall back to zero values.
//! - `Request` and `Response` are immutable once built and encode to the
//!   exact byte layout reference peers produce.
//! - A remote fault is `Error::Fault`; a fault that cannot be read is
//!   `Error::MalformedFault`.
//! - The client is stateless. The HTTP round-trip goes through the
//!   `Transport` trait, so tests can swap in a double and callers can
//!   configure timeouts on their own agent.

pub mod client;
pub mod error;
pub mod fault;
pub mod http;
pub mod request;
pub mod response;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod value;
mod wire;

pub use client::{call, Client};
pub use error::{Error, Result, TransportError};
pub use fault::Fault;
pub use http::{HttpRequest, HttpResponse, Transport, CONTENT_TYPE};
pub use request::Request;
pub use response::Response;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use value::{OptionValueExt, StructMember, Value, ValueType};
