//! Error types for the XML-RPC codec and client.
//!
//! # Design
//! A remote `Fault` is a valid protocol outcome, so it gets its own variant
//! separate from `MalformedFault`: callers can tell "the peer reported an
//! error" from "the peer's error report was itself broken." Transport
//! failures, including non-2xx statuses, are wrapped unchanged.

use thiserror::Error;

use crate::fault::Fault;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by encoding, decoding and calling.
#[derive(Debug, Error)]
pub enum Error {
    /// The XML is not well-formed, the root element is wrong, or an element
    /// does not follow the XML-RPC grammar.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// A `<fault>` was present but its value is not a struct with an Int
    /// `faultCode` and a String `faultString`.
    #[error("malformed fault: {0}")]
    MalformedFault(String),

    /// The remote peer answered with a well-formed fault.
    #[error(transparent)]
    Fault(#[from] Fault),

    /// The HTTP exchange failed.
    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    /// An unset value was found where a concrete type is required.
    #[error("unsupported value: unset value has no concrete type")]
    UnsupportedValue,
}

/// Failures reported by a `Transport` implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request could not be sent or the response could not be read.
    #[error("{0}")]
    Io(String),
}
