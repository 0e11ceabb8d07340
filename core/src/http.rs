//! HTTP types and the transport seam.
//!
//! # Design
//! The codec never touches the network. `Client::build_call` produces an
//! `HttpRequest`, something that implements `Transport` performs the POST,
//! and `Client::parse_call` consumes the `HttpResponse`. Timeouts, TLS,
//! pooling and retries belong to the transport.

use crate::error::TransportError;

/// Content type of every XML-RPC request.
pub const CONTENT_TYPE: &str = "text/xml";

/// A POST request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// First header called `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Performs one HTTP POST.
///
/// Implementations return non-2xx responses as data; the client turns them
/// into `TransportError::Status`.
pub trait Transport {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).post(request)
    }
}
