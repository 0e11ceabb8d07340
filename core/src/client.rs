//! Synchronous XML-RPC client.
//!
//! # Design
//! `Client` holds only an endpoint URL and the injected transport, and keeps
//! no state between calls. Each call is split into `build_call`, which
//! produces an `HttpRequest`, and `parse_call`, which consumes an
//! `HttpResponse`. `call` runs both around a single `Transport::post` with
//! no retry and no timeout of its own.

use log::{debug, trace};

use crate::error::{Result, TransportError};
use crate::http::{HttpRequest, HttpResponse, Transport, CONTENT_TYPE};
use crate::request::Request;
use crate::response::Response;
use crate::value::Value;

const USER_AGENT: &str = concat!("xmlrpc-core/", env!("CARGO_PKG_VERSION"));

/// An XML-RPC endpoint bound to a transport.
#[derive(Debug, Clone)]
pub struct Client<T> {
    url: String,
    transport: T,
}

impl<T> Client<T> {
    pub fn new(url: &str, transport: T) -> Self {
        Self {
            url: url.to_string(),
            transport,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_call(&self, method: &str, params: impl IntoIterator<Item = Value>) -> HttpRequest {
        build_request(&self.url, &Request::new(method, params))
    }

    pub fn parse_call(&self, response: HttpResponse) -> Result<Option<Value>> {
        parse_response(response)
    }
}

impl<T: Transport> Client<T> {
    /// Call `method` and wait for its result.
    ///
    /// A remote fault comes back as `Error::Fault`; a void call as `Ok(None)`.
    pub fn call(&self, method: &str, params: impl IntoIterator<Item = Value>) -> Result<Option<Value>> {
        call(&self.transport, &self.url, method, params)
    }
}

/// Perform a single XML-RPC exchange against `url` through `transport`.
pub fn call<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    method: &str,
    params: impl IntoIterator<Item = Value>,
) -> Result<Option<Value>> {
    let request = build_request(url, &Request::new(method, params));
    debug!("XML-RPC call {method} to {url}");
    trace!("request body: {}", String::from_utf8_lossy(&request.body));

    let response = transport.post(&request)?;
    trace!(
        "response {} body: {}",
        response.status,
        String::from_utf8_lossy(&response.body)
    );
    parse_response(response)
}

fn build_request(url: &str, request: &Request) -> HttpRequest {
    HttpRequest {
        url: url.to_string(),
        headers: vec![
            ("content-type".to_string(), CONTENT_TYPE.to_string()),
            ("user-agent".to_string(), USER_AGENT.to_string()),
        ],
        body: request.encode(),
    }
}

fn parse_response(response: HttpResponse) -> Result<Option<Value>> {
    check_status(&response)?;
    Response::decode(&response.body)
}

/// Map non-2xx status codes to `TransportError::Status`.
fn check_status(response: &HttpResponse) -> std::result::Result<(), TransportError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    Err(TransportError::Status {
        status: response.status,
        body: String::from_utf8_lossy(&response.body).into_owned(),
    })
}
