use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    routing::post,
    Router,
};
use log::debug;
use tokio::net::TcpListener;
use xmlrpc_core::{OptionValueExt, Request, Response, Value};

/// Path the endpoint is served on.
pub const RPC_PATH: &str = "/RPC2";

pub const FAULT_INVALID_PARAMS: i32 = 3;
pub const FAULT_TOO_MANY_PARAMS: i32 = 4;
pub const FAULT_OUT_OF_RANGE: i32 = 5;
pub const FAULT_METHOD_NOT_FOUND: i32 = -32601;
pub const FAULT_PARSE_ERROR: i32 = -32700;

/// A fault struct without `faultString`, for exercising client error paths.
const MALFORMED_FAULT: &str = r#"<?xml version="1.0"?><methodResponse><fault><value><struct><member><name>faultCode</name><value><int>1</int></value></member></struct></value></fault></methodResponse>"#;

const STATES: [&str; 50] = [
    "Alabama", "Alaska", "Arizona", "Arkansas", "California", "Colorado", "Connecticut",
    "Delaware", "Florida", "Georgia", "Hawaii", "Idaho", "Illinois", "Indiana", "Iowa", "Kansas",
    "Kentucky", "Louisiana", "Maine", "Maryland", "Massachusetts", "Michigan", "Minnesota",
    "Mississippi", "Missouri", "Montana", "Nebraska", "Nevada", "New Hampshire", "New Jersey",
    "New Mexico", "New York", "North Carolina", "North Dakota", "Ohio", "Oklahoma", "Oregon",
    "Pennsylvania", "Rhode Island", "South Carolina", "South Dakota", "Tennessee", "Texas", "Utah",
    "Vermont", "Virginia", "Washington", "West Virginia", "Wisconsin", "Wyoming",
];

pub type Method = fn(&[Value]) -> Response;

pub type Methods = Arc<HashMap<&'static str, Method>>;

pub fn methods() -> Methods {
    let mut table: HashMap<&'static str, Method> = HashMap::new();
    table.insert("system.echo", echo);
    table.insert("system.void", void);
    table.insert("math.add", add);
    table.insert("examples.getStateName", get_state_name);
    table.insert("test.fault", fault);
    Arc::new(table)
}

pub fn app() -> Router {
    Router::new()
        .route(RPC_PATH, post(handle))
        .with_state(methods())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn handle(
    State(methods): State<Methods>,
    body: Bytes,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], Vec<u8>) {
    let request = match Request::decode(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!("rejecting undecodable call: {e}");
            return xml_reply(Response::fault(FAULT_PARSE_ERROR, format!("parse error: {e}")).encode());
        }
    };
    debug!("dispatching {} with {} params", request.method(), request.params().len());

    match request.method() {
        "test.malformedFault" => xml_reply(MALFORMED_FAULT.as_bytes().to_vec()),
        "test.httpError" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            b"internal error".to_vec(),
        ),
        name => {
            let response = match methods.get(name) {
                Some(method) => method(request.params()),
                None => Response::fault(FAULT_METHOD_NOT_FOUND, format!("method not found: {name}")),
            };
            xml_reply(response.encode())
        }
    }
}

fn xml_reply(body: Vec<u8>) -> (StatusCode, [(header::HeaderName, &'static str); 1], Vec<u8>) {
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/xml")], body)
}

fn echo(params: &[Value]) -> Response {
    Response::new(params.first().cloned())
}

fn void(_params: &[Value]) -> Response {
    Response::new(None)
}

fn add(params: &[Value]) -> Response {
    let mut sum: i32 = 0;
    for param in params {
        let Value::Int(i) = param else {
            return Response::fault(FAULT_INVALID_PARAMS, "Invalid parameter type.");
        };
        sum = match sum.checked_add(*i) {
            Some(sum) => sum,
            None => return Response::fault(FAULT_OUT_OF_RANGE, "Integer overflow."),
        };
    }
    Response::new(Some(Value::Int(sum)))
}

fn get_state_name(params: &[Value]) -> Response {
    let number = match params {
        [Value::Int(n)] => *n,
        [_] | [] => return Response::fault(FAULT_INVALID_PARAMS, "Invalid parameter type."),
        _ => return Response::fault(FAULT_TOO_MANY_PARAMS, "Too many parameters."),
    };
    match usize::try_from(number).ok().and_then(|n| n.checked_sub(1)).and_then(|i| STATES.get(i)) {
        Some(name) => Response::new(Some(Value::string(*name))),
        None => Response::fault(FAULT_OUT_OF_RANGE, "State number out of range."),
    }
}

/// Answers with the fault described by `(code, message)`.
fn fault(params: &[Value]) -> Response {
    Response::fault(params.first().as_int(), params.get(1).as_str())
}
