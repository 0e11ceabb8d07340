//! The `methodResponse` envelope.

use crate::error::{Error, Result};
use crate::fault::Fault;
use crate::value::Value;
use crate::wire::{self, malformed, HEADER};

/// The outcome of a method call.
///
/// XML-RPC allows at most one return value. `Success(None)` is a void call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Success(Option<Value>),
    Fault(Fault),
}

impl Response {
    pub fn new(value: Option<Value>) -> Self {
        Response::Success(value)
    }

    pub fn fault(code: i32, message: impl Into<String>) -> Self {
        Response::Fault(Fault::new(code, message))
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = String::from(HEADER);
        out.push_str("<methodResponse>");
        match self {
            Response::Success(None) => {}
            Response::Success(Some(value)) => {
                out.push_str("<params><param>");
                wire::write_value(&mut out, value);
                out.push_str("</param></params>");
            }
            Response::Fault(fault) => {
                out.push_str("<fault>");
                wire::write_value(&mut out, &fault.to_value());
                out.push_str("</fault>");
            }
        }
        out.push_str("</methodResponse>");
        out.into_bytes()
    }

    /// Parse wire bytes, keeping a well-formed fault as `Response::Fault`.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let root = wire::parse_document(bytes)?;
        root.expect_name("methodResponse")?;

        match root.children.as_slice() {
            [] => Ok(Response::Success(None)),
            [body] => match body.name.as_str() {
                "params" => match body.children.as_slice() {
                    [] => Ok(Response::Success(None)),
                    [param] => {
                        let value = param.expect_name("param")?.single_child("value")?;
                        Ok(Response::Success(Some(wire::read_value(value)?)))
                    }
                    _ => Err(malformed("<methodResponse> may hold at most one <param>")),
                },
                "fault" => {
                    let value = body
                        .single_child("value")
                        .and_then(wire::read_value)
                        .map_err(|e| match e {
                            Error::MalformedEnvelope(reason) => Error::MalformedFault(reason),
                            other => other,
                        })?;
                    Ok(Response::Fault(Fault::from_value(&value)?))
                }
                other => Err(malformed(format!("unexpected <{other}> in <methodResponse>"))),
            },
            _ => Err(malformed("<methodResponse> must hold either <params> or <fault>")),
        }
    }

    /// Parse wire bytes into the call result: the return value, or the
    /// remote fault as `Error::Fault`.
    pub fn decode(bytes: &[u8]) -> Result<Option<Value>> {
        Self::parse(bytes)?.into_result()
    }

    pub fn into_result(self) -> Result<Option<Value>> {
        match self {
            Response::Success(value) => Ok(value),
            Response::Fault(fault) => Err(Error::Fault(fault)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::StructMember;

    const FAULT_XML: &str = r#"<?xml version="1.0"?><methodResponse><fault><value><struct><member><name>faultCode</name><value><int>4</int></value></member><member><name>faultString</name><value><string>Too many parameters.</string></value></member></struct></value></fault></methodResponse>"#;

    fn encoded(response: &Response) -> String {
        String::from_utf8(response.encode()).unwrap()
    }

    #[test]
    fn encode_void() {
        assert_eq!(
            encoded(&Response::new(None)),
            r#"<?xml version="1.0"?><methodResponse></methodResponse>"#
        );
    }

    #[test]
    fn encode_single_value() {
        assert_eq!(
            encoded(&Response::new(Some(Value::string("South Dakota")))),
            r#"<?xml version="1.0"?><methodResponse><params><param><value><string>South Dakota</string></value></param></params></methodResponse>"#
        );
    }

    #[test]
    fn encode_fault() {
        assert_eq!(encoded(&Response::fault(4, "Too many parameters.")), FAULT_XML);
    }

    #[test]
    fn decode_fault_returns_error_and_no_value() {
        let err = Response::decode(FAULT_XML.as_bytes()).unwrap_err();
        match err {
            Error::Fault(fault) => {
                assert_eq!(fault.code(), 4);
                assert_eq!(fault.message(), "Too many parameters.");
            }
            other => panic!("expected fault, got {other:?}"),
        }
    }

    #[test]
    fn decode_indented_fault() {
        let xml = br#"
            <?xml version="1.0"?>
            <methodResponse>
              <fault>
                <value>
                  <struct>
                    <member>
                      <name>faultCode</name>
                      <value><int>4</int></value>
                    </member>
                    <member>
                      <name>faultString</name>
                      <value><string>Too many parameters.</string></value>
                    </member>
                  </struct>
                </value>
              </fault>
            </methodResponse>"#;
        assert_eq!(Response::parse(xml).unwrap(), Response::fault(4, "Too many parameters."));
    }

    #[test]
    fn decode_void_and_empty_params() {
        assert_eq!(
            Response::decode(br#"<?xml version="1.0"?><methodResponse></methodResponse>"#).unwrap(),
            None
        );
        assert_eq!(
            Response::decode(b"<methodResponse><params></params></methodResponse>").unwrap(),
            None
        );
    }

    #[test]
    fn decode_single_value() {
        let xml = b"<methodResponse>\n <params>\n  <param><value><string>South Dakota</string></value></param>\n </params>\n</methodResponse>";
        assert_eq!(Response::decode(xml).unwrap(), Some(Value::string("South Dakota")));
    }

    #[test]
    fn fault_missing_string_is_malformed_fault() {
        let xml = b"<methodResponse><fault><value><struct><member><name>faultCode</name><value><int>4</int></value></member></struct></value></fault></methodResponse>";
        assert!(matches!(Response::decode(xml), Err(Error::MalformedFault(_))));
    }

    #[test]
    fn fault_with_non_struct_value_is_malformed_fault() {
        let xml = b"<methodResponse><fault><value><string>oops</string></value></fault></methodResponse>";
        assert!(matches!(Response::decode(xml), Err(Error::MalformedFault(_))));
        let xml = b"<methodResponse><fault><value><int>x</int></value></fault></methodResponse>";
        assert!(matches!(Response::decode(xml), Err(Error::MalformedFault(_))));
    }

    #[test]
    fn fault_without_single_value_is_malformed_fault() {
        let xml = b"<methodResponse><fault></fault></methodResponse>";
        assert!(matches!(Response::decode(xml), Err(Error::MalformedFault(_))));
        let xml = b"<methodResponse><fault><value></value><value></value></fault></methodResponse>";
        assert!(matches!(Response::decode(xml), Err(Error::MalformedFault(_))));
    }

    #[test]
    fn rejects_multiple_params_and_mixed_bodies() {
        let xml = b"<methodResponse><params><param><value><int>1</int></value></param><param><value><int>2</int></value></param></params></methodResponse>";
        assert!(matches!(Response::decode(xml), Err(Error::MalformedEnvelope(_))));

        let xml = b"<methodResponse><params></params><fault><value></value></fault></methodResponse>";
        assert!(matches!(Response::decode(xml), Err(Error::MalformedEnvelope(_))));
    }

    #[test]
    fn rejects_wrong_root() {
        let req = crate::request::Request::new("m", []);
        assert!(matches!(Response::decode(&req.encode()), Err(Error::MalformedEnvelope(_))));
    }

    #[test]
    fn round_trips_each_shape() {
        let cases = [
            Response::new(None),
            Response::new(Some(Value::Unset)),
            Response::new(Some(Value::structure([
                StructMember::new("ok", true),
                StructMember::new("items", Value::array([Value::int(1), Value::string("two")])),
            ]))),
            Response::fault(-32601, "method not found"),
        ];
        for response in cases {
            assert_eq!(Response::parse(&response.encode()).unwrap(), response);
        }
    }
}
