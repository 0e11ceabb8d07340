//! The `methodCall` envelope.

use crate::error::Result;
use crate::value::Value;
use crate::wire::{self, malformed, HEADER};

/// A method call: a method name and its ordered parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    method: String,
    params: Vec<Value>,
}

impl Request {
    pub fn new(method: impl Into<String>, params: impl IntoIterator<Item = Value>) -> Self {
        Self {
            method: method.into(),
            params: params.into_iter().collect(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Serialize to wire bytes. `<params>` is left out entirely when there
    /// are no parameters.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = String::from(HEADER);
        out.push_str("<methodCall><methodName>");
        wire::write_escaped(&mut out, &self.method);
        out.push_str("</methodName>");
        if !self.params.is_empty() {
            out.push_str("<params>");
            for param in &self.params {
                out.push_str("<param>");
                wire::write_value(&mut out, param);
                out.push_str("</param>");
            }
            out.push_str("</params>");
        }
        out.push_str("</methodCall>");
        out.into_bytes()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let root = wire::parse_document(bytes)?;
        root.expect_name("methodCall")?;

        let mut method = None;
        let mut params = None;
        for child in &root.children {
            match child.name.as_str() {
                "methodName" if method.is_none() => {
                    wire::expect_leaf(child)?;
                    method = Some(child.text.clone());
                }
                "params" if params.is_none() => {
                    let params = params.insert(Vec::new());
                    for param in &child.children {
                        params.push(wire::read_value(param.expect_name("param")?.single_child("value")?)?);
                    }
                }
                other => return Err(malformed(format!("unexpected <{other}> in <methodCall>"))),
            }
        }

        let method = method.ok_or_else(|| malformed("<methodCall> is missing <methodName>"))?;
        Ok(Self {
            method,
            params: params.unwrap_or_default(),
        })
    }
}
