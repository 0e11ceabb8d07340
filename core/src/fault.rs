//! The XML-RPC fault, and its bridge to the value model.

use std::fmt;

use crate::error::{Error, Result};
use crate::value::{StructMember, Value};

const FAULT_CODE: &str = "faultCode";
const FAULT_STRING: &str = "faultString";

/// An application-level error reported by the remote peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    code: i32,
    message: String,
}

impl Fault {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The canonical `{faultCode, faultString}` struct, in that order.
    pub fn to_value(&self) -> Value {
        Value::Struct(vec![
            StructMember::new(FAULT_CODE, Value::Int(self.code)),
            StructMember::new(FAULT_STRING, Value::String(self.message.clone())),
        ])
    }

    /// Rebuild a fault from a decoded fault struct.
    ///
    /// Members are looked up by name, so peers that send `faultString` first
    /// are accepted.
    pub fn from_value(value: &Value) -> Result<Self> {
        if !matches!(value, Value::Struct(_)) {
            return Err(Error::MalformedFault(format!(
                "expected a struct, found {:?}",
                value.value_type()
            )));
        }
        let code = match value.field_by_name(FAULT_CODE) {
            Some(Value::Int(code)) => *code,
            Some(other) => {
                return Err(Error::MalformedFault(format!(
                    "{FAULT_CODE} must be an int, found {:?}",
                    other.value_type()
                )))
            }
            None => return Err(Error::MalformedFault(format!("missing {FAULT_CODE}"))),
        };
        let message = match value.field_by_name(FAULT_STRING) {
            Some(Value::String(message)) => message.clone(),
            Some(other) => {
                return Err(Error::MalformedFault(format!(
                    "{FAULT_STRING} must be a string, found {:?}",
                    other.value_type()
                )))
            }
            None => return Err(Error::MalformedFault(format!("missing {FAULT_STRING}"))),
        };
        Ok(Self { code, message })
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fault: {} (code: {})", self.message, self.code)
    }
}

impl std::error::Error for Fault {}
