//! The XML-RPC value model.
//!
//! # Design
//! `Value` is a closed sum type over the five supported wire types plus an
//! explicit `Unset` variant. A decoded `<value></value>` with no typed child
//! becomes `Unset`, and every accessor falls back to the zero value of the
//! requested type instead of failing, so callers can either check
//! `value_type()` first or rely on the fallback.
//!
//! Navigation (`index`, `field`, `field_by_name`) returns `Option<&Value>`.
//! `OptionValueExt` gives that option the same accessors, which keeps chains
//! like `v.index(0).field_by_name("id").as_int()` total.

use serde_json::{Map, Number};

use crate::error::{Error, Result};

/// Which variant a `Value` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Unknown,
    Array,
    Bool,
    Int,
    String,
    Struct,
}

/// A single XML-RPC value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Value {
    /// `<value></value>` with no typed child.
    #[default]
    Unset,
    Array(Vec<Value>),
    /// Encoded as `<boolean>1</boolean>` / `<boolean>0</boolean>`.
    Bool(bool),
    /// XML-RPC `<int>` (alias `<i4>`) is a 4-byte signed integer.
    Int(i32),
    String(String),
    /// Members keep wire order. Duplicate names are allowed; lookups return
    /// the first match.
    Struct(Vec<StructMember>),
}

/// A named member of a struct value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructMember {
    pub name: String,
    pub value: Value,
}

impl StructMember {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Value {
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(items.into_iter().collect())
    }

    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    pub fn int(i: i32) -> Self {
        Value::Int(i)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn structure(members: impl IntoIterator<Item = StructMember>) -> Self {
        Value::Struct(members.into_iter().collect())
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Unset => ValueType::Unknown,
            Value::Array(_) => ValueType::Array,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::String(_) => ValueType::String,
            Value::Struct(_) => ValueType::Struct,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Unset)
    }

    /// Array items, or an empty slice for any other variant.
    pub fn as_array(&self) -> &[Value] {
        match self {
            Value::Array(items) => items,
            _ => &[],
        }
    }

    pub fn as_bool(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    pub fn as_int(&self) -> i32 {
        match self {
            Value::Int(i) => *i,
            _ => 0,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Value::String(s) => s,
            _ => "",
        }
    }

    pub fn as_struct_members(&self) -> &[StructMember] {
        match self {
            Value::Struct(members) => members,
            _ => &[],
        }
    }

    /// The `i`-th array item. `None` when out of range or not an array.
    pub fn index(&self, i: usize) -> Option<&Value> {
        self.as_array().get(i)
    }

    /// The `i`-th struct member. `None` when out of range or not a struct.
    pub fn field(&self, i: usize) -> Option<&StructMember> {
        self.as_struct_members().get(i)
    }

    /// The value of the first member called `name`.
    pub fn field_by_name(&self, name: &str) -> Option<&Value> {
        self.as_struct_members()
            .iter()
            .find(|m| m.name == name)
            .map(|m| &m.value)
    }

    /// Convert into an untyped JSON tree for callers that do not want to
    /// match on variants.
    ///
    /// Structs become objects; when a name repeats, the first member wins.
    /// Fails with `Error::UnsupportedValue` if an `Unset` value appears
    /// anywhere in the tree.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(match self {
            Value::Unset => return Err(Error::UnsupportedValue),
            Value::Array(items) => serde_json::Value::Array(
                items.iter().map(Value::to_json).collect::<Result<Vec<_>>>()?,
            ),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number(Number::from(*i)),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Struct(members) => {
                let mut object = Map::with_capacity(members.len());
                for member in members {
                    let converted = member.value.to_json()?;
                    if !object.contains_key(&member.name) {
                        object.insert(member.name.clone(), converted);
                    }
                }
                serde_json::Value::Object(object)
            }
        })
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Vec<StructMember>> for Value {
    fn from(members: Vec<StructMember>) -> Self {
        Value::Struct(members)
    }
}

/// Accessors for a value that may be absent, e.g. the result of a void call
/// or of an out-of-range `index`. An absent value behaves like `Value::Unset`.
pub trait OptionValueExt<'a> {
    fn value_type(self) -> ValueType;
    fn as_array(self) -> &'a [Value];
    fn as_bool(self) -> bool;
    fn as_int(self) -> i32;
    fn as_str(self) -> &'a str;
    fn as_struct_members(self) -> &'a [StructMember];
    fn index(self, i: usize) -> Option<&'a Value>;
    fn field(self, i: usize) -> Option<&'a StructMember>;
    fn field_by_name(self, name: &str) -> Option<&'a Value>;
}

impl<'a> OptionValueExt<'a> for Option<&'a Value> {
    fn value_type(self) -> ValueType {
        self.map_or(ValueType::Unknown, Value::value_type)
    }

    fn as_array(self) -> &'a [Value] {
        self.map(Value::as_array).unwrap_or_default()
    }

    fn as_bool(self) -> bool {
        self.is_some_and(Value::as_bool)
    }

    fn as_int(self) -> i32 {
        self.map_or(0, Value::as_int)
    }

    fn as_str(self) -> &'a str {
        self.map_or("", Value::as_str)
    }

    fn as_struct_members(self) -> &'a [StructMember] {
        self.map(Value::as_struct_members).unwrap_or_default()
    }

    fn index(self, i: usize) -> Option<&'a Value> {
        self.and_then(|v| v.index(i))
    }

    fn field(self, i: usize) -> Option<&'a StructMember> {
        self.and_then(|v| v.field(i))
    }

    fn field_by_name(self, name: &str) -> Option<&'a Value> {
        self.and_then(|v| v.field_by_name(name))
    }
}
