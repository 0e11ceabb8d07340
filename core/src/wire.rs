//! Wire-level XML helpers shared by the request and response envelopes.
//!
//! # Design
//! Encoding writes straight into a `String`: the grammar is small and the
//! output must match peers byte for byte (no encoding attribute on the
//! declaration, no whitespace, `<value></value>` instead of `<value/>`).
//! Decoding runs xml-rs into a minimal element tree first, then walks the
//! tree with strict element-name checks. Whitespace between elements is
//! tolerated so that indented peers decode.

use xml::escape::escape_str_pcdata;
use xml::reader::{ParserConfig, XmlEvent};

use crate::error::{Error, Result};
use crate::value::{StructMember, Value};

/// Prefix of every encoded envelope.
pub(crate) const HEADER: &str = r#"<?xml version="1.0"?>"#;

pub(crate) fn write_value(out: &mut String, value: &Value) {
    out.push_str("<value>");
    match value {
        Value::Unset => {}
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                write_value(out, item);
            }
            out.push_str("</data></array>");
        }
        Value::Bool(b) => {
            out.push_str(if *b { "<boolean>1</boolean>" } else { "<boolean>0</boolean>" });
        }
        Value::Int(i) => {
            out.push_str("<int>");
            out.push_str(&i.to_string());
            out.push_str("</int>");
        }
        Value::String(s) => {
            out.push_str("<string>");
            out.push_str(&escape_str_pcdata(s));
            out.push_str("</string>");
        }
        Value::Struct(members) => {
            out.push_str("<struct>");
            for member in members {
                out.push_str("<member><name>");
                out.push_str(&escape_str_pcdata(&member.name));
                out.push_str("</name>");
                write_value(out, &member.value);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
    }
    out.push_str("</value>");
}

pub(crate) fn write_escaped(out: &mut String, text: &str) {
    out.push_str(&escape_str_pcdata(text));
}

/// A parsed element: local name, child elements, and its concatenated
/// character data.
#[derive(Debug, Default)]
pub(crate) struct Element {
    pub name: String,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    /// Fail unless this element is called `name`.
    pub fn expect_name(&self, name: &str) -> Result<&Self> {
        if self.name == name {
            Ok(self)
        } else {
            Err(malformed(format!("expected <{name}>, found <{}>", self.name)))
        }
    }

    /// The only child, which must be called `name`.
    pub fn single_child(&self, name: &str) -> Result<&Element> {
        match self.children.as_slice() {
            [child] => child.expect_name(name),
            [] => Err(malformed(format!("<{}> is missing <{name}>", self.name))),
            _ => Err(malformed(format!("<{}> must contain exactly one <{name}>", self.name))),
        }
    }
}

pub(crate) fn malformed(message: impl Into<String>) -> Error {
    Error::MalformedEnvelope(message.into())
}

/// Elements nested deeper than this are rejected before the tree is built,
/// which also bounds the recursion in `read_value`.
pub(crate) const MAX_DEPTH: usize = 256;

/// Parse a whole document and return its root element.
///
/// Nothing but comments and whitespace may follow the root element.
/// Prefixed or namespaced elements are rejected.
pub(crate) fn parse_document(bytes: &[u8]) -> Result<Element> {
    // Some peers emit a newline before the declaration.
    let reader = ParserConfig::new()
        .ignore_comments(true)
        .cdata_to_characters(true)
        .create_reader(bytes.trim_ascii_start());

    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;
    for event in reader {
        match event.map_err(|e| malformed(e.to_string()))? {
            XmlEvent::StartElement { name, .. } => {
                if root.is_some() {
                    return Err(malformed(format!("unexpected <{name}> after the root element")));
                }
                if name.prefix.is_some() || name.namespace.is_some() {
                    return Err(malformed(format!("namespaced element <{name}> is not allowed")));
                }
                if stack.len() >= MAX_DEPTH {
                    return Err(malformed(format!("elements nested deeper than {MAX_DEPTH}")));
                }
                stack.push(Element::new(name.local_name));
            }
            XmlEvent::EndElement { .. } => {
                let element = stack
                    .pop()
                    .ok_or_else(|| malformed("unbalanced end element"))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            XmlEvent::Characters(text) | XmlEvent::Whitespace(text) | XmlEvent::CData(text) => {
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err(malformed("text outside the root element")),
                }
            }
            XmlEvent::EndDocument => break,
            _ => {}
        }
    }
    root.ok_or_else(|| malformed("document has no root element"))
}

/// Decode a `<value>` element.
pub(crate) fn read_value(element: &Element) -> Result<Value> {
    element.expect_name("value")?;
    let typed = match element.children.as_slice() {
        [] if element.text.trim().is_empty() => return Ok(Value::Unset),
        // Untyped character data defaults to string.
        [] => return Ok(Value::String(element.text.clone())),
        [typed] => typed,
        _ => return Err(malformed("<value> holds more than one typed element")),
    };

    match typed.name.as_str() {
        "array" => {
            let data = typed.single_child("data")?;
            let items = data
                .children
                .iter()
                .map(read_value)
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Array(items))
        }
        "boolean" => {
            expect_leaf(typed)?;
            match typed.text.trim() {
                "1" => Ok(Value::Bool(true)),
                "0" => Ok(Value::Bool(false)),
                other => Err(malformed(format!("invalid boolean {other:?}"))),
            }
        }
        "int" | "i4" => {
            expect_leaf(typed)?;
            let text = typed.text.trim();
            text.parse::<i32>()
                .map(Value::Int)
                .map_err(|_| malformed(format!("invalid int {text:?}")))
        }
        "string" => {
            expect_leaf(typed)?;
            Ok(Value::String(typed.text.clone()))
        }
        "struct" => {
            let members = typed
                .children
                .iter()
                .map(read_member)
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Struct(members))
        }
        other => Err(malformed(format!("unsupported value type <{other}>"))),
    }
}

fn read_member(element: &Element) -> Result<StructMember> {
    element.expect_name("member")?;
    match element.children.as_slice() {
        [name, value] => {
            name.expect_name("name")?;
            expect_leaf(name)?;
            Ok(StructMember {
                name: name.text.clone(),
                value: read_value(value)?,
            })
        }
        _ => Err(malformed("<member> must contain <name> and <value>")),
    }
}

pub(crate) fn expect_leaf(element: &Element) -> Result<()> {
    if element.children.is_empty() {
        Ok(())
    } else {
        Err(malformed(format!("<{}> must not contain elements", element.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &Value) -> String {
        let mut out = String::new();
        write_value(&mut out, value);
        out
    }

    fn decode(xml: &str) -> Result<Value> {
        read_value(&parse_document(xml.as_bytes())?)
    }

    #[test]
    fn writes_each_variant() {
        assert_eq!(encode(&Value::Unset), "<value></value>");
        assert_eq!(encode(&Value::Bool(true)), "<value><boolean>1</boolean></value>");
        assert_eq!(encode(&Value::Bool(false)), "<value><boolean>0</boolean></value>");
        assert_eq!(encode(&Value::Int(-7)), "<value><int>-7</int></value>");
        assert_eq!(encode(&Value::string("hi")), "<value><string>hi</string></value>");
        assert_eq!(
            encode(&Value::array([Value::Int(1), Value::Unset])),
            "<value><array><data><value><int>1</int></value><value></value></data></array></value>"
        );
        assert_eq!(
            encode(&Value::structure([StructMember::new("a", 1)])),
            "<value><struct><member><name>a</name><value><int>1</int></value></member></struct></value>"
        );
    }

    #[test]
    fn escapes_markup_in_text() {
        assert_eq!(
            encode(&Value::string("a<b & c")),
            "<value><string>a&lt;b &amp; c</string></value>"
        );
        assert_eq!(decode(&encode(&Value::string("x > y"))).unwrap(), Value::string("x > y"));
    }

    #[test]
    fn reads_indented_values() {
        let xml = "<value>\n  <struct>\n    <member>\n      <name>k</name>\n      <value><i4> 12 </i4></value>\n    </member>\n  </struct>\n</value>";
        assert_eq!(
            decode(xml).unwrap(),
            Value::structure([StructMember::new("k", 12)])
        );
    }

    #[test]
    fn string_keeps_surrounding_whitespace() {
        assert_eq!(
            decode("<value><string>  padded  </string></value>").unwrap(),
            Value::string("  padded  ")
        );
        assert_eq!(decode("<value><string></string></value>").unwrap(), Value::string(""));
    }

    #[test]
    fn untyped_text_is_a_string_and_empty_is_unset() {
        assert_eq!(decode("<value>plain</value>").unwrap(), Value::string("plain"));
        assert_eq!(decode("<value></value>").unwrap(), Value::Unset);
        assert_eq!(decode("<value>\n  </value>").unwrap(), Value::Unset);
    }

    #[test]
    fn empty_array_and_struct() {
        assert_eq!(decode("<value><array><data/></array></value>").unwrap(), Value::array([]));
        assert_eq!(decode("<value><struct></struct></value>").unwrap(), Value::structure([]));
    }

    #[test]
    fn rejects_bad_scalars() {
        assert!(matches!(decode("<value><boolean>true</boolean></value>"), Err(Error::MalformedEnvelope(_))));
        assert!(matches!(decode("<value><int>4.5</int></value>"), Err(Error::MalformedEnvelope(_))));
        assert!(matches!(decode("<value><int>99999999999</int></value>"), Err(Error::MalformedEnvelope(_))));
        assert!(matches!(decode("<value><double>1.5</double></value>"), Err(Error::MalformedEnvelope(_))));
    }

    #[test]
    fn rejects_broken_structure() {
        assert!(matches!(decode("<value><int>1</int><int>2</int></value>"), Err(Error::MalformedEnvelope(_))));
        assert!(matches!(decode("<value><array></array></value>"), Err(Error::MalformedEnvelope(_))));
        assert!(matches!(
            decode("<value><struct><member><value><int>1</int></value></member></struct></value>"),
            Err(Error::MalformedEnvelope(_))
        ));
        assert!(matches!(decode("<value><int>1</int>"), Err(Error::MalformedEnvelope(_))));
    }

    fn nested_arrays(depth: usize) -> String {
        let mut xml = String::new();
        for _ in 0..depth {
            xml.push_str("<value><array><data>");
        }
        for _ in 0..depth {
            xml.push_str("</data></array></value>");
        }
        xml
    }

    #[test]
    fn nesting_limit() {
        // Each level opens three elements.
        let within = MAX_DEPTH / 3;
        assert!(decode(&nested_arrays(within)).is_ok());
        assert!(matches!(decode(&nested_arrays(within + 1)), Err(Error::MalformedEnvelope(_))));
        assert!(matches!(decode(&nested_arrays(10_000)), Err(Error::MalformedEnvelope(_))));
    }

    #[test]
    fn rejects_content_after_root() {
        assert!(matches!(decode("<value>1</value><junk/>"), Err(Error::MalformedEnvelope(_))));
        assert!(matches!(decode("<value>1</value>trailing"), Err(Error::MalformedEnvelope(_))));
        assert!(decode("<value>1</value>\n<!-- done -->\n").is_ok());
    }

    #[test]
    fn rejects_prefixed_elements() {
        assert!(matches!(decode("<x:value xmlns:x=\"urn:x\">1</x:value>"), Err(Error::MalformedEnvelope(_))));
        assert!(matches!(
            decode("<value xmlns=\"urn:x\"><int>1</int></value>"),
            Err(Error::MalformedEnvelope(_))
        ));
    }
}
