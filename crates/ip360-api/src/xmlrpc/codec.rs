// XML-RPC wire codec
//
// Encodes method calls / responses by writing XML text directly and decodes
// them through a small element tree built from `quick-xml` events. The set
// of documents is tiny (methodCall, methodResponse, fault), so a tree is
// simpler to interpret than a streaming state machine.

use std::fmt::Write;

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};

use crate::error::Error;
use crate::xmlrpc::value::Value;

/// An XML-RPC request: method name plus positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub method: String,
    pub params: Vec<Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }

    /// Render the `<methodCall>` document.
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\"?><methodCall><methodName>");
        out.push_str(&escape(self.method.as_str()));
        out.push_str("</methodName><params>");
        for param in &self.params {
            out.push_str("<param>");
            write_value(&mut out, param);
            out.push_str("</param>");
        }
        out.push_str("</params></methodCall>");
        out
    }

    /// Parse a `<methodCall>` document.
    pub fn parse(xml: &str) -> Result<Self, Error> {
        let root = parse_tree(xml)?;
        if root.name != "methodCall" {
            return Err(codec_err(format!("expected <methodCall>, found <{}>", root.name)));
        }
        let method = root
            .child("methodName")
            .map(|n| n.text.trim().to_owned())
            .ok_or_else(|| codec_err("missing <methodName>"))?;
        let params = match root.child("params") {
            Some(params) => decode_params(params)?,
            None => Vec::new(),
        };
        Ok(Self { method, params })
    }
}

/// Render a successful `<methodResponse>` carrying one value.
pub fn encode_response(value: &Value) -> String {
    let mut out = String::from("<?xml version=\"1.0\"?><methodResponse><params><param>");
    write_value(&mut out, value);
    out.push_str("</param></params></methodResponse>");
    out
}

/// Render a fault `<methodResponse>`.
pub fn encode_fault(code: i64, message: &str) -> String {
    let fault = Value::structure([
        ("faultCode", Value::Int(code)),
        ("faultString", Value::from(message)),
    ]);
    let mut out = String::from("<?xml version=\"1.0\"?><methodResponse><fault>");
    write_value(&mut out, &fault);
    out.push_str("</fault></methodResponse>");
    out
}

/// Decode a `<methodResponse>`.
///
/// A `<fault>` reply becomes [`Error::Fault`] with the server's code and string.
pub fn decode_response(xml: &str) -> Result<Value, Error> {
    let root = parse_tree(xml)?;
    if root.name != "methodResponse" {
        return Err(codec_err(format!(
            "expected <methodResponse>, found <{}>",
            root.name
        )));
    }

    if let Some(fault) = root.child("fault") {
        let value = fault
            .child("value")
            .ok_or_else(|| codec_err("<fault> without <value>"))?;
        return Err(decode_fault(&decode_value(value)?));
    }

    let params = root
        .child("params")
        .ok_or_else(|| codec_err("<methodResponse> without <params> or <fault>"))?;
    decode_params(params)?
        .into_iter()
        .next()
        .ok_or_else(|| codec_err("<params> without a <param>"))
}

fn decode_fault(value: &Value) -> Error {
    let members = value.as_struct();
    let code = members
        .and_then(|m| m.get("faultCode"))
        .and_then(Value::as_i64)
        .unwrap_or_default();
    let message = members
        .and_then(|m| m.get("faultString"))
        .map(ToString::to_string)
        .unwrap_or_default();
    Error::Fault { code, message }
}

// ── Encoding ─────────────────────────────────────────────────────────

fn write_value(out: &mut String, value: &Value) {
    out.push_str("<value>");
    match value {
        Value::Int(n) => {
            if i32::try_from(*n).is_ok() {
                let _ = write!(out, "<int>{n}</int>");
            } else {
                let _ = write!(out, "<i8>{n}</i8>");
            }
        }
        Value::Bool(b) => {
            let _ = write!(out, "<boolean>{}</boolean>", u8::from(*b));
        }
        Value::String(s) => {
            let _ = write!(out, "<string>{}</string>", escape(s.as_str()));
        }
        Value::Double(d) => {
            let _ = write!(out, "<double>{d}</double>");
        }
        Value::DateTime(s) => {
            let _ = write!(out, "<dateTime.iso8601>{}</dateTime.iso8601>", escape(s.as_str()));
        }
        Value::Base64(s) => {
            let _ = write!(out, "<base64>{}</base64>", escape(s.as_str()));
        }
        Value::Struct(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                let _ = write!(out, "<member><name>{}</name>", escape(name.as_str()));
                write_value(out, member);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                write_value(out, item);
            }
            out.push_str("</data></array>");
        }
        Value::Nil => out.push_str("<nil/>"),
    }
    out.push_str("</value>");
}

// ── Decoding ─────────────────────────────────────────────────────────

/// Minimal element tree: name, child elements, concatenated text.
#[derive(Debug, Default)]
struct Node {
    name: String,
    children: Vec<Node>,
    text: String,
}

impl Node {
    fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> {
        self.children.iter().filter(move |c| c.name == name)
    }
}

fn codec_err(message: impl Into<String>) -> Error {
    Error::Codec(message.into())
}

/// Element name without namespace prefix (`ex:nil` -> `nil`).
fn element_name(start: &BytesStart<'_>) -> Result<String, Error> {
    let local = start.local_name();
    std::str::from_utf8(local.as_ref())
        .map(str::to_owned)
        .map_err(|e| codec_err(format!("element name is not UTF-8: {e}")))
}

fn attach(stack: &mut [Node], root: &mut Option<Node>, node: Node) -> Result<(), Error> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        Ok(())
    } else if root.is_none() {
        *root = Some(node);
        Ok(())
    } else {
        Err(codec_err("document has more than one root element"))
    }
}

fn parse_tree(xml: &str) -> Result<Node, Error> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Node {
                name: element_name(&start)?,
                ..Node::default()
            }),
            Event::Empty(start) => {
                let node = Node {
                    name: element_name(&start)?,
                    ..Node::default()
                };
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| codec_err("unbalanced closing tag"))?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(codec_err("unexpected end of document"));
    }
    root.ok_or_else(|| codec_err("empty document"))
}

fn decode_params(params: &Node) -> Result<Vec<Value>, Error> {
    params
        .children_named("param")
        .map(|param| {
            param
                .child("value")
                .ok_or_else(|| codec_err("<param> without <value>"))
                .and_then(decode_value)
        })
        .collect()
}

fn decode_value(node: &Node) -> Result<Value, Error> {
    // Untyped content defaults to string.
    let Some(typed) = node.children.first() else {
        return Ok(Value::String(node.text.clone()));
    };

    let text = typed.text.trim();
    match typed.name.as_str() {
        "int" | "i4" | "i8" => text
            .parse()
            .map(Value::Int)
            .map_err(|e| codec_err(format!("invalid <{}> {text:?}: {e}", typed.name))),
        "boolean" => match text {
            "1" | "true" => Ok(Value::Bool(true)),
            "0" | "false" => Ok(Value::Bool(false)),
            other => Err(codec_err(format!("invalid <boolean> {other:?}"))),
        },
        "string" => Ok(Value::String(typed.text.clone())),
        "double" => text
            .parse()
            .map(Value::Double)
            .map_err(|e| codec_err(format!("invalid <double> {text:?}: {e}"))),
        "dateTime.iso8601" => Ok(Value::DateTime(text.to_owned())),
        "base64" => Ok(Value::Base64(text.to_owned())),
        "nil" => Ok(Value::Nil),
        "struct" => typed
            .children_named("member")
            .map(|member| {
                let name = member
                    .child("name")
                    .map(|n| n.text.clone())
                    .ok_or_else(|| codec_err("<member> without <name>"))?;
                let value = member
                    .child("value")
                    .ok_or_else(|| codec_err(format!("<member> {name:?} without <value>")))?;
                Ok((name, decode_value(value)?))
            })
            .collect::<Result<_, Error>>()
            .map(Value::Struct),
        "array" => {
            let Some(data) = typed.child("data") else {
                return Ok(Value::Array(Vec::new()));
            };
            data.children_named("value")
                .map(decode_value)
                .collect::<Result<_, _>>()
                .map(Value::Array)
        }
        other => Err(codec_err(format!("unknown value type <{other}>"))),
    }
}
