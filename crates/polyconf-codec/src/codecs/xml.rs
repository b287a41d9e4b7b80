//! XML codec
//!
//! Element trees map onto nested mappings:
//! - attributes become `attr_`-prefixed keys
//! - repeated child elements become sequences
//! - text of an element without children becomes its value, cast to a
//!   number or boolean where it spells one
//! - text next to children is kept under `#text`
//!
//! A document element named `root` is unwrapped. Encoding always wraps the
//! tree in a `root` element. Keys that are not valid XML names fail to
//! encode; `attr_` keys holding mappings or sequences stay elements under
//! their `attr_` name.

use super::{read_input_string, write_output, Codec, FormatDescriptor};
use crate::error::CodecError;
use crate::store::ConfigStore;
use polyconf_value::normalize::{normalize_map, ATTRIBUTE_MARKER, ATTRIBUTE_PREFIX};
use polyconf_value::{Direction, Map, Value};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::{Read, Write};

const NAME: &str = "xml";
const ROOT: &str = "root";
const TEXT_KEY: &str = "#text";
const HEADER: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

/// XML codec
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlCodec;

impl XmlCodec {
    /// Names this codec answers to
    pub const DESCRIPTOR: FormatDescriptor = FormatDescriptor {
        name: NAME,
        aliases: &[],
    };

    /// Create new XML codec
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Codec for XmlCodec {
    fn descriptor(&self) -> FormatDescriptor {
        Self::DESCRIPTOR
    }

    fn decode(
        &self,
        _store: &mut dyn ConfigStore,
        input: &mut dyn Read,
        target: &mut Map,
    ) -> Result<(), CodecError> {
        let text = read_input_string(input, NAME)?;
        let (name, value) = parse_document(&text)?;
        let tree = match value {
            Value::Map(map) if name == ROOT => map,
            other => Map::from_iter([(name, other)]),
        };
        target.extend(normalize_map(&tree, Direction::Inbound));
        Ok(())
    }

    fn encode(
        &self,
        _store: &dyn ConfigStore,
        output: &mut dyn Write,
        source: &Map,
    ) -> Result<(), CodecError> {
        let tree = normalize_map(source, Direction::Outbound);
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        write_element(&mut writer, ROOT, &Value::Map(tree))?;

        let mut buf = HEADER.as_bytes().to_vec();
        buf.extend(writer.into_inner());
        write_output(output, &buf, NAME)
    }
}

/// Element under construction
struct Frame {
    name: String,
    children: Map,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, CodecError> {
        let name = utf8(start.name().as_ref())?;
        let mut children = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| CodecError::decode(NAME, e))?;
            let key = utf8(attr.key.as_ref())?;
            let value = attr
                .unescape_value()
                .map_err(|e| CodecError::decode(NAME, e))?;
            children.insert(format!("{ATTRIBUTE_MARKER}{key}"), cast(&value));
        }
        Ok(Self {
            name,
            children,
            text: String::new(),
        })
    }

    fn close(self) -> (String, Value) {
        let Self {
            name,
            mut children,
            text,
        } = self;
        let value = if children.is_empty() {
            cast(&text)
        } else {
            if !text.is_empty() {
                children.insert(TEXT_KEY.to_string(), cast(&text));
            }
            Value::Map(children)
        };
        (name, value)
    }
}

fn parse_document(text: &str) -> Result<(String, Value), CodecError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root = None;
    loop {
        match reader.read_event().map_err(|e| CodecError::decode(NAME, e))? {
            Event::Start(start) => stack.push(Frame::open(&start)?),
            Event::Empty(start) => {
                let frame = Frame::open(&start)?;
                attach(frame, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| CodecError::decode(NAME, "unbalanced closing tag"))?;
                attach(frame, &mut stack, &mut root)?;
            }
            Event::Text(content) => {
                let content = content
                    .unescape()
                    .map_err(|e| CodecError::decode(NAME, e))?;
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&content);
                }
            }
            Event::CData(content) => {
                let content = utf8(&content)?;
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&content);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(CodecError::decode(NAME, "unexpected end of document"));
    }
    root.ok_or_else(|| CodecError::decode(NAME, "document has no root element"))
}

fn attach(
    frame: Frame,
    stack: &mut [Frame],
    root: &mut Option<(String, Value)>,
) -> Result<(), CodecError> {
    let (name, value) = frame.close();
    match stack.last_mut() {
        Some(parent) => {
            insert_child(&mut parent.children, name, value);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some((name, value));
            Ok(())
        }
        None => Err(CodecError::decode(NAME, "multiple root elements")),
    }
}

/// Repeated names collect into a sequence in document order
fn insert_child(children: &mut Map, name: String, value: Value) {
    match children.get_mut(&name) {
        Some(Value::Sequence(items)) => items.push(value),
        Some(existing) => {
            let first = std::mem::replace(existing, Value::Sequence(Vec::new()));
            *existing = Value::Sequence(vec![first, value]);
        }
        None => {
            children.insert(name, value);
        }
    }
}

fn cast(text: &str) -> Value {
    if let Ok(i) = text.parse::<i64>() {
        return Value::Integer(i);
    }
    let numeric = text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
    if numeric {
        if let Ok(x) = text.parse::<f64>() {
            return Value::Float(x);
        }
    }
    match text {
        "true" => Value::Boolean(true),
        "false" => Value::Boolean(false),
        _ => Value::String(text.to_string()),
    }
}

fn utf8(bytes: &[u8]) -> Result<String, CodecError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| CodecError::decode(NAME, e))
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || matches!(c, '_' | ':'))
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'))
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<(), CodecError> {
    if !is_xml_name(name) {
        return Err(CodecError::encode(
            NAME,
            format!("`{name}` is not a valid element name"),
        ));
    }
    match value {
        Value::Sequence(items) if items.is_empty() => {
            write_event(writer, Event::Empty(BytesStart::new(name)))
        }
        Value::Sequence(items) => {
            for item in items {
                write_element(writer, name, item)?;
            }
            Ok(())
        }
        Value::Map(map) => {
            let mut start = BytesStart::new(name);
            let mut text = None;
            let mut children = Vec::new();
            for (key, child) in map {
                if key == TEXT_KEY {
                    text = Some(child.to_string());
                    continue;
                }
                match key.strip_prefix(ATTRIBUTE_MARKER) {
                    Some(attr) if child.is_scalar() && is_xml_name(attr) => {
                        start.push_attribute((attr, child.to_string().as_str()));
                    }
                    Some(attr) => children.push((format!("{ATTRIBUTE_PREFIX}{attr}"), child)),
                    None => children.push((key.clone(), child)),
                }
            }
            if text.is_none() && children.is_empty() {
                return write_event(writer, Event::Empty(start));
            }
            write_event(writer, Event::Start(start))?;
            if let Some(text) = text {
                write_event(writer, Event::Text(BytesText::new(&text)))?;
            }
            for (key, child) in children {
                write_element(writer, &key, child)?;
            }
            write_event(writer, Event::End(BytesEnd::new(name)))
        }
        scalar => {
            let text = scalar.to_string();
            if text.is_empty() {
                return write_event(writer, Event::Empty(BytesStart::new(name)));
            }
            write_event(writer, Event::Start(BytesStart::new(name)))?;
            write_event(writer, Event::Text(BytesText::new(&text)))?;
            write_event(writer, Event::End(BytesEnd::new(name)))
        }
    }
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), CodecError> {
    writer
        .write_event(event)
        .map_err(|e| CodecError::encode(NAME, e))
}
