//! Streaming node reader over `quick_xml::NsReader`.
//!
//! The parsers in this crate walk SDMX-ML documents as a flat sequence of
//! owned nodes with namespace URIs already resolved. Self-closing elements
//! produce a `Start` immediately followed by an `End`, and `End` is only
//! emitted for a tag that matches its opening tag.

use std::borrow::Cow;

use quick_xml::NsReader;
use quick_xml::encoding::Decoder;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

use crate::error::{ExtractError, Result};

// SDMX-ML 2.1
pub(crate) const MESSAGE_21: &str = "http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message";
pub(crate) const STRUCTURE_21: &str =
    "http://www.sdmx.org/resources/sdmxml/schemas/v2_1/structure";
pub(crate) const COMMON_21: &str = "http://www.sdmx.org/resources/sdmxml/schemas/v2_1/common";
pub(crate) const GENERIC_21: &str =
    "http://www.sdmx.org/resources/sdmxml/schemas/v2_1/data/generic";

// SDMX-ML 2.0
pub(crate) const MESSAGE_20: &str = "http://www.SDMX.org/resources/SDMXML/schemas/v2_0/message";
pub(crate) const STRUCTURE_20: &str =
    "http://www.SDMX.org/resources/SDMXML/schemas/v2_0/structure";

pub(crate) const XML_SCHEMA: &str = "http://www.w3.org/2001/XMLSchema";

/// Opening tag with its resolved namespace and decoded attributes.
#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub namespace: Option<String>,
    pub name: String,
    /// Attributes keyed by their qualified name (`xml:lang`). Namespace
    /// declarations are left out.
    pub attributes: Vec<(String, String)>,
}

impl Element {
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(namespace)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn required_attr(&self, key: &'static str) -> Result<&str> {
        self.attr(key).ok_or_else(|| ExtractError::MissingAttribute {
            element: self.name.clone(),
            attribute: key,
        })
    }

    pub fn lang(&self) -> Option<&str> {
        self.attr("xml:lang")
    }

    fn from_start(namespace: Option<String>, start: &BytesStart<'_>, decoder: Decoder) -> Result<Self> {
        let name = decode(decoder, start.local_name().as_ref())?.into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(ExtractError::xml)?;
            let key = decode(decoder, attr.key.as_ref())?;
            if key == "xmlns" || key.starts_with("xmlns:") {
                continue;
            }
            let value = attr
                .decode_and_unescape_value(decoder)
                .map_err(ExtractError::xml)?;
            attributes.push((key.into_owned(), value.into_owned()));
        }
        Ok(Self {
            namespace,
            name,
            attributes,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Node {
    Start(Element),
    /// A run of character data. Entity references arrive as their own runs,
    /// so consumers concatenate consecutive text nodes.
    Text(String),
    End,
}

pub(crate) struct SdmxReader<'a> {
    reader: NsReader<&'a [u8]>,
    buf: Vec<u8>,
    pending_end: bool,
    depth: usize,
}

impl<'a> SdmxReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        let reader = NsReader::from_reader(bytes);
        Self {
            reader,
            buf: Vec::new(),
            pending_end: false,
            depth: 0,
        }
    }

    /// Next node of the document, or `None` at end of input.
    pub fn next_node(&mut self) -> Result<Option<Node>> {
        if std::mem::take(&mut self.pending_end) {
            return Ok(Some(Node::End));
        }
        loop {
            self.buf.clear();
            let decoder = self.reader.decoder();
            let (resolved, event) = self.reader.read_resolved_event_into(&mut self.buf)?;
            let namespace = namespace_uri(&resolved);
            match event {
                Event::Start(start) => {
                    let element = Element::from_start(namespace, &start, decoder)?;
                    self.depth += 1;
                    return Ok(Some(Node::Start(element)));
                }
                Event::Empty(start) => {
                    let element = Element::from_start(namespace, &start, decoder)?;
                    self.pending_end = true;
                    return Ok(Some(Node::Start(element)));
                }
                Event::End(_) => {
                    self.depth = self.depth.saturating_sub(1);
                    return Ok(Some(Node::End));
                }
                Event::Text(text) => {
                    let text = decode(decoder, &text)?;
                    if !text.is_empty() {
                        return Ok(Some(Node::Text(text.into_owned())));
                    }
                }
                Event::CData(data) => {
                    let text = decode(decoder, &data)?;
                    return Ok(Some(Node::Text(text.into_owned())));
                }
                Event::GeneralRef(reference) => {
                    let name = decode(decoder, &reference)?;
                    return Ok(Some(Node::Text(resolve_reference(&name)?)));
                }
                Event::Eof if self.depth > 0 => {
                    return Err(ExtractError::Xml {
                        message: "document ends inside an open element".to_string(),
                    });
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }
}

fn namespace_uri(resolved: &ResolveResult<'_>) -> Option<String> {
    match resolved {
        ResolveResult::Bound(namespace) => {
            Some(String::from_utf8_lossy(namespace.as_ref()).into_owned())
        }
        _ => None,
    }
}

fn decode<'b>(decoder: Decoder, bytes: &'b [u8]) -> Result<Cow<'b, str>> {
    decoder.decode(bytes).map_err(ExtractError::xml)
}

fn resolve_reference(name: &str) -> Result<String> {
    if let Some(text) = resolve_predefined_entity(name) {
        return Ok(text.to_string());
    }
    let code = name.strip_prefix('#').and_then(|digits| {
        match digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => digits.parse().ok(),
        }
    });
    code.and_then(char::from_u32)
        .map(String::from)
        .ok_or_else(|| ExtractError::Xml {
            message: format!("unknown entity reference '&{name};'"),
        })
}

/// Text collector for elements whose content is wanted.
#[derive(Debug, Default)]
pub(crate) struct TextBuffer {
    text: Option<String>,
}

impl TextBuffer {
    pub fn start(&mut self) {
        self.text = Some(String::new());
    }

    pub fn push(&mut self, chunk: &str) {
        if let Some(text) = self.text.as_mut() {
            text.push_str(chunk);
        }
    }

    /// Finishes collection, returning the trimmed text.
    pub fn take(&mut self) -> String {
        self.text.take().unwrap_or_default().trim().to_string()
    }
}

/// Picks the display name matching the preferred language.
///
/// The first name seen is kept until one in the preferred language arrives.
#[derive(Debug)]
pub(crate) struct NamePicker<'l> {
    language: &'l str,
    best: Option<String>,
    preferred: bool,
}

impl<'l> NamePicker<'l> {
    pub fn new(language: &'l str) -> Self {
        Self {
            language,
            best: None,
            preferred: false,
        }
    }

    pub fn offer(&mut self, lang: Option<&str>, name: String) {
        if self.preferred || name.is_empty() {
            return;
        }
        let matches = lang.is_some_and(|lang| lang.starts_with(self.language));
        if matches || self.best.is_none() {
            self.best = Some(name);
            self.preferred = matches;
        }
    }

    pub fn take(&mut self) -> Option<String> {
        self.preferred = false;
        self.best.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(xml: &str) -> Vec<Node> {
        let mut reader = SdmxReader::new(xml.as_bytes());
        let mut nodes = Vec::new();
        while let Some(node) = reader.next_node().unwrap() {
            nodes.push(node);
        }
        nodes
    }

    #[test]
    fn test_namespaces_are_resolved() {
        let xml = r#"<m:A xmlns:m="urn:m"><B x="1"/></m:A>"#;
        let nodes = nodes(xml);
        let Node::Start(a) = &nodes[0] else {
            panic!("expected start");
        };
        assert!(a.is("urn:m", "A"));
        assert!(a.attributes.is_empty());
        let Node::Start(b) = &nodes[1] else {
            panic!("expected start");
        };
        assert_eq!(b.namespace, None);
        assert_eq!(b.attr("x"), Some("1"));
        assert!(matches!(nodes[2], Node::End));
        assert!(matches!(nodes[3], Node::End));
        assert_eq!(nodes.len(), 4);
    }

    #[test]
    fn test_entities_in_text_and_attributes() {
        let xml = r#"<A v="a &amp; b">x &lt; y &#65;</A>"#;
        let mut text = String::new();
        let mut value = None;
        for node in nodes(xml) {
            match node {
                Node::Start(element) => value = element.attr("v").map(str::to_string),
                Node::Text(chunk) => text.push_str(&chunk),
                Node::End => {}
            }
        }
        assert_eq!(value.as_deref(), Some("a & b"));
        assert_eq!(text, "x < y A");
    }

    #[test]
    fn test_truncated_input_is_an_error() {
        let mut reader = SdmxReader::new(b"<A><B/>text");
        let result = (|| {
            while reader.next_node()?.is_some() {}
            Ok::<(), ExtractError>(())
        })();
        assert!(matches!(result, Err(ExtractError::Xml { .. })));
    }

    #[test]
    fn test_xml_lang_attribute() {
        let xml = r#"<Name xml:lang="fr">Taux</Name>"#;
        let Node::Start(name) = &nodes(xml)[0] else {
            panic!("expected start");
        };
        assert_eq!(name.lang(), Some("fr"));
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        let mut reader = SdmxReader::new(b"<A><B></A>");
        let result = (|| {
            while reader.next_node()?.is_some() {}
            Ok::<(), ExtractError>(())
        })();
        assert!(matches!(result, Err(ExtractError::Xml { .. })));
    }

    #[test]
    fn test_name_picker_prefers_language() {
        let mut picker = NamePicker::new("en");
        picker.offer(Some("fr"), "Taux".to_string());
        picker.offer(Some("en"), "Rates".to_string());
        picker.offer(Some("en"), "Other".to_string());
        assert_eq!(picker.take().as_deref(), Some("Rates"));

        picker.offer(Some("de"), "Kurse".to_string());
        assert_eq!(picker.take().as_deref(), Some("Kurse"));
        assert_eq!(picker.take(), None);
    }
}
