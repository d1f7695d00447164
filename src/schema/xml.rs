// Fri Oct 16 2026 - Alex

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use std::fmt;

pub const LOWERED_NS: &str = "http://github.com/peterix/dfhack/lowered-data-definition";
pub const LD_PREFIX: &str = "ld:";

/// A parsed XML element. Names bound to the lowered-definition namespace
/// are stored with an `ld:` prefix regardless of the prefix used in the
/// source document; everything else keeps its local name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub root: XmlElement,
}

impl XmlElement {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: String::new(),
        }
    }

    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.attributes.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text.push_str(text);
        self
    }

    /// Raw attribute lookup, empty values included.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute lookup treating an empty value as absent.
    pub fn non_empty_attr(&self, key: &str) -> Option<String> {
        self.attr(key)
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}

impl fmt::Display for XmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for key in ["type-name", "name", "ld:meta"] {
            if let Some(value) = self.attr(key) {
                write!(f, " {}=\"{}\"", key, value)?;
            }
        }
        write!(f, ">")
    }
}

impl XmlDocument {
    pub fn new(root: XmlElement) -> Self {
        Self { root }
    }

    pub fn parse(source: &str) -> Result<Self, String> {
        let mut reader = NsReader::from_str(source);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let (ns, event) = reader.read_resolved_event().map_err(|e| e.to_string())?;
            let lowered = is_lowered_namespace(&ns);

            match event {
                Event::Start(ref e) => {
                    let element = open_element(&reader, lowered, e)?;
                    stack.push(element);
                }
                Event::Empty(ref e) => {
                    let element = open_element(&reader, lowered, e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack.pop()
                        .ok_or_else(|| "unbalanced closing tag".to_string())?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(ref e) => {
                    let text = e.unescape().map_err(|e| e.to_string())?;
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&text);
                    }
                }
                Event::CData(ref e) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(format!("unclosed element <{}>", stack[stack.len() - 1].name));
        }

        root.map(Self::new)
            .ok_or_else(|| "no root element found".to_string())
    }
}

fn is_lowered_namespace(ns: &ResolveResult) -> bool {
    match ns {
        ResolveResult::Bound(Namespace(uri)) => *uri == LOWERED_NS.as_bytes(),
        ResolveResult::Unknown(prefix) => prefix.as_slice() == b"ld",
        ResolveResult::Unbound => false,
    }
}

fn open_element(reader: &NsReader<&[u8]>, lowered: bool, start: &BytesStart) -> Result<XmlElement, String> {
    let local = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let name = if lowered { format!("{}{}", LD_PREFIX, local) } else { local };
    let mut element = XmlElement::new(&name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (ns, local) = reader.resolve_attribute(attr.key);
        let local = String::from_utf8_lossy(local.as_ref()).into_owned();
        let key = if is_lowered_namespace(&ns) { format!("{}{}", LD_PREFIX, local) } else { local };
        let value = attr.unescape_value().map_err(|e| e.to_string())?.into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) -> Result<(), String> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(format!("multiple root elements, second is <{}>", element.name));
    }
    *root = Some(element);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowered_prefix_is_normalized() {
        let source = r#"<?xml version="1.0"?>
<x:data-definition xmlns:x="http://github.com/peterix/dfhack/lowered-data-definition">
    <x:global-type x:meta="enum-type" type-name="color">
        <enum-item name="RED"/>
        <comment>first line
second line</comment>
    </x:global-type>
</x:data-definition>"#;

        let doc = XmlDocument::parse(source).unwrap();
        assert_eq!(doc.root.name, "ld:data-definition");

        let ty = doc.root.child("ld:global-type").unwrap();
        assert_eq!(ty.attr("ld:meta"), Some("enum-type"));
        assert_eq!(ty.attr("type-name"), Some("color"));
        assert_eq!(ty.children_named("enum-item").count(), 1);
        assert!(ty.child("comment").unwrap().text.contains("second line"));
    }

    #[test]
    fn test_empty_attribute_is_absent() {
        let element = XmlElement::new("enum-item").with_attr("value", "");
        assert_eq!(element.attr("value"), Some(""));
        assert_eq!(element.non_empty_attr("value"), None);
    }

    #[test]
    fn test_malformed_document_fails() {
        assert!(XmlDocument::parse("<a><b></a>").is_err());
        assert!(XmlDocument::parse("").is_err());
    }
}
