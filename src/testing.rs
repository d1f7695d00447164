// Fri Oct 16 2026 - Alex

//! Builders for lowered-definition fixtures used across the unit tests.

use crate::catalog::Catalog;
use crate::schema::declaration::{FIELD_TAG, GLOBAL_OBJECT_TAG, GLOBAL_TYPE_TAG, ITEM_TAG};
use crate::schema::{TypeDecl, XmlElement, LOWERED_NS};
use quick_xml::escape::escape;
use std::path::Path;

pub fn global_type(meta: &str, name: &str) -> XmlElement {
    XmlElement::new(GLOBAL_TYPE_TAG)
        .with_attr("ld:meta", meta)
        .with_attr("type-name", name)
}

pub fn global_object(name: &str, type_name: &str) -> XmlElement {
    XmlElement::new(GLOBAL_OBJECT_TAG)
        .with_attr("name", name)
        .with_child(XmlElement::new(ITEM_TAG)
            .with_attr("ld:meta", "global")
            .with_attr("type-name", type_name))
}

pub fn enum_item(name: Option<&str>, value: Option<&str>) -> XmlElement {
    let mut el = XmlElement::new("enum-item");
    if let Some(name) = name {
        el = el.with_attr("name", name);
    }
    if let Some(value) = value {
        el = el.with_attr("value", value);
    }
    el
}

pub fn flag_bit(name: Option<&str>, count: Option<&str>) -> XmlElement {
    let mut el = field("number", name).with_attr("ld:subtype", "flag-bit");
    if let Some(count) = count {
        el = el.with_attr("count", count);
    }
    el
}

pub fn field(meta: &str, name: Option<&str>) -> XmlElement {
    let el = XmlElement::new(FIELD_TAG).with_attr("ld:meta", meta);
    match name {
        Some(name) => el.with_attr("name", name),
        None => el,
    }
}

pub fn item(meta: &str) -> XmlElement {
    XmlElement::new(ITEM_TAG).with_attr("ld:meta", meta)
}

/// Registers every element as a global type in a `df` catalog.
pub fn catalog_with(types: Vec<XmlElement>) -> Catalog {
    let mut catalog = Catalog::new("df");
    for el in types {
        catalog
            .register_type(TypeDecl::from_global_type(&el), Path::new("df.test.xml"))
            .unwrap();
    }
    catalog
}

/// Serializes `children` under a namespaced `ld:data-definition` root.
pub fn lowered_document(children: Vec<XmlElement>) -> String {
    let mut out = String::from("<?xml version=\"1.0\"?>\n");
    let root = children.into_iter().fold(XmlElement::new("ld:data-definition"), |root, c| root.with_child(c));
    write_element(&mut out, &root, true);
    out
}

fn write_element(out: &mut String, el: &XmlElement, is_root: bool) {
    out.push('<');
    out.push_str(&el.name);
    if is_root {
        out.push_str(&format!(" xmlns:ld=\"{}\"", LOWERED_NS));
    }
    for (key, value) in &el.attributes {
        out.push_str(&format!(" {}=\"{}\"", key, escape(value.as_str())));
    }
    if el.children.is_empty() && el.text.is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push('>');
    out.push_str(&escape(el.text.as_str()));
    for child in &el.children {
        write_element(out, child, false);
    }
    out.push_str(&format!("</{}>\n", el.name));
}
