// Fri Oct 16 2026 - Alex

use crate::error::Result;
use crate::output::template::{TemplateEngine, TemplateError};
use crate::wrapper::{BitfieldRecord, CompoundRecord, DerivedRecord, EnumRecord};
use itertools::Itertools;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

const INDENT: &str = "  ";

pub trait Render {
    fn render(&self, template_id: &str, record: &DerivedRecord) -> Result<String>;
}

/// Renders records through the built-in C++ header templates.
#[derive(Debug, Clone)]
pub struct HeaderRenderer {
    engine: TemplateEngine,
    namespace: String,
    extension: String,
}

impl HeaderRenderer {
    pub fn new(namespace: &str) -> Self {
        Self {
            engine: TemplateEngine::with_built_in_templates(),
            namespace: namespace.to_string(),
            extension: "h".to_string(),
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.to_string();
        self
    }

    /// Replaces built-in templates with `{id}.tmpl` files found in `dir`.
    pub fn with_template_directory(mut self, dir: &Path) -> Result<Self> {
        for id in ["enum", "bitfield", "struct", "union"] {
            let path = dir.join(format!("{}.tmpl", id));
            if path.is_file() {
                log::debug!("Using template override {}", path.display());
                self.engine.load_template_file(id, &path)?;
            }
        }
        Ok(self)
    }

    /// Flat key/value map handed to the template engine.
    pub fn variables(&self, record: &DerivedRecord) -> Result<HashMap<String, String>> {
        let value = serde_json::to_value(record)
            .map_err(|e| TemplateError::RenderError(e.to_string()))?;

        let mut vars = HashMap::new();
        flatten_scalars("", &value, &mut vars);

        vars.insert("namespace".to_string(), self.namespace.clone());
        vars.insert("includes".to_string(), self.includes(record.hard_references()));
        vars.insert("comment_block".to_string(), comment_block(comments_of(record), 0));

        match record {
            DerivedRecord::Enum(r) => {
                vars.insert("body".to_string(), enum_body(r, 1));
                vars.insert("attribute_tables".to_string(), attribute_tables(r));
            }
            DerivedRecord::Bitfield(r) => {
                vars.insert("body".to_string(), bitfield_body(r, 1));
            }
            DerivedRecord::Compound(r) => {
                vars.insert("body".to_string(), compound_body(r, 1));
                vars.insert("keyword".to_string(), keyword(r).to_string());
                vars.insert("forward_decls".to_string(), forward_decls(&r.forward_references));
            }
        }

        Ok(vars)
    }

    fn includes(&self, references: &[String]) -> String {
        references.iter()
            .map(|name| format!("#include \"{}.{}\"\n", name, self.extension))
            .join("")
    }
}

impl Render for HeaderRenderer {
    fn render(&self, template_id: &str, record: &DerivedRecord) -> Result<String> {
        let mut engine = self.engine.clone();
        engine.set_variables(self.variables(record)?);
        Ok(engine.render(template_id)?)
    }
}

/// Top-level scalars of `value`, nested objects joined with `.`. Arrays
/// are left to the pre-rendered blocks.
fn flatten_scalars(prefix: &str, value: &Value, vars: &mut HashMap<String, String>) {
    let rendered = match value {
        Value::Object(map) => {
            for (key, inner) in map {
                let key = if prefix.is_empty() { key.clone() } else { format!("{}.{}", prefix, key) };
                flatten_scalars(&key, inner, vars);
            }
            return;
        }
        Value::Array(_) => return,
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
    };
    vars.insert(prefix.to_string(), rendered);
}

fn comments_of(record: &DerivedRecord) -> &[String] {
    match record {
        DerivedRecord::Enum(r) => &r.comments,
        DerivedRecord::Bitfield(r) => &r.comments,
        DerivedRecord::Compound(r) => &r.comments,
    }
}

fn pad(depth: usize) -> String {
    INDENT.repeat(depth)
}

fn comment_block(lines: &[String], depth: usize) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let pad = pad(depth);
    let body = lines.iter().map(|line| format!("{} * {}\n", pad, line)).join("");
    format!("{}/**\n{}{} */\n", pad, body, pad)
}

fn line_comments(lines: &[String], depth: usize) -> String {
    let pad = pad(depth);
    lines.iter().map(|line| format!("{}// {}\n", pad, line)).join("")
}

fn trailing_comment(comment: &Option<String>) -> String {
    comment.as_ref().map(|c| format!(" // {}", c)).unwrap_or_default()
}

fn keyword(record: &CompoundRecord) -> &'static str {
    if record.is_union {
        "union"
    } else {
        "struct"
    }
}

fn forward_decls(references: &[String]) -> String {
    references.iter().map(|name| format!("struct {};\n", name)).join("")
}

fn enum_body(record: &EnumRecord, depth: usize) -> String {
    let pad = pad(depth);
    record.items.iter()
        .map(|item| {
            let value = item.explicit_value.map(|v| format!(" = {}", v)).unwrap_or_default();
            format!("{}{}{}{},\n", line_comments(&item.comments, depth), pad, item.name, value)
        })
        .join("")
}

fn attribute_tables(record: &EnumRecord) -> String {
    if record.attributes.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    let mut entries = Vec::with_capacity(record.items.len());

    for item in &record.items {
        let mut values = Vec::with_capacity(record.attributes.len());
        for (attr_name, attr) in &record.attributes {
            let assigned = item.attribute_values.get(attr_name);
            let value = if attr.is_list {
                match assigned {
                    Some(list) if !list.is_empty() => {
                        let array = format!("{}_{}_{}", record.name, item.name, attr_name);
                        out.push_str(&format!(
                            "static const {} {}[] = {{ {} }};\n",
                            attr.value_type, array, list.iter().join(", ")
                        ));
                        format!("{{ {}, {} }}", list.len(), array)
                    }
                    _ => attr.default_value.clone(),
                }
            } else {
                match assigned.and_then(|list| list.first()) {
                    Some(value) => value.clone(),
                    None if attr.use_key => attr.value_expression(&item.name),
                    None => attr.default_value.clone(),
                }
            };
            values.push(value);
        }
        entries.push(format!("{}{{ {} }}, // {}\n", INDENT, values.iter().join(", "), item.name));
    }

    out.push_str(&format!("struct {}_attrs {{\n", record.name));
    for (attr_name, attr) in &record.attributes {
        out.push_str(&format!("{}{} {};\n", INDENT, attr.attr_type, attr_name));
    }
    out.push_str("};\n");
    out.push_str(&format!("static const {}_attrs {}_attr_table[] = {{\n", record.name, record.name));
    out.push_str(&entries.concat());
    out.push_str("};\n");
    out
}

fn bitfield_body(record: &BitfieldRecord, depth: usize) -> String {
    let pad = pad(depth);
    let inner = self::pad(depth + 1);
    let mut out = format!("{}{} whole;\n{}struct {{\n", pad, record.base_type, pad);

    for field in &record.fields {
        out.push_str(&line_comments(&field.prefix_comments, depth + 1));
        out.push_str(&format!(
            "{}{} {} : {};{}\n",
            inner, field.base, field.name, field.size, trailing_comment(&field.comment)
        ));
    }
    out.push_str(&format!("{}}} bits;\n{}enum Mask : {} {{\n", pad, pad, record.base_type));
    for field in &record.fields {
        out.push_str(&format!("{}mask_{} = 0x{:x},\n", inner, field.name, field.value));
    }
    out.push_str(&format!("{}}};\n", pad));
    out
}

fn compound_body(record: &CompoundRecord, depth: usize) -> String {
    let pad = pad(depth);
    let mut out = String::new();

    for method in &record.virtual_methods {
        out.push_str(&line_comments(&method.comments, depth));
        if method.is_destructor {
            out.push_str(&format!("{}virtual {}();\n", pad, method.name));
        } else {
            out.push_str(&format!("{}virtual {} {}();\n", pad, method.ret_type, method.name));
        }
    }

    for field in &record.fields {
        out.push_str(&line_comments(&field.comments, depth));
        let dims = field.dimensions.iter().map(|d| format!("[{}]", d)).join("");
        let comment = trailing_comment(&field.comment);

        match field.nested.as_deref() {
            Some(nested) if nested.name().is_empty() => {
                out.push_str(&format!("{} {}{};{}\n", definition(nested, depth), field.name, dims, comment));
            }
            Some(nested) => {
                out.push_str(&format!("{};\n", definition(nested, depth)));
                out.push_str(&format!("{}{} {}{};{}\n", pad, field.type_name, field.name, dims, comment));
            }
            None => {
                out.push_str(&format!("{}{} {}{};{}\n", pad, field.type_name, field.name, dims, comment));
            }
        }
    }

    out
}

/// Nested type definition without the closing `;`.
fn definition(record: &DerivedRecord, depth: usize) -> String {
    let pad = pad(depth);
    let (head, body) = match record {
        DerivedRecord::Enum(r) => (format!("enum {} : {}", r.name, r.base_type), enum_body(r, depth + 1)),
        DerivedRecord::Bitfield(r) => (format!("union {}", r.name), bitfield_body(r, depth + 1)),
        DerivedRecord::Compound(r) => {
            let parent = if r.has_inheritance { format!(" : {}", r.parent) } else { String::new() };
            (format!("{} {}{}", keyword(r), r.name, parent), compound_body(r, depth + 1))
        }
    };
    let head = head.trim_end().to_string();
    format!("{}{}{} {{\n{}{}}}", comment_block(comments_of(record), depth), pad, head, body, pad)
}
