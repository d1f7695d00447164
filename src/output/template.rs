// Fri Oct 16 2026 - Alex

use std::collections::HashMap;
use std::fs;
use std::path::Path;

const HEADER_PRELUDE: &str = "/* THIS FILE WAS GENERATED. DO NOT EDIT. */
#pragma once
#include \"DataDefs.h\"
";

#[derive(Debug, Clone)]
pub struct TemplateEngine {
    templates: HashMap<String, String>,
    variables: HashMap<String, String>,
    delimiters: (String, String),
}

impl TemplateEngine {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
            variables: HashMap::new(),
            delimiters: ("{{".to_string(), "}}".to_string()),
        }
    }

    pub fn with_built_in_templates() -> Self {
        let mut engine = Self::new();
        engine.load_built_in_templates();
        engine
    }

    pub fn load_template(&mut self, name: &str, template: &str) {
        self.templates.insert(name.to_string(), template.to_string());
    }

    pub fn load_template_file(&mut self, name: &str, path: &Path) -> Result<(), TemplateError> {
        let content = fs::read_to_string(path).map_err(|e| TemplateError::IoError(e.to_string()))?;
        self.templates.insert(name.to_string(), content);
        Ok(())
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn set_variable(&mut self, name: &str, value: &str) {
        self.variables.insert(name.to_string(), value.to_string());
    }

    pub fn set_variables(&mut self, vars: HashMap<String, String>) {
        self.variables.extend(vars);
    }

    pub fn render(&self, template_name: &str) -> Result<String, TemplateError> {
        let template = self.templates.get(template_name)
            .ok_or_else(|| TemplateError::TemplateNotFound(template_name.to_string()))?;

        self.render_string(template)
    }

    /// Renders `template` in a single pass. Values are copied into the
    /// output as-is and never scanned for tags themselves.
    pub fn render_string(&self, template: &str) -> Result<String, TemplateError> {
        let nodes = self.parse(template)?;
        let mut output = String::with_capacity(template.len());
        self.emit(&nodes, &mut output)?;
        Ok(output)
    }

    fn parse<'t>(&self, template: &'t str) -> Result<Vec<Node<'t>>, TemplateError> {
        let (open, close) = (self.delimiters.0.as_str(), self.delimiters.1.as_str());
        let mut open_blocks: Vec<(&'t str, Vec<Node<'t>>)> = Vec::new();
        let mut nodes = Vec::new();
        let mut rest = template;

        while let Some(start) = rest.find(open) {
            if start > 0 {
                nodes.push(Node::Text(&rest[..start]));
            }
            let tail = &rest[start + open.len()..];
            let end = tail.find(close)
                .ok_or_else(|| TemplateError::SyntaxError("Unclosed tag".to_string()))?;
            let tag = tail[..end].trim();
            rest = &tail[end + close.len()..];

            if let Some(condition) = tag.strip_prefix("#if ") {
                open_blocks.push((condition.trim(), std::mem::take(&mut nodes)));
            } else if tag == "#endif" {
                let (condition, outer) = open_blocks.pop()
                    .ok_or_else(|| TemplateError::SyntaxError("#endif without #if".to_string()))?;
                let body = std::mem::replace(&mut nodes, outer);
                nodes.push(Node::If { condition, body });
            } else {
                nodes.push(Node::Var(tag));
            }
        }

        if !open_blocks.is_empty() {
            return Err(TemplateError::SyntaxError("Missing #endif".to_string()));
        }
        if !rest.is_empty() {
            nodes.push(Node::Text(rest));
        }
        Ok(nodes)
    }

    fn emit(&self, nodes: &[Node<'_>], output: &mut String) -> Result<(), TemplateError> {
        for node in nodes {
            match node {
                Node::Text(text) => output.push_str(text),
                Node::Var(name) => {
                    let value = self.variables.get(*name)
                        .ok_or_else(|| TemplateError::RenderError(format!("Unbound variable {}", name)))?;
                    output.push_str(value);
                }
                Node::If { condition, body } => {
                    if self.holds(condition) {
                        self.emit(body, output)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// `name`, `!name`, `a == b` or `a != b`. Operands that are not
    /// variables compare as literals.
    fn holds(&self, condition: &str) -> bool {
        if let Some((left, right)) = condition.split_once("!=") {
            return self.operand(left) != self.operand(right);
        }
        if let Some((left, right)) = condition.split_once("==") {
            return self.operand(left) == self.operand(right);
        }
        match condition.strip_prefix('!') {
            Some(name) => !self.is_set(name.trim()),
            None => self.is_set(condition),
        }
    }

    fn operand<'a>(&'a self, token: &'a str) -> &'a str {
        let token = token.trim();
        self.variables.get(token).map(String::as_str).unwrap_or(token)
    }

    fn is_set(&self, name: &str) -> bool {
        matches!(self.variables.get(name), Some(v) if !v.is_empty() && v != "0" && !v.eq_ignore_ascii_case("false"))
    }

    pub fn get_built_in_templates() -> HashMap<String, String> {
        let mut templates = HashMap::new();

        templates.insert("enum".to_string(), format!("{}{}", HEADER_PRELUDE, r#"{{#if include_cstdint}}#include <cstdint>
{{#endif}}{{includes}}
namespace {{namespace}} {
{{comment_block}}enum {{name}} : {{base_type}} {
{{body}}};

template<> struct enum_traits<{{namespace}}::{{name}}> {
  static const {{base_type}} first_item_value = {{traits.base}};
  static const {{base_type}} last_item_value = {{traits.last_item_value}};
  static const int count = {{traits.count}};
  static const bool is_complex = {{traits.is_complex}};
};
{{attribute_tables}}}
"#));

        templates.insert("bitfield".to_string(), format!("{}{}", HEADER_PRELUDE, r#"{{#if include_cstdint}}#include <cstdint>
{{#endif}}{{includes}}
namespace {{namespace}} {
{{comment_block}}union {{name}} {
{{body}}};
}
"#));

        templates.insert("struct".to_string(), format!("{}{}", HEADER_PRELUDE, r#"{{includes}}
namespace {{namespace}} {
{{forward_decls}}{{comment_block}}{{keyword}} {{name}}{{#if has_inheritance}} : {{parent}}{{#endif}} {
{{body}}};
}
"#));

        templates.insert("union".to_string(), format!("{}{}", HEADER_PRELUDE, r#"{{includes}}
namespace {{namespace}} {
{{forward_decls}}{{comment_block}}union {{name}} {
{{body}}};
}
"#));

        templates
    }

    pub fn load_built_in_templates(&mut self) {
        let built_in = Self::get_built_in_templates();
        for (name, content) in built_in {
            self.load_template(&name, &content);
        }
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

enum Node<'t> {
    Text(&'t str),
    Var(&'t str),
    If { condition: &'t str, body: Vec<Node<'t>> },
}

#[derive(Debug, Clone)]
pub enum TemplateError {
    TemplateNotFound(String),
    SyntaxError(String),
    IoError(String),
    RenderError(String),
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::TemplateNotFound(name) => write!(f, "Template not found: {}", name),
            TemplateError::SyntaxError(msg) => write!(f, "Template syntax error: {}", msg),
            TemplateError::IoError(msg) => write!(f, "IO error: {}", msg),
            TemplateError::RenderError(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for TemplateError {}
