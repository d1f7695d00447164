// Fri Oct 16 2026 - Alex

use crate::schema::xml::XmlElement;
use serde::Serialize;
use std::fmt;

pub const GLOBAL_TYPE_TAG: &str = "ld:global-type";
pub const GLOBAL_OBJECT_TAG: &str = "ld:global-object";
pub const FIELD_TAG: &str = "ld:field";
pub const ITEM_TAG: &str = "ld:item";

/// Declared kind of a type, taken from `ld:meta`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Enum,
    Bitfield,
    Struct,
    Class,
    Union,
    Other(String),
}

impl TypeKind {
    pub fn from_meta(meta: Option<&str>, is_union: bool) -> Self {
        match meta.unwrap_or_default() {
            "enum-type" => Self::Enum,
            "bitfield-type" => Self::Bitfield,
            "struct-type" if is_union => Self::Union,
            "struct-type" => Self::Struct,
            "class-type" => Self::Class,
            "union-type" => Self::Union,
            other => Self::Other(other.to_string()),
        }
    }

    fn from_compound_subtype(subtype: Option<&str>, is_union: bool) -> Self {
        match subtype {
            Some("enum") => Self::Enum,
            Some("bitfield") => Self::Bitfield,
            _ if is_union => Self::Union,
            _ => Self::Struct,
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::Enum => "enum-type",
            Self::Bitfield => "bitfield-type",
            Self::Struct => "struct-type",
            Self::Class => "class-type",
            Self::Union => "union-type",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// What a reference is required to resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedKind {
    Primitive,
    Enum,
    Bitfield,
    /// A struct or class usable as a base class.
    Compound,
}

impl ExpectedKind {
    pub fn accepts(self, kind: &TypeKind) -> bool {
        match self {
            Self::Primitive => false,
            Self::Enum => *kind == TypeKind::Enum,
            Self::Bitfield => *kind == TypeKind::Bitfield,
            Self::Compound => matches!(kind, TypeKind::Struct | TypeKind::Class),
        }
    }
}

impl fmt::Display for ExpectedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive => write!(f, "primitive"),
            Self::Enum => write!(f, "enum-type"),
            Self::Bitfield => write!(f, "bitfield-type"),
            Self::Compound => write!(f, "struct-type"),
        }
    }
}

/// One enclosing scope of a declaration, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ScopeSegment {
    Type(String),
    Global,
    Typedef(String),
}

impl ScopeSegment {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Type(name) => name,
            Self::Global => "global",
            Self::Typedef(name) => name,
        }
    }
}

/// Structural attributes whose presence is restricted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutAttributes {
    pub size: Option<String>,
    pub offset: Option<String>,
    pub alignment: Option<String>,
}

impl LayoutAttributes {
    fn from_element(el: &XmlElement) -> Self {
        Self {
            size: el.non_empty_attr("size"),
            offset: el.non_empty_attr("offset"),
            alignment: el.non_empty_attr("alignment"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comments {
    pub block: Vec<String>,
    pub inline: Option<String>,
    pub since: Option<String>,
}

impl Comments {
    fn from_element(el: &XmlElement) -> Self {
        let block = el.child("comment")
            .map(|c| {
                c.text.split('\n')
                    .filter(|line| !line.is_empty())
                    .map(|line| line.trim().to_string())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            block,
            inline: el.non_empty_attr("comment"),
            since: el.non_empty_attr("since"),
        }
    }

    /// Block comment lines, followed by the `comment` and `since`
    /// attributes when `with_attributes` is set.
    pub fn lines(&self, with_attributes: bool) -> Vec<String> {
        let mut lines = self.block.clone();
        if with_attributes {
            if let Some(ref inline) = self.inline {
                lines.push(inline.clone());
            }
            if let Some(ref since) = self.since {
                lines.push(format!("Since {}", since));
            }
        }
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: Option<String>,
    pub kind: TypeKind,
    pub element: String,
    pub base_type: Option<String>,
    pub inherits_from: Option<String>,
    pub original_name: Option<String>,
    pub layout: LayoutAttributes,
    pub comments: Comments,
    pub scope: Vec<ScopeSegment>,
    pub items: Vec<EnumItemDecl>,
    pub attributes: Vec<EnumAttrDecl>,
    pub fields: Vec<FieldDecl>,
    pub virtual_methods: Option<Vec<MethodDecl>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumItemDecl {
    pub name: Option<String>,
    pub value: Option<String>,
    pub comments: Comments,
    pub item_attrs: Vec<ItemAttrDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAttrDecl {
    pub name: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumAttrDecl {
    pub name: Option<String>,
    pub type_name: Option<String>,
    pub default_value: Option<String>,
    pub is_list: bool,
    pub use_key_name: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: Option<String>,
    pub element: String,
    pub meta: Option<String>,
    pub subtype: Option<String>,
    pub type_name: Option<String>,
    pub count: Option<String>,
    pub typedef_name: Option<String>,
    pub layout: LayoutAttributes,
    pub comments: Comments,
    pub scope: Vec<ScopeSegment>,
    pub item: Option<Box<FieldDecl>>,
    pub compound: Option<Box<TypeDecl>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: Option<String>,
    pub ret_type: Option<String>,
    pub is_destructor: bool,
    pub comments: Comments,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalDecl {
    pub name: Option<String>,
    pub element: String,
    pub layout: LayoutAttributes,
    pub comments: Comments,
    pub item: Option<FieldDecl>,
}

/// Scope seen by the children of `el`.
fn scope_for_children(el: &XmlElement, scope: &[ScopeSegment]) -> Vec<ScopeSegment> {
    let mut inner = scope.to_vec();
    if el.name == GLOBAL_TYPE_TAG {
        inner.push(ScopeSegment::Type(el.attr("type-name").unwrap_or_default().to_string()));
    } else if el.name == GLOBAL_OBJECT_TAG {
        inner.push(ScopeSegment::Global);
    } else if let Some(typedef) = el.non_empty_attr("ld:typedef-name") {
        inner.push(ScopeSegment::Typedef(typedef));
    }
    inner
}

fn flag(el: &XmlElement, key: &str) -> bool {
    el.attr(key) == Some("true")
}

impl TypeDecl {
    /// Reads a top-level `ld:global-type` element.
    pub fn from_global_type(el: &XmlElement) -> Self {
        let kind = TypeKind::from_meta(el.attr("ld:meta"), flag(el, "is-union"));
        Self::build(el, el.non_empty_attr("type-name"), kind, &[])
    }

    /// Reads the anonymous declaration carried by an `ld:meta="compound"`
    /// field. `scope` is the scope enclosing that field.
    pub fn from_compound(el: &XmlElement, scope: &[ScopeSegment]) -> Self {
        let kind = TypeKind::from_compound_subtype(el.attr("ld:subtype"), flag(el, "is-union"));
        Self::build(el, el.non_empty_attr("ld:typedef-name"), kind, scope)
    }

    fn build(el: &XmlElement, name: Option<String>, kind: TypeKind, scope: &[ScopeSegment]) -> Self {
        let mut decl = Self {
            name,
            kind,
            element: el.to_string(),
            base_type: el.non_empty_attr("base-type"),
            inherits_from: el.non_empty_attr("inherits-from"),
            original_name: el.non_empty_attr("original-name"),
            layout: LayoutAttributes::from_element(el),
            comments: Comments::from_element(el),
            scope: scope.to_vec(),
            items: Vec::new(),
            attributes: Vec::new(),
            fields: Vec::new(),
            virtual_methods: None,
        };

        let child_scope = scope_for_children(el, scope);
        for child in &el.children {
            match child.name.as_str() {
                "enum-item" => decl.items.push(EnumItemDecl::from_element(child)),
                "enum-attr" => decl.attributes.push(EnumAttrDecl::from_element(child)),
                FIELD_TAG => decl.fields.push(FieldDecl::from_element(child, &child_scope)),
                "virtual-methods" | "ld:virtual-methods" => {
                    let methods = decl.virtual_methods.get_or_insert_with(Vec::new);
                    methods.extend(child.children.iter()
                        .filter(|m| m.name == "vmethod" || m.name == "ld:vmethod")
                        .map(MethodDecl::from_element));
                }
                _ => {}
            }
        }

        decl
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

impl EnumItemDecl {
    fn from_element(el: &XmlElement) -> Self {
        Self {
            name: el.non_empty_attr("name"),
            value: el.non_empty_attr("value"),
            comments: Comments::from_element(el),
            item_attrs: el.children_named("item-attr")
                .map(|attr| ItemAttrDecl {
                    name: attr.non_empty_attr("name"),
                    value: attr.non_empty_attr("value"),
                })
                .collect(),
        }
    }
}

impl EnumAttrDecl {
    fn from_element(el: &XmlElement) -> Self {
        Self {
            name: el.non_empty_attr("name"),
            type_name: el.non_empty_attr("type-name"),
            default_value: el.non_empty_attr("default-value"),
            is_list: flag(el, "is-list"),
            use_key_name: flag(el, "use-key-name"),
        }
    }
}

impl FieldDecl {
    pub fn from_element(el: &XmlElement, scope: &[ScopeSegment]) -> Self {
        let meta = el.non_empty_attr("ld:meta");
        let child_scope = scope_for_children(el, scope);

        let item = el.child(ITEM_TAG)
            .map(|item| Box::new(FieldDecl::from_element(item, &child_scope)));
        let compound = if meta.as_deref() == Some("compound") {
            Some(Box::new(TypeDecl::from_compound(el, scope)))
        } else {
            None
        };

        Self {
            name: el.non_empty_attr("name"),
            element: el.to_string(),
            meta,
            subtype: el.non_empty_attr("ld:subtype"),
            type_name: el.non_empty_attr("type-name"),
            count: el.non_empty_attr("count"),
            typedef_name: el.non_empty_attr("ld:typedef-name"),
            layout: LayoutAttributes::from_element(el),
            comments: Comments::from_element(el),
            scope: scope.to_vec(),
            item,
            compound,
        }
    }

    pub fn meta(&self) -> &str {
        self.meta.as_deref().unwrap_or_default()
    }

    pub fn subtype(&self) -> &str {
        self.subtype.as_deref().unwrap_or_default()
    }
}

impl MethodDecl {
    fn from_element(el: &XmlElement) -> Self {
        Self {
            name: el.non_empty_attr("name"),
            ret_type: el.non_empty_attr("ret-type"),
            is_destructor: flag(el, "is-destructor"),
            comments: Comments::from_element(el),
        }
    }
}

impl GlobalDecl {
    pub fn from_element(el: &XmlElement) -> Self {
        let child_scope = scope_for_children(el, &[]);
        Self {
            name: el.non_empty_attr("name"),
            element: el.to_string(),
            layout: LayoutAttributes::from_element(el),
            comments: Comments::from_element(el),
            item: el.child(ITEM_TAG).map(|item| FieldDecl::from_element(item, &child_scope)),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_meta() {
        assert_eq!(TypeKind::from_meta(Some("enum-type"), false), TypeKind::Enum);
        assert_eq!(TypeKind::from_meta(Some("struct-type"), true), TypeKind::Union);
        assert_eq!(TypeKind::from_meta(Some("class-type"), false), TypeKind::Class);
        assert_eq!(
            TypeKind::from_meta(Some("df-linked-list-type"), false),
            TypeKind::Other("df-linked-list-type".to_string())
        );
    }

    #[test]
    fn test_comments() {
        let el = XmlElement::new(GLOBAL_TYPE_TAG)
            .with_attr("comment", "inline")
            .with_attr("since", "v0.47")
            .with_child(XmlElement::new("comment").with_text("one\n  two  "));
        let comments = Comments::from_element(&el);

        assert_eq!(comments.lines(false), vec!["one", "two"]);
        assert_eq!(comments.lines(true), vec!["one", "two", "inline", "Since v0.47"]);
    }

    #[test]
    fn test_nested_scope() {
        let el = XmlElement::new(GLOBAL_TYPE_TAG)
            .with_attr("ld:meta", "struct-type")
            .with_attr("type-name", "unit")
            .with_child(XmlElement::new(FIELD_TAG)
                .with_attr("ld:meta", "compound")
                .with_attr("ld:typedef-name", "T_flags")
                .with_attr("ld:subtype", "bitfield")
                .with_attr("name", "flags")
                .with_child(XmlElement::new(FIELD_TAG)
                    .with_attr("ld:meta", "number")
                    .with_attr("ld:subtype", "flag-bit")
                    .with_attr("name", "dead")));

        let decl = TypeDecl::from_global_type(&el);
        assert_eq!(decl.kind, TypeKind::Struct);
        assert!(decl.scope.is_empty());

        let compound = decl.fields[0].compound.as_ref().unwrap();
        assert_eq!(compound.kind, TypeKind::Bitfield);
        assert_eq!(compound.name(), "T_flags");
        assert_eq!(compound.scope, vec![ScopeSegment::Type("unit".to_string())]);
        assert_eq!(compound.fields[0].scope, vec![
            ScopeSegment::Type("unit".to_string()),
            ScopeSegment::Typedef("T_flags".to_string()),
        ]);
    }

    #[test]
    fn test_explicit_zero_value_is_present() {
        let el = XmlElement::new("enum-item").with_attr("name", "A").with_attr("value", "0");
        assert_eq!(EnumItemDecl::from_element(&el).value.as_deref(), Some("0"));
    }
}
