// Fri Oct 16 2026 - Alex

use crate::catalog::Catalog;
use crate::error::{CodegenError, Result};
use crate::schema::primitive::ENUM_DEFAULT_BASE;
use crate::schema::{ensure_name, parse_integer, primitive_base, TypeDecl};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;

const STRING_ATTR_TYPE: &str = "const char*";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumRecord {
    pub name: String,
    pub full_name: String,
    pub comments: Vec<String>,
    pub base_type: String,
    pub include_cstdint: bool,
    pub items: Vec<EnumItem>,
    pub traits: EnumTraits,
    pub attributes: IndexMap<String, EnumAttribute>,
    pub hard_references: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumItem {
    pub name: String,
    pub comments: Vec<String>,
    pub explicit_value: Option<i64>,
    pub value: i64,
    /// Values assigned through `item-attr`, keyed by attribute name.
    pub attribute_values: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnumTraits {
    pub base: i64,
    pub count: usize,
    pub is_complex: bool,
    pub last_item_value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumAttribute {
    pub attr_type: String,
    /// Resolved value type before list wrapping.
    pub value_type: String,
    pub attr_prefix: String,
    pub base_type_name: String,
    pub default_value: String,
    pub is_list: bool,
    pub use_key: bool,
    pub field_meta: Vec<String>,
}

impl EnumAttribute {
    /// Expression for one value of this attribute as written in the XML.
    pub fn value_expression(&self, value: &str) -> String {
        if self.value_type == STRING_ATTR_TYPE {
            format!("\"{}\"", value)
        } else {
            format!("{}{}", self.attr_prefix, value)
        }
    }
}

/// Derives the enum template record: item values, traits and the
/// attribute side tables.
pub struct EnumWrapper<'a> {
    decl: &'a TypeDecl,
    catalog: &'a Catalog,
    record: EnumRecord,
    hard_references: BTreeSet<String>,
}

impl<'a> EnumWrapper<'a> {
    pub fn new(decl: &'a TypeDecl, catalog: &'a Catalog) -> Result<Self> {
        let (base_type, include_cstdint) = primitive_base(decl.base_type.as_deref(), ENUM_DEFAULT_BASE)?;

        let mut wrapper = Self {
            decl,
            catalog,
            record: EnumRecord {
                name: decl.name().to_string(),
                full_name: catalog.fully_qualified_name(&decl.scope, decl.name(), false),
                comments: decl.comments.lines(true),
                base_type,
                include_cstdint,
                items: Vec::new(),
                traits: EnumTraits::default(),
                attributes: IndexMap::new(),
                hard_references: Vec::new(),
            },
            hard_references: BTreeSet::new(),
        };

        wrapper.init_items()?;
        wrapper.init_attributes()?;
        wrapper.init_item_attributes()?;
        wrapper.record.hard_references = wrapper.hard_references.iter().cloned().collect();
        Ok(wrapper)
    }

    pub fn into_record(self) -> EnumRecord {
        self.record
    }

    fn init_items(&mut self) -> Result<()> {
        let decl = self.decl;
        let mut anon_count = 1;
        let mut last_value: i64 = -1;
        let traits = &mut self.record.traits;

        for item in &decl.items {
            let (name, next) = ensure_name(item.name.as_deref(), anon_count)?;
            anon_count = next;

            let explicit_value = item.value.as_deref()
                .map(|v| parse_integer(v, "value", &decl.element))
                .transpose()?;

            let value = match explicit_value {
                Some(value) => {
                    if traits.count == 0 {
                        traits.base = value;
                    } else {
                        traits.is_complex = true;
                    }
                    value
                }
                None => last_value.checked_add(1).ok_or_else(|| CodegenError::EnumValueOverflow {
                    enum_name: decl.name().to_string(),
                    item: name.clone(),
                })?,
            };

            if traits.count > 0 && value < last_value {
                return Err(CodegenError::IllegalEnumValue {
                    enum_name: decl.name().to_string(),
                    item: name,
                    value,
                    last: last_value,
                });
            }

            traits.count += 1;
            last_value = value;

            self.record.items.push(EnumItem {
                name,
                comments: item.comments.lines(true),
                explicit_value,
                value,
                attribute_values: IndexMap::new(),
            });
        }

        traits.last_item_value = last_value;
        Ok(())
    }

    fn init_attributes(&mut self) -> Result<()> {
        let decl = self.decl;
        let catalog = self.catalog;
        let enum_name = decl.name();

        for attr in &decl.attributes {
            let attr_name = attr.name.clone().ok_or_else(|| CodegenError::UnnamedAttribute {
                enum_name: enum_name.to_string(),
            })?;
            if self.record.attributes.contains_key(&attr_name) {
                return Err(CodegenError::DuplicateAttribute {
                    enum_name: enum_name.to_string(),
                    attribute: attr_name,
                });
            }

            let context = format!("enum-attr {} of {}", attr_name, enum_name);
            let (mut attr_type, reference) = catalog
                .resolve_type_reference(attr.type_name.as_deref(), None, &context)?;
            if let Some(reference) = reference {
                if reference.name() != enum_name {
                    self.hard_references.insert(reference.name().to_string());
                }
            }

            let base_type_name = match attr_type.rsplit_once("::") {
                Some((_, last)) => last.to_string(),
                None => String::new(),
            };

            let mut attr_prefix = String::new();
            let mut default_value = if !attr_type.is_empty() {
                if !base_type_name.is_empty() {
                    attr_prefix = format!("{}::", base_type_name);
                }
                match attr.default_value {
                    Some(ref default) => format!("{}{}", attr_prefix, default),
                    None => format!("({})0", attr_type),
                }
            } else {
                attr_type = STRING_ATTR_TYPE.to_string();
                match attr.default_value {
                    Some(ref default) => format!("\"{}\"", default),
                    None => "NULL".to_string(),
                }
            };

            let value_type = attr_type.clone();
            let mut field_meta = reflection_meta("PRIMITIVE", &attr_name, &attr_type);
            let mut use_key = false;

            if attr.is_list {
                attr_type = format!("enum_list_attr<{}>", attr_type);
                default_value = "{ 0, NULL }".to_string();
                field_meta = reflection_meta("CONTAINER", &attr_name, &attr_type);
            } else if attr.use_key_name {
                use_key = true;
            }

            self.record.attributes.insert(attr_name, EnumAttribute {
                attr_type,
                value_type,
                attr_prefix,
                base_type_name,
                default_value,
                is_list: attr.is_list,
                use_key,
                field_meta,
            });
        }

        Ok(())
    }

    fn init_item_attributes(&mut self) -> Result<()> {
        let decl = self.decl;
        let enum_name = decl.name();

        for (item_decl, item) in decl.items.iter().zip(self.record.items.iter_mut()) {
            for item_attr in &item_decl.item_attrs {
                let attr_name = item_attr.name.as_deref().unwrap_or_default();
                let attribute = self.record.attributes.get(attr_name).ok_or_else(|| CodegenError::UnknownAttribute {
                    enum_name: enum_name.to_string(),
                    item: item.name.clone(),
                    attribute: attr_name.to_string(),
                })?;

                let values = item.attribute_values.entry(attr_name.to_string()).or_default();
                if !attribute.is_list && !values.is_empty() {
                    return Err(CodegenError::DuplicateAttribute {
                        enum_name: enum_name.to_string(),
                        attribute: format!("{}.{}", item.name, attr_name),
                    });
                }
                values.push(attribute.value_expression(item_attr.value.as_deref().unwrap_or_default()));
            }
        }

        Ok(())
    }
}

fn reflection_meta(category: &str, attr_name: &str, attr_type: &str) -> Vec<String> {
    vec![
        format!("FLD({}, {})", category, attr_name),
        format!("identity_traits<{}>::get()", attr_type),
        "0".to_string(),
        "0".to_string(),
    ]
}
