// Fri Oct 16 2026 - Alex

use crate::catalog::Catalog;
use crate::error::{CodegenError, Namespace, Result};
use crate::schema::{
    check_forbidden_attributes, ensure_name, is_primitive, parse_count, primitive_alias, ExpectedKind,
    FieldDecl, TypeDecl, TypeKind,
};
use crate::wrapper::{dispatch, DerivedRecord, Dispatch};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompoundRecord {
    pub name: String,
    pub full_name: String,
    pub kind: String,
    pub comments: Vec<String>,
    pub is_class: bool,
    pub is_union: bool,
    pub has_vtable: bool,
    pub has_inheritance: bool,
    pub is_complex: bool,
    pub parent: String,
    pub original_name: Option<String>,
    pub fields: Vec<CompoundField>,
    pub virtual_methods: Vec<VirtualMethod>,
    pub hard_references: Vec<String>,
    pub forward_references: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompoundField {
    pub name: String,
    pub meta: String,
    pub type_name: String,
    /// Array extents, outermost first.
    pub dimensions: Vec<usize>,
    pub size: Option<usize>,
    pub alignment: Option<usize>,
    pub comments: Vec<String>,
    pub comment: Option<String>,
    pub nested: Option<Box<DerivedRecord>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VirtualMethod {
    pub name: String,
    pub ret_type: String,
    pub is_destructor: bool,
    pub comments: Vec<String>,
}

/// Reference strength of a type reached while resolving a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reach {
    Direct,
    Pointer,
}

/// Derives the struct/class/union template record: resolved fields,
/// classification flags and the include/forward-declaration sets.
pub struct CompoundWrapper<'a> {
    decl: &'a TypeDecl,
    catalog: &'a Catalog,
    record: CompoundRecord,
    hard_references: BTreeSet<String>,
    forward_references: BTreeSet<String>,
}

impl<'a> CompoundWrapper<'a> {
    pub fn new(decl: &'a TypeDecl, catalog: &'a Catalog) -> Result<Self> {
        let is_union = decl.kind == TypeKind::Union;
        let full_name = if decl.name().is_empty() {
            String::new()
        } else {
            catalog.fully_qualified_name(&decl.scope, decl.name(), false)
        };

        let mut wrapper = Self {
            decl,
            catalog,
            record: CompoundRecord {
                name: decl.name().to_string(),
                full_name,
                kind: decl.kind.tag().to_string(),
                comments: decl.comments.lines(true),
                is_class: decl.kind == TypeKind::Class,
                is_union,
                has_vtable: false,
                has_inheritance: false,
                is_complex: false,
                parent: String::new(),
                original_name: decl.original_name.clone(),
                fields: Vec::new(),
                virtual_methods: Vec::new(),
                hard_references: Vec::new(),
                forward_references: Vec::new(),
            },
            hard_references: BTreeSet::new(),
            forward_references: BTreeSet::new(),
        };

        if is_union {
            wrapper.check_union()?;
        }
        wrapper.init_inheritance()?;
        wrapper.init_fields()?;
        wrapper.init_virtual_methods()?;

        let record = &mut wrapper.record;
        record.is_complex = record.has_vtable
            || record.fields.iter().any(|f| f.meta == "container" || f.meta == "compound");

        // A type that is included never needs a forward declaration.
        let hard = &wrapper.hard_references;
        wrapper.forward_references.retain(|name| !hard.contains(name));
        wrapper.record.hard_references = wrapper.hard_references.iter().cloned().collect();
        wrapper.record.forward_references = wrapper.forward_references.iter().cloned().collect();
        Ok(wrapper)
    }

    pub fn into_record(self) -> CompoundRecord {
        self.record
    }

    fn check_union(&self) -> Result<()> {
        let illegal = |attribute: &str| CodegenError::IllegalAttribute {
            attribute: attribute.to_string(),
            element: self.decl.element.clone(),
        };
        if self.decl.inherits_from.is_some() {
            return Err(illegal("inherits-from"));
        }
        if self.decl.virtual_methods.is_some() {
            return Err(illegal("virtual-methods"));
        }
        Ok(())
    }

    fn init_inheritance(&mut self) -> Result<()> {
        let decl = self.decl;
        let catalog = self.catalog;

        let context = format!("inherits-from of {}", decl.name());
        let (parent, parent_decl) = catalog
            .resolve_type_reference(decl.inherits_from.as_deref(), Some(ExpectedKind::Compound), &context)?;
        if let Some(parent_decl) = parent_decl {
            self.record.has_inheritance = true;
            self.record.parent = parent;
            self.add_reference(parent_decl.name(), Reach::Direct);
        }

        self.record.has_vtable = has_vtable(decl, catalog);
        Ok(())
    }

    fn init_fields(&mut self) -> Result<()> {
        let decl = self.decl;
        let mut anon_count = 1;
        let mut seen: HashSet<String> = HashSet::new();

        for field in &decl.fields {
            let (name, next) = ensure_name(field.name.as_deref(), anon_count)?;
            anon_count = next;
            if !seen.insert(name.clone()) {
                return Err(CodegenError::DuplicateDefinition {
                    namespace: Namespace::Field,
                    name: format!("{}.{}", decl.name(), name),
                });
            }

            let is_bytes = field.meta() == "bytes";
            check_forbidden_attributes(&field.layout, &field.element, is_bytes, is_bytes)?;

            let mut dimensions = Vec::new();
            let mut nested = None;
            let type_name = self.field_type(field, &name, Reach::Direct, Some(&mut dimensions), &mut nested)?;

            let size = match field.layout.size {
                Some(ref size) => Some(parse_count(size, "size", &field.element)?),
                None => None,
            };
            let alignment = match field.layout.alignment {
                Some(ref alignment) => Some(parse_count(alignment, "alignment", &field.element)?),
                None => None,
            };
            if is_bytes {
                if let Some(size) = size {
                    dimensions.push(size);
                }
            }

            self.record.fields.push(CompoundField {
                name,
                meta: field.meta().to_string(),
                type_name,
                dimensions,
                size,
                alignment,
                comments: field.comments.lines(false),
                comment: field.comments.inline.clone(),
                nested: nested.map(Box::new),
            });
        }

        Ok(())
    }

    /// C++ spelling of a field's type. Extents of directly nested static
    /// arrays go to `dimensions` when given, otherwise they are spelled
    /// inline.
    fn field_type(
        &mut self,
        field: &FieldDecl,
        field_name: &str,
        reach: Reach,
        dimensions: Option<&mut Vec<usize>>,
        nested: &mut Option<DerivedRecord>,
    ) -> Result<String> {
        let catalog = self.catalog;
        let context = format!("field {} of {}", field_name, self.decl.name());

        match field.meta() {
            "number" => {
                let base = primitive_alias(field.subtype())?;
                let (enum_type, enum_decl) = catalog
                    .resolve_type_reference(field.type_name.as_deref(), Some(ExpectedKind::Enum), &context)?;
                match enum_decl {
                    Some(enum_decl) => {
                        self.add_reference(enum_decl.name(), reach);
                        Ok(format!("enum_field<{},{}>", enum_type, base))
                    }
                    None => Ok(base),
                }
            }
            "primitive" => match field.subtype() {
                "stl-string" => Ok("std::string".to_string()),
                "ptr-string" => Ok("char*".to_string()),
                "stl-fstream" => Ok("std::fstream".to_string()),
                subtype => primitive_alias(subtype),
            },
            "bytes" => Ok("char".to_string()),
            "global" => {
                let (qualified, referenced) = catalog
                    .resolve_type_reference(field.type_name.as_deref(), None, &context)?;
                if let Some(referenced) = referenced {
                    self.add_reference(referenced.name(), reach);
                }
                if qualified.is_empty() {
                    return Err(CodegenError::UnresolvedReference { name: String::new(), context });
                }
                Ok(qualified)
            }
            "pointer" => match field.item {
                Some(ref item) => {
                    let target = self.field_type(item, field_name, Reach::Pointer, None, nested)?;
                    Ok(format!("{}*", target))
                }
                None => Ok("void*".to_string()),
            },
            "static-array" => {
                let count = field.count.as_deref().unwrap_or_default();
                let extent = parse_count(count, "count", &field.element)?;
                match dimensions {
                    Some(dimensions) => {
                        dimensions.push(extent);
                        match field.item {
                            Some(ref item) => self.field_type(item, field_name, reach, Some(dimensions), nested),
                            None => Ok("void*".to_string()),
                        }
                    }
                    None => {
                        let element = match field.item {
                            Some(ref item) => self.field_type(item, field_name, reach, None, nested)?,
                            None => "void*".to_string(),
                        };
                        Ok(format!("{}[{}]", element, extent))
                    }
                }
            }
            "container" => {
                let element = match field.item {
                    Some(ref item) => self.field_type(item, field_name, reach, None, nested)?,
                    None => "void*".to_string(),
                };
                Ok(container_type(field.subtype(), &element))
            }
            "compound" => {
                let compound = field.compound.as_deref().ok_or_else(|| CodegenError::UnresolvedReference {
                    name: field.typedef_name.clone().unwrap_or_default(),
                    context: context.clone(),
                })?;
                let record = self.derive_nested(compound)?;
                // Anonymous compounds are spelled inline by the renderer.
                let type_name = if record.name().is_empty() {
                    String::new()
                } else {
                    record.full_name().to_string()
                };
                *nested = Some(record);
                Ok(type_name)
            }
            other if is_primitive(other) => primitive_alias(other),
            other => Err(CodegenError::UnexpectedKind {
                name: other.to_string(),
                expected: "field meta".to_string(),
                context,
            }),
        }
    }

    fn derive_nested(&mut self, compound: &TypeDecl) -> Result<DerivedRecord> {
        let record = match dispatch(&compound.kind) {
            Dispatch::Wrap(wrap) => wrap(compound, self.catalog)?,
            Dispatch::Unhandled => {
                return Err(CodegenError::UnexpectedKind {
                    name: compound.kind.to_string(),
                    expected: "compound".to_string(),
                    context: format!("nested type of {}", self.decl.name()),
                })
            }
        };

        for name in record.hard_references() {
            self.add_reference(name, Reach::Direct);
        }
        for name in record.forward_references() {
            self.add_reference(name, Reach::Pointer);
        }
        Ok(record)
    }

    fn init_virtual_methods(&mut self) -> Result<()> {
        let decl = self.decl;
        let catalog = self.catalog;
        let methods = match decl.virtual_methods {
            Some(ref methods) => methods,
            None => return Ok(()),
        };
        let mut anon_count = 1;

        for method in methods {
            let name = if method.is_destructor {
                format!("~{}", decl.name())
            } else {
                let (name, next) = ensure_name(method.name.as_deref(), anon_count)?;
                anon_count = next;
                name
            };

            let context = format!("vmethod {} of {}", name, decl.name());
            let (mut ret_type, referenced) = catalog
                .resolve_type_reference(method.ret_type.as_deref(), None, &context)?;
            if let Some(referenced) = referenced {
                self.add_reference(referenced.name(), Reach::Pointer);
            }
            if ret_type.is_empty() && !method.is_destructor {
                ret_type = "void".to_string();
            }

            self.record.virtual_methods.push(VirtualMethod {
                name,
                ret_type,
                is_destructor: method.is_destructor,
                comments: method.comments.lines(true),
            });
        }

        Ok(())
    }

    fn add_reference(&mut self, name: &str, reach: Reach) {
        if name.is_empty() || name == self.decl.name() {
            return;
        }
        match reach {
            Reach::Direct => self.hard_references.insert(name.to_string()),
            Reach::Pointer => self.forward_references.insert(name.to_string()),
        };
    }
}

/// True when `decl` or any ancestor declares virtual methods.
fn has_vtable(decl: &TypeDecl, catalog: &Catalog) -> bool {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = Some(decl);

    while let Some(decl) = current {
        if decl.virtual_methods.is_some() {
            return true;
        }
        if !visited.insert(decl.name()) {
            break;
        }
        current = decl.inherits_from.as_deref().and_then(|parent| catalog.get_type(parent));
    }
    false
}

fn container_type(subtype: &str, element: &str) -> String {
    match subtype {
        "stl-vector" => format!("std::vector<{}>", element),
        "stl-deque" => format!("std::deque<{}>", element),
        "stl-set" => format!("std::set<{}>", element),
        "stl-bit-vector" => "std::vector<bool>".to_string(),
        "df-flagarray" => format!("BitArray<{}>", element),
        "df-array" => format!("DfArray<{}>", element),
        other => format!("{}<{}>", other, element),
    }
}
