// Fri Oct 16 2026 - Alex

pub mod enum_type;
pub mod bitfield;
pub mod compound;

pub use enum_type::{EnumWrapper, EnumRecord, EnumItem, EnumTraits, EnumAttribute};
pub use bitfield::{BitfieldWrapper, BitfieldRecord, BitfieldField};
pub use compound::{CompoundWrapper, CompoundRecord, CompoundField, VirtualMethod};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::schema::{TypeDecl, TypeKind};
use serde::Serialize;

/// Renderer-ready record of one declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DerivedRecord {
    Enum(EnumRecord),
    Bitfield(BitfieldRecord),
    Compound(CompoundRecord),
}

impl DerivedRecord {
    pub fn name(&self) -> &str {
        match self {
            Self::Enum(r) => &r.name,
            Self::Bitfield(r) => &r.name,
            Self::Compound(r) => &r.name,
        }
    }

    pub fn full_name(&self) -> &str {
        match self {
            Self::Enum(r) => &r.full_name,
            Self::Bitfield(r) => &r.full_name,
            Self::Compound(r) => &r.full_name,
        }
    }

    /// Identifier of the header template for this record.
    pub fn template_id(&self) -> &'static str {
        match self {
            Self::Enum(_) => "enum",
            Self::Bitfield(_) => "bitfield",
            Self::Compound(r) if r.is_union => "union",
            Self::Compound(_) => "struct",
        }
    }

    pub fn hard_references(&self) -> &[String] {
        match self {
            Self::Enum(r) => &r.hard_references,
            Self::Bitfield(r) => &r.hard_references,
            Self::Compound(r) => &r.hard_references,
        }
    }

    pub fn forward_references(&self) -> &[String] {
        match self {
            Self::Compound(r) => &r.forward_references,
            _ => &[],
        }
    }
}

pub type WrapperFn = fn(&TypeDecl, &Catalog) -> Result<DerivedRecord>;

pub enum Dispatch {
    Wrap(WrapperFn),
    Unhandled,
}

pub fn dispatch(kind: &TypeKind) -> Dispatch {
    match kind {
        TypeKind::Enum => Dispatch::Wrap(derive_enum),
        TypeKind::Bitfield => Dispatch::Wrap(derive_bitfield),
        TypeKind::Struct | TypeKind::Class | TypeKind::Union => Dispatch::Wrap(derive_compound),
        TypeKind::Other(_) => Dispatch::Unhandled,
    }
}

fn derive_enum(decl: &TypeDecl, catalog: &Catalog) -> Result<DerivedRecord> {
    EnumWrapper::new(decl, catalog).map(|w| DerivedRecord::Enum(w.into_record()))
}

fn derive_bitfield(decl: &TypeDecl, catalog: &Catalog) -> Result<DerivedRecord> {
    BitfieldWrapper::new(decl, catalog).map(|w| DerivedRecord::Bitfield(w.into_record()))
}

fn derive_compound(decl: &TypeDecl, catalog: &Catalog) -> Result<DerivedRecord> {
    CompoundWrapper::new(decl, catalog).map(|w| DerivedRecord::Compound(w.into_record()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{catalog_with, enum_item, flag_bit, global_type};

    #[test]
    fn test_dispatch_by_kind() {
        let catalog = catalog_with(vec![
            global_type("enum-type", "e").with_child(enum_item(Some("A"), None)),
            global_type("bitfield-type", "b").with_child(flag_bit(Some("x"), None)),
            global_type("union-type", "u"),
            global_type("class-type", "c"),
            global_type("df-linked-list-type", "l"),
        ]);

        let mut ids = Vec::new();
        for (name, entry) in catalog.types() {
            match dispatch(&entry.decl.kind) {
                Dispatch::Wrap(wrap) => {
                    let record = wrap(&entry.decl, &catalog).unwrap();
                    assert_eq!(record.name(), name);
                    ids.push(record.template_id());
                }
                Dispatch::Unhandled => ids.push("unhandled"),
            }
        }
        assert_eq!(ids, vec!["enum", "bitfield", "union", "struct", "unhandled"]);
    }
}
