// Fri Oct 16 2026 - Alex

use crate::catalog::Catalog;
use crate::error::{CodegenError, Result};
use crate::schema::primitive::{BITFIELD_DEFAULT_BASE, ENUM_DEFAULT_BASE};
use crate::schema::{check_forbidden_attributes, ensure_name, parse_count, primitive_base, ExpectedKind, TypeDecl};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BitfieldRecord {
    pub name: String,
    pub full_name: String,
    pub comments: Vec<String>,
    pub base_type: String,
    pub include_cstdint: bool,
    pub fields: Vec<BitfieldField>,
    pub hard_references: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BitfieldField {
    pub name: String,
    pub size: u32,
    pub base: String,
    pub index: u32,
    /// Mask of every bit the field spans.
    pub value: u64,
    pub prefix_comments: Vec<String>,
    pub comment: Option<String>,
    pub since: Option<String>,
}

pub struct BitfieldWrapper<'a> {
    decl: &'a TypeDecl,
    catalog: &'a Catalog,
    record: BitfieldRecord,
    hard_references: BTreeSet<String>,
}

impl<'a> BitfieldWrapper<'a> {
    pub fn new(decl: &'a TypeDecl, catalog: &'a Catalog) -> Result<Self> {
        let (base_type, include_cstdint) = primitive_base(decl.base_type.as_deref(), BITFIELD_DEFAULT_BASE)?;

        let mut wrapper = Self {
            decl,
            catalog,
            record: BitfieldRecord {
                name: decl.name().to_string(),
                full_name: catalog.fully_qualified_name(&decl.scope, decl.name(), false),
                comments: decl.comments.lines(true),
                base_type,
                include_cstdint,
                fields: Vec::new(),
                hard_references: Vec::new(),
            },
            hard_references: BTreeSet::new(),
        };

        wrapper.init_fields()?;
        wrapper.record.hard_references = wrapper.hard_references.iter().cloned().collect();
        Ok(wrapper)
    }

    pub fn into_record(self) -> BitfieldRecord {
        self.record
    }

    fn init_fields(&mut self) -> Result<()> {
        let decl = self.decl;
        let catalog = self.catalog;
        let bitfield_name = decl.name();
        let mut anon_count = 1;
        let mut index: u32 = 0;

        for field in &decl.fields {
            if field.meta() != "number" || field.subtype() != "flag-bit" {
                return Err(CodegenError::InvalidBitfieldMember {
                    bitfield: bitfield_name.to_string(),
                    element: field.element.clone(),
                });
            }

            let (name, next) = ensure_name(field.name.as_deref(), anon_count)?;
            anon_count = next;
            check_forbidden_attributes(&field.layout, &field.element, false, false)?;

            let size = match field.count {
                Some(ref count) => {
                    let width = parse_count(count, "count", &field.element)?;
                    u32::try_from(width).map_err(|_| CodegenError::InvalidNumber {
                        attribute: "count".to_string(),
                        element: field.element.clone(),
                        value: count.clone(),
                    })?
                }
                None => 1,
            };
            let mut base = self.record.base_type.clone();

            let context = format!("bitfield item {} of {}", name, bitfield_name);
            let (enum_type, enum_decl) = catalog
                .resolve_type_reference(field.type_name.as_deref(), Some(ExpectedKind::Enum), &context)?;
            if let Some(enum_decl) = enum_decl {
                let (enum_base, _) = primitive_base(enum_decl.base_type.as_deref(), ENUM_DEFAULT_BASE)?;
                if enum_base != base {
                    return Err(CodegenError::BaseTypeMismatch {
                        bitfield: bitfield_name.to_string(),
                        field: name,
                        found: enum_base,
                        expected: base,
                    });
                }
                if enum_decl.name() != bitfield_name {
                    self.hard_references.insert(enum_decl.name().to_string());
                }
                base = enum_type;
            }

            let field_index = index;
            index = index.checked_add(size).ok_or_else(|| CodegenError::BitIndexOverflow {
                bitfield: bitfield_name.to_string(),
                field: name.clone(),
            })?;

            self.record.fields.push(BitfieldField {
                name,
                size,
                base,
                index: field_index,
                value: field_mask(size, field_index),
                prefix_comments: field.comments.lines(false),
                comment: field.comments.inline.clone(),
                since: field.comments.since.clone(),
            });
        }

        Ok(())
    }
}

/// All bits from `index` to `index + width` set.
pub fn field_mask(width: u32, index: u32) -> u64 {
    let mask = if width >= 64 { u64::MAX } else { (1u64 << width) - 1 };
    mask.checked_shl(index).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::XmlElement;
    use crate::testing::{catalog_with, enum_item, field, flag_bit, global_type};

    fn derive(types: Vec<XmlElement>, name: &str) -> Result<BitfieldRecord> {
        let catalog = catalog_with(types);
        let decl = catalog.get_type(name).unwrap();
        BitfieldWrapper::new(decl, &catalog).map(BitfieldWrapper::into_record)
    }

    #[test]
    fn test_field_mask() {
        assert_eq!(field_mask(3, 5), 0xE0);
        assert_eq!(field_mask(1, 0), 1);
        assert_eq!(field_mask(2, 1), 0b110);
        assert_eq!(field_mask(64, 0), u64::MAX);
        assert_eq!(field_mask(0, 4), 0);
    }

    #[test]
    fn test_flags_scenario() {
        let e = global_type("enum-type", "E")
            .with_attr("base-type", "uint32_t")
            .with_child(enum_item(Some("X"), None));
        let flags = global_type("bitfield-type", "Flags")
            .with_child(flag_bit(Some("a"), None))
            .with_child(flag_bit(Some("b"), Some("2")))
            .with_child(flag_bit(Some("c"), Some("1")).with_attr("type-name", "E"));
        let record = derive(vec![flags, e], "Flags").unwrap();

        let indices: Vec<u32> = record.fields.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![0, 1, 3]);
        let values: Vec<u64> = record.fields.iter().map(|f| f.value).collect();
        assert_eq!(values, vec![0b1, 0b110, 0b1000]);
        assert_eq!(record.fields[0].base, "uint32_t");
        assert_eq!(record.fields[2].base, "df::E");
        assert_eq!(record.hard_references, vec!["E"]);
        assert_eq!(record.full_name, "Flags");
    }

    #[test]
    fn test_prefix_sum_indices() {
        let widths = [1u32, 3, 2, 7, 1];
        let el = widths.iter().enumerate().fold(global_type("bitfield-type", "bits"), |el, (i, w)| {
            el.with_child(flag_bit(Some(&format!("f{}", i)), Some(&w.to_string())))
        });
        let record = derive(vec![el], "bits").unwrap();

        let mut expected = 0;
        for (field, width) in record.fields.iter().zip(widths) {
            assert_eq!(field.index, expected);
            assert_eq!(field.size, width);
            assert_eq!(field.value, field_mask(width, expected));
            expected += width;
        }
    }

    #[test]
    fn test_oversized_width_is_rejected() {
        let flags = global_type("bitfield-type", "Flags")
            .with_child(flag_bit(Some("a"), Some("4294967297")))
            .with_child(flag_bit(Some("b"), None));
        let err = derive(vec![flags], "Flags").unwrap_err();
        assert!(matches!(err, CodegenError::InvalidNumber { ref value, .. } if value == "4294967297"));
    }

    #[test]
    fn test_bit_index_overflow() {
        let flags = global_type("bitfield-type", "Flags")
            .with_child(flag_bit(Some("a"), Some("4294967295")))
            .with_child(flag_bit(Some("b"), None))
            .with_child(flag_bit(Some("c"), None));
        let err = derive(vec![flags], "Flags").unwrap_err();
        assert!(matches!(err, CodegenError::BitIndexOverflow { ref field, .. } if field == "b"));
    }

    #[test]
    fn test_base_type_mismatch() {
        let e = global_type("enum-type", "E").with_child(enum_item(Some("X"), None));
        let flags = global_type("bitfield-type", "Flags")
            .with_child(flag_bit(Some("c"), None).with_attr("type-name", "E"));
        let err = derive(vec![flags, e], "Flags").unwrap_err();
        assert!(matches!(err, CodegenError::BaseTypeMismatch { ref found, ref expected, .. }
            if found == "int32_t" && expected == "uint32_t"));
    }

    #[test]
    fn test_field_must_reference_enum() {
        let s = global_type("struct-type", "S");
        let flags = global_type("bitfield-type", "Flags")
            .with_child(flag_bit(Some("c"), None).with_attr("type-name", "S"));
        assert!(matches!(derive(vec![flags, s], "Flags").unwrap_err(), CodegenError::UnexpectedKind { .. }));

        let flags = global_type("bitfield-type", "Flags")
            .with_child(flag_bit(Some("c"), None).with_attr("type-name", "uint8_t"));
        assert!(matches!(derive(vec![flags], "Flags").unwrap_err(), CodegenError::UnexpectedKind { .. }));
    }

    #[test]
    fn test_invalid_member() {
        let flags = global_type("bitfield-type", "Flags")
            .with_child(field("number", Some("x")).with_attr("ld:subtype", "int32_t"));
        assert!(matches!(derive(vec![flags], "Flags").unwrap_err(), CodegenError::InvalidBitfieldMember { .. }));
    }

    #[test]
    fn test_offset_on_field_is_illegal() {
        let flags = global_type("bitfield-type", "Flags")
            .with_child(flag_bit(Some("x"), None).with_attr("offset", "4"));
        assert!(matches!(derive(vec![flags], "Flags").unwrap_err(), CodegenError::IllegalAttribute { .. }));
    }

    #[test]
    fn test_anonymous_fields_and_comments() {
        let flags = global_type("bitfield-type", "Flags")
            .with_attr("base-type", "uint8_t")
            .with_child(flag_bit(None, None).with_attr("comment", "unused").with_attr("since", "v0.50"))
            .with_child(flag_bit(None, None));
        let record = derive(vec![flags], "Flags").unwrap();

        assert_eq!(record.base_type, "uint8_t");
        assert_eq!(record.fields[0].name, "anon");
        assert_eq!(record.fields[1].name, "anon_2");
        assert_eq!(record.fields[0].comment.as_deref(), Some("unused"));
        assert_eq!(record.fields[0].since.as_deref(), Some("v0.50"));
        assert!(record.fields[0].prefix_comments.is_empty());
    }
}
