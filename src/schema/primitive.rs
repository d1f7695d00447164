// Fri Oct 16 2026 - Alex

use crate::error::{CodegenError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static FIXED_WIDTH_INT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^u?int(8|16|32|64)_t$").expect("fixed-width integer pattern")
});

pub const ENUM_DEFAULT_BASE: &str = "int32_t";
pub const BITFIELD_DEFAULT_BASE: &str = "uint32_t";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    Long,
    SFloat,
    DFloat,
    Bool,
    FlagBit,
    Padding,
    StaticString,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 15] = [
        Self::I8, Self::U8, Self::I16, Self::U16,
        Self::I32, Self::U32, Self::I64, Self::U64,
        Self::Long,
        Self::SFloat, Self::DFloat,
        Self::Bool, Self::FlagBit,
        Self::Padding, Self::StaticString,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|ty| ty.name() == name)
    }

    /// Identifier used in the XML definitions.
    pub fn name(self) -> &'static str {
        match self {
            Self::I8 => "int8_t",
            Self::U8 => "uint8_t",
            Self::I16 => "int16_t",
            Self::U16 => "uint16_t",
            Self::I32 => "int32_t",
            Self::U32 => "uint32_t",
            Self::I64 => "int64_t",
            Self::U64 => "uint64_t",
            Self::Long => "long",
            Self::SFloat => "s-float",
            Self::DFloat => "d-float",
            Self::Bool => "bool",
            Self::FlagBit => "flag-bit",
            Self::Padding => "padding",
            Self::StaticString => "static-string",
        }
    }

    /// Name emitted in generated headers.
    pub fn alias(self) -> &'static str {
        match self {
            Self::SFloat => "float",
            Self::DFloat => "double",
            Self::StaticString => "char",
            Self::FlagBit => "void",
            Self::Padding => "static-string",
            other => other.name(),
        }
    }

    pub fn is_fixed_width_int(self) -> bool {
        FIXED_WIDTH_INT.is_match(self.name())
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub fn is_primitive(name: &str) -> bool {
    PrimitiveType::from_name(name).is_some()
}

pub fn primitive_alias(name: &str) -> Result<String> {
    PrimitiveType::from_name(name)
        .map(|ty| ty.alias().to_string())
        .ok_or_else(|| CodegenError::UnknownPrimitive(name.to_string()))
}

/// Picks the declared base type (or `default`), which must be primitive,
/// and reports whether the generated header needs `<cstdint>` for it.
pub fn primitive_base(declared: Option<&str>, default: &str) -> Result<(String, bool)> {
    let base = declared.filter(|s| !s.is_empty()).unwrap_or(default);
    let ty = PrimitiveType::from_name(base)
        .ok_or_else(|| CodegenError::UnknownPrimitive(base.to_string()))?;
    Ok((base.to_string(), ty.is_fixed_width_int()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(primitive_alias("s-float").unwrap(), "float");
        assert_eq!(primitive_alias("d-float").unwrap(), "double");
        assert_eq!(primitive_alias("static-string").unwrap(), "char");
        assert_eq!(primitive_alias("flag-bit").unwrap(), "void");
        assert_eq!(primitive_alias("padding").unwrap(), "static-string");
        assert_eq!(primitive_alias("uint16_t").unwrap(), "uint16_t");
        assert!(matches!(primitive_alias("unit"), Err(CodegenError::UnknownPrimitive(_))));
    }

    #[test]
    fn test_membership() {
        assert!(is_primitive("long"));
        assert!(is_primitive("bool"));
        assert!(!is_primitive("int128_t"));
        assert!(!is_primitive("unit"));
    }

    #[test]
    fn test_primitive_base() {
        assert_eq!(primitive_base(None, BITFIELD_DEFAULT_BASE).unwrap(), ("uint32_t".to_string(), true));
        assert_eq!(primitive_base(Some("int8_t"), ENUM_DEFAULT_BASE).unwrap(), ("int8_t".to_string(), true));
        assert_eq!(primitive_base(Some("long"), ENUM_DEFAULT_BASE).unwrap(), ("long".to_string(), false));
        assert_eq!(primitive_base(Some(""), ENUM_DEFAULT_BASE).unwrap().0, "int32_t");
        assert!(primitive_base(Some("unit"), ENUM_DEFAULT_BASE).is_err());
    }
}
