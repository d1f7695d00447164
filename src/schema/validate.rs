// Fri Oct 16 2026 - Alex

use crate::error::{CodegenError, Result};
use crate::schema::declaration::LayoutAttributes;
use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[_a-zA-Z][_a-zA-Z0-9]*$").expect("identifier pattern")
});

pub fn validate_identifier(name: &str) -> Result<String> {
    if !IDENTIFIER.is_match(name) {
        return Err(CodegenError::InvalidIdentifier(name.to_string()));
    }
    Ok(name.to_string())
}

/// Returns `name` or a synthesized anonymous name, plus the next counter.
/// Counters start at 1 for every enclosing declaration: the first
/// anonymous member is `anon`, the nth is `anon_{n}`.
pub fn ensure_name(name: Option<&str>, counter: usize) -> Result<(String, usize)> {
    match name.filter(|n| !n.is_empty()) {
        Some(name) => Ok((validate_identifier(name)?, counter)),
        None => {
            let synthesized = if counter <= 1 {
                "anon".to_string()
            } else {
                format!("anon_{}", counter)
            };
            Ok((validate_identifier(&synthesized)?, counter + 1))
        }
    }
}

/// Parses a decimal or `0x` hexadecimal integer attribute.
pub fn parse_integer(value: &str, attribute: &str, element: &str) -> Result<i64> {
    let trimmed = value.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let parsed = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => digits.parse::<i64>(),
    };

    parsed
        .map(|v| if negative { -v } else { v })
        .map_err(|_| CodegenError::InvalidNumber {
            attribute: attribute.to_string(),
            element: element.to_string(),
            value: value.to_string(),
        })
}

pub fn parse_count(value: &str, attribute: &str, element: &str) -> Result<usize> {
    let parsed = parse_integer(value, attribute, element)?;
    usize::try_from(parsed).map_err(|_| CodegenError::InvalidNumber {
        attribute: attribute.to_string(),
        element: element.to_string(),
        value: value.to_string(),
    })
}

/// Rejects layout attributes the definitions must not carry. `offset`
/// is never permitted.
pub fn check_forbidden_attributes(layout: &LayoutAttributes, element: &str, allow_size: bool, allow_align: bool) -> Result<()> {
    let illegal = |attribute: &str| CodegenError::IllegalAttribute {
        attribute: attribute.to_string(),
        element: element.to_string(),
    };

    if !allow_size && layout.size.is_some() {
        return Err(illegal("size"));
    }
    if layout.offset.is_some() {
        return Err(illegal("offset"));
    }
    if !allow_align && layout.alignment.is_some() {
        return Err(illegal("alignment"));
    }
    Ok(())
}
