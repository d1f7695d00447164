// Fri Oct 16 2026 - Alex

use crate::output::template::TemplateError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which registry a duplicate was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Type,
    Global,
    Field,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Type => write!(f, "type"),
            Namespace::Global => write!(f, "global"),
            Namespace::Field => write!(f, "field"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("type-name not defined for {element} in file {}", file.display())]
    MissingName { element: String, file: PathBuf },
    #[error("Global {element} without a name in file {}", file.display())]
    UnnamedGlobal { element: String, file: PathBuf },
    #[error("Duplicate definition of {namespace} {name}")]
    DuplicateDefinition { namespace: Namespace, name: String },
    #[error("Cannot use {attribute} for {element}")]
    IllegalAttribute { attribute: String, element: String },
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
    #[error("Unresolved type reference {name} in {context}")]
    UnresolvedReference { name: String, context: String },
    #[error("Cannot use type {name} as {expected} here: {context}")]
    UnexpectedKind { name: String, expected: String, context: String },
    #[error("illegal enum value in {enum_name} {item} = {value} < {last}")]
    IllegalEnumValue { enum_name: String, item: String, value: i64, last: i64 },
    #[error("Implicit value of {item} in {enum_name} overflows")]
    EnumValueOverflow { enum_name: String, item: String },
    #[error("Bitfield item {field} of {bitfield} overflows the bit index")]
    BitIndexOverflow { bitfield: String, field: String },
    #[error("Bitfield item {field} of {bitfield} has a different base type: {found} (expected {expected})")]
    BaseTypeMismatch { bitfield: String, field: String, found: String, expected: String },
    #[error("Unnamed enum-attr in {enum_name}")]
    UnnamedAttribute { enum_name: String },
    #[error("Duplicate attribute {attribute} in {enum_name}")]
    DuplicateAttribute { enum_name: String, attribute: String },
    #[error("Unknown attribute {attribute} on item {item} of {enum_name}")]
    UnknownAttribute { enum_name: String, item: String, attribute: String },
    #[error("Not primitive: {0}")]
    UnknownPrimitive(String),
    #[error("Invalid bitfield member in {bitfield}: {element}")]
    InvalidBitfieldMember { bitfield: String, element: String },
    #[error("Invalid number for {attribute} in {element}: {value}")]
    InvalidNumber { attribute: String, element: String, value: String },
    #[error("XML error in {}: {message}", file.display())]
    Xml { file: PathBuf, message: String },
    #[error("Normalization failed in {}: {message}", file.display())]
    Normalization { file: PathBuf, message: String },
    #[error("Output directory does not exist: {}", .0.display())]
    MissingOutputDirectory(PathBuf),
    #[error("Invalid input pattern: {0}")]
    Pattern(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodegenError>;
