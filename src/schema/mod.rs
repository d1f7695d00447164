// Fri Oct 16 2026 - Alex

pub mod xml;
pub mod declaration;
pub mod primitive;
pub mod validate;

pub use xml::{XmlDocument, XmlElement, LOWERED_NS};
pub use declaration::{
    TypeDecl, TypeKind, ExpectedKind, GlobalDecl, FieldDecl, EnumItemDecl, EnumAttrDecl,
    ItemAttrDecl, MethodDecl, ScopeSegment, LayoutAttributes, Comments,
};
pub use primitive::{PrimitiveType, is_primitive, primitive_alias, primitive_base};
pub use validate::{validate_identifier, ensure_name, check_forbidden_attributes, parse_integer, parse_count};
