// Fri Oct 16 2026 - Alex

pub mod lowering;
pub mod loader;

pub use lowering::{Normalize, LoweringPipeline, LoweredPassthrough, RootCheck};
pub use loader::CatalogLoader;

use crate::error::{CodegenError, Namespace, Result};
use crate::schema::{
    check_forbidden_attributes, is_primitive, primitive_alias, ExpectedKind, GlobalDecl,
    ScopeSegment, TypeDecl,
};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CatalogEntry<T> {
    pub decl: T,
    pub source: PathBuf,
}

/// Every type and global object collected from the input files, keyed by
/// name in insertion order. Populated by the loader, read-only afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    main_namespace: String,
    types: IndexMap<String, CatalogEntry<TypeDecl>>,
    globals: IndexMap<String, CatalogEntry<GlobalDecl>>,
}

impl Catalog {
    pub fn new(main_namespace: &str) -> Self {
        Self {
            main_namespace: main_namespace.to_string(),
            types: IndexMap::new(),
            globals: IndexMap::new(),
        }
    }

    pub fn main_namespace(&self) -> &str {
        &self.main_namespace
    }

    pub fn register_type(&mut self, decl: TypeDecl, source: &Path) -> Result<()> {
        let name = decl.name.clone().ok_or_else(|| CodegenError::MissingName {
            element: decl.element.clone(),
            file: source.to_path_buf(),
        })?;

        if self.types.contains_key(&name) {
            return Err(CodegenError::DuplicateDefinition {
                namespace: Namespace::Type,
                name,
            });
        }
        check_forbidden_attributes(&decl.layout, &decl.element, false, false)?;

        log::debug!("Registered type {} ({}) from {}", name, decl.kind, source.display());
        self.types.insert(name, CatalogEntry { decl, source: source.to_path_buf() });
        Ok(())
    }

    pub fn register_global(&mut self, decl: GlobalDecl, source: &Path) -> Result<()> {
        let name = decl.name.clone().ok_or_else(|| CodegenError::UnnamedGlobal {
            element: decl.element.clone(),
            file: source.to_path_buf(),
        })?;

        if self.globals.contains_key(&name) {
            return Err(CodegenError::DuplicateDefinition {
                namespace: Namespace::Global,
                name,
            });
        }
        check_forbidden_attributes(&decl.layout, &decl.element, false, false)?;

        log::debug!("Registered global {} from {}", name, source.display());
        self.globals.insert(name, CatalogEntry { decl, source: source.to_path_buf() });
        Ok(())
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeDecl> {
        self.types.get(name).map(|e| &e.decl)
    }

    pub fn get_global(&self, name: &str) -> Option<&GlobalDecl> {
        self.globals.get(name).map(|e| &e.decl)
    }

    pub fn source_of_type(&self, name: &str) -> Option<&Path> {
        self.types.get(name).map(|e| e.source.as_path())
    }

    pub fn source_of_global(&self, name: &str) -> Option<&Path> {
        self.globals.get(name).map(|e| e.source.as_path())
    }

    pub fn types(&self) -> impl Iterator<Item = (&str, &CatalogEntry<TypeDecl>)> {
        self.types.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn globals(&self) -> impl Iterator<Item = (&str, &CatalogEntry<GlobalDecl>)> {
        self.globals.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn global_count(&self) -> usize {
        self.globals.len()
    }

    /// Interprets a type-name reference.
    ///
    /// An absent or empty reference yields `("", None)`. A primitive yields
    /// its alias and no declaration; anything else must name a catalog type
    /// and yields `{namespace}::{name}` with the declaration. When
    /// `expected` is given the resolved kind must match it.
    pub fn resolve_type_reference(
        &self,
        reference: Option<&str>,
        expected: Option<ExpectedKind>,
        context: &str,
    ) -> Result<(String, Option<&TypeDecl>)> {
        let name = match reference.filter(|r| !r.is_empty()) {
            Some(name) => name,
            None => return Ok((String::new(), None)),
        };

        let unexpected = |expected: ExpectedKind| CodegenError::UnexpectedKind {
            name: name.to_string(),
            expected: expected.to_string(),
            context: context.to_string(),
        };

        if is_primitive(name) {
            if let Some(expected) = expected {
                if expected != ExpectedKind::Primitive {
                    return Err(unexpected(expected));
                }
            }
            return Ok((primitive_alias(name)?, None));
        }

        let decl = self.get_type(name).ok_or_else(|| CodegenError::UnresolvedReference {
            name: name.to_string(),
            context: context.to_string(),
        })?;

        if let Some(expected) = expected {
            if !expected.accepts(&decl.kind) {
                return Err(unexpected(expected));
            }
        }

        Ok((format!("{}::{}", self.main_namespace, name), Some(decl)))
    }

    /// Joins the root namespace (optional), every enclosing scope and
    /// `leaf` with `::`.
    pub fn fully_qualified_name(&self, scope: &[ScopeSegment], leaf: &str, include_namespace: bool) -> String {
        let mut names: Vec<&str> = Vec::with_capacity(scope.len() + 2);
        if include_namespace {
            names.push(&self.main_namespace);
        }
        names.extend(scope.iter().map(ScopeSegment::as_str));
        if !leaf.is_empty() {
            names.push(leaf);
        }
        names.join("::")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{GlobalDecl, TypeKind, XmlElement};
    use crate::testing::{enum_item, global_object, global_type};

    fn source() -> PathBuf {
        PathBuf::from("df.test.xml")
    }

    #[test]
    fn test_register_and_resolve() {
        let mut catalog = Catalog::new("df");
        let el = global_type("enum-type", "color").with_child(enum_item(Some("RED"), None));
        let decl = TypeDecl::from_global_type(&el);
        catalog.register_type(decl.clone(), &source()).unwrap();

        let (qualified, resolved) = catalog
            .resolve_type_reference(Some("color"), Some(ExpectedKind::Enum), "test")
            .unwrap();
        assert_eq!(qualified, "df::color");
        assert_eq!(resolved, Some(&decl));
        assert_eq!(catalog.source_of_type("color"), Some(source().as_path()));
    }

    #[test]
    fn test_empty_reference_is_not_an_error() {
        let catalog = Catalog::new("df");
        let (qualified, resolved) = catalog.resolve_type_reference(None, Some(ExpectedKind::Enum), "test").unwrap();
        assert!(qualified.is_empty());
        assert!(resolved.is_none());
        assert!(catalog.resolve_type_reference(Some(""), None, "test").unwrap().0.is_empty());
    }

    #[test]
    fn test_primitive_reference() {
        let catalog = Catalog::new("df");
        let (qualified, resolved) = catalog.resolve_type_reference(Some("s-float"), None, "test").unwrap();
        assert_eq!(qualified, "float");
        assert!(resolved.is_none());

        assert!(catalog.resolve_type_reference(Some("int16_t"), Some(ExpectedKind::Primitive), "test").is_ok());
        let err = catalog.resolve_type_reference(Some("int16_t"), Some(ExpectedKind::Enum), "test").unwrap_err();
        assert!(matches!(err, CodegenError::UnexpectedKind { .. }));
    }

    #[test]
    fn test_unresolved_and_unexpected() {
        let mut catalog = Catalog::new("df");
        let el = global_type("struct-type", "unit");
        catalog.register_type(TypeDecl::from_global_type(&el), &source()).unwrap();

        let err = catalog.resolve_type_reference(Some("item"), None, "test").unwrap_err();
        assert!(matches!(err, CodegenError::UnresolvedReference { ref name, .. } if name == "item"));

        let err = catalog.resolve_type_reference(Some("unit"), Some(ExpectedKind::Enum), "test").unwrap_err();
        assert!(matches!(err, CodegenError::UnexpectedKind { .. }));
        assert!(catalog.resolve_type_reference(Some("unit"), Some(ExpectedKind::Compound), "test").is_ok());
    }

    #[test]
    fn test_duplicates() {
        let mut catalog = Catalog::new("df");
        let el = global_type("struct-type", "world");
        catalog.register_type(TypeDecl::from_global_type(&el), &source()).unwrap();

        let err = catalog.register_type(TypeDecl::from_global_type(&el), &source()).unwrap_err();
        assert!(matches!(err, CodegenError::DuplicateDefinition { namespace: Namespace::Type, .. }));
        assert_eq!(err.to_string(), "Duplicate definition of type world");

        let global = GlobalDecl::from_element(&global_object("world", "world"));
        catalog.register_global(global.clone(), &source()).unwrap();
        let err = catalog.register_global(global, &source()).unwrap_err();
        assert_eq!(err.to_string(), "Duplicate definition of global world");

        assert_eq!(catalog.type_count(), 1);
        assert_eq!(catalog.global_count(), 1);
    }

    #[test]
    fn test_missing_names() {
        let mut catalog = Catalog::new("df");
        let el = XmlElement::new("ld:global-type").with_attr("ld:meta", "enum-type");
        let err = catalog.register_type(TypeDecl::from_global_type(&el), &source()).unwrap_err();
        assert!(matches!(err, CodegenError::MissingName { .. }));

        let el = XmlElement::new("ld:global-object");
        let err = catalog.register_global(GlobalDecl::from_element(&el), &source()).unwrap_err();
        assert!(matches!(err, CodegenError::UnnamedGlobal { .. }));
    }

    #[test]
    fn test_forbidden_attributes_on_registration() {
        let mut catalog = Catalog::new("df");
        for attribute in ["size", "offset", "alignment"] {
            let el = global_type("struct-type", attribute).with_attr(attribute, "8");
            let err = catalog.register_type(TypeDecl::from_global_type(&el), &source()).unwrap_err();
            assert!(matches!(err, CodegenError::IllegalAttribute { .. }));
        }
        assert_eq!(catalog.type_count(), 0);
    }

    #[test]
    fn test_fully_qualified_name() {
        let catalog = Catalog::new("df");
        let scope = vec![
            ScopeSegment::Type("unit".to_string()),
            ScopeSegment::Global,
            ScopeSegment::Typedef("T_flags".to_string()),
        ];
        assert_eq!(catalog.fully_qualified_name(&scope, "dead", true), "df::unit::global::T_flags::dead");
        assert_eq!(catalog.fully_qualified_name(&[], "unit", false), "unit");
        assert_eq!(catalog.fully_qualified_name(&[], "", true), "df");
    }

    #[test]
    fn test_insertion_order() {
        let mut catalog = Catalog::new("df");
        for name in ["zeta", "alpha", "mid"] {
            let el = global_type("struct-type", name);
            catalog.register_type(TypeDecl::from_global_type(&el), &source()).unwrap();
        }
        let names: Vec<&str> = catalog.types().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(catalog.get_type("mid").unwrap().kind, TypeKind::Struct);
    }
}
