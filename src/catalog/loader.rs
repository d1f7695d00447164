// Fri Oct 16 2026 - Alex

use crate::catalog::lowering::{LoweringPipeline, Normalize};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{CodegenError, Result};
use crate::schema::declaration::{GLOBAL_OBJECT_TAG, GLOBAL_TYPE_TAG};
use crate::schema::{GlobalDecl, TypeDecl, XmlDocument};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads every matching input file, in sorted order, into one catalog.
pub struct CatalogLoader {
    input_directory: PathBuf,
    input_pattern: String,
    main_namespace: String,
    pipeline: LoweringPipeline,
}

impl CatalogLoader {
    pub fn new(input_directory: &Path, input_pattern: &str, main_namespace: &str) -> Self {
        Self {
            input_directory: input_directory.to_path_buf(),
            input_pattern: input_pattern.to_string(),
            main_namespace: main_namespace.to_string(),
            pipeline: LoweringPipeline::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.input_directory, &config.input_pattern, &config.main_namespace)
    }

    pub fn with_pipeline(mut self, pipeline: LoweringPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn input_files(&self) -> Result<Vec<PathBuf>> {
        let directory = glob::Pattern::escape(&self.input_directory.to_string_lossy());
        let pattern = format!("{}/{}", directory, self.input_pattern);

        let mut files = Vec::new();
        for entry in glob::glob(&pattern).map_err(|e| CodegenError::Pattern(e.to_string()))? {
            let path = entry.map_err(|e| CodegenError::Io(e.into_error()))?;
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Loads the complete catalog. Any registration failure aborts the run.
    pub fn load(&self) -> Result<Catalog> {
        let mut catalog = Catalog::new(&self.main_namespace);
        let files = self.input_files()?;
        if files.is_empty() {
            log::warn!("No files matching {} in {}", self.input_pattern, self.input_directory.display());
        }

        for path in &files {
            log::info!("Loading {}", path.display());
            let source = fs::read_to_string(path)?;
            let document = XmlDocument::parse(&source).map_err(|message| CodegenError::Xml {
                file: path.clone(),
                message,
            })?;
            let document = self.pipeline.normalize(document).map_err(|message| CodegenError::Normalization {
                file: path.clone(),
                message,
            })?;
            Self::register_document(&mut catalog, &document, path)?;
        }

        log::info!(
            "Catalog loaded: {} types, {} globals from {} files",
            catalog.type_count(),
            catalog.global_count(),
            files.len()
        );
        Ok(catalog)
    }

    /// Registers the top-level declarations of one normalized document in
    /// document order. Other top-level elements are ignored.
    pub fn register_document(catalog: &mut Catalog, document: &XmlDocument, source: &Path) -> Result<()> {
        for element in &document.root.children {
            match element.name.as_str() {
                GLOBAL_TYPE_TAG => catalog.register_type(TypeDecl::from_global_type(element), source)?,
                GLOBAL_OBJECT_TAG => catalog.register_global(GlobalDecl::from_element(element), source)?,
                _ => {}
            }
        }
        Ok(())
    }
}
