// Fri Oct 16 2026 - Alex

use crate::error::{CodegenError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes one header file per type into an existing directory.
#[derive(Debug, Clone)]
pub struct OutputManager {
    output_directory: PathBuf,
    extension: String,
    written: Vec<PathBuf>,
}

impl OutputManager {
    pub fn new(output_directory: &Path, extension: &str) -> Self {
        Self {
            output_directory: output_directory.to_path_buf(),
            extension: extension.to_string(),
            written: Vec::new(),
        }
    }

    /// The directory is never created here.
    pub fn ensure_exists(&self) -> Result<()> {
        if !self.output_directory.is_dir() {
            return Err(CodegenError::MissingOutputDirectory(self.output_directory.clone()));
        }
        Ok(())
    }

    pub fn header_path(&self, type_name: &str) -> PathBuf {
        self.output_directory.join(format!("{}.{}", type_name, self.extension))
    }

    pub fn write_header(&mut self, type_name: &str, content: &str) -> Result<PathBuf> {
        let path = self.header_path(type_name);
        fs::write(&path, content)?;
        log::debug!("Wrote {}", path.display());
        self.written.push(path.clone());
        Ok(path)
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn into_written(self) -> Vec<PathBuf> {
        self.written
    }
}
