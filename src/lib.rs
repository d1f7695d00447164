// Fri Oct 16 2026 - Alex

pub mod config;
pub mod error;
pub mod schema;
pub mod catalog;
pub mod wrapper;
pub mod output;
pub mod driver;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{CodegenError, Result};
pub use catalog::{Catalog, CatalogLoader};
pub use wrapper::{dispatch, DerivedRecord, Dispatch};
pub use output::{HeaderRenderer, OutputManager, Render};
pub use driver::{EmitReport, HeaderDriver, UnhandledType};

/// Loads the catalog described by `config` and writes one header per
/// handled type.
pub fn run(config: &Config) -> Result<EmitReport> {
    config.validate().map_err(CodegenError::InvalidConfig)?;

    let catalog = CatalogLoader::from_config(config).load()?;

    let mut renderer = HeaderRenderer::new(&config.main_namespace).with_extension(&config.header_extension);
    if let Some(ref dir) = config.template_directory {
        renderer = renderer.with_template_directory(dir)?;
    }
    let output = OutputManager::new(&config.output_directory, &config.header_extension);

    HeaderDriver::new(renderer, output).emit(&catalog)
}
