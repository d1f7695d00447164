// Fri Oct 16 2026 - Alex

use crate::catalog::Catalog;
use crate::error::Result;
use crate::output::{HeaderRenderer, OutputManager, Render};
use crate::wrapper::{dispatch, DerivedRecord, Dispatch};
use serde::Serialize;
use std::path::PathBuf;

/// A catalog type skipped because no wrapper handles its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnhandledType {
    pub name: String,
    pub kind: String,
    pub source: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EmitReport {
    pub written: Vec<PathBuf>,
    pub unhandled: Vec<UnhandledType>,
}

impl EmitReport {
    pub fn written_count(&self) -> usize {
        self.written.len()
    }

    pub fn unhandled_count(&self) -> usize {
        self.unhandled.len()
    }
}

/// Derives every catalog type, then renders and writes the headers.
pub struct HeaderDriver<R: Render = HeaderRenderer> {
    renderer: R,
    output: OutputManager,
}

impl<R: Render> HeaderDriver<R> {
    pub fn new(renderer: R, output: OutputManager) -> Self {
        Self { renderer, output }
    }

    /// Records for every handled type, in catalog order.
    pub fn derive_all(catalog: &Catalog, report: &mut EmitReport) -> Result<Vec<DerivedRecord>> {
        let mut records = Vec::with_capacity(catalog.type_count());

        for (name, entry) in catalog.types() {
            match dispatch(&entry.decl.kind) {
                Dispatch::Wrap(wrap) => records.push(wrap(&entry.decl, catalog)?),
                Dispatch::Unhandled => {
                    log::warn!(
                        "Unhandled type {} ({}) in {}",
                        name,
                        entry.decl.kind,
                        entry.source.display()
                    );
                    report.unhandled.push(UnhandledType {
                        name: name.to_string(),
                        kind: entry.decl.kind.to_string(),
                        source: entry.source.clone(),
                    });
                }
            }
        }

        Ok(records)
    }

    pub fn emit(mut self, catalog: &Catalog) -> Result<EmitReport> {
        self.output.ensure_exists()?;

        let mut report = EmitReport::default();
        let records = Self::derive_all(catalog, &mut report)?;
        log::info!("Derived {} records, {} unhandled", records.len(), report.unhandled_count());

        for record in &records {
            let text = self.renderer.render(record.template_id(), record)?;
            self.output.write_header(record.name(), &text)?;
        }

        report.written = self.output.into_written();
        Ok(report)
    }
}
