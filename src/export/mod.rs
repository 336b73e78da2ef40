pub mod json_export;
pub mod text_export;

use std::path::PathBuf;

use anyhow::Result;

use crate::core::model::{ExtractionReport, UploadedFile};

pub use json_export::JsonExporter;
pub use text_export::TextExporter;

pub trait Exporter {
    /// Writes the artifact for `report` and returns where it went.
    fn export(&self, upload: &UploadedFile, report: &ExtractionReport) -> Result<PathBuf>;
}

/// Declared name up to its first `.`.
pub fn base_name(declared_name: &str) -> &str {
    declared_name.split('.').next().unwrap_or(declared_name)
}
