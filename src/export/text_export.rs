use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::model::{ExtractionReport, UploadedFile};
use crate::export::{base_name, Exporter};

pub const DOWNLOAD_MIME: &str = "text/plain";

/// `report.txt` becomes `report_extracted.txt`.
pub fn download_name(declared_name: &str) -> String {
    format!("{}_extracted.txt", base_name(declared_name))
}

/// Writes the rendered extraction, diagnostics included, as plain text.
#[derive(Debug, Clone)]
pub struct TextExporter {
    out_dir: PathBuf,
}

impl TextExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

impl Exporter for TextExporter {
    fn export(&self, upload: &UploadedFile, report: &ExtractionReport) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(download_name(&upload.name));
        fs::write(&path, report.rendered())
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}
