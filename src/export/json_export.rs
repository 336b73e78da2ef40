use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::core::model::{Extraction, ExtractionReport, Notice, TextStats, UploadedFile};
use crate::core::FileKind;
use crate::export::{base_name, Exporter};

#[derive(Debug, Serialize)]
struct FileInfo<'a> {
    name: &'a str,
    mime_type: &'a str,
    size: u64,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    file: FileInfo<'a>,
    #[serde(flatten)]
    route: &'a FileKind,
    extraction: &'a Extraction,
    notices: &'a [Notice],
    stats: TextStats,
    text: String,
}

/// Writes `{base}_extracted.json` with file info, route, notices and stats.
#[derive(Debug, Clone)]
pub struct JsonExporter {
    out_dir: PathBuf,
}

impl JsonExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

impl Exporter for JsonExporter {
    fn export(&self, upload: &UploadedFile, report: &ExtractionReport) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self
            .out_dir
            .join(format!("{}_extracted.json", base_name(&upload.name)));

        let data = JsonReport {
            file: FileInfo {
                name: &upload.name,
                mime_type: &upload.mime_type,
                size: upload.size,
            },
            route: &report.route,
            extraction: &report.extraction,
            notices: &report.notices,
            stats: report.stats(),
            text: report.rendered(),
        };
        fs::write(&path, serde_json::to_string_pretty(&data)?)?;
        Ok(path)
    }
}
