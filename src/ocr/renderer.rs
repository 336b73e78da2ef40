use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::core::{ExtractError, Result};

pub const DEFAULT_DPI: u32 = 200;

const PAGE_PREFIX: &str = "page";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// 1-based physical page number.
    pub number: u32,
    pub path: PathBuf,
}

/// Turns the pages of a PDF into image files for OCR.
pub trait Rasterizer: fmt::Debug {
    /// Renders every page into `out_dir`, sorted by page number.
    fn render_pages(&self, pdf_path: &Path, out_dir: &Path) -> Result<Vec<RenderedPage>>;
}

/// Rasterizes PDF pages to PNG with `pdftoppm`.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    dpi: u32,
}

impl Default for PageRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_DPI)
    }
}

impl PageRenderer {
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }
}

impl Rasterizer for PageRenderer {
    fn render_pages(&self, pdf_path: &Path, out_dir: &Path) -> Result<Vec<RenderedPage>> {
        fs::create_dir_all(out_dir)?;
        let prefix = out_dir.join(PAGE_PREFIX);

        let output = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(pdf_path)
            .arg(&prefix)
            .output()
            .map_err(|err| {
                ExtractError::Render(format!("failed to invoke pdftoppm ({err}); is poppler-utils installed?"))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::Render(stderr.trim().to_string()));
        }

        let pages = collect_pages(out_dir)?;
        debug!(pages = pages.len(), dpi = self.dpi, "rasterized pdf");
        if pages.is_empty() {
            return Err(ExtractError::Render(format!(
                "no pages rendered from {}",
                pdf_path.display()
            )));
        }
        Ok(pages)
    }
}

/// pdftoppm names pages `<prefix>-<n>.png`, zero-padding `n` to the width of
/// the page count, so the number is parsed instead of predicted.
fn collect_pages(out_dir: &Path) -> Result<Vec<RenderedPage>> {
    let mut pages = Vec::new();
    for entry in fs::read_dir(out_dir)? {
        let path = entry?.path();
        if let Some(number) = page_number(&path) {
            pages.push(RenderedPage { number, path });
        }
    }
    pages.sort_by_key(|page| page.number);
    Ok(pages)
}

fn page_number(path: &Path) -> Option<u32> {
    if path.extension()? != "png" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let digits = stem.strip_prefix(PAGE_PREFIX)?.strip_prefix('-')?;
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_padded_page_numbers() {
        assert_eq!(page_number(Path::new("/tmp/x/page-1.png")), Some(1));
        assert_eq!(page_number(Path::new("/tmp/x/page-007.png")), Some(7));
        assert_eq!(page_number(Path::new("/tmp/x/page-3.ppm")), None);
        assert_eq!(page_number(Path::new("/tmp/x/other-3.png")), None);
    }

    #[test]
    fn collects_pages_in_numeric_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["page-10.png", "page-02.png", "page-01.png", "notes.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let numbers: Vec<_> = collect_pages(dir.path())
            .unwrap()
            .into_iter()
            .map(|page| page.number)
            .collect();
        assert_eq!(numbers, [1, 2, 10]);
    }
}
