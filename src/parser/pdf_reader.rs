use std::path::PathBuf;

use lopdf::Document;
use tracing::debug;

use crate::core::Result;

#[derive(Debug, Clone)]
pub struct PdfReader {
    path: PathBuf,
    document: Document,
}

impl PdfReader {
    pub fn new(path: PathBuf) -> Result<Self> {
        let document = Document::load(&path)?;
        Ok(Self { path, document })
    }

    /// Embedded text of every page, in physical order, 1-based.
    pub fn page_texts(&self) -> Result<Vec<(u32, String)>> {
        let mut pages = Vec::new();
        for (idx, number) in self.document.get_pages().into_keys().enumerate() {
            let text = self.document.extract_text(&[number])?;
            pages.push(((idx + 1) as u32, text));
        }
        Ok(pages)
    }

    /// Page-marked text of all text-bearing pages, or `None` when no page has
    /// any.
    pub fn extract_text(&self) -> Result<Option<String>> {
        let pages = self.page_texts()?;
        debug!(path = %self.path.display(), pages = pages.len(), "read pdf text layer");
        Ok(join_pages(pages))
    }
}

/// Joins `--- Page N ---` blocks for pages whose text is non-blank.
///
/// `N` is the physical page number carried with each text, so skipped blank
/// pages leave gaps in the numbering.
pub fn join_pages<I>(pages: I) -> Option<String>
where
    I: IntoIterator<Item = (u32, String)>,
{
    let blocks: Vec<String> = pages
        .into_iter()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(number, text)| format!("--- Page {number} ---\n{text}"))
        .collect();

    if blocks.is_empty() {
        None
    } else {
        Some(blocks.join("\n\n"))
    }
}
