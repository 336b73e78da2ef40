use std::io::Write;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::core::model::{
    Diagnostic, Extraction, ExtractionReport, Notice, Outcome, Stage, UploadedFile,
};
use crate::core::{ExtractError, FileKind, Result};
use crate::ocr::{Locator, MultiStrategyOcr, OcrEngine, PageRenderer, Rasterizer, Tesseract};
use crate::parser::docx_reader::{join_paragraphs, read_paragraphs};
use crate::parser::pdf_reader::join_pages;
use crate::parser::text_reader::read_text;
use crate::parser::PdfReader;

/// Finds Tesseract once for the whole process.
pub fn locate_tesseract(config: &AppConfig) -> Option<Tesseract> {
    let found = Locator::platform_default()
        .with_override(config.tesseract.clone())
        .locate();
    match &found {
        Some(path) => info!(path = %path.display(), "tesseract located"),
        None => info!("tesseract not found; image OCR is disabled"),
    }
    found.map(|path| Tesseract::new(path).with_lang(config.lang.clone()))
}

/// Routes files to the right extractor.
///
/// Holds the OCR engine, if any, for the lifetime of the process. Extraction
/// never fails outright: every problem comes back as a [`Diagnostic`].
#[derive(Debug)]
pub struct Extractor {
    ocr: Option<Box<dyn OcrEngine>>,
    renderer: Box<dyn Rasterizer>,
}

impl Extractor {
    pub fn new(ocr: Option<Box<dyn OcrEngine>>) -> Self {
        Self {
            ocr,
            renderer: Box::new(PageRenderer::default()),
        }
    }

    pub fn from_config(config: &AppConfig, tesseract: Option<Tesseract>) -> Self {
        Self::new(tesseract.map(|engine| Box::new(engine) as Box<dyn OcrEngine>))
            .with_renderer(PageRenderer::new(config.dpi))
    }

    pub fn with_renderer(mut self, renderer: impl Rasterizer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn ocr_available(&self) -> bool {
        self.ocr.is_some()
    }

    /// Stages `upload` in a temporary file, extracts it, and removes the file.
    ///
    /// Unsupported extensions are rejected before anything touches disk.
    pub fn process(&self, upload: &UploadedFile) -> Result<ExtractionReport> {
        let route = upload.kind();
        if let FileKind::Unsupported(extension) = &route {
            let diagnostic = Diagnostic::UnsupportedFormat {
                extension: extension.clone(),
            };
            return Ok(ExtractionReport::new(route.clone(), diagnostic));
        }

        let mut staged = tempfile::Builder::new()
            .prefix("textract-")
            .suffix(&upload.name)
            .tempfile()?;
        staged.write_all(&upload.bytes)?;
        staged.flush()?;
        debug!(staged = %staged.path().display(), size = upload.size, "staged upload");

        Ok(self.extract(staged.path(), &upload.name))
    }

    /// Extracts `path`, choosing the route from `declared_name`'s extension.
    pub fn extract(&self, path: &Path, declared_name: &str) -> ExtractionReport {
        let route = FileKind::from_name(declared_name);
        info!(file = declared_name, route = %route, "extracting");

        let result = match &route {
            FileKind::Image => self.extract_image(path),
            FileKind::Pdf => self.extract_pdf(path),
            FileKind::Docx => extract_docx(path).into(),
            FileKind::Text => extract_plain_text(path).into(),
            FileKind::Unsupported(extension) => Diagnostic::UnsupportedFormat {
                extension: extension.clone(),
            }
            .into(),
        };

        ExtractionReport::new(route, result.extraction).with_notices(result.notices)
    }

    fn extract_image(&self, path: &Path) -> Outcome {
        match &self.ocr {
            Some(engine) => MultiStrategyOcr::new(engine.as_ref()).extract(path),
            None => Diagnostic::OcrUnavailable.into(),
        }
    }

    fn extract_pdf(&self, path: &Path) -> Outcome {
        let text_layer = PdfReader::new(path.to_path_buf()).and_then(|reader| reader.extract_text());
        match text_layer {
            Ok(Some(text)) => Extraction::Text(text).into(),
            Ok(None) => match &self.ocr {
                Some(engine) => self.extract_scanned_pdf(engine.as_ref(), path),
                None => Diagnostic::ScannedPdfUnsupported.into(),
            },
            Err(err) => {
                warn!(pdf = %path.display(), "pdf extraction failed: {err}");
                Diagnostic::failure(Stage::Document, err).into()
            }
        }
    }

    /// OCRs each rasterized page of a PDF without a text layer.
    ///
    /// When rasterizing is impossible the PDF itself is handed to the image
    /// extractor, which reports why it could not be decoded.
    fn extract_scanned_pdf(&self, engine: &dyn OcrEngine, path: &Path) -> Outcome {
        info!(pdf = %path.display(), "no text layer; falling back to OCR");
        let ocr = MultiStrategyOcr::new(engine);

        let workdir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(err) => {
                warn!("cannot create page directory: {err}");
                return ocr.extract(path);
            }
        };
        let pages = match self.renderer.render_pages(path, workdir.path()) {
            Ok(pages) => pages,
            Err(err) => {
                warn!("cannot rasterize {}: {err}", path.display());
                return ocr.extract(path);
            }
        };

        let mut notices: Vec<Notice> = Vec::new();
        let mut texts = Vec::with_capacity(pages.len());
        for page in pages {
            let result = ocr.extract(&page.path);
            notices.extend(result.notices);
            match result.extraction {
                Extraction::Text(text) => texts.push((page.number, text)),
                Extraction::Diagnostic(Diagnostic::NoTextInImage) => {}
                Extraction::Diagnostic(other) => {
                    return Outcome {
                        extraction: other.into(),
                        notices,
                    };
                }
            }
        }

        let extraction = match join_pages(texts) {
            Some(text) => Extraction::Text(text),
            None => Diagnostic::NoTextInImage.into(),
        };
        Outcome {
            extraction,
            notices,
        }
    }
}

fn extract_docx(path: &Path) -> Extraction {
    match read_paragraphs(path) {
        Ok(paragraphs) => match join_paragraphs(paragraphs) {
            Some(text) => Extraction::Text(text),
            None => Diagnostic::NoTextInDocument.into(),
        },
        Err(err) => document_failure(path, err),
    }
}

fn extract_plain_text(path: &Path) -> Extraction {
    match read_text(path) {
        Ok(text) if text.is_empty() => Diagnostic::EmptyFile.into(),
        Ok(text) => Extraction::Text(text),
        Err(err) => document_failure(path, err),
    }
}

fn document_failure(path: &Path, err: ExtractError) -> Extraction {
    warn!(file = %path.display(), "extraction failed: {err}");
    Diagnostic::failure(Stage::Document, err).into()
}
