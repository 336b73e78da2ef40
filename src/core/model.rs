use std::fmt;

use serde::Serialize;

use crate::core::format::{mime_for_name, FileKind};

/// A single file handed to the tool, read fully into memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub size: u64,
    pub mime_type: String,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = mime_for_name(&name).to_string();
        Self {
            size: bytes.len() as u64,
            name,
            bytes,
            mime_type,
        }
    }

    pub fn kind(&self) -> FileKind {
        FileKind::from_name(&self.name)
    }

    pub fn size_kb(&self) -> f64 {
        self.size as f64 / 1024.0
    }
}

/// Output of one OCR configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionCandidate {
    pub method: &'static str,
    pub text: String,
}

impl ExtractionCandidate {
    pub fn new(method: &'static str, text: impl Into<String>) -> Self {
        Self {
            method,
            text: text.into(),
        }
    }

    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Trimmed length in characters, the quality proxy used for selection.
    pub fn score(&self) -> usize {
        self.trimmed().chars().count()
    }
}

/// Which extractor boundary a failure was caught at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Image,
    Document,
}

/// Everything other than successfully extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Diagnostic {
    OcrUnavailable,
    NoTextInImage,
    NoTextInDocument,
    EmptyFile,
    ScannedPdfUnsupported,
    UnsupportedFormat { extension: String },
    Failure { stage: Stage, message: String },
}

impl Diagnostic {
    pub fn failure(stage: Stage, err: impl fmt::Display) -> Self {
        Self::Failure {
            stage,
            message: err.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. } | Self::UnsupportedFormat { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OcrUnavailable => f.write_str(
                "Tesseract OCR is not installed. Please install it to extract text from images.",
            ),
            Self::NoTextInImage => f.write_str(
                "No text found in the image. Try a clearer image with better contrast.",
            ),
            Self::NoTextInDocument => f.write_str("No text found in document."),
            Self::EmptyFile => f.write_str("File is empty."),
            Self::ScannedPdfUnsupported => f.write_str(
                "No text found in PDF. This might be a scanned document. \
                 Install Tesseract OCR for scanned PDF support.",
            ),
            Self::UnsupportedFormat { extension } => {
                write!(f, "Unsupported file type: {extension}")
            }
            Self::Failure {
                stage: Stage::Image,
                message,
            } => write!(f, "Error extracting from image: {message}"),
            Self::Failure {
                stage: Stage::Document,
                message,
            } => write!(f, "Error: {message}"),
        }
    }
}

/// Result of one extraction call. Rendered to a string only for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Extraction {
    Text(String),
    Diagnostic(Diagnostic),
}

impl Extraction {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Diagnostic(_) => None,
        }
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::Text(_) => None,
            Self::Diagnostic(diagnostic) => Some(diagnostic),
        }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl From<Diagnostic> for Extraction {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::Diagnostic(diagnostic)
    }
}

impl fmt::Display for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Diagnostic(diagnostic) => diagnostic.fmt(f),
        }
    }
}

/// Non-fatal status raised while extracting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Notice {
    LowResolution { width: u32, height: u32 },
    BestMethod { method: &'static str },
}

impl Notice {
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::LowResolution { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowResolution { width, height } => write!(
                f,
                "Image resolution is low ({width}x{height}). For better OCR results, \
                 use images with at least 300x300 pixels."
            ),
            Self::BestMethod { method } => write!(f, "Best OCR method: {method}"),
        }
    }
}

/// An extraction plus the notices raised while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub extraction: Extraction,
    pub notices: Vec<Notice>,
}

impl From<Extraction> for Outcome {
    fn from(extraction: Extraction) -> Self {
        Self {
            extraction,
            notices: Vec::new(),
        }
    }
}

impl From<Diagnostic> for Outcome {
    fn from(diagnostic: Diagnostic) -> Self {
        Extraction::from(diagnostic).into()
    }
}

/// What the dispatcher hands back for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    pub route: FileKind,
    pub extraction: Extraction,
    pub notices: Vec<Notice>,
}

impl ExtractionReport {
    pub fn new(route: FileKind, extraction: impl Into<Extraction>) -> Self {
        Self {
            route,
            extraction: extraction.into(),
            notices: Vec::new(),
        }
    }

    pub fn with_notices(mut self, notices: Vec<Notice>) -> Self {
        self.notices = notices;
        self
    }

    pub fn rendered(&self) -> String {
        self.extraction.render()
    }

    pub fn stats(&self) -> TextStats {
        TextStats::of(&self.rendered())
    }
}

/// Counts shown next to the extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub characters: usize,
    pub words: usize,
    pub lines: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        Self {
            characters: text.chars().count(),
            words: text.split_whitespace().count(),
            lines: text.lines().count(),
        }
    }
}
