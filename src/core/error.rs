use std::io;

use thiserror::Error;

/// Failures raised inside the extraction core.
///
/// These never reach the presentation layer directly: each extractor turns
/// them into a [`Diagnostic::Failure`](crate::core::model::Diagnostic) at its
/// own boundary.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Image(#[from] image::ImageError),

    #[error("{0}")]
    Pdf(#[from] lopdf::Error),

    #[error("{0}")]
    Docx(String),

    #[error("tesseract failed: {0}")]
    Ocr(String),

    #[error("pdftoppm failed: {0}")]
    Render(String),

    #[error("image preprocessing failed: {0}")]
    Preprocess(&'static str),
}

impl From<docx_rs::ReaderError> for ExtractError {
    fn from(err: docx_rs::ReaderError) -> Self {
        Self::Docx(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
