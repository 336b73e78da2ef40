//! Multi-strategy OCR.
//!
//! The same image goes through several Tesseract configurations and the
//! longest trimmed output is kept. Length is a crude stand-in for quality,
//! not a confidence score: a noisy run that hallucinates characters can beat
//! a clean one.

use std::path::Path;

use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use tracing::{debug, info, warn};

use crate::core::model::{Diagnostic, Extraction, ExtractionCandidate, Notice, Outcome, Stage};
use crate::core::Result;
use crate::ocr::preprocess;
use crate::ocr::{OcrEngine, SegmentationMode};

/// Images smaller than this on either side get a low-resolution notice.
pub const MIN_RESOLUTION: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Enhanced,
    Original,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    pub label: &'static str,
    pub source: ImageSource,
    pub mode: SegmentationMode,
}

/// Declaration order is the tie-break order.
pub const STRATEGIES: [Strategy; 4] = [
    Strategy {
        label: "Enhanced",
        source: ImageSource::Enhanced,
        mode: SegmentationMode::UniformBlock,
    },
    Strategy {
        label: "Original PSM6",
        source: ImageSource::Original,
        mode: SegmentationMode::UniformBlock,
    },
    Strategy {
        label: "Auto PSM3",
        source: ImageSource::Original,
        mode: SegmentationMode::Auto,
    },
    Strategy {
        label: "Sparse PSM11",
        source: ImageSource::Original,
        mode: SegmentationMode::SparseText,
    },
];

#[derive(Debug, Clone, Copy)]
pub struct MultiStrategyOcr<'a> {
    engine: &'a dyn OcrEngine,
}

impl<'a> MultiStrategyOcr<'a> {
    pub fn new(engine: &'a dyn OcrEngine) -> Self {
        Self { engine }
    }

    pub fn extract(&self, image_path: &Path) -> Outcome {
        let mut notices = Vec::new();
        let extraction = match self.candidates(image_path, &mut notices) {
            Ok(candidates) => match select_best(&candidates) {
                Some(best) => {
                    info!(method = best.method, chars = best.score(), "selected OCR result");
                    notices.push(Notice::BestMethod {
                        method: best.method,
                    });
                    Extraction::Text(best.trimmed().to_string())
                }
                None => Diagnostic::NoTextInImage.into(),
            },
            Err(err) => {
                warn!(image = %image_path.display(), "OCR failed: {err}");
                Diagnostic::failure(Stage::Image, err).into()
            }
        };

        Outcome {
            extraction,
            notices,
        }
    }

    /// Runs every strategy in order. The first engine error aborts the run.
    pub fn candidates(
        &self,
        image_path: &Path,
        notices: &mut Vec<Notice>,
    ) -> Result<Vec<ExtractionCandidate>> {
        let original = ImageReader::open(image_path)?
            .with_guessed_format()?
            .decode()?;

        if let Some(notice) = resolution_notice(&original) {
            debug!(image = %image_path.display(), "{notice}");
            notices.push(notice);
        }

        let enhanced = preprocess::enhance(&original);
        let staged = tempfile::Builder::new()
            .prefix("textract-enhanced-")
            .suffix(".png")
            .tempfile()?;
        enhanced.save_with_format(staged.path(), ImageFormat::Png)?;

        STRATEGIES
            .iter()
            .map(|strategy| -> Result<ExtractionCandidate> {
                let input = match strategy.source {
                    ImageSource::Enhanced => staged.path(),
                    ImageSource::Original => image_path,
                };
                let text = self.engine.recognize(input, strategy.mode)?;
                Ok(ExtractionCandidate::new(strategy.label, text))
            })
            .collect()
    }
}

fn resolution_notice(image: &DynamicImage) -> Option<Notice> {
    let (width, height) = image.dimensions();
    (width < MIN_RESOLUTION || height < MIN_RESOLUTION)
        .then_some(Notice::LowResolution { width, height })
}

/// Picks the candidate with the strictly greatest trimmed length.
///
/// Ties keep the earliest candidate. Returns `None` when every candidate is
/// empty after trimming.
pub fn select_best(candidates: &[ExtractionCandidate]) -> Option<&ExtractionCandidate> {
    let mut best = None;
    let mut best_len = 0;
    for candidate in candidates {
        let len = candidate.score();
        if len > best_len {
            best_len = len;
            best = Some(candidate);
        }
    }
    best
}
