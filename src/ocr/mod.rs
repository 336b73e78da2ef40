pub mod bridge;
pub mod locator;
pub mod preprocess;
pub mod renderer;
pub mod strategy;

use std::fmt;
use std::path::Path;

use crate::core::Result;

pub use bridge::Tesseract;
pub use locator::Locator;
pub use renderer::{PageRenderer, Rasterizer};
pub use strategy::MultiStrategyOcr;

/// Tesseract page-segmentation modes the extractor uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentationMode {
    /// `--psm 3`
    Auto,
    /// `--psm 6`
    UniformBlock,
    /// `--psm 11`
    SparseText,
}

impl SegmentationMode {
    pub fn psm(self) -> u8 {
        match self {
            Self::Auto => 3,
            Self::UniformBlock => 6,
            Self::SparseText => 11,
        }
    }
}

impl fmt::Display for SegmentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.psm())
    }
}

/// Something that turns an image file into raw text.
pub trait OcrEngine: fmt::Debug {
    fn recognize(&self, image: &Path, mode: SegmentationMode) -> Result<String>;
}
