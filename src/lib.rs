pub mod config;
pub mod core;
pub mod export;
pub mod ocr;
pub mod parser;
pub mod pipeline;

pub use config::AppConfig;
pub use core::model::{Diagnostic, Extraction, ExtractionReport, Notice, UploadedFile};
pub use pipeline::Extractor;
