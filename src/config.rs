use std::path::PathBuf;

use crate::ocr::renderer::DEFAULT_DPI;

/// 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Settings gathered once at startup from flags, environment and `.env`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Explicit Tesseract executable, tried before the platform defaults.
    pub tesseract: Option<PathBuf>,
    /// Tesseract language list passed as `-l`.
    pub lang: Option<String>,
    /// Upload size limit in bytes, enforced by the CLI only. `0` disables it.
    pub max_file_size: u64,
    /// Rasterization DPI for scanned PDFs.
    pub dpi: u32,
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tesseract: None,
            lang: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            dpi: DEFAULT_DPI,
            output_dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    pub fn admits(&self, size: u64) -> bool {
        self.max_file_size == 0 || size <= self.max_file_size
    }
}
