use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::core::{ExtractError, Result};
use crate::ocr::{OcrEngine, SegmentationMode};

/// Tesseract command-line engine at a located path.
#[derive(Debug, Clone)]
pub struct Tesseract {
    path: PathBuf,
    lang: Option<String>,
}

impl Tesseract {
    pub fn new(path: PathBuf) -> Self {
        Self { path, lang: None }
    }

    /// Tesseract `-l` language list such as `eng+deu`. `None` keeps its default.
    pub fn with_lang(mut self, lang: Option<String>) -> Self {
        self.lang = lang;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    fn command(&self, image: &Path, mode: SegmentationMode) -> Command {
        let mut cmd = Command::new(&self.path);
        cmd.arg(image).arg("stdout").arg("--psm").arg(mode.psm().to_string());
        if let Some(lang) = &self.lang {
            cmd.arg("-l").arg(lang);
        }
        cmd
    }
}

impl OcrEngine for Tesseract {
    fn recognize(&self, image: &Path, mode: SegmentationMode) -> Result<String> {
        debug!(image = %image.display(), psm = mode.psm(), "running tesseract");
        let output = self.command(image, mode).output().map_err(|err| {
            ExtractError::Ocr(format!("failed to invoke {}: {err}", self.path.display()))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::Ocr(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
