use std::fmt;

use serde::Serialize;

/// Extensions accepted at the upload boundary.
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["txt", "pdf", "docx", "jpg", "jpeg", "png", "bmp"];

/// Extraction route chosen from a file's extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "route", content = "extension")]
pub enum FileKind {
    Image,
    Pdf,
    Docx,
    Text,
    Unsupported(String),
}

impl FileKind {
    /// Routes on the lowercase text after the last `.` of `name`.
    ///
    /// A name without a dot is treated as its own extension, so `README`
    /// resolves to the unsupported extension `readme`.
    pub fn from_name(name: &str) -> Self {
        Self::from_extension(&extension_of(name))
    }

    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "bmp" => Self::Image,
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "txt" => Self::Text,
            other => Self::Unsupported(other.to_string()),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Image => "image (OCR)",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Text => "text",
            Self::Unsupported(ext) => ext,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lowercase suffix after the last `.`, or the whole lowercased name.
pub fn extension_of(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_lowercase()
}

/// MIME type declared for an upload read from disk.
pub fn mime_for_name(name: &str) -> &'static str {
    match extension_of(name).as_str() {
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}
