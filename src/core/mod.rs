pub mod error;
pub mod format;
pub mod model;

pub use error::{ExtractError, Result};
pub use format::{FileKind, SUPPORTED_EXTENSIONS};
