pub mod docx_reader;
pub mod pdf_reader;
pub mod text_reader;

pub use pdf_reader::PdfReader;
