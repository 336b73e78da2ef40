use std::fs;
use std::path::Path;

use crate::core::Result;

/// Reads a text file as UTF-8, dropping invalid byte sequences, trimmed.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(decode_lossless(&bytes).trim().to_string())
}

/// Decodes valid UTF-8 runs and skips invalid bytes instead of replacing
/// them with U+FFFD.
pub fn decode_lossless(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn drops_invalid_bytes() {
        assert_eq!(decode_lossless(b"caf\xc3\xa9 \xff\xfeok"), "café ok");
    }

    #[test]
    fn keeps_literal_replacement_characters() {
        assert_eq!(decode_lossless("a\u{FFFD}b".as_bytes()), "a\u{FFFD}b");
    }

    #[test]
    fn trims_file_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"\n\n  first line\nsecond\xff line  \n").unwrap();
        assert_eq!(read_text(&path).unwrap(), "first line\nsecond line");
    }
}
