//! Input documents: line splitting and charset handling.
//!
//! A [`RawDocument`] is the ordered sequence of physical lines of one
//! input blob. Splitting recognizes `\r\n`, `\r` and `\n` as equivalent
//! line endings, removes them and nothing else, and keeps blank lines
//! as zero-length entries. Blank lines carry meaning in field-oriented
//! sources (a missing value occupies its own line), so no filtering
//! happens here.
//!
//! File input additionally auto-detects the charset with `chardet` and
//! decodes with `encoding_rs`, since exported account files rarely
//! declare their encoding.

use std::path::Path;

use crate::error::DocumentError;

/// An input blob split into physical lines.
///
/// Immutable once constructed; borrows the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument<'a> {
    lines: Vec<&'a str>,
}

impl<'a> RawDocument<'a> {
    /// Split a blob into lines on any of `\r\n`, `\r`, `\n`.
    ///
    /// Empty input yields a single empty line; a trailing line ending
    /// yields a trailing empty line. There are no error conditions.
    ///
    /// # Example
    /// ```
    /// use ledgercast::document::RawDocument;
    ///
    /// let doc = RawDocument::parse("a\r\nb\rc\n");
    /// assert_eq!(doc.lines(), &["a", "b", "c", ""]);
    /// ```
    pub fn parse(text: &'a str) -> Self {
        let bytes = text.as_bytes();
        let mut lines = Vec::new();
        let mut start = 0;
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'\r' => {
                    lines.push(&text[start..i]);
                    // \r\n counts as one ending
                    i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                    start = i;
                }
                b'\n' => {
                    lines.push(&text[start..i]);
                    i += 1;
                    start = i;
                }
                _ => i += 1,
            }
        }

        lines.push(&text[start..]);
        Self { lines }
    }

    /// The lines, in input order.
    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    /// Number of physical lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

// =============================================================================
// Charset handling
// =============================================================================

/// A decoded input blob with its detected encoding.
#[derive(Debug, Clone)]
pub struct DecodedInput {
    /// Decoded text content.
    pub content: String,
    /// Detected or used encoding.
    pub encoding: String,
}

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the specified encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> Result<String, DocumentError> {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => Ok(String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).to_string())),
        "iso-8859-1" | "latin-1" | "latin1" => {
            Ok(encoding_rs::ISO_8859_15.decode(bytes).0.to_string())
        }
        "windows-1252" | "cp1252" => Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.to_string()),
        _ => {
            // Fallback: UTF-8 with lossy conversion
            Ok(String::from_utf8_lossy(bytes).to_string())
        }
    }
}

/// Decode input bytes with encoding auto-detection.
pub fn decode_input(bytes: &[u8]) -> Result<DecodedInput, DocumentError> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    Ok(DecodedInput { content, encoding })
}

/// Read and decode an input file with encoding auto-detection.
pub fn read_input<P: AsRef<Path>>(path: P) -> Result<DecodedInput, DocumentError> {
    let bytes = std::fs::read(path.as_ref())?;
    decode_input(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lf() {
        let doc = RawDocument::parse("a\nb\nc");
        assert_eq!(doc.lines(), &["a", "b", "c"]);
    }

    #[test]
    fn test_split_crlf() {
        let doc = RawDocument::parse("a\r\nb\r\nc");
        assert_eq!(doc.lines(), &["a", "b", "c"]);
    }

    #[test]
    fn test_split_bare_cr() {
        let doc = RawDocument::parse("a\rb\rc");
        assert_eq!(doc.lines(), &["a", "b", "c"]);
    }

    #[test]
    fn test_mixed_endings() {
        let doc = RawDocument::parse("a\r\nb\rc\nd");
        assert_eq!(doc.lines(), &["a", "b", "c", "d"]);
    }

    #[test]
    fn test_empty_input_is_one_empty_line() {
        let doc = RawDocument::parse("");
        assert_eq!(doc.lines(), &[""]);
        assert_eq!(doc.line_count(), 1);
    }

    #[test]
    fn test_blank_lines_preserved() {
        let doc = RawDocument::parse("a\n\nb\n");
        assert_eq!(doc.lines(), &["a", "", "b", ""]);
    }

    #[test]
    fn test_crlf_not_two_endings() {
        // \r\n must not produce a phantom empty line between \r and \n
        let doc = RawDocument::parse("a\r\n\r\nb");
        assert_eq!(doc.lines(), &["a", "", "b"]);
    }

    #[test]
    fn test_detect_utf8() {
        assert_eq!(detect_encoding("Identifier,Name".as_bytes()), "utf-8");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert!(decoded.contains("Soci"));
    }

    #[test]
    fn test_decode_input_roundtrip() {
        let input = decode_input("a,b\n1,2".as_bytes()).unwrap();
        assert_eq!(input.content, "a,b\n1,2");
        assert_eq!(input.encoding, "utf-8");
    }
}
