//! Input validation and plain-text decoding.
//!
//! Everything here runs before any extractor is touched, so an upload that
//! is the wrong type or too large is rejected without side effects. Text
//! decoding never fails: invalid UTF-8 is re-decoded with U+FFFD
//! replacement characters and the load carries on.

use crate::document::DocumentKind;
use crate::error::TextHelperError;
use std::borrow::Cow;
use tracing::{debug, warn};

/// Resolve the document kind of an upload and enforce the size limit.
pub fn validate_upload(
    file_name: &str,
    bytes: &[u8],
    max_upload_bytes: usize,
) -> Result<DocumentKind, TextHelperError> {
    let kind = DocumentKind::from_file_name(file_name).ok_or_else(|| {
        TextHelperError::UnsupportedFileType {
            file_name: file_name.to_string(),
        }
    })?;

    if bytes.len() > max_upload_bytes {
        return Err(TextHelperError::FileTooLarge {
            file_name: file_name.to_string(),
            size: bytes.len(),
            limit: max_upload_bytes,
        });
    }

    debug!("Accepted upload '{}' as {:?} ({} bytes)", file_name, kind, bytes.len());
    Ok(kind)
}

/// Decode bytes as UTF-8, falling back to lossy decoding on invalid input.
pub fn decode_text(bytes: &[u8]) -> String {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => {
            warn!("Input is not valid UTF-8; invalid sequences replaced with U+FFFD");
            s
        }
    }
}

/// Normalise `\r\n` and bare `\r` line endings to `\n`.
pub fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

/// Decode and normalise a plain-text upload.
pub fn decode_plain_text(bytes: &[u8]) -> String {
    normalise_line_endings(&decode_text(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_known_kinds() {
        assert_eq!(
            validate_upload("a.txt", b"x", 10).unwrap(),
            DocumentKind::PlainText
        );
        assert_eq!(
            validate_upload("a.PDF", b"%PDF", 10).unwrap(),
            DocumentKind::Paginated
        );
    }

    #[test]
    fn validate_rejects_unknown_extension() {
        let err = validate_upload("a.docx", b"x", 10).unwrap_err();
        assert!(matches!(err, TextHelperError::UnsupportedFileType { .. }));
    }

    #[test]
    fn validate_checks_type_before_size() {
        let err = validate_upload("a.exe", &[0u8; 32], 4).unwrap_err();
        assert!(matches!(err, TextHelperError::UnsupportedFileType { .. }));
    }

    #[test]
    fn validate_rejects_oversized() {
        let err = validate_upload("a.txt", &[b'a'; 11], 10).unwrap_err();
        assert!(matches!(
            err,
            TextHelperError::FileTooLarge { size: 11, limit: 10, .. }
        ));
        assert!(validate_upload("a.txt", &[b'a'; 10], 10).is_ok());
    }

    #[test]
    fn decode_valid_utf8() {
        assert_eq!(decode_text("héllo ✓".as_bytes()), "héllo ✓");
        assert_eq!(decode_text(b""), "");
    }

    #[test]
    fn decode_invalid_utf8_uses_replacement_char() {
        let text = decode_text(b"ok \xff\xfe end");
        assert!(text.starts_with("ok "));
        assert!(text.ends_with(" end"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn line_endings_normalised() {
        assert_eq!(normalise_line_endings("a\r\nb\rc\nd"), "a\nb\nc\nd");
        assert_eq!(normalise_line_endings("\r\r\n"), "\n\n");
    }

    #[test]
    fn decode_plain_text_normalises() {
        assert_eq!(decode_plain_text(b"Hello\r\nWorld\r"), "Hello\nWorld\n");
    }
}
