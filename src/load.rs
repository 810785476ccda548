//! Document loading: bytes + file name → [`Document`].
//!
//! The kind of document is decided once, from the extension, in
//! [`input::validate_upload`]. After that the two paths never look at the
//! file name again:
//!
//! * **PlainText** — decode (lossy on failure), normalise line endings,
//!   single page.
//! * **Paginated** — hand the bytes to the configured [`PageExtractor`],
//!   trim every page. No extractor means a configuration error.

use crate::config::SessionConfig;
use crate::document::{Document, DocumentKind};
use crate::error::TextHelperError;
use crate::pipeline::extract::{PageExtractor, PdfiumExtractor};
use crate::pipeline::input;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Builds [`Document`]s from uploads.
pub struct DocumentLoader {
    max_upload_bytes: usize,
    extractor: Option<Box<dyn PageExtractor>>,
}

impl DocumentLoader {
    /// A loader that accepts `.txt` only; PDFs report
    /// [`TextHelperError::ExtractionUnavailable`].
    pub fn text_only(config: &SessionConfig) -> Self {
        Self {
            max_upload_bytes: config.max_upload_bytes,
            extractor: None,
        }
    }

    /// A loader using the given extractor for paginated documents.
    pub fn with_extractor(config: &SessionConfig, extractor: Box<dyn PageExtractor>) -> Self {
        Self {
            max_upload_bytes: config.max_upload_bytes,
            extractor: Some(extractor),
        }
    }

    /// Build a loader from config, binding pdfium when PDFs are enabled.
    ///
    /// A failed bind is not fatal: the loader still handles `.txt`, and the
    /// bind error is reported for each PDF load instead. The reason is
    /// returned alongside so front ends can warn up front.
    pub fn from_config(config: &SessionConfig) -> (Self, Option<String>) {
        if !config.enable_pdf {
            return (Self::text_only(config), None);
        }
        match PdfiumExtractor::bind(config.pdfium_library_path.as_deref()) {
            Ok(extractor) => (Self::with_extractor(config, Box::new(extractor)), None),
            Err(e) => {
                warn!("PDF support disabled: {}", e);
                let reason = match e {
                    TextHelperError::ExtractionUnavailable(reason) => reason,
                    other => other.to_string(),
                };
                (Self::text_only(config), Some(reason))
            }
        }
    }

    /// Whether `.pdf` uploads can be loaded.
    pub fn supports_pdf(&self) -> bool {
        self.extractor.is_some()
    }

    /// Load an in-memory upload.
    pub fn load(&self, file_name: &str, bytes: &[u8]) -> Result<Document, TextHelperError> {
        let start = Instant::now();
        let kind = input::validate_upload(file_name, bytes, self.max_upload_bytes)?;

        let document = match kind {
            DocumentKind::PlainText => {
                Document::plain_text(file_name, input::decode_plain_text(bytes))
            }
            DocumentKind::Paginated => self.load_paginated(file_name, bytes)?,
        };

        info!(
            "Loaded '{}': {} page(s) in {}ms",
            file_name,
            document.page_count(),
            start.elapsed().as_millis()
        );
        Ok(document)
    }

    /// Read `path` from disk and load it under its file name.
    pub fn load_path(&self, path: &Path) -> Result<Document, TextHelperError> {
        let bytes = std::fs::read(path).map_err(|e| TextHelperError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.load(&file_name, &bytes)
    }

    fn load_paginated(&self, file_name: &str, bytes: &[u8]) -> Result<Document, TextHelperError> {
        let extractor = self.extractor.as_ref().ok_or_else(|| {
            TextHelperError::ExtractionUnavailable("no PDF extractor is configured".into())
        })?;

        let pages: Vec<String> = extractor
            .extract(file_name, bytes)?
            .into_iter()
            .map(|p| p.trim().to_string())
            .collect();

        Document::paginated(file_name, pages).ok_or_else(|| TextHelperError::ExtractionFailed {
            file_name: file_name.to_string(),
            detail: "document has no pages".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPages(Vec<&'static str>);

    impl PageExtractor for FixedPages {
        fn extract(&self, _: &str, _: &[u8]) -> Result<Vec<String>, TextHelperError> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    struct Broken;

    impl PageExtractor for Broken {
        fn extract(&self, file_name: &str, _: &[u8]) -> Result<Vec<String>, TextHelperError> {
            Err(TextHelperError::ExtractionFailed {
                file_name: file_name.to_string(),
                detail: "bad xref".into(),
            })
        }
    }

    fn config() -> SessionConfig {
        SessionConfig::default()
    }

    #[test]
    fn loads_plain_text_single_page() {
        let loader = DocumentLoader::text_only(&config());
        let doc = loader.load("a.txt", b"Hello\r\nWorld").unwrap();
        assert_eq!(doc.kind(), DocumentKind::PlainText);
        assert_eq!(doc.pages(), ["Hello\nWorld"]);
        assert_eq!(doc.original_text(), "Hello\nWorld");
    }

    #[test]
    fn plain_text_keeps_surrounding_whitespace() {
        let loader = DocumentLoader::text_only(&config());
        let doc = loader.load("a.txt", b"  padded \n").unwrap();
        assert_eq!(doc.original_text(), "  padded \n");
    }

    #[test]
    fn invalid_utf8_still_loads() {
        let loader = DocumentLoader::text_only(&config());
        let doc = loader.load("a.txt", b"caf\xe9").unwrap();
        assert_eq!(doc.original_text(), "caf\u{FFFD}");
    }

    #[test]
    fn pdf_without_extractor_is_unavailable() {
        let loader = DocumentLoader::text_only(&config());
        assert!(!loader.supports_pdf());
        let err = loader.load("book.pdf", b"%PDF-1.7").unwrap_err();
        assert!(matches!(err, TextHelperError::ExtractionUnavailable(_)));
    }

    #[test]
    fn pdf_pages_are_trimmed() {
        let loader =
            DocumentLoader::with_extractor(&config(), Box::new(FixedPages(vec!["  one \n", "\ttwo"])));
        let doc = loader.load("book.pdf", b"%PDF").unwrap();
        assert_eq!(doc.kind(), DocumentKind::Paginated);
        assert_eq!(doc.pages(), ["one", "two"]);
    }

    #[test]
    fn pdf_with_no_pages_fails() {
        let loader = DocumentLoader::with_extractor(&config(), Box::new(FixedPages(vec![])));
        let err = loader.load("empty.pdf", b"%PDF").unwrap_err();
        assert!(matches!(err, TextHelperError::ExtractionFailed { .. }));
    }

    #[test]
    fn extractor_errors_propagate() {
        let loader = DocumentLoader::with_extractor(&config(), Box::new(Broken));
        let err = loader.load("bad.pdf", b"junk").unwrap_err();
        assert!(err.to_string().contains("bad xref"));
    }

    #[test]
    fn unsupported_type_never_reaches_extractor() {
        let loader = DocumentLoader::with_extractor(&config(), Box::new(Broken));
        let err = loader.load("slides.pptx", b"PK").unwrap_err();
        assert!(matches!(err, TextHelperError::UnsupportedFileType { .. }));
    }

    #[test]
    fn disabled_pdf_config_gives_text_only_loader() {
        let cfg = SessionConfig::builder().enable_pdf(false).build().unwrap();
        let (loader, reason) = DocumentLoader::from_config(&cfg);
        assert!(!loader.supports_pdf());
        assert!(reason.is_none());
    }

    #[test]
    fn load_path_reports_missing_file() {
        let loader = DocumentLoader::text_only(&config());
        let err = loader
            .load_path(Path::new("/definitely/not/a/real/file.txt"))
            .unwrap_err();
        assert!(matches!(err, TextHelperError::ReadFailed { .. }));
    }
}
