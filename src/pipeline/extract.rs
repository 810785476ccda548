//! Paginated text extraction: one plain-text string per PDF page.
//!
//! The loader only talks to the [`PageExtractor`] trait, so tests substitute
//! an in-memory implementation and production code plugs in
//! [`PdfiumExtractor`].
//!
//! pdfium is bound at runtime rather than linked. A missing or unloadable
//! library therefore surfaces as [`TextHelperError::ExtractionUnavailable`]
//! when the extractor is created, never as a crash.

use crate::error::TextHelperError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an existing pdfium shared library.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Extracts the text of every page of a paginated document.
pub trait PageExtractor {
    /// Return the raw text of each page, in page order.
    ///
    /// Implementations report unreadable input as
    /// [`TextHelperError::ExtractionFailed`]. Trimming is done by the loader.
    fn extract(&self, file_name: &str, bytes: &[u8]) -> Result<Vec<String>, TextHelperError>;
}

/// [`PageExtractor`] backed by the pdfium library.
pub struct PdfiumExtractor {
    pdfium: Pdfium,
}

impl PdfiumExtractor {
    /// Bind pdfium, trying in order: `library_path`, `PDFIUM_LIB_PATH`,
    /// the working directory, then system library paths.
    pub fn bind(library_path: Option<&Path>) -> Result<Self, TextHelperError> {
        let env_path = std::env::var_os(PDFIUM_LIB_PATH_ENV).map(PathBuf::from);

        let bindings = match library_path.or(env_path.as_deref()) {
            // An explicit path is authoritative; don't silently fall back.
            Some(path) => {
                debug!("Binding pdfium from {}", path.display());
                Pdfium::bind_to_library(library_file(path))
            }
            None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library()),
        }
        .map_err(|e| TextHelperError::ExtractionUnavailable(format!("{:?}", e)))?;

        info!("pdfium bound");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

/// Accept either the library file itself or the directory containing it.
fn library_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(path)
    } else {
        path.to_path_buf()
    }
}

impl PageExtractor for PdfiumExtractor {
    fn extract(&self, file_name: &str, bytes: &[u8]) -> Result<Vec<String>, TextHelperError> {
        let failed = |detail: String| TextHelperError::ExtractionFailed {
            file_name: file_name.to_string(),
            detail,
        };

        // The document handle is dropped when this function returns; nothing
        // outlives the extracted strings.
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| failed(format!("{:?}", e)))?;

        let mut pages = Vec::new();
        for (idx, page) in document.pages().iter().enumerate() {
            let text = page
                .text()
                .map_err(|e| failed(format!("page {}: {:?}", idx + 1, e)))?
                .all();
            debug!("Extracted {} chars from page {}", text.len(), idx + 1);
            pages.push(text);
        }

        info!("PDF '{}' extracted: {} pages", file_name, pages.len());
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_file_keeps_explicit_file_path() {
        let p = Path::new("/definitely/not/here/libpdfium.so");
        assert_eq!(library_file(p), p.to_path_buf());
    }

    #[test]
    fn bind_reports_unavailable_for_bad_path() {
        let result = PdfiumExtractor::bind(Some(Path::new("/definitely/not/here/libpdfium.so")));
        assert!(matches!(
            result,
            Err(TextHelperError::ExtractionUnavailable(_))
        ));
    }
}
