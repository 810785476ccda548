//! Error types for the text-helper library.
//!
//! Every failure here is recoverable: the controller stays usable after any
//! of them and the session that was active before the failing call is left
//! exactly as it was.
//!
//! Two things are deliberately *not* errors:
//!
//! * Invalid UTF-8 in a `.txt` upload. The loader re-decodes with U+FFFD
//!   replacement characters and logs a warning instead.
//! * Anything in [`crate::transform`]. Those functions are total over all
//!   string inputs.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the text-helper library.
#[derive(Debug, Error)]
pub enum TextHelperError {
    // ── Load errors ───────────────────────────────────────────────────────
    /// The file extension is neither `.txt` nor `.pdf`.
    #[error("Unsupported file type: '{file_name}'\nOnly .txt and .pdf files are supported.")]
    UnsupportedFileType { file_name: String },

    /// The upload is larger than `SessionConfig::max_upload_bytes`.
    #[error("File '{file_name}' is {size} bytes, which exceeds the {limit}-byte upload limit")]
    FileTooLarge {
        file_name: String,
        size: usize,
        limit: usize,
    },

    /// No page extractor is configured, or pdfium could not be bound.
    #[error(
        "PDF support is unavailable: {0}\n\n\
PDF text extraction needs the pdfium shared library. You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium.\n\
  • Place libpdfium next to the working directory.\n\
  • Install pdfium into a system library path.\n"
    )]
    ExtractionUnavailable(String),

    /// The extractor was present but could not read the document.
    #[error("Failed to read PDF '{file_name}': {detail}")]
    ExtractionFailed { file_name: String, detail: String },

    // ── Session errors ────────────────────────────────────────────────────
    /// An operation needs a loaded document but none is active.
    #[error("No document loaded. Open a .txt or .pdf file first.")]
    NoDocument,

    /// An edit tool was used outside the edit-capable state.
    #[error("Editing is disabled: {reason}")]
    EditingDisabled { reason: String },

    /// A command-line or interactive command could not be parsed.
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not read an input file from disk.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the exported file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TextHelperError>;
