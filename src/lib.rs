//! # text-helper
//!
//! The core of a plain-text editor and a Kindle-style text/PDF reader:
//! load a document, read it page by page, run string tools over the working
//! text, and export the result with a timestamp footer.
//!
//! ## Pieces
//!
//! ```text
//! bytes + file name
//!  │
//!  ├─ 1. Load      .txt → decode (lossy fallback) → 1 page
//!  │               .pdf → PageExtractor (pdfium) → N trimmed pages
//!  ├─ 2. Session   page index, mode (Read/Append), working text, last count
//!  ├─ 3. Tools     upper / lower / strip / capitalize / title / replace / count
//!  └─ 4. Export    text + optional append block + "Processed on: …" footer
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use text_helper::{DocumentLoader, Mode, SessionConfig, SessionController, Transform};
//!
//! let config = SessionConfig::default();
//! let loader = DocumentLoader::text_only(&config);
//! let mut controller = SessionController::new(config, loader);
//!
//! controller.load("greeting.txt", b"Hello\nWorld").unwrap();
//! controller.set_mode(Mode::Append).unwrap();
//! controller.apply_transform(Transform::Upper).unwrap();
//! controller.replace("WORLD", "EARTH").unwrap();
//!
//! assert_eq!(controller.current_text(), Some("HELLO\nEARTH"));
//! assert_eq!(controller.stats().unwrap().words, 2);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `texthelper` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! PDF support needs the pdfium shared library at runtime. Without it,
//! `.txt` files keep working and PDF loads report
//! [`TextHelperError::ExtractionUnavailable`].

// ── Modules ──────────────────────────────────────────────────────────────

pub mod command;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod load;
pub mod pipeline;
pub mod reader;
pub mod session;
pub mod transform;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use command::{Command, Reply};
pub use config::{SessionConfig, SessionConfigBuilder};
pub use document::{Document, DocumentKind, TextStats};
pub use error::TextHelperError;
pub use export::{write_artifact, ExportArtifact};
pub use load::DocumentLoader;
pub use pipeline::extract::{PageExtractor, PdfiumExtractor};
pub use session::{Direction, Mode, Session, SessionController};
pub use transform::{
    capitalize_first, count_substring, replace, strip, title_case, to_lower, to_upper,
    word_count, Transform,
};
