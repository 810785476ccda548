//! Configuration for a document session.
//!
//! All tunable behaviour lives in [`SessionConfig`], built via its
//! [`SessionConfigBuilder`]. Callers set only what they care about and
//! rely on the documented defaults for the rest.

use crate::error::TextHelperError;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default upload cap: 200 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// Default `chrono` format for the "Processed on" footer.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Configuration for a [`crate::SessionController`].
///
/// # Example
/// ```rust
/// use text_helper::SessionConfig;
///
/// let config = SessionConfig::builder()
///     .preview_lines(10)
///     .export_suffix("_final")
///     .build()
///     .unwrap();
/// assert_eq!(config.preview_lines, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Number of lines shown by [`crate::reader::preview`]. Default: 20.
    pub preview_lines: usize,

    /// Appended to the original file stem when naming an export. Default: `_edited`.
    pub export_suffix: String,

    /// `chrono` strftime pattern for the export footer timestamp.
    /// Default: `%Y-%m-%d %H:%M:%S`.
    pub timestamp_format: String,

    /// Uploads larger than this are rejected before decoding. Default: 200 MiB.
    pub max_upload_bytes: usize,

    /// Whether `.pdf` uploads are accepted at all. Default: true.
    ///
    /// When false the controller is built without a page extractor and every
    /// PDF load reports [`TextHelperError::ExtractionUnavailable`].
    pub enable_pdf: bool,

    /// Explicit path to the pdfium shared library.
    ///
    /// If None, `PDFIUM_LIB_PATH` is consulted, then the working directory,
    /// then system library paths.
    pub pdfium_library_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            preview_lines: 20,
            export_suffix: "_edited".to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            enable_pdf: true,
            pdfium_library_path: None,
        }
    }
}

impl SessionConfig {
    /// Create a new builder for `SessionConfig`.
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SessionConfig`].
#[derive(Debug)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    pub fn preview_lines(mut self, n: usize) -> Self {
        self.config.preview_lines = n.max(1);
        self
    }

    pub fn export_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.export_suffix = suffix.into();
        self
    }

    pub fn timestamp_format(mut self, fmt: impl Into<String>) -> Self {
        self.config.timestamp_format = fmt.into();
        self
    }

    pub fn max_upload_bytes(mut self, n: usize) -> Self {
        self.config.max_upload_bytes = n;
        self
    }

    pub fn enable_pdf(mut self, v: bool) -> Self {
        self.config.enable_pdf = v;
        self
    }

    pub fn pdfium_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library_path = Some(path.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SessionConfig, TextHelperError> {
        let c = &self.config;
        if c.max_upload_bytes == 0 {
            return Err(TextHelperError::InvalidConfig(
                "max_upload_bytes must be ≥ 1".into(),
            ));
        }
        if c.timestamp_format.trim().is_empty() {
            return Err(TextHelperError::InvalidConfig(
                "timestamp_format must not be empty".into(),
            ));
        }
        if !is_valid_timestamp_format(&c.timestamp_format) {
            return Err(TextHelperError::InvalidConfig(format!(
                "timestamp_format '{}' is not a valid strftime pattern",
                c.timestamp_format
            )));
        }
        if c.export_suffix.contains(['/', '\\']) {
            return Err(TextHelperError::InvalidConfig(format!(
                "export_suffix must not contain path separators, got '{}'",
                c.export_suffix
            )));
        }
        Ok(self.config)
    }
}

/// True when every specifier in `fmt` is one chrono can render.
pub fn is_valid_timestamp_format(fmt: &str) -> bool {
    StrftimeItems::new(fmt).all(|item| !matches!(item, Item::Error))
}
