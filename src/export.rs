//! The export artifact: working text + optional append block + footer.
//!
//! Artifacts are computed fresh on every save request and never cached.
//! [`write_artifact`] is the only place the library touches the file system
//! on the way out.

use crate::error::TextHelperError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Footer label preceding the timestamp.
pub const FOOTER_LABEL: &str = "Processed on: ";

/// A ready-to-download file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportArtifact {
    /// Suggested name, e.g. `notes_edited.txt`.
    pub file_name: String,
    /// UTF-8 encoded content.
    pub bytes: Vec<u8>,
}

/// Assemble the exported text.
///
/// A non-empty `extra` is placed on its own line: a `\n` is inserted first
/// unless `text` already ends with one. The `"\n\nProcessed on: …\n"` footer
/// is appended verbatim regardless of how the text ends.
pub fn compose(text: &str, extra: &str, timestamp: &str) -> String {
    let mut out = String::with_capacity(text.len() + extra.len() + FOOTER_LABEL.len() + 32);
    out.push_str(text);
    if !extra.is_empty() {
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(extra);
    }
    out.push_str("\n\n");
    out.push_str(FOOTER_LABEL);
    out.push_str(timestamp);
    out.push('\n');
    out
}

/// `<stem><suffix>.txt`
pub fn output_file_name(stem: &str, suffix: &str) -> String {
    format!("{stem}{suffix}.txt")
}

/// Write an artifact to disk and return the final path.
///
/// `target` may be a directory (the artifact's own file name is used) or a
/// full file path. Uses atomic write (temp file + rename) so a failed save
/// never leaves a half-written file behind.
pub fn write_artifact(artifact: &ExportArtifact, target: &Path) -> Result<PathBuf, TextHelperError> {
    let path = if target.is_dir() {
        target.join(&artifact.file_name)
    } else {
        target.to_path_buf()
    };
    let write_failed = |source: std::io::Error| TextHelperError::OutputWriteFailed {
        path: path.clone(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_failed)?;
    }

    let tmp_path = path.with_extension("txt.tmp");
    std::fs::write(&tmp_path, &artifact.bytes).map_err(write_failed)?;
    std::fs::rename(&tmp_path, &path).map_err(write_failed)?;

    info!("Wrote {} bytes to {}", artifact.bytes.len(), path.display());
    Ok(path)
}
