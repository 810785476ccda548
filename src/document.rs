//! Loaded documents and the statistics shown alongside them.

use crate::transform::word_count;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which loader path produced a [`Document`].
///
/// Resolved once from the file extension at load time; nothing downstream
/// re-inspects the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    /// `.txt`: always exactly one page, editable.
    PlainText,
    /// `.pdf`: one page per PDF page, read-only.
    Paginated,
}

impl DocumentKind {
    /// Classify a file name by its (case-insensitive) extension.
    ///
    /// Returns `None` for anything other than `.txt` or `.pdf`.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" => Some(DocumentKind::PlainText),
            "pdf" => Some(DocumentKind::Paginated),
            _ => None,
        }
    }

    /// Only plain-text documents can be edited and exported.
    pub fn is_editable(self) -> bool {
        matches!(self, DocumentKind::PlainText)
    }
}

/// An uploaded file decoded into one or more text pages.
///
/// Immutable once built. A new upload replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDocument")]
pub struct Document {
    file_name: String,
    kind: DocumentKind,
    pages: Vec<String>,
}

impl Document {
    /// A single-page plain-text document.
    pub fn plain_text(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            kind: DocumentKind::PlainText,
            pages: vec![text.into()],
        }
    }

    /// A read-only paginated document. Returns `None` when `pages` is empty.
    pub fn paginated(file_name: impl Into<String>, pages: Vec<String>) -> Option<Self> {
        if pages.is_empty() {
            return None;
        }
        Some(Self {
            file_name: file_name.into(),
            kind: DocumentKind::Paginated,
            pages,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Text of page `index`, if it exists.
    pub fn page(&self, index: usize) -> Option<&str> {
        self.pages.get(index).map(String::as_str)
    }

    /// The text as first loaded: page 0.
    pub fn original_text(&self) -> &str {
        &self.pages[0]
    }

    /// File name without its last extension, e.g. `notes` for `notes.txt`.
    pub fn stem(&self) -> &str {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.file_name)
    }
}

/// Unchecked wire form of a [`Document`].
#[derive(Deserialize)]
struct RawDocument {
    file_name: String,
    kind: DocumentKind,
    pages: Vec<String>,
}

impl TryFrom<RawDocument> for Document {
    type Error = String;

    fn try_from(raw: RawDocument) -> Result<Self, Self::Error> {
        match raw.kind {
            DocumentKind::PlainText if raw.pages.len() == 1 => Ok(Self {
                file_name: raw.file_name,
                kind: raw.kind,
                pages: raw.pages,
            }),
            DocumentKind::PlainText => Err(format!(
                "plain-text document must have exactly one page, got {}",
                raw.pages.len()
            )),
            DocumentKind::Paginated => Document::paginated(raw.file_name, raw.pages)
                .ok_or_else(|| "paginated document must have at least one page".to_string()),
        }
    }
}

/// Counts shown under the preview: lines, words, characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    pub lines: usize,
    pub words: usize,
    pub characters: usize,
}

impl TextStats {
    /// Compute stats over `text`.
    ///
    /// A trailing newline does not start a new line, and characters are
    /// Unicode scalar values, not bytes.
    pub fn of(text: &str) -> Self {
        Self {
            lines: text.lines().count(),
            words: word_count(text),
            characters: text.chars().count(),
        }
    }
}
