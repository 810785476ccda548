//! The session controller: per-document state and its transition rules.
//!
//! A [`SessionController`] starts with no document ("awaiting upload") and
//! lives for as long as the front end does. It owns the active [`Document`]
//! and its [`Session`]; the session never writes to the document's pages.
//!
//! Edit tools (transforms, replace, count, manual edit, export) are only
//! available in the edit-capable state: a plain-text document in
//! [`Mode::Append`]. Outside it they return
//! [`TextHelperError::EditingDisabled`] and change nothing.

use crate::config::SessionConfig;
use crate::document::{Document, DocumentKind, TextStats};
use crate::error::TextHelperError;
use crate::export::{self, ExportArtifact};
use crate::load::DocumentLoader;
use crate::reader;
use crate::transform::{self, Transform};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::str::FromStr;
use tracing::{debug, info};

/// How the active document is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// View only. (default)
    #[default]
    Read,
    /// Edit tools and export enabled (plain text only).
    Append,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Read => f.write_str("Read"),
            Mode::Append => f.write_str("Append"),
        }
    }
}

impl FromStr for Mode {
    type Err = TextHelperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "read" => Ok(Mode::Read),
            "append" | "edit" => Ok(Mode::Append),
            other => Err(TextHelperError::InvalidCommand(format!(
                "unknown mode '{other}' (expected read or append)"
            ))),
        }
    }
}

/// Page navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Prev,
    Next,
}

/// Mutable state for the active document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Working text. `None` for paginated documents, which are never edited.
    pub current_text: Option<String>,
    /// Always within `0..document.page_count()`.
    pub page_index: usize,
    /// Result of the most recent count, if any since the last load.
    pub last_count: Option<usize>,
    pub mode: Mode,
}

impl Session {
    fn fresh(document: &Document) -> Self {
        Self {
            current_text: document
                .kind()
                .is_editable()
                .then(|| document.original_text().to_string()),
            page_index: 0,
            last_count: None,
            mode: Mode::Read,
        }
    }
}

/// Owns the active document, its session, and the loader used to replace them.
pub struct SessionController {
    config: SessionConfig,
    loader: DocumentLoader,
    active: Option<(Document, Session)>,
}

impl SessionController {
    /// A controller with no document loaded.
    pub fn new(config: SessionConfig, loader: DocumentLoader) -> Self {
        Self {
            config,
            loader,
            active: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn loader(&self) -> &DocumentLoader {
        &self.loader
    }

    // ── Load / switch ────────────────────────────────────────────────────

    /// Activate an upload.
    ///
    /// If a document with the same file name is already active this is a
    /// no-op and the session is kept. Otherwise the upload is loaded and, on
    /// success, replaces the document and resets the session. On failure the
    /// previous document and session are left untouched.
    pub fn load(&mut self, file_name: &str, bytes: &[u8]) -> Result<&Document, TextHelperError> {
        let same_file = matches!(&self.active, Some((doc, _)) if doc.file_name() == file_name);
        if same_file {
            debug!("'{}' is already active; keeping session", file_name);
        } else {
            let document = self.loader.load(file_name, bytes)?;
            self.install(document);
        }
        self.document().ok_or(TextHelperError::NoDocument)
    }

    /// Like [`load`](Self::load) but always resets, even for the same name.
    pub fn reload(&mut self, file_name: &str, bytes: &[u8]) -> Result<&Document, TextHelperError> {
        let document = self.loader.load(file_name, bytes)?;
        self.install(document);
        self.document().ok_or(TextHelperError::NoDocument)
    }

    /// Activate an already-built document, resetting the session.
    pub fn install(&mut self, document: Document) {
        info!(
            "Active document: '{}' ({:?}, {} page(s))",
            document.file_name(),
            document.kind(),
            document.page_count()
        );
        let session = Session::fresh(&document);
        self.active = Some((document, session));
    }

    // ── Navigation / mode ────────────────────────────────────────────────

    /// Move one page back or forward, clamped to the document.
    ///
    /// Never wraps and never errors. Returns the resulting page index
    /// (0 when no document is loaded).
    pub fn navigate(&mut self, direction: Direction) -> usize {
        let Some((document, session)) = self.active.as_mut() else {
            return 0;
        };
        let last = document.page_count().saturating_sub(1);
        match direction {
            Direction::Prev if session.page_index > 0 => session.page_index -= 1,
            Direction::Next if session.page_index < last => session.page_index += 1,
            _ => debug!("Navigation {:?} at page {} is a no-op", direction, session.page_index + 1),
        }
        session.page_index
    }

    /// Select the open mode. Paginated documents are forced to `Read`.
    ///
    /// Returns the mode actually in effect.
    pub fn set_mode(&mut self, mode: Mode) -> Result<Mode, TextHelperError> {
        let (document, session) = self.active.as_mut().ok_or(TextHelperError::NoDocument)?;
        session.mode = match document.kind() {
            DocumentKind::PlainText => mode,
            DocumentKind::Paginated => {
                if mode == Mode::Append {
                    debug!("'{}' is read-only; staying in Read mode", document.file_name());
                }
                Mode::Read
            }
        };
        Ok(session.mode)
    }

    // ── Edit tools ───────────────────────────────────────────────────────

    /// Apply a transform to the working text.
    pub fn apply_transform(&mut self, op: Transform) -> Result<&str, TextHelperError> {
        let text = self.editable_text()?;
        *text = op.apply(text);
        debug!("Applied {}", op);
        Ok(text.as_str())
    }

    /// Replace every occurrence of `old` with `new` in the working text.
    pub fn replace(&mut self, old: &str, new: &str) -> Result<&str, TextHelperError> {
        let text = self.editable_text()?;
        *text = transform::replace(text, old, new);
        debug!("Replaced '{}' with '{}'", old, new);
        Ok(text.as_str())
    }

    /// Count occurrences of `sub` and remember the result.
    pub fn count(&mut self, sub: &str) -> Result<usize, TextHelperError> {
        let count = transform::count_substring(self.editable_text()?, sub);
        if let Some((_, session)) = self.active.as_mut() {
            session.last_count = Some(count);
        }
        Ok(count)
    }

    /// Overwrite the working text with user-typed content.
    pub fn manual_edit(&mut self, new_text: impl Into<String>) -> Result<(), TextHelperError> {
        *self.editable_text()? = new_text.into();
        Ok(())
    }

    /// Build the export artifact stamped with the current local time.
    pub fn export(&self, extra: &str) -> Result<ExportArtifact, TextHelperError> {
        self.export_at(extra, Local::now().naive_local())
    }

    /// Build the export artifact with an explicit timestamp.
    ///
    /// Does not mutate the session; repeated calls with the same inputs give
    /// identical artifacts.
    pub fn export_at(
        &self,
        extra: &str,
        timestamp: NaiveDateTime,
    ) -> Result<ExportArtifact, TextHelperError> {
        let (document, session) = self.active.as_ref().ok_or(TextHelperError::NoDocument)?;
        let text = Self::check_editable(document, session)?;
        let mut stamp = String::new();
        write!(stamp, "{}", timestamp.format(&self.config.timestamp_format)).map_err(|_| {
            TextHelperError::InvalidConfig(format!(
                "timestamp_format '{}' is not a valid strftime pattern",
                self.config.timestamp_format
            ))
        })?;
        let artifact = ExportArtifact {
            file_name: export::output_file_name(document.stem(), &self.config.export_suffix),
            bytes: export::compose(text, extra, &stamp).into_bytes(),
        };
        info!("Prepared '{}' ({} bytes)", artifact.file_name, artifact.bytes.len());
        Ok(artifact)
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn document(&self) -> Option<&Document> {
        self.active.as_ref().map(|(d, _)| d)
    }

    pub fn session(&self) -> Option<&Session> {
        self.active.as_ref().map(|(_, s)| s)
    }

    /// Working text of an editable document.
    pub fn current_text(&self) -> Option<&str> {
        self.session().and_then(|s| s.current_text.as_deref())
    }

    /// Text of the page being viewed.
    ///
    /// For plain text this is the working text, so edits show up in the
    /// reader immediately.
    pub fn current_page_text(&self) -> Option<&str> {
        let (document, session) = self.active.as_ref()?;
        session
            .current_text
            .as_deref()
            .or_else(|| document.page(session.page_index))
    }

    pub fn page_index(&self) -> Option<usize> {
        self.session().map(|s| s.page_index)
    }

    /// `"Page N of M"` for the active document.
    pub fn page_label(&self) -> Option<String> {
        let (document, session) = self.active.as_ref()?;
        Some(reader::page_label(session.page_index, document.page_count()))
    }

    pub fn last_count(&self) -> Option<usize> {
        self.session().and_then(|s| s.last_count)
    }

    pub fn mode(&self) -> Option<Mode> {
        self.session().map(|s| s.mode)
    }

    /// Stats over the text on display.
    pub fn stats(&self) -> Option<TextStats> {
        self.current_page_text().map(TextStats::of)
    }

    /// First `preview_lines` lines of the text on display.
    pub fn preview(&self) -> Option<String> {
        self.current_page_text()
            .map(|t| reader::preview(t, self.config.preview_lines))
    }

    /// True for a plain-text document in Append mode.
    pub fn is_editable(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|(d, s)| Self::check_editable(d, s).is_ok())
    }

    // ── Internal helpers ─────────────────────────────────────────────────

    fn check_editable<'a>(
        document: &Document,
        session: &'a Session,
    ) -> Result<&'a String, TextHelperError> {
        if !document.kind().is_editable() {
            return Err(TextHelperError::EditingDisabled {
                reason: "PDF files are read-only. Open a .txt file to edit and save.".into(),
            });
        }
        if session.mode != Mode::Append {
            return Err(TextHelperError::EditingDisabled {
                reason: "switch to Append mode to edit or save.".into(),
            });
        }
        session
            .current_text
            .as_ref()
            .ok_or_else(|| TextHelperError::EditingDisabled {
                reason: "no working text".into(),
            })
    }

    fn editable_text(&mut self) -> Result<&mut String, TextHelperError> {
        let (document, session) = self.active.as_mut().ok_or(TextHelperError::NoDocument)?;
        Self::check_editable(document, session)?;
        session
            .current_text
            .as_mut()
            .ok_or_else(|| TextHelperError::EditingDisabled {
                reason: "no working text".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn controller() -> SessionController {
        let config = SessionConfig::default();
        let loader = DocumentLoader::text_only(&config);
        SessionController::new(config, loader)
    }

    fn editing(text: &str) -> SessionController {
        let mut c = controller();
        c.load("notes.txt", text.as_bytes()).unwrap();
        c.set_mode(Mode::Append).unwrap();
        c
    }

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap()
    }

    #[test]
    fn starts_awaiting_upload() {
        let c = controller();
        assert!(c.document().is_none());
        assert!(c.current_page_text().is_none());
        assert!(!c.is_editable());
        assert!(matches!(c.export(""), Err(TextHelperError::NoDocument)));
    }

    #[test]
    fn load_initialises_session() {
        let mut c = controller();
        c.load("a.txt", b"Hello").unwrap();
        let s = c.session().unwrap();
        assert_eq!(s.current_text.as_deref(), Some("Hello"));
        assert_eq!(s.page_index, 0);
        assert_eq!(s.last_count, None);
        assert_eq!(s.mode, Mode::Read);
    }

    #[test]
    fn tools_disabled_in_read_mode() {
        let mut c = controller();
        c.load("a.txt", b"hello").unwrap();
        assert!(matches!(
            c.apply_transform(Transform::Upper),
            Err(TextHelperError::EditingDisabled { .. })
        ));
        assert!(c.count("l").is_err());
        assert!(c.manual_edit("x").is_err());
        assert!(c.export_at("", ts()).is_err());
        assert_eq!(c.current_text(), Some("hello"));
    }

    #[test]
    fn transforms_are_sequential_and_destructive() {
        let mut c = editing("  hello world ");
        c.apply_transform(Transform::Strip).unwrap();
        c.apply_transform(Transform::Title).unwrap();
        assert_eq!(c.current_text(), Some("Hello World"));
        c.apply_transform(Transform::Lower).unwrap();
        assert_eq!(c.current_text(), Some("hello world"));
        c.apply_transform(Transform::Capitalize).unwrap();
        assert_eq!(c.current_text(), Some("Hello world"));
    }

    #[test]
    fn count_sets_last_count_without_mutation() {
        let mut c = editing("aaa");
        assert_eq!(c.count("aa").unwrap(), 1);
        assert_eq!(c.last_count(), Some(1));
        assert_eq!(c.current_text(), Some("aaa"));
        assert_eq!(c.count("").unwrap(), 0);
        assert_eq!(c.last_count(), Some(0));
    }

    #[test]
    fn manual_edit_overrides_transform() {
        let mut c = editing("abc");
        c.apply_transform(Transform::Upper).unwrap();
        c.manual_edit("typed by hand").unwrap();
        assert_eq!(c.current_text(), Some("typed by hand"));
    }

    #[test]
    fn same_name_load_keeps_session() {
        let mut c = editing("first");
        c.apply_transform(Transform::Upper).unwrap();
        c.load("notes.txt", b"other bytes").unwrap();
        assert_eq!(c.current_text(), Some("FIRST"));
        assert_eq!(c.mode(), Some(Mode::Append));
    }

    #[test]
    fn reload_resets_same_name() {
        let mut c = editing("first");
        c.count("f").unwrap();
        c.reload("notes.txt", b"second").unwrap();
        assert_eq!(c.current_text(), Some("second"));
        assert_eq!(c.last_count(), None);
        assert_eq!(c.mode(), Some(Mode::Read));
    }

    #[test]
    fn new_file_resets_count_and_mode() {
        let mut c = editing("abc abc");
        c.count("abc").unwrap();
        c.load("other.txt", b"xyz").unwrap();
        assert_eq!(c.last_count(), None);
        assert_eq!(c.page_index(), Some(0));
        assert_eq!(c.mode(), Some(Mode::Read));
        assert_eq!(c.current_text(), Some("xyz"));
    }

    #[test]
    fn failed_load_keeps_prior_state() {
        let mut c = editing("keep me");
        c.count("e").unwrap();
        assert!(c.load("evil.exe", b"MZ").is_err());
        assert!(c.load("book.pdf", b"%PDF").is_err());
        assert_eq!(c.document().unwrap().file_name(), "notes.txt");
        assert_eq!(c.current_text(), Some("keep me"));
        assert_eq!(c.last_count(), Some(3));
        assert_eq!(c.mode(), Some(Mode::Append));
    }

    #[test]
    fn plain_text_navigation_is_clamped() {
        let mut c = controller();
        assert_eq!(c.navigate(Direction::Next), 0);
        c.load("a.txt", b"one page").unwrap();
        assert_eq!(c.navigate(Direction::Prev), 0);
        assert_eq!(c.navigate(Direction::Next), 0);
        assert_eq!(c.page_label().as_deref(), Some("Page 1 of 1"));
    }

    #[test]
    fn paginated_documents_are_read_only() {
        let mut c = controller();
        c.install(Document::paginated("b.pdf", vec!["p1".into(), "p2".into()]).unwrap());
        assert_eq!(c.set_mode(Mode::Append).unwrap(), Mode::Read);
        assert!(c.current_text().is_none());
        assert!(!c.is_editable());
        assert!(matches!(
            c.replace("p", "q"),
            Err(TextHelperError::EditingDisabled { .. })
        ));
    }

    #[test]
    fn paginated_navigation_tracks_page_text() {
        let mut c = controller();
        c.install(
            Document::paginated("b.pdf", vec!["p1".into(), "p2".into(), "p3".into()]).unwrap(),
        );
        assert_eq!(c.navigate(Direction::Prev), 0);
        assert_eq!(c.navigate(Direction::Next), 1);
        assert_eq!(c.current_page_text(), Some("p2"));
        assert_eq!(c.navigate(Direction::Next), 2);
        assert_eq!(c.navigate(Direction::Next), 2);
        assert_eq!(c.page_label().as_deref(), Some("Page 3 of 3"));
        assert_eq!(c.stats().unwrap().words, 1);
    }

    #[test]
    fn export_does_not_mutate_and_is_repeatable() {
        let mut c = editing("abc");
        let a = c.export_at("", ts()).unwrap();
        let b = c.export_at("", ts()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.file_name, "notes_edited.txt");
        assert_eq!(
            String::from_utf8(a.bytes).unwrap(),
            "abc\n\nProcessed on: 2024-03-09 14:05:07\n"
        );
        assert_eq!(c.current_text(), Some("abc"));
        c.count("b").unwrap();
        assert_eq!(c.current_text(), Some("abc"));
    }

    #[test]
    fn bad_timestamp_format_fails_export_without_panicking() {
        let config = SessionConfig {
            timestamp_format: "%Q".into(),
            ..SessionConfig::default()
        };
        let loader = DocumentLoader::text_only(&config);
        let mut c = SessionController::new(config, loader);
        c.load("a.txt", b"abc").unwrap();
        c.set_mode(Mode::Append).unwrap();
        assert!(matches!(
            c.export_at("", ts()),
            Err(TextHelperError::InvalidConfig(_))
        ));
        assert!(matches!(c.export(""), Err(TextHelperError::InvalidConfig(_))));
    }

    #[test]
    fn mode_parse() {
        assert_eq!("Append".parse::<Mode>().unwrap(), Mode::Append);
        assert_eq!(" read ".parse::<Mode>().unwrap(), Mode::Read);
        assert!("write".parse::<Mode>().is_err());
    }
}
