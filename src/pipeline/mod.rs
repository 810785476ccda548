//! Loader stages that turn uploaded bytes into page text.
//!
//! ```text
//! bytes ──▶ input::validate_upload ──┬─▶ input::decode_plain_text   (.txt)
//!                                    └─▶ extract::PageExtractor     (.pdf)
//! ```
//!
//! 1. [`input`]   — extension and size checks, UTF-8 decode with lossy
//!    fallback, line-ending normalisation
//! 2. [`extract`] — per-page text from a PDF via a pluggable extractor

pub mod extract;
pub mod input;
