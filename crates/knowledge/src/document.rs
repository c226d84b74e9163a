//! Knowledge document loading.

use faqbot_core::{AppError, AppResult};
use std::path::Path;

/// Read the knowledge document as UTF-8 text.
pub fn load_document(path: &Path) -> AppResult<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::Document(format!("Failed to read {:?}: {}", path, e)))?;

    String::from_utf8(bytes)
        .map_err(|e| AppError::Document(format!("{:?} is not valid UTF-8: {}", path, e)))
}

/// Read the knowledge document, degrading to empty text on failure.
///
/// An unreadable document leaves the bot without knowledge; every query then
/// gets the "not enough information" answer instead of a crash.
pub fn load_document_or_empty(path: &Path) -> String {
    match load_document(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Error loading document: {}", e);
            String::new()
        }
    }
}
