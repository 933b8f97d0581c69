//! Services module
//!
//! Business logic services that coordinate between the HTTP handlers,
//! the repository and the upload store.

pub mod ai_config;
pub mod bookmarks;
pub mod chat;
pub mod conversations;
pub mod documents;
pub mod games;
pub mod images;
pub mod notes;
pub mod work_records;

pub use ai_config::AiConfigService;
pub use bookmarks::BookmarksService;
pub use chat::{ChatMessage, ChatProxy, ChatRequest};
pub use conversations::ConversationsService;
pub use documents::DocumentsService;
pub use games::GamesService;
pub use images::ImagesService;
pub use notes::NotesService;
pub use work_records::WorkRecordsService;

use crate::error::{AppError, Result};
use crate::storage::upload_store::file_extension;

/// A file received from a multipart upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Name the client gave the file
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Trimmed value of a required text field, or a validation error naming it
pub(crate) fn required_text<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("Missing required field: {}", field))),
    }
}

/// Trimmed value of an optional text field, `None` when blank
pub(crate) fn optional_text(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Lower-cased extension of `file_name` if it is on the allow-list
pub(crate) fn allowed_extension(file_name: &str, allowed: &[&str]) -> Result<String> {
    if file_name.trim().is_empty() {
        return Err(AppError::Validation("No file selected".to_string()));
    }

    match file_extension(file_name) {
        Some(ext) if allowed.contains(&ext.as_str()) => Ok(ext),
        _ => Err(AppError::Validation(format!(
            "Unsupported file type for '{}', allowed: {}",
            file_name,
            allowed.join(", ")
        ))),
    }
}
