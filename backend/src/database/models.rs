//! Database models
//!
//! Rust structs representing database entities and the request bodies
//! that create or change them. All models use serde for the JSON API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Kind of an uploaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Txt,
}

impl FileKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(FileKind::Pdf),
            "txt" => Some(FileKind::Txt),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Txt => "txt",
        }
    }
}

/// An uploaded PDF or text file
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: i64,
    pub title: String,
    /// Name of the backing file inside the documents upload folder
    pub file_name: String,
    pub file_type: FileKind,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bookmark {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateBookmarkRequest {
    pub title: Option<String>,
    pub url: Option<String>,
}

/// A chat thread; `message_count` is computed on read
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub message_count: i64,
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(alias = "ai")]
    Assistant,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "assistant" | "ai" => Ok(Role::Assistant),
            other => Err(format!("Unknown message role: {}", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Assistant => f.write_str("assistant"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateConversationRequest {
    pub title: Option<String>,
}

/// Append message request; `role` is parsed by the service so an unknown
/// value surfaces as a validation error
#[derive(Debug, Default, Deserialize)]
pub struct CreateMessageRequest {
    pub role: Option<String>,
    pub content: Option<String>,
}

/// A conversation together with its messages, oldest first
#[derive(Debug, Clone, Serialize)]
pub struct ConversationThread {
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

/// A free-form note keyed by an opaque string id
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateNoteRequest {
    /// Client-chosen key; generated when absent
    pub id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Partial note update: absent fields keep their stored value
#[derive(Debug, Default, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Hours worked at a given date and time
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkRecord {
    pub id: i64,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub hours: f64,
    /// Entered by hand rather than by the timer
    pub manual: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateWorkRecordRequest {
    pub date: Option<String>,
    pub time: Option<String>,
    pub hours: Option<f64>,
    pub manual: Option<bool>,
}

/// An uploaded browser game bundle
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Game {
    pub id: i64,
    pub name: String,
    pub file_name: String,
    pub game_type: String,
    pub uploaded_at: DateTime<Utc>,
}

/// The single stored AI provider configuration.
///
/// Only `api_key` feeds the chat proxy; requests always use the model from
/// the server configuration, `model_type` is kept for the frontend.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AiConfig {
    pub api_key: String,
    pub model_type: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SaveAiConfigRequest {
    pub api_key: Option<String>,
    pub model_type: Option<String>,
}
