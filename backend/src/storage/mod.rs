//! Storage module
//!
//! Provides the upload tree for file-backed records and the text decoding
//! applied to uploaded text documents.

pub mod text;
pub mod upload_store;

pub use text::{decode_text, DecodedText};
pub use upload_store::{UploadKind, UploadStore};
