//! Images service
//!
//! Images embedded in notes are plain files under `images/`; they have no
//! database record and are referenced by URL only.

use super::{allowed_extension, UploadedFile};
use crate::config::IMAGE_EXTENSIONS;
use crate::error::Result;
use crate::storage::{UploadKind, UploadStore};
use std::path::Path;

#[derive(Clone)]
pub struct ImagesService {
    store: UploadStore,
}

impl ImagesService {
    pub fn new(store: UploadStore) -> Self {
        Self { store }
    }

    /// Store an image and return the URL it is served from
    pub async fn upload(&self, file: UploadedFile) -> Result<String> {
        let ext = allowed_extension(&file.file_name, IMAGE_EXTENSIONS)?;
        let stem = Path::new(&file.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();

        let file_name = self
            .store
            .write(UploadKind::Images, stem, &ext, &file.data)
            .await?;

        tracing::info!("Image uploaded: {}", file_name);
        Ok(format!("/uploads/{}/{}", UploadKind::Images.dir_name(), file_name))
    }
}
