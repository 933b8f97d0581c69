//! Documents service
//!
//! Handles PDF/TXT uploads: each document is a database record plus a
//! backing file in the upload tree, and the two are created and removed
//! together.

use super::{allowed_extension, optional_text, UploadedFile};
use crate::config::{DEFAULT_DOCUMENT_TITLE, DOCUMENT_EXTENSIONS};
use crate::database::{Document, FileKind, Repository};
use crate::error::{AppError, Result};
use crate::storage::{decode_text, UploadKind, UploadStore};

/// Service for managing documents
#[derive(Clone)]
pub struct DocumentsService {
    repo: Repository,
    store: UploadStore,
}

impl DocumentsService {
    pub fn new(repo: Repository, store: UploadStore) -> Self {
        Self { repo, store }
    }

    /// Store an uploaded document and record it.
    ///
    /// Text files are re-encoded to UTF-8. The record is only inserted once
    /// the file is on disk; if the insert fails the file is removed again.
    pub async fn upload(
        &self,
        file: UploadedFile,
        title: Option<&str>,
        declared_encoding: Option<&str>,
    ) -> Result<Document> {
        let ext = allowed_extension(&file.file_name, DOCUMENT_EXTENSIONS)?;
        let kind = FileKind::from_extension(&ext)
            .ok_or_else(|| AppError::Validation(format!("Unsupported document type: {}", ext)))?;
        let title = optional_text(title).unwrap_or(DEFAULT_DOCUMENT_TITLE);

        tracing::info!(
            "Uploading document: {} ({}, {} bytes)",
            title,
            file.file_name,
            file.data.len()
        );

        let data = match kind {
            FileKind::Txt => {
                let decoded = decode_text(&file.data, declared_encoding);
                tracing::debug!("Decoded text upload as {:?}", decoded.encoding);
                decoded.text.into_bytes()
            }
            FileKind::Pdf => file.data,
        };

        let file_name = self
            .store
            .write(UploadKind::Documents, title, kind.extension(), &data)
            .await?;

        match self.repo.create_document(title, &file_name, kind).await {
            Ok(document) => {
                tracing::info!("Document uploaded: {} -> {}", document.id, file_name);
                Ok(document)
            }
            Err(e) => {
                if let Err(cleanup) = self.store.delete(UploadKind::Documents, &file_name).await {
                    tracing::warn!("Failed to remove {} after insert error: {}", file_name, cleanup);
                }
                Err(e)
            }
        }
    }

    pub async fn list_documents(&self) -> Result<Vec<Document>> {
        self.repo.list_documents().await
    }

    /// Record and file contents of a document
    pub async fn read_document(&self, id: i64) -> Result<(Document, Vec<u8>)> {
        let document = self.repo.get_document(id).await?;
        let data = self
            .store
            .read(UploadKind::Documents, &document.file_name)
            .await?;
        Ok((document, data))
    }

    /// Delete the backing file, then the record.
    ///
    /// A file that is already gone does not block the delete; any other
    /// filesystem failure leaves the record in place.
    pub async fn delete_document(&self, id: i64) -> Result<()> {
        tracing::info!("Deleting document: {}", id);

        let document = self.repo.get_document(id).await?;
        self.store
            .delete(UploadKind::Documents, &document.file_name)
            .await?;
        self.repo.delete_document(id).await?;

        tracing::info!("Document deleted: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::create_memory_pool;
    use tempfile::TempDir;

    async fn create_test_service() -> (DocumentsService, TempDir) {
        let repo = Repository::new(create_memory_pool().await.unwrap());

        let temp_dir = TempDir::new().unwrap();
        let store = UploadStore::new(temp_dir.path().join("uploads"));
        store.initialize().await.unwrap();

        (DocumentsService::new(repo, store), temp_dir)
    }

    fn upload(name: &str, data: &[u8]) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            data: data.to_vec(),
        }
    }

    fn stored_files(service: &DocumentsService) -> usize {
        std::fs::read_dir(service.store.root().join("pdfs"))
            .unwrap()
            .count()
    }

    #[tokio::test]
    async fn test_upload_pdf() {
        let (service, _temp) = create_test_service().await;

        let doc = service
            .upload(upload("paper.pdf", b"%PDF-1.4"), Some("My Paper"), None)
            .await
            .unwrap();

        assert_eq!(doc.title, "My Paper");
        assert_eq!(doc.file_type, FileKind::Pdf);
        assert!(doc.file_name.starts_with("My_Paper_"));

        let (_, data) = service.read_document(doc.id).await.unwrap();
        assert_eq!(data, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_upload_txt_is_stored_as_utf8() {
        let (service, _temp) = create_test_service().await;

        // "中文" in GBK
        let doc = service
            .upload(upload("notes.TXT", &[0xD6, 0xD0, 0xCE, 0xC4]), None, Some("gbk"))
            .await
            .unwrap();

        assert_eq!(doc.title, DEFAULT_DOCUMENT_TITLE);
        assert_eq!(doc.file_type, FileKind::Txt);

        let (_, data) = service.read_document(doc.id).await.unwrap();
        assert_eq!(String::from_utf8(data).unwrap(), "中文");
    }

    #[tokio::test]
    async fn test_rejected_extension_creates_nothing() {
        let (service, _temp) = create_test_service().await;

        let result = service
            .upload(upload("virus.exe", b"MZ"), Some("bad"), None)
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(service.list_documents().await.unwrap().is_empty());
        assert_eq!(stored_files(&service), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_file_and_record() {
        let (service, _temp) = create_test_service().await;

        let doc = service
            .upload(upload("a.pdf", b"pdf"), Some("a"), None)
            .await
            .unwrap();
        assert_eq!(stored_files(&service), 1);

        service.delete_document(doc.id).await.unwrap();

        assert!(service.list_documents().await.unwrap().is_empty());
        assert_eq!(stored_files(&service), 0);
        assert!(matches!(
            service.delete_document(doc.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_with_missing_file_succeeds() {
        let (service, _temp) = create_test_service().await;

        let doc = service
            .upload(upload("a.pdf", b"pdf"), Some("a"), None)
            .await
            .unwrap();
        let path = service
            .store
            .path_for(UploadKind::Documents, &doc.file_name)
            .unwrap();
        std::fs::remove_file(path).unwrap();

        service.delete_document(doc.id).await.unwrap();
        assert!(service.list_documents().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_file_delete_keeps_record() {
        let (service, _temp) = create_test_service().await;

        let doc = service
            .upload(upload("a.pdf", b"pdf"), Some("a"), None)
            .await
            .unwrap();

        // Swap the file for a directory so remove_file fails
        let path = service
            .store
            .path_for(UploadKind::Documents, &doc.file_name)
            .unwrap();
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let result = service.delete_document(doc.id).await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        let remaining = service.list_documents().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, doc.id);
    }
}
