//! Notes service
//!
//! High-level business logic for notes. Notes are keyed by an opaque
//! string id, which the client may choose.

use super::{optional_text, required_text};
use crate::database::{CreateNoteRequest, Note, Repository, UpdateNoteRequest};
use crate::error::{AppError, Result};
use uuid::Uuid;

/// Service for managing notes
#[derive(Clone)]
pub struct NotesService {
    repo: Repository,
}

impl NotesService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Create a new note; content defaults to empty
    pub async fn create_note(&self, req: CreateNoteRequest) -> Result<Note> {
        let title = required_text(req.title.as_deref(), "title")?;
        tracing::info!("Creating new note: {}", title);

        let id = match optional_text(req.id.as_deref()) {
            Some(id) => {
                if self.repo.note_exists(id).await? {
                    return Err(AppError::Validation(format!("Note already exists: {}", id)));
                }
                id.to_string()
            }
            None => Uuid::new_v4().to_string(),
        };

        let note = self
            .repo
            .create_note(&id, title, req.content.as_deref().unwrap_or_default())
            .await?;

        tracing::info!("Note created successfully: {}", note.id);

        Ok(note)
    }

    pub async fn get_note(&self, id: &str) -> Result<Note> {
        self.repo.get_note(id).await
    }

    /// List all notes, most recently edited first
    pub async fn list_notes(&self) -> Result<Vec<Note>> {
        self.repo.list_notes().await
    }

    /// Update only the fields present in `req`
    pub async fn update_note(&self, id: &str, req: UpdateNoteRequest) -> Result<Note> {
        tracing::debug!("Updating note: {}", id);

        if let Some(title) = &req.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("Note title cannot be empty".to_string()));
            }
        }

        let note = self.repo.update_note(id, &req).await?;

        tracing::debug!("Note updated successfully: {}", note.id);

        Ok(note)
    }

    pub async fn delete_note(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting note: {}", id);

        self.repo.delete_note(id).await?;

        tracing::info!("Note deleted successfully: {}", id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::create_memory_pool;

    async fn create_test_service() -> NotesService {
        NotesService::new(Repository::new(create_memory_pool().await.unwrap()))
    }

    fn titled(title: &str) -> CreateNoteRequest {
        CreateNoteRequest {
            id: None,
            title: Some(title.to_string()),
            content: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_note() {
        let service = create_test_service().await;

        let note = service.create_note(titled("T")).await.unwrap();

        assert_eq!(note.content, "");
        assert!(Uuid::parse_str(&note.id).is_ok());

        let fetched = service.get_note(&note.id).await.unwrap();
        assert_eq!(fetched.title, "T");
    }

    #[tokio::test]
    async fn test_client_chosen_id() {
        let service = create_test_service().await;

        let req = || CreateNoteRequest {
            id: Some("note-1700000000".to_string()),
            title: Some("Mine".to_string()),
            content: Some("body".to_string()),
        };

        let note = service.create_note(req()).await.unwrap();
        assert_eq!(note.id, "note-1700000000");

        assert!(matches!(
            service.create_note(req()).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_title_required() {
        let service = create_test_service().await;

        assert!(matches!(
            service.create_note(titled("  ")).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_partial_update() {
        let service = create_test_service().await;

        let note = service.create_note(titled("Keep me")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let updated = service
            .update_note(
                &note.id,
                UpdateNoteRequest {
                    title: None,
                    content: Some("x".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Keep me");
        assert_eq!(updated.content, "x");
        assert!(updated.updated_at > note.updated_at);

        assert!(matches!(
            service
                .update_note(
                    &note.id,
                    UpdateNoteRequest {
                        title: Some(String::new()),
                        content: None,
                    },
                )
                .await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_note() {
        let service = create_test_service().await;

        let note = service.create_note(titled("Gone")).await.unwrap();
        service.delete_note(&note.id).await.unwrap();

        assert!(service.list_notes().await.unwrap().is_empty());
        assert!(matches!(
            service.delete_note(&note.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
