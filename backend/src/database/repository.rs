//! Repository layer for database operations
//!
//! This module provides CRUD operations for all entities. Operations that
//! touch more than one row run inside a single transaction.

use super::models::*;
use crate::error::{AppError, Result};
use chrono::Utc;
use sqlx::SqlitePool;

const CONVERSATION_SELECT: &str = r#"
    SELECT c.id, c.title, c.created_at, c.updated_at,
           (SELECT COUNT(*) FROM messages m WHERE m.conversation_id = c.id) AS message_count
    FROM conversations c
"#;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ===== Documents =====

    pub async fn create_document(
        &self,
        title: &str,
        file_name: &str,
        file_type: FileKind,
    ) -> Result<Document> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (title, file_name, file_type, uploaded_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(file_name)
        .bind(file_type)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created document: {} ({})", document.id, file_name);
        Ok(document)
    }

    pub async fn get_document(&self, id: i64) -> Result<Document> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Document not found: {}", id)))
    }

    /// List documents, newest upload first
    pub async fn list_documents(&self) -> Result<Vec<Document>> {
        let documents = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents ORDER BY uploaded_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(documents)
    }

    pub async fn delete_document(&self, id: i64) -> Result<()> {
        let rows = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::NotFound(format!("Document not found: {}", id)));
        }

        tracing::debug!("Deleted document: {}", id);
        Ok(())
    }

    // ===== Bookmarks =====

    pub async fn create_bookmark(&self, title: &str, url: &str) -> Result<Bookmark> {
        let bookmark = sqlx::query_as::<_, Bookmark>(
            r#"
            INSERT INTO bookmarks (title, url, created_at)
            VALUES (?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(url)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created bookmark: {}", bookmark.id);
        Ok(bookmark)
    }

    pub async fn list_bookmarks(&self) -> Result<Vec<Bookmark>> {
        let bookmarks = sqlx::query_as::<_, Bookmark>(
            "SELECT * FROM bookmarks ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(bookmarks)
    }

    pub async fn delete_bookmark(&self, id: i64) -> Result<()> {
        let rows = sqlx::query("DELETE FROM bookmarks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::NotFound(format!("Bookmark not found: {}", id)));
        }

        tracing::debug!("Deleted bookmark: {}", id);
        Ok(())
    }

    // ===== Conversations =====

    pub async fn create_conversation(&self, title: &str) -> Result<Conversation> {
        let now = Utc::now();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO conversations (title, created_at, updated_at)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(title)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created conversation: {}", id);
        self.get_conversation(id).await
    }

    pub async fn get_conversation(&self, id: i64) -> Result<Conversation> {
        sqlx::query_as::<_, Conversation>(&format!("{} WHERE c.id = ?", CONVERSATION_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Conversation not found: {}", id)))
    }

    /// List conversations, most recently active first
    pub async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let conversations = sqlx::query_as::<_, Conversation>(&format!(
            "{} ORDER BY c.updated_at DESC, c.id DESC",
            CONVERSATION_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(conversations)
    }

    /// Messages of a conversation, oldest first
    pub async fn list_messages(&self, conversation_id: i64) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT * FROM messages
            WHERE conversation_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Append a message and touch the conversation.
    ///
    /// When the conversation had no messages before this one, its title is
    /// replaced with `title_if_first`.
    pub async fn append_message(
        &self,
        conversation_id: i64,
        role: Role,
        content: &str,
        title_if_first: &str,
    ) -> Result<(Message, Conversation)> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM conversations WHERE id = ?")
            .bind(conversation_id)
            .fetch_optional(&mut *tx)
            .await?;

        if exists.is_none() {
            return Err(AppError::NotFound(format!(
                "Conversation not found: {}",
                conversation_id
            )));
        }

        let previous: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE conversation_id = ?")
                .bind(conversation_id)
                .fetch_one(&mut *tx)
                .await?;

        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (conversation_id, role, content, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(conversation_id)
        .bind(role)
        .bind(content)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        if previous == 0 {
            sqlx::query("UPDATE conversations SET title = ?, updated_at = ? WHERE id = ?")
                .bind(title_if_first)
                .bind(now)
                .bind(conversation_id)
                .execute(&mut *tx)
                .await?;
        } else {
            sqlx::query("UPDATE conversations SET updated_at = ? WHERE id = ?")
                .bind(now)
                .bind(conversation_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            "Appended message {} to conversation {}",
            message.id,
            conversation_id
        );

        let conversation = self.get_conversation(conversation_id).await?;
        Ok((message, conversation))
    }

    /// Delete a conversation together with all of its messages
    pub async fn delete_conversation(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let removed_messages = sqlx::query("DELETE FROM messages WHERE conversation_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let rows = sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if rows == 0 {
            // Dropping the transaction rolls it back
            return Err(AppError::NotFound(format!("Conversation not found: {}", id)));
        }

        tx.commit().await?;

        tracing::debug!(
            "Deleted conversation: {} ({} messages)",
            id,
            removed_messages
        );
        Ok(())
    }

    // ===== Notes =====

    pub async fn create_note(&self, id: &str, title: &str, content: &str) -> Result<Note> {
        let now = Utc::now();

        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (id, title, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created note: {}", id);
        Ok(note)
    }

    pub async fn note_exists(&self, id: &str) -> Result<bool> {
        let found: Option<String> = sqlx::query_scalar("SELECT id FROM notes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    pub async fn get_note(&self, id: &str) -> Result<Note> {
        sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Note not found: {}", id)))
    }

    /// List notes, most recently edited first
    pub async fn list_notes(&self) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            "SELECT * FROM notes ORDER BY updated_at DESC, created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }

    /// Overwrite only the supplied fields; `updated_at` always moves forward
    pub async fn update_note(&self, id: &str, req: &UpdateNoteRequest) -> Result<Note> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            UPDATE notes
            SET title = COALESCE(?, title),
                content = COALESCE(?, content),
                updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(req.title.as_deref())
        .bind(req.content.as_deref())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Note not found: {}", id)))?;

        tracing::debug!("Updated note: {}", id);
        Ok(note)
    }

    pub async fn delete_note(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::NotFound(format!("Note not found: {}", id)));
        }

        tracing::debug!("Deleted note: {}", id);
        Ok(())
    }

    // ===== Work records =====

    pub async fn create_work_record(
        &self,
        date: &str,
        time: &str,
        hours: f64,
        manual: bool,
    ) -> Result<WorkRecord> {
        let record = sqlx::query_as::<_, WorkRecord>(
            r#"
            INSERT INTO work_records (date, time, hours, manual, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(date)
        .bind(time)
        .bind(hours)
        .bind(manual)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created work record: {} ({} {})", record.id, date, time);
        Ok(record)
    }

    /// List work records, latest date and time first
    pub async fn list_work_records(&self) -> Result<Vec<WorkRecord>> {
        let records = sqlx::query_as::<_, WorkRecord>(
            "SELECT * FROM work_records ORDER BY date DESC, time DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn delete_work_record(&self, id: i64) -> Result<()> {
        let rows = sqlx::query("DELETE FROM work_records WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::NotFound(format!("Work record not found: {}", id)));
        }

        tracing::debug!("Deleted work record: {}", id);
        Ok(())
    }

    // ===== Games =====

    pub async fn create_game(&self, name: &str, file_name: &str, game_type: &str) -> Result<Game> {
        let game = sqlx::query_as::<_, Game>(
            r#"
            INSERT INTO games (name, file_name, game_type, uploaded_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(file_name)
        .bind(game_type)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created game: {} ({})", game.id, file_name);
        Ok(game)
    }

    pub async fn get_game(&self, id: i64) -> Result<Game> {
        sqlx::query_as::<_, Game>("SELECT * FROM games WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Game not found: {}", id)))
    }

    pub async fn list_games(&self) -> Result<Vec<Game>> {
        let games = sqlx::query_as::<_, Game>("SELECT * FROM games ORDER BY uploaded_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(games)
    }

    pub async fn delete_game(&self, id: i64) -> Result<()> {
        let rows = sqlx::query("DELETE FROM games WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::NotFound(format!("Game not found: {}", id)));
        }

        tracing::debug!("Deleted game: {}", id);
        Ok(())
    }

    // ===== AI config =====

    pub async fn get_ai_config(&self) -> Result<Option<AiConfig>> {
        let config = sqlx::query_as::<_, AiConfig>(
            "SELECT api_key, model_type, updated_at FROM ai_config WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(config)
    }

    /// Insert or replace the single configuration row
    pub async fn save_ai_config(&self, api_key: &str, model_type: &str) -> Result<AiConfig> {
        let config = sqlx::query_as::<_, AiConfig>(
            r#"
            INSERT INTO ai_config (id, api_key, model_type, updated_at)
            VALUES (1, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                api_key = excluded.api_key,
                model_type = excluded.model_type,
                updated_at = excluded.updated_at
            RETURNING api_key, model_type, updated_at
            "#,
        )
        .bind(api_key)
        .bind(model_type)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Saved AI config (model: {})", model_type);
        Ok(config)
    }
}
