//! Conversations service
//!
//! A conversation is an ordered thread of chat messages. Its title starts
//! as a placeholder and is replaced by the beginning of the first message.

use super::{optional_text, required_text};
use crate::config::{CONVERSATION_TITLE_CHARS, DEFAULT_CONVERSATION_TITLE};
use crate::database::{
    Conversation, ConversationThread, CreateConversationRequest, CreateMessageRequest, Message,
    Repository, Role,
};
use crate::error::{AppError, Result};

#[derive(Clone)]
pub struct ConversationsService {
    repo: Repository,
}

impl ConversationsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn create_conversation(&self, req: CreateConversationRequest) -> Result<Conversation> {
        let title = optional_text(req.title.as_deref()).unwrap_or(DEFAULT_CONVERSATION_TITLE);

        let conversation = self.repo.create_conversation(title).await?;
        tracing::info!("Conversation created: {}", conversation.id);
        Ok(conversation)
    }

    /// Conversations ordered by last activity, newest first
    pub async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        self.repo.list_conversations().await
    }

    /// A conversation with its messages, oldest first
    pub async fn get_thread(&self, id: i64) -> Result<ConversationThread> {
        let conversation = self.repo.get_conversation(id).await?;
        let messages = self.repo.list_messages(id).await?;

        Ok(ConversationThread {
            conversation,
            messages,
        })
    }

    /// Append a message; the first message also names the conversation
    pub async fn add_message(
        &self,
        conversation_id: i64,
        req: CreateMessageRequest,
    ) -> Result<(Message, Conversation)> {
        let role: Role = required_text(req.role.as_deref(), "role")?
            .parse()
            .map_err(AppError::Validation)?;

        let content = req.content.unwrap_or_default();
        if content.trim().is_empty() {
            return Err(AppError::Validation(
                "Missing required field: content".to_string(),
            ));
        }

        let title = derive_title(&content);

        let (message, conversation) = self
            .repo
            .append_message(conversation_id, role, &content, &title)
            .await?;

        tracing::debug!(
            "Message {} ({}) added to conversation {}",
            message.id,
            role,
            conversation_id
        );
        Ok((message, conversation))
    }

    pub async fn delete_conversation(&self, id: i64) -> Result<()> {
        tracing::info!("Deleting conversation: {}", id);
        self.repo.delete_conversation(id).await?;
        tracing::info!("Conversation deleted: {}", id);
        Ok(())
    }
}

/// First characters of a message, used as the conversation title
fn derive_title(content: &str) -> String {
    content
        .trim()
        .chars()
        .take(CONVERSATION_TITLE_CHARS)
        .collect()
}
