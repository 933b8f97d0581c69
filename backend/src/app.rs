//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::config::ServerConfig;
use crate::database::{create_pool, Repository};
use crate::error::Result;
use crate::services::{
    AiConfigService, BookmarksService, ChatProxy, ConversationsService, DocumentsService,
    GamesService, ImagesService, NotesService, WorkRecordsService,
};
use crate::storage::UploadStore;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: UploadStore,
    pub documents_service: DocumentsService,
    pub bookmarks_service: BookmarksService,
    pub conversations_service: ConversationsService,
    pub notes_service: NotesService,
    pub work_records_service: WorkRecordsService,
    pub games_service: GamesService,
    pub images_service: ImagesService,
    pub ai_config_service: AiConfigService,
    pub chat_proxy: ChatProxy,
}

impl AppState {
    /// Wire every service to an already migrated pool
    pub fn new(config: ServerConfig, pool: SqlitePool) -> Result<Self> {
        let repo = Repository::new(pool);
        let store = UploadStore::new(config.upload_root());
        let chat_proxy = ChatProxy::new(config.ai.clone(), repo.clone())?;

        Ok(Self {
            documents_service: DocumentsService::new(repo.clone(), store.clone()),
            bookmarks_service: BookmarksService::new(repo.clone()),
            conversations_service: ConversationsService::new(repo.clone()),
            notes_service: NotesService::new(repo.clone()),
            work_records_service: WorkRecordsService::new(repo.clone()),
            games_service: GamesService::new(repo.clone(), store.clone()),
            images_service: ImagesService::new(store.clone()),
            ai_config_service: AiConfigService::new(repo),
            chat_proxy,
            store,
            config: Arc::new(config),
        })
    }

    /// Application setup - called once on startup
    pub async fn initialize(config: ServerConfig) -> Result<Self> {
        tracing::info!("Initializing application");
        tracing::info!("Data directory: {:?}", config.data_dir);

        std::fs::create_dir_all(&config.data_dir)?;

        let pool = create_pool(&config.database_path()).await?;
        let state = Self::new(config, pool)?;
        state.store.initialize().await?;

        tracing::info!("Application initialized successfully");

        Ok(state)
    }
}
