//! Games service
//!
//! Small browser games (single html/js/css files or zipped bundles) are
//! stored like documents: a record plus a file under `games/`.

use super::{allowed_extension, optional_text, required_text, UploadedFile};
use crate::config::GAME_EXTENSIONS;
use crate::database::{Game, Repository};
use crate::error::Result;
use crate::storage::{UploadKind, UploadStore};

#[derive(Clone)]
pub struct GamesService {
    repo: Repository,
    store: UploadStore,
}

impl GamesService {
    pub fn new(repo: Repository, store: UploadStore) -> Self {
        Self { repo, store }
    }

    /// Store an uploaded game; `game_type` defaults to the file extension
    pub async fn upload(
        &self,
        file: UploadedFile,
        name: Option<&str>,
        game_type: Option<&str>,
    ) -> Result<Game> {
        let ext = allowed_extension(&file.file_name, GAME_EXTENSIONS)?;
        let name = required_text(name, "name")?;
        let game_type = optional_text(game_type).unwrap_or(ext.as_str());

        tracing::info!("Uploading game: {} ({} bytes)", name, file.data.len());

        let file_name = self
            .store
            .write(UploadKind::Games, name, &ext, &file.data)
            .await?;

        match self.repo.create_game(name, &file_name, game_type).await {
            Ok(game) => {
                tracing::info!("Game uploaded: {} -> {}", game.id, file_name);
                Ok(game)
            }
            Err(e) => {
                if let Err(cleanup) = self.store.delete(UploadKind::Games, &file_name).await {
                    tracing::warn!("Failed to remove {} after insert error: {}", file_name, cleanup);
                }
                Err(e)
            }
        }
    }

    pub async fn list_games(&self) -> Result<Vec<Game>> {
        self.repo.list_games().await
    }

    pub async fn read_game(&self, id: i64) -> Result<(Game, Vec<u8>)> {
        let game = self.repo.get_game(id).await?;
        let data = self.store.read(UploadKind::Games, &game.file_name).await?;
        Ok((game, data))
    }

    /// Delete the backing file, then the record
    pub async fn delete_game(&self, id: i64) -> Result<()> {
        tracing::info!("Deleting game: {}", id);

        let game = self.repo.get_game(id).await?;
        self.store.delete(UploadKind::Games, &game.file_name).await?;
        self.repo.delete_game(id).await?;

        tracing::info!("Game deleted: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::create_memory_pool;
    use crate::error::AppError;
    use tempfile::TempDir;

    async fn create_test_service() -> (GamesService, TempDir) {
        let repo = Repository::new(create_memory_pool().await.unwrap());
        let temp_dir = TempDir::new().unwrap();
        let store = UploadStore::new(temp_dir.path().join("uploads"));
        store.initialize().await.unwrap();
        (GamesService::new(repo, store), temp_dir)
    }

    fn upload(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            data: b"<html></html>".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_upload_defaults_type_to_extension() {
        let (service, _temp) = create_test_service().await;

        let game = service
            .upload(upload("snake.HTML"), Some("Snake"), None)
            .await
            .unwrap();

        assert_eq!(game.game_type, "html");
        assert!(game.file_name.starts_with("Snake_"));
        assert!(game.file_name.ends_with(".html"));

        let tagged = service
            .upload(upload("bundle.zip"), Some("Puzzle"), Some("puzzle"))
            .await
            .unwrap();
        assert_eq!(tagged.game_type, "puzzle");

        assert_eq!(service.list_games().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_upload_requires_name_and_allowed_extension() {
        let (service, _temp) = create_test_service().await;

        assert!(matches!(
            service.upload(upload("game.html"), Some(" "), None).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.upload(upload("game.exe"), Some("x"), None).await,
            Err(AppError::Validation(_))
        ));
        assert!(service.list_games().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_game() {
        let (service, _temp) = create_test_service().await;

        let game = service
            .upload(upload("g.js"), Some("G"), None)
            .await
            .unwrap();
        let (_, data) = service.read_game(game.id).await.unwrap();
        assert_eq!(data, b"<html></html>");

        service.delete_game(game.id).await.unwrap();

        assert!(matches!(
            service.read_game(game.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
