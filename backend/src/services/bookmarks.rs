//! Bookmarks service

use super::required_text;
use crate::database::{Bookmark, CreateBookmarkRequest, Repository};
use crate::error::Result;

#[derive(Clone)]
pub struct BookmarksService {
    repo: Repository,
}

impl BookmarksService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn create_bookmark(&self, req: CreateBookmarkRequest) -> Result<Bookmark> {
        let title = required_text(req.title.as_deref(), "title")?;
        let url = required_text(req.url.as_deref(), "url")?;

        let bookmark = self.repo.create_bookmark(title, url).await?;
        tracing::info!("Bookmark created: {} ({})", bookmark.id, url);
        Ok(bookmark)
    }

    pub async fn list_bookmarks(&self) -> Result<Vec<Bookmark>> {
        self.repo.list_bookmarks().await
    }

    pub async fn delete_bookmark(&self, id: i64) -> Result<()> {
        self.repo.delete_bookmark(id).await?;
        tracing::info!("Bookmark deleted: {}", id);
        Ok(())
    }
}
