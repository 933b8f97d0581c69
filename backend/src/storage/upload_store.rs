//! Upload tree storage
//!
//! Uploaded blobs live under one root directory, split by kind:
//!
//! ```text
//! uploads/
//!   pdfs/     documents (pdf, txt)
//!   images/   note images
//!   games/    game bundles
//! ```
//!
//! Stored names are derived from the user-supplied title plus a
//! millisecond timestamp, e.g. `My_Book_1718000000000.pdf`.

use crate::config::{
    DOCUMENTS_DIR, FALLBACK_FILE_STEM, GAMES_DIR, IMAGES_DIR, MAX_FILE_NAME_ATTEMPTS,
    MAX_FILE_STEM_CHARS,
};
use crate::error::{AppError, Result};
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Sub-tree of the upload root a blob belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Documents,
    Images,
    Games,
}

impl UploadKind {
    pub fn dir_name(self) -> &'static str {
        match self {
            UploadKind::Documents => DOCUMENTS_DIR,
            UploadKind::Images => IMAGES_DIR,
            UploadKind::Games => GAMES_DIR,
        }
    }

    const ALL: [UploadKind; 3] = [UploadKind::Documents, UploadKind::Images, UploadKind::Games];
}

/// File-system store rooted at the upload directory
#[derive(Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create the root and one sub-directory per upload kind
    pub async fn initialize(&self) -> Result<()> {
        for kind in UploadKind::ALL {
            fs::create_dir_all(self.root.join(kind.dir_name())).await?;
        }
        tracing::info!("Upload store initialized at: {:?}", self.root);
        Ok(())
    }

    /// Write a new blob and return its stored file name.
    ///
    /// The file is opened with create-new semantics; a name collision bumps
    /// the timestamp and tries again.
    pub async fn write(&self, kind: UploadKind, title: &str, ext: &str, data: &[u8]) -> Result<String> {
        let dir = self.root.join(kind.dir_name());
        fs::create_dir_all(&dir).await?;

        let mut millis = Utc::now().timestamp_millis();

        for _ in 0..MAX_FILE_NAME_ATTEMPTS {
            let file_name = stored_file_name(title, ext, millis);
            let path = dir.join(&file_name);

            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    millis += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let written = async {
                file.write_all(data).await?;
                file.sync_all().await
            }
            .await;

            if let Err(e) = written {
                drop(file);
                let _ = fs::remove_file(&path).await;
                return Err(e.into());
            }

            tracing::debug!(
                "Wrote upload: {}/{} ({} bytes)",
                kind.dir_name(),
                file_name,
                data.len()
            );
            return Ok(file_name);
        }

        Err(AppError::Storage(format!(
            "Could not allocate a unique file name for '{}'",
            title
        )))
    }

    /// Read a stored blob
    pub async fn read(&self, kind: UploadKind, file_name: &str) -> Result<Vec<u8>> {
        let path = self.path_for(kind, file_name)?;

        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("File not found: {}", file_name)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a stored blob. A file that is already gone is not an error.
    pub async fn delete(&self, kind: UploadKind, file_name: &str) -> Result<()> {
        let path = self.path_for(kind, file_name)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("Deleted upload: {}/{}", kind.dir_name(), file_name);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Upload already absent: {}/{}", kind.dir_name(), file_name);
                Ok(())
            }
            Err(e) => Err(AppError::Storage(format!(
                "Failed to delete file {}: {}",
                file_name, e
            ))),
        }
    }

    /// Resolve a path relative to the upload root, refusing anything that
    /// leaves it (parent components, absolute paths, escaping symlinks)
    pub async fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let not_found = || AppError::NotFound(format!("File not found: {}", relative));

        let relative_path = Path::new(relative);
        if relative.is_empty()
            || !relative_path
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(not_found());
        }

        let root = fs::canonicalize(&self.root).await?;
        let full = fs::canonicalize(root.join(relative_path))
            .await
            .map_err(|_| not_found())?;

        if !full.starts_with(&root) {
            tracing::warn!("Refused upload path outside root: {}", relative);
            return Err(not_found());
        }

        let metadata = fs::metadata(&full).await.map_err(|_| not_found())?;
        if !metadata.is_file() {
            return Err(not_found());
        }

        Ok(full)
    }

    /// Absolute path of a stored blob
    pub fn path_for(&self, kind: UploadKind, file_name: &str) -> Result<PathBuf> {
        let mut components = Path::new(file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(kind.dir_name()).join(file_name)),
            _ => Err(AppError::Storage(format!("Invalid stored file name: {}", file_name))),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Reduce a user-supplied title to a file-name-safe stem.
///
/// Keeps alphanumerics, spaces, underscores and hyphens; runs of spaces
/// become one underscore.
pub fn sanitize_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();

    let stem = kept
        .split(' ')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if stem.is_empty() {
        FALLBACK_FILE_STEM.to_string()
    } else {
        stem.chars().take(MAX_FILE_STEM_CHARS).collect()
    }
}

/// `<sanitized title>_<millis>.<ext>`
pub fn stored_file_name(title: &str, ext: &str, millis: i64) -> String {
    format!("{}_{}.{}", sanitize_title(title), millis, ext)
}

/// Lower-cased extension of a client file name, if any
pub fn file_extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Content type served for a stored file
pub fn content_type_for(file_name: &str) -> &'static str {
    match file_extension(file_name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("zip") => "application/zip",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_store() -> (UploadStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = UploadStore::new(temp_dir.path().join("uploads"));
        store.initialize().await.unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("My  Great Book"), "My_Great_Book");
        assert_eq!(sanitize_title("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_title("读书 笔记-v2"), "读书_笔记-v2");
        assert_eq!(sanitize_title("  !!!  "), FALLBACK_FILE_STEM);
        assert_eq!(sanitize_title(""), FALLBACK_FILE_STEM);
    }

    #[test]
    fn test_stored_file_name() {
        assert_eq!(stored_file_name("A b", "pdf", 42), "A_b_42.pdf");
        assert_eq!(stored_file_name("", "txt", 7), "untitled_7.txt");
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("Report.PDF").as_deref(), Some("pdf"));
        assert_eq!(file_extension("archive.tar.zip").as_deref(), Some("zip"));
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension("trailing."), None);
    }

    #[tokio::test]
    async fn test_write_read_delete() {
        let (store, _temp) = create_test_store().await;

        let name = store
            .write(UploadKind::Documents, "Book", "txt", b"hello")
            .await
            .unwrap();
        assert!(name.starts_with("Book_"));
        assert!(name.ends_with(".txt"));

        let data = store.read(UploadKind::Documents, &name).await.unwrap();
        assert_eq!(data, b"hello");

        store.delete(UploadKind::Documents, &name).await.unwrap();
        assert!(matches!(
            store.read(UploadKind::Documents, &name).await,
            Err(AppError::NotFound(_))
        ));

        // Deleting again is fine
        store.delete(UploadKind::Documents, &name).await.unwrap();
    }

    #[tokio::test]
    async fn test_same_title_gets_distinct_names() {
        let (store, _temp) = create_test_store().await;

        let first = store.write(UploadKind::Games, "g", "js", b"1").await.unwrap();
        let second = store.write(UploadKind::Games, "g", "js", b"2").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.read(UploadKind::Games, &first).await.unwrap(), b"1");
        assert_eq!(store.read(UploadKind::Games, &second).await.unwrap(), b"2");
    }

    #[tokio::test]
    async fn test_delete_reports_io_failure() {
        let (store, _temp) = create_test_store().await;

        // A directory in place of the file cannot be removed with remove_file
        let path = store.path_for(UploadKind::Documents, "stuck.pdf").unwrap();
        fs::create_dir_all(&path).await.unwrap();

        let result = store.delete(UploadKind::Documents, "stuck.pdf").await;
        assert!(matches!(result, Err(AppError::Storage(_))));
    }

    #[tokio::test]
    async fn test_resolve_confines_to_root() {
        let (store, temp) = create_test_store().await;

        let name = store
            .write(UploadKind::Images, "pic", "png", b"png")
            .await
            .unwrap();
        std::fs::write(temp.path().join("secret.txt"), b"secret").unwrap();

        let resolved = store.resolve(&format!("images/{}", name)).await.unwrap();
        assert!(resolved.ends_with(&name));

        assert!(store.resolve("../secret.txt").await.is_err());
        assert!(store.resolve("images/../../secret.txt").await.is_err());
        assert!(store.resolve("/etc/passwd").await.is_err());
        assert!(store.resolve("images").await.is_err());
        assert!(store.resolve("").await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolve_refuses_symlink_leaving_root() {
        let (store, temp) = create_test_store().await;

        let outside = temp.path().join("secret.txt");
        std::fs::write(&outside, b"secret").unwrap();
        std::os::unix::fs::symlink(&outside, temp.path().join("uploads/images/link.png")).unwrap();

        assert!(matches!(
            store.resolve("images/link.png").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_path_for_rejects_nested_names() {
        let store = UploadStore::new(PathBuf::from("/tmp/uploads"));
        assert!(store.path_for(UploadKind::Documents, "a.pdf").is_ok());
        assert!(store.path_for(UploadKind::Documents, "../a.pdf").is_err());
        assert!(store.path_for(UploadKind::Documents, "x/a.pdf").is_err());
    }
}
