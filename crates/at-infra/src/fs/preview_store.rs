use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use at_core::ports::PreviewStorePort;

/// Writes preview images into the preview directory.
pub struct FsPreviewStore {
    dir: PathBuf,
}

impl FsPreviewStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl PreviewStorePort for FsPreviewStore {
    async fn write(&self, file_name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
        // Names come from message ids; refuse anything that would leave the directory.
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.starts_with('.') {
            anyhow::bail!("invalid preview file name: {file_name:?}");
        }
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("failed to write preview {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_and_overwrites_preview() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsPreviewStore::new(dir.path());

        let path = store.write("1_bob_.jpg", b"first").await.unwrap();
        store.write("1_bob_.jpg", b"second").await.unwrap();

        assert_eq!(path, dir.path().join("1_bob_.jpg"));
        assert_eq!(std::fs::read(path).unwrap(), b"second");
    }

    #[tokio::test]
    async fn rejects_names_outside_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsPreviewStore::new(dir.path());

        assert!(store.write("../escape.jpg", b"x").await.is_err());
        assert!(store.write("", b"x").await.is_err());
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsPreviewStore::new(dir.path().join("absent"));

        let err = store.write("1_bob.png", b"x").await.unwrap_err();
        assert!(err.to_string().contains("failed to write preview"));
    }
}
