//! Preview Store Port
//!
//! Persists preview images in the preview directory.

use std::path::PathBuf;

#[async_trait::async_trait]
pub trait PreviewStorePort: Send + Sync {
    /// Write `bytes` to `<preview dir>/<file_name>`, replacing any existing file.
    async fn write(&self, file_name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf>;
}
