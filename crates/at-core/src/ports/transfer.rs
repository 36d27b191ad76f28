//! Transfer Client Port
//!
//! HTTP file-transfer collaborator. Implementations decide how slots are
//! obtained and how bytes move; callers only see URLs, paths and errors.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::attachment::{MimeType, Slot};
use crate::errors::TransferError;

/// Progress listener for downloads, called with a percentage.
pub type ProgressFn<'a> = dyn Fn(u8) + Send + Sync + 'a;

#[async_trait]
pub trait TransferClientPort: Send + Sync {
    /// Ask the file host for an upload slot.
    async fn request_upload_slot(
        &self,
        file_name: &str,
        length: u64,
        mime_type: &MimeType,
    ) -> Result<Slot, TransferError>;

    /// Stream `file` to `url`.
    async fn upload(
        &self,
        file: &Path,
        url: &str,
        mime_type: &MimeType,
        encrypted: bool,
    ) -> Result<(), TransferError>;

    /// Stream `url` into a new file inside `destination_dir` and return its path.
    async fn download(
        &self,
        url: &str,
        destination_dir: &Path,
        progress: &ProgressFn<'_>,
    ) -> Result<PathBuf, TransferError>;
}
