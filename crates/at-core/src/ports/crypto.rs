//! Crypto Bridge Port
//!
//! Opaque file encryption. Both operations are best effort: failures are
//! logged by the implementation and surface only as `None` (encrypt) or as an
//! attachment left untouched (decrypt).

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::ids::MessageId;
use crate::ports::InboundMessage;
use crate::security::IdentityKey;

#[async_trait]
pub trait CryptoBridgePort: Send + Sync {
    /// Encrypt `file` into a new file and return its path.
    ///
    /// The source file is never modified. The caller owns the returned file
    /// and deletes it after the upload.
    async fn encrypt(&self, key: &IdentityKey, message_id: &MessageId, file: &Path)
        -> Option<PathBuf>;

    /// Decrypt the message's attachment inside `attachment_dir`.
    ///
    /// On success the plaintext replaces the ciphertext and the message's
    /// attachment file name and encryption state are updated.
    async fn decrypt(&self, key: &IdentityKey, message: &dyn InboundMessage, attachment_dir: &Path);
}
