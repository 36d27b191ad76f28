use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::MimeType;

/// Encryption state of a message payload or its attachment.
///
/// 消息内容或附件的加密状态。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncryptionState {
    /// Never encrypted; sent and stored in the clear.
    #[default]
    Plain,
    /// Cleartext held locally for an encrypted conversation. Outgoing content in
    /// this state must be encrypted before it leaves the device.
    Decrypted,
    /// Ciphertext as received or sent over the wire.
    Encrypted,
}

impl EncryptionState {
    pub fn is_encrypted(&self) -> bool {
        matches!(self, EncryptionState::Encrypted)
    }

    pub fn needs_encryption(&self) -> bool {
        matches!(self, EncryptionState::Decrypted)
    }
}

/// Transfer status of a message, the only message status this subsystem changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferStatus {
    #[default]
    Pending,
    Error,
}

/// File payload of a message and its metadata.
///
/// 消息的文件负载及其元数据。
///
/// `file_path` is either absolute or relative to the attachment directory.
/// `url` is the remote download location once the file has been uploaded
/// (outgoing) or announced by the sender (incoming).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_path: PathBuf,
    pub mime_type: MimeType,
    pub length: u64,
    pub encryption: EncryptionState,
    pub url: Option<String>,
}

impl Attachment {
    pub fn new(file_path: impl Into<PathBuf>, mime_type: MimeType) -> Self {
        Self {
            file_path: file_path.into(),
            mime_type,
            length: 0,
            encryption: EncryptionState::Plain,
            url: None,
        }
    }

    /// Incoming attachment announced by a remote URL, not yet on disk.
    pub fn remote(url: impl Into<String>, mime_type: MimeType, encryption: EncryptionState) -> Self {
        Self {
            file_path: PathBuf::new(),
            mime_type,
            length: 0,
            encryption,
            url: Some(url.into()),
        }
    }

    pub fn has_url(&self) -> bool {
        self.url.as_deref().is_some_and(|url| !url.is_empty())
    }
}
