//! Message Ports
//!
//! The chat message model is owned by the embedding client. The transfer
//! subsystem only reads attachment metadata and reports results through the
//! setters below.
//!
//! **Semantic:** setters take `&self`. Implementations use interior mutability;
//! a message is never mutated by anyone else while its task is in flight.

use crate::attachment::{Attachment, EncryptionState, MimeType, Preview, TransferStatus};
use crate::ids::MessageId;

/// Read access shared by incoming and outgoing messages.
pub trait AttachmentMessage: Send + Sync {
    fn id(&self) -> MessageId;

    fn attachment(&self) -> Option<Attachment>;

    fn preview(&self) -> Option<Preview>;

    /// Attach a locally generated preview.
    fn set_preview(&self, preview: Preview);
}

/// Message composed locally whose attachment is uploaded.
pub trait OutboundMessage: AttachmentMessage {
    /// Encryption state of the message content. `Decrypted` means the content
    /// and its attachment must be encrypted before sending.
    fn content_encryption(&self) -> EncryptionState;

    fn set_status(&self, status: TransferStatus);

    /// Record the result of a successful upload.
    fn set_upload(&self, url: &str, mime_type: &MimeType, length: u64);
}

/// Message received from a peer whose attachment is downloaded.
pub trait InboundMessage: AttachmentMessage {
    /// Download progress in percent, 0..=100.
    fn set_download_progress(&self, percent: u8);

    /// File name of the attachment inside the attachment directory.
    fn set_attachment_file_name(&self, file_name: &str);

    fn set_attachment_encryption(&self, state: EncryptionState);

    /// File name of a preview persisted in the preview directory.
    fn set_preview_filename(&self, file_name: &str);
}
