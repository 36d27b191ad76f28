//! # at-core
//!
//! Core domain models and ports for the attachment transfer subsystem.
//!
//! This crate contains pure domain logic without any infrastructure dependencies.
//! Image codecs, ciphers, HTTP and the filesystem live behind the traits in [`ports`].

pub mod app_dirs;
pub mod attachment;
pub mod config;
pub mod errors;
pub mod ids;
pub mod media;
pub mod ports;
pub mod security;

// Re-export commonly used types at the crate root
pub use attachment::{Attachment, EncryptionState, MimeType, Preview, Slot, TransferStatus};
pub use config::AttachmentConfig;
pub use errors::{AttachmentError, CryptoError, MediaError, QueueError, TransferError};
pub use ids::MessageId;
pub use media::Dimensions;
pub use security::IdentityKey;
