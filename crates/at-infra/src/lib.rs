//! Adapters for the attachment transfer ports: image codecs, file
//! encryption, the HTTP file host, the filesystem and the task queue.

pub mod fs;
pub mod media;
pub mod queue;
pub mod security;
pub mod transfer;

pub use fs::{DirsAppDirsAdapter, FsPreviewStore};
pub use media::ImageMediaTransform;
pub use queue::MpscTransferQueue;
pub use security::XChaChaCryptoBridge;
pub use transfer::HttpTransferClient;
