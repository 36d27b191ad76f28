use thiserror::Error;

/// Failure reported by the transfer client while talking to the file host.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("malformed upload slot: {0}")]
    MalformedSlot(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("can't decode image: {0}")]
    Decode(String),

    #[error("can't encode image as {mime}: {reason}")]
    Encode { mime: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("media task aborted: {0}")]
    Aborted(String),
}

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid key")]
    InvalidKey,

    #[error("encryption failed")]
    EncryptFailed,

    #[error("decryption failed: wrong key or corrupted file")]
    DecryptFailed,

    #[error("unsupported envelope: {0}")]
    UnsupportedEnvelope(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum AppDirsError {
    #[error("system data directory is unavailable")]
    DataDirUnavailable,

    #[error("can't create {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("transfer queue is closed")]
    Closed,
}

/// Why an upload or download task was abandoned.
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("message has no attachment")]
    MissingAttachment,

    #[error("attachment has no remote url")]
    MissingUrl,

    #[error("no active identity key")]
    MissingKey,

    #[error("attachment encryption failed")]
    EncryptionFailed,

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
