#[allow(clippy::module_inception)]
mod attachment;
mod mime;
mod preview;
mod slot;

pub use attachment::{Attachment, EncryptionState, TransferStatus};
pub use mime::MimeType;
pub use preview::Preview;
pub use slot::Slot;
