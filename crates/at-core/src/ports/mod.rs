//! Port interfaces for the application layer
//!
//! Ports define the contract between the transfer use cases and the
//! collaborators they drive: the message model, the control component, the
//! crypto bridge, the file host and the local media/filesystem adapters.
//!
//! ## Port Placement Guidelines
//!
//! A trait belongs here when it is implemented outside `at-app` (by
//! `at-infra` or by the embedding client) and called from a use case.

pub mod app_dirs;
mod control;
mod crypto;
mod media;
mod message;
mod preview_store;
mod queue;
mod transfer;

pub use app_dirs::AppDirsPort;
pub use control::ControlPort;
pub use crypto::CryptoBridgePort;
pub use media::{EncodedImage, MediaTransformPort};
pub use message::{AttachmentMessage, InboundMessage, OutboundMessage};
pub use preview_store::PreviewStorePort;
pub use queue::{TransferQueuePort, TransferTask};
pub use transfer::{ProgressFn, TransferClientPort};
