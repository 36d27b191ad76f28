//! # at-app
//!
//! Transfer orchestration for message attachments: upload and download use
//! cases, preview generation and the single background worker that runs them
//! in order.

pub mod attachment_dirs;
pub mod deps;
pub mod runtime;
pub mod usecases;
pub mod worker;

pub use attachment_dirs::AttachmentDirs;
pub use deps::TransferDeps;
pub use runtime::AttachmentRuntime;
pub use worker::TransferWorker;
