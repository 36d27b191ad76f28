//! Attachment transfer subsystem for a messaging client.
//!
//! The crate root only assembles the workspace crates: `at-core` holds the
//! domain model and ports, `at-app` the use cases and the transfer worker,
//! `at-infra` the adapters. See [`bootstrap`] for the entry points.

pub mod bootstrap;

pub use at_app::{AttachmentDirs, AttachmentRuntime};
pub use at_core::AttachmentConfig;
pub use bootstrap::{init_tracing_subscriber, load_config, wire_attachment_runtime};
