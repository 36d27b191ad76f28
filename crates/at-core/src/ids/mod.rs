//! ID type wrappers for type safety.

pub mod message_id;

pub use message_id::MessageId;
