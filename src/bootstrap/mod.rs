pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, load_config_or_defaults};
pub use self::tracing::init_tracing_subscriber;
pub use wiring::{wire_attachment_runtime, wire_with_app_dirs, WiringError, WiringResult};
