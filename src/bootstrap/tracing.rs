//! Tracing configuration for the attachment transfer subsystem
//!
//! ## Architecture / 架构
//!
//! - **stdout**: always on, colored outside tests
//! - **file**: `<base dir>/logs/attachment-transfer.log`, where the base dir
//!   is `[storage] base_dir` or else the platform data directory; skipped
//!   with a warning on stderr when neither is available
//! - **Environment-aware**: debug builds log at debug, release builds at info;
//!   `RUST_LOG` overrides both
//!
//! Spans follow the `usecase.<area>.<name>.execute` and
//! `app.transfer_worker.task` naming used across the workspace.

use std::path::{Path, PathBuf};
use std::{fs, io, sync::OnceLock};

use at_core::ports::AppDirsPort;
use at_core::AttachmentConfig;
use at_infra::DirsAppDirsAdapter;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry};

const LOG_FILE_NAME: &str = "attachment-transfer.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Check if running in development environment
fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Build the default filter directives for tracing
///
/// ## Behavior / 行为
/// - **Development**: debug level for the workspace crates
/// - **Production**: info level for the workspace crates
/// - HTTP and TLS internals stay at warn either way
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let level = if is_dev { "debug" } else { "info" };
    vec![
        level.to_string(),
        "hyper=warn".to_string(),
        "hyper_util=warn".to_string(),
        "reqwest=warn".to_string(),
        "rustls=warn".to_string(),
        format!("at_app={level}"),
        format!("at_infra={level}"),
        format!("attachment_transfer={level}"),
    ]
}

/// Initialize the tracing subscriber with appropriate configuration
///
/// ## English
///
/// This function:
/// 1. Creates an env-filter for level control
/// 2. Sets up a stdout fmt layer and, when possible, a file fmt layer
/// 3. Registers the global subscriber
///
/// ## Call this / 调用位置
///
/// Call once at process start, after loading the config and before
/// [`super::wire_attachment_runtime`]:
///
/// ```ignore
/// let config = attachment_transfer::load_config(path)?;
/// attachment_transfer::init_tracing_subscriber(&config)?;
/// ```
///
/// ## Errors / 错误
///
/// Returns `Err` if a subscriber is already registered.
pub fn init_tracing_subscriber(config: &AttachmentConfig) -> anyhow::Result<()> {
    let is_dev = is_development();

    // Step 1: Build environment filter
    let filter_directives = build_filter_directives(is_dev);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter_directives.join(",")));

    // Step 2: Create writers
    let stdout_writer: BoxMakeWriter = BoxMakeWriter::new(io::stdout);
    let file_writer = match logs_dir(config, &DirsAppDirsAdapter::new())
        .and_then(|dir| build_file_writer(&dir))
    {
        Ok(writer) => Some(writer),
        Err(err) => {
            eprintln!("Failed to initialize file logging, falling back to stdout: {err}");
            None
        }
    };

    // Step 3: Create fmt layers
    // "2025-01-15 10:30:45.123 INFO [file.rs:42] [target] message"
    let stdout_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(stdout_writer);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    // Step 4: Register the global subscriber
    registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

/// Logs live next to the attachment data, under the same base directory.
fn logs_dir(config: &AttachmentConfig, app_dirs: &dyn AppDirsPort) -> anyhow::Result<PathBuf> {
    Ok(super::wiring::resolve_base_dir(config, app_dirs)?.join("logs"))
}

fn build_file_writer(logs_dir: &Path) -> anyhow::Result<NonBlocking> {
    fs::create_dir_all(logs_dir)?;

    let file_appender = tracing_appender::rolling::never(logs_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}
