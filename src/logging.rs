//! Tracing setup for the CLI and viewer
//!
//! Events go to stderr and to `<log_dir>/orbit_scene.log.<date>`.
//! `RUST_LOG` replaces the default filter.

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "orbit_scene.log";
const DEFAULT_FILTER: &str = "info,orbit_scene=debug";

/// Install console and daily file logging; call once, before anything logs
pub fn init_logging(log_dir: &str) -> anyhow::Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    // Flushes on drop; the subscriber is global, so it has to outlive main
    std::mem::forget(guard);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true);
    let file = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(file)
        .try_init()?;

    tracing::debug!(log_dir, "Logging ready");
    Ok(())
}

/// Log a failed command with optional extra fields
#[macro_export]
macro_rules! log_error {
    ($err:expr) => {
        tracing::error!(error = %$err, "Command failed");
    };
    ($err:expr, $($field:tt)*) => {
        tracing::error!(error = %$err, $($field)*, "Command failed");
    };
}
