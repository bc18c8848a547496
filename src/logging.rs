use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_DIR: &str = "logs";
const DEFAULT_DIRECTIVE: &str = "thunderclash_backend=info";

/// Initializes logging with a human-readable console layer and a
/// daily-rotated JSON file under `logs/`.
pub fn init_logging() {
    let _ = fs::create_dir_all(LOG_DIR);

    let file_appender = tracing_appender::rolling::daily(LOG_DIR, "backend.log");
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);
    let console_layer = fmt::layer().with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(DEFAULT_DIRECTIVE.parse().unwrap()))
        .with(file_layer)
        .with(console_layer)
        .init();

    // The appender guard must outlive the process or buffered lines are lost
    std::mem::forget(_guard);
}
