//! Logging Infrastructure
//!
//! Console logging by default, daily rolling files when a log directory exists.

use std::path::Path;

/// Initialize the logger at `info` on stdout
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional file output
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");

    // RUST_LOG wins over the configured level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    // Add file output if log_dir is provided
    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "invoice-bridge");
            let _ = subscriber.with_writer(file_appender).try_init();
            return;
        }
    }

    // A second init (tests, embedding hosts) keeps the existing subscriber
    let _ = subscriber.try_init();
}
