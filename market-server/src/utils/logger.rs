//! Logging Infrastructure
//!
//! Structured logging setup for development and production. Production
//! deployments pass `json = true` so the log pipeline gets one JSON object
//! per line; development keeps the human-readable format.

use std::path::Path;

/// Initialize the logger with defaults (stdout, human-readable, info level)
pub fn init_logger() {
    init_logger_with_file(None, false, None);
}

/// Initialize the logger with optional file output
///
/// `RUST_LOG` takes precedence over `log_level` when set. When `log_dir`
/// names an existing directory, output goes to a daily-rolled file inside
/// it instead of stdout.
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
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
            let file_appender = tracing_appender::rolling::daily(dir_str, "market-server");
            if json {
                builder.json().with_writer(file_appender).init();
            } else {
                builder.with_writer(file_appender).init();
            }
            return;
        }
    }

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Remove rolled log files older than `days`, returning how many were removed
pub fn cleanup_old_logs(log_dir: &str, days: u64) -> std::io::Result<usize> {
    let cutoff = std::time::SystemTime::now() - std::time::Duration::from_secs(days * 24 * 60 * 60);
    let mut removed = 0;

    for entry in std::fs::read_dir(log_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !name.starts_with("market-server") {
            continue;
        }
        if let Ok(modified) = entry.metadata()?.modified()
            && modified < cutoff
        {
            std::fs::remove_file(entry.path())?;
            removed += 1;
        }
    }

    Ok(removed)
}
