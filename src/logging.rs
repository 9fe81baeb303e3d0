use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

const CRATE_TARGET: &str = "danci_session";
const LOG_FILE_PREFIX: &str = "danci-session.log";

/// Keeps the non-blocking file writer flushing until the drill exits.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// A bare level (`debug`) applies to this crate only, with dependencies held at `warn`.
/// Anything that already looks like a directive list is used as is.
pub fn filter_directives(log_level: &str) -> String {
    let level = log_level.trim();
    if level.is_empty() {
        return format!("warn,{CRATE_TARGET}=info");
    }
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    format!("warn,{CRATE_TARGET}={level}")
}

/// Compact, timestamp-free events on stderr so they stay out of the way of the prompts on
/// stdout. A daily rolling file gets the full format when `config.log_dir` is set.
pub fn init_tracing(config: &Config) -> Option<FileLogGuard> {
    let env_filter = EnvFilter::try_new(filter_directives(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,{CRATE_TARGET}=info")));
    let stderr_layer = fmt::layer()
        .compact()
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file = config.log_dir.as_deref().and_then(open_log_file);
    match file {
        Some((file_writer, guard)) => {
            let file_layer = fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_target(true);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();

            Some(FileLogGuard { _guard: guard })
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .init();
            None
        }
    }
}

fn open_log_file(dir: &Path) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    if let Err(err) = std::fs::create_dir_all(dir) {
        eprintln!("file logging disabled, cannot create {}: {err}", dir.display());
        return None;
    }
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
    Some(tracing_appender::non_blocking(appender))
}
