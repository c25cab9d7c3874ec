//! Structured logging setup
//!
//! Logs go to stderr through a `fmt` layer. `RUST_LOG` overrides the configured
//! level, `-v` raises it. When `[logging] file` is set, a non-blocking writer also
//! appends plain-text logs to that file; keep the returned guard alive until exit.

use anyhow::Context;
use recast_common::config::LoggingSection;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Filter directive for a verbosity count on top of the configured level
pub fn level_for(configured: &str, verbose: u8) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber.
pub fn init_logging(config: &LoggingSection, verbose: u8) -> anyhow::Result<Option<WorkerGuard>> {
    let level = level_for(&config.level, verbose);
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) if verbose == 0 => EnvFilter::try_new(directives),
        _ => EnvFilter::try_new(&level),
    }
    .with_context(|| format!("Invalid log level '{}'", level))?;

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Log file {} has no file name", path.display()))?;
            std::fs::create_dir_all(directory)
                .with_context(|| format!("Failed to create {}", directory.display()))?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false).boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}
