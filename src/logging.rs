use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::ENV_LOG;

pub const DEFAULT_FILTER: &str = "finplan=info,sqlx=warn";
const LOG_FILE_PREFIX: &str = "finplan.log";

fn env_filter(explicit: Option<&str>) -> EnvFilter {
    let directives = explicit
        .map(str::to_owned)
        .or_else(|| std::env::var(ENV_LOG).ok())
        .unwrap_or_else(|| DEFAULT_FILTER.into());
    EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// JSON events with RFC 3339 UTC timestamps on stderr. Safe to call twice;
/// the second call is a no-op.
pub fn init(filter: Option<&str>) {
    let _ = tracing_log::LogTracer::init();
    let _ = tracing_subscriber::registry()
        .with(env_filter(filter))
        .with(
            fmt::layer()
                .json()
                .with_target(true)
                .with_timer(UtcTime::rfc_3339())
                .with_writer(std::io::stderr),
        )
        .try_init();
}

/// As [`init`], plus a daily-rolling JSON file under `dir`. Keep the guard
/// alive for as long as events should reach the file.
pub fn init_with_file(dir: &Path, filter: Option<&str>) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let _ = tracing_log::LogTracer::init();
    tracing_subscriber::registry()
        .with(env_filter(filter))
        .with(
            fmt::layer()
                .json()
                .with_target(true)
                .with_timer(UtcTime::rfc_3339())
                .with_writer(std::io::stderr),
        )
        .with(
            fmt::layer()
                .json()
                .with_target(true)
                .with_timer(UtcTime::rfc_3339())
                .with_ansi(false)
                .with_writer(writer),
        )
        .try_init()?;
    Ok(guard)
}
