use std::{fs, path::Path};

use anyhow::Context;
use chrono::Utc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

const DEFAULT_FILTER: &str = "info,cueline_core=trace";

/// Keeps the non-blocking log writer alive for the process lifetime.
pub struct TelemetryGuard {
    pub run_id: Uuid,
    _file_guard: Option<WorkerGuard>,
}

/// Stdout logging plus a timestamped JSON log file under `log_dir`.
pub fn init_tracing(log_dir: impl AsRef<Path>) -> anyhow::Result<TelemetryGuard> {
    init_tracing_with_options(Some(log_dir.as_ref()), DEFAULT_FILTER)
}

/// Full-control variant: `log_dir = None` skips the file layer entirely,
/// which keeps test runs from littering the working directory.
pub fn init_tracing_with_options(
    log_dir: Option<&Path>,
    default_filter: &str,
) -> anyhow::Result<TelemetryGuard> {
    let run_id = Uuid::new_v4();
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_thread_ids(true)
        .with_target(true);

    let mut file_guard = None;
    let file_layer = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory: {}", dir.display()))?;
            let file_name = format!("cueline-{}.log", Utc::now().format("%Y%m%d-%H%M%S"));
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
            file_guard = Some(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .json()
                    .with_current_span(true)
                    .with_writer(writer),
            )
        }
        None => None,
    };

    if let Err(error) = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
    {
        warn!(?error, "global tracing subscriber already initialized");
    } else {
        info!(%run_id, "tracing initialized");
    }

    Ok(TelemetryGuard {
        run_id,
        _file_guard: file_guard,
    })
}
