use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt::{self, format::FmtSpan}};

const LOG_FILE_PREFIX: &str = "raw-develop";

/// Installs the global subscriber. `RUST_LOG` wins over `debug`; without it
/// the filter is `debug` or `info`.
///
/// With `log_dir`, events are also written without colors to a new
/// `raw-develop-<unix seconds>.txt` in that directory, created if missing.
pub fn init(debug: bool, log_dir: Option<&Path>) -> anyhow::Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    
    let is_debug = env_filter.to_string().contains("debug") || 
                   env_filter.to_string().contains("trace");
    let span_events = || if is_debug { FmtSpan::CLOSE } else { FmtSpan::NONE };
    
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_span_events(span_events());

    let file_layer = match log_dir {
        Some(dir) => {
            let path = log_file_path(dir)?;
            let file = File::create(&path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_thread_ids(true)
                    .with_timer(fmt::time::uptime())
                    .with_span_events(span_events())
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(file_layer)
        .init();
    Ok(())
}

fn log_file_path(dir: &Path) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    Ok(dir.join(format!("{}-{}.txt", LOG_FILE_PREFIX, seconds)))
}
