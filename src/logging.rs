use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

// The non-blocking writer stops flushing once its guard is dropped, so the
// guard lives for the rest of the process.
static FILE_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

/// Initialise logging. In debug builds the default level is `debug` while in
/// release builds it falls back to `info`. The level can be overridden via the
/// `RUST_LOG` environment variable when debug logging is enabled.
///
/// When `file` is given, log output is additionally written there through a
/// non-blocking appender.
pub fn init(debug: bool, file: Option<PathBuf>) {
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        // Allow `RUST_LOG` to override the level when debug logging is enabled.
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        // Force `info` regardless of the environment to prevent accidental
        // verbose output.
        EnvFilter::new(level)
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf();
            let name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "dashgrid.log".into());
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            let _ = builder.with_writer(writer).with_ansi(false).try_init();
        }
        None => {
            let _ = builder.try_init();
        }
    }
}
