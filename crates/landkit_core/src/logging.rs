//! Core logging policy and native bootstrap.
//!
//! # Responsibility
//! - Define the shared level vocabulary and message sanitizer used by every
//!   host (native file logs here, browser console in `landkit_web`).
//! - Initialize rolling file logs exactly once per process on native hosts.
//!
//! # Invariants
//! - Log lines are metadata-only: `event=<name> module=<module> status=<..>`.
//!   Form values and user-entered text are never logged.
//! - Logging init is idempotent for the same configuration.
//! - Logging initialization must not panic.

#[cfg(not(target_arch = "wasm32"))]
pub use native::{init_logging, logging_status};

const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

/// Returns the default log level for current build mode.
///
/// - `debug` builds -> `debug`
/// - `release` builds -> `info`
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Normalizes a user-supplied level to one of `trace|debug|info|warn|error`.
///
/// # Errors
/// - Returns a human-readable message for unsupported values.
pub fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

/// Maps a normalized level string onto the `log` crate filter.
pub fn level_filter(level: &str) -> log::LevelFilter {
    match level {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    }
}

/// Flattens newlines and caps length so one event stays on one log line.
pub fn sanitize_message(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}

/// Extracts a sanitized, length-capped summary from a panic payload.
pub fn panic_payload_summary(payload: &(dyn std::any::Any + Send)) -> String {
    let message = if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    };

    sanitize_message(&message, MAX_PANIC_PAYLOAD_CHARS)
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::{normalize_level, panic_payload_summary};
    use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
    use log::{error, info};
    use once_cell::sync::OnceCell;
    use std::path::{Path, PathBuf};

    const LOG_FILE_BASENAME: &str = "landkit";
    const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
    const MAX_LOG_FILES: usize = 5;

    static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
    static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

    struct LoggingState {
        level: &'static str,
        log_dir: PathBuf,
        _logger: LoggerHandle,
    }

    /// Initializes rolling file logs with level and directory.
    ///
    /// # Invariants
    /// - Repeated calls with the same `level + log_dir` are idempotent.
    /// - A different level or directory after init is rejected.
    ///
    /// # Errors
    /// - Unsupported `level`.
    /// - Empty, relative, or uncreatable `log_dir`.
    /// - Logger backend setup failure.
    pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
        let normalized_level = normalize_level(level)?;
        let normalized_dir = normalize_log_dir(log_dir)?;

        if let Some(state) = LOGGING_STATE.get() {
            return check_matches(state, normalized_level, &normalized_dir);
        }

        let init_dir = normalized_dir.clone();
        let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, String> {
            std::fs::create_dir_all(&init_dir).map_err(|err| {
                format!(
                    "failed to create log directory `{}`: {err}",
                    init_dir.display()
                )
            })?;

            let logger = Logger::try_with_str(normalized_level)
                .map_err(|err| format!("invalid log level `{normalized_level}`: {err}"))?
                .log_to_file(
                    FileSpec::default()
                        .directory(init_dir.as_path())
                        .basename(LOG_FILE_BASENAME),
                )
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .format_for_files(flexi_logger::detailed_format)
                .start()
                .map_err(|err| format!("failed to start logger: {err}"))?;

            install_panic_hook_once();

            info!(
                "event=logging_init module=logging status=ok host=native level={} log_dir={} version={}",
                normalized_level,
                init_dir.display(),
                env!("CARGO_PKG_VERSION")
            );

            Ok(LoggingState {
                level: normalized_level,
                log_dir: init_dir,
                _logger: logger,
            })
        })?;

        check_matches(state, normalized_level, &normalized_dir)
    }

    /// Returns `(level, log_dir)` when file logging is active.
    pub fn logging_status() -> Option<(&'static str, PathBuf)> {
        LOGGING_STATE
            .get()
            .map(|state| (state.level, state.log_dir.clone()))
    }

    fn check_matches(state: &LoggingState, level: &str, log_dir: &Path) -> Result<(), String> {
        if state.log_dir != log_dir {
            return Err(format!(
                "logging already initialized at `{}`; refusing to switch to `{}`",
                state.log_dir.display(),
                log_dir.display()
            ));
        }
        if state.level != level {
            return Err(format!(
                "logging already initialized with level `{}`; refusing to switch to `{}`",
                state.level, level
            ));
        }
        Ok(())
    }

    pub(super) fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, String> {
        let trimmed = log_dir.trim();
        if trimmed.is_empty() {
            return Err("log_dir cannot be empty".to_string());
        }
        let path = Path::new(trimmed);
        if !path.is_absolute() {
            return Err(format!("log_dir must be an absolute path, got `{trimmed}`"));
        }
        Ok(path.to_path_buf())
    }

    fn install_panic_hook_once() {
        if PANIC_HOOK_INSTALLED.get().is_some() {
            return;
        }

        let previous_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let location = panic_info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()))
                .unwrap_or_else(|| "unknown".to_string());
            error!(
                "event=panic_captured module=logging status=error location={} payload={}",
                location,
                panic_payload_summary(panic_info.payload())
            );
            previous_hook(panic_info);
        }));

        let _ = PANIC_HOOK_INSTALLED.set(());
    }
}
