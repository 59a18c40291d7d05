//! Browser console logging bootstrap.
//!
//! # Invariants
//! - Initialization is idempotent for the same level and rejects a different
//!   level once installed.
//! - Never panics; failures surface as `Err(String)`.

use landkit_core::logging::{level_filter, normalize_level, panic_payload_summary};
use log::{error, info, Level, Log, Metadata, Record};
use once_cell::sync::OnceCell;
use wasm_bindgen::JsValue;
use web_sys::console;

static LOGGING_LEVEL: OnceCell<&'static str> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();
static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger;

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!(
            "[landkit] {} {} {}",
            record.level(),
            record.target(),
            record.args()
        ));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug | Level::Trace => console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Installs the console logger at `level`.
pub fn init_console_logging(level: &str) -> Result<(), String> {
    let normalized_level = normalize_level(level)?;
    if let Some(active) = LOGGING_LEVEL.get() {
        return check_matches(active, normalized_level);
    }

    log::set_logger(&CONSOLE_LOGGER)
        .map_err(|err| format!("failed to install console logger: {err}"))?;
    log::set_max_level(level_filter(normalized_level));
    let active = LOGGING_LEVEL.get_or_init(|| normalized_level);
    install_panic_hook_once();

    info!(
        "event=logging_init module=logging status=ok host=browser level={} version={}",
        normalized_level,
        env!("CARGO_PKG_VERSION")
    );
    check_matches(active, normalized_level)
}

/// Active console level, if logging was initialized.
pub fn logging_level() -> Option<&'static str> {
    LOGGING_LEVEL.get().copied()
}

fn check_matches(active: &str, level: &str) -> Result<(), String> {
    if active != level {
        return Err(format!(
            "logging already initialized with level `{active}`; refusing to switch to `{level}`"
        ));
    }
    Ok(())
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.get().is_some() {
        return;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_payload_summary(panic_info.payload());
        error!(
            "event=panic_captured module=logging status=error location={} payload={}",
            location, payload
        );
        if LOGGING_LEVEL.get().is_none() {
            console::error_1(&JsValue::from_str(&format!(
                "[landkit] panic at {location}: {payload}"
            )));
        }
    }));

    let _ = PANIC_HOOK_INSTALLED.set(());
}
