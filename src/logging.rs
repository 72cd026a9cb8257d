//! `log` backend for the chart.
//!
//! In the browser, records go to `web_sys::console`. Native builds (tests,
//! tooling) use `env_logger`.

use log::LevelFilter;

#[cfg(target_arch = "wasm32")]
mod console {
    use log::{Level, Log, Metadata, Record};
    use wasm_bindgen::JsValue;
    use web_sys::console;

    pub(super) struct ConsoleLogger;

    pub(super) static LOGGER: ConsoleLogger = ConsoleLogger;

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let line = format!("[{}] {}: {}", record.level(), record.target(), record.args());
            let value = JsValue::from_str(&line);
            match record.level() {
                Level::Error => console::error_1(&value),
                Level::Warn => console::warn_1(&value),
                Level::Info => console::info_1(&value),
                Level::Debug | Level::Trace => console::debug_1(&value),
            }
        }

        fn flush(&self) {}
    }
}

/// Install the logger.
///
/// Returns `false` if another logger was installed first; the level is left
/// alone in that case.
#[cfg(target_arch = "wasm32")]
pub fn init(level: LevelFilter) -> bool {
    match log::set_logger(&console::LOGGER) {
        Ok(()) => {
            log::set_max_level(level);
            true
        }
        Err(_) => false,
    }
}

/// Install the logger.
///
/// Returns `false` if another logger was installed first; the level is left
/// alone in that case.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(level: LevelFilter) -> bool {
    env_logger::Builder::new()
        .filter_level(level)
        .try_init()
        .is_ok()
}
