#![forbid(unsafe_code)]

use ecosite_core::logging::LogSink;
use tracing::Level;
use wasm_bindgen::JsValue;
use web_sys::console;

/// Writes log lines to the browser devtools console at the matching level.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserConsole;

impl LogSink for BrowserConsole {
    fn write_line(&self, level: Level, line: &str) {
        let line = JsValue::from_str(line);
        match level {
            Level::ERROR => console::error_1(&line),
            Level::WARN => console::warn_1(&line),
            Level::INFO => console::info_1(&line),
            Level::DEBUG | Level::TRACE => console::debug_1(&line),
        }
    }
}
