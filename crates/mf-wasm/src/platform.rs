//! Browser-side implementations of the core's ports: `localStorage` as the
//! storage medium, `Date.now()` as the clock, and the console as the log
//! sink.

use mf_core::clock::Clock;
use mf_core::persist::{Storage, StorageError};
use wasm_bindgen::JsValue;

/// `window.localStorage`, looked up on every call so a page that disables
/// storage later degrades instead of holding a dead handle.
pub struct LocalStorage;

fn js_error(err: JsValue) -> StorageError {
    StorageError::Backend(format!("{err:?}"))
}

impl LocalStorage {
    fn handle() -> Result<web_sys::Storage, StorageError> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))
    }
}

impl Storage for LocalStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::handle()?.get_item(key).map_err(js_error)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::handle()?.set_item(key, value).map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        Self::handle()?.remove_item(key).map_err(js_error)
    }
}

pub struct JsClock;

impl Clock for JsClock {
    fn now_millis(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

#[cfg(target_arch = "wasm32")]
struct ConsoleLogger;

#[cfg(target_arch = "wasm32")]
impl log::Log for ConsoleLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let msg: JsValue = format!("[{}] {}", record.target(), record.args()).into();
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            log::Level::Info => web_sys::console::info_1(&msg),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
static LOGGER: ConsoleLogger = ConsoleLogger;

/// Route panics and `log` records to the browser console. Idempotent.
pub fn install_hooks() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("machine editor panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
            if log::set_logger(&LOGGER).is_ok() {
                log::set_max_level(log::LevelFilter::Info);
            }
        });
    }
}
