#![forbid(unsafe_code)]

use std::rc::Rc;

use ecosite_core::SiteError;
use ecosite_core::logging;
use wasm_bindgen::prelude::*;

use crate::console::BrowserConsole;
use crate::hooks::install_panic_hook;
use crate::options::{parse_config, parse_pages, state_json};
use crate::runtime::Runtime;
use crate::service_worker;

/// Handle to the running site, exported to JS.
///
/// ```js
/// const site = EcoSite.start({ animation_ms: 250, service_worker: "/sw.js" });
/// site.changePage("agua");
/// console.log(JSON.parse(site.state()).current_page);
/// ```
#[wasm_bindgen]
pub struct EcoSite {
    runtime: Rc<Runtime>,
}

#[wasm_bindgen]
impl EcoSite {
    /// Boot the site on the current document.
    ///
    /// `options` is a plain object of configuration fields; `pages`
    /// optionally replaces the built-in page registry. Fails (after logging)
    /// when the options are invalid or required markup is missing.
    pub fn start(options: Option<JsValue>, pages: Option<JsValue>) -> Result<EcoSite, JsValue> {
        let config = stringify(options.as_ref()).and_then(|json| parse_config(json.as_deref()));
        let filter = config.as_ref().map_or("info", |c| c.log_filter.as_str());
        if let Err(err) = logging::init(BrowserConsole, filter) {
            web_sys::console::debug_1(&JsValue::from_str(&err.to_string()));
        }
        install_panic_hook();

        let config = config.map_err(startup_failed)?;
        let registry = stringify(pages.as_ref())
            .and_then(|json| parse_pages(json.as_deref()))
            .map_err(startup_failed)?;
        let window =
            web_sys::window().ok_or_else(|| startup_failed(SiteError::Host("no window".into())))?;

        let worker = config.service_worker.clone();
        let runtime = Runtime::start(window.clone(), config, registry).map_err(startup_failed)?;
        if let Some(script) = worker {
            service_worker::register(&window, &script);
        }
        Ok(Self { runtime })
    }

    /// JSON snapshot of the controller state.
    pub fn state(&self) -> String {
        self.runtime.with_site(|site| state_json(&site.snapshot()))
    }

    /// Request a page change with a history entry. Returns whether it started.
    #[wasm_bindgen(js_name = changePage)]
    pub fn change_page(&self, page: &str) -> bool {
        self.runtime
            .with_site(|site| site.change_page(page, true).started())
    }

    /// Toggle the drawer. Returns whether the request was applied.
    #[wasm_bindgen(js_name = toggleDrawer)]
    pub fn toggle_drawer(&self) -> bool {
        self.runtime.with_site(|site| site.toggle_drawer())
    }
}

fn stringify(value: Option<&JsValue>) -> Result<Option<String>, SiteError> {
    let Some(value) = value.filter(|v| !v.is_undefined() && !v.is_null()) else {
        return Ok(None);
    };
    js_sys::JSON::stringify(value)
        .map(|json| json.as_string())
        .map_err(|err| SiteError::InvalidConfig(format!("{err:?}")))
}

fn startup_failed(err: SiteError) -> JsValue {
    tracing::error!(%err, "site startup failed");
    JsValue::from_str(&err.to_string())
}
