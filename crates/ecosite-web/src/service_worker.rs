#![forbid(unsafe_code)]

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{ServiceWorkerRegistration, Window};

/// Register the offline worker at `script` in the background.
///
/// Outcome is only logged; the site works the same either way.
pub fn register(window: &Window, script: &str) {
    let navigator = window.navigator();
    let supported = js_sys::Reflect::has(&navigator, &JsValue::from_str("serviceWorker"))
        .unwrap_or(false);
    if !supported {
        tracing::debug!("service workers unsupported");
        return;
    }

    let promise = navigator.service_worker().register(script);
    let script = script.to_string();
    wasm_bindgen_futures::spawn_local(async move {
        match JsFuture::from(promise).await {
            Ok(value) => {
                let scope = value
                    .dyn_into::<ServiceWorkerRegistration>()
                    .map(|registration| registration.scope())
                    .unwrap_or_default();
                tracing::info!(%script, %scope, "service worker registered");
            }
            Err(err) => tracing::warn!(%script, error = ?err, "service worker registration failed"),
        }
    });
}
