#![forbid(unsafe_code)]

//! WASM frontend for ecosite.
//!
//! Binds the `ecosite-core` controller to the browser:
//! - a `web-sys` [`Surface`](ecosite_core::Surface) over the page markup,
//! - DOM listeners translated into controller events,
//! - one `setTimeout` driving the controller's timer queue,
//! - console logging, global error handlers and optional service-worker
//!   registration.
//!
//! JS talks to the site through the exported `EcoSite` handle.

pub mod hooks;
pub mod lifetime;
pub mod markup;
pub mod options;

#[cfg(target_arch = "wasm32")]
mod console;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod runtime;
#[cfg(target_arch = "wasm32")]
mod service_worker;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::EcoSite;

#[cfg(not(target_arch = "wasm32"))]
pub use native::EcoSite;

/// Native builds run the same handle over the headless surface so the debug
/// API can be exercised without a browser.
#[cfg(not(target_arch = "wasm32"))]
mod native {
    use core::time::Duration;

    use ecosite_core::{HeadlessSurface, HostEnv, Site, SiteError};

    use crate::hooks::install_panic_hook;
    use crate::options::{parse_config, parse_pages, state_json};

    pub struct EcoSite {
        site: Site<HeadlessSurface>,
    }

    impl EcoSite {
        /// Start with JSON `options` and `pages` (either may be absent).
        pub fn start(options: Option<&str>, pages: Option<&str>) -> Result<Self, SiteError> {
            install_panic_hook();
            let config = parse_config(options)?;
            let registry = parse_pages(pages)?;
            let surface = HeadlessSurface::for_registry(&registry);
            let site = Site::start(
                surface,
                registry,
                config,
                HostEnv::default(),
                ecosite_core::LogAnalytics,
            )?;
            Ok(Self { site })
        }

        pub fn state(&self) -> String {
            state_json(&self.site.snapshot())
        }

        pub fn change_page(&mut self, page: &str) -> bool {
            self.site.change_page(page, true).started()
        }

        pub fn toggle_drawer(&mut self) -> bool {
            self.site.toggle_drawer()
        }

        /// Let `dt` of simulated time pass.
        pub fn advance(&mut self, dt: Duration) {
            self.site.advance(dt);
        }
    }

}
