#![forbid(unsafe_code)]

//! Browser event loop glue.
//!
//! The runtime owns the controller, translates DOM events into
//! [`SiteEvent`]s and keeps exactly one `setTimeout` armed for the earliest
//! pending deadline. Monotonic time comes from `web_time::Instant`.

use core::time::Duration;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use ecosite_core::{
    HostEnv, InteractionKind, KeyInput, PageRegistry, Site, SiteConfig, SiteError, SiteEvent,
    Surface,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    AddEventListenerOptions, ErrorEvent, Event, EventTarget, HtmlElement, KeyboardEvent,
    PopStateEvent, PromiseRejectionEvent, Window,
};
use web_time::{Instant, SystemTime, UNIX_EPOCH};

use crate::dom::DomSurface;
use crate::lifetime;
use crate::markup::{self, HistoryState};

type Listener = Closure<dyn FnMut(Event)>;

struct Attached {
    target: EventTarget,
    name: String,
    closure: Listener,
}

pub struct Runtime {
    window: Window,
    site: RefCell<Site<DomSurface>>,
    origin: Instant,
    armed: Cell<Option<i32>>,
    tick: RefCell<Option<Closure<dyn FnMut()>>>,
    listeners: RefCell<Vec<Attached>>,
}

impl Runtime {
    /// Locate the markup, start the controller and wire every listener.
    ///
    /// The runtime is retained for the rest of the page's life, so dropping
    /// the JS handle leaves the listeners working. A second start is refused.
    pub fn start(
        window: Window,
        config: SiteConfig,
        registry: PageRegistry,
    ) -> Result<Rc<Self>, SiteError> {
        if lifetime::is_retained::<Self>() {
            return Err(SiteError::Host("site already started".into()));
        }
        let surface = DomSurface::locate(window.clone())?;
        let origin = Instant::now();
        let env = HostEnv {
            fragment: surface.location_hash(),
            viewport: surface.viewport(),
            user_agent: window.navigator().user_agent().unwrap_or_default(),
            prefers_high_contrast: prefers_high_contrast(&window),
            now: Duration::ZERO,
            wall_clock_offset: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default(),
            seed: js_sys::Date::now().to_bits(),
        };
        let site = Site::start(surface, registry, config, env, ecosite_core::LogAnalytics)?;

        let runtime = Rc::new(Self {
            window,
            site: RefCell::new(site),
            origin,
            armed: Cell::new(None),
            tick: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        });

        let weak = Rc::downgrade(&runtime);
        *runtime.tick.borrow_mut() = Some(Closure::new(move || {
            if let Some(runtime) = weak.upgrade() {
                runtime.armed.set(None);
                runtime.with_site(|_| ());
            }
        }));

        runtime.install_listeners();
        runtime.install_error_handlers();
        runtime.rearm();
        lifetime::retain_for_page(&runtime);
        Ok(runtime)
    }

    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    /// Run `f` against the controller after catching up on due wakes, then
    /// re-arm the timer.
    pub fn with_site<R: Default>(&self, f: impl FnOnce(&mut Site<DomSurface>) -> R) -> R {
        let result = {
            let Ok(mut site) = self.site.try_borrow_mut() else {
                tracing::warn!("reentrant dispatch ignored");
                return R::default();
            };
            site.advance_to(self.now());
            f(&mut site)
        };
        self.rearm();
        result
    }

    fn dispatch(&self, event: SiteEvent, dom_event: &Event) {
        let disposition = self.with_site(|site| Some(site.handle(event)));
        if disposition.is_some_and(|d| d.prevent_default()) {
            dom_event.prevent_default();
        }
    }

    fn rearm(&self) {
        if let Some(handle) = self.armed.take() {
            self.window.clear_timeout_with_handle(handle);
        }
        let Some(deadline) = self.site.try_borrow().ok().and_then(|s| s.next_deadline()) else {
            return;
        };
        let delay = deadline.saturating_sub(self.now()).as_millis();
        let delay = i32::try_from(delay).unwrap_or(i32::MAX);

        let tick = self.tick.borrow();
        let Some(callback) = tick.as_ref() else {
            return;
        };
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay,
            ) {
            Ok(handle) => self.armed.set(Some(handle)),
            Err(err) => tracing::error!(error = ?err, "timer arm failed"),
        }
    }

    fn listen(
        self: &Rc<Self>,
        target: &EventTarget,
        name: &str,
        passive: bool,
        mut handler: impl FnMut(&Self, Event) + 'static,
    ) {
        let weak: Weak<Self> = Rc::downgrade(self);
        let closure: Listener = Closure::new(move |event: Event| {
            if let Some(runtime) = weak.upgrade() {
                handler(&runtime, event);
            }
        });
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        if let Err(err) = target.add_event_listener_with_callback_and_add_event_listener_options(
            name,
            closure.as_ref().unchecked_ref(),
            &options,
        ) {
            tracing::warn!(event = name, error = ?err, "listener registration failed");
            return;
        }
        self.listeners.borrow_mut().push(Attached {
            target: target.clone(),
            name: name.to_owned(),
            closure,
        });
    }

    fn install_listeners(self: &Rc<Self>) {
        let (toggle, overlay, drawer, nav_items, document) = {
            let site = self.site.borrow();
            let surface = site.surface();
            (
                surface.menu_toggle().clone(),
                surface.overlay().clone(),
                surface.drawer().clone(),
                surface.nav_items(),
                surface.document().clone(),
            )
        };

        self.listen(&toggle, "click", false, |rt, ev| {
            rt.dispatch(SiteEvent::ToggleClick, &ev);
        });
        self.listen(&toggle, "keydown", false, |rt, ev| {
            if let Some(key) = key_input(&ev) {
                rt.dispatch(SiteEvent::ToggleKey(key), &ev);
            }
        });
        self.listen(&overlay, "click", false, |rt, ev| {
            rt.dispatch(SiteEvent::OverlayClick, &ev);
        });

        for item in nav_items {
            let Some(target) = item.get_attribute(markup::NAV_TARGET_ATTR) else {
                tracing::warn!("navigation item without data-target");
                continue;
            };
            let click_target = target.clone();
            self.listen(&item, "click", false, move |rt, ev| {
                let target = click_target.clone();
                rt.dispatch(SiteEvent::NavClick { target }, &ev);
            });
            self.listen(&item, "keydown", false, move |rt, ev| {
                if let Some(key) = key_input(&ev) {
                    let target = target.clone();
                    rt.dispatch(SiteEvent::NavKey { target, key }, &ev);
                }
            });
        }

        self.listen(&drawer, "keydown", false, |rt, ev| {
            if let Some(key) = key_input(&ev) {
                rt.dispatch(SiteEvent::DrawerKey(key), &ev);
            }
        });
        self.listen(&document, "keydown", false, |rt, ev| {
            if let Some(key) = key_input(&ev) {
                rt.dispatch(SiteEvent::DocumentKey(key), &ev);
            }
        });

        let window = self.window.clone();
        self.listen(&window, "popstate", false, |rt, ev| {
            let state_page = ev
                .dyn_ref::<PopStateEvent>()
                .and_then(|pop| js_sys::JSON::stringify(&pop.state()).ok())
                .and_then(|json| json.as_string())
                .and_then(|json| HistoryState::from_json(&json).page);
            let fragment = rt.window.location().hash().unwrap_or_default();
            rt.dispatch(SiteEvent::PopState { state_page, fragment }, &ev);
        });
        self.listen(&window, "resize", false, |rt, ev| {
            let viewport = rt.viewport();
            rt.dispatch(
                SiteEvent::Resize {
                    width: viewport.width,
                    height: viewport.height,
                },
                &ev,
            );
        });

        for kind in InteractionKind::ALL {
            self.listen(&document, kind.dom_event(), true, move |rt, ev| {
                rt.dispatch(SiteEvent::Interaction(kind), &ev);
            });
        }

        let skip_link = document
            .query_selector(markup::SKIP_LINK_SELECTOR)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if let Some(link) = skip_link {
            self.listen(&link, "click", false, |rt, ev| {
                rt.dispatch(SiteEvent::SkipLink, &ev);
            });
        }

        tracing::debug!(listeners = self.listeners.borrow().len(), "listeners installed");
    }

    fn install_error_handlers(self: &Rc<Self>) {
        let window = self.window.clone();
        self.listen(&window, "error", false, |_, ev| {
            if let Some(err) = ev.dyn_ref::<ErrorEvent>() {
                tracing::error!(
                    file = %err.filename(),
                    line = err.lineno(),
                    "uncaught error: {}",
                    err.message()
                );
            }
        });
        self.listen(&window, "unhandledrejection", false, |_, ev| {
            if let Some(rejection) = ev.dyn_ref::<PromiseRejectionEvent>() {
                tracing::error!(reason = ?rejection.reason(), "unhandled promise rejection");
            }
        });
    }

    fn viewport(&self) -> ecosite_core::Viewport {
        self.site
            .try_borrow()
            .map(|site| site.surface().viewport())
            .unwrap_or_default()
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if let Some(handle) = self.armed.take() {
            self.window.clear_timeout_with_handle(handle);
        }
        for listener in self.listeners.get_mut().drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                &listener.name,
                listener.closure.as_ref().unchecked_ref(),
            );
        }
    }
}

fn key_input(event: &Event) -> Option<KeyInput> {
    let key = event.dyn_ref::<KeyboardEvent>()?;
    Some(KeyInput::from_dom(
        &key.key(),
        key.shift_key(),
        key.alt_key(),
        key.ctrl_key(),
        key.meta_key(),
    ))
}

fn prefers_high_contrast(window: &Window) -> bool {
    window
        .match_media(markup::HIGH_CONTRAST_QUERY)
        .ok()
        .flatten()
        .is_some_and(|query| query.matches())
}
