#![forbid(unsafe_code)]

//! `ecosite-core` is the host-independent controller behind the ecosite
//! single-page site: the navigation drawer, page switching, history sync,
//! focus management and screen-reader announcements.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment translates DOM events into
//!   [`SiteEvent`]s and applies effects through a [`Surface`].
//! - **Deterministic time**: the host reports a monotonic clock explicitly;
//!   every deferred step is a [`Wake`] in a timer queue.
//! - **Testable headless**: [`HeadlessSurface`] models the page in memory so
//!   the whole controller runs under `cargo test` on any target.
//!
//! The `ecosite-web` crate binds this controller to the browser DOM.

pub mod analytics;
pub mod config;
pub mod error;
pub mod focus;
pub mod headless;
pub mod input;
pub mod logging;
pub mod page;
pub mod site;
pub mod state;
pub mod surface;
pub mod timer;
pub mod util;

mod drawer;
mod events;
mod navigation;

pub use analytics::{Analytics, InteractionRecord, LogAnalytics, PageView};
pub use config::SiteConfig;
pub use error::SiteError;
pub use focus::{FocusMemory, FocusTrap, focusable_selector};
pub use headless::{HeadlessNode, HeadlessSurface};
pub use input::{Disposition, InteractionKind, Key, KeyInput, Modifiers, SiteEvent};
pub use navigation::PageChange;
pub use page::{PageInfo, PageRegistry};
pub use site::{HostEnv, Site, Wake};
pub use state::{AppState, Phase, StateSnapshot};
pub use surface::{Control, Surface};
pub use util::Viewport;
