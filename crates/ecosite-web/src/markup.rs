#![forbid(unsafe_code)]

//! Names the page markup must provide, and the history state format.
//!
//! Kept free of `web-sys` so it builds and tests on every target.

use ecosite_core::SiteError;
use serde::{Deserialize, Serialize};

pub const MENU_TOGGLE: &str = "menuToggle";
pub const NAVIGATION_DRAWER: &str = "navigationDrawer";
pub const DRAWER_OVERLAY: &str = "drawerOverlay";
pub const PAGE_TITLE: &str = "pageTitle";
pub const PAGE_DESCRIPTION: &str = "pageDescription";
pub const CONTENT_AREA: &str = "contentArea";
pub const MAIN_CONTENT: &str = "main-content";
pub const LIVE_REGION: &str = "live-region";

/// Elements without which nothing is wired.
pub const REQUIRED_IDS: [&str; 5] = [
    MENU_TOGGLE,
    NAVIGATION_DRAWER,
    DRAWER_OVERLAY,
    PAGE_TITLE,
    PAGE_DESCRIPTION,
];

pub const NAV_ITEM_SELECTOR: &str = ".nav-item";
pub const CONTENT_PAGE_SELECTOR: &str = ".content-page";
pub const SKIP_LINK_SELECTOR: &str = ".skip-link";
pub const NAV_TARGET_ATTR: &str = "data-target";

pub const CLASS_OPEN: &str = "open";
pub const CLASS_ACTIVE: &str = "active";
pub const CLASS_CONTENT_PAGE: &str = "content-page";
pub const CLASS_BLUR: &str = "blur-background";
pub const CLASS_HIGH_CONTRAST: &str = "high-contrast";
pub const CLASS_SR_ONLY: &str = "sr-only";

pub const HIGH_CONTRAST_QUERY: &str = "(prefers-contrast: high)";

/// First required id for which `present` is false.
pub fn check_required(present: impl Fn(&str) -> bool) -> Result<(), SiteError> {
    match REQUIRED_IDS.iter().copied().find(|id| !present(*id)) {
        Some(id) => Err(SiteError::MissingElement(id)),
        None => Ok(()),
    }
}

/// `history.state` stored with each pushed entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    #[serde(default)]
    pub page: Option<String>,
}

impl HistoryState {
    #[must_use]
    pub fn for_page(page: &str) -> Self {
        Self {
            page: Some(page.to_string()),
        }
    }

    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Parse a serialized state; anything unrecognized yields no page.
    #[must_use]
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_default()
    }
}

/// URL fragment for a page id.
#[must_use]
pub fn fragment_for(page: &str) -> String {
    format!("#{page}")
}
