#![forbid(unsafe_code)]

//! Site configuration.
//!
//! All durations are whole milliseconds so the same struct can be filled from
//! a plain JS options object. Every field has a default; hosts only pass the
//! values they want to change.

use core::time::Duration;

use serde::Deserialize;

use crate::error::SiteError;

/// Read-only settings fixed at startup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Full length of a drawer or page transition (ms).
    pub animation_ms: u64,
    /// Quiet period before a resize burst is acted on (ms).
    pub debounce_ms: u64,
    /// Inactivity period after which an open drawer closes (ms).
    ///
    /// Only consulted when `idle_auto_close` is set.
    pub auto_close_delay_ms: u64,
    /// Close the drawer after `auto_close_delay_ms` without interaction.
    pub idle_auto_close: bool,
    /// Confine Tab navigation to the drawer while it is open.
    pub focus_trap: bool,
    /// Arrow/Home/End roving focus among navigation items.
    pub keyboard_navigation: bool,
    /// Viewport widths above this close the drawer on resize (px).
    pub desktop_breakpoint_px: u32,
    /// Delay before a page change closes an open drawer (ms).
    pub drawer_autoclose_ms: u64,
    /// Lifetime of a transient live-region announcement (ms).
    pub announcement_ttl_ms: u64,
    /// Delay of the "site ready" announcement after startup (ms).
    pub ready_announcement_ms: u64,
    /// Distance kept above the content area when scrolling to it (px).
    pub scroll_offset_px: f64,
    /// Page shown when the URL fragment is empty or unknown.
    pub default_page: String,
    /// Script path of the offline worker, registered when present.
    pub service_worker: Option<String>,
    /// `tracing` filter directive for the log layer.
    pub log_filter: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            animation_ms: 300,
            debounce_ms: 150,
            auto_close_delay_ms: 5000,
            idle_auto_close: false,
            focus_trap: true,
            keyboard_navigation: true,
            desktop_breakpoint_px: 768,
            drawer_autoclose_ms: 200,
            announcement_ttl_ms: 1000,
            ready_announcement_ms: 1000,
            scroll_offset_px: 100.0,
            default_page: "energia".to_string(),
            service_worker: None,
            log_filter: "info".to_string(),
        }
    }
}

impl SiteConfig {
    /// Parse host options, filling unspecified fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, SiteError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the controller cannot run with.
    pub fn validate(&self) -> Result<(), SiteError> {
        if self.animation_ms == 0 {
            return Err(SiteError::InvalidConfig(
                "animation_ms must be greater than zero".into(),
            ));
        }
        if self.default_page.trim().is_empty() {
            return Err(SiteError::InvalidConfig("default_page is empty".into()));
        }
        if !self.scroll_offset_px.is_finite() {
            return Err(SiteError::InvalidConfig(
                "scroll_offset_px must be finite".into(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub const fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }

    /// Point inside a page transition where the content is swapped.
    #[must_use]
    pub const fn half_animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms / 2)
    }

    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub const fn auto_close_delay(&self) -> Duration {
        Duration::from_millis(self.auto_close_delay_ms)
    }

    #[must_use]
    pub const fn drawer_autoclose(&self) -> Duration {
        Duration::from_millis(self.drawer_autoclose_ms)
    }

    #[must_use]
    pub const fn announcement_ttl(&self) -> Duration {
        Duration::from_millis(self.announcement_ttl_ms)
    }

    #[must_use]
    pub const fn ready_announcement(&self) -> Duration {
        Duration::from_millis(self.ready_announcement_ms)
    }
}
