#![forbid(unsafe_code)]

//! Page switching and URL fragment handling.

use crate::analytics::Analytics;
use crate::site::{Site, Wake};
use crate::state::Phase;
use crate::surface::Surface;

/// Outcome of a page change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageChange {
    /// The transition started.
    Started,
    /// Dropped because another transition is running.
    Busy,
    /// The target is already the current page.
    AlreadyCurrent,
    /// The target is missing from the markup or the registry.
    NotFound,
}

impl PageChange {
    #[must_use]
    pub const fn started(self) -> bool {
        matches!(self, Self::Started)
    }
}

impl<S: Surface, A: Analytics> Site<S, A> {
    /// Switch the visible content section to `target`.
    ///
    /// The old section is hidden and the navigation marker moves at once;
    /// the hero text, the new section and (optionally) a history entry
    /// follow half an animation later. An open drawer is closed shortly
    /// after the transition starts.
    pub fn change_page(&mut self, target: &str, push_history: bool) -> PageChange {
        if self.state.is_animating() {
            tracing::debug!(page = %target, "page change dropped: transition running");
            return PageChange::Busy;
        }
        if target == self.state.current_page() {
            return PageChange::AlreadyCurrent;
        }
        if !self.surface.has_section(target) || !self.registry.contains(target) {
            tracing::warn!(page = %target, "page not found");
            return PageChange::NotFound;
        }

        self.state.begin(Phase::PageOut {
            target: target.to_string(),
            push_history,
        });
        self.surface.deactivate_sections();
        self.surface.mark_nav_active(target);
        self.schedule(self.config.half_animation(), Wake::SwapPage);

        if self.state.is_drawer_open() {
            self.schedule(self.config.drawer_autoclose(), Wake::AutoCloseDrawer);
        }
        tracing::debug!(from = self.state.current_page(), to = %target, "page change started");
        PageChange::Started
    }

    /// Second half of a page change: show the new content.
    pub(crate) fn swap_page(&mut self) {
        let Phase::PageOut {
            target,
            push_history,
        } = self.state.phase().clone()
        else {
            tracing::warn!(phase = self.state.phase().name(), "page swap outside a page transition");
            return;
        };
        let Some(info) = self.registry.get(&target).cloned() else {
            self.state.settle();
            return;
        };

        self.surface.set_hero(&info.title, &info.description);
        self.surface.activate_section(&target);
        self.state.set_current_page(&target);
        if push_history {
            self.surface.push_history(&target);
        }
        self.announce(&format!("Página alterada para {}", info.title));
        self.surface.scroll_to_content(self.config.scroll_offset_px);
        self.report_page_view();

        self.state.advance(Phase::PageIn { target });
        self.schedule(self.config.animation(), Wake::Settle);
    }

    /// Page id named by a URL fragment, or the default page when the
    /// fragment is empty or unknown.
    #[must_use]
    pub fn resolve_fragment<'a>(&'a self, fragment: &'a str) -> &'a str {
        let id = fragment.strip_prefix('#').unwrap_or(fragment);
        if id.is_empty() || !self.registry.contains(id) {
            self.config.default_page.as_str()
        } else {
            id
        }
    }

    /// Show the page named by `fragment` without adding a history entry.
    pub fn load_from_fragment(&mut self, fragment: &str) -> PageChange {
        let page = self.resolve_fragment(fragment).to_string();
        self.change_page(&page, false)
    }
}
