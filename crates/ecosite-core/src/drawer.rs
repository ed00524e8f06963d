#![forbid(unsafe_code)]

//! Navigation drawer: open, close, toggle and idle auto-close.

use crate::analytics::Analytics;
use crate::focus::FocusTrap;
use crate::site::{Site, Wake};
use crate::state::Phase;
use crate::surface::Surface;

const MENU_OPENED: &str = "Menu aberto";
const MENU_CLOSED: &str = "Menu fechado";

impl<S: Surface, A: Analytics> Site<S, A> {
    /// Open the drawer. Dropped (returns `false`) while a transition runs.
    pub fn open_drawer(&mut self) -> bool {
        if !self.state.begin(Phase::Drawer { opening: true }) {
            tracing::debug!("drawer open dropped: transition running");
            return false;
        }

        self.state.set_drawer_open(true);
        let previous = self.surface.active_element();
        self.state.focus_memory_mut().remember(previous);

        self.surface.show_drawer(true);
        self.surface.set_content_blur(true);
        self.surface.lock_body_scroll(true);

        if self.config.focus_trap {
            self.install_focus_trap();
        }

        self.announce(MENU_OPENED);
        self.schedule(self.config.animation(), Wake::Settle);
        if self.config.idle_auto_close {
            self.idle_chain = self.idle_chain.wrapping_add(1);
            self.schedule(self.config.auto_close_delay(), Wake::IdleCheck(self.idle_chain));
        }
        tracing::debug!("drawer opened");
        true
    }

    /// Close the drawer. Dropped (returns `false`) while a transition runs.
    pub fn close_drawer(&mut self) -> bool {
        if !self.state.begin(Phase::Drawer { opening: false }) {
            tracing::debug!("drawer close dropped: transition running");
            return false;
        }
        self.apply_close();
        self.schedule(self.config.animation(), Wake::Settle);
        true
    }

    /// Open when closed, close when open.
    pub fn toggle_drawer(&mut self) -> bool {
        if self.state.is_drawer_open() {
            self.close_drawer()
        } else {
            self.open_drawer()
        }
    }

    /// Close effects without touching the transition phase.
    pub(crate) fn apply_close(&mut self) {
        self.state.set_drawer_open(false);

        self.surface.show_drawer(false);
        self.surface.set_content_blur(false);
        self.surface.lock_body_scroll(false);

        self.state.set_focus_trap(None);
        if let Some(previous) = self.state.focus_memory_mut().take() {
            self.surface.focus(&previous);
        }

        self.announce(MENU_CLOSED);
        tracing::debug!("drawer closed");
    }

    fn install_focus_trap(&mut self) {
        let trap = FocusTrap::install(self.surface.drawer_focusables());
        if let Some(first) = trap.first().cloned() {
            self.surface.focus(&first);
        }
        self.state.set_focus_trap(Some(trap));
    }

    pub(crate) fn idle_check(&mut self, chain: u64) {
        if chain != self.idle_chain || !self.state.is_drawer_open() {
            return;
        }
        let delay = self.config.auto_close_delay();
        let idle_for = self.now().saturating_sub(self.state.last_interaction());
        if idle_for < delay {
            self.schedule(delay - idle_for, Wake::IdleCheck(chain));
            return;
        }
        if self.close_drawer() {
            tracing::debug!(idle_ms = idle_for.as_millis() as u64, "drawer closed after inactivity");
        } else {
            self.schedule(self.config.animation(), Wake::IdleCheck(chain));
        }
    }
}
