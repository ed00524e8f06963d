#![forbid(unsafe_code)]

//! Application state and the transition state machine.
//!
//! ```text
//!            open/close request          Settle
//!   Idle ─────────────────────────▶ Drawer ───────▶ Idle
//!     │
//!     │ change_page            SwapPage            Settle
//!     └─────────────▶ PageOut ──────────▶ PageIn ───────▶ Idle
//! ```
//!
//! Any phase other than [`Phase::Idle`] is "animating": new drawer and page
//! requests are dropped until the phase returns to idle.

use core::time::Duration;

use serde::Serialize;

use crate::focus::{FocusMemory, FocusTrap};
use crate::util::Viewport;

/// Where the controller is in a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// The drawer is sliding open or closed.
    Drawer { opening: bool },
    /// Outgoing section fading; content not swapped yet.
    PageOut { target: String, push_history: bool },
    /// Incoming section fading in.
    PageIn { target: String },
}

impl Phase {
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Drawer { .. } => "drawer",
            Self::PageOut { .. } => "page_out",
            Self::PageIn { .. } => "page_in",
        }
    }
}

/// Mutable state owned by the controller.
#[derive(Debug)]
pub struct AppState<N> {
    current_page: String,
    drawer_open: bool,
    phase: Phase,
    focus_memory: FocusMemory<N>,
    focus_trap: Option<FocusTrap<N>>,
    last_interaction: Duration,
    viewport: Viewport,
}

impl<N: PartialEq> AppState<N> {
    #[must_use]
    pub fn new(current_page: &str, now: Duration, viewport: Viewport) -> Self {
        Self {
            current_page: current_page.to_string(),
            drawer_open: false,
            phase: Phase::Idle,
            focus_memory: FocusMemory::default(),
            focus_trap: None,
            last_interaction: now,
            viewport,
        }
    }

    #[must_use]
    pub fn current_page(&self) -> &str {
        &self.current_page
    }

    pub(crate) fn set_current_page(&mut self, page: &str) {
        page.clone_into(&mut self.current_page);
    }

    #[must_use]
    pub const fn is_drawer_open(&self) -> bool {
        self.drawer_open
    }

    pub(crate) fn set_drawer_open(&mut self, open: bool) {
        self.drawer_open = open;
    }

    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Whether a transition is running.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        !self.phase.is_idle()
    }

    /// Enter `phase` if idle. Returns `false` (and changes nothing) otherwise.
    pub(crate) fn begin(&mut self, phase: Phase) -> bool {
        if self.is_animating() {
            return false;
        }
        self.phase = phase;
        true
    }

    /// Replace the phase of a running transition.
    pub(crate) fn advance(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn settle(&mut self) {
        self.phase = Phase::Idle;
    }

    pub(crate) fn focus_memory_mut(&mut self) -> &mut FocusMemory<N> {
        &mut self.focus_memory
    }

    #[must_use]
    pub fn focus_trap(&self) -> Option<&FocusTrap<N>> {
        self.focus_trap.as_ref()
    }

    pub(crate) fn set_focus_trap(&mut self, trap: Option<FocusTrap<N>>) {
        self.focus_trap = trap;
    }

    #[must_use]
    pub const fn last_interaction(&self) -> Duration {
        self.last_interaction
    }

    pub(crate) fn touch(&mut self, now: Duration) {
        self.last_interaction = now;
    }

    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub(crate) fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            current_page: self.current_page.clone(),
            drawer_open: self.drawer_open,
            animating: self.is_animating(),
            phase: self.phase.name(),
            focus_trapped: self.focus_trap.is_some(),
            last_interaction_ms: u64::try_from(self.last_interaction.as_millis())
                .unwrap_or(u64::MAX),
            viewport: self.viewport.to_string(),
        }
    }
}

/// Serializable view of [`AppState`] for debugging hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    pub current_page: String,
    pub drawer_open: bool,
    pub animating: bool,
    pub phase: &'static str,
    pub focus_trapped: bool,
    pub last_interaction_ms: u64,
    pub viewport: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_is_gated_by_phase() {
        let mut state: AppState<u8> = AppState::new("energia", Duration::ZERO, Viewport::default());
        assert!(state.begin(Phase::Drawer { opening: true }));
        assert!(state.is_animating());
        assert!(!state.begin(Phase::PageOut {
            target: "agua".into(),
            push_history: true
        }));
        assert_eq!(state.phase(), &Phase::Drawer { opening: true });
        state.settle();
        assert!(!state.is_animating());
    }

    #[test]
    fn snapshot_reports_phase_name() {
        let mut state: AppState<u8> = AppState::new("agua", Duration::from_millis(42), Viewport::new(800, 600));
        state.advance(Phase::PageIn {
            target: "agua".into(),
        });
        let snap = state.snapshot();
        assert_eq!(snap.phase, "page_in");
        assert!(snap.animating);
        assert_eq!(snap.last_interaction_ms, 42);
        assert_eq!(snap.viewport, "800x600");
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains(r#""current_page":"agua""#));
    }
}
