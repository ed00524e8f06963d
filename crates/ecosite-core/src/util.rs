#![forbid(unsafe_code)]

//! Small helpers shared by the controller and the web shell.

use core::time::Duration;

/// Trailing-edge debouncer driven by explicit timestamps.
///
/// Each [`trigger`](Self::trigger) supersedes the previous one; only the
/// ticket from the latest trigger settles. Pair it with a timer that fires at
/// [`DebounceTicket::deadline`] and calls [`settle`](Self::settle).
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    generation: u64,
    pending: bool,
}

/// Handle for one debounce trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket {
    pub generation: u64,
    pub deadline: Duration,
}

impl Debounce {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: false,
        }
    }

    /// Restart the quiet period at `now`.
    pub fn trigger(&mut self, now: Duration) -> DebounceTicket {
        self.generation = self.generation.wrapping_add(1);
        self.pending = true;
        DebounceTicket {
            generation: self.generation,
            deadline: now.saturating_add(self.delay),
        }
    }

    /// Returns `true` exactly once, for the ticket of the latest trigger.
    pub fn settle(&mut self, generation: u64) -> bool {
        if self.pending && generation == self.generation {
            self.pending = false;
            true
        } else {
            false
        }
    }
}

/// Viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl core::fmt::Display for Viewport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Bounding box of an element relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Rect {
    /// Whether the box lies entirely inside the viewport.
    #[must_use]
    pub fn is_visible_in(&self, viewport: Viewport) -> bool {
        self.top >= 0.0
            && self.left >= 0.0
            && self.bottom <= f64::from(viewport.height)
            && self.right <= f64::from(viewport.width)
    }
}

/// Document scroll position that shows an element `offset` pixels below the top.
#[must_use]
pub fn scroll_target(offset_top: f64, offset: f64) -> f64 {
    (offset_top - offset).max(0.0)
}

/// Lowercase `s` and drop everything outside `[a-z0-9]`.
#[must_use]
pub fn sanitize_for_url(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 9;

/// Generator for `id_xxxxxxxxx` element ids.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    rng: fastrand::Rng,
}

impl IdGenerator {
    /// Seeded generator; equal seeds yield equal sequences.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Next id: `id_` followed by nine base-36 characters.
    pub fn next_id(&mut self) -> String {
        let mut id = String::with_capacity(3 + ID_LEN);
        id.push_str("id_");
        for _ in 0..ID_LEN {
            let idx = self.rng.usize(..ID_ALPHABET.len());
            id.push(char::from(ID_ALPHABET[idx]));
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn debounce_only_latest_ticket_settles() {
        let mut d = Debounce::new(ms(150));
        let first = d.trigger(ms(0));
        let second = d.trigger(ms(100));
        assert_eq!(second.deadline, ms(250));
        assert!(!d.settle(first.generation));
        assert!(d.settle(second.generation));
        assert!(!d.settle(second.generation), "settles once");
        assert!(!d.settle(first.generation));
    }

    #[test]
    fn rect_visibility() {
        let vp = Viewport::new(800, 600);
        let inside = Rect {
            top: 10.0,
            left: 0.0,
            bottom: 600.0,
            right: 800.0,
        };
        assert!(inside.is_visible_in(vp));
        let above = Rect { top: -1.0, ..inside };
        assert!(!above.is_visible_in(vp));
        let wide = Rect {
            right: 801.0,
            ..inside
        };
        assert!(!wide.is_visible_in(vp));
    }

    #[test]
    fn scroll_target_applies_offset() {
        assert_eq!(scroll_target(540.0, 100.0), 440.0);
        assert_eq!(scroll_target(40.0, 100.0), 0.0);
    }

    #[test]
    fn sanitize_strips_non_alnum() {
        assert_eq!(sanitize_for_url("Gestão da Água 2"), "gestodagua2");
        assert_eq!(sanitize_for_url("energia"), "energia");
    }

    #[test]
    fn viewport_displays_as_dimensions() {
        assert_eq!(Viewport::new(1024, 768).to_string(), "1024x768");
    }

    #[test]
    fn seeded_ids_are_reproducible() {
        let mut a = IdGenerator::with_seed(7);
        let mut b = IdGenerator::with_seed(7);
        assert_eq!(a.next_id(), b.next_id());
    }

    proptest! {
        #[test]
        fn ids_have_fixed_shape(seed in any::<u64>()) {
            let mut ids = IdGenerator::with_seed(seed);
            let id = ids.next_id();
            prop_assert!(id.starts_with("id_"));
            prop_assert_eq!(id.len(), 12);
            prop_assert!(id[3..].bytes().all(|b| ID_ALPHABET.contains(&b)));
        }

        #[test]
        fn sanitized_output_is_fixed_point(s in ".{0,40}") {
            let once = sanitize_for_url(&s);
            prop_assert_eq!(sanitize_for_url(&once), once.clone());
            prop_assert!(once.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
        }
    }
}
