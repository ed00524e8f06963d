#![forbid(unsafe_code)]

//! Focus management: tab trapping, focus restoration and roving navigation.
//!
//! These types are generic over the host's element handle `N`, so the same
//! logic runs against real DOM elements and headless test nodes.

use crate::input::Key;

/// Selectors that match keyboard-focusable elements.
pub const FOCUSABLE_SELECTORS: [&str; 6] = [
    "button",
    "[href]",
    "input",
    "select",
    "textarea",
    "[tabindex]:not([tabindex=\"-1\"])",
];

/// [`FOCUSABLE_SELECTORS`] joined into one `querySelectorAll` argument.
#[must_use]
pub fn focusable_selector() -> String {
    FOCUSABLE_SELECTORS.join(",")
}

/// Cyclic Tab trap over a container's focusable elements.
///
/// The trap is active while it exists; dropping it is the disposer.
#[derive(Debug, Clone)]
pub struct FocusTrap<N> {
    focusables: Vec<N>,
}

impl<N: PartialEq> FocusTrap<N> {
    /// Capture the container's focusables in document order.
    #[must_use]
    pub fn install(focusables: Vec<N>) -> Self {
        Self { focusables }
    }

    /// Element to focus when the trap is installed.
    #[must_use]
    pub fn first(&self) -> Option<&N> {
        self.focusables.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&N> {
        self.focusables.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.focusables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.focusables.is_empty()
    }

    /// Wrap target for a Tab press, or `None` to let focus move normally.
    ///
    /// `backward` is Shift+Tab. Only the boundary elements wrap.
    #[must_use]
    pub fn on_tab(&self, active: Option<&N>, backward: bool) -> Option<&N> {
        let active = active?;
        if backward {
            if self.first() == Some(active) {
                return self.last();
            }
        } else if self.last() == Some(active) {
            return self.first();
        }
        None
    }
}

/// Element that held focus before the drawer opened.
#[derive(Debug, Clone)]
pub struct FocusMemory<N> {
    saved: Option<N>,
}

impl<N> Default for FocusMemory<N> {
    fn default() -> Self {
        Self { saved: None }
    }
}

impl<N> FocusMemory<N> {
    pub fn remember(&mut self, node: Option<N>) {
        self.saved = node;
    }

    /// Hand back the remembered element once; later calls return `None`.
    pub fn take(&mut self) -> Option<N> {
        self.saved.take()
    }
}

/// Next index for roving arrow navigation over `len` items.
///
/// Down/Up wrap around, Home/End jump to the ends. Other keys do not move.
#[must_use]
pub fn roving_target(current: usize, len: usize, key: &Key) -> Option<usize> {
    if len == 0 || current >= len {
        return None;
    }
    match key {
        Key::ArrowDown => Some((current + 1) % len),
        Key::ArrowUp => Some(if current == 0 { len - 1 } else { current - 1 }),
        Key::Home => Some(0),
        Key::End => Some(len - 1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn selector_matches_focusable_set() {
        assert_eq!(
            focusable_selector(),
            "button,[href],input,select,textarea,[tabindex]:not([tabindex=\"-1\"])"
        );
    }

    #[test]
    fn trap_wraps_only_at_boundaries() {
        let trap = FocusTrap::install(vec![1, 2, 3]);
        assert_eq!(trap.first(), Some(&1));
        assert_eq!(trap.on_tab(Some(&3), false), Some(&1));
        assert_eq!(trap.on_tab(Some(&1), true), Some(&3));
        assert_eq!(trap.on_tab(Some(&2), false), None);
        assert_eq!(trap.on_tab(Some(&2), true), None);
        assert_eq!(trap.on_tab(None, false), None);
    }

    #[test]
    fn empty_trap_never_wraps() {
        let trap: FocusTrap<u8> = FocusTrap::install(Vec::new());
        assert!(trap.is_empty());
        assert_eq!(trap.first(), None);
        assert_eq!(trap.on_tab(Some(&0), false), None);
    }

    #[test]
    fn single_element_wraps_onto_itself() {
        let trap = FocusTrap::install(vec!["only"]);
        assert_eq!(trap.on_tab(Some(&"only"), false), Some(&"only"));
        assert_eq!(trap.on_tab(Some(&"only"), true), Some(&"only"));
    }

    #[test]
    fn memory_restores_once() {
        let mut memory = FocusMemory::default();
        memory.remember(Some("toggle"));
        assert_eq!(memory.take(), Some("toggle"));
        assert_eq!(memory.take(), None);
    }

    #[test]
    fn roving_home_end() {
        assert_eq!(roving_target(3, 8, &Key::Home), Some(0));
        assert_eq!(roving_target(3, 8, &Key::End), Some(7));
        assert_eq!(roving_target(0, 8, &Key::ArrowUp), Some(7));
        assert_eq!(roving_target(7, 8, &Key::ArrowDown), Some(0));
        assert_eq!(roving_target(3, 8, &Key::Enter), None);
        assert_eq!(roving_target(0, 0, &Key::Home), None);
    }

    proptest! {
        #[test]
        fn tab_forward_from_last_wraps_to_first(n in 1usize..32) {
            let trap = FocusTrap::install((0..n).collect::<Vec<_>>());
            prop_assert_eq!(trap.on_tab(Some(&(n - 1)), false), Some(&0));
            prop_assert_eq!(trap.on_tab(Some(&0), true), Some(&(n - 1)));
        }

        #[test]
        fn down_then_up_returns_home(len in 1usize..64, start in 0usize..64) {
            let start = start % len;
            let down = roving_target(start, len, &Key::ArrowDown).unwrap();
            prop_assert!(down < len);
            prop_assert_eq!(roving_target(down, len, &Key::ArrowUp), Some(start));
        }
    }
}
