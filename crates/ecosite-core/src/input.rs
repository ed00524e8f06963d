#![forbid(unsafe_code)]

//! Normalized input events delivered by the host.
//!
//! The web shell translates DOM events into [`SiteEvent`] values; tests build
//! them directly. Keys are normalized from the DOM `KeyboardEvent.key` string.

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const META  = 0b1000;
    }
}

/// Keys the controller reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Tab,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    Other(Box<str>),
}

impl Key {
    /// Normalize a DOM `key` value.
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "Home" => Self::Home,
            "End" => Self::End,
            other => Self::Other(other.into()),
        }
    }

    /// Enter and Space activate buttons and links.
    #[must_use]
    pub const fn is_activation(&self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// A key press with its modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub key: Key,
    pub mods: Modifiers,
}

impl KeyInput {
    #[must_use]
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            mods: Modifiers::empty(),
        }
    }

    #[must_use]
    pub const fn with_mods(key: Key, mods: Modifiers) -> Self {
        Self { key, mods }
    }

    /// Build from DOM `key` plus modifier flags.
    #[must_use]
    pub fn from_dom(key: &str, shift: bool, alt: bool, ctrl: bool, meta: bool) -> Self {
        let mut mods = Modifiers::empty();
        mods.set(Modifiers::SHIFT, shift);
        mods.set(Modifiers::ALT, alt);
        mods.set(Modifiers::CTRL, ctrl);
        mods.set(Modifiers::META, meta);
        Self {
            key: Key::from_dom(key),
            mods,
        }
    }

    #[must_use]
    pub const fn shift(&self) -> bool {
        self.mods.contains(Modifiers::SHIFT)
    }
}

/// Passive activity signals used for the last-interaction timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    MouseDown,
    MouseMove,
    KeyPress,
    Scroll,
    TouchStart,
}

impl InteractionKind {
    /// DOM event names, in listener registration order.
    pub const ALL: [Self; 5] = [
        Self::MouseDown,
        Self::MouseMove,
        Self::KeyPress,
        Self::Scroll,
        Self::TouchStart,
    ];

    #[must_use]
    pub const fn dom_event(self) -> &'static str {
        match self {
            Self::MouseDown => "mousedown",
            Self::MouseMove => "mousemove",
            Self::KeyPress => "keypress",
            Self::Scroll => "scroll",
            Self::TouchStart => "touchstart",
        }
    }
}

/// Everything the controller can be asked to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteEvent {
    /// Click on the menu toggle.
    ToggleClick,
    /// Key press on the menu toggle.
    ToggleKey(KeyInput),
    /// Click on the drawer overlay.
    OverlayClick,
    /// Click on a navigation item.
    NavClick { target: String },
    /// Key press on a navigation item.
    NavKey { target: String, key: KeyInput },
    /// Key press anywhere inside the drawer.
    DrawerKey(KeyInput),
    /// Key press reaching the document.
    DocumentKey(KeyInput),
    /// Browser back/forward.
    PopState {
        /// `page` recorded in the history entry's state, if any.
        state_page: Option<String>,
        /// Current `location.hash`, with or without the leading `#`.
        fragment: String,
    },
    /// Window resize.
    Resize { width: u32, height: u32 },
    /// Passive pointer/keyboard/scroll/touch activity.
    Interaction(InteractionKind),
    /// Activation of the skip-to-content link.
    SkipLink,
}

/// What the host should do with the originating DOM event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Call `preventDefault()`.
    Consumed,
    /// Let the browser's default action run.
    Propagate,
}

impl Disposition {
    #[must_use]
    pub const fn prevent_default(self) -> bool {
        matches!(self, Self::Consumed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_keys_normalize() {
        assert_eq!(Key::from_dom(" "), Key::Space);
        assert_eq!(Key::from_dom("Esc"), Key::Escape);
        assert_eq!(Key::from_dom("ArrowDown"), Key::ArrowDown);
        assert_eq!(Key::from_dom("a"), Key::Other("a".into()));
        assert!(Key::Enter.is_activation());
        assert!(!Key::Tab.is_activation());
    }

    #[test]
    fn modifiers_from_dom_flags() {
        let k = KeyInput::from_dom("Tab", true, false, true, false);
        assert!(k.shift());
        assert_eq!(k.mods, Modifiers::SHIFT | Modifiers::CTRL);
    }

    #[test]
    fn interaction_event_names() {
        let names: Vec<&str> = InteractionKind::ALL.iter().map(|k| k.dom_event()).collect();
        assert_eq!(names, ["mousedown", "mousemove", "keypress", "scroll", "touchstart"]);
    }
}
