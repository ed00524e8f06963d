#![forbid(unsafe_code)]

//! Rendering surface the controller drives.
//!
//! The controller decides *what* is visible and *when*; a [`Surface`]
//! applies it. The web shell implements this over `web-sys`; tests use
//! [`HeadlessSurface`](crate::headless::HeadlessSurface).
//!
//! Methods are infallible: a surface that cannot apply a change logs and
//! carries on, matching how the site treats every runtime failure.

use core::fmt::Debug;

/// Interactive element an interaction is reported against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control<'a> {
    MenuToggle,
    Overlay,
    /// Navigation item by `data-target`.
    NavItem(&'a str),
}

/// Capability interface over the page markup.
pub trait Surface {
    /// Handle to a focusable element.
    type Node: Clone + PartialEq + Debug;

    /// Whether a content section with this id exists.
    fn has_section(&self, page: &str) -> bool;

    /// Ids of every content section, in document order.
    fn section_ids(&self) -> Vec<String>;

    /// `data-target` of every navigation item, in document order.
    fn nav_targets(&self) -> Vec<String>;

    /// Reflect the drawer state: `open`/`active` classes, `aria-expanded`
    /// on the toggle and `aria-hidden` on the drawer.
    fn show_drawer(&mut self, open: bool);

    /// Blur the main content behind the drawer, if the region exists.
    fn set_content_blur(&mut self, blurred: bool);

    /// Disable or restore body scrolling.
    fn lock_body_scroll(&mut self, locked: bool);

    /// Remove the active marker from every content section.
    fn deactivate_sections(&mut self);

    /// Mark one content section active.
    fn activate_section(&mut self, page: &str);

    /// Mark the navigation item for `page` active with tabindex `0`; all
    /// others lose the marker and get tabindex `-1`.
    fn mark_nav_active(&mut self, page: &str);

    /// Replace the hero title and description text.
    fn set_hero(&mut self, title: &str, description: &str);

    /// Push a history entry with state `{ page }` at `#page`.
    fn push_history(&mut self, page: &str);

    /// Smooth-scroll so the content area sits `offset` pixels below the top.
    fn scroll_to_content(&mut self, offset: f64);

    /// Append a visually hidden polite live-region element.
    fn append_announcement(&mut self, id: &str, message: &str);

    /// Remove a previously appended announcement element.
    fn remove_announcement(&mut self, id: &str);

    /// Install the persistent `#live-region` element.
    fn install_live_region(&mut self);

    /// Toggle the high-contrast body class.
    fn set_high_contrast(&mut self, enabled: bool);

    /// Element that currently has focus.
    fn active_element(&self) -> Option<Self::Node>;

    /// Move focus to `node`.
    fn focus(&mut self, node: &Self::Node);

    /// Focusable elements inside the drawer, in document order.
    fn drawer_focusables(&self) -> Vec<Self::Node>;

    /// Navigation item elements, in document order.
    fn nav_items(&self) -> Vec<Self::Node>;

    /// Upper-case tag name of `control`, as the DOM reports it. Empty when
    /// the element is not present.
    fn tag_name(&self, control: Control<'_>) -> String;

    /// Focus the main-content landmark and smooth-scroll it into view.
    fn focus_main_content(&mut self);
}
