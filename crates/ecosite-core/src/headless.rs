#![forbid(unsafe_code)]

//! In-memory [`Surface`] for tests and native builds.
//!
//! Models just enough of the page to observe what the controller did:
//! section and navigation markers, drawer attributes, focus, history with a
//! back/forward cursor, live-region elements and scroll requests.

use crate::input::SiteEvent;
use crate::page::PageRegistry;
use crate::surface::{Control, Surface};

/// Element handle for [`HeadlessSurface`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HeadlessNode {
    MenuToggle,
    NavItem(String),
    MainContent,
    /// Any other element, e.g. a link in the page body or a drawer close button.
    Named(String),
}

#[derive(Debug, Clone)]
struct NavItem {
    target: String,
    active: bool,
    tab_index: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HistoryEntry {
    page: Option<String>,
    fragment: String,
}

/// Headless page model.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    sections: Vec<(String, bool)>,
    nav: Vec<NavItem>,
    drawer_extra: Vec<HeadlessNode>,
    drawer_open: bool,
    toggle_active: bool,
    aria_expanded: &'static str,
    aria_hidden: &'static str,
    has_main_content: bool,
    blurred: bool,
    scroll_locked: bool,
    hero: (String, String),
    history: Vec<HistoryEntry>,
    history_cursor: usize,
    scrolls: Vec<f64>,
    live: Vec<(String, String)>,
    announced: Vec<String>,
    live_region: bool,
    high_contrast: bool,
    focused: Option<HeadlessNode>,
    main_content_focus_count: usize,
}

impl HeadlessSurface {
    /// Markup with the given section ids and navigation targets.
    #[must_use]
    pub fn new<'a>(
        sections: impl IntoIterator<Item = &'a str>,
        nav_targets: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            sections: sections
                .into_iter()
                .map(|id| (id.to_string(), false))
                .collect(),
            nav: nav_targets
                .into_iter()
                .map(|target| NavItem {
                    target: target.to_string(),
                    active: false,
                    tab_index: -1,
                })
                .collect(),
            drawer_extra: Vec::new(),
            drawer_open: false,
            toggle_active: false,
            aria_expanded: "false",
            aria_hidden: "true",
            has_main_content: true,
            blurred: false,
            scroll_locked: false,
            hero: (String::new(), String::new()),
            history: vec![HistoryEntry {
                page: None,
                fragment: String::new(),
            }],
            history_cursor: 0,
            scrolls: Vec::new(),
            live: Vec::new(),
            announced: Vec::new(),
            live_region: false,
            high_contrast: false,
            focused: None,
            main_content_focus_count: 0,
        }
    }

    /// Markup in bijection with `registry`: one section and one nav item per page.
    #[must_use]
    pub fn for_registry(registry: &PageRegistry) -> Self {
        let ids: Vec<&str> = registry.ids().collect();
        Self::new(ids.iter().copied(), ids.iter().copied())
    }

    /// Append an extra focusable element at the end of the drawer.
    #[must_use]
    pub fn with_drawer_focusable(mut self, node: HeadlessNode) -> Self {
        self.drawer_extra.push(node);
        self
    }

    /// Drop the main-content landmark.
    #[must_use]
    pub fn without_main_content(mut self) -> Self {
        self.has_main_content = false;
        self
    }

    /// Set the URL the page was loaded with.
    #[must_use]
    pub fn with_fragment(mut self, fragment: &str) -> Self {
        self.history[0].fragment = fragment.trim_start_matches('#').to_string();
        self
    }

    /// Simulate the user focusing an element.
    pub fn set_focus(&mut self, node: Option<HeadlessNode>) {
        self.focused = node;
    }

    /// Simulate the browser back button.
    ///
    /// Returns the `popstate` event the browser would fire, or `None` at the
    /// start of the session history.
    pub fn go_back(&mut self) -> Option<SiteEvent> {
        if self.history_cursor == 0 {
            return None;
        }
        self.history_cursor -= 1;
        Some(self.pop_state_event())
    }

    /// Simulate the browser forward button.
    pub fn go_forward(&mut self) -> Option<SiteEvent> {
        if self.history_cursor + 1 >= self.history.len() {
            return None;
        }
        self.history_cursor += 1;
        Some(self.pop_state_event())
    }

    fn pop_state_event(&self) -> SiteEvent {
        let entry = &self.history[self.history_cursor];
        SiteEvent::PopState {
            state_page: entry.page.clone(),
            fragment: entry.fragment.clone(),
        }
    }

    /// Fragment of the current history entry, without `#`.
    #[must_use]
    pub fn fragment(&self) -> &str {
        &self.history[self.history_cursor].fragment
    }

    /// Number of entries in the session history.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn active_sections(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|(_, active)| *active)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    #[must_use]
    pub fn active_nav(&self) -> Vec<&str> {
        self.nav
            .iter()
            .filter(|item| item.active)
            .map(|item| item.target.as_str())
            .collect()
    }

    /// Navigation targets reachable with Tab (tabindex `0`).
    #[must_use]
    pub fn tabbable_nav(&self) -> Vec<&str> {
        self.nav
            .iter()
            .filter(|item| item.tab_index == 0)
            .map(|item| item.target.as_str())
            .collect()
    }

    #[must_use]
    pub fn drawer_open(&self) -> bool {
        self.drawer_open
    }

    #[must_use]
    pub fn toggle_active(&self) -> bool {
        self.toggle_active
    }

    /// `(aria-expanded on toggle, aria-hidden on drawer)`.
    #[must_use]
    pub fn aria(&self) -> (&str, &str) {
        (self.aria_expanded, self.aria_hidden)
    }

    #[must_use]
    pub fn blurred(&self) -> bool {
        self.blurred
    }

    #[must_use]
    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    #[must_use]
    pub fn hero(&self) -> (&str, &str) {
        (&self.hero.0, &self.hero.1)
    }

    #[must_use]
    pub fn scrolls(&self) -> &[f64] {
        &self.scrolls
    }

    /// Live-region elements currently in the document, as `(id, message)`.
    #[must_use]
    pub fn live_announcements(&self) -> &[(String, String)] {
        &self.live
    }

    /// Every message ever announced, in order.
    #[must_use]
    pub fn announced(&self) -> &[String] {
        &self.announced
    }

    #[must_use]
    pub fn has_live_region(&self) -> bool {
        self.live_region
    }

    #[must_use]
    pub fn high_contrast(&self) -> bool {
        self.high_contrast
    }

    #[must_use]
    pub fn focused(&self) -> Option<&HeadlessNode> {
        self.focused.as_ref()
    }

    #[must_use]
    pub fn main_content_focus_count(&self) -> usize {
        self.main_content_focus_count
    }
}

impl Surface for HeadlessSurface {
    type Node = HeadlessNode;

    fn has_section(&self, page: &str) -> bool {
        self.sections.iter().any(|(id, _)| id == page)
    }

    fn section_ids(&self) -> Vec<String> {
        self.sections.iter().map(|(id, _)| id.clone()).collect()
    }

    fn nav_targets(&self) -> Vec<String> {
        self.nav.iter().map(|item| item.target.clone()).collect()
    }

    fn show_drawer(&mut self, open: bool) {
        self.drawer_open = open;
        self.toggle_active = open;
        self.aria_expanded = if open { "true" } else { "false" };
        self.aria_hidden = if open { "false" } else { "true" };
    }

    fn set_content_blur(&mut self, blurred: bool) {
        if self.has_main_content {
            self.blurred = blurred;
        }
    }

    fn lock_body_scroll(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn deactivate_sections(&mut self) {
        for (_, active) in &mut self.sections {
            *active = false;
        }
    }

    fn activate_section(&mut self, page: &str) {
        for (id, active) in &mut self.sections {
            if id == page {
                *active = true;
            }
        }
    }

    fn mark_nav_active(&mut self, page: &str) {
        for item in &mut self.nav {
            item.active = item.target == page;
            item.tab_index = if item.active { 0 } else { -1 };
        }
    }

    fn set_hero(&mut self, title: &str, description: &str) {
        self.hero = (title.to_string(), description.to_string());
    }

    fn push_history(&mut self, page: &str) {
        self.history.truncate(self.history_cursor + 1);
        self.history.push(HistoryEntry {
            page: Some(page.to_string()),
            fragment: page.to_string(),
        });
        self.history_cursor = self.history.len() - 1;
    }

    fn scroll_to_content(&mut self, offset: f64) {
        self.scrolls.push(offset);
    }

    fn append_announcement(&mut self, id: &str, message: &str) {
        self.live.push((id.to_string(), message.to_string()));
        self.announced.push(message.to_string());
    }

    fn remove_announcement(&mut self, id: &str) {
        self.live.retain(|(live_id, _)| live_id != id);
    }

    fn install_live_region(&mut self) {
        self.live_region = true;
    }

    fn set_high_contrast(&mut self, enabled: bool) {
        self.high_contrast = enabled;
    }

    fn active_element(&self) -> Option<HeadlessNode> {
        self.focused.clone()
    }

    fn focus(&mut self, node: &HeadlessNode) {
        self.focused = Some(node.clone());
    }

    fn drawer_focusables(&self) -> Vec<HeadlessNode> {
        self.nav_items()
            .into_iter()
            .chain(self.drawer_extra.iter().cloned())
            .collect()
    }

    fn nav_items(&self) -> Vec<HeadlessNode> {
        self.nav
            .iter()
            .map(|item| HeadlessNode::NavItem(item.target.clone()))
            .collect()
    }

    fn tag_name(&self, control: Control<'_>) -> String {
        let tag = match control {
            Control::MenuToggle => "BUTTON",
            Control::Overlay => "DIV",
            Control::NavItem(target) if self.nav.iter().any(|item| item.target == target) => "A",
            Control::NavItem(_) => "",
        };
        tag.to_string()
    }

    fn focus_main_content(&mut self) {
        if self.has_main_content {
            self.focused = Some(HeadlessNode::MainContent);
            self.main_content_focus_count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn history_back_and_forward() {
        let mut s = HeadlessSurface::new(["a", "b"], ["a", "b"]).with_fragment("#a");
        assert_eq!(s.go_back(), None);
        s.push_history("b");
        assert_eq!(s.fragment(), "b");
        assert_eq!(
            s.go_back(),
            Some(SiteEvent::PopState {
                state_page: None,
                fragment: "a".into()
            })
        );
        assert_eq!(
            s.go_forward(),
            Some(SiteEvent::PopState {
                state_page: Some("b".into()),
                fragment: "b".into()
            })
        );
        assert_eq!(s.go_forward(), None);
    }

    #[test]
    fn push_after_back_drops_forward_entries() {
        let mut s = HeadlessSurface::new(["a", "b", "c"], ["a", "b", "c"]);
        s.push_history("b");
        s.push_history("c");
        let _ = s.go_back();
        s.push_history("a");
        assert_eq!(s.history_len(), 3);
        assert_eq!(s.go_forward(), None);
    }

    #[test]
    fn nav_marking_is_exclusive() {
        let mut s = HeadlessSurface::new(["a", "b"], ["a", "b"]);
        s.mark_nav_active("b");
        assert_eq!(s.active_nav(), vec!["b"]);
        assert_eq!(s.tabbable_nav(), vec!["b"]);
    }

    #[test]
    fn blur_needs_main_content() {
        let mut s = HeadlessSurface::new(["a"], ["a"]).without_main_content();
        s.set_content_blur(true);
        assert!(!s.blurred());
    }
}
