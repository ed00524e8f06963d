#![forbid(unsafe_code)]

//! Event dispatch: maps host events onto drawer and page operations.

use crate::analytics::Analytics;
use crate::focus::roving_target;
use crate::input::{Disposition, Key, KeyInput, SiteEvent};
use crate::site::{Site, Wake};
use crate::surface::{Control, Surface};
use crate::util::Viewport;

impl<S: Surface, A: Analytics> Site<S, A> {
    /// React to one host event at the current time.
    ///
    /// Hosts should call [`advance_to`](Site::advance_to) first so pending
    /// continuations fire before the event is seen.
    pub fn handle(&mut self, event: SiteEvent) -> Disposition {
        match event {
            SiteEvent::ToggleClick => {
                self.report_interaction("menu_toggle", Control::MenuToggle);
                self.toggle_drawer();
                Disposition::Propagate
            }
            SiteEvent::ToggleKey(key) if key.key.is_activation() => {
                self.report_interaction("menu_toggle", Control::MenuToggle);
                self.toggle_drawer();
                Disposition::Consumed
            }
            SiteEvent::OverlayClick => {
                self.report_interaction("overlay_close", Control::Overlay);
                self.close_drawer();
                Disposition::Propagate
            }
            // Page changes replace the link's own navigation.
            SiteEvent::NavClick { target } => {
                self.report_interaction("nav_select", Control::NavItem(&target));
                self.change_page(&target, true);
                Disposition::Consumed
            }
            SiteEvent::NavKey { target, key } if key.key.is_activation() => {
                self.report_interaction("nav_select", Control::NavItem(&target));
                self.change_page(&target, true);
                Disposition::Consumed
            }
            SiteEvent::DrawerKey(key) => self.on_drawer_key(&key),
            SiteEvent::DocumentKey(key) => {
                if key.key == Key::Escape && self.state.is_drawer_open() {
                    self.close_drawer();
                }
                Disposition::Propagate
            }
            SiteEvent::PopState {
                state_page,
                fragment,
            } => {
                self.on_pop_state(state_page.as_deref(), &fragment);
                Disposition::Propagate
            }
            SiteEvent::Resize { width, height } => {
                self.state.set_viewport(Viewport::new(width, height));
                let ticket = self.resize.trigger(self.now());
                self.schedule_at(ticket.deadline, Wake::ResizeSettled(ticket.generation));
                Disposition::Propagate
            }
            SiteEvent::Interaction(_) => {
                self.state.touch(self.now());
                Disposition::Propagate
            }
            SiteEvent::SkipLink => {
                self.surface.focus_main_content();
                Disposition::Consumed
            }
            SiteEvent::ToggleKey(_) | SiteEvent::NavKey { .. } => Disposition::Propagate,
        }
    }

    /// Tab trapping first, then roving arrow navigation among nav items.
    fn on_drawer_key(&mut self, key: &KeyInput) -> Disposition {
        if key.key == Key::Tab {
            let Some(trap) = self.state.focus_trap() else {
                return Disposition::Propagate;
            };
            let active = self.surface.active_element();
            return match trap.on_tab(active.as_ref(), key.shift()).cloned() {
                Some(next) => {
                    self.surface.focus(&next);
                    Disposition::Consumed
                }
                None => Disposition::Propagate,
            };
        }

        if !self.config.keyboard_navigation {
            return Disposition::Propagate;
        }
        let items = self.surface.nav_items();
        let Some(active) = self.surface.active_element() else {
            return Disposition::Propagate;
        };
        let Some(current) = items.iter().position(|item| *item == active) else {
            return Disposition::Propagate;
        };
        match roving_target(current, items.len(), &key.key) {
            Some(next) => {
                self.surface.focus(&items[next]);
                Disposition::Consumed
            }
            None => Disposition::Propagate,
        }
    }

    fn on_pop_state(&mut self, state_page: Option<&str>, fragment: &str) {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let page = state_page
            .filter(|p| !p.is_empty())
            .or(Some(fragment).filter(|f| !f.is_empty()))
            .unwrap_or(&self.config.default_page)
            .to_string();
        if self.registry.contains(&page) {
            self.change_page(&page, false);
        } else {
            tracing::debug!(page = %page, "popstate for unregistered page ignored");
        }
    }

    pub(crate) fn resize_settled(&mut self, generation: u64) {
        if !self.resize.settle(generation) {
            return;
        }
        let width = self.state.viewport().width;
        if width > self.config.desktop_breakpoint_px && self.state.is_drawer_open() {
            tracing::debug!(width, "desktop width reached, closing drawer");
            self.close_drawer();
        }
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use pretty_assertions::assert_eq;

    use crate::analytics::LogAnalytics;
    use crate::config::SiteConfig;
    use crate::headless::{HeadlessNode, HeadlessSurface};
    use crate::input::{Disposition, InteractionKind, Key, KeyInput, Modifiers, SiteEvent};
    use crate::page::PageRegistry;
    use crate::site::{HostEnv, Site};

    fn site() -> Site<HeadlessSurface, LogAnalytics> {
        let registry = PageRegistry::builtin();
        let surface = HeadlessSurface::for_registry(&registry);
        let mut site = Site::start(
            surface,
            registry,
            SiteConfig::default(),
            HostEnv::default(),
            LogAnalytics,
        )
        .unwrap();
        site.run_until_idle();
        site
    }

    fn key(k: Key) -> KeyInput {
        KeyInput::new(k)
    }

    #[test]
    fn toggle_key_activation_consumes() {
        let mut site = site();
        let d = site.handle(SiteEvent::ToggleKey(key(Key::Space)));
        assert_eq!(d, Disposition::Consumed);
        assert!(site.is_drawer_open());

        let d = site.handle(SiteEvent::ToggleKey(key(Key::Tab)));
        assert_eq!(d, Disposition::Propagate);
    }

    #[test]
    fn overlay_and_escape_close() {
        let mut site = site();
        site.handle(SiteEvent::ToggleClick);
        site.advance(Duration::from_millis(300));
        site.handle(SiteEvent::OverlayClick);
        assert!(!site.is_drawer_open());

        site.advance(Duration::from_millis(300));
        site.handle(SiteEvent::ToggleClick);
        site.advance(Duration::from_millis(300));
        site.handle(SiteEvent::DocumentKey(key(Key::Escape)));
        assert!(!site.is_drawer_open());
    }

    #[test]
    fn escape_while_closed_does_nothing() {
        let mut site = site();
        site.handle(SiteEvent::DocumentKey(key(Key::Escape)));
        assert!(!site.is_animating());
    }

    #[test]
    fn nav_click_replaces_link_navigation() {
        let mut site = site();
        let d = site.handle(SiteEvent::NavClick {
            target: "agua".into(),
        });
        assert_eq!(d, Disposition::Consumed);
        assert!(site.is_animating());
    }

    #[test]
    fn nav_key_enter_changes_page() {
        let mut site = site();
        let d = site.handle(SiteEvent::NavKey {
            target: "cidades".into(),
            key: key(Key::Enter),
        });
        assert_eq!(d, Disposition::Consumed);
        site.run_until_idle();
        assert_eq!(site.current_page(), "cidades");
        assert_eq!(site.surface().fragment(), "cidades");
    }

    #[test]
    fn arrows_rove_among_nav_items() {
        let mut site = site();
        site.surface_mut()
            .set_focus(Some(HeadlessNode::NavItem("politicas".into())));
        let d = site.handle(SiteEvent::DrawerKey(key(Key::ArrowDown)));
        assert_eq!(d, Disposition::Consumed);
        assert_eq!(
            site.surface().focused(),
            Some(&HeadlessNode::NavItem("energia".into()))
        );

        site.handle(SiteEvent::DrawerKey(key(Key::ArrowUp)));
        assert_eq!(
            site.surface().focused(),
            Some(&HeadlessNode::NavItem("politicas".into()))
        );

        site.handle(SiteEvent::DrawerKey(key(Key::Home)));
        assert_eq!(
            site.surface().focused(),
            Some(&HeadlessNode::NavItem("energia".into()))
        );
    }

    #[test]
    fn arrows_ignore_focus_outside_nav() {
        let mut site = site();
        site.surface_mut().set_focus(Some(HeadlessNode::MenuToggle));
        let d = site.handle(SiteEvent::DrawerKey(key(Key::ArrowDown)));
        assert_eq!(d, Disposition::Propagate);
        assert_eq!(site.surface().focused(), Some(&HeadlessNode::MenuToggle));
    }

    #[test]
    fn keyboard_navigation_can_be_disabled() {
        let registry = PageRegistry::builtin();
        let config = SiteConfig {
            keyboard_navigation: false,
            ..SiteConfig::default()
        };
        let mut site = Site::start(
            HeadlessSurface::for_registry(&registry),
            registry,
            config,
            HostEnv::default(),
            LogAnalytics,
        )
        .unwrap();
        site.surface_mut()
            .set_focus(Some(HeadlessNode::NavItem("agua".into())));
        let d = site.handle(SiteEvent::DrawerKey(key(Key::End)));
        assert_eq!(d, Disposition::Propagate);
    }

    #[test]
    fn tab_without_trap_propagates() {
        let mut site = site();
        site.surface_mut()
            .set_focus(Some(HeadlessNode::NavItem("politicas".into())));
        let d = site.handle(SiteEvent::DrawerKey(key(Key::Tab)));
        assert_eq!(d, Disposition::Propagate);
    }

    #[test]
    fn shift_tab_on_first_wraps_to_last() {
        let mut site = site();
        site.handle(SiteEvent::ToggleClick);
        assert_eq!(
            site.surface().focused(),
            Some(&HeadlessNode::NavItem("energia".into()))
        );
        let d = site.handle(SiteEvent::DrawerKey(KeyInput::with_mods(
            Key::Tab,
            Modifiers::SHIFT,
        )));
        assert_eq!(d, Disposition::Consumed);
        assert_eq!(
            site.surface().focused(),
            Some(&HeadlessNode::NavItem("politicas".into()))
        );
    }

    #[test]
    fn popstate_prefers_recorded_state() {
        let mut site = site();
        site.handle(SiteEvent::PopState {
            state_page: Some("educacao".into()),
            fragment: "#agua".into(),
        });
        site.run_until_idle();
        assert_eq!(site.current_page(), "educacao");
    }

    #[test]
    fn popstate_unknown_page_is_ignored() {
        let mut site = site();
        site.handle(SiteEvent::PopState {
            state_page: None,
            fragment: "#xyz".into(),
        });
        assert!(!site.is_animating());
        assert_eq!(site.current_page(), "energia");
    }

    #[test]
    fn popstate_without_page_or_fragment_goes_to_default() {
        let mut site = site();
        site.change_page("agua", true);
        site.run_until_idle();
        site.handle(SiteEvent::PopState {
            state_page: None,
            fragment: String::new(),
        });
        site.run_until_idle();
        assert_eq!(site.current_page(), "energia");
    }

    #[test]
    fn interactions_update_timestamp() {
        let mut site = site();
        site.advance(Duration::from_millis(250));
        let now = site.now();
        site.handle(SiteEvent::Interaction(InteractionKind::MouseMove));
        assert_eq!(site.state().last_interaction(), now);
    }

    #[test]
    fn skip_link_focuses_main_content() {
        let mut site = site();
        let d = site.handle(SiteEvent::SkipLink);
        assert_eq!(d, Disposition::Consumed);
        assert_eq!(site.surface().focused(), Some(&HeadlessNode::MainContent));
    }
}
