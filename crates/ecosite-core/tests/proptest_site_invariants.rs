//! Property-based invariant tests for the site controller.
//!
//! Verifies, for arbitrary interleavings of user events and elapsed time:
//! 1. At most one content section is active; once idle, exactly the current
//!    page's section and navigation item are active.
//! 2. The drawer flag and the drawer markup never disagree.
//! 3. The current page is always a registered page.
//! 4. Tab and Shift+Tab at the trap boundaries wrap for any number of
//!    focusable elements.
//! 5. Any number of requests issued during one transition applies at most once.

use core::time::Duration;

use ecosite_core::{
    HeadlessNode, HeadlessSurface, HostEnv, InteractionKind, Key, KeyInput, LogAnalytics,
    Modifiers, PageRegistry, Site, SiteConfig, SiteEvent,
};
use proptest::prelude::*;

const PAGES: [&str; 8] = [
    "energia",
    "agua",
    "biodiversidade",
    "agricultura",
    "residuos",
    "cidades",
    "educacao",
    "politicas",
];

#[derive(Debug, Clone)]
enum Step {
    Event(SiteEvent),
    Wait(u64),
    Back,
}

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_target() -> impl Strategy<Value = String> {
    prop_oneof![
        8 => (0..PAGES.len()).prop_map(|i| PAGES[i].to_string()),
        1 => Just("xyz".to_string()),
    ]
}

fn arb_event() -> impl Strategy<Value = SiteEvent> {
    prop_oneof![
        Just(SiteEvent::ToggleClick),
        Just(SiteEvent::OverlayClick),
        Just(SiteEvent::DocumentKey(KeyInput::new(Key::Escape))),
        arb_target().prop_map(|target| SiteEvent::NavClick { target }),
        arb_target().prop_map(|target| SiteEvent::NavKey {
            target,
            key: KeyInput::new(Key::Enter),
        }),
        (320u32..1600, 480u32..1200).prop_map(|(width, height)| SiteEvent::Resize { width, height }),
        Just(SiteEvent::Interaction(InteractionKind::Scroll)),
    ]
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => arb_event().prop_map(Step::Event),
        3 => (0u64..400).prop_map(Step::Wait),
        1 => Just(Step::Back),
    ]
}

fn site_with(surface: HeadlessSurface) -> Site<HeadlessSurface, LogAnalytics> {
    let mut site = Site::start(
        surface,
        PageRegistry::builtin(),
        SiteConfig::default(),
        HostEnv::default(),
        LogAnalytics,
    )
    .unwrap();
    site.run_until_idle();
    site
}

fn site() -> Site<HeadlessSurface, LogAnalytics> {
    site_with(HeadlessSurface::for_registry(&PageRegistry::builtin()))
}

fn check(site: &Site<HeadlessSurface, LogAnalytics>) -> Result<(), TestCaseError> {
    let surface = site.surface();
    prop_assert!(surface.active_sections().len() <= 1);
    prop_assert_eq!(site.is_drawer_open(), surface.drawer_open());
    prop_assert!(PAGES.contains(&site.current_page()));
    if !site.is_animating() {
        prop_assert_eq!(surface.active_sections(), vec![site.current_page()]);
        prop_assert_eq!(surface.active_nav(), vec![site.current_page()]);
        prop_assert_eq!(surface.tabbable_nav(), vec![site.current_page()]);
    }
    Ok(())
}

proptest! {
    #[test]
    fn single_active_page_holds_throughout(steps in prop::collection::vec(arb_step(), 1..60)) {
        let mut site = site();
        for step in steps {
            match step {
                Step::Event(event) => {
                    let _ = site.handle(event);
                }
                Step::Wait(ms) => site.advance(Duration::from_millis(ms)),
                Step::Back => {
                    if let Some(event) = site.surface_mut().go_back() {
                        let _ = site.handle(event);
                    }
                }
            }
            check(&site)?;
        }
        site.run_until_idle();
        check(&site)?;
        prop_assert!(!site.is_animating());
    }

    #[test]
    fn trap_wraps_for_any_size(extra in 0usize..6) {
        let mut surface = HeadlessSurface::for_registry(&PageRegistry::builtin());
        for i in 0..extra {
            surface = surface.with_drawer_focusable(HeadlessNode::Named(format!("link-{i}")));
        }
        let mut site = site_with(surface);
        let _ = site.handle(SiteEvent::ToggleClick);
        let trap = site.state().focus_trap().unwrap();
        let first = trap.first().cloned().unwrap();
        let last = trap.last().cloned().unwrap();
        prop_assert_eq!(trap.len(), PAGES.len() + extra);

        site.surface_mut().set_focus(Some(last.clone()));
        let _ = site.handle(SiteEvent::DrawerKey(KeyInput::new(Key::Tab)));
        prop_assert_eq!(site.surface().focused(), Some(&first));

        let _ = site.handle(SiteEvent::DrawerKey(KeyInput::with_mods(Key::Tab, Modifiers::SHIFT)));
        prop_assert_eq!(site.surface().focused(), Some(&last));
    }

    #[test]
    fn burst_of_requests_applies_once(n in 1usize..12, target in 1usize..PAGES.len()) {
        let mut site = site();
        for _ in 0..n {
            let _ = site.handle(SiteEvent::NavClick { target: PAGES[target].to_string() });
            let _ = site.handle(SiteEvent::ToggleClick);
        }
        site.run_until_idle();
        prop_assert_eq!(site.current_page(), PAGES[target]);
        prop_assert_eq!(site.surface().history_len(), 2);
        prop_assert!(!site.is_drawer_open());
    }
}
