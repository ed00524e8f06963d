#![forbid(unsafe_code)]

//! The site controller.
//!
//! [`Site`] owns the application state, the page registry, the timer queue
//! and the rendering [`Surface`]. Its behavior is split across modules by
//! concern: drawer handling lives in `drawer`, page switching in
//! `navigation` and DOM event dispatch in `events`.
//!
//! # Time
//!
//! The host reports monotonic time through [`Site::advance_to`]. Deferred
//! continuations ([`Wake`]s) that come due fire in deadline order, and each
//! one observes its own deadline as "now", so follow-up timers are scheduled
//! relative to when the previous step logically happened.

use core::time::Duration;

use crate::analytics::{Analytics, InteractionRecord, LogAnalytics, PageView};
use crate::config::SiteConfig;
use crate::error::SiteError;
use crate::page::PageRegistry;
use crate::state::{AppState, StateSnapshot};
use crate::surface::{Control, Surface};
use crate::timer::TimerQueue;
use crate::util::{Debounce, IdGenerator, Viewport};

const READY_MESSAGE: &str = "Site carregado e pronto para navegação";

/// Facts about the host gathered once at startup.
#[derive(Debug, Clone, Default)]
pub struct HostEnv {
    /// `location.hash` at load, with or without `#`.
    pub fragment: String,
    pub viewport: Viewport,
    pub user_agent: String,
    /// Result of `matchMedia('(prefers-contrast: high)')`.
    pub prefers_high_contrast: bool,
    /// Monotonic time at startup.
    pub now: Duration,
    /// Wall-clock time since the Unix epoch at monotonic zero.
    pub wall_clock_offset: Duration,
    /// Seed for generated element ids.
    pub seed: u64,
}

/// Deferred continuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wake {
    /// End of a drawer or page transition.
    Settle,
    /// Midpoint of a page transition: swap the visible content.
    SwapPage,
    /// Close the drawer as part of a running page transition.
    AutoCloseDrawer,
    /// Remove a transient live-region element.
    RemoveAnnouncement(String),
    /// Announce a message.
    Announce(String),
    /// Resize burst ended (debounce generation).
    ResizeSettled(u64),
    /// Check whether the open drawer has been idle long enough to close.
    /// Carries the idle chain it belongs to; chains from earlier opens exit.
    IdleCheck(u64),
}

/// Single-page site controller.
pub struct Site<S: Surface, A: Analytics = LogAnalytics> {
    pub(crate) surface: S,
    pub(crate) analytics: A,
    pub(crate) registry: PageRegistry,
    pub(crate) config: SiteConfig,
    pub(crate) state: AppState<S::Node>,
    pub(crate) timers: TimerQueue<Wake>,
    pub(crate) resize: Debounce,
    pub(crate) idle_chain: u64,
    ids: IdGenerator,
    now: Duration,
    wall_clock_offset: Duration,
    user_agent: String,
}

impl<S: Surface, A: Analytics> Site<S, A> {
    /// Validate the setup, prepare accessibility helpers, show the initial
    /// page and start loading the page named by the URL fragment.
    pub fn start(
        surface: S,
        registry: PageRegistry,
        config: SiteConfig,
        env: HostEnv,
        analytics: A,
    ) -> Result<Self, SiteError> {
        config.validate()?;
        if registry.is_empty() {
            return Err(SiteError::EmptyRegistry);
        }
        if !registry.contains(&config.default_page) {
            return Err(SiteError::UnknownDefaultPage(config.default_page.clone()));
        }

        let state = AppState::new(&config.default_page, env.now, env.viewport);
        let resize = Debounce::new(config.debounce());
        let mut site = Self {
            surface,
            analytics,
            registry,
            config,
            state,
            timers: TimerQueue::new(),
            resize,
            idle_chain: 0,
            ids: IdGenerator::with_seed(env.seed),
            now: env.now,
            wall_clock_offset: env.wall_clock_offset,
            user_agent: env.user_agent,
        };

        site.check_markup();
        site.setup_accessibility(env.prefers_high_contrast);
        site.render_current();
        if !site.load_from_fragment(&env.fragment).started() {
            site.report_page_view();
        }
        site.schedule(
            site.config.ready_announcement(),
            Wake::Announce(READY_MESSAGE.to_string()),
        );

        tracing::info!(
            page = site.state.current_page(),
            pages = site.registry.len(),
            "site initialized"
        );
        Ok(site)
    }

    /// Warn when navigation items, sections and registry disagree.
    fn check_markup(&self) {
        let sections = self.surface.section_ids();
        let (missing, unregistered) = self.registry.diff_against(sections.iter().map(String::as_str));
        for id in &missing {
            tracing::warn!(page = %id, "registered page has no content section");
        }
        for id in &unregistered {
            tracing::warn!(page = %id, "content section is not registered");
        }

        let targets = self.surface.nav_targets();
        let (missing, unregistered) = self.registry.diff_against(targets.iter().map(String::as_str));
        for id in &missing {
            tracing::warn!(page = %id, "registered page has no navigation item");
        }
        for id in &unregistered {
            tracing::warn!(page = %id, "navigation item targets an unregistered page");
        }
    }

    fn setup_accessibility(&mut self, prefers_high_contrast: bool) {
        self.surface.install_live_region();
        if prefers_high_contrast {
            self.surface.set_high_contrast(true);
        }
    }

    /// Show the current page immediately, without a transition.
    fn render_current(&mut self) {
        let page = self.state.current_page().to_string();
        let Some(info) = self.registry.get(&page) else {
            return;
        };
        if !self.surface.has_section(&page) {
            tracing::warn!(page = %page, "default page has no content section");
        }
        self.surface.deactivate_sections();
        self.surface.activate_section(&page);
        self.surface.mark_nav_active(&page);
        self.surface.set_hero(&info.title, &info.description);
    }

    // --- Time ---

    /// Current monotonic time as seen by the controller.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Wall-clock time since the Unix epoch.
    #[must_use]
    pub fn wall_clock(&self) -> Duration {
        self.wall_clock_offset.saturating_add(self.now)
    }

    /// Earliest pending deadline; the host should call
    /// [`advance_to`](Self::advance_to) no later than this.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Move time forward to `now`, firing every continuation due by then.
    ///
    /// Time never moves backwards; an earlier `now` only fires nothing.
    pub fn advance_to(&mut self, now: Duration) {
        while let Some((deadline, wake)) = self.timers.pop_due(now) {
            self.now = self.now.max(deadline);
            self.fire(wake);
        }
        self.now = self.now.max(now);
    }

    /// Move time forward by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.advance_to(self.now.saturating_add(dt));
    }

    /// Fire pending continuations until the queue is empty.
    pub fn run_until_idle(&mut self) {
        while let Some(deadline) = self.timers.next_deadline() {
            self.advance_to(deadline);
        }
    }

    pub(crate) fn schedule(&mut self, delay: Duration, wake: Wake) {
        self.schedule_at(self.now.saturating_add(delay), wake);
    }

    pub(crate) fn schedule_at(&mut self, deadline: Duration, wake: Wake) {
        tracing::trace!(?wake, deadline_ms = deadline.as_millis() as u64, "scheduled");
        self.timers.schedule(deadline, wake);
    }

    fn fire(&mut self, wake: Wake) {
        tracing::trace!(?wake, now_ms = self.now.as_millis() as u64, "wake");
        match wake {
            Wake::Settle => self.state.settle(),
            Wake::SwapPage => self.swap_page(),
            Wake::AutoCloseDrawer => {
                if self.state.is_drawer_open() {
                    self.apply_close();
                }
            }
            Wake::RemoveAnnouncement(id) => self.surface.remove_announcement(&id),
            Wake::Announce(message) => self.announce(&message),
            Wake::ResizeSettled(generation) => self.resize_settled(generation),
            Wake::IdleCheck(chain) => self.idle_check(chain),
        }
    }

    // --- Shared helpers ---

    /// Politely announce `message` through a transient live-region element.
    pub fn announce(&mut self, message: &str) {
        let id = self.ids.next_id();
        self.surface.append_announcement(&id, message);
        self.schedule(self.config.announcement_ttl(), Wake::RemoveAnnouncement(id));
    }

    pub(crate) fn report_page_view(&mut self) {
        let view = PageView::new(
            self.state.current_page(),
            self.wall_clock(),
            &self.user_agent,
            self.state.viewport(),
        );
        self.analytics.page_view(&view);
    }

    pub(crate) fn report_interaction(&mut self, action: &str, control: Control<'_>) {
        let element = self.surface.tag_name(control);
        let record = InteractionRecord::new(action, &element, self.wall_clock());
        self.analytics.interaction(&record);
    }

    // --- Accessors ---

    #[must_use]
    pub fn state(&self) -> &AppState<S::Node> {
        &self.state
    }

    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        self.state.snapshot()
    }

    #[must_use]
    pub fn current_page(&self) -> &str {
        self.state.current_page()
    }

    #[must_use]
    pub const fn is_drawer_open(&self) -> bool {
        self.state.is_drawer_open()
    }

    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.state.is_animating()
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn analytics(&self) -> &A {
        &self.analytics
    }

    #[must_use]
    pub fn registry(&self) -> &PageRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }
}
