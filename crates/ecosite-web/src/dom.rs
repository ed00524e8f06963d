#![forbid(unsafe_code)]

//! [`Surface`] over the live document.

use ecosite_core::focus::focusable_selector;
use ecosite_core::util::{Rect, Viewport, scroll_target};
use ecosite_core::{Control, SiteError, Surface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollToOptions, Window,
};

use crate::markup::{
    self, CLASS_ACTIVE, CLASS_BLUR, CLASS_CONTENT_PAGE, CLASS_HIGH_CONTRAST, CLASS_OPEN,
    CLASS_SR_ONLY, CONTENT_PAGE_SELECTOR, HistoryState, NAV_ITEM_SELECTOR, NAV_TARGET_ATTR,
};

/// Handles to the structural elements of the page.
pub struct DomSurface {
    window: Window,
    document: Document,
    menu_toggle: HtmlElement,
    drawer: HtmlElement,
    overlay: HtmlElement,
    page_title: HtmlElement,
    page_description: HtmlElement,
    content_area: Option<HtmlElement>,
    main_content: Option<HtmlElement>,
}

impl DomSurface {
    /// Find the structural elements; fails on the first required one missing.
    pub fn locate(window: Window) -> Result<Self, SiteError> {
        let document = window
            .document()
            .ok_or_else(|| SiteError::Host("window has no document".into()))?;
        markup::check_required(|id| document.get_element_by_id(id).is_some())?;

        let required = |id: &'static str| {
            html_by_id(&document, id).ok_or(SiteError::MissingElement(id))
        };
        Ok(Self {
            menu_toggle: required(markup::MENU_TOGGLE)?,
            drawer: required(markup::NAVIGATION_DRAWER)?,
            overlay: required(markup::DRAWER_OVERLAY)?,
            page_title: required(markup::PAGE_TITLE)?,
            page_description: required(markup::PAGE_DESCRIPTION)?,
            content_area: html_by_id(&document, markup::CONTENT_AREA),
            main_content: html_by_id(&document, markup::MAIN_CONTENT),
            window,
            document,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn menu_toggle(&self) -> &HtmlElement {
        &self.menu_toggle
    }

    pub fn drawer(&self) -> &HtmlElement {
        &self.drawer
    }

    pub fn overlay(&self) -> &HtmlElement {
        &self.overlay
    }

    /// Current `location.hash`.
    pub fn location_hash(&self) -> String {
        self.window.location().hash().unwrap_or_default()
    }

    pub fn viewport(&self) -> Viewport {
        let dimension = |value: Result<JsValue, JsValue>| {
            value
                .ok()
                .and_then(|v| v.as_f64())
                .map_or(0, |v| v.max(0.0) as u32)
        };
        Viewport::new(
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
        )
    }

    /// Whether `element` is currently inside the viewport.
    pub fn is_in_viewport(&self, element: &Element) -> bool {
        let r = element.get_bounding_client_rect();
        Rect {
            top: r.top(),
            left: r.left(),
            bottom: r.bottom(),
            right: r.right(),
        }
        .is_visible_in(self.viewport())
    }

    fn query_all(&self, root: &Element, selector: &str) -> Vec<HtmlElement> {
        let Ok(list) = root.query_selector_all(selector) else {
            tracing::warn!(selector, "invalid selector");
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .collect()
    }

    fn document_query_all(&self, selector: &str) -> Vec<HtmlElement> {
        match self.document.document_element() {
            Some(root) => self.query_all(&root, selector),
            None => Vec::new(),
        }
    }

    fn sections(&self) -> Vec<HtmlElement> {
        self.document_query_all(CONTENT_PAGE_SELECTOR)
    }

    fn body(&self) -> Option<HtmlElement> {
        self.document.body()
    }
}

fn html_by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

fn set_class(element: &Element, class: &str, on: bool) {
    if let Err(err) = element.class_list().toggle_with_force(class, on) {
        tracing::warn!(class, error = ?err, "class update failed");
    }
}

fn set_attr(element: &Element, name: &str, value: &str) {
    if let Err(err) = element.set_attribute(name, value) {
        tracing::warn!(name, error = ?err, "attribute update failed");
    }
}

fn focus_element(element: &HtmlElement) {
    if let Err(err) = element.focus() {
        tracing::debug!(error = ?err, "focus failed");
    }
}

impl Surface for DomSurface {
    type Node = HtmlElement;

    fn has_section(&self, page: &str) -> bool {
        self.document
            .get_element_by_id(page)
            .is_some_and(|el| el.class_list().contains(CLASS_CONTENT_PAGE))
    }

    fn section_ids(&self) -> Vec<String> {
        self.sections().iter().map(|s| s.id()).collect()
    }

    fn nav_targets(&self) -> Vec<String> {
        self.nav_items()
            .iter()
            .filter_map(|item| item.get_attribute(NAV_TARGET_ATTR))
            .collect()
    }

    fn show_drawer(&mut self, open: bool) {
        set_class(&self.drawer, CLASS_OPEN, open);
        set_class(&self.overlay, CLASS_ACTIVE, open);
        set_class(&self.menu_toggle, CLASS_ACTIVE, open);
        set_attr(&self.menu_toggle, "aria-expanded", if open { "true" } else { "false" });
        set_attr(&self.drawer, "aria-hidden", if open { "false" } else { "true" });
    }

    fn set_content_blur(&mut self, blurred: bool) {
        if let Some(main) = &self.main_content {
            set_class(main, CLASS_BLUR, blurred);
        }
    }

    fn lock_body_scroll(&mut self, locked: bool) {
        let Some(body) = self.body() else {
            return;
        };
        let value = if locked { "hidden" } else { "" };
        if let Err(err) = body.style().set_property("overflow", value) {
            tracing::warn!(error = ?err, "body scroll lock failed");
        }
    }

    fn deactivate_sections(&mut self) {
        for section in self.sections() {
            set_class(&section, CLASS_ACTIVE, false);
        }
    }

    fn activate_section(&mut self, page: &str) {
        if let Some(section) = html_by_id(&self.document, page) {
            set_class(&section, CLASS_ACTIVE, true);
        }
    }

    fn mark_nav_active(&mut self, page: &str) {
        for item in self.nav_items() {
            let active = item.get_attribute(NAV_TARGET_ATTR).as_deref() == Some(page);
            set_class(&item, CLASS_ACTIVE, active);
            item.set_tab_index(if active { 0 } else { -1 });
            if active {
                set_attr(&item, "aria-current", "page");
            } else if let Err(err) = item.remove_attribute("aria-current") {
                tracing::debug!(error = ?err, "aria-current removal failed");
            }
        }
    }

    fn set_hero(&mut self, title: &str, description: &str) {
        self.page_title.set_text_content(Some(title));
        self.page_description.set_text_content(Some(description));
    }

    fn push_history(&mut self, page: &str) {
        let state = HistoryState::for_page(page).to_json();
        let state = js_sys::JSON::parse(&state).unwrap_or(JsValue::NULL);
        let pushed = self.window.history().and_then(|history| {
            history.push_state_with_url(&state, "", Some(&markup::fragment_for(page)))
        });
        if let Err(err) = pushed {
            tracing::warn!(page, error = ?err, "history push failed");
        }
    }

    fn scroll_to_content(&mut self, offset: f64) {
        let Some(content) = &self.content_area else {
            return;
        };
        let offset_top = f64::from(content.offset_top());
        let options = ScrollToOptions::new();
        options.set_top(scroll_target(offset_top, offset));
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn append_announcement(&mut self, id: &str, message: &str) {
        let Some(body) = self.body() else {
            return;
        };
        let element = match self.document.create_element("div") {
            Ok(el) => el,
            Err(err) => {
                tracing::warn!(error = ?err, "announcement element creation failed");
                return;
            }
        };
        element.set_id(id);
        set_attr(&element, "aria-live", "polite");
        set_attr(&element, "aria-atomic", "true");
        set_class(&element, CLASS_SR_ONLY, true);
        element.set_text_content(Some(message));
        if let Err(err) = body.append_child(&element) {
            tracing::warn!(error = ?err, "announcement append failed");
        }
    }

    fn remove_announcement(&mut self, id: &str) {
        if let Some(element) = self.document.get_element_by_id(id) {
            element.remove();
        }
    }

    fn install_live_region(&mut self) {
        if self.document.get_element_by_id(markup::LIVE_REGION).is_some() {
            return;
        }
        self.append_announcement(markup::LIVE_REGION, "");
    }

    fn set_high_contrast(&mut self, enabled: bool) {
        if let Some(body) = self.body() {
            set_class(&body, CLASS_HIGH_CONTRAST, enabled);
        }
    }

    fn active_element(&self) -> Option<HtmlElement> {
        self.document
            .active_element()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn focus(&mut self, node: &HtmlElement) {
        focus_element(node);
    }

    fn drawer_focusables(&self) -> Vec<HtmlElement> {
        self.query_all(&self.drawer, &focusable_selector())
    }

    fn nav_items(&self) -> Vec<HtmlElement> {
        self.document_query_all(NAV_ITEM_SELECTOR)
    }

    fn tag_name(&self, control: Control<'_>) -> String {
        match control {
            Control::MenuToggle => self.menu_toggle.tag_name(),
            Control::Overlay => self.overlay.tag_name(),
            Control::NavItem(target) => self
                .nav_items()
                .iter()
                .find(|item| item.get_attribute(NAV_TARGET_ATTR).as_deref() == Some(target))
                .map(|item| item.tag_name())
                .unwrap_or_default(),
        }
    }

    fn focus_main_content(&mut self) {
        let Some(main) = &self.main_content else {
            return;
        };
        focus_element(main);
        if !self.is_in_viewport(main) {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            main.scroll_into_view_with_scroll_into_view_options(&options);
        }
    }
}
