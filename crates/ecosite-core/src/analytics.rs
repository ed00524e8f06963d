#![forbid(unsafe_code)]

//! Analytics hooks.
//!
//! The controller reports page views and control interactions through the
//! [`Analytics`] trait. [`LogAnalytics`] writes them to the log; a real
//! deployment can forward them to a telemetry service instead.

use core::time::Duration;

use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::util::Viewport;

/// A page became visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub page: String,
    pub timestamp: String,
    pub user_agent: String,
    pub viewport: String,
}

impl PageView {
    #[must_use]
    pub fn new(page: &str, wall_clock: Duration, user_agent: &str, viewport: Viewport) -> Self {
        Self {
            page: page.to_string(),
            timestamp: rfc3339(wall_clock),
            user_agent: user_agent.to_string(),
            viewport: viewport.to_string(),
        }
    }
}

/// The user operated a control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionRecord {
    pub action: String,
    pub element: String,
    pub timestamp: String,
}

impl InteractionRecord {
    #[must_use]
    pub fn new(action: &str, element: &str, wall_clock: Duration) -> Self {
        Self {
            action: action.to_string(),
            element: element.to_string(),
            timestamp: rfc3339(wall_clock),
        }
    }
}

/// Sink for page views and interactions.
pub trait Analytics {
    fn page_view(&mut self, view: &PageView);
    fn interaction(&mut self, record: &InteractionRecord);
}

impl<T: Analytics + ?Sized> Analytics for Box<T> {
    fn page_view(&mut self, view: &PageView) {
        (**self).page_view(view);
    }

    fn interaction(&mut self, record: &InteractionRecord) {
        (**self).interaction(record);
    }
}

/// Writes analytics records to the `ecosite::analytics` log target as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAnalytics;

impl Analytics for LogAnalytics {
    fn page_view(&mut self, view: &PageView) {
        let payload = serde_json::to_string(view).unwrap_or_default();
        tracing::info!(target: "ecosite::analytics", page = %view.page, %payload, "page view");
    }

    fn interaction(&mut self, record: &InteractionRecord) {
        let payload = serde_json::to_string(record).unwrap_or_default();
        tracing::info!(
            target: "ecosite::analytics",
            action = %record.action,
            %payload,
            "user interaction"
        );
    }
}

/// Format time since the Unix epoch as RFC 3339 (UTC).
#[must_use]
pub fn rfc3339(since_epoch: Duration) -> String {
    let nanos = i128::try_from(since_epoch.as_nanos()).unwrap_or(i128::MAX);
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|t| t.format(&Rfc3339).ok())
        .unwrap_or_default()
}
