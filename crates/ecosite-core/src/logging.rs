#![forbid(unsafe_code)]

//! Tracing layer that renders events as single lines for a [`LogSink`].
//!
//! The web shell plugs in a sink that writes to the browser console; tests
//! use [`CaptureSink`] and inspect what was logged.
//!
//! ```ignore
//! use ecosite_core::logging::{self, CaptureSink};
//!
//! let sink = CaptureSink::default();
//! logging::init(sink.clone(), "info")?;
//! tracing::warn!(page = "xyz", "page not found");
//! assert!(sink.lines()[0].1.contains("page not found"));
//! ```

use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::SiteError;

/// Destination for formatted log lines.
pub trait LogSink: Send + Sync + 'static {
    fn write_line(&self, level: Level, line: &str);
}

/// Sink that keeps every line in memory.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    lines: Arc<Mutex<Vec<(Level, String)>>>,
}

impl CaptureSink {
    /// Copy of everything captured so far.
    #[must_use]
    pub fn lines(&self) -> Vec<(Level, String)> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Whether any captured line contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|(_, line)| line.contains(needle))
    }
}

impl LogSink for CaptureSink {
    fn write_line(&self, level: Level, line: &str) {
        let mut lines = match self.lines.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push((level, line.to_string()));
    }
}

#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Vec<(&'static str, String)>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        if field.name() == "message" {
            self.message = Some(rendered);
        } else {
            self.fields.push((field.name(), rendered));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push((field.name(), value.to_string()));
        }
    }
}

/// Formats `LEVEL target: message key=value ...` and hands the line to a sink.
pub struct ConsoleLayer<K> {
    sink: K,
    show_level: bool,
    show_target: bool,
}

impl<K: LogSink> ConsoleLayer<K> {
    pub fn new(sink: K) -> Self {
        Self {
            sink,
            show_level: true,
            show_target: true,
        }
    }

    /// Builder: include the level name.
    #[must_use]
    pub fn show_level(mut self, show: bool) -> Self {
        self.show_level = show;
        self
    }

    /// Builder: include the event target.
    #[must_use]
    pub fn show_target(mut self, show: bool) -> Self {
        self.show_target = show;
        self
    }

    fn format(&self, event: &Event<'_>) -> String {
        let metadata = event.metadata();
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let mut line = String::new();
        if self.show_level {
            let _ = write!(line, "{:<5} ", metadata.level().as_str());
        }
        if self.show_target {
            let _ = write!(line, "{}: ", metadata.target());
        }
        line.push_str(visitor.message.as_deref().unwrap_or_default());
        for (key, value) in &visitor.fields {
            let _ = write!(line, " {key}={value}");
        }
        line
    }
}

impl<S, K> Layer<S> for ConsoleLayer<K>
where
    S: Subscriber,
    K: LogSink,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let line = self.format(event);
        self.sink.write_line(*event.metadata().level(), &line);
    }
}

/// Install a global subscriber routing events that pass `filter` to `sink`.
pub fn init<K: LogSink>(sink: K, filter: &str) -> Result<(), SiteError> {
    let filter = EnvFilter::try_new(filter).map_err(|e| SiteError::InvalidConfig(e.to_string()))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(ConsoleLayer::new(sink))
        .try_init()
        .map_err(|e| SiteError::Host(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_carry_level_target_message_and_fields() {
        let sink = CaptureSink::default();
        let subscriber = tracing_subscriber::registry().with(ConsoleLayer::new(sink.clone()));
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "ecosite::test", page = "xyz", "page not found");
        });

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Level::WARN);
        assert_eq!(lines[0].1, "WARN  ecosite::test: page not found page=xyz");
    }

    #[test]
    fn level_and_target_can_be_hidden() {
        let sink = CaptureSink::default();
        let layer = ConsoleLayer::new(sink.clone())
            .show_level(false)
            .show_target(false);
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(count = 3, "ready");
        });
        assert_eq!(sink.lines()[0].1, "ready count=3");
    }

    #[test]
    fn bad_filter_is_rejected() {
        let err = init(CaptureSink::default(), "ecosite=notalevel").unwrap_err();
        assert!(matches!(err, SiteError::InvalidConfig(_)));
    }
}
