#![forbid(unsafe_code)]

//! Host options and the debug-handle payloads, as JSON.

use ecosite_core::{PageRegistry, SiteConfig, SiteError, StateSnapshot};

/// Parse the options object passed to `start`; absent options mean defaults.
pub fn parse_config(json: Option<&str>) -> Result<SiteConfig, SiteError> {
    match json.map(str::trim) {
        None | Some("" | "null" | "undefined") => Ok(SiteConfig::default()),
        Some(json) => SiteConfig::from_json(json),
    }
}

/// Parse a `{ id: { title, description, keywords } }` page map; absent means
/// the built-in pages.
pub fn parse_pages(json: Option<&str>) -> Result<PageRegistry, SiteError> {
    match json.map(str::trim) {
        None | Some("" | "null" | "undefined") => Ok(PageRegistry::builtin()),
        Some(json) => PageRegistry::from_json(json),
    }
}

#[must_use]
pub fn state_json(snapshot: &StateSnapshot) -> String {
    serde_json::to_string(snapshot).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_options_use_defaults() {
        assert_eq!(parse_config(None), Ok(SiteConfig::default()));
        assert_eq!(parse_config(Some("null")), Ok(SiteConfig::default()));
    }

    #[test]
    fn partial_options_override_defaults() {
        let config = parse_config(Some(r#"{"animation_ms": 120, "service_worker": "/sw.js"}"#))
            .unwrap();
        assert_eq!(config.animation_ms, 120);
        assert_eq!(config.service_worker.as_deref(), Some("/sw.js"));
        assert_eq!(config.default_page, "energia");
    }

    #[test]
    fn invalid_options_are_rejected() {
        assert!(matches!(
            parse_config(Some(r#"{"animation_ms": "fast"}"#)),
            Err(SiteError::InvalidConfig(_))
        ));
    }

    #[test]
    fn custom_pages_keep_their_order() {
        let pages = parse_pages(Some(
            r#"{"solar": {"title": "Solar", "description": "Sol"},
                "vento": {"title": "Vento", "description": "Ar"}}"#,
        ))
        .unwrap();
        assert_eq!(pages.ids().collect::<Vec<_>>(), vec!["solar", "vento"]);
        assert_eq!(parse_pages(None).unwrap().len(), 8);
        assert_eq!(parse_pages(Some("{}")).err(), Some(SiteError::EmptyRegistry));
    }
}
