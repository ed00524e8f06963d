#![forbid(unsafe_code)]

//! Error type shared by the controller and its hosts.

use core::fmt;

/// Failures that stop the site from starting.
///
/// Everything that can go wrong after startup is logged and ignored instead,
/// so this type only surfaces from constructors and configuration parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteError {
    /// An essential structural element is absent from the document.
    MissingElement(&'static str),
    /// The page registry has no entries.
    EmptyRegistry,
    /// The configured fallback page is not in the registry.
    UnknownDefaultPage(String),
    /// Host-provided configuration could not be used.
    InvalidConfig(String),
    /// The host environment rejected an operation.
    Host(String),
}

impl fmt::Display for SiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingElement(name) => write!(f, "element not found: {name}"),
            Self::EmptyRegistry => f.write_str("page registry is empty"),
            Self::UnknownDefaultPage(id) => write!(f, "default page is not registered: {id}"),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Self::Host(msg) => write!(f, "host error: {msg}"),
        }
    }
}

impl std::error::Error for SiteError {}

impl From<serde_json::Error> for SiteError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_missing_element() {
        let err = SiteError::MissingElement("menuToggle");
        assert_eq!(err.to_string(), "element not found: menuToggle");
    }

    #[test]
    fn json_errors_become_config_errors() {
        let err: SiteError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, SiteError::InvalidConfig(_)));
    }
}
