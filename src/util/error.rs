// MediAdmin - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all MediAdmin operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum AdminError {
    /// A backend request failed.
    Backend(BackendError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Translation catalog loading failed.
    Catalog(CatalogError),

    /// The current user lacks the permission for a privileged operation.
    AccessDenied { permission: String },
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend(e) => write!(f, "Backend error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Catalog(e) => write!(f, "Translation catalog error: {e}"),
            Self::AccessDenied { permission } => {
                write!(f, "Access denied: missing permission '{permission}'")
            }
        }
    }
}

impl std::error::Error for AdminError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Backend(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Catalog(e) => Some(e),
            Self::AccessDenied { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Backend errors
// ---------------------------------------------------------------------------

/// Errors raised while talking to the admin REST backend.
#[derive(Debug)]
pub enum BackendError {
    /// The request could not be sent or the response body not read.
    Request { url: String, source: reqwest::Error },

    /// The backend answered with a non-success status.
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The response body was not the JSON shape we expect.
    Decode {
        url: String,
        source: serde_json::Error,
    },

    /// A resource identifier that cannot name a single path segment.
    InvalidId { id: String },
}

impl BackendError {
    /// Build a `Status` error, truncating long response bodies.
    pub fn status(url: impl Into<String>, status: u16, body: &str) -> Self {
        let max = super::constants::MAX_ERROR_BODY_CHARS;
        let body = if body.chars().count() > max {
            let mut cut: String = body.chars().take(max).collect();
            cut.push('\u{2026}');
            cut
        } else {
            body.to_string()
        };
        Self::Status {
            url: url.into(),
            status,
            body,
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request { url, source } => write!(f, "request to '{url}' failed: {source}"),
            Self::Status { url, status, body } => {
                if body.is_empty() {
                    write!(f, "'{url}' answered with status {status}")
                } else {
                    write!(f, "'{url}' answered with status {status}: {body}")
                }
            }
            Self::Decode { url, source } => {
                write!(f, "unexpected response from '{url}': {source}")
            }
            Self::InvalidId { id } => write!(f, "invalid resource id '{id}'"),
        }
    }
}

impl std::error::Error for BackendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            Self::Status { .. } | Self::InvalidId { .. } => None,
        }
    }
}

impl From<BackendError> for AdminError {
    fn from(e: BackendError) -> Self {
        Self::Backend(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for AdminError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Catalog errors
// ---------------------------------------------------------------------------

/// Errors related to loading a translation catalog.
#[derive(Debug)]
pub enum CatalogError {
    /// The catalog file could not be read.
    Io { path: PathBuf, source: io::Error },

    /// The catalog is not valid JSON.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read catalog '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "invalid catalog JSON '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<CatalogError> for AdminError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

/// Convenience type alias for MediAdmin results.
pub type Result<T> = std::result::Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_body_is_truncated() {
        let long = "x".repeat(super::super::constants::MAX_ERROR_BODY_CHARS + 50);
        let err = BackendError::status("http://h/a", 500, &long);
        match err {
            BackendError::Status { body, status, .. } => {
                assert_eq!(status, 500);
                assert_eq!(
                    body.chars().count(),
                    super::super::constants::MAX_ERROR_BODY_CHARS + 1
                );
                assert!(body.ends_with('\u{2026}'));
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[test]
    fn access_denied_names_the_permission() {
        let err = AdminError::AccessDenied {
            permission: "ROLE_UI_SERIES_DELETE".to_string(),
        };
        assert!(err.to_string().contains("ROLE_UI_SERIES_DELETE"));
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn backend_error_keeps_its_chain() {
        let err: AdminError = BackendError::status("http://h/a", 503, "").into();
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("'http://h/a' answered with status 503")
        );
    }
}
