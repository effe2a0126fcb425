// MediAdmin - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "MediAdmin";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "MediAdmin";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Backend connection
// =============================================================================

/// Backend base URL used when neither config nor CLI provide one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;

/// Bounds for `[backend] timeout_secs`.
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Maximum number of characters of an error response body kept in a
/// `BackendError::Status`. Longer bodies are truncated.
pub const MAX_ERROR_BODY_CHARS: usize = 512;

// =============================================================================
// Default endpoint paths (relative to the base URL)
// =============================================================================

pub const DEFAULT_EVENTS_LIST_PATH: &str = "/admin-ng/event/events.json";
pub const DEFAULT_SERIES_LIST_PATH: &str = "/admin-ng/series/series.json";
pub const DEFAULT_EVENTS_STATS_PATH: &str = "/admin-ng/resources/events/stats.json";
pub const DEFAULT_EVENTS_FILTERS_PATH: &str = "/admin-ng/resources/events/filters.json";
pub const DEFAULT_SERIES_FILTERS_PATH: &str = "/admin-ng/resources/series/filters.json";
pub const DEFAULT_EVENTS_DELETE_PATH: &str = "/admin-ng/event/{id}";
pub const DEFAULT_SERIES_DELETE_PATH: &str = "/admin-ng/series/{id}";
pub const DEFAULT_USER_INFO_PATH: &str = "/info/me.json";

/// Placeholder replaced by the resource identifier in delete paths.
pub const ID_PLACEHOLDER: &str = "{id}";

// =============================================================================
// Query serialisation
// =============================================================================

/// Reserved filter name carrying the free-text search in the `filter` param.
pub const TEXT_FILTER_NAME: &str = "textFilter";

/// Row field holding the backend identifier used by bulk delete.
pub const ROW_ID_FIELD: &str = "id";

// =============================================================================
// Refresh and pagination
// =============================================================================

/// Interval between background reloads of the visible table.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 100;

/// Bounds for `[refresh] interval_secs`.
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 5;
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 3_600;

/// Repaint interval while background requests are in flight, so
/// completions are polled promptly.
pub const UI_POLL_INTERVAL_MS: u64 = 50;

/// Rows requested per page.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Bounds for `[table] page_size`.
pub const MIN_PAGE_SIZE: u64 = 1;
pub const MAX_PAGE_SIZE: u64 = 500;

// =============================================================================
// Notifications
// =============================================================================

/// Seconds a transient notification stays visible.
pub const NOTIFICATION_DURATION_SECS: u64 = 5;

/// Maximum notifications kept at once; the oldest is dropped on overflow.
pub const MAX_NOTIFICATIONS: usize = 20;

// =============================================================================
// Default permission names
// =============================================================================

pub const ROLE_EVENTS_VIEW: &str = "ROLE_UI_EVENTS_VIEW";
pub const ROLE_EVENTS_CREATE: &str = "ROLE_UI_EVENTS_CREATE";
pub const ROLE_EVENTS_DELETE: &str = "ROLE_UI_EVENTS_DELETE";
pub const ROLE_SERIES_VIEW: &str = "ROLE_UI_SERIES_VIEW";
pub const ROLE_SERIES_CREATE: &str = "ROLE_UI_SERIES_CREATE";
pub const ROLE_SERIES_DELETE: &str = "ROLE_UI_SERIES_DELETE";

// =============================================================================
// Files
// =============================================================================

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default log level when nothing else is configured.
pub const DEFAULT_LOG_LEVEL: &str = "info";
