// MediAdmin - app/http.rs
//
// `Backend` implementation over the admin REST API using a blocking
// reqwest client. Every call runs on a loader background thread.
//
// Response shapes are decoded through private raw structs and converted to
// core model types; unknown JSON fields are ignored.

use crate::app::backend::Backend;
use crate::core::filter::Query;
use crate::core::model::{
    Filter, FilterOption, ResourceKind, ResourcePage, ResourceRow, Stat, UserProfile,
};
use crate::util::constants;
use crate::util::error::BackendError;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

// =============================================================================
// Settings
// =============================================================================

/// Endpoint paths relative to the backend base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub events_list: String,
    pub series_list: String,
    /// `None` = the backend offers no stats for this kind.
    pub events_stats: Option<String>,
    pub series_stats: Option<String>,
    pub events_filters: String,
    pub series_filters: String,
    /// Delete paths contain an `{id}` placeholder.
    pub events_delete: String,
    pub series_delete: String,
    pub user_info: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            events_list: constants::DEFAULT_EVENTS_LIST_PATH.to_string(),
            series_list: constants::DEFAULT_SERIES_LIST_PATH.to_string(),
            events_stats: Some(constants::DEFAULT_EVENTS_STATS_PATH.to_string()),
            series_stats: None,
            events_filters: constants::DEFAULT_EVENTS_FILTERS_PATH.to_string(),
            series_filters: constants::DEFAULT_SERIES_FILTERS_PATH.to_string(),
            events_delete: constants::DEFAULT_EVENTS_DELETE_PATH.to_string(),
            series_delete: constants::DEFAULT_SERIES_DELETE_PATH.to_string(),
            user_info: constants::DEFAULT_USER_INFO_PATH.to_string(),
        }
    }
}

impl Endpoints {
    pub fn list(&self, kind: ResourceKind) -> &str {
        match kind {
            ResourceKind::Events => &self.events_list,
            ResourceKind::Series => &self.series_list,
        }
    }

    pub fn stats(&self, kind: ResourceKind) -> Option<&str> {
        match kind {
            ResourceKind::Events => self.events_stats.as_deref(),
            ResourceKind::Series => self.series_stats.as_deref(),
        }
    }

    pub fn filters(&self, kind: ResourceKind) -> &str {
        match kind {
            ResourceKind::Events => &self.events_filters,
            ResourceKind::Series => &self.series_filters,
        }
    }

    /// Delete path for `id`, with the identifier substituted as one
    /// percent-encoded path segment.
    pub fn delete(&self, kind: ResourceKind, id: &str) -> Result<String, BackendError> {
        let template = match kind {
            ResourceKind::Events => &self.events_delete,
            ResourceKind::Series => &self.series_delete,
        };
        Ok(template.replace(constants::ID_PLACEHOLDER, &encode_path_segment(id)?))
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set. Empty,
/// `.` and `..` ids are refused since they would address another resource.
fn encode_path_segment(id: &str) -> Result<String, BackendError> {
    if matches!(id, "" | "." | "..") {
        return Err(BackendError::InvalidId { id: id.to_string() });
    }
    let mut out = String::with_capacity(id.len());
    for byte in id.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(char::from(byte))
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    Ok(out)
}

/// Connection settings for [`HttpBackend`].
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub base_url: String,
    pub timeout: Duration,
    /// Basic-auth credentials `(username, password)`.
    pub credentials: Option<(String, String)>,
    pub endpoints: Endpoints,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(constants::DEFAULT_REQUEST_TIMEOUT_SECS),
            credentials: None,
            endpoints: Endpoints::default(),
        }
    }
}

// =============================================================================
// Raw response shapes
// =============================================================================

#[derive(Debug, Deserialize)]
struct RawPage {
    #[serde(default)]
    results: Vec<ResourceRow>,
    #[serde(default)]
    total: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawFilterDef {
    #[serde(default)]
    label: String,
    #[serde(default)]
    options: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RawUserInfo {
    user: RawUser,
    #[serde(default)]
    roles: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    username: String,
}

fn page_from_raw(raw: RawPage) -> ResourcePage {
    let total = raw.total.unwrap_or(raw.results.len() as u64);
    ResourcePage {
        rows: raw.results,
        total,
    }
}

/// Convert filter definitions (`name -> {label, options}`) into empty filters.
///
/// `options` is either an object `label -> value` or an array of values;
/// anything else means free-text input.
fn filters_from_definitions(defs: BTreeMap<String, RawFilterDef>) -> Vec<Filter> {
    defs.into_iter()
        .map(|(name, def)| {
            let mut options: Vec<FilterOption> = match def.options {
                serde_json::Value::Object(map) => map
                    .into_iter()
                    .filter_map(|(label, value)| match value {
                        serde_json::Value::String(value) => Some(FilterOption { value, label }),
                        _ => None,
                    })
                    .collect(),
                serde_json::Value::Array(values) => values
                    .into_iter()
                    .filter_map(|v| match v {
                        serde_json::Value::String(s) => Some(FilterOption {
                            value: s.clone(),
                            label: s,
                        }),
                        _ => None,
                    })
                    .collect(),
                _ => Vec::new(),
            };
            options.sort_by(|a, b| a.label.cmp(&b.label));
            Filter {
                label: if def.label.is_empty() {
                    name.clone()
                } else {
                    def.label
                },
                name,
                value: String::new(),
                options,
            }
        })
        .collect()
}

fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, BackendError> {
    serde_json::from_str(body).map_err(|source| BackendError::Decode {
        url: url.to_string(),
        source,
    })
}

// =============================================================================
// HttpBackend
// =============================================================================

pub struct HttpBackend {
    client: Client,
    base_url: String,
    credentials: Option<(String, String)>,
    endpoints: Endpoints,
}

impl HttpBackend {
    pub fn new(settings: HttpSettings) -> Result<Self, BackendError> {
        let base_url = settings.base_url.trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|source| BackendError::Request {
                url: base_url.clone(),
                source,
            })?;

        tracing::info!(
            base_url = %base_url,
            timeout_secs = settings.timeout.as_secs(),
            auth = settings.credentials.is_some(),
            "HTTP backend configured"
        );

        Ok(Self {
            client,
            base_url,
            credentials: settings.credentials,
            endpoints: settings.endpoints,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some((user, password)) => request.basic_auth(user, Some(password)),
            None => request,
        }
    }

    /// Send `request` and return the body of a success response.
    fn send(&self, request: RequestBuilder, url: &str) -> Result<String, BackendError> {
        let response = self
            .authorised(request)
            .send()
            .map_err(|source| BackendError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response.text().map_err(|source| BackendError::Request {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(BackendError::status(url, status.as_u16(), &body));
        }
        Ok(body)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, BackendError> {
        let url = self.url(path);
        tracing::debug!(url = %url, params = ?params, "GET");
        let body = self.send(self.client.get(&url).query(params), &url)?;
        decode(&url, &body)
    }
}

impl Backend for HttpBackend {
    fn fetch_page(&self, kind: ResourceKind, query: &Query) -> Result<ResourcePage, BackendError> {
        let raw: RawPage = self.get_json(self.endpoints.list(kind), &query.to_params())?;
        Ok(page_from_raw(raw))
    }

    fn fetch_stats(&self, kind: ResourceKind) -> Result<Vec<Stat>, BackendError> {
        match self.endpoints.stats(kind) {
            Some(path) => self.get_json(path, &[]),
            None => Ok(Vec::new()),
        }
    }

    fn fetch_filters(&self, kind: ResourceKind) -> Result<Vec<Filter>, BackendError> {
        let defs: BTreeMap<String, RawFilterDef> =
            self.get_json(self.endpoints.filters(kind), &[])?;
        Ok(filters_from_definitions(defs))
    }

    fn delete_resource(&self, kind: ResourceKind, id: &str) -> Result<(), BackendError> {
        let url = self.url(&self.endpoints.delete(kind, id)?);
        tracing::debug!(url = %url, "DELETE");
        self.send(self.client.delete(&url), &url).map(|_| ())
    }

    fn fetch_user(&self) -> Result<UserProfile, BackendError> {
        let raw: RawUserInfo = self.get_json(&self.endpoints.user_info, &[])?;
        Ok(UserProfile::new(raw.user.username, raw.roles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_total_falls_back_to_row_count() {
        let raw: RawPage = decode("u", r#"{"results": [{"id": "a"}, {"id": "b"}]}"#).unwrap();
        let page = page_from_raw(raw);
        assert_eq!(page.total, 2);

        let raw: RawPage =
            decode("u", r#"{"results": [{"id": "a"}], "total": 40, "count": 1}"#).unwrap();
        assert_eq!(page_from_raw(raw).total, 40);
    }

    #[test]
    fn filter_definitions_accept_object_and_array_options() {
        let defs: BTreeMap<String, RawFilterDef> = decode(
            "u",
            r#"{
                "status": {"type": "select", "label": "FILTERS.EVENTS.STATUS.LABEL",
                           "options": {"EVENTS.STATUS.PUBLISHED": "published",
                                       "EVENTS.STATUS.FAILED": "failed"}},
                "location": {"label": "", "options": ["room-1", 3]},
                "textlike": {"label": "Free"}
            }"#,
        )
        .unwrap();
        let filters = filters_from_definitions(defs);

        let names: Vec<&str> = filters.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["location", "status", "textlike"]);

        let location = &filters[0];
        assert_eq!(location.label, "location");
        assert_eq!(location.options.len(), 1);

        let status = &filters[1];
        assert_eq!(status.options[0].label, "EVENTS.STATUS.FAILED");
        assert_eq!(status.options[0].value, "failed");
        assert!(filters[2].options.is_empty());
        assert!(filters.iter().all(|f| f.value.is_empty()));
    }

    #[test]
    fn decode_error_names_the_url() {
        let err = decode::<RawPage>("http://h/x", "not json").unwrap_err();
        assert!(err.to_string().contains("http://h/x"));
    }

    #[test]
    fn delete_path_substitutes_id() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.delete(ResourceKind::Series, "abc").unwrap(),
            "/admin-ng/series/abc"
        );
        assert_eq!(endpoints.stats(ResourceKind::Series), None);
    }

    #[test]
    fn delete_path_encodes_id_as_one_segment() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.delete(ResourceKind::Events, "a/b?c=1").unwrap(),
            "/admin-ng/event/a%2Fb%3Fc%3D1"
        );
        assert_eq!(
            endpoints.delete(ResourceKind::Events, "x y%").unwrap(),
            "/admin-ng/event/x%20y%25"
        );
        assert_eq!(
            endpoints.delete(ResourceKind::Series, "1.2_~-a").unwrap(),
            "/admin-ng/series/1.2_~-a"
        );
        for id in ["", ".", ".."] {
            assert!(matches!(
                endpoints.delete(ResourceKind::Series, id),
                Err(BackendError::InvalidId { .. })
            ));
        }
    }

    #[test]
    fn url_joins_with_single_slash() {
        let backend = HttpBackend::new(HttpSettings {
            base_url: "http://localhost:8080/".to_string(),
            ..HttpSettings::default()
        })
        .unwrap();
        assert_eq!(backend.url("/info/me.json"), "http://localhost:8080/info/me.json");
        assert_eq!(backend.url("info/me.json"), "http://localhost:8080/info/me.json");
    }
}
