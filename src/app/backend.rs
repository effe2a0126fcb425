// MediAdmin - app/backend.rs
//
// The seam between the application layer and the admin REST backend.
// `HttpBackend` (app/http.rs) is the production implementation; tests plug
// in an in-memory one.

use crate::core::filter::Query;
use crate::core::model::{Filter, ResourceKind, ResourcePage, Stat, UserProfile};
use crate::util::error::BackendError;

/// Blocking access to the backend. Calls are made from background threads,
/// never from the UI thread.
pub trait Backend: Send + Sync {
    /// One page of `kind` matching `query`.
    fn fetch_page(&self, kind: ResourceKind, query: &Query) -> Result<ResourcePage, BackendError>;

    /// Aggregate stats for `kind`, in display order.
    fn fetch_stats(&self, kind: ResourceKind) -> Result<Vec<Stat>, BackendError>;

    /// Filter definitions available for `kind` (all values empty).
    fn fetch_filters(&self, kind: ResourceKind) -> Result<Vec<Filter>, BackendError>;

    /// Delete one resource by backend identifier.
    fn delete_resource(&self, kind: ResourceKind, id: &str) -> Result<(), BackendError>;

    /// The signed-in user.
    fn fetch_user(&self) -> Result<UserProfile, BackendError>;
}
