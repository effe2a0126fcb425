// MediAdmin - app/loader.rs
//
// Resource loader: runs backend calls on background threads and hands the
// results back to the UI thread.
//
// Architecture:
//   - `ResourceLoader` lives on the UI thread; every backend call runs on its
//     own short-lived background thread.
//   - Completions travel over an mpsc channel and are drained by `poll`,
//     which the owner calls once per frame. All state changes happen there.
//   - An `Arc<AtomicBool>` cancel flag is shared with the threads. Once set,
//     threads drop their result instead of sending it, and `poll` ignores
//     anything already queued.
//
// Page fetches are two-phase. `fetch` tags the request with a sequence
// number; when the response arrives it is staged only if no newer fetch has
// been issued since (issue order wins, not arrival order). The owner then
// calls `project_into_table`, which publishes the staged page without I/O.

use crate::app::backend::Backend;
use crate::app::notifications::Notifications;
use crate::core::filter::{FilterStore, Query};
use crate::core::model::{Filter, ResourceKind, ResourcePage, Stat};
use crate::core::table::TableState;
use crate::util::error::BackendError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

// =============================================================================
// Public types
// =============================================================================

/// Identity of one page fetch: its sequence number and the query it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub kind: ResourceKind,
    pub query: Query,
}

/// What `poll` did with each completion it processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderEvent {
    /// A page was staged and is ready for `project_into_table`.
    PageStaged { kind: ResourceKind, seq: u64 },
    /// A page arrived for a fetch that a newer one has superseded.
    PageDiscarded {
        kind: ResourceKind,
        seq: u64,
        latest: u64,
    },
    /// The latest fetch failed; a notification was raised.
    PageFailed { kind: ResourceKind, seq: u64 },
    /// Stats were replaced wholesale.
    StatsReplaced { kind: ResourceKind, count: usize },
    /// Stats refresh failed; the previous stats stay.
    StatsKept { kind: ResourceKind },
    /// Filter definitions were installed.
    FiltersReplaced { kind: ResourceKind, count: usize },
    /// Filter definitions could not be loaded; the previous ones stay.
    FiltersKept { kind: ResourceKind },
    /// A bulk delete finished.
    Deleted {
        kind: ResourceKind,
        deleted: usize,
        failed: usize,
    },
}

// =============================================================================
// Internal types
// =============================================================================

enum Completion {
    Page {
        ticket: FetchTicket,
        result: Result<ResourcePage, BackendError>,
    },
    Stats {
        kind: ResourceKind,
        result: Result<Vec<Stat>, BackendError>,
    },
    Filters {
        kind: ResourceKind,
        result: Result<Vec<Filter>, BackendError>,
    },
    Deleted {
        kind: ResourceKind,
        requested: usize,
        failures: Vec<(String, BackendError)>,
    },
}

struct StagedPage {
    seq: u64,
    kind: ResourceKind,
    query: Query,
    page: ResourcePage,
}

// =============================================================================
// ResourceLoader
// =============================================================================

pub struct ResourceLoader {
    backend: Arc<dyn Backend>,
    tx: mpsc::Sender<Completion>,
    rx: mpsc::Receiver<Completion>,
    /// Cancel flag shared with every background thread.
    cancel_flag: Arc<AtomicBool>,
    /// Highest sequence number issued so far.
    issued: u64,
    /// Background calls started but not yet polled.
    pending: usize,
    /// Most recent accepted page, waiting for projection.
    staged: Option<StagedPage>,
}

impl ResourceLoader {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            backend,
            tx,
            rx,
            cancel_flag: Arc::new(AtomicBool::new(false)),
            issued: 0,
            pending: 0,
            staged: None,
        }
    }

    /// Highest sequence number issued so far (0 before the first fetch).
    pub fn latest_seq(&self) -> u64 {
        self.issued
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn has_staged(&self) -> bool {
        self.staged.is_some()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }

    /// Cancel the loader. In-flight requests cannot be aborted, but their
    /// results are dropped before touching any state.
    pub fn cancel(&mut self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
        self.staged = None;
        self.pending = 0;
        tracing::debug!(latest_seq = self.issued, "Loader cancelled");
    }

    /// Run `job` against the backend on a background thread and queue its
    /// completion for `poll`.
    fn spawn<F>(&mut self, job: F)
    where
        F: FnOnce(&dyn Backend) -> Completion + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        let cancel = Arc::clone(&self.cancel_flag);
        self.pending += 1;

        std::thread::spawn(move || {
            let completion = job(backend.as_ref());
            if cancel.load(Ordering::SeqCst) {
                return;
            }
            // Receiver dropped (view gone); exit quietly.
            let _ = tx.send(completion);
        });
    }

    // -------------------------------------------------------------------------
    // Page fetches
    // -------------------------------------------------------------------------

    /// Allocate the next sequence number for a fetch of `kind` with `query`.
    pub fn begin_fetch(&mut self, kind: ResourceKind, query: Query) -> FetchTicket {
        self.issued += 1;
        FetchTicket {
            seq: self.issued,
            kind,
            query,
        }
    }

    /// Fetch one page in the background. Returns the sequence number.
    pub fn fetch(&mut self, kind: ResourceKind, query: Query) -> u64 {
        let ticket = self.begin_fetch(kind, query);
        let seq = ticket.seq;
        if self.is_cancelled() {
            tracing::debug!(kind = %kind, seq, "Fetch skipped: loader cancelled");
            return seq;
        }
        tracing::debug!(kind = %kind, seq, offset = ticket.query.offset, "Fetch issued");
        self.spawn(move |backend| {
            let result = backend.fetch_page(ticket.kind, &ticket.query);
            Completion::Page { ticket, result }
        });
        seq
    }

    /// Apply the result of the fetch identified by `ticket`.
    ///
    /// Results of superseded fetches are discarded whether they succeeded or
    /// failed. A failure of the latest fetch raises an error notification and
    /// leaves everything else as it was.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<ResourcePage, BackendError>,
        notifications: &mut Notifications,
    ) -> LoaderEvent {
        let FetchTicket { seq, kind, query } = ticket;

        if self.is_cancelled() || seq != self.issued {
            tracing::debug!(
                kind = %kind,
                seq,
                latest = self.issued,
                "Discarding superseded page"
            );
            return LoaderEvent::PageDiscarded {
                kind,
                seq,
                latest: self.issued,
            };
        }

        match result {
            Ok(page) => {
                tracing::debug!(kind = %kind, seq, rows = page.rows.len(), total = page.total, "Page staged");
                self.staged = Some(StagedPage {
                    seq,
                    kind,
                    query,
                    page,
                });
                LoaderEvent::PageStaged { kind, seq }
            }
            Err(e) => {
                tracing::warn!(kind = %kind, seq, error = %e, "Fetch failed");
                notifications.error_with(
                    "NOTIFICATIONS.LOAD_FAILED",
                    vec![("kind", kind.to_string()), ("error", e.to_string())],
                );
                LoaderEvent::PageFailed { kind, seq }
            }
        }
    }

    /// Publish the staged page of `kind` as the table contents.
    ///
    /// Returns false (and drops the staged page) if nothing is staged for
    /// `kind` or if the page was fetched with a query other than `current`.
    /// Never performs I/O.
    pub fn project_into_table(
        &mut self,
        kind: ResourceKind,
        current: &Query,
        table: &mut TableState,
    ) -> bool {
        let Some(staged) = self.staged.take() else {
            return false;
        };
        if staged.kind != kind {
            tracing::debug!(staged = %staged.kind, requested = %kind, "Staged page is for another kind");
            return false;
        }
        if staged.query != *current {
            tracing::debug!(
                kind = %kind,
                seq = staged.seq,
                "Filters changed since fetch; dropping staged page"
            );
            return false;
        }
        table.replace(staged.page);
        tracing::debug!(kind = %kind, seq = staged.seq, rows = table.row_count(), "Page projected");
        true
    }

    // -------------------------------------------------------------------------
    // Stats, filter definitions, deletes
    // -------------------------------------------------------------------------

    pub fn refresh_stats(&mut self, kind: ResourceKind) {
        if self.is_cancelled() {
            return;
        }
        self.spawn(move |backend| Completion::Stats {
            kind,
            result: backend.fetch_stats(kind),
        });
    }

    pub fn load_filters(&mut self, kind: ResourceKind) {
        if self.is_cancelled() {
            return;
        }
        self.spawn(move |backend| Completion::Filters {
            kind,
            result: backend.fetch_filters(kind),
        });
    }

    /// Delete `ids` one by one in the background. Callers must have checked
    /// the delete permission.
    pub fn delete(&mut self, kind: ResourceKind, ids: Vec<String>) {
        if self.is_cancelled() || ids.is_empty() {
            return;
        }
        tracing::info!(kind = %kind, count = ids.len(), "Bulk delete issued");
        self.spawn(move |backend| {
            let requested = ids.len();
            let failures = ids
                .into_iter()
                .filter_map(|id| backend.delete_resource(kind, &id).err().map(|e| (id, e)))
                .collect();
            Completion::Deleted {
                kind,
                requested,
                failures,
            }
        });
    }

    // -------------------------------------------------------------------------
    // Polling
    // -------------------------------------------------------------------------

    /// Drain queued completions without blocking and apply them.
    pub fn poll(
        &mut self,
        filters: &mut FilterStore,
        notifications: &mut Notifications,
    ) -> Vec<LoaderEvent> {
        let mut completions = Vec::new();
        while let Ok(c) = self.rx.try_recv() {
            completions.push(c);
        }

        let mut events = Vec::with_capacity(completions.len());
        for completion in completions {
            self.pending = self.pending.saturating_sub(1);
            if self.is_cancelled() {
                continue;
            }
            let event = match completion {
                Completion::Page { ticket, result } => {
                    self.complete_fetch(ticket, result, notifications)
                }
                Completion::Stats { kind, result } => match result {
                    Ok(stats) => {
                        let count = stats.len();
                        filters.replace_stats(stats);
                        LoaderEvent::StatsReplaced { kind, count }
                    }
                    Err(e) => {
                        tracing::warn!(kind = %kind, error = %e, "Stats refresh failed; keeping previous stats");
                        LoaderEvent::StatsKept { kind }
                    }
                },
                Completion::Filters { kind, result } => match result {
                    Ok(defs) => {
                        let count = defs.len();
                        filters.replace_filters(defs);
                        LoaderEvent::FiltersReplaced { kind, count }
                    }
                    Err(e) => {
                        tracing::warn!(kind = %kind, error = %e, "Filter definitions unavailable");
                        LoaderEvent::FiltersKept { kind }
                    }
                },
                Completion::Deleted {
                    kind,
                    requested,
                    failures,
                } => {
                    for (id, e) in &failures {
                        tracing::warn!(kind = %kind, id = %id, error = %e, "Delete failed");
                        notifications.error_with(
                            "NOTIFICATIONS.DELETE_FAILED",
                            vec![("id", id.clone()), ("error", e.to_string())],
                        );
                    }
                    let deleted = requested - failures.len();
                    if deleted > 0 {
                        notifications.info_with(
                            "NOTIFICATIONS.DELETED",
                            vec![("count", deleted.to_string()), ("kind", kind.to_string())],
                        );
                    }
                    LoaderEvent::Deleted {
                        kind,
                        deleted,
                        failed: failures.len(),
                    }
                }
            };
            events.push(event);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::backend::fake::FakeBackend;
    use serde_json::json;
    use std::time::{Duration, Instant};

    fn page(ids: &[i64]) -> ResourcePage {
        ResourcePage {
            rows: ids
                .iter()
                .map(|id| match json!({ "id": id }) {
                    serde_json::Value::Object(m) => m,
                    _ => unreachable!(),
                })
                .collect(),
            total: ids.len() as u64,
        }
    }

    fn loader() -> (ResourceLoader, Arc<FakeBackend>) {
        let backend = Arc::new(FakeBackend::default());
        (ResourceLoader::new(backend.clone()), backend)
    }

    fn wait_for_events(
        loader: &mut ResourceLoader,
        filters: &mut FilterStore,
        notes: &mut Notifications,
    ) -> Vec<LoaderEvent> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut events = Vec::new();
        while Instant::now() < deadline {
            events.extend(loader.poll(filters, notes));
            if loader.pending() == 0 {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        events
    }

    #[test]
    fn later_issued_fetch_wins_regardless_of_arrival_order() {
        let (mut loader, _backend) = loader();
        let mut notes = Notifications::new();
        let mut table = TableState::new(10);
        let query = Query {
            limit: 10,
            ..Query::default()
        };

        let a = loader.begin_fetch(ResourceKind::Events, query.clone());
        let b = loader.begin_fetch(ResourceKind::Events, query.clone());

        // B completes first.
        assert_eq!(
            loader.complete_fetch(b, Ok(page(&[2])), &mut notes),
            LoaderEvent::PageStaged {
                kind: ResourceKind::Events,
                seq: 2
            }
        );
        assert!(loader.project_into_table(ResourceKind::Events, &query, &mut table));

        // A arrives late and must not overwrite B.
        assert_eq!(
            loader.complete_fetch(a, Ok(page(&[1])), &mut notes),
            LoaderEvent::PageDiscarded {
                kind: ResourceKind::Events,
                seq: 1,
                latest: 2
            }
        );
        assert!(!loader.project_into_table(ResourceKind::Events, &query, &mut table));
        assert_eq!(table.rows(), page(&[2]).rows.as_slice());
    }

    #[test]
    fn superseded_fetch_arriving_first_is_also_discarded() {
        let (mut loader, _backend) = loader();
        let mut notes = Notifications::new();
        let query = Query::default();

        let a = loader.begin_fetch(ResourceKind::Series, query.clone());
        let _b = loader.begin_fetch(ResourceKind::Series, query);
        let event = loader.complete_fetch(a, Err(BackendError::status("u", 500, "")), &mut notes);

        assert!(matches!(event, LoaderEvent::PageDiscarded { seq: 1, .. }));
        assert!(notes.is_empty(), "stale failures are not reported");
    }

    #[test]
    fn failure_notifies_and_leaves_table_untouched() {
        let (mut loader, _backend) = loader();
        let mut notes = Notifications::new();
        let mut table = TableState::new(10);
        table.replace(page(&[7]));
        let query = Query::default();

        let t = loader.begin_fetch(ResourceKind::Events, query.clone());
        let event = loader.complete_fetch(t, Err(BackendError::status("u", 502, "")), &mut notes);

        assert_eq!(
            event,
            LoaderEvent::PageFailed {
                kind: ResourceKind::Events,
                seq: 1
            }
        );
        assert_eq!(notes.len(), 1);
        assert!(!loader.project_into_table(ResourceKind::Events, &query, &mut table));
        assert_eq!(table.rows(), page(&[7]).rows.as_slice());
    }

    #[test]
    fn projection_refuses_page_fetched_with_other_filters() {
        let (mut loader, _backend) = loader();
        let mut notes = Notifications::new();
        let mut table = TableState::new(10);
        let old = Query::default();
        let mut current = Query::default();
        current.filters.insert("status".into(), "published".into());

        let t = loader.begin_fetch(ResourceKind::Events, old);
        loader.complete_fetch(t, Ok(page(&[1])), &mut notes);

        assert!(!loader.project_into_table(ResourceKind::Events, &current, &mut table));
        assert!(!loader.has_staged());
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn projection_round_trip_keeps_rows_total_and_offset() {
        let (mut loader, _backend) = loader();
        let mut notes = Notifications::new();
        let mut table = TableState::new(10);
        table.set_offset(30);
        let query = Query {
            offset: 30,
            limit: 10,
            ..Query::default()
        };

        let t = loader.begin_fetch(ResourceKind::Events, query.clone());
        loader.complete_fetch(t, Ok(page(&[1, 2])), &mut notes);
        assert!(loader.project_into_table(ResourceKind::Events, &query, &mut table));

        assert_eq!(table.offset(), 30);
        assert_eq!(table.total(), 2);
        assert_eq!(table.rows(), page(&[1, 2]).rows.as_slice());
    }

    #[test]
    fn background_fetch_is_delivered_by_poll() {
        let (mut loader, backend) = loader();
        backend.push_page(Ok(page(&[4, 5])));
        let mut filters = FilterStore::new();
        let mut notes = Notifications::new();
        let mut table = TableState::new(10);
        let query = filters.query(&table);

        let seq = loader.fetch(ResourceKind::Events, query.clone());
        let events = wait_for_events(&mut loader, &mut filters, &mut notes);

        assert_eq!(
            events,
            vec![LoaderEvent::PageStaged {
                kind: ResourceKind::Events,
                seq
            }]
        );
        assert!(loader.project_into_table(ResourceKind::Events, &query, &mut table));
        assert_eq!(table.total(), 2);
        assert_eq!(backend.page_call_count(), 1);
    }

    #[test]
    fn stats_failure_keeps_previous_stats() {
        let (mut loader, backend) = loader();
        let mut filters = FilterStore::new();
        let mut notes = Notifications::new();
        let stat = Stat {
            count: 9,
            description: Some("DASHBOARD.TODAY".into()),
            filters: Vec::new(),
        };

        *backend.stats.lock().unwrap() = Some(Ok(vec![stat.clone()]));
        loader.refresh_stats(ResourceKind::Events);
        wait_for_events(&mut loader, &mut filters, &mut notes);
        assert_eq!(filters.stats(), &[stat.clone()]);

        *backend.stats.lock().unwrap() = Some(Err(503));
        loader.refresh_stats(ResourceKind::Events);
        let events = wait_for_events(&mut loader, &mut filters, &mut notes);

        assert_eq!(
            events,
            vec![LoaderEvent::StatsKept {
                kind: ResourceKind::Events
            }]
        );
        assert_eq!(filters.stats(), &[stat]);
        assert!(notes.is_empty());
    }

    #[test]
    fn cancelled_loader_ignores_completions() {
        let (mut loader, backend) = loader();
        let mut filters = FilterStore::new();
        let mut notes = Notifications::new();

        loader.fetch(ResourceKind::Events, Query::default());
        loader.cancel();
        std::thread::sleep(Duration::from_millis(50));

        assert!(loader.poll(&mut filters, &mut notes).is_empty());
        assert!(!loader.has_staged());

        loader.fetch(ResourceKind::Events, Query::default());
        std::thread::sleep(Duration::from_millis(20));
        assert!(backend.page_call_count() <= 1, "no new request after cancel");
    }

    #[test]
    fn delete_reports_through_notifications() {
        let (mut loader, backend) = loader();
        let mut filters = FilterStore::new();
        let mut notes = Notifications::new();

        loader.delete(ResourceKind::Series, vec!["s1".into(), "s2".into()]);
        let events = wait_for_events(&mut loader, &mut filters, &mut notes);

        assert_eq!(
            events,
            vec![LoaderEvent::Deleted {
                kind: ResourceKind::Series,
                deleted: 2,
                failed: 0
            }]
        );
        assert_eq!(backend.deleted.lock().unwrap().len(), 2);
        assert_eq!(notes.len(), 1);
    }
}
