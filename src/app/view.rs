// MediAdmin - app/view.rs
//
// List view: the controller behind the Events and Series screens.
//
// Owns the filter store, table state, loader, notifications, refresh timer
// and outside-click listener of one mounted screen. The GUI calls `poll` and
// `tick` once per frame and routes user input through the methods below;
// rendering reads state through the accessors only.
//
// Lifecycle:
//   Idle --mount--> Loading --first settled fetch--> Ready --unmount--> Idle
//
// Every resource created by `mount` (timer, listener, background loader)
// is released by `unmount`, which is idempotent and also runs on drop.

use crate::app::backend::Backend;
use crate::app::i18n::Translator;
use crate::app::loader::{LoaderEvent, ResourceLoader};
use crate::app::notifications::Notifications;
use crate::app::stats::{self, StatCounter};
use crate::core::access::{ensure_access, Capability, PermissionTable};
use crate::core::filter::FilterStore;
use crate::core::model::{ResourceKind, UserProfile};
use crate::core::pointer::{Bounds, OutsideClickListener};
use crate::core::table::TableState;
use crate::core::timer::RefreshTimer;
use crate::util::constants::{DEFAULT_PAGE_SIZE, DEFAULT_REFRESH_INTERVAL_SECS};
use crate::util::error::AdminError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    /// Not mounted. No timer, no listener, no fetches.
    Idle,
    /// Mounted; the initial fetch has not settled yet.
    Loading,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    NewResource,
    DeleteResources,
}

/// Privileged controls the action bar may render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionControl {
    Create,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub kind: ResourceKind,
    pub active: bool,
}

/// Everything a list view needs from the outside world.
#[derive(Clone)]
pub struct ViewDeps {
    pub backend: Arc<dyn Backend>,
    pub user: Option<UserProfile>,
    pub permissions: PermissionTable,
    pub refresh_interval: Duration,
    pub page_size: u64,
}

impl ViewDeps {
    pub fn new(backend: Arc<dyn Backend>, user: Option<UserProfile>) -> Self {
        Self {
            backend,
            user,
            permissions: PermissionTable::default(),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

pub struct ListView {
    kind: ResourceKind,
    deps: ViewDeps,
    phase: ViewPhase,
    filters: FilterStore,
    table: TableState,
    loader: ResourceLoader,
    notifications: Notifications,
    timer: Option<RefreshTimer>,
    outside_click: Option<OutsideClickListener>,
    menu_open: bool,
    modal: Option<Modal>,
    pending_navigation: Option<ResourceKind>,
    last_refreshed: Option<DateTime<Utc>>,
}

impl ListView {
    /// Create an unmounted view of `kind`.
    pub fn new(kind: ResourceKind, deps: ViewDeps) -> Self {
        let loader = ResourceLoader::new(Arc::clone(&deps.backend));
        let table = TableState::new(deps.page_size);
        Self {
            kind,
            deps,
            phase: ViewPhase::Idle,
            filters: FilterStore::new(),
            table,
            loader,
            notifications: Notifications::new(),
            timer: None,
            outside_click: None,
            menu_open: false,
            modal: None,
            pending_navigation: None,
            last_refreshed: None,
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Mount the view: clear the text filter, load filter definitions, fetch
    /// the first page and the stats, arm the refresh timer and install the
    /// outside-click listener.
    pub fn mount(&mut self, now: Instant) {
        if self.is_mounted() {
            self.unmount();
        }
        tracing::info!(
            kind = %self.kind,
            refresh_secs = self.deps.refresh_interval.as_secs(),
            "Mounting list view"
        );

        self.loader = ResourceLoader::new(Arc::clone(&self.deps.backend));
        self.phase = ViewPhase::Loading;
        self.filters.reset_filter(&mut self.table);
        self.loader.load_filters(self.kind);
        self.reload();
        self.loader.refresh_stats(self.kind);
        self.timer = Some(RefreshTimer::start(self.deps.refresh_interval, now));
        self.outside_click = Some(OutsideClickListener::new());
    }

    /// Release everything `mount` created. Safe to call more than once.
    pub fn unmount(&mut self) {
        if !self.is_mounted() {
            return;
        }
        if let Some(timer) = self.timer.as_mut() {
            timer.cancel();
        }
        self.timer = None;
        self.outside_click = None;
        self.loader.cancel();
        self.menu_open = false;
        self.modal = None;
        self.phase = ViewPhase::Idle;
        tracing::info!(kind = %self.kind, "List view unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.phase != ViewPhase::Idle
    }

    // -------------------------------------------------------------------------
    // Frame loop
    // -------------------------------------------------------------------------

    /// Apply finished background work. Staged pages are projected right away.
    pub fn poll(&mut self) -> Vec<LoaderEvent> {
        if !self.is_mounted() {
            return Vec::new();
        }
        let events = self.loader.poll(&mut self.filters, &mut self.notifications);
        for event in &events {
            match event {
                LoaderEvent::PageStaged { kind, .. } => {
                    if *kind != self.kind {
                        tracing::warn!(
                            view = %self.kind,
                            page = %kind,
                            "Ignoring page of another kind"
                        );
                        continue;
                    }
                    let query = self.filters.query(&self.table);
                    if self.loader.project_into_table(self.kind, &query, &mut self.table) {
                        self.last_refreshed = Some(Utc::now());
                    }
                    self.settle();
                }
                LoaderEvent::PageFailed { .. } => self.settle(),
                LoaderEvent::Deleted { deleted, .. } if *deleted > 0 => {
                    self.reload();
                }
                _ => {}
            }
        }
        events
    }

    fn settle(&mut self) {
        if self.phase == ViewPhase::Loading {
            self.phase = ViewPhase::Ready;
            tracing::debug!(kind = %self.kind, "Initial load settled");
        }
    }

    /// Advance the refresh timer and expire notifications. Returns true if
    /// the timer fired and a reload was issued.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.notifications.expire(now);
        let fired = self.timer.as_mut().is_some_and(|t| t.poll(now));
        if fired {
            tracing::debug!(kind = %self.kind, "Refresh timer fired");
            self.reload();
        }
        fired
    }

    /// How long the frame loop may sleep before the timer needs attention.
    pub fn time_until_refresh(&self, now: Instant) -> Option<Duration> {
        self.timer.as_ref().and_then(|t| t.time_until_due(now))
    }

    /// Fetch the current page with the current filters. Returns the fetch's
    /// sequence number, or None when unmounted.
    pub fn reload(&mut self) -> Option<u64> {
        if !self.is_mounted() {
            return None;
        }
        let query = self.filters.query(&self.table);
        Some(self.loader.fetch(self.kind, query))
    }

    // -------------------------------------------------------------------------
    // Filters, stats, pagination
    // -------------------------------------------------------------------------

    pub fn edit_filter(&mut self, name: &str, value: &str) -> bool {
        if !self.filters.edit_filter(name, value) {
            return false;
        }
        self.table.set_offset(0);
        self.reload();
        true
    }

    pub fn set_text_filter(&mut self, text: &str) -> bool {
        if !self.filters.set_text_filter(text) {
            return false;
        }
        self.table.set_offset(0);
        self.reload();
        true
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear_all(&mut self.table);
        self.reload();
    }

    pub fn stat_counters(&self, translator: &dyn Translator) -> Vec<StatCounter> {
        stats::counters(self.filters.stats(), translator)
    }

    /// Apply the stat at `index` and reload events once.
    /// Apply stat `index` and reload. Stats only drive the events view.
    pub fn activate_stat(&mut self, index: usize) -> Option<u64> {
        if !self.is_mounted() || self.kind != ResourceKind::Events {
            return None;
        }
        let stat = self.filters.stats().get(index).cloned()?;
        Some(stats::activate_stat(
            &stat,
            &mut self.filters,
            &mut self.table,
            &mut self.loader,
        ))
    }

    pub fn next_page(&mut self) -> bool {
        self.table.next_page() && self.reload().is_some()
    }

    pub fn previous_page(&mut self) -> bool {
        self.table.previous_page() && self.reload().is_some()
    }

    pub fn toggle_row(&mut self, index: usize) {
        self.table.toggle_selection(index);
        if !self.table.has_selection() {
            self.menu_open = false;
        }
    }

    // -------------------------------------------------------------------------
    // Access-gated controls
    // -------------------------------------------------------------------------

    pub fn can(&self, capability: Capability) -> bool {
        self.can_for(self.kind, capability)
    }

    fn can_for(&self, kind: ResourceKind, capability: Capability) -> bool {
        self.deps
            .permissions
            .for_kind(kind)
            .allows(capability, self.deps.user.as_ref())
    }

    /// Controls the user is allowed to see. A control missing here must not
    /// be rendered at all.
    pub fn action_controls(&self) -> Vec<ActionControl> {
        let mut controls = Vec::with_capacity(2);
        if self.can(Capability::Create) {
            controls.push(ActionControl::Create);
        }
        if self.can(Capability::Delete) {
            controls.push(ActionControl::Delete);
        }
        controls
    }

    /// Navigation entries for the kinds the user may view.
    pub fn nav_links(&self) -> Vec<NavLink> {
        ResourceKind::all()
            .iter()
            .filter(|k| self.can_for(**k, Capability::View))
            .map(|k| NavLink {
                kind: *k,
                active: *k == self.kind,
            })
            .collect()
    }

    /// Ask the shell to switch to `kind`. Ignored without view access.
    pub fn request_navigation(&mut self, kind: ResourceKind) -> bool {
        if kind == self.kind || !self.can_for(kind, Capability::View) {
            return false;
        }
        self.pending_navigation = Some(kind);
        true
    }

    pub fn take_navigation(&mut self) -> Option<ResourceKind> {
        self.pending_navigation.take()
    }

    // -------------------------------------------------------------------------
    // Bulk action menu and modals
    // -------------------------------------------------------------------------

    /// The bulk action menu is usable only while rows are selected.
    pub fn actions_enabled(&self) -> bool {
        self.table.has_selection()
    }

    pub fn toggle_action_menu(&mut self) {
        if !self.actions_enabled() {
            return;
        }
        self.menu_open = !self.menu_open;
    }

    pub fn set_action_container(&mut self, bounds: Bounds) {
        if let Some(listener) = self.outside_click.as_mut() {
            listener.set_container(bounds);
        }
    }

    /// Route a pointer press. Closes the action menu when the press lands
    /// outside its container. Returns true if the menu was closed.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        if !self.menu_open {
            return false;
        }
        let outside = self
            .outside_click
            .as_ref()
            .is_some_and(|l| l.is_outside(x, y));
        if outside {
            self.menu_open = false;
        }
        outside
    }

    pub fn open_modal(&mut self, modal: Modal) -> bool {
        let allowed = match modal {
            Modal::NewResource => self.can(Capability::Create),
            Modal::DeleteResources => self.can(Capability::Delete) && self.table.has_selection(),
        };
        if allowed {
            self.menu_open = false;
            self.modal = Some(modal);
        }
        allowed
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Delete the selected rows in the background. The permission is checked
    /// here as well as in the UI. Returns the number of deletes issued.
    pub fn delete_selected(&mut self) -> Result<usize, AdminError> {
        let permission = self
            .deps
            .permissions
            .for_kind(self.kind)
            .name_for(Capability::Delete)
            .to_string();
        ensure_access(&permission, self.deps.user.as_ref())?;

        self.modal = None;
        self.menu_open = false;
        if !self.is_mounted() {
            return Ok(0);
        }
        let ids = self.table.selected_ids();
        let count = ids.len();
        if count > 0 {
            self.loader.delete(self.kind, ids);
            self.table.clear_selection();
        }
        Ok(count)
    }

    // -------------------------------------------------------------------------
    // Read access for rendering
    // -------------------------------------------------------------------------

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    pub fn filters(&self) -> &FilterStore {
        &self.filters
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn dismiss_notification(&mut self, id: u64) {
        self.notifications.dismiss(id);
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.deps.user.as_ref()
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn modal(&self) -> Option<Modal> {
        self.modal
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    pub fn has_outside_click_listener(&self) -> bool {
        self.outside_click.is_some()
    }

    pub fn timer_armed(&self) -> bool {
        self.timer.as_ref().is_some_and(RefreshTimer::is_armed)
    }

    pub fn fetches_in_flight(&self) -> usize {
        self.loader.pending()
    }
}

impl Drop for ListView {
    fn drop(&mut self) {
        self.unmount();
    }
}
