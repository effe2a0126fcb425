// MediAdmin - core/filter.rs
//
// Filter store: the named filters of a list view, its free-text filter, and
// the stats derived from them. Produces the `Query` sent with every fetch.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{Filter, Stat};
use crate::core::table::TableState;
use crate::util::constants::TEXT_FILTER_NAME;
use std::collections::{BTreeMap, HashMap};

/// Snapshot of the filter store plus pagination, attached to every fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    /// Active filters (non-empty values only), ordered by name.
    pub filters: BTreeMap<String, String>,
    /// Free-text filter. Empty = no text filter.
    pub text: String,
    pub offset: u64,
    pub limit: u64,
}

impl Query {
    /// Serialise to backend query parameters.
    ///
    /// Filters travel as one `filter=name:value,...` parameter with the text
    /// filter under the reserved name `textFilter`; the parameter is omitted
    /// when nothing is active.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut parts: Vec<String> = self
            .filters
            .iter()
            .map(|(name, value)| format!("{name}:{value}"))
            .collect();
        if !self.text.is_empty() {
            parts.push(format!("{TEXT_FILTER_NAME}:{}", self.text));
        }

        let mut params = Vec::with_capacity(3);
        if !parts.is_empty() {
            params.push(("filter".to_string(), parts.join(",")));
        }
        params.push(("limit".to_string(), self.limit.to_string()));
        params.push(("offset".to_string(), self.offset.to_string()));
        params
    }
}

/// Outcome of [`FilterStore::apply_stat`]. Receiving it is the
/// "filters changed" signal: the caller reloads once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a stat application must be followed by a reload"]
pub struct StatApplied {
    /// Filter values written.
    pub applied: usize,
    /// References to filters that do not exist in the store.
    pub skipped: usize,
}

/// Named filters, text filter and stats of one list view.
#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    filters: HashMap<String, Filter>,
    text_filter: String,
    stats: Vec<Stat>,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filters(filters: impl IntoIterator<Item = Filter>) -> Self {
        let mut store = Self::new();
        store.replace_filters(filters);
        store
    }

    // -------------------------------------------------------------------------
    // Filter definitions
    // -------------------------------------------------------------------------

    /// Install filter definitions served by the backend. Values of filters
    /// that exist both before and after are kept; all others are dropped.
    pub fn replace_filters(&mut self, filters: impl IntoIterator<Item = Filter>) {
        let mut previous = std::mem::take(&mut self.filters);
        for mut filter in filters {
            if filter.value.is_empty() {
                if let Some(old) = previous.remove(&filter.name) {
                    filter.value = old.value;
                }
            }
            self.filters.insert(filter.name.clone(), filter);
        }
        tracing::debug!(filters = self.filters.len(), "Filter definitions replaced");
    }

    pub fn filter(&self, name: &str) -> Option<&Filter> {
        self.filters.get(name)
    }

    /// All filters ordered by name.
    pub fn filters(&self) -> Vec<&Filter> {
        let mut list: Vec<&Filter> = self.filters.values().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    // -------------------------------------------------------------------------
    // Edits
    // -------------------------------------------------------------------------

    /// Set the value of filter `name`. Unknown names are ignored.
    /// Returns true if the stored value changed.
    pub fn edit_filter(&mut self, name: &str, value: &str) -> bool {
        let Some(filter) = self.filters.get_mut(name) else {
            tracing::debug!(filter = name, "Ignoring edit of unknown filter");
            return false;
        };
        if filter.value == value {
            return false;
        }
        filter.value = value.to_string();
        true
    }

    pub fn text_filter(&self) -> &str {
        &self.text_filter
    }

    /// Set the free-text filter. Returns true if it changed.
    pub fn set_text_filter(&mut self, text: &str) -> bool {
        if self.text_filter == text {
            return false;
        }
        self.text_filter = text.to_string();
        true
    }

    /// Clear the text filter and rewind pagination to the first page.
    /// The caller is responsible for reloading.
    pub fn reset_filter(&mut self, table: &mut TableState) {
        self.text_filter.clear();
        table.set_offset(0);
    }

    /// Clear every filter value and the text filter, and rewind pagination.
    pub fn clear_all(&mut self, table: &mut TableState) {
        for filter in self.filters.values_mut() {
            filter.value.clear();
        }
        self.reset_filter(table);
    }

    pub fn active_count(&self) -> usize {
        self.filters.values().filter(|f| f.is_active()).count()
            + usize::from(!self.text_filter.is_empty())
    }

    // -------------------------------------------------------------------------
    // Stats
    // -------------------------------------------------------------------------

    pub fn stats(&self) -> &[Stat] {
        &self.stats
    }

    /// Replace the whole stats collection.
    pub fn replace_stats(&mut self, stats: Vec<Stat>) {
        self.stats = stats;
    }

    /// Write every (filter, value) pair of `stat` whose filter exists.
    /// References to unknown filters are skipped silently.
    pub fn apply_stat(&mut self, stat: &Stat) -> StatApplied {
        let mut applied = 0;
        let mut skipped = 0;
        for pair in &stat.filters {
            match self.filters.get_mut(&pair.name) {
                Some(filter) => {
                    filter.value = pair.value.clone();
                    applied += 1;
                }
                None => skipped += 1,
            }
        }
        tracing::debug!(applied, skipped, "Stat applied to filters");
        StatApplied { applied, skipped }
    }

    // -------------------------------------------------------------------------
    // Query
    // -------------------------------------------------------------------------

    /// Snapshot of the current filters with the pagination of `table`.
    pub fn query(&self, table: &TableState) -> Query {
        Query {
            filters: self
                .filters
                .values()
                .filter(|f| f.is_active())
                .map(|f| (f.name.clone(), f.value.clone()))
                .collect(),
            text: self.text_filter.clone(),
            offset: table.offset(),
            limit: table.page_size(),
        }
    }
}
