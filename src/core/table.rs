// MediAdmin - core/table.rs
//
// Table state: the materialised, paginated page of a resource currently
// rendered. Rows are replaced wholesale on every projection.

use crate::core::model::{ResourcePage, ResourceRow};
use crate::util::constants::ROW_ID_FIELD;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct TableState {
    /// Pagination cursor: index of the first row of the current page.
    offset: u64,
    /// Rows requested per page.
    page_size: u64,
    rows: Vec<ResourceRow>,
    /// Total rows matching the query on the backend.
    total: u64,
    /// Indices into `rows` selected for bulk actions.
    selected: BTreeSet<usize>,
}

impl TableState {
    pub fn new(page_size: u64) -> Self {
        Self {
            offset: 0,
            page_size: page_size.max(1),
            rows: Vec::new(),
            total: 0,
            selected: BTreeSet::new(),
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: u64) {
        self.offset = offset;
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn rows(&self) -> &[ResourceRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Replace the materialised rows with `page`. The offset is left as is;
    /// the selection refers to the old rows and is cleared.
    pub fn replace(&mut self, page: ResourcePage) {
        self.rows = page.rows;
        self.total = page.total;
        self.selected.clear();
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Zero-based index of the current page.
    pub fn current_page(&self) -> u64 {
        self.offset / self.page_size
    }

    /// Number of pages needed for `total` rows (at least one).
    pub fn page_count(&self) -> u64 {
        self.total.div_ceil(self.page_size).max(1)
    }

    pub fn has_next_page(&self) -> bool {
        self.offset + self.page_size < self.total
    }

    pub fn has_previous_page(&self) -> bool {
        self.offset > 0
    }

    /// Advance the cursor one page. Returns false when already on the last page.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next_page() {
            return false;
        }
        self.offset += self.page_size;
        true
    }

    /// Move the cursor back one page. Returns false when already on the first page.
    pub fn previous_page(&mut self) -> bool {
        if !self.has_previous_page() {
            return false;
        }
        self.offset = self.offset.saturating_sub(self.page_size);
        true
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Toggle selection of the row at `index`. Out-of-range indices are ignored.
    pub fn toggle_selection(&mut self, index: usize) {
        if index >= self.rows.len() {
            return;
        }
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn selection_len(&self) -> usize {
        self.selected.len()
    }

    /// Backend identifiers of the selected rows. Rows without a usable `id`
    /// field are skipped.
    pub fn selected_ids(&self) -> Vec<String> {
        self.selected
            .iter()
            .filter_map(|&i| self.rows.get(i))
            .filter_map(|row| match row.get(ROW_ID_FIELD)? {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> ResourceRow {
        match value {
            serde_json::Value::Object(map) => map,
            _ => unreachable!("test rows are objects"),
        }
    }

    #[test]
    fn replace_keeps_order_total_and_offset() {
        let mut table = TableState::new(10);
        table.set_offset(20);
        table.replace(ResourcePage {
            rows: vec![row(json!({"id": 1})), row(json!({"id": 2}))],
            total: 2,
        });
        assert_eq!(table.offset(), 20);
        assert_eq!(table.total(), 2);
        assert_eq!(
            table.rows(),
            &[row(json!({"id": 1})), row(json!({"id": 2}))]
        );
    }

    #[test]
    fn replace_recomputes_rather_than_appends() {
        let mut table = TableState::new(10);
        table.replace(ResourcePage {
            rows: vec![row(json!({"id": 1})), row(json!({"id": 2}))],
            total: 2,
        });
        table.replace(ResourcePage {
            rows: vec![row(json!({"id": 3}))],
            total: 1,
        });
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.total(), 1);
    }

    #[test]
    fn pagination_stops_at_bounds() {
        let mut table = TableState::new(10);
        table.replace(ResourcePage {
            rows: Vec::new(),
            total: 25,
        });
        assert_eq!(table.page_count(), 3);
        assert!(!table.previous_page());
        assert!(table.next_page());
        assert!(table.next_page());
        assert_eq!(table.offset(), 20);
        assert_eq!(table.current_page(), 2);
        assert!(!table.next_page());
        assert!(table.previous_page());
        assert_eq!(table.offset(), 10);
    }

    #[test]
    fn selection_is_cleared_on_replace() {
        let mut table = TableState::new(10);
        table.replace(ResourcePage {
            rows: vec![row(json!({"id": "a"})), row(json!({"id": 7})), row(json!({}))],
            total: 3,
        });
        table.toggle_selection(0);
        table.toggle_selection(1);
        table.toggle_selection(2);
        table.toggle_selection(9);
        assert_eq!(table.selection_len(), 3);
        assert_eq!(table.selected_ids(), vec!["a".to_string(), "7".to_string()]);

        table.replace(ResourcePage::default());
        assert!(!table.has_selection());
    }
}
