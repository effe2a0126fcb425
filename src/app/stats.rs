// MediAdmin - app/stats.rs
//
// Stats panel logic: turns the stats held by the filter store into
// displayable counters, and applies a clicked stat to the filters.

use crate::app::i18n::Translator;
use crate::app::loader::ResourceLoader;
use crate::core::filter::FilterStore;
use crate::core::model::{ResourceKind, Stat};
use crate::core::table::TableState;

/// One clickable counter as the panel renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCounter {
    /// Position in the stats collection; passed back on click.
    pub index: usize,
    pub count: u64,
    pub label: String,
}

/// Label for a stat: its translated description, or the filter pairs it
/// stands for when the backend sent no description.
pub fn stat_label(stat: &Stat, translator: &dyn Translator) -> String {
    if let Some(description) = stat.description.as_deref().filter(|d| !d.is_empty()) {
        return translator.translate(description);
    }
    stat.filters
        .iter()
        .map(|f| {
            let name = if f.filter.is_empty() { &f.name } else { &f.filter };
            format!("{}: {}", translator.translate(name), translator.translate(&f.value))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Counters in backend order.
pub fn counters(stats: &[Stat], translator: &dyn Translator) -> Vec<StatCounter> {
    stats
        .iter()
        .enumerate()
        .map(|(index, stat)| StatCounter {
            index,
            count: stat.count,
            label: stat_label(stat, translator),
        })
        .collect()
}

/// Apply `stat` to the event filters and reload the first page of events.
///
/// Every referenced filter is written before the single reload is issued,
/// so the fetch carries all of the stat's values at once.
pub fn activate_stat(
    stat: &Stat,
    filters: &mut FilterStore,
    table: &mut TableState,
    loader: &mut ResourceLoader,
) -> u64 {
    let outcome = filters.apply_stat(stat);
    table.set_offset(0);
    let seq = loader.fetch(ResourceKind::Events, filters.query(table));
    tracing::info!(
        count = stat.count,
        applied = outcome.applied,
        skipped = outcome.skipped,
        seq,
        "Stat activated"
    );
    seq
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::backend::fake::FakeBackend;
    use crate::app::i18n::Catalog;
    use crate::core::model::{Filter, StatFilter};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn published_stat() -> Stat {
        Stat {
            count: 12,
            description: None,
            filters: vec![StatFilter {
                name: "status".into(),
                value: "published".into(),
                filter: "FILTERS.EVENTS.STATUS.LABEL".into(),
            }],
        }
    }

    #[test]
    fn label_prefers_translated_description() {
        let catalog = Catalog::from_json_str(r#"{"DASHBOARD": {"TODAY": "Today"}}"#).unwrap();
        let mut stat = published_stat();
        stat.description = Some("DASHBOARD.TODAY".into());
        assert_eq!(stat_label(&stat, &catalog), "Today");
    }

    #[test]
    fn label_falls_back_to_filter_pairs() {
        let catalog = Catalog::empty();
        assert_eq!(
            stat_label(&published_stat(), &catalog),
            "FILTERS.EVENTS.STATUS.LABEL: published"
        );
        let list = counters(&[published_stat(), published_stat()], &catalog);
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].index, 1);
        assert_eq!(list[1].count, 12);
    }

    #[test]
    fn activating_a_stat_sets_filters_and_reloads_once() {
        let backend = Arc::new(FakeBackend::default());
        let mut loader = ResourceLoader::new(backend.clone());
        let mut filters = FilterStore::with_filters(vec![
            Filter::new("status", "Status"),
            Filter::new("series", "Series"),
        ]);
        let mut table = TableState::new(10);
        table.set_offset(40);

        activate_stat(&published_stat(), &mut filters, &mut table, &mut loader);

        assert_eq!(filters.filter("status").unwrap().value, "published");
        assert_eq!(table.offset(), 0);

        let deadline = Instant::now() + Duration::from_secs(5);
        while backend.page_call_count() == 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        std::thread::sleep(Duration::from_millis(20));

        let calls = backend.page_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (kind, query) = &calls[0];
        assert_eq!(*kind, ResourceKind::Events);
        assert_eq!(query.filters.get("status").map(String::as_str), Some("published"));
        assert_eq!(query.offset, 0);
    }

    #[test]
    fn unknown_stat_filters_are_skipped_but_reload_still_happens() {
        let backend = Arc::new(FakeBackend::default());
        let mut loader = ResourceLoader::new(backend);
        let mut filters = FilterStore::new();
        let mut table = TableState::new(10);

        let seq = activate_stat(&published_stat(), &mut filters, &mut table, &mut loader);

        assert_eq!(seq, 1);
        assert_eq!(loader.latest_seq(), 1);
        assert!(filters.filter("status").is_none());
    }
}
