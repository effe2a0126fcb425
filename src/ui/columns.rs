// MediAdmin - ui/columns.rs
//
// Column templates for the resource tables and cell text extraction from
// opaque backend rows.

use crate::core::model::{ResourceKind, ResourceRow};
use serde_json::Value;

/// One table column: the row field it reads and its header translation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub field: &'static str,
    pub label_key: &'static str,
    /// Cell values are translation keys themselves (e.g. status codes).
    pub translate: bool,
}

const fn col(field: &'static str, label_key: &'static str) -> Column {
    Column {
        field,
        label_key,
        translate: false,
    }
}

const EVENT_COLUMNS: &[Column] = &[
    col("title", "EVENTS.EVENTS.TABLE.TITLE"),
    col("presenters", "EVENTS.EVENTS.TABLE.PRESENTERS"),
    col("series", "EVENTS.EVENTS.TABLE.SERIES"),
    col("start_date", "EVENTS.EVENTS.TABLE.DATE"),
    col("location", "EVENTS.EVENTS.TABLE.LOCATION"),
    Column {
        field: "event_status",
        label_key: "EVENTS.EVENTS.TABLE.STATUS",
        translate: true,
    },
];

const SERIES_COLUMNS: &[Column] = &[
    col("title", "EVENTS.SERIES.TABLE.TITLE"),
    col("organizers", "EVENTS.SERIES.TABLE.ORGANIZERS"),
    col("contributors", "EVENTS.SERIES.TABLE.CONTRIBUTORS"),
    col("createdDateTime", "EVENTS.SERIES.TABLE.CREATED"),
];

pub fn columns_for(kind: ResourceKind) -> &'static [Column] {
    match kind {
        ResourceKind::Events => EVENT_COLUMNS,
        ResourceKind::Series => SERIES_COLUMNS,
    }
}

/// Display text of `field` in `row`.
///
/// Strings and numbers render as-is, arrays are joined with ", ", and
/// objects render their `title` (or `name`) member. Missing fields and
/// nulls render empty.
pub fn cell_text(row: &ResourceRow, field: &str) -> String {
    row.get(field).map(value_text).unwrap_or_default()
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => map
            .get("title")
            .or_else(|| map.get("name"))
            .map(value_text)
            .unwrap_or_default(),
    }
}
