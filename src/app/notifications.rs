// MediAdmin - app/notifications.rs
//
// Transient user-visible messages. Fetch failures land here; the view
// renders whatever is active and expires entries each frame. Messages are
// stored as catalog keys plus placeholder arguments and translated when
// rendered.

use crate::app::i18n::Translator;
use crate::util::constants::{MAX_NOTIFICATIONS, NOTIFICATION_DURATION_SECS};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    /// Catalog key of the message.
    pub key: String,
    /// Values for the key's `{{name}}` placeholders.
    pub args: Vec<(&'static str, String)>,
    /// Wall-clock time for display.
    pub raised_at: DateTime<Utc>,
    expires_at: Instant,
}

impl Notification {
    /// The message in the catalog's language.
    pub fn text(&self, translator: &dyn Translator) -> String {
        translator.translate_with(&self.key, &self.args)
    }
}

#[derive(Debug)]
pub struct Notifications {
    items: VecDeque<Notification>,
    next_id: u64,
    duration: Duration,
}

impl Notifications {
    pub fn new() -> Self {
        Self::with_duration(Duration::from_secs(NOTIFICATION_DURATION_SECS))
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            next_id: 1,
            duration,
        }
    }

    pub fn push(&mut self, kind: NotificationKind, key: impl Into<String>) -> u64 {
        self.push_with(kind, key, Vec::new())
    }

    pub fn push_with(
        &mut self,
        kind: NotificationKind,
        key: impl Into<String>,
        args: Vec<(&'static str, String)>,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        if self.items.len() >= MAX_NOTIFICATIONS {
            self.items.pop_front();
        }
        self.items.push_back(Notification {
            id,
            kind,
            key: key.into(),
            args,
            raised_at: Utc::now(),
            expires_at: Instant::now() + self.duration,
        });
        id
    }

    pub fn error(&mut self, key: impl Into<String>) -> u64 {
        self.push(NotificationKind::Error, key)
    }

    pub fn error_with(&mut self, key: impl Into<String>, args: Vec<(&'static str, String)>) -> u64 {
        self.push_with(NotificationKind::Error, key, args)
    }

    pub fn info(&mut self, key: impl Into<String>) -> u64 {
        self.push(NotificationKind::Info, key)
    }

    pub fn info_with(&mut self, key: impl Into<String>, args: Vec<(&'static str, String)>) -> u64 {
        self.push_with(NotificationKind::Info, key, args)
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|n| n.id != id);
    }

    /// Drop every notification whose display time has passed at `now`.
    pub fn expire(&mut self, now: Instant) {
        self.items.retain(|n| n.expires_at > now);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Active notifications, oldest first.
    pub fn active(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::i18n::Catalog;

    #[test]
    fn expired_notifications_are_dropped() {
        let mut notes = Notifications::with_duration(Duration::from_secs(5));
        notes.error("boom");
        assert_eq!(notes.len(), 1);
        notes.expire(Instant::now());
        assert_eq!(notes.len(), 1);
        notes.expire(Instant::now() + Duration::from_secs(6));
        assert!(notes.is_empty());
    }

    #[test]
    fn queue_is_bounded() {
        let mut notes = Notifications::new();
        for i in 0..(MAX_NOTIFICATIONS + 3) {
            notes.info(format!("n{i}"));
        }
        assert_eq!(notes.len(), MAX_NOTIFICATIONS);
        assert_eq!(notes.active().next().map(|n| n.key.as_str()), Some("n3"));
    }

    #[test]
    fn dismiss_removes_by_id() {
        let mut notes = Notifications::new();
        let a = notes.error("a");
        notes.error("b");
        notes.dismiss(a);
        let left: Vec<&str> = notes.active().map(|n| n.key.as_str()).collect();
        assert_eq!(left, vec!["b"]);
    }

    #[test]
    fn text_is_translated_with_arguments() {
        let catalog = Catalog::bundled();
        let mut notes = Notifications::new();
        notes.error_with(
            "NOTIFICATIONS.DELETE_FAILED",
            vec![("id", "s-1".to_string()), ("error", "gone".to_string())],
        );
        notes.info("UNKNOWN.KEY");
        let texts: Vec<String> = notes.active().map(|n| n.text(&catalog)).collect();
        assert_eq!(texts, vec!["Deleting s-1 failed: gone", "UNKNOWN.KEY"]);

        let german = Catalog::from_json_str(
            r#"{"NOTIFICATIONS": {"DELETE_FAILED": "Löschen von {{id}} fehlgeschlagen"}}"#,
        )
        .unwrap();
        assert_eq!(
            notes.active().next().unwrap().text(&german),
            "Löschen von s-1 fehlgeschlagen"
        );
    }
}
