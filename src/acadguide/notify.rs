//! Notification derivation and the notification log.
//!
//! Add/update mutations on the four live collections (lessons, events,
//! flashcards, quizzes) map to a fixed table of human-readable titles and
//! messages. Other combinations produce an untitled notification — a
//! degenerate but non-fatal case kept for parity with the update log.

use crate::api::DataStore;
use crate::events::Subscription;
use crate::model::{
    timestamp_id, Collection, Notification, RelatedTo, UpdateAction,
};
use crate::store::KeyValueBackend;
use chrono::Utc;
use log::warn;
use serde_json::Value;

impl<B: KeyValueBackend> DataStore<B> {
    /// Derives and persists a notification for one mutation, then broadcasts
    /// it on the notification channel.
    pub(crate) fn create_notification(
        &self,
        collection: Collection,
        action: UpdateAction,
        data: Option<&Value>,
    ) {
        let (title, message) = derive_template(collection, action, data);
        let notification = Notification {
            id: timestamp_id(),
            title,
            message,
            timestamp: Utc::now(),
            read: false,
            related_to: RelatedTo {
                kind: collection.as_str().to_string(),
                id: data
                    .and_then(|d| d.get("id"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            },
        };

        match serde_json::to_value(&notification) {
            Ok(value) => {
                let mut log = self.read_or_empty(Collection::Notifications);
                log.push(value.clone());
                if let Err(err) = self.primary.write(Collection::Notifications, &log) {
                    warn!("notification log write failed: {err}");
                }
                if let Some(mirror) = &self.mirror {
                    mirror.insert(Collection::Notifications, value);
                }
            }
            Err(err) => warn!("notification serialization failed: {err}"),
        }

        self.notifications_bus.emit(&notification);
    }

    /// All notifications, via the standard dual-tier fallback.
    pub fn get_notifications(&self) -> Vec<Notification> {
        self.get_data(Collection::Notifications)
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect()
    }

    /// Flags a notification as read in both tiers. Always `true`.
    pub fn mark_notification_as_read(&self, id: &str) -> bool {
        let mut log = self.read_or_empty(Collection::Notifications);
        let mut updated = None;
        for entry in log.iter_mut() {
            if entry.get("id").and_then(Value::as_str) == Some(id) {
                if let Some(object) = entry.as_object_mut() {
                    object.insert("read".to_string(), Value::Bool(true));
                }
                updated = Some(entry.clone());
            }
        }
        if let Some(record) = updated {
            if let Err(err) = self.primary.write(Collection::Notifications, &log) {
                warn!("notification log write failed: {err}");
            }
            if let Some(mirror) = &self.mirror {
                mirror.put(Collection::Notifications, record);
            }
        }
        true
    }

    /// Registers a callback for every future notification broadcast.
    pub fn subscribe_to_notifications(
        &self,
        callback: impl Fn(&Notification) + Send + Sync + 'static,
    ) -> Subscription<Notification> {
        self.notifications_bus.subscribe(callback)
    }
}

fn derive_template(
    collection: Collection,
    action: UpdateAction,
    data: Option<&Value>,
) -> (String, String) {
    let item_title = data
        .and_then(|d| d.get("title"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    match (collection, action) {
        (Collection::Lessons, UpdateAction::Add) => (
            "New Lesson Available".to_string(),
            format!(
                "A new lesson has been added to your {}.",
                if data.and_then(|d| d.get("courseId")).is_some() {
                    "course"
                } else {
                    "courses"
                }
            ),
        ),
        (Collection::Events, UpdateAction::Add) => (
            "New Event Announced".to_string(),
            format!("A new event \"{item_title}\" has been scheduled."),
        ),
        (Collection::Flashcards, UpdateAction::Add) => (
            "New Flashcard Set Available".to_string(),
            "A new flashcard set has been added for your studies.".to_string(),
        ),
        (Collection::Quizzes, UpdateAction::Add) => (
            "New Quiz Available".to_string(),
            "A new quiz has been added to test your knowledge.".to_string(),
        ),
        (Collection::Lessons, UpdateAction::Update) => (
            "Lesson Updated".to_string(),
            "A lesson in your courses has been updated with new content.".to_string(),
        ),
        (Collection::Events, UpdateAction::Update) => (
            "Event Details Updated".to_string(),
            format!("The details for event \"{item_title}\" have been updated."),
        ),
        (Collection::Flashcards, UpdateAction::Update) => (
            "Flashcard Set Updated".to_string(),
            "A flashcard set has been updated with new content.".to_string(),
        ),
        (Collection::Quizzes, UpdateAction::Update) => (
            "Quiz Updated".to_string(),
            "A quiz has been updated with new questions or content.".to_string(),
        ),
        _ => (String::new(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_combinations_have_titles() {
        for collection in [
            Collection::Lessons,
            Collection::Events,
            Collection::Flashcards,
            Collection::Quizzes,
        ] {
            for action in [UpdateAction::Add, UpdateAction::Update] {
                let (title, message) = derive_template(collection, action, None);
                assert!(!title.is_empty(), "{collection}/{action:?}");
                assert!(!message.is_empty(), "{collection}/{action:?}");
            }
        }
    }

    #[test]
    fn unknown_combinations_are_untitled() {
        let (title, message) =
            derive_template(Collection::Departments, UpdateAction::Add, None);
        assert!(title.is_empty());
        assert!(message.is_empty());
    }

    #[test]
    fn event_add_includes_the_event_title() {
        let data = serde_json::json!({"id": "e1", "title": "Orientation"});
        let (_, message) = derive_template(Collection::Events, UpdateAction::Add, Some(&data));
        assert!(message.contains("Orientation"));
    }
}
