//! Change notification bus: the append-only update log and its live
//! broadcast.
//!
//! Every façade mutation lands here as an [`UpdateRecord`] appended to the
//! primary-tier log (with a fire-and-forget mirror append), optionally
//! derives a user-facing notification, and is finally broadcast to
//! subscribers. Each step swallows its own failures; a derivation failure
//! never suppresses the broadcast.

use crate::api::DataStore;
use crate::events::Subscription;
use crate::model::{
    timestamp_id, Collection, UpdateAction, UpdateDigest, UpdateRecord,
};
use crate::store::KeyValueBackend;
use chrono::Utc;
use log::warn;
use serde_json::Value;

/// How many digests [`DataStore::recent_updates`] returns at most.
const RECENT_LIMIT: usize = 5;

impl<B: KeyValueBackend> DataStore<B> {
    /// Appends an update record for one mutation and broadcasts it.
    pub(crate) fn record_update(
        &self,
        collection: Collection,
        action: UpdateAction,
        data: Option<Value>,
    ) {
        let update = UpdateRecord {
            id: timestamp_id(),
            timestamp: Utc::now(),
            store_name: collection,
            action,
            data,
        };

        match serde_json::to_value(&update) {
            Ok(value) => {
                let mut log = self.read_or_empty(Collection::Updates);
                log.push(value.clone());
                if let Err(err) = self.primary.write(Collection::Updates, &log) {
                    warn!("update log write failed: {err}");
                }
                if let Some(mirror) = &self.mirror {
                    mirror.insert(Collection::Updates, value);
                }
            }
            Err(err) => warn!("update record serialization failed: {err}"),
        }

        if matches!(action, UpdateAction::Add | UpdateAction::Update) && collection.announces() {
            self.create_notification(collection, action, update.data.as_ref());
        }

        self.updates_bus.emit(&update);
    }

    /// The five most recent updates, newest first, as display digests.
    pub fn recent_updates(&self) -> Vec<UpdateDigest> {
        let mut updates: Vec<UpdateRecord> = self
            .get_data(Collection::Updates)
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();
        updates.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        updates
            .into_iter()
            .take(RECENT_LIMIT)
            .map(digest)
            .collect()
    }

    /// Dismisses an update by removing it from the log. Always `true`.
    pub fn mark_update_as_read(&self, id: &str) -> bool {
        let mut log = self.read_or_empty(Collection::Updates);
        log.retain(|u| u.get("id").and_then(Value::as_str) != Some(id));
        if let Err(err) = self.primary.write(Collection::Updates, &log) {
            warn!("update log write failed: {err}");
        }
        if let Some(mirror) = &self.mirror {
            mirror.delete(Collection::Updates, id);
        }
        true
    }

    /// Registers a callback for every future update broadcast. The callback
    /// stays registered until the returned guard is dropped.
    pub fn subscribe_to_updates(
        &self,
        callback: impl Fn(&UpdateRecord) + Send + Sync + 'static,
    ) -> Subscription<UpdateRecord> {
        self.updates_bus.subscribe(callback)
    }
}

fn digest(update: UpdateRecord) -> UpdateDigest {
    let item_title = update
        .data
        .as_ref()
        .and_then(|d| d.get("title"))
        .and_then(Value::as_str)
        .unwrap_or("Untitled");

    let (title, message) = match update.store_name {
        Collection::Lessons => (
            format!("New Lesson: {item_title}"),
            "A new lesson has been added.".to_string(),
        ),
        Collection::Events => (
            format!("New Event: {item_title}"),
            "A new event has been scheduled.".to_string(),
        ),
        Collection::Flashcards => (
            format!("New Flashcard Set: {item_title}"),
            "A new flashcard set has been created.".to_string(),
        ),
        Collection::Quizzes => (
            format!("New Quiz: {item_title}"),
            "A new quiz has been added.".to_string(),
        ),
        _ => (String::new(), String::new()),
    };

    UpdateDigest {
        id: update.id,
        title,
        message,
        timestamp: update.timestamp,
        kind: "update".to_string(),
    }
}
