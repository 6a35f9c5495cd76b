//! # Data access façade
//!
//! [`DataStore`] is the single entry point for all portal data operations.
//! It composes the primary tier, the optional mirror, and the two event
//! buses, and implements the fan-out/fallback policy:
//!
//! - **Writes** hit the primary tier synchronously first, then
//!   fire-and-forget a mirror write. The mirror outcome never affects the
//!   caller's result — bulk writes report success unconditionally once the
//!   primary write has been attempted. This is a documented best-effort
//!   contract ("never block the user"), not a bug.
//! - **Reads** prefer the primary tier; a miss falls through to the mirror
//!   (opportunistically back-filling the primary), then to the built-in
//!   default department list for `departments`, then to empty.
//! - **No façade operation returns an error or panics.** Internal failures
//!   are logged and mapped to the documented safe default. UI callers get
//!   silently missing data, never an exception.
//!
//! Generic over [`KeyValueBackend`]: production uses
//! [`FileBackend`](crate::store::FileBackend), tests use
//! [`MemoryBackend`](crate::store::MemoryBackend).

use crate::events::EventBus;
use crate::mirror::Mirror;
use crate::model::{
    default_departments, Collection, Department, Notification, UpdateAction, UpdateRecord,
};
use crate::store::{KeyValueBackend, PrimaryStore};
use crate::validate::{filter_valid, is_valid, record_id};
use log::warn;
use serde_json::Value;

/// Primary-tier key holding the logged-in user profile. Written by external
/// bootstrap code; read-only from the store's perspective.
pub const USER_KEY: &str = "acadGuideUser";

/// Primary-tier flag guarding one-time seed population. Owned by external
/// bootstrap code; documented here for the key namespace only.
pub const INITIALIZED_KEY: &str = "acadGuideInitialized";

pub struct DataStore<B: KeyValueBackend> {
    pub(crate) primary: PrimaryStore<B>,
    pub(crate) mirror: Option<Mirror>,
    pub(crate) updates_bus: EventBus<UpdateRecord>,
    pub(crate) notifications_bus: EventBus<Notification>,
}

impl<B: KeyValueBackend> DataStore<B> {
    /// Store with the primary tier only.
    pub fn new(backend: B) -> Self {
        Self {
            primary: PrimaryStore::new(backend),
            mirror: None,
            updates_bus: EventBus::new(),
            notifications_bus: EventBus::new(),
        }
    }

    /// Store with both tiers.
    pub fn with_mirror(backend: B, mirror: Mirror) -> Self {
        Self {
            mirror: Some(mirror),
            ..Self::new(backend)
        }
    }

    pub fn mirror(&self) -> Option<&Mirror> {
        self.mirror.as_ref()
    }

    /// Reads a whole collection with the full fallback chain. Never fails:
    /// primary, then mirror (back-filling primary on a hit), then the
    /// default department list for `departments`, then empty.
    pub fn get_data(&self, collection: Collection) -> Vec<Value> {
        match self.primary.read(collection) {
            Ok(Some(records)) if !records.is_empty() => return records,
            Ok(_) => {}
            Err(err) => warn!("primary read of {collection} failed: {err}"),
        }

        if let Some(mirror) = &self.mirror {
            let records = mirror.read_all(collection);
            if !records.is_empty() {
                // Back-fill the primary tier so the next read is a hit.
                if let Err(err) = self.primary.write(collection, &records) {
                    warn!("primary back-fill of {collection} failed: {err}");
                }
                return records;
            }
        }

        if collection == Collection::Departments {
            return default_departments()
                .iter()
                .filter_map(|d| serde_json::to_value(d).ok())
                .collect();
        }
        Vec::new()
    }

    /// Looks up one record by id: primary collection scan first, then a
    /// direct mirror lookup. `None` when not found anywhere.
    pub fn get_item_by_id(&self, collection: Collection, id: &str) -> Option<Value> {
        match self.primary.read(collection) {
            Ok(Some(records)) => {
                if let Some(found) = records.into_iter().find(|r| record_id(r) == Some(id)) {
                    return Some(found);
                }
            }
            Ok(None) => {}
            Err(err) => warn!("primary read of {collection} failed: {err}"),
        }
        self.mirror
            .as_ref()
            .and_then(|mirror| mirror.read_one(collection, id))
    }

    /// Full overwrite of a collection. Records a `bulk` update for the live
    /// collections (lessons, events, flashcards, quizzes). Always `true`.
    pub fn store_data(&self, collection: Collection, records: &[Value]) -> bool {
        self.write_through(collection, records);
        if collection.bulk_on_store() {
            self.record_update(collection, UpdateAction::Bulk, None);
        }
        true
    }

    /// Full overwrite of a collection. Same as [`store_data`](Self::store_data)
    /// but records the `bulk` update for the wider entity allow-list.
    pub fn update_data(&self, collection: Collection, records: &[Value]) -> bool {
        self.write_through(collection, records);
        if collection.bulk_on_update() {
            self.record_update(collection, UpdateAction::Bulk, None);
        }
        true
    }

    fn write_through(&self, collection: Collection, records: &[Value]) {
        if let Err(err) = self.primary.write(collection, records) {
            warn!("primary write of {collection} failed: {err}");
        }
        if let Some(mirror) = &self.mirror {
            // Fire-and-forget; the mirror filters per-item failures itself.
            mirror.replace_all(collection, filter_valid(collection, records));
        }
    }

    /// Appends one record. Returns the record on success, `None` if it fails
    /// validation (nothing is mutated in that case).
    pub fn add_item(&self, collection: Collection, item: Value) -> Option<Value> {
        if !is_valid(&item, collection) {
            warn!("rejected invalid item for {collection}");
            return None;
        }

        let mut records = self.read_or_empty(collection);
        records.push(item.clone());
        if let Err(err) = self.primary.write(collection, &records) {
            warn!("primary write of {collection} failed: {err}");
        }
        if let Some(mirror) = &self.mirror {
            mirror.insert(collection, item.clone());
        }
        self.record_update(collection, UpdateAction::Add, Some(item.clone()));
        Some(item)
    }

    /// Replaces the record with the same id. Returns the record on success,
    /// `None` if it fails validation. A record whose id is not present
    /// leaves the primary tier untouched but still records the update.
    pub fn update_item(&self, collection: Collection, item: Value) -> Option<Value> {
        if !is_valid(&item, collection) {
            warn!("rejected invalid item for {collection}");
            return None;
        }

        let mut records = self.read_or_empty(collection);
        if let Some(slot) = records
            .iter_mut()
            .find(|r| record_id(r) == record_id(&item))
        {
            *slot = item.clone();
            if let Err(err) = self.primary.write(collection, &records) {
                warn!("primary write of {collection} failed: {err}");
            }
        }
        if let Some(mirror) = &self.mirror {
            mirror.put(collection, item.clone());
        }
        self.record_update(collection, UpdateAction::Update, Some(item.clone()));
        Some(item)
    }

    /// Removes the record with `id`. Always `true` (best-effort contract).
    pub fn delete_item(&self, collection: Collection, id: &str) -> bool {
        let mut records = self.read_or_empty(collection);
        records.retain(|r| record_id(r) != Some(id));
        if let Err(err) = self.primary.write(collection, &records) {
            warn!("primary write of {collection} failed: {err}");
        }
        if let Some(mirror) = &self.mirror {
            mirror.delete(collection, id);
        }
        self.record_update(
            collection,
            UpdateAction::Delete,
            Some(serde_json::json!({ "id": id })),
        );
        true
    }

    /// Creates a department, enforcing case-insensitive `code` uniqueness.
    /// Uniqueness is a creation-path invariant only; the store itself does
    /// not enforce it on bulk writes.
    pub fn add_department(&self, department: &Department) -> Option<Value> {
        let existing = self.get_data(Collection::Departments);
        let duplicate = existing.iter().any(|d| {
            d.get("code")
                .and_then(Value::as_str)
                .is_some_and(|code| code.eq_ignore_ascii_case(&department.code))
        });
        if duplicate {
            warn!("department code {} already exists", department.code);
            return None;
        }
        let value = match serde_json::to_value(department) {
            Ok(value) => value,
            Err(err) => {
                warn!("department serialization failed: {err}");
                return None;
            }
        };
        self.add_item(Collection::Departments, value)
    }

    /// The logged-in user profile, if external bootstrap code stored one.
    pub fn get_user(&self) -> Option<Value> {
        match self.primary.read_key(USER_KEY) {
            Ok(user) => user,
            Err(err) => {
                warn!("user profile read failed: {err}");
                None
            }
        }
    }

    pub(crate) fn read_or_empty(&self, collection: Collection) -> Vec<Value> {
        match self.primary.read(collection) {
            Ok(records) => records.unwrap_or_default(),
            Err(err) => {
                warn!("primary read of {collection} failed: {err}");
                Vec::new()
            }
        }
    }
}
