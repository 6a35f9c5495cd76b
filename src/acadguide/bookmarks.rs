//! Bookmark subsystem: a lightweight favorites list stored only in the
//! primary tier (no mirror). At most one bookmark exists per `(id, type)`
//! pair. All operations swallow internal errors and return a safe default.

use crate::api::DataStore;
use crate::model::{Bookmark, BookmarkKind};
use crate::store::KeyValueBackend;
use chrono::Utc;
use log::warn;

/// Primary-tier key for the bookmark list.
pub const BOOKMARKS_KEY: &str = "acadGuide:bookmarks";

impl<B: KeyValueBackend> DataStore<B> {
    pub fn get_bookmarks(&self) -> Vec<Bookmark> {
        match self.primary.read_key(BOOKMARKS_KEY) {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|err| {
                warn!("corrupt bookmark list: {err}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("bookmark read failed: {err}");
                Vec::new()
            }
        }
    }

    /// Adds a bookmark; a no-op if the `(id, type)` pair already exists.
    /// Always `true`.
    pub fn add_bookmark(&self, id: &str, kind: BookmarkKind, title: &str) -> bool {
        let mut bookmarks = self.get_bookmarks();
        if bookmarks.iter().any(|b| b.id == id && b.kind == kind) {
            return true;
        }
        bookmarks.push(Bookmark {
            id: id.to_string(),
            kind,
            title: title.to_string(),
            timestamp: Utc::now(),
        });
        self.write_bookmarks(&bookmarks);
        true
    }

    pub fn remove_bookmark(&self, id: &str, kind: BookmarkKind) -> bool {
        let mut bookmarks = self.get_bookmarks();
        bookmarks.retain(|b| !(b.id == id && b.kind == kind));
        self.write_bookmarks(&bookmarks);
        true
    }

    pub fn is_bookmarked(&self, id: &str, kind: BookmarkKind) -> bool {
        self.get_bookmarks()
            .iter()
            .any(|b| b.id == id && b.kind == kind)
    }

    fn write_bookmarks(&self, bookmarks: &[Bookmark]) {
        match serde_json::to_value(bookmarks) {
            Ok(value) => {
                if let Err(err) = self.primary.write_key(BOOKMARKS_KEY, &value) {
                    warn!("bookmark write failed: {err}");
                }
            }
            Err(err) => warn!("bookmark serialization failed: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBackend;

    fn store() -> DataStore<MemoryBackend> {
        DataStore::new(MemoryBackend::new())
    }

    #[test]
    fn add_is_idempotent_per_id_and_kind() {
        let store = store();
        store.add_bookmark("L1", BookmarkKind::Lesson, "Intro");
        store.add_bookmark("L1", BookmarkKind::Lesson, "Intro again");
        assert_eq!(store.get_bookmarks().len(), 1);

        // Same id under a different kind is a distinct bookmark.
        store.add_bookmark("L1", BookmarkKind::Quiz, "Quiz 1");
        assert_eq!(store.get_bookmarks().len(), 2);
    }

    #[test]
    fn remove_targets_the_exact_pair() {
        let store = store();
        store.add_bookmark("L1", BookmarkKind::Lesson, "Intro");
        store.add_bookmark("L1", BookmarkKind::Quiz, "Quiz 1");

        store.remove_bookmark("L1", BookmarkKind::Lesson);
        assert!(!store.is_bookmarked("L1", BookmarkKind::Lesson));
        assert!(store.is_bookmarked("L1", BookmarkKind::Quiz));
    }

    #[test]
    fn empty_store_reads_as_empty_list() {
        let store = store();
        assert!(store.get_bookmarks().is_empty());
        assert!(!store.is_bookmarked("x", BookmarkKind::Event));
    }
}
