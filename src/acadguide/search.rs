//! Cross-collection search over departments, courses, lessons and events.
//! Each hit is the matching record with a `type` tag injected so mixed
//! result lists stay distinguishable.

use crate::api::DataStore;
use crate::model::Collection;
use crate::store::KeyValueBackend;
use serde_json::Value;

impl<B: KeyValueBackend> DataStore<B> {
    /// Case-insensitive substring search. An empty query yields no results.
    pub fn search(&self, query: &str) -> Vec<Value> {
        if query.is_empty() {
            return Vec::new();
        }
        let query = query.to_lowercase();

        let mut results = Vec::new();
        results.extend(self.search_collection(
            Collection::Departments,
            "department",
            &["name", "code"],
            &query,
        ));
        results.extend(self.search_collection(
            Collection::Courses,
            "course",
            &["name", "code", "description"],
            &query,
        ));
        results.extend(self.search_collection(
            Collection::Lessons,
            "lesson",
            &["title", "content"],
            &query,
        ));
        results.extend(self.search_collection(
            Collection::Events,
            "event",
            &["title", "description"],
            &query,
        ));
        results
    }

    fn search_collection(
        &self,
        collection: Collection,
        tag: &str,
        fields: &[&str],
        query: &str,
    ) -> Vec<Value> {
        self.get_data(collection)
            .into_iter()
            .filter(|record| {
                fields.iter().any(|field| {
                    record
                        .get(field)
                        .and_then(Value::as_str)
                        .is_some_and(|text| text.to_lowercase().contains(query))
                })
            })
            .map(|mut record| {
                if let Some(object) = record.as_object_mut() {
                    object.insert("type".to_string(), Value::String(tag.to_string()));
                }
                record
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::api::DataStore;
    use crate::model::Collection;
    use crate::store::MemoryBackend;
    use serde_json::json;

    #[test]
    fn hits_are_tagged_with_their_kind() {
        let store = DataStore::new(MemoryBackend::new());
        store.store_data(
            Collection::Courses,
            &[json!({"id": "c1", "name": "Database Systems", "departmentId": "cs"})],
        );
        store.store_data(
            Collection::Lessons,
            &[json!({"id": "L1", "title": "Database normalization", "content": "..."})],
        );

        let hits = store.search("database");
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().any(|h| h["type"] == "course"));
        assert!(hits.iter().any(|h| h["type"] == "lesson"));
    }

    #[test]
    fn empty_query_yields_nothing() {
        let store = DataStore::new(MemoryBackend::new());
        assert!(store.search("").is_empty());
    }

    #[test]
    fn search_is_case_insensitive() {
        let store = DataStore::new(MemoryBackend::new());
        // No primary data: departments fall back to the built-in list.
        let hits = store.search("COMPUTER");
        assert!(hits.iter().any(|h| h["id"] == "cs"));
    }
}
