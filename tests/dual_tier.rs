use acadguide::error::{Result, StoreError};
use acadguide::model::{BookmarkKind, Collection, FeedbackKind, NewFeedback};
use acadguide::store::{KeyValueBackend, MemoryBackend};
use acadguide::{DataStore, Mirror};
use serde_json::json;

#[test]
fn round_trip_through_the_facade() {
    let store = DataStore::new(MemoryBackend::new());
    let record = json!({"id": "s1", "code": "CS101", "name": "Intro", "departmentId": "cs"});

    store.store_data(Collection::Subjects, std::slice::from_ref(&record));

    let read = store.get_data(Collection::Subjects);
    assert_eq!(read, vec![record]);
}

#[test]
fn typed_entities_round_trip_through_the_facade() {
    let store = DataStore::new(MemoryBackend::new());
    let subject = acadguide::Subject {
        id: "s1".to_string(),
        code: "CS101".to_string(),
        name: "Intro to Computing".to_string(),
        description: String::new(),
        credits: 3,
        semester: 2,
        prerequisite: Some("CS100".to_string()),
        department_id: "cs".to_string(),
    };
    let assignment = acadguide::Assignment {
        id: "a1".to_string(),
        title: "Lab 1".to_string(),
        description: "First lab exercise".to_string(),
        kind: acadguide::AssignmentKind::Assignment,
        subject_id: Some("s1".to_string()),
        course_id: None,
        department_id: None,
        due_date: chrono::NaiveDate::from_ymd_opt(2025, 9, 15).unwrap(),
        points: 50,
        status: acadguide::AssignmentStatus::Active,
    };

    store.store_data(
        Collection::Subjects,
        &[serde_json::to_value(&subject).unwrap()],
    );
    store.add_item(
        Collection::Assignments,
        serde_json::to_value(&assignment).unwrap(),
    );

    let read: acadguide::Subject =
        serde_json::from_value(store.get_item_by_id(Collection::Subjects, "s1").unwrap()).unwrap();
    assert_eq!(read.prerequisite.as_deref(), Some("CS100"));
    assert_eq!(read.semester, 2);

    let read: acadguide::Assignment =
        serde_json::from_value(store.get_item_by_id(Collection::Assignments, "a1").unwrap())
            .unwrap();
    assert_eq!(read.kind, acadguide::AssignmentKind::Assignment);
    assert_eq!(read.due_date, assignment.due_date);
    assert_eq!(read.points, 50);
}

#[test]
fn writes_persist_exactly_the_valid_subset() {
    let store = DataStore::new(MemoryBackend::new());
    let records = vec![
        json!({"id": "d1", "name": "CS", "code": "CS"}),
        json!({"id": "", "name": "broken", "code": "X"}),
        json!({"name": "no id", "code": "Y"}),
    ];

    store.store_data(Collection::Departments, &records);

    let read = store.get_data(Collection::Departments);
    assert_eq!(read.len(), 1);
    assert_eq!(read[0]["id"], "d1");
}

#[test]
fn departments_fall_back_to_the_builtin_list() {
    let store = DataStore::new(MemoryBackend::new());
    let departments = store.get_data(Collection::Departments);
    assert!(!departments.is_empty());
    assert!(departments.iter().any(|d| d["code"] == "CS"));
}

#[test]
fn other_collections_fall_back_to_empty() {
    let store = DataStore::new(MemoryBackend::new());
    assert!(store.get_data(Collection::Courses).is_empty());
    assert!(store.get_data(Collection::Quizzes).is_empty());
}

#[test]
fn bulk_overwrite_replaces_not_merges() {
    let store = DataStore::new(MemoryBackend::new());
    let first = vec![json!({"id": "a"}), json!({"id": "b"})];
    let second = vec![json!({"id": "c"})];

    store.store_data(Collection::Lessons, &first);
    store.store_data(Collection::Lessons, &second);

    assert_eq!(store.get_data(Collection::Lessons), second);
}

#[test]
fn item_operations_mutate_the_collection() {
    let store = DataStore::new(MemoryBackend::new());

    let added = store.add_item(Collection::Lessons, json!({"id": "L1", "title": "Intro"}));
    assert!(added.is_some());

    let updated = store.update_item(
        Collection::Lessons,
        json!({"id": "L1", "title": "Intro (revised)"}),
    );
    assert_eq!(updated.unwrap()["title"], "Intro (revised)");

    assert_eq!(
        store.get_item_by_id(Collection::Lessons, "L1").unwrap()["title"],
        "Intro (revised)"
    );

    assert!(store.delete_item(Collection::Lessons, "L1"));
    assert!(store.get_item_by_id(Collection::Lessons, "L1").is_none());
    assert!(store.get_data(Collection::Lessons).is_empty());
}

#[test]
fn invalid_items_are_rejected_without_mutation() {
    let store = DataStore::new(MemoryBackend::new());
    assert!(store
        .add_item(Collection::Lessons, json!({"title": "no id"}))
        .is_none());
    assert!(store.get_data(Collection::Lessons).is_empty());
}

#[test]
fn mirror_backfills_an_empty_primary() {
    let mirror = Mirror::open_in_memory().unwrap();
    let writer = DataStore::with_mirror(MemoryBackend::new(), mirror.clone());
    writer.store_data(Collection::Courses, &[json!({"id": "c1", "name": "DB", "departmentId": "cs"})]);

    // Force the mirror queue to drain before the fresh store reads.
    mirror.flush();

    // A second store sharing the mirror but with an empty primary tier.
    let reader = DataStore::with_mirror(MemoryBackend::new(), mirror);
    let courses = reader.get_data(Collection::Courses);
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["id"], "c1");

    // The read back-filled the primary tier: a primary-only lookup now hits.
    assert!(reader.get_item_by_id(Collection::Courses, "c1").is_some());
}

#[test]
fn department_codes_are_unique_on_the_creation_path() {
    let store = DataStore::new(MemoryBackend::new());
    let dept = acadguide::Department {
        id: "robotics".to_string(),
        name: "Robotics".to_string(),
        code: "ROB".to_string(),
        description: String::new(),
    };

    assert!(store.add_department(&dept).is_some());

    let mut clashing = dept.clone();
    clashing.id = "robotics-2".to_string();
    clashing.code = "rob".to_string();
    assert!(store.add_department(&clashing).is_none());
}

/// A backend where every call fails, for the never-throw contract.
struct FailingBackend;

impl KeyValueBackend for FailingBackend {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(StoreError::Backend("boom".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(StoreError::Backend("boom".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(StoreError::Backend("boom".to_string()))
    }
}

#[test]
fn facade_never_fails_even_when_the_backend_always_does() {
    let store = DataStore::new(FailingBackend);

    // Reads map to the documented fallbacks.
    assert!(!store.get_data(Collection::Departments).is_empty());
    assert!(store.get_data(Collection::Courses).is_empty());
    assert!(store.get_item_by_id(Collection::Courses, "x").is_none());

    // Writes report their documented best-effort results.
    assert!(store.store_data(Collection::Lessons, &[json!({"id": "L1"})]));
    assert!(store.update_data(Collection::Lessons, &[json!({"id": "L1"})]));
    assert!(store.add_item(Collection::Lessons, json!({"id": "L1"})).is_some());
    assert!(store.delete_item(Collection::Lessons, "L1"));

    // Subsystems degrade to safe defaults.
    assert!(store.get_bookmarks().is_empty());
    assert!(store.add_bookmark("L1", BookmarkKind::Lesson, "Intro"));
    assert!(!store.is_bookmarked("L1", BookmarkKind::Lesson));
    assert!(store.get_notifications().is_empty());
    assert!(store.recent_updates().is_empty());
    assert!(store.get_feedback().is_empty());
    assert!(store
        .add_feedback(NewFeedback {
            kind: FeedbackKind::Other,
            subject: "s".to_string(),
            message: "m".to_string(),
            department_id: None,
            course_id: None,
        })
        .is_some());
    assert!(store.get_user().is_none());
    assert!(store.search("anything").iter().all(|h| h["type"] == "department"));
}
