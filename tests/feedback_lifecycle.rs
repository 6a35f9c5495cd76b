use acadguide::model::{FeedbackKind, FeedbackStatus, NewFeedback};
use acadguide::store::MemoryBackend;
use acadguide::{DataStore, Mirror};

fn submit(store: &DataStore<MemoryBackend>) -> acadguide::Feedback {
    store
        .add_feedback(NewFeedback {
            kind: FeedbackKind::Concern,
            subject: "Projector".to_string(),
            message: "The projector in room 101 flickers.".to_string(),
            department_id: Some("cs".to_string()),
            course_id: None,
        })
        .expect("feedback should be created")
}

#[test]
fn new_feedback_starts_pending_with_a_generated_id() {
    let store = DataStore::new(MemoryBackend::new());
    let feedback = submit(&store);

    assert_eq!(feedback.status, FeedbackStatus::Pending);
    assert!(feedback.id.starts_with("feedback-"));

    let listed = store.get_feedback();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, feedback.id);
}

#[test]
fn status_update_changes_only_the_status() {
    let store = DataStore::new(MemoryBackend::new());
    let feedback = submit(&store);

    assert!(store.update_feedback_status(&feedback.id, FeedbackStatus::Addressed));

    let listed = store.get_feedback();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, FeedbackStatus::Addressed);
    assert_eq!(listed[0].subject, feedback.subject);
    assert_eq!(listed[0].message, feedback.message);
    assert_eq!(listed[0].timestamp, feedback.timestamp);
    assert_eq!(listed[0].department_id, feedback.department_id);
}

#[test]
fn any_state_may_transition_to_any_other() {
    let store = DataStore::new(MemoryBackend::new());
    let feedback = submit(&store);

    for status in [
        FeedbackStatus::Reviewed,
        FeedbackStatus::Addressed,
        // Reopen.
        FeedbackStatus::Pending,
        FeedbackStatus::Addressed,
    ] {
        store.update_feedback_status(&feedback.id, status);
        assert_eq!(store.get_feedback()[0].status, status);
    }
}

#[test]
fn unknown_id_is_a_quiet_no_op() {
    let store = DataStore::new(MemoryBackend::new());
    submit(&store);

    assert!(store.update_feedback_status("feedback-0-missing", FeedbackStatus::Reviewed));
    assert_eq!(store.get_feedback()[0].status, FeedbackStatus::Pending);
}

#[test]
fn feedback_survives_in_the_mirror_across_primary_loss() {
    let mirror = Mirror::open_in_memory().unwrap();
    let writer = DataStore::with_mirror(MemoryBackend::new(), mirror.clone());
    let feedback = writer
        .add_feedback(NewFeedback {
            kind: FeedbackKind::Praise,
            subject: "Great course".to_string(),
            message: "Loved the database unit.".to_string(),
            department_id: None,
            course_id: Some("c1".to_string()),
        })
        .unwrap();

    // A fresh primary tier sharing the same mirror: the submission is still
    // there, and status updates reach the mirror copy.
    let reader = DataStore::with_mirror(MemoryBackend::new(), mirror.clone());
    let listed = reader.get_feedback();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, feedback.id);

    let bare = DataStore::with_mirror(MemoryBackend::new(), mirror);
    bare.update_feedback_status(&feedback.id, FeedbackStatus::Reviewed);
    assert_eq!(bare.get_feedback()[0].status, FeedbackStatus::Reviewed);
}
