//! Core data types: the [`Collection`] names understood by the store, the
//! typed entities layered on top of the untyped record collections, and the
//! built-in default department list.
//!
//! Records are persisted as JSON objects (`serde_json::Value`); the structs
//! here are the typed views used by the subsystems that need one (feedback,
//! notifications, updates, bookmarks). Field names serialize in camelCase to
//! match the persisted layout (`departmentId`, `storeName`, `relatedTo`).

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Named record collections known to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Departments,
    Courses,
    Lessons,
    Events,
    Flashcards,
    Quizzes,
    Subjects,
    Assignments,
    Feedback,
    Notifications,
    Updates,
}

impl Collection {
    pub const ALL: [Collection; 11] = [
        Collection::Departments,
        Collection::Courses,
        Collection::Lessons,
        Collection::Events,
        Collection::Flashcards,
        Collection::Quizzes,
        Collection::Subjects,
        Collection::Assignments,
        Collection::Feedback,
        Collection::Notifications,
        Collection::Updates,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Departments => "departments",
            Collection::Courses => "courses",
            Collection::Lessons => "lessons",
            Collection::Events => "events",
            Collection::Flashcards => "flashcards",
            Collection::Quizzes => "quizzes",
            Collection::Subjects => "subjects",
            Collection::Assignments => "assignments",
            Collection::Feedback => "feedback",
            Collection::Notifications => "notifications",
            Collection::Updates => "updates",
        }
    }

    /// Primary-tier key for the whole collection blob: `acadGuide` plus the
    /// capitalized collection name.
    pub fn storage_key(self) -> &'static str {
        match self {
            Collection::Departments => "acadGuideDepartments",
            Collection::Courses => "acadGuideCourses",
            Collection::Lessons => "acadGuideLessons",
            Collection::Events => "acadGuideEvents",
            Collection::Flashcards => "acadGuideFlashcards",
            Collection::Quizzes => "acadGuideQuizzes",
            Collection::Subjects => "acadGuideSubjects",
            Collection::Assignments => "acadGuideAssignments",
            Collection::Feedback => "acadGuideFeedback",
            Collection::Notifications => "acadGuideNotifications",
            Collection::Updates => "acadGuideUpdates",
        }
    }

    /// Collections whose add/update mutations are surfaced to users as
    /// derived notifications.
    pub fn announces(self) -> bool {
        matches!(
            self,
            Collection::Lessons | Collection::Events | Collection::Flashcards | Collection::Quizzes
        )
    }

    /// Secondary-tier partitions keyed by an auto-assigned surrogate rather
    /// than the record's own `id`.
    pub(crate) fn auto_keyed(self) -> bool {
        matches!(self, Collection::Notifications | Collection::Updates)
    }

    /// Collections that record a `bulk` update event on `store_data`.
    pub(crate) fn bulk_on_store(self) -> bool {
        self.announces()
    }

    /// Collections that record a `bulk` update event on `update_data`.
    pub(crate) fn bulk_on_update(self) -> bool {
        matches!(
            self,
            Collection::Departments
                | Collection::Courses
                | Collection::Lessons
                | Collection::Events
                | Collection::Flashcards
                | Collection::Quizzes
                | Collection::Subjects
                | Collection::Assignments
        )
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown collection: {s}"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    pub department_id: String,
    // Courses carry free-form extras (code, instructor, year, ...) that the
    // store does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub credits: i64,
    /// 1, 2, or 3 (summer).
    pub semester: u8,
    #[serde(default)]
    pub prerequisite: Option<String>,
    pub department_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentKind {
    Assignment,
    Activity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: AssignmentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    pub due_date: chrono::NaiveDate,
    /// 0..=1000.
    pub points: u32,
    pub status: AssignmentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Concern,
    Improvement,
    Praise,
    Evaluation,
    Other,
}

impl FromStr for FeedbackKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concern" => Ok(FeedbackKind::Concern),
            "improvement" => Ok(FeedbackKind::Improvement),
            "praise" => Ok(FeedbackKind::Praise),
            "evaluation" => Ok(FeedbackKind::Evaluation),
            "other" => Ok(FeedbackKind::Other),
            other => Err(format!("unknown feedback type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStatus {
    Pending,
    Reviewed,
    Addressed,
}

impl FromStr for FeedbackStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FeedbackStatus::Pending),
            "reviewed" => Ok(FeedbackStatus::Reviewed),
            "addressed" => Ok(FeedbackStatus::Addressed),
            other => Err(format!("unknown feedback status: {other}")),
        }
    }
}

/// An anonymous feedback submission. Created through
/// [`DataStore::add_feedback`](crate::api::DataStore::add_feedback), which
/// stamps `id`, `timestamp` and the initial `pending` status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    pub subject: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub status: FeedbackStatus,
}

/// Caller-supplied fields for a new feedback submission.
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub kind: FeedbackKind,
    pub subject: String,
    pub message: String,
    pub department_id: Option<String>,
    pub course_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateAction {
    Add,
    Update,
    Delete,
    Bulk,
}

/// Append-only audit entry describing one mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecord {
    /// Millisecond-epoch timestamp rendered as a string.
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub store_name: Collection,
    pub action: UpdateAction,
    /// The affected record, or `None` for bulk overwrites.
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedTo {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

/// User-facing message derived from a subset of update records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    pub related_to: RelatedTo,
}

/// Human-readable digest of a recent update, for dashboard display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDigest {
    pub id: String,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkKind {
    Lesson,
    Event,
    Flashcard,
    Quiz,
}

impl FromStr for BookmarkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lesson" => Ok(BookmarkKind::Lesson),
            "event" => Ok(BookmarkKind::Event),
            "flashcard" => Ok(BookmarkKind::Flashcard),
            "quiz" => Ok(BookmarkKind::Quiz),
            other => Err(format!("unknown bookmark type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BookmarkKind,
    pub title: String,
    pub timestamp: DateTime<Utc>,
}

/// Current time in milliseconds since the epoch, as a string. Used as the
/// auto-assigned id for update records and notifications.
pub(crate) fn timestamp_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

static DEFAULT_DEPARTMENTS: Lazy<Vec<Department>> = Lazy::new(|| {
    let entries = [
        ("cs", "Computer Science", "CS", "Study of computers and computational systems"),
        ("math", "Mathematics", "MATH", "Study of numbers, quantity, and space"),
        ("phys", "Physics", "PHYS", "Study of matter, energy, and the interaction between them"),
        ("bio", "Biology", "BIO", "Study of living organisms"),
        ("chem", "Chemistry", "CHEM", "Study of substances and their interactions"),
        ("eng", "Engineering", "ENG", "Application of scientific knowledge to design and build"),
        (
            "bsis",
            "Bachelor of Science in Information Systems",
            "BSIS",
            "Study of information systems and their application in business and organizations",
        ),
    ];
    entries
        .into_iter()
        .map(|(id, name, code, description)| Department {
            id: id.to_string(),
            name: name.to_string(),
            code: code.to_string(),
            description: description.to_string(),
        })
        .collect()
});

/// Built-in department list: the guaranteed non-empty fallback for
/// `departments` reads when both tiers come up empty.
pub fn default_departments() -> &'static [Department] {
    &DEFAULT_DEPARTMENTS
}
