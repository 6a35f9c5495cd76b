//! # AcadGuide Architecture
//!
//! AcadGuide is a **UI-agnostic data layer** for an academic management
//! portal (departments, courses, subjects, assignments, feedback). This is
//! not a CLI application that happens to have some library code — it's a
//! library that happens to have a CLI client.
//!
//! ## The dual-tier store
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Clients (CLI binary, embedding UI)                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Façade (api.rs + updates/notify/feedback/bookmarks/search) │
//! │  - Validates records, orchestrates both tiers               │
//! │  - Never returns an error: failures map to safe defaults    │
//! │  - Broadcasts every mutation on the event buses             │
//! └─────────────────────────────────────────────────────────────┘
//!              │                                │
//!              ▼ synchronous, always first      ▼ fire-and-forget
//! ┌──────────────────────────┐   ┌─────────────────────────────┐
//! │  Primary tier (store/)   │   │  Secondary tier (mirror/)   │
//! │  KeyValueBackend trait   │   │  SQLite worker thread,      │
//! │  whole-collection JSON   │   │  per-record partitions,     │
//! │  blobs, source of truth  │   │  best-effort, may be absent │
//! └──────────────────────────┘   └─────────────────────────────┘
//! ```
//!
//! Writes always land in the primary tier first and synchronously; the
//! mirror write is dispatched to a background worker and its outcome is
//! deliberately never observed. Reads prefer the primary tier and fall back
//! to the mirror (back-filling the primary on a hit), then to the built-in
//! default department list for `departments`, then to empty. There are no
//! cross-tier transactions and no conflict resolution — single-user,
//! last-writer-wins.
//!
//! ## Module Overview
//!
//! - [`api`]: the [`DataStore`](api::DataStore) façade — entry point for all
//!   operations
//! - [`store`]: primary tier — [`KeyValueBackend`](store::KeyValueBackend)
//!   trait, file and in-memory implementations
//! - [`mirror`]: secondary tier — SQLite worker, migrations
//! - [`events`]: per-instance broadcast buses and subscriptions
//! - [`updates`], [`notify`]: change log and derived notifications
//! - [`feedback`], [`bookmarks`], [`search`]: subsystems built on the façade
//! - [`model`]: collections and typed entities
//! - [`validate`]: record shape/serializability checks
//! - [`error`]: error types (internal layers; the façade never surfaces them)

pub mod api;
pub mod bookmarks;
pub mod error;
pub mod events;
pub mod feedback;
pub mod mirror;
pub mod model;
pub mod notify;
pub mod search;
pub mod store;
pub mod updates;
pub mod validate;

pub use api::DataStore;
pub use error::{Result, StoreError};
pub use events::Subscription;
pub use mirror::Mirror;
pub use model::{
    default_departments, Assignment, AssignmentKind, AssignmentStatus, Bookmark, BookmarkKind,
    Collection, Course, Department, Feedback, FeedbackKind, FeedbackStatus, NewFeedback,
    Notification, Subject, UpdateAction, UpdateDigest, UpdateRecord,
};
pub use store::{FileBackend, KeyValueBackend, MemoryBackend, PrimaryStore};
pub use validate::is_valid;
