//! Feedback subsystem: anonymous submissions with a status lifecycle.
//!
//! Statuses move pending → reviewed → addressed by convention, but any state
//! may transition to any other (reopening addressed feedback is allowed).
//! The mirror's `feedback` partition arrived in schema v2; older database
//! files gain it through the migration list when the mirror opens, so the
//! write paths here never special-case a missing partition.

use crate::api::DataStore;
use crate::model::{Collection, Feedback, FeedbackStatus, NewFeedback};
use crate::store::KeyValueBackend;
use chrono::Utc;
use log::warn;
use serde_json::Value;
use uuid::Uuid;

impl<B: KeyValueBackend> DataStore<B> {
    /// All feedback submissions, via the standard dual-tier fallback.
    pub fn get_feedback(&self) -> Vec<Feedback> {
        self.get_data(Collection::Feedback)
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect()
    }

    /// Stamps id, timestamp and the initial `pending` status onto `input`,
    /// persists it, and returns the created record. `None` only if the
    /// record cannot be serialized.
    pub fn add_feedback(&self, input: NewFeedback) -> Option<Feedback> {
        let feedback = Feedback {
            id: generate_feedback_id(),
            kind: input.kind,
            subject: input.subject,
            message: input.message,
            department_id: input.department_id,
            course_id: input.course_id,
            timestamp: Utc::now(),
            status: FeedbackStatus::Pending,
        };

        let value = match serde_json::to_value(&feedback) {
            Ok(value) => value,
            Err(err) => {
                warn!("feedback serialization failed: {err}");
                return None;
            }
        };

        let mut records = self.get_data(Collection::Feedback);
        records.push(value.clone());
        if let Err(err) = self.primary.write(Collection::Feedback, &records) {
            warn!("feedback write failed: {err}");
        }
        if let Some(mirror) = &self.mirror {
            mirror.insert(Collection::Feedback, value);
        }

        Some(feedback)
    }

    /// Overwrites the status of the feedback with `id` in both tiers,
    /// leaving every other field unchanged. Always `true`.
    pub fn update_feedback_status(&self, id: &str, status: FeedbackStatus) -> bool {
        let mut records = self.read_or_empty(Collection::Feedback);
        let mut updated = None;
        for entry in records.iter_mut() {
            if entry.get("id").and_then(Value::as_str) == Some(id) {
                if let (Some(object), Ok(status_value)) =
                    (entry.as_object_mut(), serde_json::to_value(status))
                {
                    object.insert("status".to_string(), status_value);
                }
                updated = Some(entry.clone());
            }
        }

        match updated {
            Some(record) => {
                if let Err(err) = self.primary.write(Collection::Feedback, &records) {
                    warn!("feedback write failed: {err}");
                }
                if let Some(mirror) = &self.mirror {
                    mirror.put(Collection::Feedback, record);
                }
            }
            None => {
                // The record may live only in the mirror (e.g. the primary
                // tier was cleared); update it there directly.
                if let Some(mirror) = &self.mirror {
                    if let Some(mut record) = mirror.read_one(Collection::Feedback, id) {
                        if let (Some(object), Ok(status_value)) =
                            (record.as_object_mut(), serde_json::to_value(status))
                        {
                            object.insert("status".to_string(), status_value);
                        }
                        mirror.put(Collection::Feedback, record);
                    }
                }
            }
        }
        true
    }
}

/// `feedback-<millis>-<random suffix>`.
fn generate_feedback_id() -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(7).collect();
    format!("feedback-{}-{}", Utc::now().timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_the_feedback_prefix() {
        let id = generate_feedback_id();
        assert!(id.starts_with("feedback-"));
        assert_eq!(id.split('-').count(), 3);
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(generate_feedback_id(), generate_feedback_id());
    }
}
