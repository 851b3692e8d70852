//! Audit trail entries for ticket mutations.
//!
//! Every mutating operation appends exactly one [`AuditEntry`] capturing
//! the actor, the action, and serialized before/after payloads. Entries
//! are immutable history: they are appended in the same storage critical
//! section as the mutation they describe and never updated or deleted.
//!
//! Comment events never carry the comment body — the payload is redacted
//! to a fixed placeholder so raw comment text cannot leak into the audit
//! trail.

use crate::domain::{TicketId, TicketPatch, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Placeholder payload logged for an external comment
pub const COMMENT_PLACEHOLDER: &str = "[Comment]";

/// Placeholder payload logged for an internal comment
pub const INTERNAL_COMMENT_PLACEHOLDER: &str = "[Internal Comment]";

/// What kind of mutation an audit entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    /// Field-level update
    #[serde(rename = "UPDATE")]
    Update,

    /// Status change
    #[serde(rename = "STATUS_CHANGE")]
    StatusChange,

    /// Priority change
    #[serde(rename = "PRIORITY_CHANGE")]
    PriorityChange,

    /// Assignment change
    #[serde(rename = "ASSIGN")]
    Assign,

    /// Comment added (payload redacted)
    #[serde(rename = "COMMENT_ADDED")]
    CommentAdded,

    /// Time entry logged
    #[serde(rename = "TIME_LOGGED")]
    TimeLogged,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuditAction::Update => "UPDATE",
            AuditAction::StatusChange => "STATUS_CHANGE",
            AuditAction::PriorityChange => "PRIORITY_CHANGE",
            AuditAction::Assign => "ASSIGN",
            AuditAction::CommentAdded => "COMMENT_ADDED",
            AuditAction::TimeLogged => "TIME_LOGGED",
        };
        write!(f, "{s}")
    }
}

/// One immutable record of a ticket mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Ticket the mutation applied to
    pub ticket_id: TicketId,

    /// User who performed the mutation
    pub actor: UserId,

    /// Kind of mutation
    pub action: AuditAction,

    /// Serialized state before the mutation, when captured
    pub old_value: Option<String>,

    /// Serialized attempted change, when captured
    pub new_value: Option<String>,

    /// When the entry was recorded
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Build an entry from serializable before/after payloads.
    ///
    /// Payloads that fail to serialize are recorded as absent rather than
    /// failing the mutation they describe.
    pub fn new<O, N>(
        ticket_id: TicketId,
        actor: UserId,
        action: AuditAction,
        old_value: Option<&O>,
        new_value: Option<&N>,
    ) -> Self
    where
        O: Serialize,
        N: Serialize,
    {
        Self {
            ticket_id,
            actor,
            action,
            old_value: old_value.and_then(|v| serde_json::to_string(v).ok()),
            new_value: new_value.and_then(|v| serde_json::to_string(v).ok()),
            created_at: Utc::now(),
        }
    }

    /// Build the redacted entry for a comment addition.
    ///
    /// The logged payload distinguishes internal from external comments
    /// but never contains the comment text itself.
    pub fn comment_added(ticket_id: TicketId, actor: UserId, is_internal: bool) -> Self {
        let placeholder = if is_internal {
            INTERNAL_COMMENT_PLACEHOLDER
        } else {
            COMMENT_PLACEHOLDER
        };
        let payload = serde_json::json!({ "content": placeholder });
        Self {
            ticket_id,
            actor,
            action: AuditAction::CommentAdded,
            old_value: None,
            new_value: serde_json::to_string(&payload).ok(),
            created_at: Utc::now(),
        }
    }
}

/// Serialize the fields a patch attempts to change.
///
/// Only fields present in the patch appear in the payload, so the audit
/// entry records exactly the attempted change. A `Some(None)` assignee
/// (explicit unassignment) appears as a JSON null.
pub fn patch_payload(patch: &TicketPatch) -> Value {
    let mut map = Map::new();
    if let Some(title) = &patch.title {
        map.insert("title".to_string(), Value::from(title.clone()));
    }
    if let Some(description) = &patch.description {
        map.insert("description".to_string(), Value::from(description.clone()));
    }
    if let Some(priority) = patch.priority {
        map.insert("priority".to_string(), Value::from(priority.to_string()));
    }
    if let Some(status) = patch.status {
        map.insert("status".to_string(), Value::from(status.to_string()));
    }
    if let Some(impact) = patch.impact {
        map.insert("impact".to_string(), Value::from(impact.to_string()));
    }
    if let Some(urgency) = patch.urgency {
        map.insert("urgency".to_string(), Value::from(urgency.to_string()));
    }
    if let Some(category) = &patch.category {
        map.insert("category".to_string(), Value::from(category.clone()));
    }
    if let Some(subcategory) = &patch.subcategory {
        map.insert("subcategory".to_string(), Value::from(subcategory.clone()));
    }
    if let Some(root_cause) = &patch.root_cause {
        map.insert("root_cause".to_string(), Value::from(root_cause.clone()));
    }
    if let Some(preventive_measures) = &patch.preventive_measures {
        map.insert(
            "preventive_measures".to_string(),
            Value::from(preventive_measures.clone()),
        );
    }
    if let Some(assigned_to) = &patch.assigned_to {
        let value = match assigned_to {
            Some(user) => Value::from(user.as_str()),
            None => Value::Null,
        };
        map.insert("assigned_to".to_string(), value);
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_labels_match_wire_format() {
        assert_eq!(serde_json::to_string(&AuditAction::Update).unwrap(), "\"UPDATE\"");
        assert_eq!(
            serde_json::to_string(&AuditAction::CommentAdded).unwrap(),
            "\"COMMENT_ADDED\""
        );
        assert_eq!(AuditAction::TimeLogged.to_string(), "TIME_LOGGED");
    }

    #[test]
    fn entry_serializes_payloads() {
        let entry = AuditEntry::new(
            TicketId::new(),
            UserId::from("alice"),
            AuditAction::Update,
            Some(&serde_json::json!({"title": "before"})),
            Some(&serde_json::json!({"title": "after"})),
        );
        let new_value: Value = serde_json::from_str(entry.new_value.as_deref().unwrap()).unwrap();
        assert_eq!(new_value["title"], "after");
        let old_value: Value = serde_json::from_str(entry.old_value.as_deref().unwrap()).unwrap();
        assert_eq!(old_value["title"], "before");
    }

    #[test]
    fn patch_payload_only_carries_present_fields() {
        use crate::domain::{TicketStatus, UserId};

        let patch = TicketPatch {
            status: Some(TicketStatus::InProgress),
            assigned_to: Some(Some(UserId::from("agent"))),
            ..Default::default()
        };
        let payload = patch_payload(&patch);
        assert_eq!(payload["status"], "IN_PROGRESS");
        assert_eq!(payload["assigned_to"], "agent");
        assert!(payload.get("title").is_none());

        let unassign = TicketPatch {
            assigned_to: Some(None),
            ..Default::default()
        };
        assert!(patch_payload(&unassign)["assigned_to"].is_null());
    }

    #[test]
    fn comment_entries_redact_content() {
        let secret = "the database password is hunter2";

        let external = AuditEntry::comment_added(TicketId::new(), UserId::from("bob"), false);
        let payload = external.new_value.unwrap();
        assert!(!payload.contains(secret));
        assert!(payload.contains(COMMENT_PLACEHOLDER));

        let internal = AuditEntry::comment_added(TicketId::new(), UserId::from("bob"), true);
        let payload = internal.new_value.unwrap();
        assert!(payload.contains(INTERNAL_COMMENT_PLACEHOLDER));
        assert!(internal.old_value.is_none());
    }
}
