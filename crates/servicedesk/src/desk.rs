//! The ticket desk engine.
//!
//! [`TicketDesk`] is the in-process surface request handlers call into:
//! it owns a [`TicketStore`], evaluates edit permissions fresh on every
//! mutating call, builds the audit entry for each mutation, and hands
//! both to the store to apply atomically.

use crate::audit::{patch_payload, AuditAction, AuditEntry};
use crate::domain::{
    Comment, NewTicket, Priority, Role, Ticket, TicketFilter, TicketId, TicketPage, TicketPatch,
    TicketStats, TicketStatus, TimeEntry, UserId,
};
use crate::error::{Error, Result};
use crate::permissions;
use crate::storage::TicketStore;
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

/// The ticket lifecycle engine.
///
/// All mutating operations re-check edit permissions against the ticket's
/// current state; nothing is cached between calls.
pub struct TicketDesk {
    store: Box<dyn TicketStore>,
}

impl std::fmt::Debug for TicketDesk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketDesk")
            .field("store", &"<dyn TicketStore>")
            .finish()
    }
}

impl TicketDesk {
    /// Create a desk over the given storage backend
    pub fn new(store: Box<dyn TicketStore>) -> Self {
        Self { store }
    }

    /// Create a new ticket.
    ///
    /// The store assigns the ticket number, SLA tier, and due date while
    /// holding its lock; severity fields default (priority Medium, impact
    /// Low, urgency Low, source Web) before classification.
    pub async fn create_ticket(&mut self, new_ticket: NewTicket, created_by: UserId) -> Result<Ticket> {
        let ticket = self.store.create(new_ticket, created_by).await?;
        info!(
            ticket_number = %ticket.ticket_number,
            sla_tier = %ticket.sla_tier,
            "Created ticket"
        );
        Ok(ticket)
    }

    /// Get a ticket by ID.
    ///
    /// # Errors
    ///
    /// Returns `Error::TicketNotFound` if the ticket doesn't exist.
    pub async fn get_ticket(&self, id: &TicketId) -> Result<Ticket> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| Error::TicketNotFound(id.clone()))
    }

    /// Find tickets matching a filter, paginated, newest first.
    pub async fn find_tickets(&self, filter: &TicketFilter) -> Result<TicketPage> {
        self.store.find(filter).await
    }

    /// Update a ticket.
    ///
    /// Permission-checked against current ticket state, audit-logged, and
    /// stamps the resolution date on a transition into Resolved or Closed.
    ///
    /// # Errors
    ///
    /// - `Error::TicketNotFound` if the ticket doesn't exist
    /// - `Error::PermissionDenied` if the actor may not edit the ticket
    pub async fn update_ticket(
        &mut self,
        id: &TicketId,
        patch: TicketPatch,
        actor: &UserId,
        role: Role,
    ) -> Result<Ticket> {
        self.apply_patch(id, patch, actor, role, AuditAction::Update).await
    }

    /// Assign (or unassign) a ticket.
    ///
    /// # Errors
    ///
    /// Same as [`update_ticket`](Self::update_ticket).
    pub async fn assign_ticket(
        &mut self,
        id: &TicketId,
        assignee: Option<UserId>,
        actor: &UserId,
        role: Role,
    ) -> Result<Ticket> {
        let patch = TicketPatch {
            assigned_to: Some(assignee),
            ..Default::default()
        };
        self.apply_patch(id, patch, actor, role, AuditAction::Assign).await
    }

    /// Change a ticket's status.
    ///
    /// # Errors
    ///
    /// Same as [`update_ticket`](Self::update_ticket).
    pub async fn change_status(
        &mut self,
        id: &TicketId,
        status: TicketStatus,
        actor: &UserId,
        role: Role,
    ) -> Result<Ticket> {
        let patch = TicketPatch {
            status: Some(status),
            ..Default::default()
        };
        self.apply_patch(id, patch, actor, role, AuditAction::StatusChange).await
    }

    /// Change a ticket's priority.
    ///
    /// The SLA tier and due date stay frozen at their creation values.
    ///
    /// # Errors
    ///
    /// Same as [`update_ticket`](Self::update_ticket).
    pub async fn change_priority(
        &mut self,
        id: &TicketId,
        priority: Priority,
        actor: &UserId,
        role: Role,
    ) -> Result<Ticket> {
        let patch = TicketPatch {
            priority: Some(priority),
            ..Default::default()
        };
        self.apply_patch(id, patch, actor, role, AuditAction::PriorityChange).await
    }

    /// Non-throwing edit probe.
    ///
    /// Returns false on any denial — including a missing ticket — without
    /// surfacing the reason. Used by read-only "can I edit?" queries.
    pub async fn can_edit_ticket(&self, id: &TicketId, actor: &UserId, role: Role) -> Result<bool> {
        let Some(ticket) = self.store.get(id).await? else {
            return Ok(false);
        };
        Ok(permissions::can_edit(&ticket, actor, role))
    }

    /// Add a comment to a ticket.
    ///
    /// The audit entry records only a redacted placeholder, never the
    /// comment text.
    ///
    /// # Errors
    ///
    /// Returns `Error::TicketNotFound` if the ticket doesn't exist.
    pub async fn add_comment(
        &mut self,
        id: &TicketId,
        author: UserId,
        content: String,
        is_internal: bool,
    ) -> Result<Comment> {
        // Verify the ticket exists before building the comment
        self.get_ticket(id).await?;

        let comment = Comment {
            id: Uuid::new_v4(),
            ticket_id: id.clone(),
            author: author.clone(),
            content,
            is_internal,
            created_at: Utc::now(),
        };
        let audit = AuditEntry::comment_added(id.clone(), author, is_internal);

        debug!(ticket_id = %id, is_internal, "Adding comment");
        self.store.add_comment(comment, audit).await
    }

    /// Log a time entry against a ticket.
    ///
    /// # Errors
    ///
    /// Returns `Error::TicketNotFound` if the ticket doesn't exist.
    pub async fn add_time_entry(
        &mut self,
        id: &TicketId,
        user: UserId,
        minutes_spent: u32,
        description: Option<String>,
        billable: bool,
    ) -> Result<TimeEntry> {
        self.get_ticket(id).await?;

        let now = Utc::now();
        let entry = TimeEntry {
            id: Uuid::new_v4(),
            ticket_id: id.clone(),
            user: user.clone(),
            minutes_spent,
            description,
            billable,
            started_at: now,
            created_at: now,
        };
        let audit = AuditEntry::new(
            id.clone(),
            user,
            AuditAction::TimeLogged,
            None::<&()>,
            Some(&serde_json::json!({
                "minutes_spent": minutes_spent,
                "billable": billable,
            })),
        );

        self.store.add_time_entry(entry, audit).await
    }

    /// All comments on a ticket, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `Error::TicketNotFound` if the ticket doesn't exist.
    pub async fn comments(&self, id: &TicketId) -> Result<Vec<Comment>> {
        self.store.comments(id).await
    }

    /// All time entries on a ticket, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `Error::TicketNotFound` if the ticket doesn't exist.
    pub async fn time_entries(&self, id: &TicketId) -> Result<Vec<TimeEntry>> {
        self.store.time_entries(id).await
    }

    /// The audit trail of a ticket, newest entry first.
    ///
    /// # Errors
    ///
    /// Returns `Error::TicketNotFound` if the ticket doesn't exist.
    pub async fn audit_trail(&self, id: &TicketId) -> Result<Vec<AuditEntry>> {
        let mut entries = self.store.audit_trail(id).await?;
        entries.reverse();
        Ok(entries)
    }

    /// Summary counts, optionally scoped to one assignee.
    pub async fn stats(&self, assigned_to: Option<&UserId>) -> Result<TicketStats> {
        self.store.stats(assigned_to).await
    }

    /// Save storage state to persistent storage.
    ///
    /// This should be called after any mutating operations.
    pub async fn save(&self) -> Result<()> {
        self.store.save().await
    }

    /// Shared path for all permission-checked, audited patches
    async fn apply_patch(
        &mut self,
        id: &TicketId,
        patch: TicketPatch,
        actor: &UserId,
        role: Role,
        action: AuditAction,
    ) -> Result<Ticket> {
        let existing = self.get_ticket(id).await?;

        // Evaluated fresh every call; ticket state may have changed since
        // the last check
        permissions::check_edit(&existing, actor, role)?;

        let audit = AuditEntry::new(
            id.clone(),
            actor.clone(),
            action,
            Some(&existing),
            Some(&patch_payload(&patch)),
        );

        let updated = self.store.update(id, patch, audit).await?;
        debug!(
            ticket_number = %updated.ticket_number,
            action = %action,
            actor = %actor,
            "Applied ticket mutation"
        );
        Ok(updated)
    }
}
