//! Edit-permission checks for tickets.
//!
//! Permissions combine a role capability table with the ticket's current
//! state. Support roles can edit anything; a ticket's creator keeps edit
//! rights only until the ticket is accepted (assigned, or moved past
//! Open); the current assignee can always edit.
//!
//! Checks are evaluated fresh on every mutating call — ticket state
//! (status, assignee) can change between calls, so results are never
//! cached.

use crate::domain::{Role, Ticket, TicketStatus, UserId};
use crate::error::{DenialReason, Error, Result};

/// Something a role is allowed to do regardless of ticket state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Edit any ticket, whatever its status or assignee
    EditAnyTicket,

    /// View tickets across all users, not just own
    ViewAllTickets,
}

impl Role {
    /// The closed capability set for this role.
    ///
    /// Single source of truth for role-based access; call sites query this
    /// table instead of comparing against role lists.
    pub fn capabilities(self) -> &'static [Capability] {
        match self {
            Role::Admin | Role::SupportL1 | Role::SupportL2 | Role::SupportL3 => {
                &[Capability::EditAnyTicket, Capability::ViewAllTickets]
            }
            Role::Developer | Role::ProjectManager => &[Capability::ViewAllTickets],
            Role::Client => &[],
        }
    }

    /// Whether this role holds the given capability
    pub fn has_capability(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

/// Check whether `actor` may edit `ticket`, with the denial reason.
///
/// # Errors
///
/// Returns [`Error::PermissionDenied`] with
/// [`DenialReason::TicketAlreadyAccepted`] when the creator has lost edit
/// rights, or [`DenialReason::NoPermission`] for an unrelated actor.
pub fn check_edit(ticket: &Ticket, actor: &UserId, role: Role) -> Result<()> {
    if role.has_capability(Capability::EditAnyTicket) {
        return Ok(());
    }

    // The creator keeps edit rights until someone accepts the ticket
    if &ticket.created_by == actor {
        let unaccepted = matches!(ticket.status, TicketStatus::New | TicketStatus::Open)
            && ticket.assigned_to.is_none();
        if unaccepted {
            return Ok(());
        }
        return Err(Error::PermissionDenied(DenialReason::TicketAlreadyAccepted));
    }

    if ticket.assigned_to.as_ref() == Some(actor) {
        return Ok(());
    }

    Err(Error::PermissionDenied(DenialReason::NoPermission))
}

/// Non-throwing edit probe: false on any denial, reason suppressed.
///
/// Used by read-only "can I edit?" queries where the caller only needs a
/// yes/no.
pub fn can_edit(ticket: &Ticket, actor: &UserId, role: Role) -> bool {
    check_edit(ticket, actor, role).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Impact, Priority, SlaTier, TicketId, TicketSource, TicketType, Urgency};
    use chrono::Utc;
    use rstest::rstest;

    fn ticket(status: TicketStatus, assigned_to: Option<&str>) -> Ticket {
        let now = Utc::now();
        Ticket {
            id: TicketId::new(),
            ticket_number: "INC-0001".to_string(),
            title: "Test ticket".to_string(),
            description: String::new(),
            ticket_type: TicketType::Incident,
            priority: Priority::Medium,
            impact: Impact::Low,
            urgency: Urgency::Low,
            status,
            sla_tier: SlaTier::Basic,
            due_date: now,
            resolution_date: None,
            source: TicketSource::Web,
            category: None,
            subcategory: None,
            root_cause: None,
            preventive_measures: None,
            created_by: UserId::from("creator"),
            assigned_to: assigned_to.map(UserId::from),
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    #[case(Role::Admin)]
    #[case(Role::SupportL1)]
    #[case(Role::SupportL2)]
    #[case(Role::SupportL3)]
    fn support_roles_always_edit(#[case] role: Role) {
        let t = ticket(TicketStatus::Closed, Some("someone"));
        assert!(can_edit(&t, &UserId::from("bystander"), role));
    }

    #[test]
    fn creator_edits_unaccepted_ticket() {
        let t = ticket(TicketStatus::New, None);
        assert!(can_edit(&t, &UserId::from("creator"), Role::Client));

        let t = ticket(TicketStatus::Open, None);
        assert!(can_edit(&t, &UserId::from("creator"), Role::Client));
    }

    #[test]
    fn creator_loses_edit_once_assigned() {
        let t = ticket(TicketStatus::New, Some("agent"));
        let err = check_edit(&t, &UserId::from("creator"), Role::Client).unwrap_err();
        assert!(matches!(
            err,
            Error::PermissionDenied(DenialReason::TicketAlreadyAccepted)
        ));
    }

    #[test]
    fn creator_loses_edit_once_past_open() {
        let t = ticket(TicketStatus::InProgress, None);
        let err = check_edit(&t, &UserId::from("creator"), Role::Client).unwrap_err();
        assert!(matches!(
            err,
            Error::PermissionDenied(DenialReason::TicketAlreadyAccepted)
        ));
    }

    #[test]
    fn assignee_edits_regardless_of_status() {
        for status in [TicketStatus::InProgress, TicketStatus::Resolved, TicketStatus::Closed] {
            let t = ticket(status, Some("agent"));
            assert!(can_edit(&t, &UserId::from("agent"), Role::Client));
        }
    }

    #[rstest]
    #[case(Role::Client)]
    #[case(Role::Developer)]
    #[case(Role::ProjectManager)]
    fn unrelated_actor_denied_generic(#[case] role: Role) {
        let t = ticket(TicketStatus::Open, Some("agent"));
        let err = check_edit(&t, &UserId::from("bystander"), role).unwrap_err();
        assert!(matches!(
            err,
            Error::PermissionDenied(DenialReason::NoPermission)
        ));
    }

    #[test]
    fn query_form_suppresses_reason() {
        let t = ticket(TicketStatus::InProgress, Some("agent"));
        assert!(!can_edit(&t, &UserId::from("creator"), Role::Client));
        assert!(!can_edit(&t, &UserId::from("bystander"), Role::Client));
    }
}
