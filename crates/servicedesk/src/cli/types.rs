//! CLI-facing value enums.
//!
//! These bridge clap's `ValueEnum` parsing to the domain enums, keeping
//! clap derive attributes out of the domain module.

use crate::domain::{Impact, Priority, Role, TicketSource, TicketStatus, TicketType, Urgency};
use clap::ValueEnum;

/// Ticket type argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TicketTypeArg {
    /// Unplanned service interruption
    Incident,
    /// Request for access or a standard change
    #[value(name = "service-request", alias = "request")]
    ServiceRequest,
    /// Root-cause investigation
    Problem,
    /// Planned modification
    Change,
}

impl From<TicketTypeArg> for TicketType {
    fn from(arg: TicketTypeArg) -> Self {
        match arg {
            TicketTypeArg::Incident => TicketType::Incident,
            TicketTypeArg::ServiceRequest => TicketType::ServiceRequest,
            TicketTypeArg::Problem => TicketType::Problem,
            TicketTypeArg::Change => TicketType::Change,
        }
    }
}

/// Priority argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    /// Can wait
    Low,
    /// Normal queue order
    Medium,
    /// Ahead of the queue
    High,
    /// Work stops until addressed
    Critical,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
            PriorityArg::Critical => Priority::Critical,
        }
    }
}

/// Impact argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImpactArg {
    /// Single user
    Low,
    /// A team
    Medium,
    /// A department or site
    High,
    /// The whole organization
    Critical,
}

impl From<ImpactArg> for Impact {
    fn from(arg: ImpactArg) -> Self {
        match arg {
            ImpactArg::Low => Impact::Low,
            ImpactArg::Medium => Impact::Medium,
            ImpactArg::High => Impact::High,
            ImpactArg::Critical => Impact::Critical,
        }
    }
}

/// Urgency argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UrgencyArg {
    /// No time pressure
    Low,
    /// Normal time pressure
    Medium,
    /// Soon
    High,
    /// Immediately
    Critical,
}

impl From<UrgencyArg> for Urgency {
    fn from(arg: UrgencyArg) -> Self {
        match arg {
            UrgencyArg::Low => Urgency::Low,
            UrgencyArg::Medium => Urgency::Medium,
            UrgencyArg::High => Urgency::High,
            UrgencyArg::Critical => Urgency::Critical,
        }
    }
}

/// Ticket status argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Just created
    New,
    /// Triaged, waiting for an owner
    Open,
    /// Actively worked on
    #[value(name = "in-progress", alias = "in_progress")]
    InProgress,
    /// Waiting on the requester
    #[value(name = "pending-user", alias = "pending_user")]
    PendingUser,
    /// Waiting on a third party
    #[value(name = "pending-vendor", alias = "pending_vendor")]
    PendingVendor,
    /// Fix delivered
    Resolved,
    /// Confirmed done
    Closed,
    /// Abandoned
    Cancelled,
}

impl From<StatusArg> for TicketStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::New => TicketStatus::New,
            StatusArg::Open => TicketStatus::Open,
            StatusArg::InProgress => TicketStatus::InProgress,
            StatusArg::PendingUser => TicketStatus::PendingUser,
            StatusArg::PendingVendor => TicketStatus::PendingVendor,
            StatusArg::Resolved => TicketStatus::Resolved,
            StatusArg::Closed => TicketStatus::Closed,
            StatusArg::Cancelled => TicketStatus::Cancelled,
        }
    }
}

/// Intake channel argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    /// Self-service portal
    Web,
    /// Inbound email
    Email,
    /// Phone call
    Phone,
    /// Live chat
    Chat,
}

impl From<SourceArg> for TicketSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Web => TicketSource::Web,
            SourceArg::Email => TicketSource::Email,
            SourceArg::Phone => TicketSource::Phone,
            SourceArg::Chat => TicketSource::Chat,
        }
    }
}

/// Role argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    /// Full administrative access
    Admin,
    /// First-line support
    #[value(name = "support-l1", alias = "support_l1")]
    SupportL1,
    /// Second-line support
    #[value(name = "support-l2", alias = "support_l2")]
    SupportL2,
    /// Third-line support
    #[value(name = "support-l3", alias = "support_l3")]
    SupportL3,
    /// Engineering staff
    Developer,
    /// Project management staff
    #[value(name = "project-manager", alias = "project_manager")]
    ProjectManager,
    /// End user
    Client,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Admin => Role::Admin,
            RoleArg::SupportL1 => Role::SupportL1,
            RoleArg::SupportL2 => Role::SupportL2,
            RoleArg::SupportL3 => Role::SupportL3,
            RoleArg::Developer => Role::Developer,
            RoleArg::ProjectManager => Role::ProjectManager,
            RoleArg::Client => Role::Client,
        }
    }
}
