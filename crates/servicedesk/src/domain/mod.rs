//! Domain types for the service desk.
//!
//! This module contains the core domain types for ticket tracking: the
//! ticket itself, its closed enum vocabularies, and the DTOs used to
//! create, patch, and query tickets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum ticket title length in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum ticket description length in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;

/// Maximum page size for ticket queries.
pub const MAX_PAGE_SIZE: usize = 100;

/// Default page size for ticket queries.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Unique identifier for a ticket
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(pub Uuid);

impl TicketId {
    /// Create a new random ticket ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a ticket ID from its string form
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// Create a new user ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Kind of ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketType {
    /// Unplanned service interruption
    Incident,

    /// Request for access, information, or a standard change
    ServiceRequest,

    /// Root-cause investigation behind one or more incidents
    Problem,

    /// Planned modification to a service
    Change,
}

impl TicketType {
    /// All ticket types, for populating selection lists
    pub const ALL: [TicketType; 4] = [
        TicketType::Incident,
        TicketType::ServiceRequest,
        TicketType::Problem,
        TicketType::Change,
    ];
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TicketType::Incident => "INCIDENT",
            TicketType::ServiceRequest => "SERVICE_REQUEST",
            TicketType::Problem => "PROBLEM",
            TicketType::Change => "CHANGE",
        };
        write!(f, "{s}")
    }
}

/// Ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    /// Can wait for the next maintenance window
    Low,

    /// Normal queue order
    Medium,

    /// Needs attention ahead of the normal queue
    High,

    /// Business-critical, work stops until addressed
    Critical,
}

impl Priority {
    /// All priorities, for populating selection lists
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Critical => "CRITICAL",
        };
        write!(f, "{s}")
    }
}

/// Breadth of the disruption caused by a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Impact {
    /// Single user affected
    Low,

    /// A team affected
    Medium,

    /// A department or site affected
    High,

    /// The whole organization affected
    Critical,
}

impl Impact {
    /// All impact levels, for populating selection lists
    pub const ALL: [Impact; 4] = [Impact::Low, Impact::Medium, Impact::High, Impact::Critical];
}

impl Default for Impact {
    fn default() -> Self {
        Impact::Low
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Impact::Low => "LOW",
            Impact::Medium => "MEDIUM",
            Impact::High => "HIGH",
            Impact::Critical => "CRITICAL",
        };
        write!(f, "{s}")
    }
}

/// How quickly the requester needs a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    /// No time pressure
    Low,

    /// Normal time pressure
    Medium,

    /// Resolution needed soon
    High,

    /// Resolution needed immediately
    Critical,
}

impl Urgency {
    /// All urgency levels, for populating selection lists
    pub const ALL: [Urgency; 4] = [
        Urgency::Low,
        Urgency::Medium,
        Urgency::High,
        Urgency::Critical,
    ];
}

impl Default for Urgency {
    fn default() -> Self {
        Urgency::Low
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Urgency::Low => "LOW",
            Urgency::Medium => "MEDIUM",
            Urgency::High => "HIGH",
            Urgency::Critical => "CRITICAL",
        };
        write!(f, "{s}")
    }
}

/// Lifecycle status of a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// Just created, not yet triaged
    New,

    /// Triaged and waiting for an owner
    Open,

    /// Actively being worked on
    InProgress,

    /// Waiting on information from the requester
    PendingUser,

    /// Waiting on a third party
    PendingVendor,

    /// Fix delivered, awaiting confirmation
    Resolved,

    /// Confirmed done
    Closed,

    /// Abandoned without resolution
    Cancelled,
}

impl TicketStatus {
    /// All statuses, for populating selection lists
    pub const ALL: [TicketStatus; 8] = [
        TicketStatus::New,
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::PendingUser,
        TicketStatus::PendingVendor,
        TicketStatus::Resolved,
        TicketStatus::Closed,
        TicketStatus::Cancelled,
    ];

    /// Whether entering this status stamps the resolution date.
    ///
    /// Only Resolved and Closed do; Cancelled ends the lifecycle without a
    /// resolution.
    pub fn sets_resolution(self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }

    /// Whether the ticket still counts against its SLA deadline
    pub fn is_active(self) -> bool {
        !matches!(
            self,
            TicketStatus::Resolved | TicketStatus::Closed | TicketStatus::Cancelled
        )
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TicketStatus::New => "NEW",
            TicketStatus::Open => "OPEN",
            TicketStatus::InProgress => "IN_PROGRESS",
            TicketStatus::PendingUser => "PENDING_USER",
            TicketStatus::PendingVendor => "PENDING_VENDOR",
            TicketStatus::Resolved => "RESOLVED",
            TicketStatus::Closed => "CLOSED",
            TicketStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}

/// Service-level commitment tier, fixed at ticket creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlaTier {
    /// 72-hour response window
    Basic,

    /// 24-hour response window
    Standard,

    /// 4-hour response window
    Premium,
}

impl SlaTier {
    /// All tiers, for populating selection lists
    pub const ALL: [SlaTier; 3] = [SlaTier::Basic, SlaTier::Standard, SlaTier::Premium];
}

impl fmt::Display for SlaTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SlaTier::Basic => "BASIC",
            SlaTier::Standard => "STANDARD",
            SlaTier::Premium => "PREMIUM",
        };
        write!(f, "{s}")
    }
}

/// Intake channel a ticket arrived through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketSource {
    /// Self-service web portal
    Web,

    /// Inbound email
    Email,

    /// Phone call to the desk
    Phone,

    /// Live chat
    Chat,
}

impl TicketSource {
    /// All intake channels, for populating selection lists
    pub const ALL: [TicketSource; 4] = [
        TicketSource::Web,
        TicketSource::Email,
        TicketSource::Phone,
        TicketSource::Chat,
    ];
}

impl Default for TicketSource {
    fn default() -> Self {
        TicketSource::Web
    }
}

impl fmt::Display for TicketSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TicketSource::Web => "WEB",
            TicketSource::Email => "EMAIL",
            TicketSource::Phone => "PHONE",
            TicketSource::Chat => "CHAT",
        };
        write!(f, "{s}")
    }
}

/// User role, as carried in the authenticated request context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full administrative access
    Admin,

    /// First-line support
    SupportL1,

    /// Second-line support
    SupportL2,

    /// Third-line support
    SupportL3,

    /// Engineering staff
    Developer,

    /// Project management staff
    ProjectManager,

    /// End user raising tickets
    Client,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Admin => "ADMIN",
            Role::SupportL1 => "SUPPORT_L1",
            Role::SupportL2 => "SUPPORT_L2",
            Role::SupportL3 => "SUPPORT_L3",
            Role::Developer => "DEVELOPER",
            Role::ProjectManager => "PROJECT_MANAGER",
            Role::Client => "CLIENT",
        };
        write!(f, "{s}")
    }
}

/// A tracked unit of support work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique identifier
    pub id: TicketId,

    /// Human-readable number, e.g. "INC-0042". Assigned at creation,
    /// immutable afterwards.
    pub ticket_number: String,

    /// Short summary
    pub title: String,

    /// Detailed description
    pub description: String,

    /// Kind of ticket
    pub ticket_type: TicketType,

    /// Priority level
    pub priority: Priority,

    /// Breadth of disruption
    pub impact: Impact,

    /// Requester time pressure
    pub urgency: Urgency,

    /// Current lifecycle status
    pub status: TicketStatus,

    /// Service-level tier, derived at creation and never recomputed
    pub sla_tier: SlaTier,

    /// Response deadline, derived from the SLA tier at creation
    pub due_date: DateTime<Utc>,

    /// When the ticket entered Resolved or Closed; set exactly once
    pub resolution_date: Option<DateTime<Utc>>,

    /// Intake channel
    pub source: TicketSource,

    /// Category label (optional)
    pub category: Option<String>,

    /// Subcategory label (optional)
    pub subcategory: Option<String>,

    /// Root cause, for problem tickets (optional)
    pub root_cause: Option<String>,

    /// Preventive measures, for problem tickets (optional)
    pub preventive_measures: Option<String>,

    /// User who raised the ticket
    pub created_by: UserId,

    /// Current owner (optional)
    pub assigned_to: Option<UserId>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// A comment on a ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier
    pub id: Uuid,

    /// Ticket this comment belongs to
    pub ticket_id: TicketId,

    /// Comment author
    pub author: UserId,

    /// Comment body
    pub content: String,

    /// Internal comments are visible to support staff only
    pub is_internal: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A logged unit of work against a ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Unique identifier
    pub id: Uuid,

    /// Ticket the time was spent on
    pub ticket_id: TicketId,

    /// User who did the work
    pub user: UserId,

    /// Time spent, in minutes
    pub minutes_spent: u32,

    /// What the time was spent on (optional)
    pub description: Option<String>,

    /// Whether the time is billable
    pub billable: bool,

    /// When the work started
    pub started_at: DateTime<Utc>,

    /// When the entry was recorded
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new ticket.
///
/// Optional severity fields take their documented defaults when absent:
/// priority Medium, impact Low, urgency Low, source Web.
#[derive(Debug, Clone)]
pub struct NewTicket {
    /// Short summary
    pub title: String,

    /// Detailed description
    pub description: String,

    /// Kind of ticket
    pub ticket_type: TicketType,

    /// Priority (defaults to Medium)
    pub priority: Option<Priority>,

    /// Impact (defaults to Low)
    pub impact: Option<Impact>,

    /// Urgency (defaults to Low)
    pub urgency: Option<Urgency>,

    /// Intake channel (defaults to Web)
    pub source: Option<TicketSource>,

    /// Category label
    pub category: Option<String>,

    /// Subcategory label
    pub subcategory: Option<String>,

    /// Initial owner
    pub assigned_to: Option<UserId>,
}

impl NewTicket {
    /// Minimal constructor; severity fields take their defaults.
    pub fn new(title: impl Into<String>, description: impl Into<String>, ticket_type: TicketType) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ticket_type,
            priority: None,
            impact: None,
            urgency: None,
            source: None,
            category: None,
            subcategory: None,
            assigned_to: None,
        }
    }

    /// Validate creation input.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first failed constraint.
    pub fn validate(&self) -> std::result::Result<(), String> {
        validate_title(&self.title)?;
        validate_description(&self.description)?;
        Ok(())
    }
}

/// Data for updating an existing ticket.
///
/// Only fields present are modified. `assigned_to` uses a nested Option so
/// a patch can distinguish "leave unchanged" (None) from "clear the
/// assignee" (Some(None)).
#[derive(Debug, Clone, Default)]
pub struct TicketPatch {
    /// New title (if updating)
    pub title: Option<String>,

    /// New description (if updating)
    pub description: Option<String>,

    /// New priority (if updating)
    pub priority: Option<Priority>,

    /// New status (if updating)
    pub status: Option<TicketStatus>,

    /// New impact (if updating)
    pub impact: Option<Impact>,

    /// New urgency (if updating)
    pub urgency: Option<Urgency>,

    /// New category (if updating)
    pub category: Option<String>,

    /// New subcategory (if updating)
    pub subcategory: Option<String>,

    /// New root cause (if updating)
    pub root_cause: Option<String>,

    /// New preventive measures (if updating)
    pub preventive_measures: Option<String>,

    /// New assignee (if updating; Some(None) clears)
    pub assigned_to: Option<Option<UserId>>,
}

impl TicketPatch {
    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.impact.is_none()
            && self.urgency.is_none()
            && self.category.is_none()
            && self.subcategory.is_none()
            && self.root_cause.is_none()
            && self.preventive_measures.is_none()
            && self.assigned_to.is_none()
    }
}

/// Filter and pagination for querying tickets
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    /// Filter by status
    pub status: Option<TicketStatus>,

    /// Filter by ticket type
    pub ticket_type: Option<TicketType>,

    /// Filter by priority
    pub priority: Option<Priority>,

    /// Filter by assignee
    pub assigned_to: Option<UserId>,

    /// Filter by creator
    pub created_by: Option<UserId>,

    /// Filter by category
    pub category: Option<String>,

    /// Case-insensitive substring match over title, description, and
    /// ticket number
    pub search: Option<String>,

    /// 1-based page number (defaults to 1)
    pub page: Option<usize>,

    /// Page size (defaults to 20, capped at 100)
    pub per_page: Option<usize>,
}

impl TicketFilter {
    /// Effective 1-based page number
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    /// Effective page size, clamped to the maximum
    pub fn per_page(&self) -> usize {
        self.per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Whether a ticket matches the filter criteria (pagination aside)
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if let Some(status) = self.status {
            if ticket.status != status {
                return false;
            }
        }
        if let Some(ticket_type) = self.ticket_type {
            if ticket.ticket_type != ticket_type {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if ticket.priority != priority {
                return false;
            }
        }
        if let Some(assignee) = &self.assigned_to {
            if ticket.assigned_to.as_ref() != Some(assignee) {
                return false;
            }
        }
        if let Some(creator) = &self.created_by {
            if &ticket.created_by != creator {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if ticket.category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = ticket.title.to_lowercase().contains(&needle)
                || ticket.description.to_lowercase().contains(&needle)
                || ticket.ticket_number.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        true
    }
}

/// One page of ticket query results
#[derive(Debug, Clone, Serialize)]
pub struct TicketPage {
    /// Tickets on this page, newest first
    pub tickets: Vec<Ticket>,

    /// Total matching tickets across all pages
    pub total: usize,

    /// 1-based page number
    pub page: usize,

    /// Total number of pages
    pub total_pages: usize,
}

/// Summary counts over the ticket set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TicketStats {
    /// All tickets in scope
    pub total: usize,

    /// New or Open
    pub open: usize,

    /// In progress
    pub in_progress: usize,

    /// Resolved
    pub resolved: usize,

    /// Past due date and still active
    pub overdue: usize,

    /// Priority High
    pub high_priority: usize,

    /// Priority Critical
    pub critical: usize,
}

/// Validate a ticket title
pub fn validate_title(title: &str) -> std::result::Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title cannot be empty".to_string());
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(format!("Title cannot exceed {MAX_TITLE_LENGTH} characters"));
    }
    Ok(())
}

/// Validate a ticket description
pub fn validate_description(description: &str) -> std::result::Result<(), String> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(format!(
            "Description cannot exceed {MAX_DESCRIPTION_LENGTH} characters"
        ));
    }
    Ok(())
}

impl Ticket {
    /// Validate ticket state after a patch has been applied.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first failed constraint.
    pub fn validate(&self) -> std::result::Result<(), String> {
        validate_title(&self.title)?;
        validate_description(&self.description)?;
        Ok(())
    }

    /// Whether the ticket is past its due date and still active
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status.is_active() && self.due_date < now
    }
}
