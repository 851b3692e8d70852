//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::Parser;

use super::types::{
    ImpactArg, PriorityArg, RoleArg, SourceArg, StatusArg, TicketTypeArg, UrgencyArg,
};
use super::validators::{validate_description, validate_title};

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Default acting user name stored in configuration
    #[arg(long)]
    pub actor: Option<String>,

    /// Default acting user role stored in configuration
    #[arg(long, value_enum)]
    pub role: Option<RoleArg>,

    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the `create` command
#[derive(Parser, Debug, Clone)]
pub struct CreateArgs {
    /// Ticket title (maximum 200 characters)
    #[arg(long, value_parser = validate_title)]
    pub title: String,

    /// Detailed description
    #[arg(short = 'D', long, value_parser = validate_description, default_value = "")]
    pub description: String,

    /// Ticket type
    #[arg(short = 't', long = "type", value_enum)]
    pub ticket_type: TicketTypeArg,

    /// Priority (defaults to medium)
    #[arg(short, long, value_enum)]
    pub priority: Option<PriorityArg>,

    /// Impact (defaults to low)
    #[arg(short, long, value_enum)]
    pub impact: Option<ImpactArg>,

    /// Urgency (defaults to low)
    #[arg(short, long, value_enum)]
    pub urgency: Option<UrgencyArg>,

    /// Intake channel (defaults to web)
    #[arg(long, value_enum)]
    pub source: Option<SourceArg>,

    /// Category label
    #[arg(short, long)]
    pub category: Option<String>,

    /// Subcategory label
    #[arg(long)]
    pub subcategory: Option<String>,

    /// Initial assignee username
    #[arg(short, long)]
    pub assignee: Option<String>,
}

/// Arguments for the `list` command
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Filter by status
    #[arg(short, long, value_enum)]
    pub status: Option<StatusArg>,

    /// Filter by ticket type
    #[arg(short = 't', long = "type", value_enum)]
    pub ticket_type: Option<TicketTypeArg>,

    /// Filter by priority
    #[arg(short, long, value_enum)]
    pub priority: Option<PriorityArg>,

    /// Filter by assignee
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// Filter by creator
    #[arg(long)]
    pub creator: Option<String>,

    /// Filter by category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Free-text search over title, description, and number
    #[arg(long)]
    pub search: Option<String>,

    /// 1-based page number
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Page size (maximum 100)
    #[arg(short = 'n', long, default_value = "20")]
    pub per_page: usize,
}

/// Arguments for the `show` command
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    /// Ticket number (e.g. INC-0001) or ID
    pub ticket: String,

    /// Also show comments
    #[arg(long)]
    pub comments: bool,
}

/// Arguments for the `update` command
#[derive(Parser, Debug, Clone)]
pub struct UpdateArgs {
    /// Ticket number (e.g. INC-0001) or ID
    pub ticket: String,

    /// New title (maximum 200 characters)
    #[arg(long, value_parser = validate_title)]
    pub title: Option<String>,

    /// New description
    #[arg(short = 'D', long, value_parser = validate_description)]
    pub description: Option<String>,

    /// New impact
    #[arg(short, long, value_enum)]
    pub impact: Option<ImpactArg>,

    /// New urgency
    #[arg(short, long, value_enum)]
    pub urgency: Option<UrgencyArg>,

    /// New category
    #[arg(short, long)]
    pub category: Option<String>,

    /// New subcategory
    #[arg(long)]
    pub subcategory: Option<String>,

    /// Root cause (problem tickets)
    #[arg(long)]
    pub root_cause: Option<String>,

    /// Preventive measures (problem tickets)
    #[arg(long)]
    pub preventive_measures: Option<String>,
}

/// Arguments for the `assign` command
#[derive(Parser, Debug, Clone)]
pub struct AssignArgs {
    /// Ticket number (e.g. INC-0001) or ID
    pub ticket: String,

    /// Username to assign the ticket to
    #[arg(required_unless_present = "clear")]
    pub assignee: Option<String>,

    /// Clear the current assignee instead
    #[arg(long, conflicts_with = "assignee")]
    pub clear: bool,
}

/// Arguments for the `status` command
#[derive(Parser, Debug, Clone)]
pub struct StatusArgs {
    /// Ticket number (e.g. INC-0001) or ID
    pub ticket: String,

    /// New status
    #[arg(value_enum)]
    pub status: StatusArg,
}

/// Arguments for the `priority` command
#[derive(Parser, Debug, Clone)]
pub struct PriorityArgs {
    /// Ticket number (e.g. INC-0001) or ID
    pub ticket: String,

    /// New priority
    #[arg(value_enum)]
    pub priority: PriorityArg,
}

/// Arguments for the `comment` command
#[derive(Parser, Debug, Clone)]
pub struct CommentArgs {
    /// Ticket number (e.g. INC-0001) or ID
    pub ticket: String,

    /// Comment text
    pub content: String,

    /// Mark the comment internal (support staff only)
    #[arg(long)]
    pub internal: bool,
}

/// Arguments for the `time` command
#[derive(Parser, Debug, Clone)]
pub struct TimeArgs {
    /// Ticket number (e.g. INC-0001) or ID
    pub ticket: String,

    /// Minutes spent
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub minutes: u32,

    /// What the time was spent on
    #[arg(short = 'D', long)]
    pub description: Option<String>,

    /// Mark the time billable
    #[arg(long)]
    pub billable: bool,
}

/// Arguments for the `can-edit` command
#[derive(Parser, Debug, Clone)]
pub struct CanEditArgs {
    /// Ticket number (e.g. INC-0001) or ID
    pub ticket: String,
}

/// Arguments for the `audit` command
#[derive(Parser, Debug, Clone)]
pub struct AuditArgs {
    /// Ticket number (e.g. INC-0001) or ID
    pub ticket: String,
}

/// Arguments for the `stats` command
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Scope counts to one assignee
    #[arg(short, long)]
    pub assignee: Option<String>,
}
