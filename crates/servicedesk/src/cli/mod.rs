//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for the service desk
//! using clap's derive API. Each command has its own argument struct with
//! validation and helpful error messages.
//!
//! # Commands
//!
//! - `init`: Initialize a service desk workspace
//! - `create`: Raise a new ticket
//! - `list`: List tickets with optional filters
//! - `show`: Show ticket details
//! - `update`: Update ticket fields
//! - `assign`: Assign or unassign a ticket
//! - `status`: Change a ticket's status
//! - `priority`: Change a ticket's priority
//! - `comment`: Add a comment
//! - `time`: Log a time entry
//! - `can-edit`: Check edit permission for the acting user
//! - `audit`: Show a ticket's audit trail
//! - `stats`: Show summary statistics
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//! - `--actor` / `--role`: The acting user identity; falls back to the
//!   workspace's configured default actor
//!
//! # Example
//!
//! ```bash
//! servicedesk create --title "VPN down" --type incident --priority critical
//! servicedesk assign INC-0001 alice --actor bob --role support-l1
//! servicedesk status INC-0001 resolved --actor alice --role support-l1
//! ```

mod args;
mod execute;
mod types;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};

// Re-export argument structs
pub use args::{
    AssignArgs, AuditArgs, CanEditArgs, CommentArgs, CreateArgs, InitArgs, ListArgs, PriorityArgs,
    ShowArgs, StatsArgs, StatusArgs, TimeArgs, UpdateArgs,
};

// Re-export types
pub use types::{
    ImpactArg, PriorityArg, RoleArg, SourceArg, StatusArg, TicketTypeArg, UrgencyArg,
};

// Re-export validators for external use
pub use validators::{validate_description, validate_title};

/// Servicedesk - an ITSM ticket lifecycle and SLA engine
///
/// Track incidents, service requests, problems, and changes with SLA
/// deadlines and an append-only audit trail. Tickets are stored in
/// `.servicedesk/tickets.jsonl` for easy version control integration.
#[derive(Parser, Debug)]
#[command(name = "servicedesk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Acting user name (overrides the configured default actor)
    #[arg(long, global = true)]
    pub actor: Option<String>,

    /// Acting user role (overrides the configured default role)
    #[arg(long, global = true, value_enum)]
    pub role: Option<RoleArg>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a service desk workspace
    ///
    /// Creates the `.servicedesk/` directory with configuration and an
    /// empty ticket database. Run this once in your project root.
    Init(InitArgs),

    /// Raise a new ticket
    ///
    /// Assigns the next sequential ticket number for the type, derives the
    /// SLA tier from priority and impact, and computes the due date.
    Create(CreateArgs),

    /// List tickets with optional filters
    ///
    /// Shows tickets matching the filter criteria, newest first,
    /// paginated.
    List(ListArgs),

    /// Show detailed information about a ticket
    Show(ShowArgs),

    /// Update ticket fields
    ///
    /// Only provided fields are updated. The acting user must hold edit
    /// permission for the ticket's current state.
    Update(UpdateArgs),

    /// Assign or unassign a ticket
    Assign(AssignArgs),

    /// Change a ticket's status
    ///
    /// Moving into resolved or closed stamps the resolution date.
    Status(StatusArgs),

    /// Change a ticket's priority
    ///
    /// The SLA tier and due date keep their creation values.
    Priority(PriorityArgs),

    /// Add a comment to a ticket
    Comment(CommentArgs),

    /// Log time spent on a ticket
    Time(TimeArgs),

    /// Check whether the acting user can edit a ticket
    #[command(name = "can-edit")]
    CanEdit(CanEditArgs),

    /// Show a ticket's audit trail
    Audit(AuditArgs),

    /// Show summary statistics
    Stats(StatsArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        let actor = self.actor.as_deref();
        let role = self.role.map(Into::into);

        match &self.command {
            Some(Commands::Init(args)) => execute::execute_init(args).await,
            Some(Commands::Create(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                let (actor, _role) = app.resolve_actor(actor, role)?;
                execute::execute_create(&mut app, args, actor, output_mode).await
            }
            Some(Commands::List(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_list(&app, args, output_mode).await
            }
            Some(Commands::Show(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_show(&app, args, output_mode).await
            }
            Some(Commands::Update(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                let (actor, role) = app.resolve_actor(actor, role)?;
                execute::execute_update(&mut app, args, actor, role, output_mode).await
            }
            Some(Commands::Assign(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                let (actor, role) = app.resolve_actor(actor, role)?;
                execute::execute_assign(&mut app, args, actor, role, output_mode).await
            }
            Some(Commands::Status(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                let (actor, role) = app.resolve_actor(actor, role)?;
                execute::execute_status(&mut app, args, actor, role, output_mode).await
            }
            Some(Commands::Priority(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                let (actor, role) = app.resolve_actor(actor, role)?;
                execute::execute_priority(&mut app, args, actor, role, output_mode).await
            }
            Some(Commands::Comment(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                let (actor, _role) = app.resolve_actor(actor, role)?;
                execute::execute_comment(&mut app, args, actor, output_mode).await
            }
            Some(Commands::Time(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                let (actor, _role) = app.resolve_actor(actor, role)?;
                execute::execute_time(&mut app, args, actor, output_mode).await
            }
            Some(Commands::CanEdit(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                let (actor, role) = app.resolve_actor(actor, role)?;
                execute::execute_can_edit(&app, args, actor, role, output_mode).await
            }
            Some(Commands::Audit(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_audit(&app, args, output_mode).await
            }
            Some(Commands::Stats(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_stats(&app, args, output_mode).await
            }
            None => {
                println!("Servicedesk ticket tracking system");
                println!("Use --help for more information");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== CLI Parsing Tests ==========

    #[test]
    fn parse_no_command() {
        let cli = Cli::try_parse_from(["servicedesk"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn parse_global_json_flag() {
        let cli = Cli::try_parse_from(["servicedesk", "--json", "list"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Some(Commands::List(_))));
    }

    #[test]
    fn parse_global_actor_and_role() {
        let cli = Cli::try_parse_from([
            "servicedesk",
            "--actor",
            "alice",
            "--role",
            "support-l1",
            "stats",
        ])
        .unwrap();
        assert_eq!(cli.actor, Some("alice".to_string()));
        assert_eq!(cli.role, Some(RoleArg::SupportL1));
    }

    #[test]
    fn parse_init_with_default_actor() {
        let cli =
            Cli::try_parse_from(["servicedesk", "init", "--actor", "alice", "--role", "admin"])
                .unwrap();
        match cli.command {
            Some(Commands::Init(args)) => {
                assert_eq!(args.actor, Some("alice".to_string()));
                assert_eq!(args.role, Some(RoleArg::Admin));
                assert!(!args.quiet);
            }
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn parse_create_minimal() {
        let cli = Cli::try_parse_from([
            "servicedesk",
            "create",
            "--title",
            "VPN down",
            "--type",
            "incident",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Create(args)) => {
                assert_eq!(args.title, "VPN down");
                assert_eq!(args.ticket_type, TicketTypeArg::Incident);
                assert!(args.priority.is_none());
                assert!(args.impact.is_none());
            }
            _ => panic!("Expected Create command"),
        }
    }

    #[test]
    fn parse_create_full() {
        let cli = Cli::try_parse_from([
            "servicedesk",
            "create",
            "--title",
            "Mail outage",
            "--description",
            "Nobody can send",
            "--type",
            "incident",
            "--priority",
            "critical",
            "--impact",
            "high",
            "--urgency",
            "critical",
            "--source",
            "phone",
            "--category",
            "email",
            "--assignee",
            "alice",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Create(args)) => {
                assert_eq!(args.title, "Mail outage");
                assert_eq!(args.priority, Some(PriorityArg::Critical));
                assert_eq!(args.impact, Some(ImpactArg::High));
                assert_eq!(args.urgency, Some(UrgencyArg::Critical));
                assert_eq!(args.source, Some(SourceArg::Phone));
                assert_eq!(args.category, Some("email".to_string()));
                assert_eq!(args.assignee, Some("alice".to_string()));
            }
            _ => panic!("Expected Create command"),
        }
    }

    #[test]
    fn parse_create_requires_title_and_type() {
        assert!(Cli::try_parse_from(["servicedesk", "create", "--type", "incident"]).is_err());
        assert!(Cli::try_parse_from(["servicedesk", "create", "--title", "x"]).is_err());
    }

    #[test]
    fn parse_create_rejects_empty_title() {
        let result =
            Cli::try_parse_from(["servicedesk", "create", "--title", "", "--type", "problem"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_list_with_filters() {
        let cli = Cli::try_parse_from([
            "servicedesk",
            "list",
            "--status",
            "in-progress",
            "--type",
            "service-request",
            "--priority",
            "high",
            "--assignee",
            "bob",
            "--per-page",
            "10",
            "--page",
            "2",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::List(args)) => {
                assert_eq!(args.status, Some(StatusArg::InProgress));
                assert_eq!(args.ticket_type, Some(TicketTypeArg::ServiceRequest));
                assert_eq!(args.priority, Some(PriorityArg::High));
                assert_eq!(args.assignee, Some("bob".to_string()));
                assert_eq!(args.per_page, 10);
                assert_eq!(args.page, 2);
            }
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn parse_list_status_underscore_alias() {
        let cli = Cli::try_parse_from(["servicedesk", "list", "--status", "pending_user"]).unwrap();
        match cli.command {
            Some(Commands::List(args)) => {
                assert_eq!(args.status, Some(StatusArg::PendingUser));
            }
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn parse_show() {
        let cli = Cli::try_parse_from(["servicedesk", "show", "INC-0001"]).unwrap();
        match cli.command {
            Some(Commands::Show(args)) => {
                assert_eq!(args.ticket, "INC-0001");
                assert!(!args.comments);
            }
            _ => panic!("Expected Show command"),
        }
    }

    #[test]
    fn parse_update() {
        let cli = Cli::try_parse_from([
            "servicedesk",
            "update",
            "PRB-0002",
            "--title",
            "New title",
            "--root-cause",
            "Bad switch firmware",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Update(args)) => {
                assert_eq!(args.ticket, "PRB-0002");
                assert_eq!(args.title, Some("New title".to_string()));
                assert_eq!(args.root_cause, Some("Bad switch firmware".to_string()));
            }
            _ => panic!("Expected Update command"),
        }
    }

    #[test]
    fn parse_assign() {
        let cli = Cli::try_parse_from(["servicedesk", "assign", "INC-0001", "alice"]).unwrap();
        match cli.command {
            Some(Commands::Assign(args)) => {
                assert_eq!(args.assignee, Some("alice".to_string()));
                assert!(!args.clear);
            }
            _ => panic!("Expected Assign command"),
        }
    }

    #[test]
    fn parse_assign_clear() {
        let cli = Cli::try_parse_from(["servicedesk", "assign", "INC-0001", "--clear"]).unwrap();
        match cli.command {
            Some(Commands::Assign(args)) => {
                assert!(args.assignee.is_none());
                assert!(args.clear);
            }
            _ => panic!("Expected Assign command"),
        }
    }

    #[test]
    fn parse_assign_requires_assignee_or_clear() {
        assert!(Cli::try_parse_from(["servicedesk", "assign", "INC-0001"]).is_err());
        assert!(
            Cli::try_parse_from(["servicedesk", "assign", "INC-0001", "alice", "--clear"]).is_err()
        );
    }

    #[test]
    fn parse_status_change() {
        let cli = Cli::try_parse_from(["servicedesk", "status", "INC-0001", "resolved"]).unwrap();
        match cli.command {
            Some(Commands::Status(args)) => {
                assert_eq!(args.ticket, "INC-0001");
                assert_eq!(args.status, StatusArg::Resolved);
            }
            _ => panic!("Expected Status command"),
        }
    }

    #[test]
    fn parse_priority_change() {
        let cli = Cli::try_parse_from(["servicedesk", "priority", "CHG-0003", "high"]).unwrap();
        match cli.command {
            Some(Commands::Priority(args)) => {
                assert_eq!(args.priority, PriorityArg::High);
            }
            _ => panic!("Expected Priority command"),
        }
    }

    #[test]
    fn parse_comment() {
        let cli = Cli::try_parse_from([
            "servicedesk",
            "comment",
            "INC-0001",
            "Restarted the router",
            "--internal",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Comment(args)) => {
                assert_eq!(args.content, "Restarted the router");
                assert!(args.internal);
            }
            _ => panic!("Expected Comment command"),
        }
    }

    #[test]
    fn parse_time_entry() {
        let cli = Cli::try_parse_from([
            "servicedesk",
            "time",
            "INC-0001",
            "45",
            "--billable",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Time(args)) => {
                assert_eq!(args.minutes, 45);
                assert!(args.billable);
            }
            _ => panic!("Expected Time command"),
        }
    }

    #[test]
    fn parse_time_rejects_zero_minutes() {
        assert!(Cli::try_parse_from(["servicedesk", "time", "INC-0001", "0"]).is_err());
    }

    #[test]
    fn parse_can_edit() {
        let cli = Cli::try_parse_from(["servicedesk", "can-edit", "INC-0001"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::CanEdit(_))));
    }

    #[test]
    fn parse_audit() {
        let cli = Cli::try_parse_from(["servicedesk", "audit", "REQ-0004"]).unwrap();
        match cli.command {
            Some(Commands::Audit(args)) => {
                assert_eq!(args.ticket, "REQ-0004");
            }
            _ => panic!("Expected Audit command"),
        }
    }

    #[test]
    fn parse_stats_with_assignee() {
        let cli = Cli::try_parse_from(["servicedesk", "stats", "--assignee", "alice"]).unwrap();
        match cli.command {
            Some(Commands::Stats(args)) => {
                assert_eq!(args.assignee, Some("alice".to_string()));
            }
            _ => panic!("Expected Stats command"),
        }
    }
}
