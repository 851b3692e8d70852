//! Command handlers.
//!
//! Each handler drives the [`TicketDesk`] engine through the [`App`]
//! context and renders the result. Mutating handlers save storage after a
//! successful operation.
//!
//! [`TicketDesk`]: crate::desk::TicketDesk

use super::args::{
    AssignArgs, AuditArgs, CanEditArgs, CommentArgs, CreateArgs, InitArgs, ListArgs, PriorityArgs,
    ShowArgs, StatsArgs, StatusArgs, TimeArgs, UpdateArgs,
};
use crate::app::App;
use crate::commands::init::{self, ActorConfig};
use crate::domain::{
    NewTicket, Role, Ticket, TicketFilter, TicketId, TicketPatch, UserId, MAX_PAGE_SIZE,
};
use crate::output::{self, OutputMode};
use anyhow::{anyhow, bail, Result};

/// Resolve a CLI ticket reference: a UUID, or a ticket number like
/// `INC-0001` (case-insensitive).
async fn resolve_ticket(app: &App, reference: &str) -> Result<Ticket> {
    if let Some(id) = TicketId::parse(reference) {
        match app.desk().get_ticket(&id).await {
            Ok(ticket) => return Ok(ticket),
            Err(crate::error::Error::TicketNotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }

    let filter = TicketFilter {
        search: Some(reference.to_string()),
        per_page: Some(MAX_PAGE_SIZE),
        ..Default::default()
    };
    let page = app.desk().find_tickets(&filter).await?;
    page.tickets
        .into_iter()
        .find(|t| t.ticket_number.eq_ignore_ascii_case(reference))
        .ok_or_else(|| anyhow!("Ticket not found: {reference}"))
}

/// Execute the `init` command
pub async fn execute_init(args: &InitArgs) -> Result<()> {
    let default_actor = match (&args.actor, args.role) {
        (Some(name), Some(role)) => Some(ActorConfig {
            name: name.clone(),
            role: Role::from(role),
        }),
        (Some(_), None) | (None, Some(_)) => {
            bail!("--actor and --role must be given together")
        }
        (None, None) => None,
    };

    let result = init::init(&std::env::current_dir()?, default_actor).await?;

    if !args.quiet {
        output::success(&format!(
            "Initialized service desk workspace in {}",
            result.desk_dir.display()
        ));
    }
    Ok(())
}

/// Execute the `create` command
pub async fn execute_create(
    app: &mut App,
    args: &CreateArgs,
    actor: UserId,
    mode: OutputMode,
) -> Result<()> {
    let new_ticket = NewTicket {
        title: args.title.clone(),
        description: args.description.clone(),
        ticket_type: args.ticket_type.into(),
        priority: args.priority.map(Into::into),
        impact: args.impact.map(Into::into),
        urgency: args.urgency.map(Into::into),
        source: args.source.map(Into::into),
        category: args.category.clone(),
        subcategory: args.subcategory.clone(),
        assigned_to: args.assignee.as_deref().map(UserId::from),
    };

    let ticket = app.desk_mut().create_ticket(new_ticket, actor).await?;
    app.save().await?;

    output::print_ticket(&ticket, mode);
    Ok(())
}

/// Execute the `list` command
pub async fn execute_list(app: &App, args: &ListArgs, mode: OutputMode) -> Result<()> {
    let filter = TicketFilter {
        status: args.status.map(Into::into),
        ticket_type: args.ticket_type.map(Into::into),
        priority: args.priority.map(Into::into),
        assigned_to: args.assignee.as_deref().map(UserId::from),
        created_by: args.creator.as_deref().map(UserId::from),
        category: args.category.clone(),
        search: args.search.clone(),
        page: Some(args.page),
        per_page: Some(args.per_page),
    };

    let page = app.desk().find_tickets(&filter).await?;
    output::print_ticket_page(&page, mode);
    Ok(())
}

/// Execute the `show` command
pub async fn execute_show(app: &App, args: &ShowArgs, mode: OutputMode) -> Result<()> {
    let ticket = resolve_ticket(app, &args.ticket).await?;
    output::print_ticket(&ticket, mode);

    if args.comments {
        let comments = app.desk().comments(&ticket.id).await?;
        println!();
        output::print_comments(&comments, mode);
    }
    Ok(())
}

/// Execute the `update` command
pub async fn execute_update(
    app: &mut App,
    args: &UpdateArgs,
    actor: UserId,
    role: Role,
    mode: OutputMode,
) -> Result<()> {
    let ticket = resolve_ticket(app, &args.ticket).await?;

    let patch = TicketPatch {
        title: args.title.clone(),
        description: args.description.clone(),
        impact: args.impact.map(Into::into),
        urgency: args.urgency.map(Into::into),
        category: args.category.clone(),
        subcategory: args.subcategory.clone(),
        root_cause: args.root_cause.clone(),
        preventive_measures: args.preventive_measures.clone(),
        ..Default::default()
    };
    if patch.is_empty() {
        bail!("Nothing to update: pass at least one field");
    }

    let updated = app
        .desk_mut()
        .update_ticket(&ticket.id, patch, &actor, role)
        .await?;
    app.save().await?;

    output::print_ticket(&updated, mode);
    Ok(())
}

/// Execute the `assign` command
pub async fn execute_assign(
    app: &mut App,
    args: &AssignArgs,
    actor: UserId,
    role: Role,
    mode: OutputMode,
) -> Result<()> {
    let ticket = resolve_ticket(app, &args.ticket).await?;

    let assignee = if args.clear {
        None
    } else {
        args.assignee.as_deref().map(UserId::from)
    };

    let updated = app
        .desk_mut()
        .assign_ticket(&ticket.id, assignee, &actor, role)
        .await?;
    app.save().await?;

    output::print_ticket(&updated, mode);
    Ok(())
}

/// Execute the `status` command
pub async fn execute_status(
    app: &mut App,
    args: &StatusArgs,
    actor: UserId,
    role: Role,
    mode: OutputMode,
) -> Result<()> {
    let ticket = resolve_ticket(app, &args.ticket).await?;

    let updated = app
        .desk_mut()
        .change_status(&ticket.id, args.status.into(), &actor, role)
        .await?;
    app.save().await?;

    output::print_ticket(&updated, mode);
    Ok(())
}

/// Execute the `priority` command
pub async fn execute_priority(
    app: &mut App,
    args: &PriorityArgs,
    actor: UserId,
    role: Role,
    mode: OutputMode,
) -> Result<()> {
    let ticket = resolve_ticket(app, &args.ticket).await?;

    let updated = app
        .desk_mut()
        .change_priority(&ticket.id, args.priority.into(), &actor, role)
        .await?;
    app.save().await?;

    output::print_ticket(&updated, mode);
    Ok(())
}

/// Execute the `comment` command
pub async fn execute_comment(
    app: &mut App,
    args: &CommentArgs,
    actor: UserId,
    mode: OutputMode,
) -> Result<()> {
    let ticket = resolve_ticket(app, &args.ticket).await?;

    let comment = app
        .desk_mut()
        .add_comment(&ticket.id, actor, args.content.clone(), args.internal)
        .await?;
    app.save().await?;

    if mode == OutputMode::Json {
        output::print_json(&comment);
    } else {
        output::success(&format!("Added comment to {}", ticket.ticket_number));
    }
    Ok(())
}

/// Execute the `time` command
pub async fn execute_time(
    app: &mut App,
    args: &TimeArgs,
    actor: UserId,
    mode: OutputMode,
) -> Result<()> {
    let ticket = resolve_ticket(app, &args.ticket).await?;

    let entry = app
        .desk_mut()
        .add_time_entry(
            &ticket.id,
            actor,
            args.minutes,
            args.description.clone(),
            args.billable,
        )
        .await?;
    app.save().await?;

    if mode == OutputMode::Json {
        output::print_json(&entry);
    } else {
        output::success(&format!(
            "Logged {}m against {}",
            args.minutes, ticket.ticket_number
        ));
    }
    Ok(())
}

/// Execute the `can-edit` command
pub async fn execute_can_edit(
    app: &App,
    args: &CanEditArgs,
    actor: UserId,
    role: Role,
    mode: OutputMode,
) -> Result<()> {
    let ticket = resolve_ticket(app, &args.ticket).await?;
    let can_edit = app.desk().can_edit_ticket(&ticket.id, &actor, role).await?;

    if mode == OutputMode::Json {
        output::print_json(&serde_json::json!({ "canEdit": can_edit }));
    } else if can_edit {
        output::success(&format!("{actor} can edit {}", ticket.ticket_number));
    } else {
        println!("{actor} cannot edit {}", ticket.ticket_number);
    }
    Ok(())
}

/// Execute the `audit` command
pub async fn execute_audit(app: &App, args: &AuditArgs, mode: OutputMode) -> Result<()> {
    let ticket = resolve_ticket(app, &args.ticket).await?;
    let entries = app.desk().audit_trail(&ticket.id).await?;
    output::print_audit_trail(&entries, mode);
    Ok(())
}

/// Execute the `stats` command
pub async fn execute_stats(app: &App, args: &StatsArgs, mode: OutputMode) -> Result<()> {
    let assignee = args.assignee.as_deref().map(UserId::from);
    let stats = app.desk().stats(assignee.as_ref()).await?;
    output::print_stats(&stats, mode);
    Ok(())
}
