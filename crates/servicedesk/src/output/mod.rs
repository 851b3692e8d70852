//! Output formatting for CLI commands.
//!
//! This module provides utilities for formatting command output in both
//! human-readable text format and JSON format for programmatic use.
//!
//! Semantic color theme:
//!   - Success/Done:  green   (resolved/closed, permitted actions)
//!   - Warning/Active: yellow (in progress, high priority)
//!   - Error/Urgent:  red     (critical priority, overdue, denials)
//!   - Info/Reference: cyan   (ticket numbers)
//!   - Muted:         dimmed  (field labels, cancelled tickets)

use crate::audit::AuditEntry;
use crate::domain::{Comment, Priority, SlaTier, Ticket, TicketPage, TicketStats, TicketStatus};
use chrono::Utc;
use colored::Colorize;
use serde::Serialize;
use std::env;

/// How command output should be rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text with colors
    Text,

    /// JSON for programmatic use
    Json,
}

/// Whether colored output is enabled.
///
/// Respects the NO_COLOR standard (https://no-color.org/).
fn use_colors() -> bool {
    env::var("NO_COLOR").is_err()
}

fn colorize_status(status: TicketStatus) -> String {
    let text = status.to_string();
    if !use_colors() {
        return text;
    }
    match status {
        TicketStatus::New | TicketStatus::Open => text.white().to_string(),
        TicketStatus::InProgress => text.yellow().to_string(),
        TicketStatus::PendingUser | TicketStatus::PendingVendor => text.blue().to_string(),
        TicketStatus::Resolved | TicketStatus::Closed => text.green().to_string(),
        TicketStatus::Cancelled => text.dimmed().to_string(),
    }
}

fn colorize_priority(priority: Priority) -> String {
    let text = priority.to_string();
    if !use_colors() {
        return text;
    }
    match priority {
        Priority::Critical => text.red().bold().to_string(),
        Priority::High => text.yellow().to_string(),
        _ => text,
    }
}

fn colorize_tier(tier: SlaTier) -> String {
    let text = tier.to_string();
    if !use_colors() {
        return text;
    }
    match tier {
        SlaTier::Premium => text.red().to_string(),
        SlaTier::Standard => text.yellow().to_string(),
        SlaTier::Basic => text,
    }
}

fn colorize_number(number: &str) -> String {
    if !use_colors() {
        return number.to_string();
    }
    number.cyan().to_string()
}

fn field(label: &str) -> String {
    let text = format!("{label}:");
    if !use_colors() {
        return text;
    }
    text.dimmed().to_string()
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Failed to serialize output: {e}"),
    }
}

/// Print full ticket details
pub fn print_ticket(ticket: &Ticket, mode: OutputMode) {
    if mode == OutputMode::Json {
        print_json(ticket);
        return;
    }

    println!(
        "{} {}",
        colorize_number(&ticket.ticket_number),
        ticket.title.bold()
    );
    println!("  {} {}", field("type"), ticket.ticket_type);
    println!("  {} {}", field("status"), colorize_status(ticket.status));
    println!("  {} {}", field("priority"), colorize_priority(ticket.priority));
    println!("  {} {}  {} {}", field("impact"), ticket.impact, field("urgency"), ticket.urgency);
    println!("  {} {}", field("sla"), colorize_tier(ticket.sla_tier));

    let due = ticket.due_date.format("%Y-%m-%d %H:%M UTC");
    if ticket.is_overdue(Utc::now()) {
        let overdue = if use_colors() {
            "(overdue)".red().to_string()
        } else {
            "(overdue)".to_string()
        };
        println!("  {} {due} {overdue}", field("due"));
    } else {
        println!("  {} {due}", field("due"));
    }

    if let Some(resolved) = ticket.resolution_date {
        println!("  {} {}", field("resolved"), resolved.format("%Y-%m-%d %H:%M UTC"));
    }
    println!("  {} {}", field("created by"), ticket.created_by);
    match &ticket.assigned_to {
        Some(assignee) => println!("  {} {}", field("assigned to"), assignee),
        None => println!("  {} {}", field("assigned to"), "unassigned"),
    }
    if let Some(category) = &ticket.category {
        match &ticket.subcategory {
            Some(sub) => println!("  {} {category} / {sub}", field("category")),
            None => println!("  {} {category}", field("category")),
        }
    }
    if !ticket.description.is_empty() {
        println!("\n{}", ticket.description);
    }
    if let Some(root_cause) = &ticket.root_cause {
        println!("\n  {} {root_cause}", field("root cause"));
    }
    if let Some(measures) = &ticket.preventive_measures {
        println!("  {} {measures}", field("preventive measures"));
    }
}

/// Print one page of tickets as a compact list
pub fn print_ticket_page(page: &TicketPage, mode: OutputMode) {
    if mode == OutputMode::Json {
        print_json(page);
        return;
    }

    if page.tickets.is_empty() {
        println!("No tickets found");
        return;
    }

    for ticket in &page.tickets {
        let assignee = ticket
            .assigned_to
            .as_ref()
            .map_or_else(|| "-".to_string(), ToString::to_string);
        println!(
            "{:<14} {:<13} {:<9} {:<12} {}",
            colorize_number(&ticket.ticket_number),
            colorize_status(ticket.status),
            colorize_priority(ticket.priority),
            assignee,
            ticket.title
        );
    }
    println!(
        "\nPage {}/{} ({} ticket{})",
        page.page,
        page.total_pages.max(1),
        page.total,
        if page.total == 1 { "" } else { "s" }
    );
}

/// Print summary statistics
pub fn print_stats(stats: &TicketStats, mode: OutputMode) {
    if mode == OutputMode::Json {
        print_json(stats);
        return;
    }

    println!("{} {}", field("total"), stats.total);
    println!("{} {}", field("open"), stats.open);
    println!("{} {}", field("in progress"), stats.in_progress);
    println!("{} {}", field("resolved"), stats.resolved);
    let overdue = if stats.overdue > 0 && use_colors() {
        stats.overdue.to_string().red().to_string()
    } else {
        stats.overdue.to_string()
    };
    println!("{} {overdue}", field("overdue"));
    println!("{} {}", field("high priority"), stats.high_priority);
    println!("{} {}", field("critical"), stats.critical);
}

/// Print an audit trail, newest entry first
pub fn print_audit_trail(entries: &[AuditEntry], mode: OutputMode) {
    if mode == OutputMode::Json {
        print_json(&entries);
        return;
    }

    if entries.is_empty() {
        println!("No audit entries");
        return;
    }

    for entry in entries {
        println!(
            "{} {} {} {}",
            entry.created_at.format("%Y-%m-%d %H:%M:%S"),
            entry.action,
            field("by"),
            entry.actor
        );
        if let Some(new_value) = &entry.new_value {
            println!("  {} {new_value}", field("change"));
        }
    }
}

/// Print a list of comments, oldest first
pub fn print_comments(comments: &[Comment], mode: OutputMode) {
    if mode == OutputMode::Json {
        print_json(&comments);
        return;
    }

    if comments.is_empty() {
        println!("No comments");
        return;
    }

    for comment in comments {
        let marker = if comment.is_internal { " [internal]" } else { "" };
        println!(
            "{} {}{marker}",
            comment.created_at.format("%Y-%m-%d %H:%M:%S"),
            comment.author
        );
        println!("  {}", comment.content);
    }
}

/// Print a success message (green)
pub fn success(text: &str) {
    if use_colors() {
        println!("{}", text.green());
    } else {
        println!("{text}");
    }
}

/// Print an error message (red) to stderr
pub fn error(text: &str) {
    if use_colors() {
        eprintln!("{}", text.red());
    } else {
        eprintln!("{text}");
    }
}
