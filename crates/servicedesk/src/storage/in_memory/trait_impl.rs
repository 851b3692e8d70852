//! TicketStore trait implementation for in-memory storage.

use super::InMemoryStore;
use crate::audit::AuditEntry;
use crate::domain::{
    Comment, NewTicket, Ticket, TicketFilter, TicketId, TicketPage, TicketPatch, TicketStats,
    TicketStatus, TimeEntry, UserId,
};
use crate::error::{Error, Result};
use crate::sla;
use crate::storage::{TicketRecord, TicketStore};
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl TicketStore for InMemoryStore {
    async fn create(&mut self, new_ticket: NewTicket, created_by: UserId) -> Result<Ticket> {
        let mut inner = self.lock().await;

        new_ticket
            .validate()
            .map_err(|e| Error::Storage(format!("Validation failed: {e}")))?;

        // Severity defaults are applied before SLA classification
        let priority = new_ticket.priority.unwrap_or_default();
        let impact = new_ticket.impact.unwrap_or_default();
        let urgency = new_ticket.urgency.unwrap_or_default();
        let source = new_ticket.source.unwrap_or_default();

        let now = Utc::now();
        // Number assignment happens under the lock; see module docs
        let ticket_number = inner.numbering.next(new_ticket.ticket_type);
        let tier = sla::classify(priority, impact);

        let ticket = Ticket {
            id: TicketId::new(),
            ticket_number,
            title: new_ticket.title,
            description: new_ticket.description,
            ticket_type: new_ticket.ticket_type,
            priority,
            impact,
            urgency,
            status: TicketStatus::New,
            sla_tier: tier,
            due_date: sla::due_date(tier, now),
            resolution_date: None,
            source,
            category: new_ticket.category,
            subcategory: new_ticket.subcategory,
            root_cause: None,
            preventive_measures: None,
            created_by,
            assigned_to: new_ticket.assigned_to,
            created_at: now,
            updated_at: now,
        };

        inner
            .records
            .insert(ticket.id.clone(), TicketRecord::new(ticket.clone()));

        Ok(ticket)
    }

    async fn get(&self, id: &TicketId) -> Result<Option<Ticket>> {
        let inner = self.lock().await;
        Ok(inner.records.get(id).map(|r| r.ticket.clone()))
    }

    async fn find(&self, filter: &TicketFilter) -> Result<TicketPage> {
        let inner = self.lock().await;

        let mut tickets: Vec<Ticket> = inner
            .records
            .values()
            .map(|r| &r.ticket)
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();

        // Newest first
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = tickets.len();
        let per_page = filter.per_page();
        let page = filter.page();
        let total_pages = total.div_ceil(per_page);

        let tickets: Vec<Ticket> = tickets
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();

        Ok(TicketPage {
            tickets,
            total,
            page,
            total_pages,
        })
    }

    async fn update(
        &mut self,
        id: &TicketId,
        patch: TicketPatch,
        audit: AuditEntry,
    ) -> Result<Ticket> {
        let mut inner = self.lock().await;

        let record = inner
            .records
            .get_mut(id)
            .ok_or_else(|| Error::TicketNotFound(id.clone()))?;

        // Apply the patch to a working copy so a validation failure leaves
        // the stored ticket untouched
        let mut ticket = record.ticket.clone();

        if let Some(title) = patch.title {
            ticket.title = title;
        }
        if let Some(description) = patch.description {
            ticket.description = description;
        }
        if let Some(priority) = patch.priority {
            // SLA tier and due date stay frozen at their creation values
            ticket.priority = priority;
        }
        if let Some(impact) = patch.impact {
            ticket.impact = impact;
        }
        if let Some(urgency) = patch.urgency {
            ticket.urgency = urgency;
        }
        if let Some(status) = patch.status {
            // The resolution date is stamped once, on the transition into a
            // resolution status, and never overwritten afterwards
            if status.sets_resolution()
                && !ticket.status.sets_resolution()
                && ticket.resolution_date.is_none()
            {
                ticket.resolution_date = Some(Utc::now());
            }
            ticket.status = status;
        }
        if let Some(category) = patch.category {
            ticket.category = Some(category);
        }
        if let Some(subcategory) = patch.subcategory {
            ticket.subcategory = Some(subcategory);
        }
        if let Some(root_cause) = patch.root_cause {
            ticket.root_cause = Some(root_cause);
        }
        if let Some(preventive_measures) = patch.preventive_measures {
            ticket.preventive_measures = Some(preventive_measures);
        }
        if let Some(assigned_to) = patch.assigned_to {
            ticket.assigned_to = assigned_to;
        }

        ticket
            .validate()
            .map_err(|e| Error::Storage(format!("Validation failed: {e}")))?;

        ticket.updated_at = Utc::now();

        // Commit the mutation and its audit entry together
        record.ticket = ticket.clone();
        record.audit_log.push(audit);

        Ok(ticket)
    }

    async fn add_comment(&mut self, comment: Comment, audit: AuditEntry) -> Result<Comment> {
        let mut inner = self.lock().await;

        let record = inner
            .records
            .get_mut(&comment.ticket_id)
            .ok_or_else(|| Error::TicketNotFound(comment.ticket_id.clone()))?;

        record.comments.push(comment.clone());
        record.audit_log.push(audit);

        Ok(comment)
    }

    async fn add_time_entry(&mut self, entry: TimeEntry, audit: AuditEntry) -> Result<TimeEntry> {
        let mut inner = self.lock().await;

        let record = inner
            .records
            .get_mut(&entry.ticket_id)
            .ok_or_else(|| Error::TicketNotFound(entry.ticket_id.clone()))?;

        record.time_entries.push(entry.clone());
        record.audit_log.push(audit);

        Ok(entry)
    }

    async fn comments(&self, id: &TicketId) -> Result<Vec<Comment>> {
        let inner = self.lock().await;
        let record = inner
            .records
            .get(id)
            .ok_or_else(|| Error::TicketNotFound(id.clone()))?;
        Ok(record.comments.clone())
    }

    async fn time_entries(&self, id: &TicketId) -> Result<Vec<TimeEntry>> {
        let inner = self.lock().await;
        let record = inner
            .records
            .get(id)
            .ok_or_else(|| Error::TicketNotFound(id.clone()))?;
        Ok(record.time_entries.clone())
    }

    async fn audit_trail(&self, id: &TicketId) -> Result<Vec<AuditEntry>> {
        let inner = self.lock().await;
        let record = inner
            .records
            .get(id)
            .ok_or_else(|| Error::TicketNotFound(id.clone()))?;
        Ok(record.audit_log.clone())
    }

    async fn stats(&self, assigned_to: Option<&UserId>) -> Result<TicketStats> {
        let inner = self.lock().await;
        let now = Utc::now();

        let mut stats = TicketStats::default();
        for record in inner.records.values() {
            let ticket = &record.ticket;
            if let Some(assignee) = assigned_to {
                if ticket.assigned_to.as_ref() != Some(assignee) {
                    continue;
                }
            }

            stats.total += 1;
            match ticket.status {
                TicketStatus::New | TicketStatus::Open => stats.open += 1,
                TicketStatus::InProgress => stats.in_progress += 1,
                TicketStatus::Resolved => stats.resolved += 1,
                _ => {}
            }
            if ticket.is_overdue(now) {
                stats.overdue += 1;
            }
            match ticket.priority {
                crate::domain::Priority::High => stats.high_priority += 1,
                crate::domain::Priority::Critical => stats.critical += 1,
                _ => {}
            }
        }

        Ok(stats)
    }

    async fn import_records(&mut self, records: Vec<TicketRecord>) -> Result<()> {
        let mut inner = self.lock().await;
        for record in records {
            inner.insert_record(record);
        }
        Ok(())
    }

    async fn export_all(&self) -> Result<Vec<TicketRecord>> {
        let inner = self.lock().await;
        Ok(inner.records.values().cloned().collect())
    }

    async fn save(&self) -> Result<()> {
        // In-memory storage doesn't persist to disk
        Ok(())
    }

    async fn reload(&mut self) -> Result<()> {
        // In-memory storage has no backing store to reload from
        Ok(())
    }
}
