//! Storage abstraction layer for the service desk.
//!
//! This module provides the core storage trait and factory for creating
//! storage backends:
//!
//! - **In-memory**: Fast, ephemeral storage backed by HashMaps
//! - **JSONL**: Persistent file-based storage using JSON Lines format
//!
//! # Architecture
//!
//! The storage layer uses an async trait so backends with real I/O can be
//! added without changing callers. The trait is object-safe, allowing for
//! dynamic dispatch via `Box<dyn TicketStore>`.
//!
//! # Audit coupling
//!
//! Mutating methods take the [`AuditEntry`] describing the mutation and
//! apply both in one critical section. A mutation is never observable
//! without its audit entry, and the entry is never persisted for a failed
//! mutation.
//!
//! # Test Utilities
//!
//! [`MockStore`] provides a stateless implementation of the trait for
//! testing code that only needs trait-object plumbing. Enable the
//! `test-util` feature to use it from downstream crates.

use crate::audit::AuditEntry;
use crate::domain::{
    Comment, NewTicket, Ticket, TicketFilter, TicketId, TicketPage, TicketPatch, TicketStats,
    TimeEntry, UserId,
};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// Storage backend implementations
pub mod in_memory;

/// A ticket together with its dependent collections.
///
/// This is the unit of import/export and of JSONL persistence: one record
/// per line keeps a ticket and its history self-contained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRecord {
    /// The ticket itself
    pub ticket: Ticket,

    /// Comments, oldest first
    #[serde(default)]
    pub comments: Vec<Comment>,

    /// Time entries, oldest first
    #[serde(default)]
    pub time_entries: Vec<TimeEntry>,

    /// Audit trail, oldest first
    #[serde(default)]
    pub audit_log: Vec<AuditEntry>,
}

impl TicketRecord {
    /// Wrap a bare ticket with empty history
    pub fn new(ticket: Ticket) -> Self {
        Self {
            ticket,
            comments: Vec::new(),
            time_entries: Vec::new(),
            audit_log: Vec::new(),
        }
    }
}

/// Core storage trait for ticket management.
///
/// Implementations must be `Send + Sync` to support concurrent access in
/// async contexts.
///
/// # Method Categories
///
/// - **CRUD**: `create`, `get`, `find`, `update`
/// - **History**: `add_comment`, `add_time_entry`, `comments`,
///   `time_entries`, `audit_trail`
/// - **Reporting**: `stats`
/// - **Batch**: `import_records`, `export_all`
/// - **Persistence**: `save`, `reload`
///
/// # Numbering
///
/// `create` assigns the ticket number, SLA tier, and due date while
/// holding the backend's internal lock, so concurrent creations of the
/// same ticket type cannot mint duplicate numbers through one store
/// instance.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Create a new ticket.
    ///
    /// Assigns the per-type sequential ticket number, derives the SLA tier
    /// and due date from the (already defaulted) priority and impact, and
    /// sets status New.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if validation of the new ticket fails.
    async fn create(&mut self, new_ticket: NewTicket, created_by: UserId) -> Result<Ticket>;

    /// Get a ticket by ID.
    ///
    /// Returns `None` if the ticket doesn't exist.
    async fn get(&self, id: &TicketId) -> Result<Option<Ticket>>;

    /// Find tickets matching a filter, paginated, newest first.
    async fn find(&self, filter: &TicketFilter) -> Result<TicketPage>;

    /// Apply a patch to a ticket and append the audit entry atomically.
    ///
    /// Sets `resolution_date` when the patch transitions the ticket into a
    /// resolution status it was not already in; an existing resolution
    /// date is never overwritten.
    ///
    /// # Errors
    ///
    /// Returns `Error::TicketNotFound` if the ticket doesn't exist, or
    /// `Error::Storage` if the patched ticket fails validation (in which
    /// case neither the patch nor the audit entry is applied).
    async fn update(
        &mut self,
        id: &TicketId,
        patch: TicketPatch,
        audit: AuditEntry,
    ) -> Result<Ticket>;

    /// Append a comment and its (redacted) audit entry atomically.
    ///
    /// # Errors
    ///
    /// Returns `Error::TicketNotFound` if the ticket doesn't exist.
    async fn add_comment(&mut self, comment: Comment, audit: AuditEntry) -> Result<Comment>;

    /// Append a time entry and its audit entry atomically.
    ///
    /// # Errors
    ///
    /// Returns `Error::TicketNotFound` if the ticket doesn't exist.
    async fn add_time_entry(&mut self, entry: TimeEntry, audit: AuditEntry) -> Result<TimeEntry>;

    /// All comments on a ticket, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `Error::TicketNotFound` if the ticket doesn't exist.
    async fn comments(&self, id: &TicketId) -> Result<Vec<Comment>>;

    /// All time entries on a ticket, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `Error::TicketNotFound` if the ticket doesn't exist.
    async fn time_entries(&self, id: &TicketId) -> Result<Vec<TimeEntry>>;

    /// The audit trail of a ticket, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `Error::TicketNotFound` if the ticket doesn't exist.
    async fn audit_trail(&self, id: &TicketId) -> Result<Vec<AuditEntry>>;

    /// Summary counts, optionally scoped to one assignee.
    async fn stats(&self, assigned_to: Option<&UserId>) -> Result<TicketStats>;

    /// Import records in bulk (JSONL load, migrations).
    ///
    /// Numbering counters are re-seeded from the imported ticket numbers.
    async fn import_records(&mut self, records: Vec<TicketRecord>) -> Result<()>;

    /// Export all records, suitable for JSONL export or backup.
    async fn export_all(&self) -> Result<Vec<TicketRecord>>;

    /// Save changes to persistent storage.
    ///
    /// Takes `&self` so saving works from shared references; backends use
    /// interior mutability. No-op for purely in-memory storage.
    async fn save(&self) -> Result<()>;

    /// Reload state from persistent storage, discarding in-memory changes.
    ///
    /// No-op for purely in-memory storage.
    async fn reload(&mut self) -> Result<()>;
}

/// Storage backend configuration.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// In-memory storage (ephemeral)
    InMemory,

    /// JSONL file storage (persistent)
    Jsonl(PathBuf),
}

impl StorageBackend {
    /// Returns the data file path for file-based backends.
    pub fn data_path(&self) -> Option<&Path> {
        match self {
            StorageBackend::Jsonl(path) => Some(path),
            StorageBackend::InMemory => None,
        }
    }
}

/// Wrapper that adds JSONL file persistence to the in-memory backend.
///
/// Implements `save()` by writing all records to the JSONL file
/// atomically, and `reload()` by rebuilding the inner store from disk.
struct JsonlBackedStore {
    inner: Box<dyn TicketStore>,
    path: PathBuf,
}

#[async_trait]
impl TicketStore for JsonlBackedStore {
    async fn create(&mut self, new_ticket: NewTicket, created_by: UserId) -> Result<Ticket> {
        self.inner.create(new_ticket, created_by).await
    }

    async fn get(&self, id: &TicketId) -> Result<Option<Ticket>> {
        self.inner.get(id).await
    }

    async fn find(&self, filter: &TicketFilter) -> Result<TicketPage> {
        self.inner.find(filter).await
    }

    async fn update(
        &mut self,
        id: &TicketId,
        patch: TicketPatch,
        audit: AuditEntry,
    ) -> Result<Ticket> {
        self.inner.update(id, patch, audit).await
    }

    async fn add_comment(&mut self, comment: Comment, audit: AuditEntry) -> Result<Comment> {
        self.inner.add_comment(comment, audit).await
    }

    async fn add_time_entry(&mut self, entry: TimeEntry, audit: AuditEntry) -> Result<TimeEntry> {
        self.inner.add_time_entry(entry, audit).await
    }

    async fn comments(&self, id: &TicketId) -> Result<Vec<Comment>> {
        self.inner.comments(id).await
    }

    async fn time_entries(&self, id: &TicketId) -> Result<Vec<TimeEntry>> {
        self.inner.time_entries(id).await
    }

    async fn audit_trail(&self, id: &TicketId) -> Result<Vec<AuditEntry>> {
        self.inner.audit_trail(id).await
    }

    async fn stats(&self, assigned_to: Option<&UserId>) -> Result<TicketStats> {
        self.inner.stats(assigned_to).await
    }

    async fn import_records(&mut self, records: Vec<TicketRecord>) -> Result<()> {
        self.inner.import_records(records).await
    }

    async fn export_all(&self) -> Result<Vec<TicketRecord>> {
        self.inner.export_all().await
    }

    async fn save(&self) -> Result<()> {
        in_memory::save_to_jsonl(self.inner.as_ref(), &self.path).await
    }

    async fn reload(&mut self) -> Result<()> {
        if self.path.exists() {
            let (new_store, warnings) = in_memory::load_from_jsonl(&self.path).await?;
            for warning in &warnings {
                tracing::warn!(warning = ?warning, "JSONL reload warning");
            }
            self.inner = new_store;
        } else {
            // File doesn't exist - reset to empty storage
            self.inner = in_memory::new_in_memory_store();
        }
        Ok(())
    }
}

/// Create a storage instance for the given backend.
///
/// # Errors
///
/// - `Error::Io` if file operations fail (JSONL backend)
/// - `Error::Storage` for backend-specific initialization errors
pub async fn create_store(backend: StorageBackend) -> Result<Box<dyn TicketStore>> {
    match backend {
        StorageBackend::InMemory => Ok(in_memory::new_in_memory_store()),
        StorageBackend::Jsonl(path) => {
            let inner = if path.exists() {
                let (store, warnings) = in_memory::load_from_jsonl(&path).await?;
                for warning in &warnings {
                    // Log warnings but continue - storage is still usable
                    tracing::warn!(warning = ?warning, "JSONL load warning");
                }
                store
            } else {
                // File doesn't exist yet (first run) - create empty storage
                in_memory::new_in_memory_store()
            };
            Ok(Box::new(JsonlBackedStore { inner, path }))
        }
    }
}

// ========== Test Utilities ==========

/// Mock implementation of [`TicketStore`] for testing.
///
/// A **stateless** mock for verifying trait-object usage: `create` returns
/// a fixed incident, queries return empty collections, and mutating
/// methods panic. For real CRUD behavior in tests, use
/// [`in_memory::new_in_memory_store`].
#[cfg(any(test, feature = "test-util"))]
#[derive(Clone, Copy)]
#[non_exhaustive]
pub struct MockStore;

#[cfg(any(test, feature = "test-util"))]
impl MockStore {
    /// Create a new MockStore instance
    pub fn new() -> Self {
        Self
    }

    /// Creates the fixed test ticket returned by `create`
    pub fn create_test_ticket(created_by: UserId) -> Ticket {
        use crate::domain::{
            Impact, Priority, SlaTier, TicketSource, TicketStatus, TicketType, Urgency,
        };
        use chrono::Utc;

        let now = Utc::now();
        Ticket {
            id: TicketId::new(),
            ticket_number: "INC-0001".to_string(),
            title: "Test Ticket".to_string(),
            description: "Test description".to_string(),
            ticket_type: TicketType::Incident,
            priority: Priority::Medium,
            impact: Impact::Low,
            urgency: Urgency::Low,
            status: TicketStatus::New,
            sla_tier: SlaTier::Basic,
            due_date: now + chrono::Duration::hours(72),
            resolution_date: None,
            source: TicketSource::Web,
            category: None,
            subcategory: None,
            root_cause: None,
            preventive_measures: None,
            created_by,
            assigned_to: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-util"))]
#[async_trait]
impl TicketStore for MockStore {
    async fn create(&mut self, _new_ticket: NewTicket, created_by: UserId) -> Result<Ticket> {
        Ok(Self::create_test_ticket(created_by))
    }

    async fn get(&self, _id: &TicketId) -> Result<Option<Ticket>> {
        Ok(None)
    }

    async fn find(&self, filter: &TicketFilter) -> Result<TicketPage> {
        Ok(TicketPage {
            tickets: vec![],
            total: 0,
            page: filter.page(),
            total_pages: 0,
        })
    }

    async fn update(
        &mut self,
        _id: &TicketId,
        _patch: TicketPatch,
        _audit: AuditEntry,
    ) -> Result<Ticket> {
        unimplemented!("MockStore::update() is not implemented. Use in_memory::new_in_memory_store() for full CRUD.")
    }

    async fn add_comment(&mut self, _comment: Comment, _audit: AuditEntry) -> Result<Comment> {
        unimplemented!("MockStore::add_comment() is not implemented. Use in_memory::new_in_memory_store() for full CRUD.")
    }

    async fn add_time_entry(&mut self, _entry: TimeEntry, _audit: AuditEntry) -> Result<TimeEntry> {
        unimplemented!("MockStore::add_time_entry() is not implemented. Use in_memory::new_in_memory_store() for full CRUD.")
    }

    async fn comments(&self, _id: &TicketId) -> Result<Vec<Comment>> {
        Ok(vec![])
    }

    async fn time_entries(&self, _id: &TicketId) -> Result<Vec<TimeEntry>> {
        Ok(vec![])
    }

    async fn audit_trail(&self, _id: &TicketId) -> Result<Vec<AuditEntry>> {
        Ok(vec![])
    }

    async fn stats(&self, _assigned_to: Option<&UserId>) -> Result<TicketStats> {
        Ok(TicketStats::default())
    }

    async fn import_records(&mut self, _records: Vec<TicketRecord>) -> Result<()> {
        Ok(())
    }

    async fn export_all(&self) -> Result<Vec<TicketRecord>> {
        Ok(vec![])
    }

    async fn save(&self) -> Result<()> {
        Ok(())
    }

    async fn reload(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TicketType;

    #[tokio::test]
    async fn trait_object_usage() {
        // Verify that TicketStore is object-safe and usable with Box<dyn>
        let mut store: Box<dyn TicketStore> = Box::new(MockStore::new());

        let ticket = store
            .create(
                NewTicket::new("Test", "Test", TicketType::Incident),
                UserId::from("alice"),
            )
            .await
            .unwrap();
        assert_eq!(ticket.ticket_number, "INC-0001");
        assert_eq!(ticket.created_by, UserId::from("alice"));
    }

    #[tokio::test]
    async fn empty_queries() {
        let store: Box<dyn TicketStore> = Box::new(MockStore::new());

        let page = store.find(&TicketFilter::default()).await.unwrap();
        assert!(page.tickets.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(store.stats(None).await.unwrap(), TicketStats::default());
    }

    #[tokio::test]
    async fn jsonl_reload_restores_disk_state() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let jsonl_path = temp_dir.path().join("tickets.jsonl");

        let mut store = create_store(StorageBackend::Jsonl(jsonl_path.clone()))
            .await
            .unwrap();

        let created = store
            .create(
                NewTicket::new("Original Title", "desc", TicketType::Incident),
                UserId::from("alice"),
            )
            .await
            .unwrap();
        store.save().await.unwrap();

        // Modify in memory without saving
        let patch = TicketPatch {
            title: Some("Modified Title".to_string()),
            ..Default::default()
        };
        let audit = AuditEntry::new(
            created.id.clone(),
            UserId::from("alice"),
            crate::audit::AuditAction::Update,
            None::<&()>,
            Some(&serde_json::json!({"title": "Modified Title"})),
        );
        let modified = store.update(&created.id, patch, audit).await.unwrap();
        assert_eq!(modified.title, "Modified Title");

        // Reload from disk restores the saved title
        store.reload().await.unwrap();
        let after_reload = store.get(&created.id).await.unwrap().unwrap();
        assert_eq!(after_reload.title, "Original Title");
    }

    #[tokio::test]
    async fn jsonl_reload_missing_file_resets_empty() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let jsonl_path = temp_dir.path().join("tickets.jsonl");

        let mut store = create_store(StorageBackend::Jsonl(jsonl_path.clone()))
            .await
            .unwrap();

        let created = store
            .create(
                NewTicket::new("Test Ticket", "", TicketType::Change),
                UserId::from("bob"),
            )
            .await
            .unwrap();
        store.save().await.unwrap();

        std::fs::remove_file(&jsonl_path).unwrap();

        store.reload().await.unwrap();
        assert!(store.get(&created.id).await.unwrap().is_none());
    }
}
