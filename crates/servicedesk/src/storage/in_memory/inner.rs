//! Core in-memory storage data structures.
//!
//! This module contains the inner storage structure that holds all data
//! and is wrapped in `Arc<Mutex<>>` for thread safety.

use crate::domain::TicketId;
use crate::numbering::TicketNumberGenerator;
use crate::storage::TicketRecord;
use std::collections::HashMap;

/// Inner storage structure (not thread-safe).
///
/// Holds every ticket with its dependent collections, plus the numbering
/// state. Wrapped in `Arc<Mutex<>>` by the public store type; the mutex is
/// what serializes ticket-number assignment, so the generator is only ever
/// touched while the lock is held.
pub(crate) struct InMemoryStoreInner {
    /// Records indexed by ticket ID for O(1) lookups
    pub(super) records: HashMap<TicketId, TicketRecord>,

    /// Per-type sequential number state, seeded from loaded records
    pub(super) numbering: TicketNumberGenerator,
}

impl InMemoryStoreInner {
    /// Create a new empty storage instance
    pub(crate) fn new() -> Self {
        Self {
            records: HashMap::new(),
            numbering: TicketNumberGenerator::new(),
        }
    }

    /// Insert a record, seeding the numbering counter from its number
    pub(super) fn insert_record(&mut self, record: TicketRecord) {
        self.numbering
            .seed(record.ticket.ticket_type, &record.ticket.ticket_number);
        self.records.insert(record.ticket.id.clone(), record);
    }
}
