//! In-memory storage backend using HashMaps.
//!
//! This module provides a fast, **ephemeral** storage implementation where
//! all data is held in RAM and **lost when the process exits**. It is
//! suitable for:
//!
//! - Testing and development
//! - Short-lived CLI sessions
//! - Backing the JSONL-persistent store
//!
//! # Persistence
//!
//! This backend supports **optional JSONL persistence** via
//! [`load_from_jsonl`] and [`save_to_jsonl`]. Data can be loaded from and
//! saved to disk while keeping fast in-memory operations. The trait's
//! `save()` method is a no-op for the bare in-memory store; the
//! JSONL-backed wrapper created by the storage factory calls
//! `save_to_jsonl` instead.
//!
//! # Ticket numbering
//!
//! The numbering counters live inside the store's mutex, so number
//! assignment is serialized with every other mutation: two concurrent
//! creations of the same ticket type cannot observe the same "latest
//! number" through one store instance. Counters are re-seeded from ticket
//! numbers on load and import.
//!
//! # Thread Safety
//!
//! The storage is wrapped in `Arc<Mutex<InMemoryStoreInner>>` to provide
//! thread-safe access in async contexts. All operations acquire the mutex
//! lock. Mutations and their audit entries are applied in a single
//! critical section, so no reader ever observes one without the other.

mod inner;
mod jsonl;
mod trait_impl;

use crate::storage::TicketStore;
use inner::InMemoryStoreInner;
use std::sync::Arc;
use tokio::sync::Mutex;

// Re-export public API
pub use jsonl::{load_from_jsonl, save_to_jsonl, LoadWarning};

/// Thread-safe in-memory storage.
///
/// This type alias wraps the inner storage in `Arc<Mutex<>>` for
/// thread-safe async access. It implements [`TicketStore`] via the trait
/// implementation in `trait_impl.rs`.
pub(crate) type InMemoryStore = Arc<Mutex<InMemoryStoreInner>>;

/// Create a new in-memory storage instance.
///
/// # Example
///
/// ```
/// use servicedesk::storage::in_memory::new_in_memory_store;
///
/// let store = new_in_memory_store();
/// ```
pub fn new_in_memory_store() -> Box<dyn TicketStore> {
    Box::new(Arc::new(Mutex::new(InMemoryStoreInner::new())))
}
