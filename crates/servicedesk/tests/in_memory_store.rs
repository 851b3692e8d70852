//! Integration tests for the in-memory store and its JSONL persistence.

use servicedesk::audit::{AuditAction, AuditEntry};
use servicedesk::domain::{NewTicket, TicketPatch, TicketType, UserId};
use servicedesk::error::Error;
use servicedesk::storage::in_memory::{load_from_jsonl, new_in_memory_store, save_to_jsonl, LoadWarning};
use servicedesk::storage::{create_store, StorageBackend, TicketStore};
use tempfile::tempdir;

fn new_incident(title: &str) -> NewTicket {
    NewTicket::new(title, "Test description", TicketType::Incident)
}

fn update_audit(ticket_id: servicedesk::domain::TicketId) -> AuditEntry {
    AuditEntry::new(
        ticket_id,
        UserId::from("tester"),
        AuditAction::Update,
        None::<&()>,
        Some(&serde_json::json!({"title": "changed"})),
    )
}

// ========== Basic CRUD Tests ==========

#[tokio::test]
async fn create_and_get() {
    let mut store = new_in_memory_store();

    let created = store
        .create(new_incident("Test"), UserId::from("alice"))
        .await
        .unwrap();
    assert_eq!(created.ticket_number, "INC-0001");

    let fetched = store.get(&created.id).await.unwrap();
    assert!(fetched.is_some());
    assert_eq!(fetched.unwrap().title, "Test");

    let missing = store
        .get(&servicedesk::domain::TicketId::new())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn update_validates_before_committing() {
    let mut store = new_in_memory_store();

    let created = store
        .create(new_incident("Valid title"), UserId::from("alice"))
        .await
        .unwrap();

    // An empty title fails validation and leaves both the ticket and the
    // audit trail untouched
    let patch = TicketPatch {
        title: Some(String::new()),
        ..Default::default()
    };
    let result = store
        .update(&created.id, patch, update_audit(created.id.clone()))
        .await;
    assert!(matches!(result, Err(Error::Storage(_))));

    let ticket = store.get(&created.id).await.unwrap().unwrap();
    assert_eq!(ticket.title, "Valid title");
    assert!(store.audit_trail(&created.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_missing_ticket_is_not_found() {
    let mut store = new_in_memory_store();
    let id = servicedesk::domain::TicketId::new();

    let result = store
        .update(&id, TicketPatch::default(), update_audit(id.clone()))
        .await;
    assert!(matches!(result, Err(Error::TicketNotFound(_))));
}

#[tokio::test]
async fn mutation_and_audit_entry_are_committed_together() {
    let mut store = new_in_memory_store();

    let created = store
        .create(new_incident("Atomic"), UserId::from("alice"))
        .await
        .unwrap();

    let patch = TicketPatch {
        title: Some("Atomic indeed".to_string()),
        ..Default::default()
    };
    store
        .update(&created.id, patch, update_audit(created.id.clone()))
        .await
        .unwrap();

    let ticket = store.get(&created.id).await.unwrap().unwrap();
    let trail = store.audit_trail(&created.id).await.unwrap();
    assert_eq!(ticket.title, "Atomic indeed");
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action, AuditAction::Update);
}

// ========== JSONL Persistence Tests ==========

#[tokio::test]
async fn jsonl_round_trip_preserves_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tickets.jsonl");

    let mut store = new_in_memory_store();
    let created = store
        .create(new_incident("Persisted"), UserId::from("alice"))
        .await
        .unwrap();
    store
        .update(
            &created.id,
            TicketPatch {
                description: Some("with history".to_string()),
                ..Default::default()
            },
            update_audit(created.id.clone()),
        )
        .await
        .unwrap();

    save_to_jsonl(store.as_ref(), &path).await.unwrap();

    let (loaded, warnings) = load_from_jsonl(&path).await.unwrap();
    assert!(warnings.is_empty());

    let ticket = loaded.get(&created.id).await.unwrap().unwrap();
    assert_eq!(ticket.ticket_number, "INC-0001");
    assert_eq!(ticket.description, "with history");

    let trail = loaded.audit_trail(&created.id).await.unwrap();
    assert_eq!(trail.len(), 1);
}

#[tokio::test]
async fn numbering_continues_after_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tickets.jsonl");

    let mut store = create_store(StorageBackend::Jsonl(path.clone())).await.unwrap();
    store
        .create(new_incident("first"), UserId::from("alice"))
        .await
        .unwrap();
    store
        .create(new_incident("second"), UserId::from("alice"))
        .await
        .unwrap();
    store.save().await.unwrap();

    // A fresh store over the same file resumes the sequence
    let mut reopened = create_store(StorageBackend::Jsonl(path)).await.unwrap();
    let third = reopened
        .create(new_incident("third"), UserId::from("alice"))
        .await
        .unwrap();
    assert_eq!(third.ticket_number, "INC-0003");
}

#[tokio::test]
async fn resilient_load_skips_malformed_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tickets.jsonl");

    // Build a valid line by saving a real store
    let mut store = new_in_memory_store();
    store
        .create(new_incident("survivor"), UserId::from("alice"))
        .await
        .unwrap();
    save_to_jsonl(store.as_ref(), &path).await.unwrap();

    // Corrupt the file: garbage line before, truncated JSON after
    let valid_line = std::fs::read_to_string(&path).unwrap();
    let corrupted = format!("not json at all\n{valid_line}{{\"ticket\": {{\"id\"\n");
    std::fs::write(&path, corrupted).unwrap();

    let (loaded, warnings) = load_from_jsonl(&path).await.unwrap();
    assert_eq!(warnings.len(), 2);
    assert!(warnings
        .iter()
        .all(|w| matches!(w, LoadWarning::MalformedJson { .. })));

    let page = loaded
        .find(&servicedesk::domain::TicketFilter::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.tickets[0].title, "survivor");
}

#[tokio::test]
async fn malformed_legacy_number_restarts_sequence() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tickets.jsonl");

    // Persist a ticket, then mangle its number into unparsable legacy data
    let mut store = new_in_memory_store();
    store
        .create(new_incident("legacy"), UserId::from("alice"))
        .await
        .unwrap();
    save_to_jsonl(store.as_ref(), &path).await.unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let mangled = contents.replace("INC-0001", "INC-LEGACY");
    std::fs::write(&path, mangled).unwrap();

    // Loading succeeds; the next incident falls back to sequence 1
    let (loaded, warnings) = load_from_jsonl(&path).await.unwrap();
    assert!(warnings.is_empty());

    let mut loaded = loaded;
    let next = loaded
        .create(new_incident("fresh"), UserId::from("alice"))
        .await
        .unwrap();
    assert_eq!(next.ticket_number, "INC-0001");
}

#[tokio::test]
async fn import_export_round_trip() {
    let mut source = new_in_memory_store();
    source
        .create(new_incident("a"), UserId::from("alice"))
        .await
        .unwrap();
    source
        .create(
            NewTicket::new("b", "", TicketType::Problem),
            UserId::from("bob"),
        )
        .await
        .unwrap();

    let records = source.export_all().await.unwrap();
    assert_eq!(records.len(), 2);

    let mut target = new_in_memory_store();
    target.import_records(records).await.unwrap();

    // Counters were re-seeded from the imported numbers
    let next = target
        .create(new_incident("c"), UserId::from("alice"))
        .await
        .unwrap();
    assert_eq!(next.ticket_number, "INC-0002");

    let next_problem = target
        .create(
            NewTicket::new("d", "", TicketType::Problem),
            UserId::from("bob"),
        )
        .await
        .unwrap();
    assert_eq!(next_problem.ticket_number, "PRB-0002");
}
