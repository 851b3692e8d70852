//! JSONL persistence for in-memory storage.
//!
//! This module provides functions to load and save the in-memory storage
//! to JSONL (JSON Lines) files. Each line is one serialized
//! [`TicketRecord`]: a ticket together with its comments, time entries,
//! and audit trail, so a line is self-contained and the file can be
//! processed with standard line tools.

use super::inner::InMemoryStoreInner;
use crate::error::{Error, Result};
use crate::storage::{TicketRecord, TicketStore};
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::Mutex;

/// Warnings that can occur during JSONL file loading.
///
/// These are non-fatal: loading continues and the problematic line or
/// record is skipped. Applications should log them, as they indicate data
/// corruption that may need manual resolution.
#[derive(Debug, Clone)]
pub enum LoadWarning {
    /// Malformed JSON line that couldn't be parsed.
    ///
    /// **Effect**: the line is skipped entirely.
    MalformedJson {
        /// 1-based line number in the file
        line_number: usize,
        /// Parser error message
        error: String,
    },

    /// Record parsed but its ticket failed validation.
    ///
    /// **Effect**: the whole record is skipped.
    InvalidRecord {
        /// Ticket number of the skipped record
        ticket_number: String,
        /// 1-based line number in the file
        line_number: usize,
        /// Validation error message
        error: String,
    },
}

/// Load storage from a JSONL file.
///
/// Malformed lines and invalid records are skipped with a warning rather
/// than failing the load. Numbering counters are seeded from the ticket
/// numbers of successfully loaded records, so the next creation continues
/// the persisted sequence.
///
/// # Returns
///
/// A tuple of `(store, warnings)` where warnings contains all non-fatal
/// issues encountered during loading.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be opened or read.
pub async fn load_from_jsonl(path: &Path) -> Result<(Box<dyn TicketStore>, Vec<LoadWarning>)> {
    let file = File::open(path).await.map_err(Error::Io)?;
    let mut lines = BufReader::new(file).lines();

    let mut warnings = Vec::new();
    let mut records = Vec::new();
    let mut line_number = 0usize;

    while let Some(line) = lines.next_line().await.map_err(Error::Io)? {
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }

        let record: TicketRecord = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(e) => {
                warnings.push(LoadWarning::MalformedJson {
                    line_number,
                    error: e.to_string(),
                });
                continue;
            }
        };

        if let Err(validation_error) = record.ticket.validate() {
            warnings.push(LoadWarning::InvalidRecord {
                ticket_number: record.ticket.ticket_number.clone(),
                line_number,
                error: validation_error,
            });
            continue;
        }

        records.push(record);
    }

    let store = Arc::new(Mutex::new(InMemoryStoreInner::new()));
    {
        let mut inner = store.lock().await;
        for record in records {
            inner.insert_record(record);
        }
    }

    Ok((Box::new(store), warnings))
}

/// Save storage to a JSONL file with atomic writes.
///
/// Records are written oldest ticket first for deterministic output across
/// saves. The write is atomic: it writes to a temporary file first, then
/// renames it, so a crash mid-write leaves the original file unchanged.
pub async fn save_to_jsonl(store: &dyn TicketStore, path: &Path) -> Result<()> {
    let temp_path = path.with_extension("tmp");

    let file = File::create(&temp_path).await.map_err(Error::Io)?;
    let mut writer = BufWriter::new(file);

    let mut records = store.export_all().await?;

    // Deterministic order: creation time, ticket number as tiebreaker
    records.sort_by(|a, b| {
        a.ticket
            .created_at
            .cmp(&b.ticket.created_at)
            .then_with(|| a.ticket.ticket_number.cmp(&b.ticket.ticket_number))
    });

    for record in &records {
        let json = serde_json::to_string(record).map_err(Error::Json)?;
        writer.write_all(json.as_bytes()).await.map_err(Error::Io)?;
        writer.write_all(b"\n").await.map_err(Error::Io)?;
    }

    writer.flush().await.map_err(Error::Io)?;

    // Atomic rename
    tokio::fs::rename(&temp_path, path).await.map_err(Error::Io)?;

    Ok(())
}
