//! Error types for service desk operations.

use crate::domain::TicketId;
use std::io;
use thiserror::Error;

/// Why an edit was denied.
///
/// The two reasons are surfaced differently to users: a creator who has
/// lost edit rights is told the ticket was accepted; an unrelated user is
/// told they have no permission at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// The creator tried to edit after the ticket was assigned or moved
    /// past Open.
    TicketAlreadyAccepted,

    /// The actor has no relation to the ticket and no overriding role.
    NoPermission,
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenialReason::TicketAlreadyAccepted => {
                write!(f, "you can only edit your tickets that have not been accepted or assigned")
            }
            DenialReason::NoPermission => {
                write!(f, "you do not have permission to edit this ticket")
            }
        }
    }
}

/// The error type for service desk operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Ticket not found.
    #[error("Ticket not found: {0}")]
    TicketNotFound(TicketId),

    /// The acting user may not edit the ticket.
    #[error("Permission denied: {0}")]
    PermissionDenied(DenialReason),
}

/// A specialized Result type for service desk operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denial_reasons_render_distinct_messages() {
        let accepted = Error::PermissionDenied(DenialReason::TicketAlreadyAccepted).to_string();
        let unrelated = Error::PermissionDenied(DenialReason::NoPermission).to_string();
        assert!(accepted.contains("accepted or assigned"));
        assert!(unrelated.contains("do not have permission"));
        assert_ne!(accepted, unrelated);
    }
}
