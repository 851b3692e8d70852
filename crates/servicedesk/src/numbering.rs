//! Sequential ticket number generation.
//!
//! Ticket numbers are human-readable, per-type sequences formatted as
//! `{PREFIX}-{0001}`: `INC-0001`, `REQ-0023`, `PRB-0002`, `CHG-0104`.
//! Each ticket type advances its own counter independently, so incident
//! numbering is unaffected by how many service requests exist.
//!
//! # Concurrency
//!
//! [`TicketNumberGenerator`] is a plain counter table with no internal
//! locking. Two callers that read the same state and both call [`next`]
//! would mint the same number, so the owner must serialize access — the
//! in-memory store holds its generator inside the storage mutex and mints
//! numbers only while the lock is held. Counters are seeded from persisted
//! ticket numbers at load time via [`seed`].
//!
//! [`next`]: TicketNumberGenerator::next
//! [`seed`]: TicketNumberGenerator::seed

use crate::domain::TicketType;
use std::collections::HashMap;
use tracing::warn;

/// Width of the zero-padded sequence component
const SEQUENCE_WIDTH: usize = 4;

/// Number prefix for a ticket type
pub fn type_prefix(ticket_type: TicketType) -> &'static str {
    match ticket_type {
        TicketType::Incident => "INC",
        TicketType::ServiceRequest => "REQ",
        TicketType::Problem => "PRB",
        TicketType::Change => "CHG",
    }
}

/// Extract the trailing digit run of a ticket number.
///
/// Returns `None` when the number has no trailing digits or they overflow
/// a u32 (malformed legacy data).
pub fn parse_sequence(ticket_number: &str) -> Option<u32> {
    let digits: String = ticket_number
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Format a ticket number from its type and sequence
fn format_number(ticket_type: TicketType, sequence: u32) -> String {
    format!("{}-{:0width$}", type_prefix(ticket_type), sequence, width = SEQUENCE_WIDTH)
}

/// Per-type sequential ticket number generator.
///
/// Holds the last issued sequence for each ticket type. Not thread-safe;
/// see the module documentation for the owner's serialization obligation.
#[derive(Debug, Default)]
pub struct TicketNumberGenerator {
    last_sequence: HashMap<TicketType, u32>,
}

impl TicketNumberGenerator {
    /// Create a generator with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a type's counter from an existing ticket number.
    ///
    /// Keeps the highest sequence seen, so seeding can run over an
    /// arbitrarily ordered ticket set. A number whose trailing digits
    /// cannot be parsed is ignored with a warning rather than failing the
    /// load — the next mint for that type then falls back to restarting
    /// at 1, matching creation-time behavior for malformed legacy data.
    pub fn seed(&mut self, ticket_type: TicketType, ticket_number: &str) {
        match parse_sequence(ticket_number) {
            Some(sequence) => {
                let entry = self.last_sequence.entry(ticket_type).or_insert(0);
                if sequence > *entry {
                    *entry = sequence;
                }
            }
            None => {
                warn!(
                    %ticket_type,
                    ticket_number,
                    "Ticket number has no parsable sequence; not seeding counter"
                );
            }
        }
    }

    /// Mint the next ticket number for a type.
    ///
    /// The first mint for a type (or the first after seeding only
    /// malformed numbers) produces sequence 1.
    pub fn next(&mut self, ticket_type: TicketType) -> String {
        let entry = self.last_sequence.entry(ticket_type).or_insert(0);
        *entry += 1;
        format_number(ticket_type, *entry)
    }

    /// The last issued sequence for a type, if any
    pub fn last_sequence(&self, ticket_type: TicketType) -> Option<u32> {
        self.last_sequence.get(&ticket_type).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes() {
        assert_eq!(type_prefix(TicketType::Incident), "INC");
        assert_eq!(type_prefix(TicketType::ServiceRequest), "REQ");
        assert_eq!(type_prefix(TicketType::Problem), "PRB");
        assert_eq!(type_prefix(TicketType::Change), "CHG");
    }

    #[test]
    fn first_number_per_type_is_0001() {
        let mut generator = TicketNumberGenerator::new();
        assert_eq!(generator.next(TicketType::Incident), "INC-0001");
        assert_eq!(generator.next(TicketType::ServiceRequest), "REQ-0001");
        assert_eq!(generator.next(TicketType::Problem), "PRB-0001");
        assert_eq!(generator.next(TicketType::Change), "CHG-0001");
    }

    #[test]
    fn sequences_advance_independently_per_type() {
        let mut generator = TicketNumberGenerator::new();
        assert_eq!(generator.next(TicketType::Incident), "INC-0001");
        assert_eq!(generator.next(TicketType::ServiceRequest), "REQ-0001");
        assert_eq!(generator.next(TicketType::Incident), "INC-0002");
        assert_eq!(generator.next(TicketType::Incident), "INC-0003");
        assert_eq!(generator.next(TicketType::ServiceRequest), "REQ-0002");
    }

    #[test]
    fn seeding_resumes_from_highest_existing_number() {
        let mut generator = TicketNumberGenerator::new();
        generator.seed(TicketType::Incident, "INC-0007");
        generator.seed(TicketType::Incident, "INC-0003");
        assert_eq!(generator.next(TicketType::Incident), "INC-0008");
    }

    #[test]
    fn malformed_number_falls_back_to_one() {
        let mut generator = TicketNumberGenerator::new();
        generator.seed(TicketType::Problem, "PRB-LEGACY");
        assert_eq!(generator.last_sequence(TicketType::Problem), None);
        assert_eq!(generator.next(TicketType::Problem), "PRB-0001");
    }

    #[test]
    fn sequence_grows_past_four_digits() {
        let mut generator = TicketNumberGenerator::new();
        generator.seed(TicketType::Change, "CHG-9999");
        assert_eq!(generator.next(TicketType::Change), "CHG-10000");
    }

    #[test]
    fn parse_sequence_trailing_digits() {
        assert_eq!(parse_sequence("INC-0042"), Some(42));
        assert_eq!(parse_sequence("CHG-10000"), Some(10000));
        assert_eq!(parse_sequence("REQ-"), None);
        assert_eq!(parse_sequence("LEGACY"), None);
        // Digit run longer than u32 is treated as unparsable
        assert_eq!(parse_sequence("INC-99999999999999999999"), None);
    }
}
