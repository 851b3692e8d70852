//! SLA classification and due-date arithmetic.
//!
//! A ticket's SLA tier is derived once, at creation, from its priority and
//! impact, and the due date follows from the tier's response window. Later
//! edits to priority or impact do not reclassify the ticket — the SLA is a
//! commitment made at intake.

use crate::domain::{Impact, Priority, SlaTier};
use chrono::{DateTime, Duration, Utc};

/// Derive the SLA tier from priority and impact.
///
/// Critical on either axis commits to Premium; High on either axis commits
/// to Standard; everything else is Basic.
pub fn classify(priority: Priority, impact: Impact) -> SlaTier {
    if priority == Priority::Critical || impact == Impact::Critical {
        return SlaTier::Premium;
    }
    if priority == Priority::High || impact == Impact::High {
        return SlaTier::Standard;
    }
    SlaTier::Basic
}

/// Response window committed by an SLA tier
pub fn response_window(tier: SlaTier) -> Duration {
    match tier {
        SlaTier::Premium => Duration::hours(4),
        SlaTier::Standard => Duration::hours(24),
        SlaTier::Basic => Duration::hours(72),
    }
}

/// Compute the response deadline for a ticket created at `created_at`
pub fn due_date(tier: SlaTier, created_at: DateTime<Utc>) -> DateTime<Utc> {
    created_at + response_window(tier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case::critical_priority(Priority::Critical, Impact::Low, SlaTier::Premium)]
    #[case::critical_impact(Priority::Low, Impact::Critical, SlaTier::Premium)]
    #[case::both_critical(Priority::Critical, Impact::Critical, SlaTier::Premium)]
    #[case::high_priority(Priority::High, Impact::Low, SlaTier::Standard)]
    #[case::high_impact(Priority::Low, Impact::High, SlaTier::Standard)]
    #[case::critical_beats_high(Priority::High, Impact::Critical, SlaTier::Premium)]
    #[case::low_low(Priority::Low, Impact::Low, SlaTier::Basic)]
    #[case::medium_medium(Priority::Medium, Impact::Medium, SlaTier::Basic)]
    fn classify_cases(#[case] priority: Priority, #[case] impact: Impact, #[case] expected: SlaTier) {
        assert_eq!(classify(priority, impact), expected);
    }

    #[test]
    fn classify_is_total_over_the_enum_domain() {
        let priorities = [Priority::Low, Priority::Medium, Priority::High, Priority::Critical];
        let impacts = [Impact::Low, Impact::Medium, Impact::High, Impact::Critical];
        for priority in priorities {
            for impact in impacts {
                // Every combination maps to a tier without panicking
                let _ = classify(priority, impact);
            }
        }
    }

    #[test]
    fn due_date_offsets_are_exact() {
        let created = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(due_date(SlaTier::Premium, created), created + Duration::hours(4));
        assert_eq!(due_date(SlaTier::Standard, created), created + Duration::hours(24));
        assert_eq!(due_date(SlaTier::Basic, created), created + Duration::hours(72));
    }
}
