//! Reservations dashboard channel.
//!
//! Watches the `reservations` collection per property. The booking lifecycle
//! (`status`) is the discriminant: note edits, rate adjustments, and other
//! column churn never notify.

use lodgeboard_realtime::channels::{ChannelConfig, Discriminant, ScopeFilter};
use lodgeboard_realtime::events::{ChangeEvent, Operation, SnapshotFields};
use lodgeboard_realtime::invalidation::RegionKey;
use lodgeboard_realtime::notifications::{NotableTransition, Severity};

pub const RESERVATIONS: RegionKey = RegionKey::new("reservations");
pub const RESERVATION_STATS: RegionKey = RegionKey::new("reservation-stats");

const REGIONS: &[RegionKey] = &[RESERVATIONS, RESERVATION_STATS];

pub fn channels() -> Vec<ChannelConfig> {
    vec![ChannelConfig {
        entity: "reservations",
        filter: ScopeFilter::Property,
        discriminant: Some(Discriminant::Text("status")),
        regions: REGIONS,
        build: reservation_message,
    }]
}

fn reservation_message(event: &ChangeEvent) -> Option<NotableTransition> {
    match event.operation {
        Operation::Created => {
            let row = event.after.as_ref()?;
            let confirmation = row.str_field("confirmation_number").unwrap_or("(pending)");
            Some(NotableTransition::info(
                "New reservation",
                format!("Reservation {} was created", confirmation),
            ))
        }
        Operation::Updated => {
            let row = event.after.as_ref()?;
            let confirmation = row.str_field("confirmation_number").unwrap_or("(unknown)");
            let (label, severity) = match row.str_field("status")? {
                "confirmed" => ("confirmed", Severity::Info),
                "checked_in" => ("checked in", Severity::Success),
                "checked_out" => ("checked out", Severity::Info),
                "cancelled" => ("cancelled", Severity::Warning),
                "no_show" => ("marked as a no-show", Severity::Destructive),
                _ => return None,
            };
            Some(NotableTransition::new(
                "Reservation updated",
                format!("Reservation {} was {}", confirmation, label),
                severity,
            ))
        }
        Operation::Deleted => {
            let row = event.before.as_ref()?;
            let confirmation = row.str_field("confirmation_number").unwrap_or("(unknown)");
            Some(NotableTransition::info(
                "Reservation removed",
                format!("Reservation {} was removed", confirmation),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::{created, deleted, updated};
    use lodgeboard_realtime::classifier::classify;
    use serde_json::json;

    fn channel() -> ChannelConfig {
        channels().remove(0)
    }

    #[test]
    fn test_new_reservation_announces_confirmation_number() {
        let event = created(
            "reservations",
            json!({"confirmation_number": "RSV-2041", "status": "confirmed"}),
        );
        let transition = classify(&channel(), &event).unwrap();
        assert_eq!(transition.severity, Severity::Info);
        assert!(transition.body.contains("RSV-2041"));
    }

    #[test]
    fn test_check_in_is_a_success_transition() {
        let event = updated(
            "reservations",
            json!({"confirmation_number": "RSV-2041", "status": "confirmed"}),
            json!({"confirmation_number": "RSV-2041", "status": "checked_in"}),
        );
        let transition = classify(&channel(), &event).unwrap();
        assert_eq!(transition.severity, Severity::Success);
        assert!(transition.body.contains("checked in"));
    }

    #[test]
    fn test_no_show_is_destructive() {
        let event = updated(
            "reservations",
            json!({"confirmation_number": "RSV-9", "status": "confirmed"}),
            json!({"confirmation_number": "RSV-9", "status": "no_show"}),
        );
        let transition = classify(&channel(), &event).unwrap();
        assert_eq!(transition.severity, Severity::Destructive);
    }

    #[test]
    fn test_note_edit_stays_silent() {
        let event = updated(
            "reservations",
            json!({"confirmation_number": "RSV-9", "status": "confirmed", "notes": "a"}),
            json!({"confirmation_number": "RSV-9", "status": "confirmed", "notes": "b"}),
        );
        assert!(classify(&channel(), &event).is_none());
    }

    #[test]
    fn test_unknown_status_value_stays_silent() {
        let event = updated(
            "reservations",
            json!({"confirmation_number": "RSV-9", "status": "confirmed"}),
            json!({"confirmation_number": "RSV-9", "status": "waitlisted"}),
        );
        assert!(classify(&channel(), &event).is_none());
    }

    #[test]
    fn test_deleted_reservation_uses_previous_row() {
        let event = deleted(
            "reservations",
            json!({"confirmation_number": "RSV-2041", "status": "cancelled"}),
        );
        let transition = classify(&channel(), &event).unwrap();
        assert!(transition.body.contains("RSV-2041"));
    }
}
