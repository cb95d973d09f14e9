//! Maintenance dashboard channel.
//!
//! Ticket severity scales with priority on creation; resolving a ticket is a
//! success transition. Ticket mutations also invalidate `rooms` because an
//! open ticket can take a room out of service at the data layer.

use lodgeboard_realtime::channels::{ChannelConfig, Discriminant, ScopeFilter};
use lodgeboard_realtime::events::{ChangeEvent, Operation, SnapshotFields};
use lodgeboard_realtime::invalidation::RegionKey;
use lodgeboard_realtime::notifications::{NotableTransition, Severity};

use crate::rooms::ROOMS;

pub const MAINTENANCE_TICKETS: RegionKey = RegionKey::new("maintenance-tickets");
pub const MAINTENANCE_STATS: RegionKey = RegionKey::new("maintenance-stats");

const REGIONS: &[RegionKey] = &[MAINTENANCE_TICKETS, MAINTENANCE_STATS, ROOMS];

pub fn channels() -> Vec<ChannelConfig> {
    vec![ChannelConfig {
        entity: "maintenance_tickets",
        filter: ScopeFilter::Property,
        discriminant: Some(Discriminant::Text("status")),
        regions: REGIONS,
        build: ticket_message,
    }]
}

fn ticket_message(event: &ChangeEvent) -> Option<NotableTransition> {
    match event.operation {
        Operation::Created => {
            let row = event.after.as_ref()?;
            let title = row.str_field("title").unwrap_or("Maintenance ticket");
            let severity = match row.str_field("priority") {
                Some("urgent") => Severity::Destructive,
                Some("high") => Severity::Warning,
                _ => Severity::Info,
            };
            Some(NotableTransition::new(
                "New maintenance ticket",
                format!("\"{}\" was reported", title),
                severity,
            ))
        }
        Operation::Updated => {
            let row = event.after.as_ref()?;
            let title = row.str_field("title").unwrap_or("Maintenance ticket");
            let (label, severity) = match row.str_field("status")? {
                "in_progress" => ("is in progress", Severity::Info),
                "resolved" => ("was resolved", Severity::Success),
                "closed" => ("was closed", Severity::Success),
                "reopened" => ("was reopened", Severity::Warning),
                _ => return None,
            };
            Some(NotableTransition::new(
                "Maintenance ticket",
                format!("\"{}\" {}", title, label),
                severity,
            ))
        }
        Operation::Deleted => {
            let row = event.before.as_ref()?;
            let title = row.str_field("title").unwrap_or("Maintenance ticket");
            Some(NotableTransition::info(
                "Maintenance ticket removed",
                format!("\"{}\" was removed", title),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::{created, updated};
    use lodgeboard_realtime::classifier::classify;
    use serde_json::json;

    #[test]
    fn test_urgent_ticket_creation_is_destructive() {
        let channel = channels().remove(0);
        let event = created(
            "maintenance_tickets",
            json!({"title": "Burst pipe", "priority": "urgent", "status": "open"}),
        );
        let transition = classify(&channel, &event).unwrap();
        assert_eq!(transition.severity, Severity::Destructive);
        assert!(transition.body.contains("Burst pipe"));
    }

    #[test]
    fn test_high_priority_creation_is_a_warning() {
        let channel = channels().remove(0);
        let event = created(
            "maintenance_tickets",
            json!({"title": "Broken AC", "priority": "high", "status": "open"}),
        );
        assert_eq!(
            classify(&channel, &event).unwrap().severity,
            Severity::Warning
        );
    }

    #[test]
    fn test_resolution_is_a_success_transition() {
        let channel = channels().remove(0);
        let event = updated(
            "maintenance_tickets",
            json!({"title": "Broken AC", "status": "open"}),
            json!({"title": "Broken AC", "status": "resolved"}),
        );
        assert_eq!(
            classify(&channel, &event).unwrap().severity,
            Severity::Success
        );
    }

    #[test]
    fn test_assignee_change_stays_silent() {
        let channel = channels().remove(0);
        let event = updated(
            "maintenance_tickets",
            json!({"title": "Broken AC", "status": "open", "assignee": "a"}),
            json!({"title": "Broken AC", "status": "open", "assignee": "b"}),
        );
        assert!(classify(&channel, &event).is_none());
    }
}
