//! Rooms dashboard channel.
//!
//! Watches `rooms` and `room_types` per property. Room status is the
//! discriminant; room-type edits only notify on create/delete.

use lodgeboard_realtime::channels::{ChannelConfig, Discriminant, ScopeFilter};
use lodgeboard_realtime::events::{ChangeEvent, Operation, SnapshotFields};
use lodgeboard_realtime::invalidation::RegionKey;
use lodgeboard_realtime::notifications::{NotableTransition, Severity};

pub const ROOMS: RegionKey = RegionKey::new("rooms");
pub const ROOM_STATS: RegionKey = RegionKey::new("room-stats");
pub const ROOM_TYPES: RegionKey = RegionKey::new("room-types");

const ROOM_REGIONS: &[RegionKey] = &[ROOMS, ROOM_STATS];
const ROOM_TYPE_REGIONS: &[RegionKey] = &[ROOMS, ROOM_TYPES];

pub fn channels() -> Vec<ChannelConfig> {
    vec![
        ChannelConfig {
            entity: "rooms",
            filter: ScopeFilter::Property,
            discriminant: Some(Discriminant::Text("status")),
            regions: ROOM_REGIONS,
            build: room_message,
        },
        ChannelConfig {
            entity: "room_types",
            filter: ScopeFilter::Property,
            discriminant: None,
            regions: ROOM_TYPE_REGIONS,
            build: room_type_message,
        },
    ]
}

fn room_message(event: &ChangeEvent) -> Option<NotableTransition> {
    match event.operation {
        Operation::Created => {
            let row = event.after.as_ref()?;
            let number = row.display_field("room_number")?;
            Some(NotableTransition::info(
                "Room added",
                format!("Room {} was added", number),
            ))
        }
        Operation::Updated => {
            let row = event.after.as_ref()?;
            let number = row.display_field("room_number").unwrap_or_default();
            let (body, severity) = match row.str_field("status")? {
                "available" => (format!("Room {} is available", number), Severity::Success),
                "occupied" => (format!("Room {} is occupied", number), Severity::Info),
                "dirty" => (
                    format!("Room {} needs housekeeping", number),
                    Severity::Info,
                ),
                "maintenance" => (
                    format!("Room {} is under maintenance", number),
                    Severity::Warning,
                ),
                "out_of_order" => (
                    format!("Room {} was taken out of order", number),
                    Severity::Warning,
                ),
                _ => return None,
            };
            Some(NotableTransition::new("Room status", body, severity))
        }
        Operation::Deleted => {
            let row = event.before.as_ref()?;
            let number = row.display_field("room_number")?;
            Some(NotableTransition::info(
                "Room removed",
                format!("Room {} was removed", number),
            ))
        }
    }
}

fn room_type_message(event: &ChangeEvent) -> Option<NotableTransition> {
    match event.operation {
        Operation::Created => {
            let row = event.after.as_ref()?;
            let name = row.str_field("name")?;
            Some(NotableTransition::info(
                "Room type added",
                format!("Room type \"{}\" was added", name),
            ))
        }
        // Rate and description edits are frequent; only create/delete surface.
        Operation::Updated => None,
        Operation::Deleted => {
            let row = event.before.as_ref()?;
            let name = row.str_field("name")?;
            Some(NotableTransition::info(
                "Room type removed",
                format!("Room type \"{}\" was removed", name),
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
    fn test_room_out_of_order_is_a_warning() {
        let channel = channels().remove(0);
        let event = updated(
            "rooms",
            json!({"room_number": 101, "status": "available"}),
            json!({"room_number": 101, "status": "out_of_order"}),
        );
        let transition = classify(&channel, &event).unwrap();
        assert_eq!(transition.severity, Severity::Warning);
        assert!(transition.body.contains("101"));
    }

    #[test]
    fn test_note_only_update_stays_silent() {
        let channel = channels().remove(0);
        let event = updated(
            "rooms",
            json!({"room_number": 101, "status": "occupied", "notes": "towels"}),
            json!({"room_number": 101, "status": "occupied", "notes": "minibar"}),
        );
        assert!(classify(&channel, &event).is_none());
    }

    #[test]
    fn test_room_type_updates_stay_silent() {
        let channel = channels().remove(1);
        let event = updated(
            "room_types",
            json!({"name": "Deluxe", "base_rate": 120}),
            json!({"name": "Deluxe", "base_rate": 140}),
        );
        assert!(classify(&channel, &event).is_none());

        let event = created("room_types", json!({"name": "Deluxe"}));
        assert!(classify(&channel, &event).is_some());
    }
}
