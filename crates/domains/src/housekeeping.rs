//! Housekeeping dashboard channel.
//!
//! Task mutations also invalidate the `rooms` region: completing a cleaning
//! task flips the room's status at the data layer.

use lodgeboard_realtime::channels::{ChannelConfig, Discriminant, ScopeFilter};
use lodgeboard_realtime::events::{ChangeEvent, Operation, SnapshotFields};
use lodgeboard_realtime::invalidation::RegionKey;
use lodgeboard_realtime::notifications::{NotableTransition, Severity};

use crate::rooms::ROOMS;

pub const HOUSEKEEPING_TASKS: RegionKey = RegionKey::new("housekeeping-tasks");
pub const HOUSEKEEPING_STATS: RegionKey = RegionKey::new("housekeeping-stats");

const REGIONS: &[RegionKey] = &[HOUSEKEEPING_TASKS, HOUSEKEEPING_STATS, ROOMS];

pub fn channels() -> Vec<ChannelConfig> {
    vec![ChannelConfig {
        entity: "housekeeping_tasks",
        filter: ScopeFilter::Property,
        discriminant: Some(Discriminant::Text("status")),
        regions: REGIONS,
        build: task_message,
    }]
}

fn task_message(event: &ChangeEvent) -> Option<NotableTransition> {
    match event.operation {
        Operation::Created => {
            let row = event.after.as_ref()?;
            let room = row.display_field("room_number").unwrap_or_default();
            Some(NotableTransition::info(
                "Housekeeping task",
                format!("New task for room {}", room),
            ))
        }
        Operation::Updated => {
            let row = event.after.as_ref()?;
            let room = row.display_field("room_number").unwrap_or_default();
            let (label, severity) = match row.str_field("status")? {
                "in_progress" => ("started", Severity::Info),
                "completed" => ("completed", Severity::Success),
                "skipped" => ("skipped", Severity::Warning),
                _ => return None,
            };
            Some(NotableTransition::new(
                "Housekeeping task",
                format!("Task for room {} was {}", room, label),
                severity,
            ))
        }
        Operation::Deleted => {
            let row = event.before.as_ref()?;
            let room = row.display_field("room_number").unwrap_or_default();
            Some(NotableTransition::info(
                "Housekeeping task removed",
                format!("Task for room {} was removed", room),
            ))
        }
    }
}
