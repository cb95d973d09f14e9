//! Guests dashboard channel.
//!
//! Guest profiles are tenant-wide rather than per-property. The discriminant
//! is the `is_blacklisted` flag; ordinary profile edits stay silent.

use lodgeboard_realtime::channels::{ChannelConfig, Discriminant, ScopeFilter};
use lodgeboard_realtime::events::{ChangeEvent, Operation, SnapshotFields};
use lodgeboard_realtime::invalidation::RegionKey;
use lodgeboard_realtime::notifications::{NotableTransition, Severity};

pub const GUESTS: RegionKey = RegionKey::new("guests");
pub const GUEST_STATS: RegionKey = RegionKey::new("guest-stats");

const REGIONS: &[RegionKey] = &[GUESTS, GUEST_STATS];

pub fn channels() -> Vec<ChannelConfig> {
    vec![ChannelConfig {
        entity: "guests",
        filter: ScopeFilter::Tenant,
        discriminant: Some(Discriminant::Flag("is_blacklisted")),
        regions: REGIONS,
        build: guest_message,
    }]
}

fn guest_name(row: &lodgeboard_realtime::events::Snapshot) -> String {
    match (row.str_field("first_name"), row.str_field("last_name")) {
        (Some(first), Some(last)) => format!("{} {}", first, last),
        (Some(first), None) => first.to_string(),
        (None, Some(last)) => last.to_string(),
        (None, None) => "A guest".to_string(),
    }
}

fn guest_message(event: &ChangeEvent) -> Option<NotableTransition> {
    match event.operation {
        Operation::Created => {
            let row = event.after.as_ref()?;
            Some(NotableTransition::info(
                "New guest",
                format!("{} was added to the guest directory", guest_name(row)),
            ))
        }
        Operation::Updated => {
            let row = event.after.as_ref()?;
            let name = guest_name(row);
            if row.bool_field("is_blacklisted")? {
                Some(NotableTransition::destructive(
                    "Guest blacklisted",
                    format!("{} was added to the blacklist", name),
                ))
            } else {
                Some(NotableTransition::success(
                    "Guest reinstated",
                    format!("{} was removed from the blacklist", name),
                ))
            }
        }
        Operation::Deleted => {
            let row = event.before.as_ref()?;
            Some(NotableTransition::info(
                "Guest removed",
                format!("{} was removed from the guest directory", guest_name(row)),
            ))
        }
    }
}
