//! Transition classifier - decides which change events surface to the user.
//!
//! Classification is a pure function over a single event. The anti-noise rule
//! is load-bearing: an update notifies only when the channel's discriminant
//! field actually changed, so editing a note on a reservation never spams the
//! dashboard. Unknown entities and unknown discriminant values classify to
//! nothing; backend schema additions must not crash the engine.

use crate::channels::ChannelConfig;
use crate::events::{ChangeEvent, Operation};
use crate::notifications::NotableTransition;

/// Maps a change event to zero-or-one notable transition.
///
/// - `Created` events always reach the message builder (new-entity announcement).
/// - `Updated` events reach it only when the discriminant field differs
///   between `before` and `after`; channels without a discriminant are silent
///   on updates.
/// - `Deleted` events reach it with only `before` populated.
///
/// The message builder itself may still decline (unknown status values, rows
/// missing the columns the message needs).
pub fn classify(channel: &ChannelConfig, event: &ChangeEvent) -> Option<NotableTransition> {
    if event.entity != channel.entity {
        return None;
    }

    match event.operation {
        Operation::Created | Operation::Deleted => (channel.build)(event),
        Operation::Updated => {
            let discriminant = channel.discriminant?;
            let before = event.before.as_ref()?;
            let after = event.after.as_ref()?;
            if discriminant.changed(before, after) {
                (channel.build)(event)
            } else {
                None
            }
        }
    }
}
