//! Aggregate channel table for hosts that mount the whole dashboard at once.

use lodgeboard_realtime::channels::ChannelConfig;

/// Every dashboard module's channels, combined into one table.
///
/// Entity names are disjoint across modules, so the combined table passes the
/// engine's duplicate-entity validation.
pub fn channels() -> Vec<ChannelConfig> {
    let mut all = Vec::new();
    all.extend(crate::reservations::channels());
    all.extend(crate::rooms::channels());
    all.extend(crate::housekeeping::channels());
    all.extend(crate::maintenance::channels());
    all.extend(crate::guests::channels());
    all.extend(crate::pos::channels());
    all.extend(crate::folios::channels());
    all
}
