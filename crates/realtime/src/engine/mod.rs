//! Sync engine module - subscription lifecycle and event fan-out.

mod sync_engine;

pub use sync_engine::SyncEngine;
