//! Error types for the realtime engine.
//!
//! Configuration problems are code defects and fail loudly before any
//! subscription opens. Feed and decode problems are runtime conditions that
//! never reach the end user: transport errors are retried by the feed client,
//! and a malformed event is dropped with a diagnostic log.

use thiserror::Error;

use crate::events::Operation;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the realtime engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Engine configuration invalid: {0}")]
    Config(#[from] ConfigError),

    #[error("Feed operation failed: {0}")]
    Feed(#[from] FeedError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Declarative channel-table defects, detected at engine construction.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No channels configured")]
    Empty,

    #[error("Duplicate channel for entity '{0}'")]
    DuplicateEntity(&'static str),

    #[error("Channel '{0}' has an empty cache region set")]
    EmptyRegions(&'static str),

    #[error("Channel '{0}' declares a blank discriminant field")]
    BlankDiscriminant(&'static str),
}

/// Errors from the change-feed boundary.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to subscribe to '{entity}': {reason}")]
    Subscribe { entity: String, reason: String },

    #[error("Feed connection closed: {0}")]
    Closed(String),
}

/// A single change payload that could not be decoded into a [`crate::events::ChangeEvent`].
///
/// Decode errors drop the one event and keep the stream alive.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Snapshot payload is not a JSON object")]
    NotAnObject,

    #[error("Missing '{0}' snapshot for {1:?} event")]
    MissingSnapshot(&'static str, Operation),
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
