use serde::{Deserialize, Serialize};

use crate::errors::{AppendError, StreamSetupError};

/// One line staged for append, with a millisecond timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogLineEvent {
    pub timestamp: i64,
    pub message: String,
}

/// Outcome of ensuring the target stream exists. "Already exists" is an
/// expected condition, not an error: the relay adopts the stream's current
/// sequence token and keeps appending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSetup {
    Created,
    AlreadyExists { sequence_token: Option<String> },
}

pub trait LogSink {
    fn ensure_stream(&self, stream_name: &str) -> Result<StreamSetup, StreamSetupError>;

    /// Appends one batch and returns the sequence token to use for the next
    /// append to the same stream.
    fn append_events(
        &self,
        stream_name: &str,
        events: &[LogLineEvent],
        sequence_token: Option<&str>,
    ) -> Result<Option<String>, AppendError>;
}
