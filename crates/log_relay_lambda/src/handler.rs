use std::io::Read;

use chrono::Utc;
use flate2::read::MultiGzDecoder;
use serde_json::json;

use crate::adapters::log_sink::{LogLineEvent, LogSink, StreamSetup};
use crate::adapters::object_fetch::ObjectFetcher;
use crate::errors::{DecompressionError, RelayError};
use crate::event::ObjectRef;

/// CloudWatch Logs accepts batched appends; 200 lines per call keeps each
/// request comfortably under the service payload limit.
pub const APPEND_BATCH_SIZE: usize = 200;

pub const COMPRESSED_KEY_SUFFIX: &str = ".gz";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub log_group: String,
}

/// Relays each referenced object into its derived log stream. References are
/// processed independently and in order; a failure aborts the invocation but
/// does not roll back appends already made for earlier references.
pub fn handle_event(
    refs: &[ObjectRef],
    config: &RelayConfig,
    fetcher: &impl ObjectFetcher,
    sink: &impl LogSink,
) -> Result<(), RelayError> {
    for object in refs {
        relay_object(object, config, fetcher, sink)?;
    }
    Ok(())
}

fn relay_object(
    object: &ObjectRef,
    config: &RelayConfig,
    fetcher: &impl ObjectFetcher,
    sink: &impl LogSink,
) -> Result<(), RelayError> {
    let body = fetcher.fetch_object(&object.bucket, &object.key)?;
    let body = if object.key.ends_with(COMPRESSED_KEY_SUFFIX) {
        gunzip(&body)?
    } else {
        body
    };

    let text = String::from_utf8_lossy(&body);
    let lines: Vec<&str> = text
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    if lines.is_empty() {
        log_relay_info(
            "object_skipped",
            json!({
                "bucket": object.bucket.clone(),
                "key": object.key.clone(),
                "reason": "no relayable lines",
            }),
        );
        return Ok(());
    }

    let stream_name = stream_name_for_key(&object.key);
    let mut sequence_token = match sink.ensure_stream(&stream_name)? {
        StreamSetup::Created => None,
        StreamSetup::AlreadyExists { sequence_token } => sequence_token,
    };

    // One base timestamp per object; each line is offset by its position in
    // the full filtered sequence, so timestamps stay strictly increasing
    // across batch boundaries.
    let base_timestamp = Utc::now().timestamp_millis();
    let mut batches_appended = 0usize;
    for (batch_index, batch) in lines.chunks(APPEND_BATCH_SIZE).enumerate() {
        let offset = batch_index * APPEND_BATCH_SIZE;
        let events: Vec<LogLineEvent> = batch
            .iter()
            .enumerate()
            .map(|(index, line)| LogLineEvent {
                timestamp: base_timestamp + (offset + index) as i64,
                message: (*line).to_string(),
            })
            .collect();

        sequence_token = sink.append_events(&stream_name, &events, sequence_token.as_deref())?;
        batches_appended += 1;
    }

    log_relay_info(
        "object_relayed",
        json!({
            "bucket": object.bucket.clone(),
            "key": object.key.clone(),
            "log_group": config.log_group.clone(),
            "stream_name": stream_name,
            "lines_relayed": lines.len(),
            "batches_appended": batches_appended,
        }),
    );
    Ok(())
}

/// Derives the target stream name from the object key: path separators and
/// dots both become hyphens, so `a/b.log.gz` maps to `a-b-log-gz`.
pub fn stream_name_for_key(key: &str) -> String {
    key.replace(['/', '.'], "-")
}

fn gunzip(body: &[u8]) -> Result<Vec<u8>, DecompressionError> {
    let mut decoder = MultiGzDecoder::new(body);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|error| DecompressionError {
            message: format!("malformed gzip payload: {error}"),
        })?;
    Ok(decompressed)
}

fn log_relay_info(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "log_relay",
            "event": event,
            "timestamp": Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
