use aws_lambda_events::event::s3::S3Event;
use serde::{Deserialize, Serialize};

/// One storage-object reference from the trigger batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

/// Extracts the object references from an S3 notification batch. Records
/// missing a bucket name or object key carry nothing to relay and are
/// dropped.
pub fn object_refs_from_event(event: &S3Event) -> Vec<ObjectRef> {
    event
        .records
        .iter()
        .filter_map(|record| {
            let bucket = record.s3.bucket.name.clone()?;
            let key = record.s3.object.key.clone()?;
            Some(ObjectRef { bucket, key })
        })
        .collect()
}
