//! Typed records <-> persisted documents
//!
//! Full writes stamp `schemaVersion`. Reads migrate older documents forward:
//! version 0 (no stamp) used empty strings for "no class" and "no due date",
//! version 1 omits those fields instead. Documents stamped with a newer
//! version than this build understands are rejected.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use skytrack_domain::constants::{RECORD_SCHEMA_VERSION, SCHEMA_VERSION_FIELD};
use skytrack_domain::{Collection, Result, SkyTrackError};

use super::ports::{Document, StoredDocument};

/// Optional fields that version 0 documents wrote as `""` to mean "none".
const V0_EMPTY_STRING_FIELDS: [&str; 2] = ["classID", "dueDate"];

/// Encode a full record, stamping the current schema version.
pub fn encode<T: Serialize>(record: &T) -> Result<Document> {
    let mut fields = to_fields(record)?;
    fields.insert(SCHEMA_VERSION_FIELD.to_string(), Value::from(RECORD_SCHEMA_VERSION));
    Ok(fields)
}

/// Encode a partial update. Only the fields present in the patch are emitted.
pub fn encode_patch<T: Serialize>(patch: &T) -> Result<Document> {
    to_fields(patch)
}

/// Decode a stored document into a typed record.
///
/// The storage key is authoritative for the record id (`uid` for principals).
pub fn decode<T: DeserializeOwned>(collection: Collection, document: StoredDocument) -> Result<T> {
    let StoredDocument { id, mut fields } = document;
    migrate(collection, &mut fields)?;

    let key_field = if collection == Collection::Users { "uid" } else { "id" };
    fields.insert(key_field.to_string(), Value::String(id.clone()));

    serde_json::from_value(Value::Object(fields)).map_err(|err| {
        SkyTrackError::Remote(format!("malformed {collection} document {id}: {err}"))
    })
}

/// Schema version a document was written with; unstamped documents are 0.
pub fn schema_version(fields: &Document) -> u64 {
    fields.get(SCHEMA_VERSION_FIELD).and_then(Value::as_u64).unwrap_or(0)
}

fn migrate(collection: Collection, fields: &mut Document) -> Result<()> {
    let version = schema_version(fields);
    if version > RECORD_SCHEMA_VERSION {
        return Err(SkyTrackError::Remote(format!(
            "{collection} document uses schema version {version}, newest supported is {RECORD_SCHEMA_VERSION}"
        )));
    }

    if version == 0 {
        for field in V0_EMPTY_STRING_FIELDS {
            let is_empty = fields.get(field).and_then(Value::as_str).is_some_and(str::is_empty);
            if is_empty {
                fields.remove(field);
            }
        }
    }

    fields.remove(SCHEMA_VERSION_FIELD);
    Ok(())
}

fn to_fields<T: Serialize>(value: &T) -> Result<Document> {
    let value = serde_json::to_value(value)
        .map_err(|err| SkyTrackError::Internal(format!("failed to encode document: {err}")))?;
    match value {
        Value::Object(fields) => Ok(fields),
        other => Err(SkyTrackError::Internal(format!("expected a JSON object, got {other}"))),
    }
}
