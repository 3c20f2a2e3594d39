//! JSON encoding of cached article records.
//!
//! Only successful extractions are ever persisted, so the codec refuses to encode a degraded
//! record and treats a stored record carrying an error message as corrupt.

use crate::reader::ArticleRecord;
use crate::store::StoreError;

/// Serialize a record for storage.
pub fn encode_record(record: &ArticleRecord) -> Result<Vec<u8>, StoreError> {
    if record.is_degraded() {
        return Err(StoreError::Encode(format!(
            "refusing to persist degraded record for {}",
            record.url
        )));
    }
    serde_json::to_vec(record).map_err(|error| StoreError::Encode(error.to_string()))
}

/// Decode a stored payload for `url`.
///
/// The lookup key is authoritative for `url`; a missing or mismatched `url` field in the
/// payload is overwritten.
pub fn decode_record(url: &str, payload: &[u8]) -> Result<ArticleRecord, StoreError> {
    let mut record: ArticleRecord =
        serde_json::from_slice(payload).map_err(|error| StoreError::Decode(error.to_string()))?;
    if record.is_degraded() {
        return Err(StoreError::Decode(format!(
            "cached entry for {url} carries an error message"
        )));
    }
    record.url = url.to_string();
    Ok(record)
}
