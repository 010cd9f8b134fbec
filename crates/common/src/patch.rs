//! Strict parsing for partial updates of boolean flags
//!
//! A patch body must be a JSON object. Keys are checked by the target type's
//! schema (`deny_unknown_fields`); a key that is present must carry a
//! boolean, so `null` is rejected rather than read as "absent".

use crate::errors::{AppError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a raw request body into a patch type
pub fn from_slice<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::invalid_request(format!("Malformed JSON: {}", e)))?;
    from_value(value, what)
}

/// Decode an already-parsed JSON body into a patch type
pub fn from_value<T: DeserializeOwned>(body: Value, what: &str) -> Result<T> {
    if !body.is_object() {
        return Err(AppError::invalid_request("Request body must be a JSON object"));
    }

    serde_json::from_value(body)
        .map_err(|e| AppError::invalid_request(format!("Invalid {}: {}", what, e)))
}

pub fn present_bool<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    bool::deserialize(deserializer).map(Some)
}

pub fn require_any(is_empty: bool) -> Result<()> {
    if is_empty {
        return Err(AppError::invalid_request(
            "Request body must contain at least one updatable field",
        ));
    }
    Ok(())
}

/// Store `value` if present; returns whether the stored value changed
pub fn overwrite(slot: &mut Option<bool>, value: Option<bool>) -> bool {
    match value {
        Some(v) if *slot != Some(v) => {
            *slot = Some(v);
            true
        }
        _ => false,
    }
}
