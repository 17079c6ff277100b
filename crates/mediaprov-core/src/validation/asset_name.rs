//! Asset name generation
//!
//! Asset names double as blob container names, so they must be lowercase,
//! at most 63 characters and limited to letters, digits and hyphens.

use regex::Regex;
use uuid::Uuid;

use crate::error::AppError;

const PREFIX_MAX_CHARS: usize = 20;
const CONTAINER_NAME_MAX_LEN: usize = 63;

/// Build the asset name for `prefix` and the asset's GUID.
///
/// Fails with a validation error when no letter or digit of the prefix
/// survives sanitization, since `asset--{guid}` is not a valid container name.
pub fn asset_name(prefix: &str, asset_guid: &Uuid) -> Result<String, AppError> {
    let disallowed = Regex::new(r"[^a-zA-Z0-9_.]+").map_err(|e| {
        AppError::Internal(format!(
            "Failed to compile asset name sanitization regex: {}",
            e
        ))
    })?;

    let head: String = prefix.chars().take(PREFIX_MAX_CHARS).collect();
    let cleaned = disallowed.replace_all(&head, "");
    let cleaned: String = cleaned
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-' | '_'))
        .collect();
    if cleaned.is_empty() {
        return Err(AppError::Validation(format!(
            "prefix {:?} has no letters or digits in its first {} characters",
            prefix, PREFIX_MAX_CHARS
        )));
    }

    let mut name = format!("asset-{}-{}", cleaned, asset_guid);
    // Only ASCII remains at this point
    name.truncate(CONTAINER_NAME_MAX_LEN);
    Ok(name.to_lowercase())
}

/// Generate a fresh GUID and the matching asset name.
pub fn new_asset_name(prefix: &str) -> Result<(String, Uuid), AppError> {
    let guid = Uuid::new_v4();
    Ok((asset_name(prefix, &guid)?, guid))
}
