//! Cache key derivation utilities.

use sheetbridge_core::Result;
use uuid::Uuid;

/// Prefix marking the index record of a multipart entry.
pub const INDEX_KEY_PREFIX: &str = "multipartCache-";

/// Key under which the index record for `key` is stored.
pub fn index_key(key: &str) -> String {
    format!("{}{}", INDEX_KEY_PREFIX, key)
}

/// Fresh, collision-free key for one part record.
pub fn part_key() -> String {
    Uuid::new_v4().to_string()
}

/// Split an encoded blob into consecutive parts of at most `slot_size`
/// characters, preserving order.
pub fn split_parts(encoded: &str, slot_size: usize) -> Result<Vec<&str>> {
    sheetbridge_core::text::chunks(encoded, slot_size)
}

/// Sanitize a key for use in filenames.
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}
