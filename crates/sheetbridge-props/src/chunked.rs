//! Chunked JSON persistence in a property store.
//!
//! An object named `name` is stored as `{name}-CHUNK_1` .. `{name}-CHUNK_n`
//! followed by `{name}-CHUNK_INDEX = n`.

use serde::Serialize;
use serde::de::DeserializeOwned;
use sheetbridge_core::ports::PropertyStore;
use sheetbridge_core::{Error, Result};
use tracing::debug;

/// Largest property value written, in characters.
pub const CHUNK_SIZE: usize = 4_999;

fn chunk_key(name: &str, number: usize) -> String {
    format!("{}-CHUNK_{}", name, number)
}

fn index_key(name: &str) -> String {
    format!("{}-CHUNK_INDEX", name)
}

/// Split a string into owned chunks of `size` characters; the last chunk
/// may be shorter.
pub fn chunk_substr(text: &str, size: usize) -> Result<Vec<String>> {
    Ok(sheetbridge_core::text::chunks(text, size)?
        .into_iter()
        .map(str::to_string)
        .collect())
}

/// Serialize `object` and store it in chunks under `name`. Returns the
/// number of chunks written.
pub async fn put_in_props<T: Serialize + ?Sized>(
    store: &dyn PropertyStore,
    object: &T,
    name: &str,
) -> Result<usize> {
    let json = serde_json::to_string(object)?;
    let chunks = chunk_substr(&json, CHUNK_SIZE)?;

    for (i, chunk) in chunks.iter().enumerate() {
        store.set(&chunk_key(name, i + 1), chunk).await?;
    }
    store.set(&index_key(name), &chunks.len().to_string()).await?;

    debug!(name = %name, chunks = chunks.len(), "Stored chunked property");
    Ok(chunks.len())
}

/// Reassemble and parse the object stored under `name`.
pub async fn get_from_props<T: DeserializeOwned>(
    store: &dyn PropertyStore,
    name: &str,
) -> Result<Option<T>> {
    let Some(raw_count) = store.get(&index_key(name)).await? else {
        return Ok(None);
    };
    let count: usize = raw_count
        .trim()
        .parse()
        .map_err(|_| Error::Storage(format!("Invalid chunk index for {}: {}", name, raw_count)))?;

    let mut json = String::new();
    for number in 1..=count {
        let chunk = store
            .get(&chunk_key(name, number))
            .await?
            .ok_or_else(|| Error::Storage(format!("Missing chunk {} of {} for {}", number, count, name)))?;
        json.push_str(&chunk);
    }

    Ok(Some(serde_json::from_str(&json)?))
}
