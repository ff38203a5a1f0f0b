//! Text helpers.

use crate::error::{Error, Result};

/// Split `text` into consecutive pieces of at most `size` characters. The
/// last piece may be shorter; empty text yields no pieces. A zero `size`
/// is a configuration error.
pub fn chunks(text: &str, size: usize) -> Result<Vec<&str>> {
    if size == 0 {
        return Err(Error::Config("Chunk size must be positive".to_string()));
    }
    if text.is_ascii() {
        return Ok((0..text.len())
            .step_by(size)
            .map(|start| &text[start..(start + size).min(text.len())])
            .collect());
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (count, (idx, _)) in text.char_indices().enumerate() {
        if count > 0 && count % size == 0 {
            pieces.push(&text[start..idx]);
            start = idx;
        }
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    Ok(pieces)
}
