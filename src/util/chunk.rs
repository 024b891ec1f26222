//! Fixed-size batching for request ids.
//!
//! The BGG `thing` endpoint accepts a comma-separated id list but degrades
//! past roughly 20 ids per request, so multi-id lookups are split into
//! bounded batches before being issued.

use crate::error::Error;

/// Splits `items` into ordered batches of at most `max_per` elements.
///
/// Order is preserved and no item is dropped or duplicated; only the final
/// batch may be shorter than `max_per`. Empty input produces no batches.
///
/// # Errors
/// Returns [`Error::InvalidChunkSize`] if `max_per` is zero.
pub fn chunk<T>(items: Vec<T>, max_per: usize) -> Result<Vec<Vec<T>>, Error> {
    if max_per == 0 {
        return Err(Error::InvalidChunkSize(max_per));
    }

    let mut chunks: Vec<Vec<T>> = Vec::with_capacity(items.len().div_ceil(max_per));
    for item in items {
        match chunks.last_mut() {
            Some(last) if last.len() < max_per => last.push(item),
            _ => chunks.push(vec![item]),
        }
    }

    Ok(chunks)
}
