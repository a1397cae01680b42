//! Fallible allocation for the codec's working buffers.
//!
//! Every stage writes into a plain `Vec`; capacity is reserved up front
//! with `try_reserve` so that running out of memory surfaces as
//! [`CodecError::AllocationFailure`] instead of aborting the process.

use crate::error::{CodecError, Result};

/// Creates an empty vector with room for at least `capacity` elements.
///
/// # Errors
/// Returns [`CodecError::AllocationFailure`] if the allocation fails.
pub(crate) fn try_with_capacity<T>(capacity: usize) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    reserve(&mut buf, capacity)?;
    Ok(buf)
}

/// Reserves room for `additional` more elements in `buf`.
///
/// # Errors
/// Returns [`CodecError::AllocationFailure`] if the allocation fails.
pub(crate) fn reserve<T>(buf: &mut Vec<T>, additional: usize) -> Result<()> {
    buf.try_reserve(additional)
        .map_err(|_| CodecError::AllocationFailure {
            requested: buf.len().saturating_add(additional),
        })
}
