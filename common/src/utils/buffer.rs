use std::ops::Range;

use crate::error::{Error, Result};

/// Validates a caller-supplied `(offset, length)` window against a buffer.
///
/// Every data operation calls this before handing a pointer to the OS.
pub fn checked_range(capacity: usize, offset: usize, length: usize) -> Result<Range<usize>> {
    match offset.checked_add(length) {
        Some(end) if end <= capacity => Ok(offset..end),
        _ => Err(Error::OutOfBounds { offset, length, capacity }),
    }
}

/// Window from `offset` to the end of the buffer.
pub fn tail_range(capacity: usize, offset: usize) -> Result<Range<usize>> {
    let length = capacity.checked_sub(offset).ok_or(Error::OutOfBounds {
        offset,
        length: 0,
        capacity,
    })?;
    checked_range(capacity, offset, length)
}
