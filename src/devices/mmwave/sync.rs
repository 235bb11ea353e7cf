//! Frame synchronization: locate the magic word in a byte stream

use super::constants::{MAGIC_LEN, MAGIC_WORD};

/// Check whether `window` starts with the magic word
///
/// Returns false for windows shorter than the marker.
#[inline]
pub fn is_magic(window: &[u8]) -> bool {
    window.len() >= MAGIC_LEN && window[..MAGIC_LEN] == MAGIC_WORD
}

/// Find the leftmost magic word, returns offset from buffer start
pub fn find_magic(buf: &[u8]) -> Option<usize> {
    find_magic_from(buf, 0)
}

/// Find the leftmost magic word at or after `start`
pub fn find_magic_from(buf: &[u8], start: usize) -> Option<usize> {
    buf.get(start..)?
        .windows(MAGIC_LEN)
        .position(|w| w == MAGIC_WORD)
        .map(|i| start + i)
}
