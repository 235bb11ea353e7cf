//! Byte stream buffer for frame parsing
//!
//! Contiguous growable buffer with amortized O(1) consume. The frame decoder
//! needs the buffered bytes as a single slice, so instead of wrapping around
//! like a ring buffer, consumed bytes are skipped with a read cursor and the
//! storage is compacted only once the dead prefix dominates.

/// Compact once at least this many consumed bytes sit in front of the cursor
const COMPACT_MIN: usize = 4096;

/// Accumulating byte buffer with append-at-tail and consume-at-head
#[derive(Debug, Default, Clone)]
pub struct StreamBuffer {
    data: Vec<u8>,
    head: usize, // Read position (first valid byte)
}

impl StreamBuffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer with preallocated storage
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            head: 0,
        }
    }

    /// Append bytes to the tail
    #[inline]
    pub fn extend(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Consume n bytes from the front
    ///
    /// `n` is clamped to the number of buffered bytes. Remaining bytes keep
    /// their order.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        let n = n.min(self.len());
        self.head += n;

        if self.head == self.data.len() {
            self.data.clear();
            self.head = 0;
        } else if self.head >= COMPACT_MIN && self.head * 2 >= self.data.len() {
            self.compact();
        }
    }

    /// Keep only the trailing `n` bytes
    pub fn keep_tail(&mut self, n: usize) {
        let len = self.len();
        if len > n {
            self.advance(len - n);
        }
    }

    /// Drop all buffered bytes
    pub fn clear(&mut self) {
        self.data.clear();
        self.head = 0;
    }

    /// Number of bytes available to read
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() - self.head
    }

    /// Whether the buffer holds no bytes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// View of all buffered bytes, oldest first
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[self.head..]
    }

    fn compact(&mut self) {
        self.data.drain(..self.head);
        self.head = 0;
    }
}
