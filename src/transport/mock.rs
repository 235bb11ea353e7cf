//! Mock transport for testing

use super::Transport;
use crate::error::Result;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Mock transport for unit testing
///
/// Clones share the same queue, so a test can keep one handle to inject
/// bytes while the reader owns another.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Default)]
struct MockTransportInner {
    read_buffer: VecDeque<u8>,
    max_read: Option<usize>,
    closed: bool,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit how many bytes a single `read` returns, to simulate short reads
    pub fn with_max_read(max_read: usize) -> Self {
        let transport = Self::new();
        transport.inner.lock().max_read = Some(max_read.max(1));
        transport
    }

    /// Inject data to be read
    pub fn inject_read(&self, data: &[u8]) {
        self.inner.lock().read_buffer.extend(data);
    }

    /// Mark the stream as ended once the queue drains
    pub fn close(&self) {
        self.inner.lock().closed = true;
    }
}

impl Transport for MockTransport {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut inner = self.inner.lock();
        let limit = inner.max_read.unwrap_or(usize::MAX);
        let available = inner.read_buffer.len().min(buffer.len()).min(limit);

        for (slot, byte) in buffer.iter_mut().zip(inner.read_buffer.drain(..available)) {
            *slot = byte;
        }

        Ok(available)
    }

    fn available(&mut self) -> Result<usize> {
        Ok(self.inner.lock().read_buffer.len())
    }

    fn is_closed(&self) -> bool {
        let inner = self.inner.lock();
        inner.closed && inner.read_buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_read() {
        let mut transport = MockTransport::new();
        transport.inject_read(&[1, 2, 3, 4, 5]);

        let mut buffer = [0u8; 3];
        assert_eq!(transport.read(&mut buffer).unwrap(), 3);
        assert_eq!(buffer, [1, 2, 3]);
        assert_eq!(transport.available().unwrap(), 2);
    }

    #[test]
    fn test_short_reads() {
        let mut transport = MockTransport::with_max_read(2);
        transport.inject_read(&[1, 2, 3]);

        let mut buffer = [0u8; 8];
        assert_eq!(transport.read(&mut buffer).unwrap(), 2);
        assert_eq!(transport.read(&mut buffer).unwrap(), 1);
        assert_eq!(transport.read(&mut buffer).unwrap(), 0);
    }

    #[test]
    fn test_closed_after_drain() {
        let mut transport = MockTransport::new();
        transport.inject_read(&[9]);
        transport.close();
        assert!(!transport.is_closed());

        let mut buffer = [0u8; 4];
        transport.read(&mut buffer).unwrap();
        assert!(transport.is_closed());
    }
}
