//! Transport layer for byte-source abstraction
//!
//! Sources are read-only: the decoder never talks back to the sensor.

use crate::error::Result;

mod mock;
mod reader;
pub use mock::MockTransport;
pub use reader::ReaderTransport;

/// Byte source for a sensor data stream
pub trait Transport: Send {
    /// Read data into buffer, returns number of bytes read
    ///
    /// Returns `Ok(0)` when no data is currently available, including on
    /// read timeouts.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// Check if data is available to read
    fn available(&mut self) -> Result<usize> {
        Ok(0) // Default implementation
    }

    /// Whether the source has ended and will never yield more bytes
    fn is_closed(&self) -> bool {
        false
    }
}
