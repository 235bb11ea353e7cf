//! Transport over any `std::io::Read` source (capture files, stdin, pipes)

use super::Transport;
use crate::error::Result;
use std::fs::File;
use std::io::{self, ErrorKind, Read, Stdin};
use std::path::Path;

/// Replays bytes from a reader
pub struct ReaderTransport<R> {
    inner: R,
    closed: bool,
}

impl<R: Read + Send> ReaderTransport<R> {
    /// Wrap a reader
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            closed: false,
        }
    }
}

impl ReaderTransport<File> {
    /// Open a captured byte stream
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        log::info!("Replaying capture from {}", path.as_ref().display());
        Ok(Self::new(file))
    }
}

impl ReaderTransport<Stdin> {
    /// Read the stream from standard input
    pub fn stdin() -> Self {
        Self::new(io::stdin())
    }
}

impl<R: Read + Send> Transport for ReaderTransport<R> {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        if self.closed {
            return Ok(0);
        }

        match self.inner.read(buffer) {
            Ok(0) if !buffer.is_empty() => {
                log::debug!("Input stream reached end of data");
                self.closed = true;
                Ok(0)
            }
            Ok(n) => Ok(n),
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) =>
            {
                Ok(0)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
