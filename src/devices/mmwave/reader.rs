//! Buffered frame reader for one sensor stream
//!
//! Owns the stream buffer and applies the caller-side policies the decoder
//! leaves open: trimming decoded frames, capping buffer growth while frames
//! fail to parse, and resynchronizing after a corrupt header.

use super::buffer::StreamBuffer;
use super::constants::{MAGIC_LEN, READ_CHUNK_SIZE};
use super::decoder::{DecodeStatus, Frame, FrameDecoder};
use crate::config::{ReaderConfig, ResyncPolicy};
use crate::core::pose::SensorPose;
use crate::error::Result;
use crate::transport::Transport;

/// Running counters for one reader
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReaderStats {
    /// Frames decoded successfully
    pub frames: u64,
    /// Corrupt headers encountered
    pub corrupt_frames: u64,
    /// Frames declaring a length above `max_buffer_bytes`
    pub oversized_frames: u64,
    /// Bytes dropped without being part of a decoded frame
    pub bytes_discarded: u64,
    /// Times the buffer cap forced a trim
    pub buffer_trims: u64,
}

/// Stream reader: bytes in, frames out
///
/// The buffer never holds more than `max_buffer_bytes` once a call returns.
/// Frames whose header declares a longer length can never be delivered and
/// are dropped through the resync policy as soon as their header is seen.
pub struct FrameReader {
    buffer: StreamBuffer,
    decoder: FrameDecoder,
    config: ReaderConfig,
    stats: ReaderStats,
}

impl FrameReader {
    pub fn new(pose: &SensorPose, config: ReaderConfig) -> Self {
        Self {
            buffer: StreamBuffer::with_capacity(config.max_buffer_bytes),
            decoder: FrameDecoder::new(pose),
            config,
            stats: ReaderStats::default(),
        }
    }

    /// Append received bytes
    ///
    /// If the buffer grows past `max_buffer_bytes`, only the trailing
    /// `keep_tail_bytes` are kept.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend(bytes);
        self.enforce_cap();
    }

    /// Return the next buffered frame, reading from the transport only when
    /// none is ready
    ///
    /// A read never requests more than the room left under the buffer cap.
    pub fn read_frame<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
    ) -> Result<Option<Frame>> {
        if let Some(frame) = self.next_frame() {
            return Ok(Some(frame));
        }

        let room = self
            .config
            .max_buffer_bytes
            .saturating_sub(self.buffer.len())
            .clamp(1, READ_CHUNK_SIZE);
        let mut temp_buf = [0u8; READ_CHUNK_SIZE];
        let n = transport.read(&mut temp_buf[..room])?;
        if n > 0 {
            self.push(&temp_buf[..n]);
        }

        Ok(self.next_frame())
    }

    /// Try to decode one frame from the buffered bytes
    pub fn next_frame(&mut self) -> Option<Frame> {
        let result = self.decoder.decode(self.buffer.as_slice());

        match result.status {
            DecodeStatus::Complete => {
                let consumed = result.consumed()?;
                let start = result.header_start.unwrap_or(0);
                let frame = result.frame?;
                self.discard(start);
                self.buffer.advance(consumed - start);
                self.record_frame(&frame);
                Some(frame)
            }
            DecodeStatus::Incomplete => {
                // Bytes ahead of the magic word can never become part of a frame
                if let Some(start) = result.header_start {
                    self.discard(start);
                }
                if let Some(total_len) = result.total_len()
                    && total_len as usize > self.config.max_buffer_bytes
                {
                    self.stats.oversized_frames += 1;
                    log::warn!(
                        "Frame #{} declares {} bytes, above the {} byte buffer cap",
                        result.header.map(|h| h.frame_number).unwrap_or_default(),
                        total_len,
                        self.config.max_buffer_bytes
                    );
                    self.resync(0);
                }
                None
            }
            DecodeStatus::NotFound => {
                // Keep a possible partial magic word at the tail
                let keep = MAGIC_LEN - 1;
                if self.buffer.len() > keep {
                    self.discard(self.buffer.len() - keep);
                }
                None
            }
            DecodeStatus::Corrupt(reason) => {
                self.stats.corrupt_frames += 1;
                let start = result.header_start.unwrap_or(0);
                log::warn!(
                    "Corrupt frame at offset {} (frame #{}): {}",
                    start,
                    result.header.map(|h| h.frame_number).unwrap_or_default(),
                    reason
                );
                self.resync(start);
                None
            }
        }
    }

    /// Drain every frame currently decodable from the buffer
    pub fn drain_frames(&mut self) -> Vec<Frame> {
        let mut frames = Vec::new();
        loop {
            let before = self.buffer.len();
            match self.next_frame() {
                Some(frame) => frames.push(frame),
                // Stop once a failed attempt made no progress
                None if self.buffer.len() == before => break,
                None => {}
            }
        }
        frames
    }

    pub fn stats(&self) -> &ReaderStats {
        &self.stats
    }

    /// Number of buffered bytes not yet decoded
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    fn discard(&mut self, n: usize) {
        let n = n.min(self.buffer.len());
        if n > 0 {
            self.buffer.advance(n);
            self.stats.bytes_discarded += n as u64;
        }
    }

    /// Drop a rejected frame whose magic word sits at `start`
    fn resync(&mut self, start: usize) {
        match self.config.resync {
            ResyncPolicy::SkipByte => self.discard(start + 1),
            ResyncPolicy::DropBuffer => {
                self.stats.bytes_discarded += self.buffer.len() as u64;
                self.buffer.clear();
            }
        }
    }

    fn enforce_cap(&mut self) {
        let len = self.buffer.len();
        if len > self.config.max_buffer_bytes {
            let drop = len.saturating_sub(self.config.keep_tail_bytes);
            log::debug!(
                "Buffer at {} bytes exceeds cap {}, dropping {}",
                len,
                self.config.max_buffer_bytes,
                drop
            );
            self.buffer.keep_tail(self.config.keep_tail_bytes);
            self.stats.bytes_discarded += drop as u64;
            self.stats.buffer_trims += 1;
        }
    }

    fn record_frame(&mut self, frame: &Frame) {
        self.stats.frames += 1;
        let count = self.stats.frames;

        log::debug!(
            "Frame #{} (sub-frame {}): {} objects, {} TLVs",
            frame.header().frame_number,
            frame.header().sub_frame,
            frame.len(),
            frame.header().num_tlv
        );

        if count % 1000 == 0 {
            let error_rate = (self.stats.corrupt_frames as f64 / count as f64) * 100.0;
            log::info!(
                "Reader stats: {} frames, {:.2}% corrupt, {} bytes discarded",
                count,
                error_rate,
                self.stats.bytes_discarded
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::mmwave::constants::{HEADER_SIZE, MAGIC_WORD};
    use crate::transport::MockTransport;
    use std::time::SystemTime;

    fn empty_frame(frame_number: u32) -> Vec<u8> {
        let mut out = MAGIC_WORD.to_vec();
        for word in [0u32, HEADER_SIZE as u32, 0, frame_number, 0, 0, 0, 0] {
            out.extend_from_slice(&word.to_le_bytes());
        }
        out
    }

    fn reader() -> FrameReader {
        FrameReader::new(&SensorPose::identity(1), ReaderConfig::default())
    }

    #[test]
    fn test_consumes_decoded_frame() {
        let mut reader = reader();
        reader.push(&[0xAB; 3]);
        reader.push(&empty_frame(1));
        reader.push(&empty_frame(2));

        let first = reader.next_frame().unwrap();
        assert_eq!(first.header().frame_number, 1);
        assert_eq!(reader.buffered(), HEADER_SIZE);
        assert_eq!(reader.stats().bytes_discarded, 3);

        let second = reader.next_frame().unwrap();
        assert_eq!(second.header().frame_number, 2);
        assert_eq!(reader.buffered(), 0);
        assert_eq!(reader.stats().frames, 2);
    }

    #[test]
    fn test_frame_stamped_on_completion() {
        let mut reader = reader();
        let frame = empty_frame(6);
        reader.push(&frame[..30]);
        assert!(reader.next_frame().is_none());

        let before = SystemTime::now();
        reader.push(&frame[30..]);
        let decoded = reader.next_frame().unwrap();
        assert!(decoded.received_at() >= before);
        assert!(decoded.received_at() <= SystemTime::now());
    }

    #[test]
    fn test_not_found_keeps_partial_marker() {
        let mut reader = reader();
        reader.push(&[0u8; 100]);
        reader.push(&MAGIC_WORD[..5]);

        assert!(reader.next_frame().is_none());
        assert_eq!(reader.buffered(), MAGIC_LEN - 1);

        reader.push(&MAGIC_WORD[5..]);
        reader.push(&empty_frame(9)[MAGIC_LEN..]);
        assert_eq!(reader.next_frame().unwrap().header().frame_number, 9);
    }

    #[test]
    fn test_skip_byte_resync() {
        let mut bad = empty_frame(1);
        bad[36] = 7; // sub-frame out of range

        let mut reader = reader();
        reader.push(&bad);
        reader.push(&empty_frame(2));

        let frames = reader.drain_frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].header().frame_number, 2);
        assert_eq!(reader.stats().corrupt_frames, 1);
    }

    #[test]
    fn test_drop_buffer_resync() {
        let mut bad = empty_frame(1);
        bad[36] = 7;

        let config = ReaderConfig {
            resync: ResyncPolicy::DropBuffer,
            ..ReaderConfig::default()
        };
        let mut reader = FrameReader::new(&SensorPose::identity(1), config);
        reader.push(&bad);
        reader.push(&empty_frame(2));

        assert!(reader.next_frame().is_none());
        assert_eq!(reader.buffered(), 0);
    }

    #[test]
    fn test_push_enforces_cap() {
        let config = ReaderConfig {
            max_buffer_bytes: 200,
            keep_tail_bytes: 100,
            ..ReaderConfig::default()
        };
        let mut reader = FrameReader::new(&SensorPose::identity(1), config);

        reader.push(&[0xAB; 150]);
        assert_eq!(reader.buffered(), 150);
        assert_eq!(reader.stats().buffer_trims, 0);

        reader.push(&[0xCD; 60]);
        assert_eq!(reader.buffered(), 100);
        assert_eq!(reader.stats().buffer_trims, 1);
        assert_eq!(reader.stats().bytes_discarded, 110);
    }

    #[test]
    fn test_frame_longer_than_cap_is_dropped() {
        let config = ReaderConfig {
            max_buffer_bytes: 200,
            keep_tail_bytes: 100,
            ..ReaderConfig::default()
        };
        let mut reader = FrameReader::new(&SensorPose::identity(1), config);

        // Header declaring a frame that could never fit under the cap
        let mut oversized = empty_frame(1);
        oversized[12..16].copy_from_slice(&1_000u32.to_le_bytes());
        reader.push(&oversized);
        reader.push(&empty_frame(2));

        let frames = reader.drain_frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].header().frame_number, 2);
        assert_eq!(reader.stats().oversized_frames, 1);
        assert_eq!(reader.stats().corrupt_frames, 0);
    }

    #[test]
    fn test_frame_at_cap_is_delivered() {
        let config = ReaderConfig {
            max_buffer_bytes: HEADER_SIZE,
            keep_tail_bytes: 8,
            ..ReaderConfig::default()
        };
        let mut reader = FrameReader::new(&SensorPose::identity(1), config);
        let transport = MockTransport::new();
        transport.inject_read(&empty_frame(3));
        transport.inject_read(&empty_frame(4));

        let mut port = transport.clone();
        let mut numbers = Vec::new();
        for _ in 0..8 {
            if let Some(frame) = reader.read_frame(&mut port).unwrap() {
                numbers.push(frame.header().frame_number);
            }
            assert!(reader.buffered() <= HEADER_SIZE);
        }
        assert_eq!(numbers, vec![3, 4]);
    }

    #[test]
    fn test_read_frame_from_transport() {
        let transport = MockTransport::new();
        let frame = empty_frame(5);
        transport.inject_read(&frame[..20]);

        let mut port = transport.clone();
        let mut reader = reader();
        assert!(reader.read_frame(&mut port).unwrap().is_none());

        transport.inject_read(&frame[20..]);
        let decoded = reader.read_frame(&mut port).unwrap().unwrap();
        assert_eq!(decoded.header().frame_number, 5);
    }
}
