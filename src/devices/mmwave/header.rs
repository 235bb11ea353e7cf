//! Frame header decoding and validation
//!
//! Header layout (40 bytes, all fields u32 little-endian):
//!
//! ```text
//! 0   magic word (8 bytes)
//! 8   version
//! 12  total packet length (header included)
//! 16  platform
//! 20  frame number
//! 24  time in CPU cycles
//! 28  number of detected objects
//! 32  number of TLVs
//! 36  sub-frame number
//! ```

use super::constants::*;
use super::sync::is_magic;
use std::fmt;

/// Decoded frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: u32,
    /// Total frame length in bytes, header included
    pub total_len: u32,
    /// Platform identifier, opaque (see [`FrameHeader::platform_hex`])
    pub platform: u32,
    pub frame_number: u32,
    pub cpu_cycles: u32,
    pub num_detected_obj: u32,
    pub num_tlv: u32,
    /// Sub-frame index, 0..=3 once validated
    pub sub_frame: u32,
}

impl FrameHeader {
    /// Read header fields from bytes starting at the magic word
    ///
    /// No validation beyond length; returns `None` if fewer than
    /// `HEADER_SIZE` bytes are given.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let bytes = bytes.get(..HEADER_SIZE)?;
        Some(Self {
            version: read_u32(bytes, OFFSET_VERSION),
            total_len: read_u32(bytes, OFFSET_TOTAL_LEN),
            platform: read_u32(bytes, OFFSET_PLATFORM),
            frame_number: read_u32(bytes, OFFSET_FRAME_NUMBER),
            cpu_cycles: read_u32(bytes, OFFSET_CPU_CYCLES),
            num_detected_obj: read_u32(bytes, OFFSET_NUM_DET_OBJ),
            num_tlv: read_u32(bytes, OFFSET_NUM_TLV),
            sub_frame: read_u32(bytes, OFFSET_SUB_FRAME),
        })
    }

    /// Platform identifier as a hex string, e.g. `a1843`
    pub fn platform_hex(&self) -> String {
        format!("{:x}", self.platform)
    }

    /// Total frame length as a byte count
    #[inline]
    pub fn frame_len(&self) -> usize {
        self.total_len as usize
    }
}

/// Why a header was rejected as corrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorruptReason {
    /// Bytes at `start + total_len` are present but are not a magic word
    MisalignedLength,
    /// Declared total length is smaller than the header itself
    LengthShorterThanHeader,
    /// Detected-object count above `MAX_DETECTED_OBJECTS`
    TooManyObjects(u32),
    /// Sub-frame index above `MAX_SUB_FRAME_INDEX`
    InvalidSubFrame(u32),
}

impl fmt::Display for CorruptReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MisalignedLength => write!(f, "declared length does not reach next magic word"),
            Self::LengthShorterThanHeader => write!(f, "declared length shorter than header"),
            Self::TooManyObjects(n) => write!(f, "invalid detected object count {}", n),
            Self::InvalidSubFrame(n) => write!(f, "invalid sub-frame index {}", n),
        }
    }
}

/// Header check failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFault {
    /// More bytes are needed before the frame can be decoded
    Incomplete,
    /// Header fields are inconsistent with the stream
    Corrupt(CorruptReason),
}

/// Decode and validate the header at `start` (the magic word offset)
///
/// Checks, in order: header bytes present, declared length sane and fully
/// buffered, next magic word aligned with the declared length (only when
/// those bytes are already buffered), then field sanity.
pub fn decode_header(buf: &[u8], start: usize) -> Result<FrameHeader, HeaderFault> {
    let Some(header) = buf.get(start..).and_then(FrameHeader::parse) else {
        return Err(HeaderFault::Incomplete);
    };

    let frame_len = header.frame_len();
    if frame_len < HEADER_SIZE {
        return Err(HeaderFault::Corrupt(CorruptReason::LengthShorterThanHeader));
    }

    let next_start = start.saturating_add(frame_len);
    if next_start > buf.len() {
        return Err(HeaderFault::Incomplete);
    }

    if next_start + MAGIC_LEN <= buf.len() && !is_magic(&buf[next_start..]) {
        return Err(HeaderFault::Corrupt(CorruptReason::MisalignedLength));
    }

    if header.num_detected_obj > MAX_DETECTED_OBJECTS {
        return Err(HeaderFault::Corrupt(CorruptReason::TooManyObjects(
            header.num_detected_obj,
        )));
    }

    if header.sub_frame > MAX_SUB_FRAME_INDEX {
        return Err(HeaderFault::Corrupt(CorruptReason::InvalidSubFrame(
            header.sub_frame,
        )));
    }

    Ok(header)
}

#[inline]
pub(crate) fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
