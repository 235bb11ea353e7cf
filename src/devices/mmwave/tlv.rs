//! TLV (type-length-value) decoding for mmWave frame bodies
//!
//! TLV format: [TYPE u32 LE] [LENGTH u32 LE] [PAYLOAD (LENGTH bytes)]
//!
//! Records follow the frame header back to back. The iterator dispatches on
//! type, so the order of records inside a frame does not matter, and types
//! this crate does not interpret are stepped over using their length field.

use super::constants::{POINT_RECORD_SIZE, SIDE_INFO_RECORD_SIZE, TLV_HEADER_SIZE};
use super::header::read_u32;
use crate::core::types::DetectedPoint;

/// TLV type identifiers emitted by the mmWave SDK out-of-box demo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TlvType {
    DetectedPoints,
    RangeProfile,
    NoiseProfile,
    AzimuthStaticHeatMap,
    RangeDopplerHeatMap,
    Stats,
    DetectedPointsSideInfo,
    AzimuthElevationStaticHeatMap,
    TemperatureStats,
    Unknown(u32),
}

impl From<u32> for TlvType {
    fn from(value: u32) -> Self {
        match value {
            1 => TlvType::DetectedPoints,
            2 => TlvType::RangeProfile,
            3 => TlvType::NoiseProfile,
            4 => TlvType::AzimuthStaticHeatMap,
            5 => TlvType::RangeDopplerHeatMap,
            6 => TlvType::Stats,
            7 => TlvType::DetectedPointsSideInfo,
            8 => TlvType::AzimuthElevationStaticHeatMap,
            9 => TlvType::TemperatureStats,
            other => TlvType::Unknown(other),
        }
    }
}

impl From<TlvType> for u32 {
    fn from(value: TlvType) -> Self {
        match value {
            TlvType::DetectedPoints => 1,
            TlvType::RangeProfile => 2,
            TlvType::NoiseProfile => 3,
            TlvType::AzimuthStaticHeatMap => 4,
            TlvType::RangeDopplerHeatMap => 5,
            TlvType::Stats => 6,
            TlvType::DetectedPointsSideInfo => 7,
            TlvType::AzimuthElevationStaticHeatMap => 8,
            TlvType::TemperatureStats => 9,
            TlvType::Unknown(other) => other,
        }
    }
}

/// Borrowed view of one TLV record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tlv<'a> {
    pub tlv_type: TlvType,
    /// Declared payload length in bytes
    pub length: u32,
    pub payload: &'a [u8],
}

/// Summary of a record the decoder stepped over without interpreting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedTlv {
    pub tlv_type: TlvType,
    pub length: u32,
}

/// Iterator over the TLV records of one frame body
///
/// Stops after `count` records, or earlier when the next record header or
/// payload would run past the end of `body`.
pub struct TlvIter<'a> {
    body: &'a [u8],
    pos: usize,
    remaining: u32,
}

impl<'a> TlvIter<'a> {
    /// `body` is the frame without its header, `count` the header's TLV count
    pub fn new(body: &'a [u8], count: u32) -> Self {
        Self {
            body,
            pos: 0,
            remaining: count,
        }
    }
}

impl<'a> Iterator for TlvIter<'a> {
    type Item = Tlv<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let header = self.body.get(self.pos..self.pos + TLV_HEADER_SIZE)?;
        let tlv_type = TlvType::from(read_u32(header, 0));
        let length = read_u32(header, 4);

        let start = self.pos + TLV_HEADER_SIZE;
        let Some(payload) = start
            .checked_add(length as usize)
            .and_then(|end| self.body.get(start..end))
        else {
            log::debug!(
                "TLV {:?} declares {} bytes but only {} remain in frame",
                tlv_type,
                length,
                self.body.len().saturating_sub(start)
            );
            self.remaining = 0;
            return None;
        };

        self.pos = start + payload.len();
        self.remaining -= 1;
        Some(Tlv {
            tlv_type,
            length,
            payload,
        })
    }
}

/// Decode up to `count` point records `(x, y, z, v)` from a type-1 payload
///
/// Only whole records inside the payload are read.
pub fn decode_points(payload: &[u8], count: usize) -> Vec<DetectedPoint> {
    payload
        .chunks_exact(POINT_RECORD_SIZE)
        .take(count)
        .map(|rec| {
            DetectedPoint::from_xyzv(
                read_f32(rec, 0),
                read_f32(rec, 4),
                read_f32(rec, 8),
                read_f32(rec, 12),
            )
        })
        .collect()
}

/// Decode up to `count` side-info records `(snr, noise)` from a type-7 payload
pub fn decode_side_info(payload: &[u8], count: usize) -> Vec<(u16, u16)> {
    payload
        .chunks_exact(SIDE_INFO_RECORD_SIZE)
        .take(count)
        .map(|rec| {
            (
                u16::from_le_bytes([rec[0], rec[1]]),
                u16::from_le_bytes([rec[2], rec[3]]),
            )
        })
        .collect()
}

#[inline]
fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    f32::from_bits(read_u32(bytes, offset))
}
