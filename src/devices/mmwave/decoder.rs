//! Single-shot frame decoder
//!
//! One call looks at a snapshot of buffered bytes and decodes at most one
//! frame:
//!
//! ```text
//! SEARCHING --magic found--> HEADER_CHECK --valid--> TLV_DECODE --> COMPLETE
//!     |                          |
//!     +--> NOT_FOUND             +--> INCOMPLETE | CORRUPT
//! ```
//!
//! The decoder keeps no state between calls and never consumes bytes; the
//! caller trims its buffer by [`DecodeResult::consumed`] on success and picks
//! a resync strategy on [`DecodeStatus::Corrupt`].

use super::constants::HEADER_SIZE;
use super::header::{CorruptReason, FrameHeader, HeaderFault, decode_header};
use super::sync::find_magic;
use super::tlv::{SkippedTlv, TlvIter, TlvType, decode_points, decode_side_info};
use crate::core::pose::{PoseTransform, SensorPose};
use crate::core::types::{DetectedPoint, TransformedPoint};
use std::time::SystemTime;

/// Outcome of one decode call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// A full frame was decoded
    Complete,
    /// Magic word found but the frame is not fully buffered yet
    Incomplete,
    /// Magic word found but the header is inconsistent
    Corrupt(CorruptReason),
    /// No magic word in the buffer
    NotFound,
}

/// A decoded frame
///
/// `points()`, `transformed()`, `snr()` and `noise()` are index-aligned:
/// entry `i` of each belongs to the `i`-th detection of the points TLV.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    header: FrameHeader,
    received_at: SystemTime,
    points: Vec<DetectedPoint>,
    transformed: Vec<TransformedPoint>,
    side_info: Vec<(u16, u16)>,
    skipped: Vec<SkippedTlv>,
}

impl Frame {
    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    /// Host clock reading taken when the frame completed decoding
    pub fn received_at(&self) -> SystemTime {
        self.received_at
    }

    /// Detections in the sensor frame, side info attached
    pub fn points(&self) -> &[DetectedPoint] {
        &self.points
    }

    /// Detections in the shared frame
    pub fn transformed(&self) -> &[TransformedPoint] {
        &self.transformed
    }

    /// Per-object SNR, `num_detected_obj` entries, zero-filled without side info
    pub fn snr(&self) -> Vec<u16> {
        self.side_info.iter().map(|&(snr, _)| snr).collect()
    }

    /// Per-object noise floor, `num_detected_obj` entries, zero-filled without side info
    pub fn noise(&self) -> Vec<u16> {
        self.side_info.iter().map(|&(_, noise)| noise).collect()
    }

    /// TLV records that were present but not interpreted
    pub fn skipped_tlvs(&self) -> &[SkippedTlv] {
        &self.skipped
    }

    /// Number of decoded detections
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Local and shared-frame view of each detection, in detection order
    pub fn iter(&self) -> impl Iterator<Item = (&DetectedPoint, &TransformedPoint)> {
        self.points.iter().zip(self.transformed.iter())
    }
}

/// Result of one decode call
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeResult {
    pub status: DecodeStatus,
    /// Offset of the magic word, `None` when not found
    pub header_start: Option<usize>,
    /// Raw header fields, present whenever the 40 header bytes were buffered
    pub header: Option<FrameHeader>,
    /// Decoded frame, present only on `Complete`
    pub frame: Option<Frame>,
}

impl DecodeResult {
    fn not_found() -> Self {
        Self {
            status: DecodeStatus::NotFound,
            header_start: None,
            header: None,
            frame: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == DecodeStatus::Complete
    }

    /// Bytes to drop from the front of the buffer after a complete frame
    pub fn consumed(&self) -> Option<usize> {
        match (self.status, self.header_start, self.header) {
            (DecodeStatus::Complete, Some(start), Some(header)) => Some(start + header.frame_len()),
            _ => None,
        }
    }

    pub fn total_len(&self) -> Option<u32> {
        self.header.map(|h| h.total_len)
    }

    pub fn num_detected_obj(&self) -> Option<u32> {
        self.header.map(|h| h.num_detected_obj)
    }

    pub fn num_tlv(&self) -> Option<u32> {
        self.header.map(|h| h.num_tlv)
    }

    pub fn sub_frame(&self) -> Option<u32> {
        self.header.map(|h| h.sub_frame)
    }
}

/// Frame decoder bound to one sensor pose
///
/// Holds only the precomputed pose transform; all stream state lives in the
/// caller's buffer.
#[derive(Debug, Clone, Copy)]
pub struct FrameDecoder {
    transform: PoseTransform,
}

impl FrameDecoder {
    pub fn new(pose: &SensorPose) -> Self {
        Self {
            transform: pose.transform(),
        }
    }

    /// Decode the first frame found in `buf`
    pub fn decode(&self, buf: &[u8]) -> DecodeResult {
        let Some(start) = find_magic(buf) else {
            return DecodeResult::not_found();
        };

        let raw_header = FrameHeader::parse(&buf[start..]);

        let header = match decode_header(buf, start) {
            Ok(header) => header,
            Err(HeaderFault::Incomplete) => {
                return DecodeResult {
                    status: DecodeStatus::Incomplete,
                    header_start: Some(start),
                    header: raw_header,
                    frame: None,
                };
            }
            Err(HeaderFault::Corrupt(reason)) => {
                log::debug!("Corrupt frame header at offset {}: {}", start, reason);
                return DecodeResult {
                    status: DecodeStatus::Corrupt(reason),
                    header_start: Some(start),
                    header: raw_header,
                    frame: None,
                };
            }
        };

        let body = &buf[start + HEADER_SIZE..start + header.frame_len()];
        let frame = self.decode_body(header, body);

        DecodeResult {
            status: DecodeStatus::Complete,
            header_start: Some(start),
            header: Some(header),
            frame: Some(frame),
        }
    }

    fn decode_body(&self, header: FrameHeader, body: &[u8]) -> Frame {
        let count = header.num_detected_obj as usize;
        let mut points = Vec::new();
        let mut side_info = Vec::new();
        let mut skipped = Vec::new();

        for tlv in TlvIter::new(body, header.num_tlv) {
            log::trace!(
                "Frame {}: TLV {:?}, {} bytes",
                header.frame_number,
                tlv.tlv_type,
                tlv.length
            );

            match tlv.tlv_type {
                TlvType::DetectedPoints if tlv.length < header.total_len => {
                    points = decode_points(tlv.payload, count);
                }
                TlvType::DetectedPointsSideInfo => {
                    side_info = decode_side_info(tlv.payload, count);
                }
                other => skipped.push(SkippedTlv {
                    tlv_type: other,
                    length: tlv.length,
                }),
            }
        }

        if points.len() < count {
            log::debug!(
                "Frame {}: header declares {} objects, decoded {}",
                header.frame_number,
                count,
                points.len()
            );
        }

        side_info.resize(count, (0, 0));
        for (point, &(snr, noise)) in points.iter_mut().zip(&side_info) {
            *point = point.with_side_info(snr, noise);
        }

        let transformed = points.iter().map(|p| self.transform.apply(p)).collect();

        Frame {
            header,
            received_at: SystemTime::now(),
            points,
            transformed,
            side_info,
            skipped,
        }
    }
}

/// Decode the first frame in `buf` using `pose` for the transform
pub fn decode_frame(buf: &[u8], pose: &SensorPose) -> DecodeResult {
    FrameDecoder::new(pose).decode(buf)
}
