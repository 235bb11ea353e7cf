//! mmWave radar demo output protocol
//!
//! Frame format: [MAGIC (8)] [HEADER FIELDS (32)] [TLV]...
//!
//! - `buffer`: accumulating byte buffer
//! - `sync`: magic word search
//! - `header`: header decode and validation
//! - `tlv`: TLV iteration and point/side-info payloads
//! - `decoder`: one-shot decode of the first frame in a byte slice
//! - `reader`: stream reader applying buffer and resync policy

pub mod buffer;
pub mod constants;
pub mod decoder;
pub mod header;
pub mod reader;
pub mod sync;
pub mod tlv;

pub use buffer::StreamBuffer;
pub use decoder::{DecodeResult, DecodeStatus, Frame, FrameDecoder, decode_frame};
pub use header::{CorruptReason, FrameHeader};
pub use reader::{FrameReader, ReaderStats};
pub use sync::find_magic;
pub use tlv::{SkippedTlv, TlvType};
