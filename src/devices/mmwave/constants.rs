//! Constants for the mmWave demo output protocol

/// Frame start marker (magic word), raw byte order on the wire
pub const MAGIC_WORD: [u8; 8] = [2, 1, 4, 3, 6, 5, 8, 7];
pub const MAGIC_LEN: usize = MAGIC_WORD.len();

// Header layout (offsets relative to the marker)
pub const HEADER_SIZE: usize = 40;
pub const OFFSET_VERSION: usize = 8;
pub const OFFSET_TOTAL_LEN: usize = 12;
pub const OFFSET_PLATFORM: usize = 16;
pub const OFFSET_FRAME_NUMBER: usize = 20;
pub const OFFSET_CPU_CYCLES: usize = 24;
pub const OFFSET_NUM_DET_OBJ: usize = 28;
pub const OFFSET_NUM_TLV: usize = 32;
pub const OFFSET_SUB_FRAME: usize = 36;

// TLV layout
pub const TLV_HEADER_SIZE: usize = 8; // type(4) + length(4)
pub const POINT_RECORD_SIZE: usize = 16; // x, y, z, v as f32
pub const SIDE_INFO_RECORD_SIZE: usize = 4; // snr, noise as u16

// Sanity limits
pub const MAX_SUB_FRAME_INDEX: u32 = 3;
pub const MAX_DETECTED_OBJECTS: u32 = 1024; // Well above any demo profile's point cap

// Reader buffer policy defaults
pub const DEFAULT_MAX_BUFFER_BYTES: usize = 10_000;
pub const DEFAULT_KEEP_TAIL_BYTES: usize = 5_000;
pub const READ_CHUNK_SIZE: usize = 4096;
