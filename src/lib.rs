//! TarangIO - Frame decoder for mmWave radar sensor streams
//!
//! This library reconstructs frames from the raw byte stream of an FMCW
//! radar running the mmWave SDK demo, decodes the detected-object TLVs and
//! maps each detection into a shared reference frame using the sensor's
//! mounting pose.
//!
//! ```no_run
//! use tarang_io::{FrameReader, SensorPose};
//! use tarang_io::config::ReaderConfig;
//!
//! let pose = SensorPose::identity(1);
//! let mut reader = FrameReader::new(&pose, ReaderConfig::default());
//! reader.push(&[/* bytes from the sensor */]);
//! while let Some(frame) = reader.next_frame() {
//!     for (local, global) in frame.iter() {
//!         println!("{:.2} m -> {:?}", local.range, global.position);
//!     }
//! }
//! ```

pub mod config;
pub mod core;
pub mod devices;
pub mod error;
pub mod transport;

// Re-export commonly used types
pub use config::AppConfig;
pub use crate::core::{DetectedPoint, Point3, SensorPose, TransformedPoint};
pub use devices::mmwave::{
    DecodeResult, DecodeStatus, Frame, FrameDecoder, FrameReader, ReaderStats, decode_frame,
};
pub use error::{Error, Result};
