//! Core domain types: detections and sensor pose

pub mod pose;
pub mod types;

pub use pose::{PoseTransform, Rotation3, SensorPose};
pub use types::{DetectedPoint, Point3, TransformedPoint};
