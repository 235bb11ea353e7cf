//! Sensor mounting pose and the local-to-shared frame transform.
//!
//! The sensor reports detections with x lateral, y forward, z up. The shared
//! frame uses x forward, y left, z up (right-handed), so a local point
//! `(x, y, z)` is first remapped to `(y, -x, z)`, then rotated by the mounting
//! orientation and offset by the mounting position.

use super::types::{DetectedPoint, Point3, TransformedPoint};
use serde::{Deserialize, Serialize};

/// Position and orientation of a sensor in the shared frame.
///
/// Angles are in degrees. Rotation order is yaw about Z, then pitch about Y,
/// then roll about X (`R = Rz(yaw) · Ry(pitch) · Rx(roll)`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorPose {
    /// Numeric sensor identifier, copied into every transformed point
    pub id: u32,
    /// X position in meters
    pub x: f64,
    /// Y position in meters
    pub y: f64,
    /// Z position in meters (mounting height)
    pub z: f64,
    /// Yaw (psi) in degrees
    pub yaw: f64,
    /// Pitch (theta) in degrees
    pub pitch: f64,
    /// Roll (phi) in degrees
    pub roll: f64,
}

impl SensorPose {
    /// Create a new pose.
    pub fn new(id: u32, position: Point3, yaw: f64, pitch: f64, roll: f64) -> Self {
        Self {
            id,
            x: position.x,
            y: position.y,
            z: position.z,
            yaw,
            pitch,
            roll,
        }
    }

    /// Sensor at the origin with no rotation.
    pub const fn identity(id: u32) -> Self {
        Self {
            id,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
        }
    }

    /// Mounting position as a point.
    #[inline]
    pub fn position(&self) -> Point3 {
        Point3::new(self.x, self.y, self.z)
    }

    /// Rotation matrix for this pose's orientation.
    pub fn rotation(&self) -> Rotation3 {
        Rotation3::from_euler_deg(self.yaw, self.pitch, self.roll)
    }

    /// Precompute the transform for repeated use over a frame.
    pub fn transform(&self) -> PoseTransform {
        PoseTransform {
            sensor_id: self.id,
            rotation: self.rotation(),
            translation: self.position(),
        }
    }

    /// Transform a single detection into the shared frame.
    ///
    /// Prefer [`SensorPose::transform`] when mapping many points.
    pub fn transform_point(&self, point: &DetectedPoint) -> TransformedPoint {
        self.transform().apply(point)
    }
}

/// 3x3 rotation matrix, row-major.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation3 {
    m: [[f64; 3]; 3],
}

impl Rotation3 {
    /// Identity rotation.
    pub const fn identity() -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Elemental rotation about X by `phi` radians.
    pub fn about_x(phi: f64) -> Self {
        let (s, c) = phi.sin_cos();
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]],
        }
    }

    /// Elemental rotation about Y by `theta` radians.
    pub fn about_y(theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self {
            m: [[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]],
        }
    }

    /// Elemental rotation about Z by `psi` radians.
    pub fn about_z(psi: f64) -> Self {
        let (s, c) = psi.sin_cos();
        Self {
            m: [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// `Rz(yaw) · Ry(pitch) · Rx(roll)` from angles in degrees.
    pub fn from_euler_deg(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self::about_z(yaw.to_radians())
            * Self::about_y(pitch.to_radians())
            * Self::about_x(roll.to_radians())
    }

    /// Rotate a point: `self · p`.
    #[inline]
    pub fn apply(&self, p: Point3) -> Point3 {
        let v = p.as_array();
        let row = |r: &[f64; 3]| r[0] * v[0] + r[1] * v[1] + r[2] * v[2];
        Point3::new(row(&self.m[0]), row(&self.m[1]), row(&self.m[2]))
    }
}

/// Matrix product `self · rhs`.
impl std::ops::Mul for Rotation3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut m = [[0.0; 3]; 3];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.m[i][k] * rhs.m[k][j]).sum();
            }
        }
        Self { m }
    }
}

impl Default for Rotation3 {
    fn default() -> Self {
        Self::identity()
    }
}

/// Precomputed rotation + translation for one sensor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoseTransform {
    sensor_id: u32,
    rotation: Rotation3,
    translation: Point3,
}

impl PoseTransform {
    /// Map a detection into the shared frame.
    #[inline]
    pub fn apply(&self, point: &DetectedPoint) -> TransformedPoint {
        let remapped = Point3::new(point.y as f64, -(point.x as f64), point.z as f64);
        TransformedPoint {
            sensor_id: self.sensor_id,
            position: self.rotation.apply(remapped) + self.translation,
            local: *point,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_pose_remaps_axes() {
        let pose = SensorPose::identity(1);
        let point = DetectedPoint::from_xyzv(1.5, -2.25, 0.75, 0.0);
        let out = pose.transform_point(&point);

        assert_eq!(out.position, Point3::new(-2.25, -1.5, 0.75));
        assert_eq!(out.sensor_id, 1);
    }

    #[test]
    fn test_translation_only() {
        let pose = SensorPose::new(7, Point3::new(0.0, 0.0, 1.0), 0.0, 0.0, 0.0);
        let out = pose.transform_point(&DetectedPoint::from_xyzv(1.0, 2.0, 0.0, 0.0));
        assert_eq!(out.position, Point3::new(2.0, -1.0, 1.0));
    }

    #[test]
    fn test_yaw_quarter_turn() {
        // Boresight (local +y) maps to shared +x, then yaw 90 turns it to +y
        let pose = SensorPose::new(1, Point3::default(), 90.0, 0.0, 0.0);
        let out = pose.transform_point(&DetectedPoint::from_xyzv(0.0, 1.0, 0.0, 0.0));
        assert_relative_eq!(out.position.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(out.position.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(out.position.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pitch_tilts_boresight_down() {
        // Positive pitch about Y rotates +x towards -z
        let pose = SensorPose::new(1, Point3::default(), 0.0, 30.0, 0.0);
        let out = pose.transform_point(&DetectedPoint::from_xyzv(0.0, 2.0, 0.0, 0.0));
        assert_relative_eq!(out.position.x, 2.0 * 30f64.to_radians().cos(), epsilon = 1e-9);
        assert_relative_eq!(out.position.z, -2.0 * 30f64.to_radians().sin(), epsilon = 1e-9);
    }

    #[test]
    fn test_rotation_order() {
        // Columns of Rz(yaw) * Ry(pitch) * Rx(roll) against their closed form
        let (yaw, pitch, roll) = (30f64.to_radians(), 20f64.to_radians(), 10f64.to_radians());
        let r = Rotation3::from_euler_deg(30.0, 20.0, 10.0);
        let col_x = r.apply(Point3::new(1.0, 0.0, 0.0));
        let col_y = r.apply(Point3::new(0.0, 1.0, 0.0));
        let col_z = r.apply(Point3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(col_x.x, yaw.cos() * pitch.cos(), epsilon = 1e-12);
        assert_relative_eq!(col_x.y, yaw.sin() * pitch.cos(), epsilon = 1e-12);
        assert_relative_eq!(col_x.z, -pitch.sin(), epsilon = 1e-12);
        assert_relative_eq!(col_y.z, pitch.cos() * roll.sin(), epsilon = 1e-12);
        assert_relative_eq!(col_z.z, pitch.cos() * roll.cos(), epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_preserves_length() {
        let r = Rotation3::from_euler_deg(-45.0, 12.5, 170.0);
        let p = r.apply(Point3::new(1.0, 2.0, 3.0));
        let len = (p.x * p.x + p.y * p.y + p.z * p.z).sqrt();
        assert_relative_eq!(len, 14f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_non_position_fields_pass_through() {
        let pose = SensorPose::new(3, Point3::new(1.0, 2.0, 3.0), 45.0, 10.0, 5.0);
        let point = DetectedPoint::from_xyzv(0.5, 4.0, -0.2, 1.25).with_side_info(200, 30);
        let out = pose.transform_point(&point);
        assert_eq!(out.local, point);
    }
}
