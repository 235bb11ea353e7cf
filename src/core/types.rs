//! Point types produced by the frame decoder

/// A point in 3-D space, meters
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn as_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl std::ops::Add for Point3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// One detection in the sensor's local frame
///
/// Sensor convention: x lateral, y boresight (forward), z up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DetectedPoint {
    /// Position in meters
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Radial (Doppler) velocity in m/s
    pub v: f32,
    /// Distance from the sensor origin in meters
    pub range: f32,
    /// Azimuth in degrees, positive towards +x
    pub azimuth: f32,
    /// Elevation in degrees, positive towards +z
    pub elevation: f32,
    /// Signal-to-noise ratio (0.1 dB units), 0 if the frame carried no side info
    pub snr: u16,
    /// Noise floor (0.1 dB units), 0 if the frame carried no side info
    pub noise: u16,
}

impl DetectedPoint {
    /// Build a point from raw coordinates, deriving range and angles
    pub fn from_xyzv(x: f32, y: f32, z: f32, v: f32) -> Self {
        Self {
            x,
            y,
            z,
            v,
            range: range(x, y, z),
            azimuth: azimuth_deg(x, y),
            elevation: elevation_deg(x, y, z),
            snr: 0,
            noise: 0,
        }
    }

    /// Same point with side information attached
    pub fn with_side_info(self, snr: u16, noise: u16) -> Self {
        Self { snr, noise, ..self }
    }
}

/// Euclidean distance from the origin
#[inline]
pub fn range(x: f32, y: f32, z: f32) -> f32 {
    (x * x + y * y + z * z).sqrt()
}

/// Azimuth in degrees
///
/// On the y = 0 plane the angle is pinned to +90 (x >= 0) or -90 (x < 0).
#[inline]
pub fn azimuth_deg(x: f32, y: f32) -> f32 {
    if y == 0.0 {
        if x >= 0.0 { 90.0 } else { -90.0 }
    } else {
        (x / y).atan().to_degrees()
    }
}

/// Elevation in degrees
///
/// Straight above or below the sensor (x = y = 0) the angle is pinned to
/// +90 (z >= 0) or -90 (z < 0).
#[inline]
pub fn elevation_deg(x: f32, y: f32, z: f32) -> f32 {
    if x == 0.0 && y == 0.0 {
        if z >= 0.0 { 90.0 } else { -90.0 }
    } else {
        (z / (x * x + y * y).sqrt()).atan().to_degrees()
    }
}

/// A detection mapped into the shared reference frame
///
/// Only the position is transformed; `local` carries velocity, range,
/// angles and side info through unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransformedPoint {
    /// Sensor that produced the detection
    pub sensor_id: u32,
    /// Position in the shared frame, meters
    pub position: Point3,
    /// The source detection
    pub local: DetectedPoint,
}
