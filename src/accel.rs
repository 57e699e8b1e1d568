use crate::vector::Vector3;

/// Divisor that maps a signed 16-bit sample onto [-1.0, 1.0) g.
pub const RAW_FULL_SCALE: f32 = 32768.0;

/// Raw acceleration sample as delivered by the hardware (signed 16-bit per axis).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawAccel {
    pub(crate) x: i16,
    pub(crate) y: i16,
    pub(crate) z: i16,
}

impl RawAccel {
    pub fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Decode big-endian X, Y, Z register pairs.
    pub fn from_bytes(data: [u8; 6]) -> Self {
        Self {
            x: i16::from_be_bytes([data[0], data[1]]),
            y: i16::from_be_bytes([data[2], data[3]]),
            z: i16::from_be_bytes([data[4], data[5]]),
        }
    }

    pub fn x(&self) -> i16 {
        self.x
    }

    pub fn y(&self) -> i16 {
        self.y
    }

    pub fn z(&self) -> i16 {
        self.z
    }

    /// Reading in g units.
    pub fn normalized(&self) -> Vector3 {
        Vector3::new(
            normalize(self.x),
            normalize(self.y),
            normalize(self.z),
        )
    }
}

fn normalize(value: i16) -> f32 {
    (value as f32) / RAW_FULL_SCALE
}
