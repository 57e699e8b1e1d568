//! Single-axis tilt compensation.
//!
//! A resting accelerometer measures gravity alone, so the reading has unit
//! magnitude. When the device additionally accelerates along one axis only,
//! the gravity projection on that axis can be recovered from the measured
//! magnitude `M` and the axis component `c`:
//!
//! ```text
//! g_axis² = c² + g² − M²
//! ```
//!
//! which leaves two candidate accelerations `c ± g_axis`. The candidate closer
//! to zero is taken as the physical one.

use crate::vector::Vector3;

/// Standard gravity in g units.
pub const G: f32 = 1.0;

/// Axis along which motion is assumed to happen.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    /// Linear acceleration along this axis, assuming no acceleration along the others.
    pub fn solve(self, reading: Vector3) -> f32 {
        single_axis_acceleration(reading.magnitude(), reading.component(self))
    }
}

/// Returns the acceleration along an axis given the magnitude of the total
/// reading and its component along that axis.
///
/// When both roots are equally far from zero the subtracted root
/// (`axis_component - g_axis`) is returned.
pub fn single_axis_acceleration(magnitude: f32, axis_component: f32) -> f32 {
    // never negative in theory, but it can be by a hair through round-off
    let g_axis_squared =
        libm::fabsf(axis_component * axis_component + G * G - magnitude * magnitude);
    let g_axis = libm::sqrtf(g_axis_squared);

    let a1 = axis_component + g_axis;
    let a2 = axis_component - g_axis;

    if libm::fabsf(a1) < libm::fabsf(a2) {
        a1
    } else {
        a2
    }
}
