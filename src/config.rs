//! Pipeline configuration
//!
//! Selects how a raw reading becomes a scalar acceleration and how that
//! acceleration is integrated:
//! - acceleration model (tilt compensation alone, or against a calibrated gravity vector)
//! - integration policy, travel limits and jerk tracking
//! - input conditioning (sensitivity, dead zone)
//! - simulation step timing

use crate::{
    integrator::{Bounds, IntegrationPolicy},
    solver::Axis,
    timestep::TimestepParameters,
};

/// Accelerations at or below this magnitude are treated as noise by default.
pub const DEFAULT_DEAD_ZONE: f32 = 0.05;

/// How the scalar acceleration is extracted from a raw reading.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccelerationModel {
    /// Tilt compensation on the given axis, assuming motion along it only
    SingleAxis(Axis),
    /// Subtract the running gravity estimate and keep the given axis
    Calibrated(Axis),
}

impl AccelerationModel {
    pub fn axis(self) -> Axis {
        match self {
            Self::SingleAxis(axis) | Self::Calibrated(axis) => axis,
        }
    }
}

impl Default for AccelerationModel {
    fn default() -> Self {
        Self::SingleAxis(Axis::Y)
    }
}

/// Everything a [`SimulationContext`](crate::context::SimulationContext) needs
/// to know up front.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipelineConfig {
    pub model: AccelerationModel,
    pub policy: IntegrationPolicy,
    pub bounds: Option<Bounds>,
    pub track_jerk: bool,
    /// Constant multiplier applied to every measured acceleration
    pub sensitivity: f32,
    /// Measured accelerations with `|a| <= dead_zone` are reported as zero
    pub dead_zone: Option<f32>,
    pub timestep: TimestepParameters,
}

impl PipelineConfig {
    /// Change the acceleration model
    /// (consumes and returns `Self` to be callable in a "builder-like" pattern)
    pub fn with_model(self, model: AccelerationModel) -> Self {
        Self { model, ..self }
    }

    /// Change the integration policy
    /// (consumes and returns `Self` to be callable in a "builder-like" pattern)
    pub fn with_policy(self, policy: IntegrationPolicy) -> Self {
        Self { policy, ..self }
    }

    /// Constrain the position
    /// (consumes and returns `Self` to be callable in a "builder-like" pattern)
    pub fn with_bounds(self, bounds: Bounds) -> Self {
        Self {
            bounds: Some(bounds),
            ..self
        }
    }

    /// Enable or disable jerk tracking
    /// (consumes and returns `Self` to be callable in a "builder-like" pattern)
    pub fn with_jerk(self, track_jerk: bool) -> Self {
        Self { track_jerk, ..self }
    }

    /// Change the sensitivity multiplier
    /// (consumes and returns `Self` to be callable in a "builder-like" pattern)
    pub fn with_sensitivity(self, sensitivity: f32) -> Self {
        Self {
            sensitivity,
            ..self
        }
    }

    /// Change (or disable, with `None`) the dead zone
    /// (consumes and returns `Self` to be callable in a "builder-like" pattern)
    pub fn with_dead_zone(self, dead_zone: Option<f32>) -> Self {
        Self { dead_zone, ..self }
    }

    /// Change the simulation step timing
    /// (consumes and returns `Self` to be callable in a "builder-like" pattern)
    pub fn with_timestep(self, timestep: TimestepParameters) -> Self {
        Self { timestep, ..self }
    }

    /// Apply sensitivity and dead zone to a measured acceleration.
    pub fn condition(&self, acceleration: f32) -> f32 {
        let scaled = acceleration * self.sensitivity;
        match self.dead_zone {
            Some(dead_zone) if libm::fabsf(scaled) <= dead_zone => 0.0,
            _ => scaled,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: AccelerationModel::default(),
            policy: IntegrationPolicy::default(),
            bounds: None,
            track_jerk: false,
            sensitivity: 1.0,
            dead_zone: Some(DEFAULT_DEAD_ZONE),
            timestep: TimestepParameters::default(),
        }
    }
}
