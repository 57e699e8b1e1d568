//! The whole motion pipeline behind one owned value.
//!
//! Input is polled once per rendered frame while integration runs at a
//! fixed rate, so the two are deliberately decoupled:
//!
//! ```text
//! poll(reading)  -> solve / calibrate -> sensitivity, dead zone -> pending acceleration
//! frame(now_ms)  -> fixed timestep    -> integrator.tick(step, pending acceleration) × n
//! ```
//!
//! A typical render loop:
//!
//! ```
//! use accel_motion::{config::PipelineConfig, context::SimulationContext, vector::Vector3};
//!
//! let mut context: SimulationContext = SimulationContext::new(PipelineConfig::default(), 0);
//! for frame in 1..=10u32 {
//!     context.frame(frame * 16);
//!     context.poll(Vector3::new(0.0, 1.0, 0.0));
//!     let _offset = context.acceleration();
//! }
//! ```
//!
//! There is no locking: every mutation goes through `&mut self`, so sharing a
//! context between call sites means handing out exclusive borrows of it.

use crate::{
    calibration::{GravityCalibrator, DEFAULT_WINDOW},
    config::{AccelerationModel, PipelineConfig},
    fmt::trace,
    integrator::{KinematicState, MotionIntegrator},
    source::AccelerationSource,
    source_async::AsyncAccelerationSource,
    timestep::FixedTimestep,
    vector::Vector3,
};

/// Calibration, integration and timing state for one motion axis.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct SimulationContext<const N: usize = DEFAULT_WINDOW> {
    config: PipelineConfig,
    calibrator: GravityCalibrator<N>,
    integrator: MotionIntegrator,
    timestep: FixedTimestep,
    pending_acceleration: f32,
}

impl<const N: usize> SimulationContext<N> {
    /// Build a context at rest; `now_ms` is the current reading of the
    /// millisecond clock later passed to [`frame`](Self::frame).
    pub fn new(config: PipelineConfig, now_ms: u32) -> Self {
        let mut integrator = MotionIntegrator::new(config.policy);
        if let Some(bounds) = config.bounds {
            integrator = integrator.with_bounds(bounds);
        }
        if config.track_jerk {
            integrator = integrator.with_jerk();
        }

        Self {
            config,
            calibrator: GravityCalibrator::new(),
            integrator,
            timestep: FixedTimestep::new(config.timestep, now_ms),
            pending_acceleration: 0.0,
        }
    }

    /// Turn a raw reading (in g) into the acceleration used by the next ticks.
    pub fn poll(&mut self, reading: Vector3) -> f32 {
        let measured = match self.config.model {
            AccelerationModel::SingleAxis(axis) => axis.solve(reading),
            AccelerationModel::Calibrated(axis) => {
                self.calibrator.observe(reading).component(axis)
            }
        };
        self.pending_acceleration = self.config.condition(measured);
        self.pending_acceleration
    }

    /// Read `source` and [`poll`](Self::poll) the result.
    pub fn poll_source<S>(&mut self, source: &mut S) -> Result<f32, S::Error>
    where
        S: AccelerationSource,
    {
        let reading = source.read()?;
        Ok(self.poll(reading))
    }

    /// Async version of [`poll_source`](Self::poll_source).
    pub async fn poll_source_async<S>(&mut self, source: &mut S) -> Result<f32, S::Error>
    where
        S: AsyncAccelerationSource,
    {
        let reading = source.read().await?;
        Ok(self.poll(reading))
    }

    /// Run every simulation tick that has become due by `now_ms`, each fed
    /// with the latest polled acceleration. Returns the number of ticks run.
    pub fn frame(&mut self, now_ms: u32) -> u32 {
        let steps = self.timestep.advance(now_ms);
        let step_ms = self.timestep.step_ms();
        for _ in 0..steps {
            self.integrator.tick(step_ms, self.pending_acceleration);
        }
        if steps > 0 {
            trace!("ran {=u32} ticks, t = {=u32} ms", steps, self.timestep.elapsed_ms());
        }
        steps
    }

    /// Return the kinematic state to rest without touching calibration or timing.
    pub fn reset_motion(&mut self) {
        self.integrator.reset();
        self.pending_acceleration = 0.0;
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn calibrator(&self) -> &GravityCalibrator<N> {
        &self.calibrator
    }

    pub fn integrator(&self) -> &MotionIntegrator {
        &self.integrator
    }

    pub fn timestep(&self) -> &FixedTimestep {
        &self.timestep
    }

    pub fn state(&self) -> &KinematicState {
        self.integrator.state()
    }

    /// Acceleration measured by the last poll, not yet necessarily integrated
    pub fn pending_acceleration(&self) -> f32 {
        self.pending_acceleration
    }

    pub fn position(&self) -> f32 {
        self.integrator.position()
    }

    pub fn velocity(&self) -> f32 {
        self.integrator.velocity()
    }

    pub fn acceleration(&self) -> f32 {
        self.integrator.acceleration()
    }

    pub fn jerk(&self) -> Option<f32> {
        self.integrator.jerk()
    }
}
