//! Fixed-timestep accumulator.
//!
//! Elapsed wall-clock time is banked every frame and spent in whole,
//! equally sized simulation steps. Frames longer than `max_frame_ms` are
//! cut short so that a stall does not queue up an unbounded amount of
//! catch-up work; the excess is dropped.

use crate::fmt::debug;

/// Default simulation step (~30 Hz).
pub const DEFAULT_STEP_MS: u32 = 33;
/// Default cap on the time credited for a single frame (slows the simulation below ~4 fps).
pub const DEFAULT_MAX_FRAME_MS: u32 = 250;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimestepParameters {
    /// Length of one simulation tick in milliseconds (at least 1)
    pub step_ms: u32,
    /// Maximum frame time credited to the accumulator
    pub max_frame_ms: u32,
}

impl TimestepParameters {
    pub fn new(step_ms: u32, max_frame_ms: u32) -> Self {
        Self {
            step_ms: step_ms.max(1),
            max_frame_ms,
        }
    }

    /// Change the step length
    /// (consumes and returns `Self` to be callable in a "builder-like" pattern)
    pub fn with_step_ms(self, step_ms: u32) -> Self {
        Self::new(step_ms, self.max_frame_ms)
    }

    /// Change the frame time cap
    /// (consumes and returns `Self` to be callable in a "builder-like" pattern)
    pub fn with_max_frame_ms(self, max_frame_ms: u32) -> Self {
        Self::new(self.step_ms, max_frame_ms)
    }
}

impl Default for TimestepParameters {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_MS, DEFAULT_MAX_FRAME_MS)
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct FixedTimestep {
    parameters: TimestepParameters,
    current_ms: u32,
    accumulator_ms: u32,
    elapsed_ms: u32,
}

impl FixedTimestep {
    /// Start measuring from the clock reading `now_ms`.
    pub fn new(parameters: TimestepParameters, now_ms: u32) -> Self {
        Self {
            // step_ms must be at least 1
            parameters: TimestepParameters::new(parameters.step_ms, parameters.max_frame_ms),
            current_ms: now_ms,
            accumulator_ms: 0,
            elapsed_ms: 0,
        }
    }

    /// Account for the time passed since the last call and return the number
    /// of whole steps that are now due.
    ///
    /// `now_ms` is a free-running millisecond counter; wrap-around is handled.
    pub fn advance(&mut self, now_ms: u32) -> u32 {
        let mut frame_ms = now_ms.wrapping_sub(self.current_ms);
        if frame_ms > self.parameters.max_frame_ms {
            debug!(
                "frame took {=u32} ms, simulating only {=u32} ms",
                frame_ms,
                self.parameters.max_frame_ms
            );
            frame_ms = self.parameters.max_frame_ms;
        }
        self.current_ms = now_ms;
        self.accumulator_ms = self.accumulator_ms.saturating_add(frame_ms);

        let step_ms = self.parameters.step_ms;
        let steps = self.accumulator_ms / step_ms;
        self.accumulator_ms -= steps * step_ms;
        self.elapsed_ms = self.elapsed_ms.wrapping_add(steps * step_ms);
        steps
    }

    pub fn step_ms(&self) -> u32 {
        self.parameters.step_ms
    }

    pub fn parameters(&self) -> TimestepParameters {
        self.parameters
    }

    /// Simulated time so far, in whole steps
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    /// Banked time not yet spent on a step (always less than one step)
    pub fn accumulated_ms(&self) -> u32 {
        self.accumulator_ms
    }
}

#[cfg(test)]
mod tests {
    use super::{FixedTimestep, TimestepParameters};

    #[test]
    fn test_steps_are_whole_and_remainder_is_banked() {
        let mut timestep = FixedTimestep::new(TimestepParameters::default(), 1_000);

        assert_eq!(timestep.advance(1_020), 0);
        assert_eq!(timestep.accumulated_ms(), 20);

        assert_eq!(timestep.advance(1_070), 2);
        assert_eq!(timestep.accumulated_ms(), 4);
        assert_eq!(timestep.elapsed_ms(), 66);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut timestep = FixedTimestep::new(TimestepParameters::default(), 0);

        // 250 ms credited out of 5 s: 7 steps of 33 ms, 19 ms left over
        assert_eq!(timestep.advance(5_000), 7);
        assert_eq!(timestep.accumulated_ms(), 19);
        assert_eq!(timestep.elapsed_ms(), 231);
    }

    #[test]
    fn test_clock_wrap_around() {
        let mut timestep = FixedTimestep::new(TimestepParameters::default(), u32::MAX - 10);
        assert_eq!(timestep.advance(22), 1);
        assert_eq!(timestep.accumulated_ms(), 0);
    }

    #[test]
    fn test_same_instant_runs_nothing() {
        let mut timestep = FixedTimestep::new(TimestepParameters::default(), 500);
        assert_eq!(timestep.advance(500), 0);
        assert_eq!(timestep.elapsed_ms(), 0);
    }

    #[test]
    fn test_zero_step_is_raised_to_one_ms() {
        let parameters = TimestepParameters {
            step_ms: 0,
            max_frame_ms: 10,
        };
        let mut timestep = FixedTimestep::new(parameters, 0);
        assert_eq!(timestep.step_ms(), 1);
        assert_eq!(timestep.advance(5), 5);
    }

    #[test]
    fn test_uncapped_frame_saturates_accumulator() {
        let mut timestep = FixedTimestep::new(TimestepParameters::new(33, u32::MAX), 0);
        assert_eq!(timestep.advance(20), 0);

        // clock went backwards by 10 ms: reads as a frame of u32::MAX - 9 ms
        let steps = timestep.advance(10);
        assert_eq!(steps, u32::MAX / 33);
        assert_eq!(timestep.accumulated_ms(), u32::MAX % 33);
        assert_eq!(timestep.elapsed_ms(), steps * 33);
    }

    #[test]
    fn test_builder_methods() {
        let parameters = TimestepParameters::default()
            .with_step_ms(10)
            .with_max_frame_ms(100);
        assert_eq!(parameters, TimestepParameters::new(10, 100));
    }
}
