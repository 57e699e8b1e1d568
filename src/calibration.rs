//! Running gravity estimate.
//!
//! Readings whose magnitude is close to 1 g are taken as "at rest" and fed
//! into a sliding window; the mean of that window is the current estimate of
//! the gravity vector. Every other reading is assumed to carry real motion
//! and is reported with the estimate subtracted.

use crate::{
    fmt::{debug, trace},
    history::HistoryBuffer,
    vector::Vector3,
};

/// Number of at-rest readings averaged into the gravity estimate by default.
pub const DEFAULT_WINDOW: usize = 32;

/// Distance from 1 g (inclusive) within which a reading counts as at rest.
pub const REST_TOLERANCE: f32 = 0.05;

/// Sliding-window gravity calibrator over the last `N` at-rest readings.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct GravityCalibrator<const N: usize = DEFAULT_WINDOW> {
    history: HistoryBuffer<Vector3, N>,
    estimate: Vector3,
    tolerance: f32,
    admitted: u32,
}

impl<const N: usize> GravityCalibrator<N> {
    pub fn new() -> Self {
        Self {
            history: HistoryBuffer::new(),
            estimate: Vector3::zero(),
            tolerance: REST_TOLERANCE,
            admitted: 0,
        }
    }

    /// Change the at-rest tolerance
    /// (consumes and returns `Self` to be callable in a "builder-like" pattern)
    pub fn with_tolerance(self, tolerance: f32) -> Self {
        Self { tolerance, ..self }
    }

    /// Feed a raw reading and get back the acceleration with gravity removed.
    ///
    /// At-rest readings update the estimate and report zero acceleration.
    pub fn observe(&mut self, reading: Vector3) -> Vector3 {
        if self.is_at_rest(&reading) {
            let evicted = self.history.push(reading);
            self.estimate += (reading - evicted) / N as f32;
            self.admitted = self.admitted.saturating_add(1);

            if self.admitted == N as u32 {
                debug!("gravity calibration window filled ({=usize} readings)", N);
            }
            trace!(
                "gravity estimate: [{=f32} {=f32} {=f32}]",
                self.estimate.x,
                self.estimate.y,
                self.estimate.z
            );

            Vector3::zero()
        } else {
            reading - self.estimate
        }
    }

    /// Check if the reading magnitude lies within the tolerance band around 1 g
    pub fn is_at_rest(&self, reading: &Vector3) -> bool {
        let magnitude = reading.magnitude();
        magnitude >= 1.0 - self.tolerance && magnitude <= 1.0 + self.tolerance
    }

    /// Current gravity estimate
    pub fn estimate(&self) -> Vector3 {
        self.estimate
    }

    /// Number of readings admitted so far (saturates at `u32::MAX`)
    pub fn admitted(&self) -> u32 {
        self.admitted
    }

    /// Whether a whole window of at-rest readings has been seen, i.e. the
    /// estimate no longer includes the zero-valued warm-up slots
    pub fn is_warmed_up(&self) -> bool {
        self.admitted as usize >= N
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    pub const fn window(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for GravityCalibrator<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::GravityCalibrator;
    use crate::vector::Vector3;

    const UP: Vector3 = Vector3::new(0.0, 1.0, 0.0);

    #[test]
    fn test_converges_after_full_window() {
        let mut calibrator: GravityCalibrator<8> = GravityCalibrator::new();

        for _ in 0..8 {
            assert_eq!(calibrator.observe(UP), Vector3::zero());
        }

        assert!(calibrator.is_warmed_up());
        assert_eq!(calibrator.estimate(), UP);
        assert_eq!(calibrator.observe(UP), Vector3::zero());
        assert_eq!(calibrator.estimate(), UP);
    }

    #[test]
    fn test_warm_up_averages_against_zero_slots() {
        let mut calibrator: GravityCalibrator<4> = GravityCalibrator::new();

        calibrator.observe(UP);
        assert_eq!(calibrator.estimate(), Vector3::new(0.0, 0.25, 0.0));
        assert!(!calibrator.is_warmed_up());

        calibrator.observe(UP);
        assert_eq!(calibrator.estimate(), Vector3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn test_moving_reading_leaves_estimate_untouched() {
        let mut calibrator: GravityCalibrator<4> = GravityCalibrator::new();
        for _ in 0..4 {
            calibrator.observe(UP);
        }

        let moving = Vector3::new(0.0, 2.0, 0.0);
        assert_eq!(calibrator.observe(moving), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(calibrator.estimate(), UP);
        assert_eq!(calibrator.admitted(), 4);
    }

    #[test]
    fn test_moving_reading_before_calibration_is_passed_through() {
        let mut calibrator: GravityCalibrator<4> = GravityCalibrator::new();
        let moving = Vector3::new(0.3, 1.5, -0.2);
        assert_eq!(calibrator.observe(moving), moving);
    }

    #[test]
    fn test_window_slides_to_newer_readings() {
        let mut calibrator: GravityCalibrator<2> = GravityCalibrator::new();
        let tilted = Vector3::new(1.0, 0.0, 0.0);

        calibrator.observe(UP);
        calibrator.observe(UP);
        calibrator.observe(tilted);
        assert_eq!(calibrator.estimate(), Vector3::new(0.5, 0.5, 0.0));

        calibrator.observe(tilted);
        assert_eq!(calibrator.estimate(), tilted);
    }

    #[test]
    fn test_rest_band_is_inclusive() {
        let calibrator: GravityCalibrator<4> = GravityCalibrator::new();
        assert!(calibrator.is_at_rest(&Vector3::new(0.0, 1.04, 0.0)));
        assert!(calibrator.is_at_rest(&Vector3::new(0.0, 0.96, 0.0)));
        assert!(!calibrator.is_at_rest(&Vector3::new(0.0, 1.06, 0.0)));
        assert!(!calibrator.is_at_rest(&Vector3::new(0.0, 0.94, 0.0)));
        assert!(!calibrator.is_at_rest(&Vector3::zero()));
    }

    #[test]
    fn test_custom_tolerance() {
        let calibrator: GravityCalibrator<4> = GravityCalibrator::new().with_tolerance(0.2);
        assert_eq!(calibrator.tolerance(), 0.2);
        assert!(calibrator.is_at_rest(&Vector3::new(0.0, 1.15, 0.0)));
    }
}
