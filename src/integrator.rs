//! Fixed-step kinematic integration.
//!
//! The integrator owns a [`KinematicState`] and advances it once per
//! simulation tick from an externally measured acceleration sample. Three
//! update rules are available through [`IntegrationPolicy`]; all of them
//! work in seconds, while ticks are requested in whole milliseconds.

use crate::fmt::trace;

/// Milliseconds to seconds.
const MS_TO_S: f32 = 0.001;

/// Position, velocity and acceleration along the motion axis.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KinematicState {
    pub position: f32,
    pub velocity: f32,
    /// Always the last sample fed to the integrator (or zero after a stop at a bound)
    pub acceleration: f32,
    /// Finite-difference rate of change of acceleration over the last tick,
    /// `None` when jerk is not tracked
    pub jerk: Option<f32>,
}

/// Update rule applied on every tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntegrationPolicy {
    /// Acceleration is assigned, velocity follows with explicit Euler
    /// (`v += a·dt`) and position with the freshly updated velocity
    /// (`x += v·dt`).
    DirectAssignment,
    /// Closed-form constant-acceleration step:
    /// `x += v·dt + ½·a·dt²`, `v += a·dt`.
    Newtonian,
    /// Classical four-stage Runge-Kutta on `dx/dt = v`, `dv/dt = a`, with `a`
    /// held at the supplied sample for every stage.
    #[default]
    RungeKutta4,
}

/// Travel limits for the position. Hitting either one stops the motion dead.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min: f32,
    pub max: f32,
}

impl Bounds {
    /// Build bounds from two limits given in any order.
    pub fn new(a: f32, b: f32) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Clamp the state into range, zeroing velocity and acceleration on contact.
    /// Returns `true` if a limit was hit.
    fn apply(&self, state: &mut KinematicState) -> bool {
        let limit = if state.position < self.min {
            self.min
        } else if state.position > self.max {
            self.max
        } else {
            return false;
        };

        state.position = limit;
        state.velocity = 0.0;
        state.acceleration = 0.0;
        true
    }
}

/// Time derivative of (position, velocity) at one RK4 stage.
#[derive(Copy, Clone, Default)]
struct Derivative {
    dx: f32,
    dv: f32,
}

/// Derivative after stepping `dt` along `d` from the initial velocity.
/// The position offset is not needed since `dv/dt` does not depend on it.
fn evaluate(velocity: f32, acceleration: f32, d: Derivative, dt: f32) -> Derivative {
    Derivative {
        dx: velocity + d.dv * dt,
        dv: acceleration,
    }
}

fn runge_kutta4(position: f32, velocity: f32, acceleration: f32, dt: f32) -> (f32, f32) {
    let a = evaluate(velocity, acceleration, Derivative::default(), 0.0);
    let b = evaluate(velocity, acceleration, a, dt * 0.5);
    let c = evaluate(velocity, acceleration, b, dt * 0.5);
    let d = evaluate(velocity, acceleration, c, dt);

    let dxdt = 1.0 / 6.0 * (a.dx + 2.0 * (b.dx + c.dx) + d.dx);
    let dvdt = 1.0 / 6.0 * (a.dv + 2.0 * (b.dv + c.dv) + d.dv);

    (position + dxdt * dt, velocity + dvdt * dt)
}

/// Kinematic state plus the rules used to advance it.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct MotionIntegrator {
    policy: IntegrationPolicy,
    bounds: Option<Bounds>,
    state: KinematicState,
}

impl MotionIntegrator {
    /// New integrator at rest at the origin.
    pub fn new(policy: IntegrationPolicy) -> Self {
        Self {
            policy,
            bounds: None,
            state: KinematicState::default(),
        }
    }

    /// Constrain the position to `bounds`
    /// (consumes and returns `Self` to be callable in a "builder-like" pattern)
    pub fn with_bounds(self, bounds: Bounds) -> Self {
        Self {
            bounds: Some(bounds),
            ..self
        }
    }

    /// Track jerk alongside the other quantities
    /// (consumes and returns `Self` to be callable in a "builder-like" pattern)
    pub fn with_jerk(mut self) -> Self {
        self.state.jerk = Some(self.state.jerk.unwrap_or(0.0));
        self
    }

    /// Advance the state by `dt_ms` milliseconds given a new acceleration sample.
    ///
    /// A zero-length tick leaves the state untouched.
    pub fn tick(&mut self, dt_ms: u32, acceleration: f32) {
        if dt_ms == 0 {
            return;
        }
        let dt = MS_TO_S * dt_ms as f32;
        let state = &mut self.state;

        if let Some(jerk) = state.jerk.as_mut() {
            *jerk = (acceleration - state.acceleration) / dt;
        }

        match self.policy {
            IntegrationPolicy::DirectAssignment => {
                state.acceleration = acceleration;
                state.velocity += state.acceleration * dt;
                state.position += state.velocity * dt;
            }
            IntegrationPolicy::Newtonian => {
                state.position += state.velocity * dt + 0.5 * acceleration * dt * dt;
                state.velocity += acceleration * dt;
                state.acceleration = acceleration;
            }
            IntegrationPolicy::RungeKutta4 => {
                let (position, velocity) =
                    runge_kutta4(state.position, state.velocity, acceleration, dt);
                state.position = position;
                state.velocity = velocity;
                state.acceleration = acceleration;
            }
        }

        if let Some(bounds) = self.bounds {
            if bounds.apply(state) {
                trace!("stopped at bound {=f32}", state.position);
            }
        }

        trace!(
            "X: {=f32}, V: {=f32}, A: {=f32}, J: {=?}",
            state.position,
            state.velocity,
            state.acceleration,
            state.jerk
        );
    }

    /// Back to rest at the origin (jerk tracking is kept as configured).
    pub fn reset(&mut self) {
        let tracks_jerk = self.state.jerk.is_some();
        self.state = KinematicState {
            jerk: tracks_jerk.then_some(0.0),
            ..KinematicState::default()
        };
    }

    pub fn state(&self) -> &KinematicState {
        &self.state
    }

    pub fn policy(&self) -> IntegrationPolicy {
        self.policy
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn position(&self) -> f32 {
        self.state.position
    }

    pub fn velocity(&self) -> f32 {
        self.state.velocity
    }

    pub fn acceleration(&self) -> f32 {
        self.state.acceleration
    }

    /// Jerk over the last tick, if tracked
    pub fn jerk(&self) -> Option<f32> {
        self.state.jerk
    }
}

impl Default for MotionIntegrator {
    fn default() -> Self {
        Self::new(IntegrationPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{Bounds, IntegrationPolicy, KinematicState, MotionIntegrator};

    const EPSILON: f32 = 1e-5;

    const ALL_POLICIES: [IntegrationPolicy; 3] = [
        IntegrationPolicy::DirectAssignment,
        IntegrationPolicy::Newtonian,
        IntegrationPolicy::RungeKutta4,
    ];

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_rk4_constant_acceleration_matches_closed_form() {
        let mut integrator = MotionIntegrator::new(IntegrationPolicy::RungeKutta4);
        integrator.tick(1000, 1.0);

        assert!(close(integrator.velocity(), 1.0));
        assert!(close(integrator.position(), 0.5));
        assert_eq!(integrator.acceleration(), 1.0);
    }

    #[test]
    fn test_rk4_with_initial_velocity() {
        let mut integrator = MotionIntegrator::new(IntegrationPolicy::RungeKutta4);
        integrator.tick(1000, 2.0);
        // v = 2, x = 1; second second: x = 1 + 2·1 + ½·(-1)·1 = 2.5, v = 1
        integrator.tick(1000, -1.0);

        assert!(close(integrator.velocity(), 1.0));
        assert!(close(integrator.position(), 2.5));
    }

    #[test]
    fn test_newtonian_matches_rk4_for_constant_acceleration() {
        let mut newtonian = MotionIntegrator::new(IntegrationPolicy::Newtonian);
        let mut rk4 = MotionIntegrator::new(IntegrationPolicy::RungeKutta4);

        for sample in [0.5f32, 0.5, -0.25, 1.0, 0.0] {
            newtonian.tick(33, sample);
            rk4.tick(33, sample);
        }

        assert!(close(newtonian.position(), rk4.position()));
        assert!(close(newtonian.velocity(), rk4.velocity()));
        assert_eq!(newtonian.acceleration(), rk4.acceleration());
    }

    #[test]
    fn test_newtonian_step() {
        let mut integrator = MotionIntegrator::new(IntegrationPolicy::Newtonian);
        integrator.tick(500, 2.0);

        assert!(close(integrator.velocity(), 1.0));
        assert!(close(integrator.position(), 0.25));
        assert_eq!(integrator.acceleration(), 2.0);
    }

    #[test]
    fn test_direct_assignment_step() {
        let mut integrator = MotionIntegrator::new(IntegrationPolicy::DirectAssignment);
        integrator.tick(1000, 1.0);

        assert_eq!(integrator.acceleration(), 1.0);
        assert!(close(integrator.velocity(), 1.0));
        // position follows the updated velocity
        assert!(close(integrator.position(), 1.0));

        integrator.tick(1000, 0.0);
        assert_eq!(integrator.acceleration(), 0.0);
        assert!(close(integrator.velocity(), 1.0));
        assert!(close(integrator.position(), 2.0));
    }

    #[test]
    fn test_jerk_is_finite_difference() {
        for policy in ALL_POLICIES {
            let mut integrator = MotionIntegrator::new(policy).with_jerk();
            assert_eq!(integrator.jerk(), Some(0.0));

            integrator.tick(500, 1.0);
            assert!(close(integrator.jerk().unwrap(), 2.0));

            integrator.tick(250, 0.5);
            assert!(close(integrator.jerk().unwrap(), -2.0));
        }
    }

    #[test]
    fn test_jerk_untracked_by_default() {
        let mut integrator = MotionIntegrator::new(IntegrationPolicy::DirectAssignment);
        integrator.tick(33, 1.0);
        assert_eq!(integrator.jerk(), None);
    }

    #[test]
    fn test_upper_bound_stops_motion() {
        for policy in ALL_POLICIES {
            let mut integrator = MotionIntegrator::new(policy).with_bounds(Bounds::new(0.0, 1.0));
            integrator.tick(1000, 10.0);

            assert_eq!(integrator.position(), 1.0);
            assert_eq!(integrator.velocity(), 0.0);
            assert_eq!(integrator.acceleration(), 0.0);
        }
    }

    #[test]
    fn test_lower_bound_stops_motion() {
        let mut integrator = MotionIntegrator::new(IntegrationPolicy::RungeKutta4)
            .with_bounds(Bounds::new(-0.5, 0.5));
        integrator.tick(1000, -4.0);

        assert_eq!(integrator.position(), -0.5);
        assert_eq!(integrator.velocity(), 0.0);
        assert_eq!(integrator.acceleration(), 0.0);
    }

    #[test]
    fn test_within_bounds_is_untouched() {
        let mut bounded = MotionIntegrator::new(IntegrationPolicy::RungeKutta4)
            .with_bounds(Bounds::new(-10.0, 10.0));
        let mut free = MotionIntegrator::new(IntegrationPolicy::RungeKutta4);
        bounded.tick(100, 1.0);
        free.tick(100, 1.0);

        assert_eq!(bounded.state(), free.state());
    }

    #[test]
    fn test_bounds_order_is_normalized() {
        assert_eq!(Bounds::new(1.0, -1.0), Bounds { min: -1.0, max: 1.0 });
    }

    #[test]
    fn test_zero_dt_is_a_no_op() {
        for policy in ALL_POLICIES {
            let mut integrator = MotionIntegrator::new(policy).with_jerk();
            integrator.tick(100, 0.5);
            let before = *integrator.state();

            integrator.tick(0, before.acceleration);
            assert_eq!(*integrator.state(), before);

            integrator.tick(0, 3.0);
            assert_eq!(*integrator.state(), before);
        }
    }

    #[test]
    fn test_ms_are_converted_to_seconds() {
        let mut integrator = MotionIntegrator::new(IntegrationPolicy::Newtonian);
        integrator.tick(33, 1.0);
        assert!(close(integrator.velocity(), 0.033));
    }

    #[test]
    fn test_reset_keeps_jerk_tracking() {
        let mut integrator = MotionIntegrator::new(IntegrationPolicy::Newtonian).with_jerk();
        integrator.tick(100, 1.0);
        integrator.reset();

        assert_eq!(
            *integrator.state(),
            KinematicState {
                jerk: Some(0.0),
                ..KinematicState::default()
            }
        );
    }
}
