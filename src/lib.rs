//! Single-axis motion estimation from a 3-axis accelerometer.
//!
//! Raw readings (in g, gravity included) are turned into one linear
//! acceleration along a chosen axis, either by tilt compensation alone
//! ([`solver`]) or against a running gravity estimate ([`calibration`]).
//! That acceleration then drives a fixed-step kinematic integrator
//! ([`integrator`]). [`context::SimulationContext`] ties the pieces
//! together for a poll-per-frame, tick-at-fixed-rate loop.
#![cfg_attr(not(test), no_std)]

mod fmt;

pub mod accel;
pub mod calibration;
pub mod config;
pub mod context;
pub mod error;
pub mod history;
pub mod integrator;
pub mod solver;
pub mod source;
pub mod source_async;
pub mod timestep;
pub mod vector;
