#![warn(missing_docs)]

//! # PID Response Simulation Core
//!
//! This library is the simulation core of an interactive PID visualization: it
//! integrates a mass-spring-damper plant under PID feedback over a fixed time
//! horizon and records the full trajectory of plant states together with the
//! per-sample P/I/D term decomposition.
//!
//! ## Features
//!
//! - A deterministic, fixed-step closed-loop simulation:
//!   - Semi-implicit Euler integration of the second-order plant.
//!   - Rectangular accumulation of the integral term, in lockstep with the
//!     integrator so that stored and displayed values always agree.
//!
//! - Trajectory bookkeeping built for replay and scrubbing:
//!   - The trajectory is an immutable value, replaced wholesale whenever a
//!     parameter changes. A time slider is just an index into it.
//!   - Every sample carries the error, derivative, and individual PID terms,
//!     so a presentation layer never recomputes anything.
//!
//! - Tolerant of divergence: large (or negative) gains may drive the plant to
//!   infinity or NaN over the horizon. That is a valid, displayable outcome
//!   demonstrating instability, never an error.
//!
//! ## Usage
//!
//! ### Generating a trajectory
//!
//! `Trajectory::generate` is functionally pure: the same configuration and
//! setpoint always produce a bit-identical trajectory.
//!
//! ```rust
//! use pid_response::pid::PidGains;
//! use pid_response::setpoint;
//! use pid_response::sim::{SimConfigBuilder, Trajectory};
//!
//! let config = SimConfigBuilder::default()
//!     .gains(PidGains::new(1.0, 0.0, 0.0).expect("finite gains"))
//!     .duration(1.0)
//!     .build()
//!     .expect("valid simulation config");
//!
//! let trajectory = Trajectory::generate(&config, setpoint::unit);
//!
//! assert_eq!(trajectory.len(), 101); // samples over [0, 1] at dt = 0.01
//! assert_eq!(trajectory[0].terms.error, 1.0);
//! assert_eq!(trajectory[0].state.integral_error, 0.0);
//! ```
//!
//! ### Driving an interactive session
//!
//! `ResponseSession` owns the current trajectory and a read cursor. Changing
//! a gain regenerates the whole trajectory from `t = 0`; seeking or advancing
//! only moves the cursor.
//!
//! ```rust
//! use pid_response::pid::PidGains;
//! use pid_response::setpoint;
//! use pid_response::sim::{ResponseSession, SimConfigBuilder};
//!
//! let config = SimConfigBuilder::default()
//!     .build()
//!     .expect("valid simulation config");
//! let mut session = ResponseSession::new(config, setpoint::unit);
//!
//! session.seek(250);
//! let before = session.current().state.position;
//!
//! // A slider change: regenerate from the origin, keep the cursor in place
//! session.set_gains(PidGains::new(8.0, 0.5, 0.0).expect("finite gains"));
//! let after = session.current().state.position;
//!
//! assert_eq!(session.cursor(), 250);
//! assert_ne!(before, after);
//! ```
//!
//! ### Non-constant setpoints
//!
//! Any pure `Fn(T) -> T` works as a setpoint; [`setpoint::SignalGenerator`]
//! provides the usual shapes.
//!
//! ```rust
//! use pid_response::setpoint::{SignalGenerator, WaveForm};
//! use pid_response::sim::{SimConfigBuilder, Trajectory};
//!
//! let config = SimConfigBuilder::default().build().expect("valid config");
//! let square = SignalGenerator::new(WaveForm::Square, 0.5, 0.5);
//! let trajectory = Trajectory::generate(&config, |t| square.generate(t));
//! assert_eq!(trajectory[0].state.time, 0.0);
//! ```

/// PID gains and the per-sample P/I/D term decomposition.
pub mod pid;

/// The mass-spring-damper plant and its fixed-step integrator.
pub mod plant;

/// Setpoint signal generators.
pub mod setpoint;

/// Simulation state, trajectory generation, and the interactive session.
pub mod sim;

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
