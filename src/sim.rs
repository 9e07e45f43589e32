// Closed-loop simulation: state, trajectory generation, interactive session

use core::ops::Index;

use num_traits::Float;
use thiserror::Error;

use crate::pid::{PidGains, PidTerms};
use crate::plant::MassSpringDamper;

/// Errors raised when validating a simulation configuration.
///
/// The interactive sliders driving this core are bounded, so none of these
/// should arise in normal operation; they exist to fail fast on programmatic
/// misuse before a malformed trajectory is ever generated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum SimConfigError {
    /// The timestep was NaN, infinite, zero, or negative.
    #[error("timestep must be finite and positive")]
    InvalidTimestep,

    /// The duration was NaN, infinite, or negative, or `duration / dt`
    /// overflows the sample count.
    #[error("duration must be finite, non-negative, and yield a representable sample count")]
    InvalidDuration,

    /// The damping coefficient was NaN, infinite, or negative.
    #[error("damping coefficient must be finite and non-negative")]
    InvalidDamping,

    /// The initial position or velocity was NaN or infinite.
    #[error("initial state must be finite")]
    InvalidInitialState,
}

/// The evolving state of the closed loop at one instant.
///
/// Mutated only by the integration step during trajectory generation; the
/// presentation layer reads snapshots out of the trajectory and never writes
/// back.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimState<T> {
    /// Simulation time in seconds, starting at zero.
    pub time: T,

    /// Plant position.
    pub position: T,

    /// Plant velocity.
    pub velocity: T,

    /// Accumulated integral of the error over `[0, time)`, i.e. *excluding*
    /// the current sample's contribution. Exactly zero at `t = 0`.
    pub integral_error: T,
}

/// One trajectory sample: the plant state at an instant plus the PID term
/// decomposition computed at that instant.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample<T> {
    /// The plant state at this sample's time.
    pub state: SimState<T>,

    /// The PID terms and control input applied over the following step.
    pub terms: PidTerms<T>,
}

fn sample_steps<T: Float>(dt: T, duration: T) -> Result<usize, SimConfigError> {
    if !dt.is_finite() || dt <= T::zero() {
        return Err(SimConfigError::InvalidTimestep);
    }
    if !duration.is_finite() || duration < T::zero() {
        return Err(SimConfigError::InvalidDuration);
    }
    num_traits::cast((duration / dt).floor()).ok_or(SimConfigError::InvalidDuration)
}

/// A validated simulation configuration.
///
/// Immutable per run: any change goes through a setter (re-validating the
/// affected invariants) and should be followed by a full trajectory
/// regeneration, which [`ResponseSession`] does automatically.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimConfig<T> {
    gains: PidGains<T>,
    damping: T,
    dt: T,
    duration: T,
    initial_position: T,
    initial_velocity: T,
}

impl Default for SimConfig<f64> {
    /// The interactive demo's startup configuration: default gains, damping
    /// 0.1, a 10-second horizon at 10ms steps, plant at rest at the origin.
    fn default() -> Self {
        SimConfig {
            gains: PidGains::default(),
            damping: 0.1,
            dt: 0.01,
            duration: 10.0,
            initial_position: 0.0,
            initial_velocity: 0.0,
        }
    }
}

impl<T: Float> SimConfig<T> {
    /// Builds a validated configuration with the plant initially at rest at
    /// the origin.
    ///
    /// # Arguments
    /// - `gains`: the PID gains (already validated by construction).
    /// - `damping`: the plant damping coefficient; must be finite and
    ///   non-negative.
    /// - `dt`: the integration timestep; must be finite and positive.
    /// - `duration`: the horizon `T`; must be finite and non-negative. A zero
    ///   duration yields a single-sample trajectory at `t = 0`.
    pub fn new(gains: PidGains<T>, damping: T, dt: T, duration: T) -> Result<Self, SimConfigError> {
        sample_steps(dt, duration)?;
        if !damping.is_finite() || damping < T::zero() {
            return Err(SimConfigError::InvalidDamping);
        }
        Ok(SimConfig {
            gains,
            damping,
            dt,
            duration,
            initial_position: T::zero(),
            initial_velocity: T::zero(),
        })
    }

    /// Returns the PID gains.
    pub fn gains(&self) -> PidGains<T> {
        self.gains
    }

    /// Returns the plant damping coefficient.
    pub fn damping(&self) -> T {
        self.damping
    }

    /// Returns the integration timestep.
    pub fn dt(&self) -> T {
        self.dt
    }

    /// Returns the simulation horizon.
    pub fn duration(&self) -> T {
        self.duration
    }

    /// Returns the initial plant position.
    pub fn initial_position(&self) -> T {
        self.initial_position
    }

    /// Returns the initial plant velocity.
    pub fn initial_velocity(&self) -> T {
        self.initial_velocity
    }

    /// Returns the number of samples a generated trajectory will hold:
    /// `floor(duration / dt) + 1`, covering `[0, duration]` inclusive.
    pub fn sample_count(&self) -> usize {
        match sample_steps(self.dt, self.duration) {
            Ok(steps) => steps.saturating_add(1),
            Err(_) => 1, // unreachable for a validated config
        }
    }

    /// Replaces the PID gains. Gains carry their own validity, so this
    /// cannot fail.
    pub fn set_gains(&mut self, gains: PidGains<T>) {
        self.gains = gains;
    }

    /// Sets the plant damping coefficient.
    ///
    /// # Returns
    /// - `Ok(())` if the coefficient is finite and non-negative.
    /// - `Err(SimConfigError::InvalidDamping)` otherwise; the stored value is
    ///   left unchanged.
    pub fn set_damping(&mut self, damping: T) -> Result<(), SimConfigError> {
        if !damping.is_finite() || damping < T::zero() {
            return Err(SimConfigError::InvalidDamping);
        }
        self.damping = damping;
        Ok(())
    }

    /// Sets the integration timestep.
    ///
    /// # Returns
    /// - `Ok(())` if the timestep is finite and positive and the resulting
    ///   sample count is representable.
    /// - `Err(SimConfigError)` otherwise; the stored value is left unchanged.
    pub fn set_dt(&mut self, dt: T) -> Result<(), SimConfigError> {
        sample_steps(dt, self.duration)?;
        self.dt = dt;
        Ok(())
    }

    /// Sets the simulation horizon.
    ///
    /// # Returns
    /// - `Ok(())` if the duration is finite and non-negative and the
    ///   resulting sample count is representable.
    /// - `Err(SimConfigError)` otherwise; the stored value is left unchanged.
    pub fn set_duration(&mut self, duration: T) -> Result<(), SimConfigError> {
        sample_steps(self.dt, duration)?;
        self.duration = duration;
        Ok(())
    }

    /// Sets the initial plant state.
    ///
    /// # Returns
    /// - `Ok(())` if both components are finite.
    /// - `Err(SimConfigError::InvalidInitialState)` otherwise; the stored
    ///   values are left unchanged.
    pub fn set_initial_state(&mut self, position: T, velocity: T) -> Result<(), SimConfigError> {
        if !position.is_finite() || !velocity.is_finite() {
            return Err(SimConfigError::InvalidInitialState);
        }
        self.initial_position = position;
        self.initial_velocity = velocity;
        Ok(())
    }
}

/// A builder for [`SimConfig`] starting from the interactive demo's
/// defaults. Values are recorded as given and validated on [`build`].
///
/// [`build`]: SimConfigBuilder::build
#[derive(Copy, Clone, Debug)]
pub struct SimConfigBuilder<T> {
    gains: PidGains<T>,
    damping: T,
    dt: T,
    duration: T,
    initial_position: T,
    initial_velocity: T,
}

impl Default for SimConfigBuilder<f64> {
    fn default() -> Self {
        let config = SimConfig::default();
        SimConfigBuilder {
            gains: config.gains,
            damping: config.damping,
            dt: config.dt,
            duration: config.duration,
            initial_position: config.initial_position,
            initial_velocity: config.initial_velocity,
        }
    }
}

impl<T: Float> SimConfigBuilder<T> {
    /// Sets the PID gains.
    pub fn gains(mut self, gains: PidGains<T>) -> Self {
        self.gains = gains;
        self
    }

    /// Sets the plant damping coefficient.
    pub fn damping(mut self, damping: T) -> Self {
        self.damping = damping;
        self
    }

    /// Sets the integration timestep.
    pub fn dt(mut self, dt: T) -> Self {
        self.dt = dt;
        self
    }

    /// Sets the simulation horizon.
    pub fn duration(mut self, duration: T) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the initial plant state.
    pub fn initial_state(mut self, position: T, velocity: T) -> Self {
        self.initial_position = position;
        self.initial_velocity = velocity;
        self
    }

    /// Validates the recorded values and builds the configuration.
    ///
    /// # Returns
    /// - `Ok(SimConfig)` if every value is valid.
    /// - `Err(SimConfigError)` naming the first invalid value otherwise.
    pub fn build(self) -> Result<SimConfig<T>, SimConfigError> {
        let mut config = SimConfig::new(self.gains, self.damping, self.dt, self.duration)?;
        config.set_initial_state(self.initial_position, self.initial_velocity)?;
        Ok(config)
    }
}

/// A precomputed closed-loop trajectory over `[0, duration]` at a fixed
/// timestep.
///
/// An immutable value: parameter changes produce a brand-new trajectory
/// rather than patching this one, so a paused animation can never observe a
/// half-updated history. Samples are strictly increasing in time, contiguous
/// at `dt`, and the first sample sits at `t = 0` with zero accumulated
/// integral.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory<T> {
    samples: Vec<Sample<T>>,
    dt: T,
}

impl<T: Float> Trajectory<T> {
    /// Runs the closed-loop simulation and records every sample.
    ///
    /// The term calculator and the plant integrator run in lockstep from
    /// `t = 0`: each iteration evaluates the error against the setpoint,
    /// accumulates the integral rectangle `error * dt`, differences the
    /// error for the derivative (zero at the first sample, where there is no
    /// history), records the sample, then advances the plant one
    /// semi-implicit Euler step under the computed control input.
    ///
    /// Deterministic by construction: no randomness and no wall clock, so
    /// identical configurations and setpoints yield bit-identical
    /// trajectories. Non-finite excursions under aggressive gains are
    /// recorded as-is.
    pub fn generate<F>(config: &SimConfig<T>, setpoint: F) -> Self
    where
        F: Fn(T) -> T,
    {
        let plant = MassSpringDamper {
            damping: config.damping(),
        };
        let gains = config.gains();
        let dt = config.dt();
        let count = config.sample_count();

        let mut samples = Vec::with_capacity(count);
        let mut state = SimState {
            time: T::zero(),
            position: config.initial_position(),
            velocity: config.initial_velocity(),
            integral_error: T::zero(),
        };
        let mut previous_error = None;

        for _ in 0..count {
            let error = setpoint(state.time) - state.position;
            let integral = state.integral_error + error * dt;
            let derivative = match previous_error {
                Some(previous) => (error - previous) / dt,
                None => T::zero(),
            };
            let terms = gains.terms(error, integral, derivative);
            samples.push(Sample { state, terms });

            state = plant.step(state, terms.output, dt);
            state.integral_error = integral;
            previous_error = Some(error);
        }

        Trajectory { samples, dt }
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the trajectory holds no samples. Generated
    /// trajectories always hold at least the `t = 0` sample.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the sample at `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<&Sample<T>> {
        self.samples.get(index)
    }

    /// Returns all samples in time order.
    pub fn samples(&self) -> &[Sample<T>] {
        &self.samples
    }

    /// Returns an iterator over the samples in time order.
    pub fn iter(&self) -> core::slice::Iter<'_, Sample<T>> {
        self.samples.iter()
    }

    /// Returns the timestep between consecutive samples.
    pub fn dt(&self) -> T {
        self.dt
    }

    /// Returns the time of the last sample, i.e. the covered horizon.
    pub fn duration(&self) -> T {
        self.samples.last().map_or(T::zero(), |s| s.state.time)
    }

    /// Returns the time of the sample at `index`, or `None` if out of range.
    pub fn time_at(&self, index: usize) -> Option<T> {
        self.get(index).map(|s| s.state.time)
    }

    /// Returns the index of the sample nearest to `time`, clamped into
    /// range. This is the time-slider lookup: positions before the first
    /// sample map to 0, positions beyond the last sample map to the end.
    pub fn index_for_time(&self, time: T) -> usize {
        let last = self.samples.len().saturating_sub(1);
        let steps = (time / self.dt).round();
        if steps <= T::zero() {
            0
        } else {
            num_traits::cast(steps).map_or(last, |i: usize| i.min(last))
        }
    }
}

impl<T: Float> Index<usize> for Trajectory<T> {
    type Output = Sample<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.samples[index]
    }
}

impl<'a, T: Float> IntoIterator for &'a Trajectory<T> {
    type Item = &'a Sample<T>;
    type IntoIter = core::slice::Iter<'a, Sample<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// An interactive replay/scrub session over the current trajectory.
///
/// Owns the configuration, the setpoint function, the trajectory generated
/// for them, and a read cursor. Parameter changes regenerate the trajectory
/// wholesale from `t = 0` (integral and derivative history depend on the
/// full past, so no mid-point restart is sound); cursor moves never touch
/// simulation state. An external animation driver calls [`advance`] on its
/// own schedule and pausing is simply not calling it.
///
/// [`advance`]: ResponseSession::advance
pub struct ResponseSession<T, F> {
    config: SimConfig<T>,
    setpoint: F,
    trajectory: Trajectory<T>,
    cursor: usize,
}

impl<T, F> ResponseSession<T, F>
where
    T: Float,
    F: Fn(T) -> T,
{
    /// Creates a session and generates the initial trajectory.
    pub fn new(config: SimConfig<T>, setpoint: F) -> Self {
        let trajectory = Trajectory::generate(&config, &setpoint);
        Self {
            config,
            setpoint,
            trajectory,
            cursor: 0,
        }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &SimConfig<T> {
        &self.config
    }

    /// Returns the current trajectory.
    pub fn trajectory(&self) -> &Trajectory<T> {
        &self.trajectory
    }

    /// Returns the read cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the sample under the read cursor.
    pub fn current(&self) -> &Sample<T> {
        &self.trajectory[self.cursor]
    }

    /// Replaces the PID gains and regenerates the trajectory from `t = 0`.
    pub fn set_gains(&mut self, gains: PidGains<T>) {
        self.config.set_gains(gains);
        self.regenerate();
    }

    /// Replaces the whole configuration and regenerates the trajectory from
    /// `t = 0`.
    pub fn set_config(&mut self, config: SimConfig<T>) {
        self.config = config;
        self.regenerate();
    }

    /// Moves the read cursor, clamping into range. Returns the cursor
    /// actually set.
    pub fn seek(&mut self, index: usize) -> usize {
        self.cursor = index.min(self.trajectory.len().saturating_sub(1));
        self.cursor
    }

    /// Advances the read cursor one sample, wrapping to the start past the
    /// final sample (a looping animation). Returns true if it wrapped.
    pub fn advance(&mut self) -> bool {
        if self.cursor + 1 >= self.trajectory.len() {
            self.cursor = 0;
            true
        } else {
            self.cursor += 1;
            false
        }
    }

    fn regenerate(&mut self) {
        self.trajectory = Trajectory::generate(&self.config, &self.setpoint);
        self.cursor = self.cursor.min(self.trajectory.len().saturating_sub(1));
    }
}
