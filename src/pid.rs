// PID gains and the per-sample term decomposition

use num_traits::Float;
use thiserror::Error;

/// Errors raised when validating PID gains.
///
/// Unlike a controller meant for deployment, this simulator accepts *any*
/// finite gain, including zero and negative values; a negative gain is a
/// legitimate way to demonstrate instability. Only non-finite values are
/// rejected, since they would poison the whole trajectory from sample zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum GainError {
    /// The proportional gain was NaN or infinite.
    #[error("proportional gain must be finite")]
    NonFiniteProportionalGain,

    /// The integral gain was NaN or infinite.
    #[error("integral gain must be finite")]
    NonFiniteIntegralGain,

    /// The derivative gain was NaN or infinite.
    #[error("derivative gain must be finite")]
    NonFiniteDerivativeGain,
}

/// The three PID gain coefficients.
///
/// Immutable for the duration of a simulation run; an interactive slider
/// change builds a new value (or goes through a setter) and triggers a full
/// regeneration of the trajectory from `t = 0`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PidGains<T> {
    /// Proportional gain coefficient.
    kp: T,

    /// Integral gain coefficient.
    ki: T,

    /// Derivative gain coefficient.
    kd: T,
}

impl Default for PidGains<f64> {
    /// The initial slider values of the interactive demo: a pure
    /// proportional controller with `kp = 4`.
    fn default() -> Self {
        PidGains {
            kp: 4.0,
            ki: 0.0,
            kd: 0.0,
        }
    }
}

impl<T: Float> PidGains<T> {
    /// Builds a validated set of gains.
    ///
    /// # Arguments
    /// - `kp`, `ki`, `kd`: the proportional, integral, and derivative gains.
    ///
    /// # Returns
    /// - `Ok(PidGains)` if every gain is finite.
    /// - `Err(GainError)` naming the first offending gain otherwise.
    pub fn new(kp: T, ki: T, kd: T) -> Result<Self, GainError> {
        if !kp.is_finite() {
            return Err(GainError::NonFiniteProportionalGain);
        }
        if !ki.is_finite() {
            return Err(GainError::NonFiniteIntegralGain);
        }
        if !kd.is_finite() {
            return Err(GainError::NonFiniteDerivativeGain);
        }
        Ok(PidGains { kp, ki, kd })
    }

    /// Returns the proportional gain.
    pub fn kp(&self) -> T {
        self.kp
    }

    /// Returns the integral gain.
    pub fn ki(&self) -> T {
        self.ki
    }

    /// Returns the derivative gain.
    pub fn kd(&self) -> T {
        self.kd
    }

    /// Convenience method that returns all three gains together as a tuple.
    pub fn gains(&self) -> (T, T, T) {
        (self.kp, self.ki, self.kd)
    }

    /// Sets the proportional gain.
    ///
    /// # Returns
    /// - `Ok(())` if the gain was set.
    /// - `Err(GainError::NonFiniteProportionalGain)` if the gain is NaN or
    ///   infinite; the stored value is left unchanged.
    pub fn set_kp(&mut self, kp: T) -> Result<(), GainError> {
        if !kp.is_finite() {
            return Err(GainError::NonFiniteProportionalGain);
        }
        self.kp = kp;
        Ok(())
    }

    /// Sets the integral gain.
    ///
    /// # Returns
    /// - `Ok(())` if the gain was set.
    /// - `Err(GainError::NonFiniteIntegralGain)` if the gain is NaN or
    ///   infinite; the stored value is left unchanged.
    pub fn set_ki(&mut self, ki: T) -> Result<(), GainError> {
        if !ki.is_finite() {
            return Err(GainError::NonFiniteIntegralGain);
        }
        self.ki = ki;
        Ok(())
    }

    /// Sets the derivative gain.
    ///
    /// # Returns
    /// - `Ok(())` if the gain was set.
    /// - `Err(GainError::NonFiniteDerivativeGain)` if the gain is NaN or
    ///   infinite; the stored value is left unchanged.
    pub fn set_kd(&mut self, kd: T) -> Result<(), GainError> {
        if !kd.is_finite() {
            return Err(GainError::NonFiniteDerivativeGain);
        }
        self.kd = kd;
        Ok(())
    }

    /// Convenience method to set all three gains together.
    pub fn set_gains(&mut self, kp: T, ki: T, kd: T) -> Result<(), GainError> {
        self.set_kp(kp)?;
        self.set_ki(ki)?;
        self.set_kd(kd)
    }

    /// Evaluates the P/I/D term decomposition for one sample.
    ///
    /// The caller supplies the tracking error, the *updated* integral of the
    /// error (including the current sample's `error * dt` contribution), and
    /// the error derivative; the trajectory generator produces all three in
    /// lockstep with the plant integrator.
    pub fn terms(&self, error: T, integral_error: T, derivative: T) -> PidTerms<T> {
        let p_term = self.kp * error;
        let i_term = self.ki * integral_error;
        let d_term = self.kd * derivative;
        PidTerms {
            error,
            derivative,
            p_term,
            i_term,
            d_term,
            output: p_term + i_term + d_term,
        }
    }
}

/// The control output of one sample, broken into its displayable parts.
///
/// The raw `derivative` rides along so that a tangent-line display can read
/// the slope even when `kd` is zero. All values may be non-finite if the
/// closed loop has diverged; that is a displayable outcome, not an error.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PidTerms<T> {
    /// Tracking error, `setpoint - position`.
    pub error: T,

    /// Error derivative used for the D-term.
    pub derivative: T,

    /// Proportional term, `kp * error`.
    pub p_term: T,

    /// Integral term, `ki * integral_error`.
    pub i_term: T,

    /// Derivative term, `kd * derivative`.
    pub d_term: T,

    /// Control input applied to the plant, `p_term + i_term + d_term`.
    pub output: T,
}
