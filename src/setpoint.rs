// Setpoint signal generators

use num_traits::Float;

/// The shape of a generated setpoint signal.
pub enum WaveForm {
    /// A constant signal (the classic step-response target).
    Constant,
    /// A sine wave of unit angular frequency.
    Sine,
    /// A square wave of unit angular frequency.
    Square,
}

/// Generates a setpoint signal as a pure function of simulation time.
///
/// The generated value is `amplitude * f(t) + offset` where `f` is picked by
/// the waveform. Holds no mutable state, so the same instant always maps to
/// the same setpoint no matter how often or in what order it is sampled.
pub struct SignalGenerator<T> {
    fcn: fn(T) -> T,
    amplitude: T,
    offset: T,
}

impl<T: Float> SignalGenerator<T> {
    /// Creates a generator for the given waveform, amplitude, and offset.
    pub fn new(waveform: WaveForm, amplitude: T, offset: T) -> Self {
        Self {
            fcn: match waveform {
                WaveForm::Constant => |_| T::one(),
                WaveForm::Sine => |t: T| t.sin(),
                WaveForm::Square => |t: T| t.sin().signum(),
            },
            amplitude,
            offset,
        }
    }

    /// Evaluates the setpoint at the given simulation time.
    pub fn generate(&self, time: T) -> T {
        self.amplitude * (self.fcn)(time) + self.offset
    }
}

/// The constant unit setpoint, usable directly as a setpoint function.
pub fn unit<T: Float>(_time: T) -> T {
    T::one()
}
