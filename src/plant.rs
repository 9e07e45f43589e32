// The toy second-order plant under control
// Copyright © 2025 Hs293Go
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES
// OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE
// OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use num_traits::Float;

use crate::sim::SimState;

/// A unit-mass, unit-stiffness mass-spring-damper:
///
/// x'' = -x - c·x' + u
///
/// where `c` is the damping coefficient and `u` the control input.
pub struct MassSpringDamper<T> {
    /// Damping coefficient `c`. The interactive demo uses 0.1, a lightly
    /// underdamped plant that overshoots visibly under proportional control.
    pub damping: T,
}

impl<T: Float> MassSpringDamper<T> {
    /// Evaluates the plant acceleration `x'' = -x - c·x' + u`.
    pub fn acceleration(&self, position: T, velocity: T, u: T) -> T {
        -position - self.damping * velocity + u
    }

    /// Advances the plant one timestep under control input `u`.
    ///
    /// This is a semi-implicit Euler step: the velocity is updated first and
    /// the position is advanced with the *updated* velocity. The step order
    /// is part of the trajectory's reference behavior and must stay in sync
    /// with the term calculator's `dt`, so `dt` is caller-validated to be
    /// positive and constant across a run.
    ///
    /// The accumulated `integral_error` is controller state and passes
    /// through untouched.
    pub fn step(&self, state: SimState<T>, u: T, dt: T) -> SimState<T> {
        let velocity = state.velocity + dt * self.acceleration(state.position, state.velocity, u);
        let position = state.position + dt * velocity;
        SimState {
            time: state.time + dt,
            position,
            velocity,
            integral_error: state.integral_error,
        }
    }
}

/// Tests that one hand-evaluated step of the unforced plant comes out
/// exactly, including the position update seeing the new velocity.
#[cfg(test)]
#[test]
fn test_single_unforced_step() {
    let plant = MassSpringDamper { damping: 0.1 };
    let initial = SimState {
        time: 0.0,
        position: 1.0,
        velocity: 0.0,
        integral_error: 0.25,
    };

    let next = plant.step(initial, 0.0, 0.5);

    // v1 = 0 + 0.5 * (-1 - 0.1*0 + 0) = -0.5; x1 = 1 + 0.5 * v1 = 0.75
    assert_eq!(next.velocity, -0.5);
    assert_eq!(next.position, 0.75);
    assert_eq!(next.time, 0.5);
    assert_eq!(next.integral_error, 0.25);
}
