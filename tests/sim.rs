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

use fixtures::test_sim::*;

use pid_response::setpoint;
use pid_response::sim::{ResponseSession, SimConfigBuilder, SimConfigError, Trajectory};

use approx::assert_relative_eq;

mod test_sim_config {

    use super::*;

    const INVALID_TIMESTEPS: &[f64; 4] = &[0.0, -0.01, f64::NAN, f64::INFINITY];
    const INVALID_DURATIONS: &[f64; 3] = &[-1.0, f64::NAN, f64::INFINITY];
    const INVALID_DAMPINGS: &[f64; 3] = &[-0.1, f64::NAN, f64::INFINITY];

    #[test]
    fn test_build_rejects_invalid_timestep() {
        for it in INVALID_TIMESTEPS {
            assert_eq!(
                SimConfigBuilder::default().dt(*it).build().map(|_| ()),
                Err(SimConfigError::InvalidTimestep)
            );
        }
    }

    #[test]
    fn test_build_rejects_invalid_duration() {
        for it in INVALID_DURATIONS {
            assert_eq!(
                SimConfigBuilder::default().duration(*it).build().map(|_| ()),
                Err(SimConfigError::InvalidDuration)
            );
        }
    }

    #[test]
    fn test_build_rejects_unrepresentable_sample_count() {
        // Finite on both sides, but duration / dt overflows to infinity
        assert_eq!(
            SimConfigBuilder::default()
                .dt(1e-300)
                .duration(1e300)
                .build()
                .map(|_| ()),
            Err(SimConfigError::InvalidDuration)
        );
    }

    #[test]
    fn test_build_rejects_invalid_damping() {
        for it in INVALID_DAMPINGS {
            assert_eq!(
                SimConfigBuilder::default().damping(*it).build().map(|_| ()),
                Err(SimConfigError::InvalidDamping)
            );
        }
    }

    #[test]
    fn test_build_rejects_non_finite_initial_state() {
        assert_eq!(
            SimConfigBuilder::default()
                .initial_state(f64::NAN, 0.0)
                .build()
                .map(|_| ()),
            Err(SimConfigError::InvalidInitialState)
        );
        assert_eq!(
            SimConfigBuilder::default()
                .initial_state(0.0, f64::INFINITY)
                .build()
                .map(|_| ()),
            Err(SimConfigError::InvalidInitialState)
        );
    }

    #[test]
    fn test_failed_setters_leave_config_unchanged() {
        let mut config = make_config(1.0, 0.0, 0.0, 1.0);

        for it in INVALID_TIMESTEPS {
            assert_eq!(config.set_dt(*it), Err(SimConfigError::InvalidTimestep));
            assert_eq!(config.dt(), DT);
        }
        for it in INVALID_DURATIONS {
            assert_eq!(config.set_duration(*it), Err(SimConfigError::InvalidDuration));
            assert_eq!(config.duration(), 1.0);
        }
        for it in INVALID_DAMPINGS {
            assert_eq!(config.set_damping(*it), Err(SimConfigError::InvalidDamping));
            assert_eq!(config.damping(), DAMPING);
        }
    }

    #[test]
    fn test_sample_count_covers_closed_interval() {
        assert_eq!(make_config(1.0, 0.0, 0.0, 1.0).sample_count(), 101);
        assert_eq!(make_config(1.0, 0.0, 0.0, 0.0).sample_count(), 1);

        let coarse = SimConfigBuilder::default()
            .dt(0.25)
            .duration(1.0)
            .build()
            .expect("valid config");
        assert_eq!(coarse.sample_count(), 5);
    }
}

mod test_trajectory {

    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        let config = make_config(4.0, 1.0, 0.5, 10.0);

        let first = Trajectory::generate(&config, setpoint::unit);
        let second = Trajectory::generate(&config, setpoint::unit);

        // Bit-identical, sample for sample
        assert_eq!(first, second);
    }

    #[test]
    fn test_first_sample_is_the_origin() {
        let trajectory = Trajectory::generate(&make_config(4.0, 1.0, 0.0, 1.0), setpoint::unit);

        assert_eq!(trajectory[0].state.time, 0.0);
        assert_eq!(trajectory[0].state.integral_error, 0.0);
        assert_eq!(trajectory[0].terms.derivative, 0.0);
    }

    #[test]
    fn test_samples_are_contiguous_at_dt() {
        let trajectory = Trajectory::generate(&make_config(4.0, 1.0, 0.5, 2.0), setpoint::unit);

        for pair in trajectory.samples().windows(2) {
            assert_relative_eq!(
                pair[1].state.time - pair[0].state.time,
                DT,
                epsilon = 1e-12
            );
        }
    }

    /// With all gains zero the control input vanishes identically and the
    /// trajectory reduces to the unforced damped oscillator, reproduced here
    /// step by step from the initial condition.
    #[test]
    fn test_zero_gain_baseline_is_unforced_oscillator() {
        let mut config = make_config(0.0, 0.0, 0.0, 2.0);
        config
            .set_initial_state(1.0, 0.0)
            .expect("finite initial state");

        let trajectory = Trajectory::generate(&config, setpoint::unit);

        let mut position = 1.0;
        let mut velocity = 0.0;
        for sample in &trajectory {
            assert_eq!(sample.terms.output, 0.0);
            assert_relative_eq!(sample.state.position, position, epsilon = 1e-12);
            assert_relative_eq!(sample.state.velocity, velocity, epsilon = 1e-12);

            velocity += DT * (-position - DAMPING * velocity);
            position += DT * velocity;
        }
    }

    #[test]
    fn test_integral_accumulates_monotonically_under_nonnegative_error() {
        // Zero gains leave the plant at rest, so error stays at exactly 1
        let trajectory = Trajectory::generate(&make_config(0.0, 0.0, 0.0, 10.0), setpoint::unit);

        for pair in trajectory.samples().windows(2) {
            assert!(pair[0].terms.error >= 0.0);
            assert!(pair[1].state.integral_error >= pair[0].state.integral_error);
        }
    }

    #[test]
    fn test_terms_decompose_exactly() {
        let config = make_config(4.0, 1.0, 0.5, 2.0);
        let (kp, ki, kd) = config.gains().gains();

        let trajectory = Trajectory::generate(&config, setpoint::unit);

        for sample in &trajectory {
            let terms = &sample.terms;
            assert_eq!(terms.p_term, kp * terms.error);
            assert_eq!(terms.d_term, kd * terms.derivative);
            assert_eq!(terms.output, terms.p_term + terms.i_term + terms.d_term);
            assert_eq!(terms.i_term, ki * (sample.state.integral_error + terms.error * DT));
        }
    }

    #[test]
    fn test_derivative_is_backward_difference_of_error() {
        let trajectory = Trajectory::generate(&make_config(4.0, 1.0, 0.5, 1.0), setpoint::unit);

        assert_eq!(trajectory[0].terms.derivative, 0.0);
        for pair in trajectory.samples().windows(2) {
            assert_eq!(
                pair[1].terms.derivative,
                (pair[1].terms.error - pair[0].terms.error) / DT
            );
        }
    }

    /// The concrete reference scenario: pure proportional control with unit
    /// gain, starting at rest, tracking a unit setpoint.
    #[test]
    fn test_unit_proportional_step_response() {
        let trajectory = Trajectory::generate(&make_config(1.0, 0.0, 0.0, 1.0), setpoint::unit);

        assert_eq!(trajectory.len(), 101);
        assert_eq!(trajectory[0].terms.error, 1.0);
        assert_eq!(trajectory[0].terms.output, 1.0);

        // Underdamped approach toward the setpoint: monotone at first
        for pair in trajectory.samples()[..10].windows(2) {
            assert!(pair[1].state.position > pair[0].state.position);
        }
    }

    #[test]
    fn test_regeneration_diverges_only_after_the_origin() {
        let slow = Trajectory::generate(&make_config(1.0, 0.0, 0.0, 1.0), setpoint::unit);
        let fast = Trajectory::generate(&make_config(2.0, 0.0, 0.0, 1.0), setpoint::unit);

        // No controller term affects the error at t = 0
        assert_eq!(slow[0].terms.error, fast[0].terms.error);
        assert_eq!(slow[0].state.position, fast[0].state.position);

        assert_ne!(slow[1].state.position, fast[1].state.position);
        assert_ne!(slow[100].state.position, fast[100].state.position);
    }

    #[test]
    fn test_zero_duration_yields_single_sample() {
        let trajectory = Trajectory::generate(&make_config(4.0, 0.0, 0.0, 0.0), setpoint::unit);

        assert_eq!(trajectory.len(), 1);
        assert_eq!(trajectory[0].state.time, 0.0);
        assert_eq!(trajectory.duration(), 0.0);
    }

    /// An absurdly hot gain drives the loop to overflow within the horizon.
    /// The trajectory still covers the full sample count and hands the
    /// non-finite values through untouched.
    #[test]
    fn test_divergent_trajectory_is_recorded_not_rejected() {
        let trajectory = Trajectory::generate(&make_config(1e8, 0.0, 0.0, 10.0), setpoint::unit);

        assert_eq!(trajectory.len(), 1001);
        let last = &trajectory[trajectory.len() - 1];
        assert!(!last.state.position.is_finite());
        assert!(!last.terms.output.is_finite());
    }

    #[test]
    fn test_negative_gain_pushes_the_plant_away_from_the_setpoint() {
        let trajectory = Trajectory::generate(&make_config(-1.0, 0.0, 0.0, 10.0), setpoint::unit);

        let last = &trajectory[trajectory.len() - 1];
        assert!(last.state.position < 0.0);
        assert!(last.terms.error > 1.0);
    }

    #[test]
    fn test_index_for_time_round_trips_and_clamps() {
        let trajectory = Trajectory::generate(&make_config(4.0, 0.0, 0.0, 1.0), setpoint::unit);

        assert_eq!(trajectory.index_for_time(0.0), 0);
        assert_eq!(trajectory.index_for_time(0.5), 50);
        assert_eq!(trajectory.index_for_time(1.0), 100);
        assert_eq!(trajectory.index_for_time(-3.0), 0);
        assert_eq!(trajectory.index_for_time(99.0), 100);

        assert_eq!(trajectory.time_at(50), Some(trajectory[50].state.time));
        assert_eq!(trajectory.time_at(101), None);
    }
}

mod test_session {

    use super::*;

    #[test]
    fn test_new_session_starts_at_the_origin() {
        let session = ResponseSession::new(make_config(4.0, 0.0, 0.0, 1.0), setpoint::unit);

        assert_eq!(session.cursor(), 0);
        assert_eq!(session.current(), &session.trajectory()[0]);
        assert_eq!(session.trajectory().len(), 101);
    }

    #[test]
    fn test_seek_clamps_into_range() {
        let mut session = ResponseSession::new(make_config(4.0, 0.0, 0.0, 1.0), setpoint::unit);

        assert_eq!(session.seek(50), 50);
        assert_eq!(session.seek(usize::MAX), 100);
        assert_eq!(session.cursor(), 100);
    }

    #[test]
    fn test_advance_wraps_like_a_looping_animation() {
        let mut session = ResponseSession::new(make_config(4.0, 0.0, 0.0, 1.0), setpoint::unit);

        assert!(!session.advance());
        assert_eq!(session.cursor(), 1);

        session.seek(100);
        assert!(session.advance());
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn test_gain_change_regenerates_from_the_origin() {
        let mut session = ResponseSession::new(make_config(1.0, 0.0, 0.0, 1.0), setpoint::unit);
        session.seek(50);
        let before = *session.current();

        session.set_gains(make_gains(2.0, 0.0, 0.0));
        let after = *session.current();

        // The cursor held its place; the sample under it was recomputed
        assert_eq!(session.cursor(), 50);
        assert_ne!(before.state.position, after.state.position);

        // The regenerated trajectory matches a fresh generation exactly
        let reference = Trajectory::generate(&make_config(2.0, 0.0, 0.0, 1.0), setpoint::unit);
        assert_eq!(session.trajectory(), &reference);
    }

    #[test]
    fn test_config_change_clamps_the_cursor() {
        let mut session = ResponseSession::new(make_config(4.0, 0.0, 0.0, 1.0), setpoint::unit);
        session.seek(100);

        session.set_config(make_config(4.0, 0.0, 0.0, 0.5));

        assert_eq!(session.trajectory().len(), 51);
        assert_eq!(session.cursor(), 50);
    }
}
