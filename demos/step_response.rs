//! Step response of the mass-spring-damper plant under PID control, printed
//! the way an interactive front end would consume it: generate once, scrub by
//! index, regenerate on a gain change.
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

use pid_response::pid::PidGains;
use pid_response::setpoint;
use pid_response::sim::{ResponseSession, SimConfigBuilder};

fn main() {
    let config = SimConfigBuilder::default()
        .gains(PidGains::new(4.0, 0.5, 0.2).expect("finite gains"))
        .build()
        .expect("valid simulation config");

    let mut session = ResponseSession::new(config, setpoint::unit);

    println!("t (s)   | position | error   | P-term  | I-term  | D-term  | u");
    println!("--------|----------|---------|---------|---------|---------|--------");
    for sample in session.trajectory().iter().step_by(100) {
        println!(
            "{:7.2} | {:8.4} | {:7.4} | {:7.3} | {:7.3} | {:7.3} | {:7.3}",
            sample.state.time,
            sample.state.position,
            sample.terms.error,
            sample.terms.p_term,
            sample.terms.i_term,
            sample.terms.d_term,
            sample.terms.output,
        );
    }

    // Scrub the time slider to t = 2.5s and read the display values
    let index = session.trajectory().index_for_time(2.5);
    session.seek(index);
    let sample = session.current();
    println!(
        "\nat t = {:.2}s: error {:.4}, integral {:.4}, derivative {:.4}",
        sample.state.time, sample.terms.error, sample.state.integral_error, sample.terms.derivative,
    );

    // Drag the Kp slider: the whole trajectory is regenerated from t = 0,
    // the cursor stays put
    session.set_gains(PidGains::new(9.0, 0.5, 0.2).expect("finite gains"));
    let sample = session.current();
    println!(
        "after raising Kp: position at t = {:.2}s is {:.4}",
        sample.state.time, sample.state.position,
    );
}
