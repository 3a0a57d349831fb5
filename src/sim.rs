//! Closed-loop simulation of the mixing-valve process.
//!
//! The process itself is a stub: each step feeds the controller the error
//! between a periodic setpoint and the previous state, then integrates the
//! controller's own output back into the state, clamped to the configured
//! bounds. All temporal state lives here; the controller is stateless per
//! call.

use crate::error::FuzzyError;
use crate::outputs::CrispOutput;
use crate::valve::ValveController;

/// A periodic setpoint schedule: step `i` reads entry `i % len`.
pub struct Setpoints(Vec<f64>);

impl Setpoints {
    pub fn periodic(values: Vec<f64>) -> Result<Self, FuzzyError> {
        if values.is_empty() {
            return Err(FuzzyError::EmptySetpoints);
        }

        Ok(Setpoints(values))
    }

    pub fn constant(value: f64) -> Self {
        Setpoints(vec![value])
    }

    pub fn at(&self, i: usize) -> f64 {
        self.0[i % self.0.len()]
    }
}

/// An explicit, named clamping choice for one state channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bound {
    Clamp { min: f64, max: f64 },
    Unbounded,
}

impl Bound {
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Clamp { min, max } => x.clamp(min, max),
            Self::Unbounded => x,
        }
    }
}

/// What to do when the controller reports an undefined output for a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UndefinedPolicy {
    /// Keep the previous state for the step.
    Hold,
    /// Abort the run with [`FuzzyError::UndefinedOutput`].
    Fail,
}

/// The recorded state trajectory of one run, one entry per step.
#[derive(Clone, Debug, Default)]
pub struct Trajectory {
    pub temperature: Vec<f64>,
    pub flow: Vec<f64>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }
}

/// The raw controller outputs of an open-loop sweep, one entry per step.
#[derive(Clone, Debug, Default)]
pub struct Response {
    pub cold: Vec<f64>,
    pub hot: Vec<f64>,
}

/// A closed-loop simulation run: controller, setpoint schedules, gains, and
/// bounds.
///
/// Defaults reproduce the reference scenario: initial state (15.0, 0.5),
/// temperature gain 30.0, flow clamped to `[0, 1]`, temperature unbounded,
/// and setpoint schedules stepping from (15, 0.5) to (30, 1.0). The
/// asymmetric bounds are deliberate configuration, not a hidden rule: flow
/// is a physical valve fraction, temperature is left free.
pub struct Simulation {
    controller: ValveController,
    temp_setpoints: Setpoints,
    flow_setpoints: Setpoints,
    initial_temp: f64,
    initial_flow: f64,
    temp_gain: f64,
    temp_bound: Bound,
    flow_bound: Bound,
    undefined_policy: UndefinedPolicy,
}

impl Simulation {
    pub fn new(controller: ValveController) -> Self {
        Self {
            controller,
            temp_setpoints: Setpoints(vec![
                15., 15., 15., 15., 15., 15., 15., 30., 30., 30., 30., 30., 30., 30.,
            ]),
            flow_setpoints: Setpoints(vec![
                0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 1., 1., 1., 1., 1., 1., 1., 1.,
            ]),
            initial_temp: 15.,
            initial_flow: 0.5,
            temp_gain: 30.,
            temp_bound: Bound::Unbounded,
            flow_bound: Bound::Clamp { min: 0., max: 1. },
            undefined_policy: UndefinedPolicy::Hold,
        }
    }

    pub fn with_setpoints(mut self, temperature: Setpoints, flow: Setpoints) -> Self {
        self.temp_setpoints = temperature;
        self.flow_setpoints = flow;
        self
    }

    pub fn with_initial(mut self, temperature: f64, flow: f64) -> Self {
        self.initial_temp = temperature;
        self.initial_flow = flow;
        self
    }

    pub fn with_temperature_gain(mut self, gain: f64) -> Self {
        self.temp_gain = gain;
        self
    }

    pub fn with_bounds(mut self, temperature: Bound, flow: Bound) -> Self {
        self.temp_bound = temperature;
        self.flow_bound = flow;
        self
    }

    pub fn with_undefined_policy(mut self, policy: UndefinedPolicy) -> Self {
        self.undefined_policy = policy;
        self
    }

    /// Runs `steps` closed-loop steps and records the state trajectory.
    ///
    /// The first entry is the initial state; each later step feeds the
    /// setpoint errors through the controller and integrates `cold - hot`
    /// into both channels (scaled by the temperature gain for the
    /// temperature channel).
    pub fn run(&self, steps: usize) -> Result<Trajectory, FuzzyError> {
        let mut trajectory = Trajectory::default();

        if steps == 0 {
            return Ok(trajectory);
        }

        trajectory.temperature.push(self.initial_temp);
        trajectory.flow.push(self.initial_flow);

        for i in 1..steps {
            let prev_temp = trajectory.temperature[i - 1];
            let prev_flow = trajectory.flow[i - 1];
            let temp_error = self.temp_setpoints.at(i) - prev_temp;
            let flow_error = self.flow_setpoints.at(i) - prev_flow;
            let outputs = self.controller.compute(temp_error, flow_error)?;

            let (cold, hot) = match (self.controller.cold(&outputs), self.controller.hot(&outputs)) {
                (CrispOutput::Value(cold), CrispOutput::Value(hot)) => (cold, hot),
                (cold, _) => match self.undefined_policy {
                    UndefinedPolicy::Hold => {
                        trajectory.temperature.push(prev_temp);
                        trajectory.flow.push(prev_flow);
                        continue;
                    }
                    UndefinedPolicy::Fail => {
                        let variable = if cold.is_undefined() { "cold" } else { "hot" };

                        return Err(FuzzyError::UndefinedOutput {
                            variable: variable.into(),
                        });
                    }
                },
            };

            let adjustment = cold - hot;

            trajectory
                .temperature
                .push(self.temp_bound.apply(prev_temp + adjustment * self.temp_gain));
            trajectory.flow.push(self.flow_bound.apply(prev_flow + adjustment));
        }

        Ok(trajectory)
    }

    /// Runs `steps` open-loop steps: the raw setpoints (not errors) are fed
    /// straight through the controller and its outputs recorded without
    /// feedback.
    pub fn sweep(&self, steps: usize) -> Result<Response, FuzzyError> {
        let mut response = Response::default();

        for i in 0..steps {
            let outputs = self
                .controller
                .compute(self.temp_setpoints.at(i), self.flow_setpoints.at(i))?;

            match (self.controller.cold(&outputs), self.controller.hot(&outputs)) {
                (CrispOutput::Value(cold), CrispOutput::Value(hot)) => {
                    response.cold.push(cold);
                    response.hot.push(hot);
                }
                (cold, _) => match (self.undefined_policy, response.cold.last(), response.hot.last()) {
                    (UndefinedPolicy::Hold, Some(&last_cold), Some(&last_hot)) => {
                        response.cold.push(last_cold);
                        response.hot.push(last_hot);
                    }
                    // Nothing to hold on the very first step
                    _ => {
                        let variable = if cold.is_undefined() { "cold" } else { "hot" };

                        return Err(FuzzyError::UndefinedOutput {
                            variable: variable.into(),
                        });
                    }
                },
            }
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::valve::{Cold, Flow, Hot, Temp};

    fn controller() -> ValveController {
        ValveController::new().unwrap()
    }

    #[test]
    fn empty_setpoint_schedules_are_rejected() {
        assert!(matches!(
            Setpoints::periodic(vec![]),
            Err(FuzzyError::EmptySetpoints)
        ));
        assert_eq!(Setpoints::periodic(vec![15., 30.]).unwrap().at(3), 30.);
    }

    #[test]
    fn trajectory_has_one_entry_per_step() {
        let sim = Simulation::new(controller());

        assert_eq!(sim.run(0).unwrap().len(), 0);
        assert_eq!(sim.run(1).unwrap().len(), 1);

        let trajectory = sim.run(50).unwrap();

        assert_eq!(trajectory.temperature.len(), 50);
        assert_eq!(trajectory.flow.len(), 50);
    }

    #[test]
    fn state_holds_at_the_setpoint() {
        let sim = Simulation::new(controller())
            .with_setpoints(Setpoints::constant(15.), Setpoints::constant(0.5));
        let trajectory = sim.run(30).unwrap();

        for (temp, flow) in trajectory.temperature.iter().zip(&trajectory.flow) {
            assert_abs_diff_eq!(*temp, 15., epsilon = 1e-3);
            assert_abs_diff_eq!(*flow, 0.5, epsilon = 1e-3);
        }
    }

    #[test]
    fn flow_saturates_at_the_upper_bound() {
        // Hot temperature error with soft flow error drives the flow up
        let sim = Simulation::new(controller())
            .with_setpoints(Setpoints::constant(100.), Setpoints::constant(-10.));
        let trajectory = sim.run(80).unwrap();

        assert!(trajectory.flow.iter().all(|f| (0. ..=1.).contains(f)));
    }

    #[test]
    fn flow_saturates_at_the_lower_bound() {
        // Cold temperature error with soft flow error drives the flow down
        let sim = Simulation::new(controller())
            .with_setpoints(Setpoints::constant(-100.), Setpoints::constant(-10.));
        let trajectory = sim.run(80).unwrap();

        assert!(trajectory.flow.iter().all(|f| (0. ..=1.).contains(f)));
    }

    #[test]
    fn default_scenario_stays_within_flow_bounds() {
        let sim = Simulation::new(controller());
        let trajectory = sim.run(200).unwrap();

        assert!(trajectory.flow.iter().all(|f| (0. ..=1.).contains(f)));
    }

    #[test]
    fn hold_policy_freezes_state_on_undefined_outputs() {
        // A one-rule controller that cannot fire for hot/hard conditions
        let partial =
            ValveController::with_rules([((Temp::Cold, Flow::Soft), (Cold::OpenSlow, Hot::OpenFast))])
                .unwrap();
        let sim = Simulation::new(partial)
            .with_setpoints(Setpoints::constant(100.), Setpoints::constant(10.))
            .with_undefined_policy(UndefinedPolicy::Hold);
        let trajectory = sim.run(10).unwrap();

        assert!(trajectory.temperature.iter().all(|t| *t == 15.));
        assert!(trajectory.flow.iter().all(|f| *f == 0.5));
    }

    #[test]
    fn fail_policy_surfaces_undefined_outputs() {
        let partial =
            ValveController::with_rules([((Temp::Cold, Flow::Soft), (Cold::OpenSlow, Hot::OpenFast))])
                .unwrap();
        let sim = Simulation::new(partial)
            .with_setpoints(Setpoints::constant(100.), Setpoints::constant(10.))
            .with_undefined_policy(UndefinedPolicy::Fail);

        assert!(matches!(
            sim.run(10),
            Err(FuzzyError::UndefinedOutput { .. })
        ));
    }

    #[test]
    fn temperature_can_be_bounded_too() {
        let sim = Simulation::new(controller())
            .with_initial(20., 0.2)
            .with_temperature_gain(10.)
            .with_setpoints(Setpoints::constant(100.), Setpoints::constant(-10.))
            .with_bounds(Bound::Clamp { min: 0., max: 40. }, Bound::Clamp { min: 0., max: 1. });
        let trajectory = sim.run(60).unwrap();

        assert_eq!(trajectory.temperature[0], 20.);
        assert_eq!(trajectory.flow[0], 0.2);
        assert!(trajectory.temperature.iter().all(|t| (0. ..=40.).contains(t)));
    }

    #[test]
    fn sweep_records_raw_outputs_per_step() {
        let sim = Simulation::new(controller())
            .with_setpoints(Setpoints::constant(15.), Setpoints::constant(0.5));
        let response = sim.sweep(5).unwrap();

        assert_eq!(response.cold.len(), 5);
        assert_eq!(response.hot.len(), 5);
        // Raw (15, 0.5) inputs fire only hot/hard; both valves close
        for (cold, hot) in response.cold.iter().zip(&response.hot) {
            assert_abs_diff_eq!(*cold, -0.3, epsilon = 1e-3);
            assert_abs_diff_eq!(*hot, -0.63673, epsilon = 1e-3);
        }
    }
}
