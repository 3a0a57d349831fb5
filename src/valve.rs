//! The mixing-valve controller: two error inputs (temperature, flow), two
//! valve-adjustment outputs (cold, hot), and the fixed nine-rule base
//! covering the full cross-product of temperature and flow conditions.

use fixed_map::Key;

use crate::error::FuzzyError;
use crate::inference::MamdaniInference;
use crate::inputs::Inputs;
use crate::membership::Shape;
use crate::outputs::{CrispOutput, Outputs};
use crate::rules::Rules;
use crate::terms::{Term, Terms};
use crate::variable::{Variable, Variables};

/// Universe resolution for every controller variable.
const STEP: f64 = 0.001;

#[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
pub enum Temp {
    Cold,
    Good,
    Hot,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
pub enum Flow {
    Soft,
    Good,
    Hard,
}

/// Cold-valve adjustment terms, over the normalized range -1..=1.
#[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
pub enum Cold {
    OpenFast,
    OpenSlow,
    Steady,
    CloseSlow,
    CloseFast,
}

/// Hot-valve adjustment terms, over the normalized range -1..=1.
#[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
pub enum Hot {
    OpenFast,
    OpenSlow,
    Steady,
    CloseSlow,
    CloseFast,
}

/// All controller terms, flattened into one registry key type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ValveTerm {
    Temp(Temp),
    Flow(Flow),
    Cold(Cold),
    Hot(Hot),
}

impl From<Temp> for ValveTerm {
    fn from(t: Temp) -> Self {
        Self::Temp(t)
    }
}

impl From<Flow> for ValveTerm {
    fn from(f: Flow) -> Self {
        Self::Flow(f)
    }
}

impl From<Cold> for ValveTerm {
    fn from(c: Cold) -> Self {
        Self::Cold(c)
    }
}

impl From<Hot> for ValveTerm {
    fn from(h: Hot) -> Self {
        Self::Hot(h)
    }
}

/// The rule base as data: one entry per `(temperature, flow)` condition,
/// mapping to a `(cold, hot)` adjustment pair.
pub const RULE_TABLE: [((Temp, Flow), (Cold, Hot)); 9] = [
    ((Temp::Cold, Flow::Soft), (Cold::OpenSlow, Hot::OpenFast)),
    ((Temp::Cold, Flow::Good), (Cold::CloseSlow, Hot::OpenSlow)),
    ((Temp::Cold, Flow::Hard), (Cold::CloseFast, Hot::CloseSlow)),
    ((Temp::Good, Flow::Soft), (Cold::OpenSlow, Hot::OpenSlow)),
    ((Temp::Good, Flow::Good), (Cold::Steady, Hot::Steady)),
    ((Temp::Good, Flow::Hard), (Cold::CloseSlow, Hot::CloseSlow)),
    ((Temp::Hot, Flow::Soft), (Cold::OpenFast, Hot::OpenSlow)),
    ((Temp::Hot, Flow::Good), (Cold::OpenSlow, Hot::CloseSlow)),
    ((Temp::Hot, Flow::Hard), (Cold::CloseSlow, Hot::CloseFast)),
];

/// A fully configured controller: variables, rule base, and engine, built
/// once and immutable afterward.
pub struct ValveController {
    vars: Variables<ValveTerm>,
    rules: Rules<ValveTerm>,
    engine: MamdaniInference,
    temperature: Variable<Temp>,
    flow: Variable<Flow>,
    cold: Variable<Cold>,
    hot: Variable<Hot>,
}

impl ValveController {
    /// Builds the controller with the standard [`RULE_TABLE`].
    pub fn new() -> Result<Self, FuzzyError> {
        Self::with_rules(RULE_TABLE)
    }

    /// Builds the controller with an alternate rule table over the same
    /// variables and terms.
    pub fn with_rules(
        table: impl IntoIterator<Item = ((Temp, Flow), (Cold, Hot))>,
    ) -> Result<Self, FuzzyError> {
        let mut vars = Variables::new();

        let mut temp_terms = Terms::new();
        temp_terms.insert(Temp::Cold, Shape::trapezoid([-20., -20., -15., 0.])?);
        temp_terms.insert(Temp::Good, Shape::triangle([-10., 0., 10.])?);
        temp_terms.insert(Temp::Hot, Shape::trapezoid([0., 15., 20., 20.])?);
        let temperature = vars.add("temperature", -20. ..=20., temp_terms, Some(STEP))?;

        let mut flow_terms = Terms::new();
        flow_terms.insert(Flow::Soft, Shape::trapezoid([-1., -1., -0.8, 0.])?);
        flow_terms.insert(Flow::Good, Shape::triangle([-0.4, 0., 0.4])?);
        flow_terms.insert(Flow::Hard, Shape::trapezoid([0., 0.8, 1., 1.])?);
        let flow = vars.add("flow", -1. ..=1., flow_terms, Some(STEP))?;

        let cold = vars.add(
            "cold",
            -1. ..=1.,
            adjustment_terms(
                Cold::OpenFast,
                Cold::OpenSlow,
                Cold::Steady,
                Cold::CloseSlow,
                Cold::CloseFast,
            )?,
            Some(STEP),
        )?;
        let hot = vars.add(
            "hot",
            -1. ..=1.,
            adjustment_terms(
                Hot::OpenFast,
                Hot::OpenSlow,
                Hot::Steady,
                Hot::CloseSlow,
                Hot::CloseFast,
            )?,
            Some(STEP),
        )?;

        let mut rules = Rules::with_capacity(RULE_TABLE.len());

        for ((t, f), (c, h)) in table {
            rules.add(&vars, temperature.is(t).and(flow.is(f)), [cold.is(c), hot.is(h)])?;
        }

        Ok(Self {
            vars,
            rules,
            engine: MamdaniInference::default(),
            temperature,
            flow,
            cold,
            hot,
        })
    }

    /// One inference step over crisp `(temperature, flow)` inputs.
    pub fn compute(&self, temperature: f64, flow: f64) -> Result<Outputs, FuzzyError> {
        let mut inputs = Inputs::new();

        inputs.add(self.temperature, temperature);
        inputs.add(self.flow, flow);
        self.engine.eval(&self.vars, &self.rules, &inputs)
    }

    /// The cold-valve adjustment of one inference step.
    pub fn cold(&self, outputs: &Outputs) -> CrispOutput {
        outputs.crisp(self.cold).unwrap_or(CrispOutput::Undefined)
    }

    /// The hot-valve adjustment of one inference step.
    pub fn hot(&self, outputs: &Outputs) -> CrispOutput {
        outputs.crisp(self.hot).unwrap_or(CrispOutput::Undefined)
    }

    /// The variable registry, for plotting membership functions.
    pub fn variables(&self) -> &Variables<ValveTerm> {
        &self.vars
    }

    pub fn temperature_var(&self) -> Variable<Temp> {
        self.temperature
    }

    pub fn flow_var(&self) -> Variable<Flow> {
        self.flow
    }

    pub fn cold_var(&self) -> Variable<Cold> {
        self.cold
    }

    pub fn hot_var(&self) -> Variable<Hot> {
        self.hot
    }
}

/// Cold and hot share the same five adjustment shapes.
fn adjustment_terms<K: Term>(
    open_fast: K,
    open_slow: K,
    steady: K,
    close_slow: K,
    close_fast: K,
) -> Result<Terms<K>, FuzzyError> {
    let mut terms = Terms::new();

    terms.insert(open_fast, Shape::triangle([0.3, 0.6, 1.])?);
    terms.insert(open_slow, Shape::triangle([0., 0.3, 0.6])?);
    terms.insert(steady, Shape::triangle([-0.2, 0., 0.2])?);
    terms.insert(close_slow, Shape::triangle([-0.6, -0.3, 0.])?);
    terms.insert(close_fast, Shape::triangle([-1., -0.6, -0.3])?);

    Ok(terms)
}
