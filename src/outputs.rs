use std::collections::HashMap;

use crate::variable::{Variable, VariableKey};

/// The crisp result for one consequent variable.
///
/// `Undefined` means no rule fired with nonzero strength for the variable.
/// The condition is reported explicitly instead of fabricating a zero; the
/// caller decides how to recover.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CrispOutput {
    Value(f64),
    Undefined,
}

impl CrispOutput {
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Undefined => None,
        }
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }
}

/// One consequent's aggregate fuzzy set, sampled over its universe.
#[derive(Clone, Debug)]
pub struct AggregateSet {
    pub universe: Vec<f64>,
    pub membership: Vec<f64>,
}

/// Everything one inference call produced: per-rule firing strengths, the
/// aggregate fuzzy set per consequent, and the defuzzified crisp values.
///
/// The intermediate data is kept so plotting consumers can render the fired
/// membership functions, not just the final scalars.
#[derive(Debug)]
pub struct Outputs {
    firing_strengths: Vec<f64>,
    aggregates: HashMap<VariableKey, AggregateSet>,
    crisp: HashMap<VariableKey, CrispOutput>,
}

impl Outputs {
    pub(crate) fn new(
        firing_strengths: Vec<f64>,
        aggregates: HashMap<VariableKey, AggregateSet>,
        crisp: HashMap<VariableKey, CrispOutput>,
    ) -> Self {
        Self {
            firing_strengths,
            aggregates,
            crisp,
        }
    }

    /// Per-rule firing strengths, in rule declaration order.
    pub fn firing_strengths(&self) -> &[f64] {
        &self.firing_strengths
    }

    /// The aggregate fuzzy set of a consequent, or `None` if the variable is
    /// not targeted by any rule.
    pub fn aggregate<I>(&self, var: Variable<I>) -> Option<&AggregateSet> {
        self.aggregates.get(&var.0)
    }

    /// The crisp output of a consequent, or `None` if the variable is not
    /// targeted by any rule.
    pub fn crisp<I>(&self, var: Variable<I>) -> Option<CrispOutput> {
        self.crisp.get(&var.0).copied()
    }
}
