use std::collections::HashMap;

use crate::variable::{Variable, VariableKey};

/// The crisp input values of one inference call, keyed by antecedent
/// variable.
///
/// Built fresh by the caller for every call; never shared across calls.
#[derive(Default)]
pub struct Inputs(pub(crate) HashMap<VariableKey, f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(HashMap::new())
    }

    pub fn add<I>(&mut self, var: Variable<I>, val: f64) {
        self.0.insert(var.0, val);
    }
}
