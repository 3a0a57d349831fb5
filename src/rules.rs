use std::fmt;
use std::hash::Hash;

use crate::dsl::{Expr, Proposition};
use crate::error::FuzzyError;
use crate::variable::Variables;

/// An ordered rule base. Rule order is preserved and indexes the per-rule
/// firing strengths of [`Outputs`](crate::Outputs).
#[derive(Default)]
pub struct Rules<T>(pub(crate) Vec<Rule<T>>);

impl<T: Eq + Hash + fmt::Debug> Rules<T> {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    /// Adds a rule mapping a premise expression to one or more consequent
    /// terms.
    ///
    /// Every `(variable, term)` pair the rule references must exist in
    /// `vars`; a dangling reference is rejected here, never during
    /// evaluation.
    pub fn add(
        &mut self,
        vars: &Variables<T>,
        premise: impl Into<Expr<T>>,
        consequence: impl IntoIterator<Item = Proposition<T>>,
    ) -> Result<(), FuzzyError> {
        let premise = premise.into();
        let consequence: Vec<_> = consequence.into_iter().collect();

        for prop in premise.propositions() {
            vars.check_term(prop.var, &prop.term)?;
        }
        for prop in &consequence {
            vars.check_term(prop.var, &prop.term)?;
        }

        self.0.push(Rule { premise, consequence });

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub(crate) struct Rule<T> {
    pub(crate) premise: Expr<T>,
    pub(crate) consequence: Vec<Proposition<T>>,
}
