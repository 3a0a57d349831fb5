use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use crate::dsl::Expr;
use crate::error::FuzzyError;
use crate::inputs::Inputs;
use crate::ops::{AggregationOp, AndOp, DefuzzOp, ImplicationOp, OrOp};
use crate::outputs::{AggregateSet, CrispOutput, Outputs};
use crate::rules::Rules;
use crate::variable::{VariableKey, Variables};

/// A Mamdani-style fuzzy inference engine.
///
/// The engine holds only its operator configuration; each [`eval`] call is a
/// pure function of the (shared, immutable) variables and rules plus the
/// per-call inputs, so one engine can serve any number of independent
/// sessions.
///
/// [`eval`]: MamdaniInference::eval
pub struct MamdaniInference {
    and_op: AndOp,
    or_op: OrOp,
    imp_op: ImplicationOp,
    agg_op: AggregationOp,
    defuzz_op: DefuzzOp,
}

impl Default for MamdaniInference {
    /// min/max premise folding, min implication, max aggregation, centroid
    /// defuzzification.
    fn default() -> Self {
        Self::new(
            AndOp::Min,
            OrOp::Max,
            ImplicationOp::Min,
            AggregationOp::Max,
            DefuzzOp::Centroid,
        )
    }
}

impl MamdaniInference {
    pub fn new(
        and_op: AndOp,
        or_op: OrOp,
        imp_op: ImplicationOp,
        agg_op: AggregationOp,
        defuzz_op: DefuzzOp,
    ) -> Self {
        Self {
            and_op,
            or_op,
            imp_op,
            agg_op,
            defuzz_op,
        }
    }

    /// Runs one inference step: crisp inputs in, crisp outputs (plus the
    /// inspectable intermediates) out.
    pub fn eval<T: Eq + Hash + fmt::Debug>(
        &self,
        vars: &Variables<T>,
        rules: &Rules<T>,
        inputs: &Inputs,
    ) -> Result<Outputs, FuzzyError> {
        // Check input coverage: every premise leaf needs a crisp value, and
        // every supplied value must be an antecedent of some rule
        let mut antecedents = HashSet::new();

        for rule in &rules.0 {
            for prop in rule.premise.propositions() {
                antecedents.insert(prop.var);

                if !inputs.0.contains_key(&prop.var) {
                    return Err(FuzzyError::MissingInput {
                        variable: vars.0[prop.var].name.clone(),
                    });
                }
            }
        }

        for key in inputs.0.keys() {
            if !antecedents.contains(key) {
                return Err(FuzzyError::InputNotAntecedent {
                    variable: vars.0[*key].name.clone(),
                });
            }
        }

        // Evaluate rule firing strengths
        let firing_strengths: Vec<f64> = rules
            .0
            .iter()
            .map(|rule| self.strength(&rule.premise, vars, inputs))
            .collect();

        // Implication and aggregation per consequent variable
        let mut aggregated: HashMap<VariableKey, Vec<f64>> = HashMap::new();

        for (rule, strength) in rules.0.iter().zip(firing_strengths.iter().copied()) {
            for prop in &rule.consequence {
                let sampled = &vars.0[prop.var].terms[&prop.term].sampled;
                let clipped = self.imp_op.call(strength, sampled.iter().copied());
                let agg = aggregated
                    .entry(prop.var)
                    .or_insert_with(|| vec![0.; sampled.len()]);
                let merged: Vec<f64> = self.agg_op.call(agg.iter().copied(), clipped).collect();

                *agg = merged;
            }
        }

        // Defuzzificate
        let mut aggregates = HashMap::with_capacity(aggregated.len());
        let mut crisp = HashMap::with_capacity(aggregated.len());

        for (key, membership) in aggregated {
            let def = &vars.0[key];
            let output = if membership.iter().all(|m| *m == 0.) {
                CrispOutput::Undefined
            } else {
                CrispOutput::Value(self.defuzz_op.call(&def.universe, &membership))
            };

            crisp.insert(key, output);
            aggregates.insert(
                key,
                AggregateSet {
                    universe: def.universe.clone(),
                    membership,
                },
            );
        }

        Ok(Outputs::new(firing_strengths, aggregates, crisp))
    }

    fn strength<T: Eq + Hash + fmt::Debug>(
        &self,
        expr: &Expr<T>,
        vars: &Variables<T>,
        inputs: &Inputs,
    ) -> f64 {
        match expr {
            Expr::Leaf(prop) => {
                let def = &vars.0[prop.var];
                // Crisp inputs saturate at the universe edges
                let x = inputs.0[&prop.var].clamp(def.min_u, def.max_u);

                def.terms[&prop.term].shape.eval(x)
            }
            Expr::And(exprs) => exprs
                .iter()
                .map(|expr| self.strength(expr, vars, inputs))
                .fold(1., |u, v| self.and_op.apply(u, v)),
            Expr::Or(exprs) => exprs
                .iter()
                .map(|expr| self.strength(expr, vars, inputs))
                .fold(0., |u, v| self.or_op.apply(u, v)),
            Expr::Not(expr) => 1. - self.strength(expr, vars, inputs),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use fixed_map::Key;

    use super::*;
    use crate::membership::Shape;
    use crate::terms::Terms;
    use crate::variable::Variable;

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    enum Error {
        Low,
        High,
    }

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    enum Power {
        Small,
        Large,
    }

    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    enum FanTerm {
        Error(Error),
        Power(Power),
    }

    impl From<Error> for FanTerm {
        fn from(e: Error) -> Self {
            Self::Error(e)
        }
    }

    impl From<Power> for FanTerm {
        fn from(p: Power) -> Self {
            Self::Power(p)
        }
    }

    struct Fan {
        vars: Variables<FanTerm>,
        rules: Rules<FanTerm>,
        error: Variable<Error>,
        power: Variable<Power>,
    }

    // A deliberately gappy rule base: neither error term covers (4, 6), so
    // inputs there leave the power output undefined
    fn fan() -> Fan {
        let mut vars = Variables::new();
        let mut error_terms = Terms::new();
        let mut power_terms = Terms::new();

        error_terms.insert(Error::Low, Shape::trapezoid([0., 0., 2., 4.]).unwrap());
        error_terms.insert(Error::High, Shape::trapezoid([6., 8., 10., 10.]).unwrap());
        power_terms.insert(Power::Small, Shape::triangle([0., 2., 4.]).unwrap());
        power_terms.insert(Power::Large, Shape::triangle([6., 8., 10.]).unwrap());

        let error = vars.add("error", 0. ..=10., error_terms, Some(0.01)).unwrap();
        let power = vars.add("power", 0. ..=10., power_terms, Some(0.01)).unwrap();
        let mut rules = Rules::new();

        rules.add(&vars, error.is(Error::Low), [power.is(Power::Small)]).unwrap();
        rules.add(&vars, error.is(Error::High), [power.is(Power::Large)]).unwrap();

        Fan {
            vars,
            rules,
            error,
            power,
        }
    }

    fn eval(fan: &Fan, input: f64) -> Outputs {
        let model = MamdaniInference::default();
        let mut inputs = Inputs::new();

        inputs.add(fan.error, input);
        model.eval(&fan.vars, &fan.rules, &inputs).unwrap()
    }

    #[test]
    fn crisp_output_follows_the_fired_rule() {
        let fan = fan();
        let outputs = eval(&fan, 1.);

        assert_eq!(outputs.firing_strengths(), &[1., 0.]);

        let power = outputs.crisp(fan.power).unwrap().value().unwrap();

        assert_relative_eq!(power, 2., epsilon = 1e-6);
    }

    #[test]
    fn unfired_consequent_is_undefined_not_zero() {
        let fan = fan();
        let outputs = eval(&fan, 5.);

        assert_eq!(outputs.firing_strengths(), &[0., 0.]);
        assert_eq!(outputs.crisp(fan.power), Some(CrispOutput::Undefined));

        // The aggregate set is still exposed, all zero
        let aggregate = outputs.aggregate(fan.power).unwrap();

        assert!(aggregate.membership.iter().all(|m| *m == 0.));
    }

    #[test]
    fn querying_a_non_consequent_yields_none() {
        let fan = fan();
        let outputs = eval(&fan, 1.);

        assert!(outputs.crisp(fan.error).is_none());
        assert!(outputs.aggregate(fan.error).is_none());
    }

    #[test]
    fn eval_is_deterministic() {
        let fan = fan();
        let a = eval(&fan, 7.3);
        let b = eval(&fan, 7.3);

        assert_eq!(a.firing_strengths(), b.firing_strengths());
        assert_eq!(
            a.crisp(fan.power).unwrap().value(),
            b.crisp(fan.power).unwrap().value()
        );
    }

    #[test]
    fn inputs_saturate_at_universe_edges() {
        let fan = fan();
        let outputs = eval(&fan, 25.);

        assert_eq!(outputs.firing_strengths(), &[0., 1.]);

        let power = outputs.crisp(fan.power).unwrap().value().unwrap();

        assert_relative_eq!(power, 8., epsilon = 1e-6);
    }

    #[test]
    fn negated_premises_complement_the_membership() {
        let fan = fan();
        let mut rules = Rules::new();

        rules
            .add(&fan.vars, fan.error.is(Error::Low).not(), [fan.power.is(Power::Large)])
            .unwrap();

        let model = MamdaniInference::default();
        let mut inputs = Inputs::new();

        inputs.add(fan.error, 3.);

        let outputs = model.eval(&fan.vars, &rules, &inputs).unwrap();

        // Low membership at 3.0 is 0.5, so NOT Low fires at 0.5
        assert_relative_eq!(outputs.firing_strengths()[0], 0.5);
    }

    #[test]
    fn missing_and_unbound_inputs_are_rejected() {
        let fan = fan();
        let model = MamdaniInference::default();
        let empty = Inputs::new();

        assert!(matches!(
            model.eval(&fan.vars, &fan.rules, &empty),
            Err(FuzzyError::MissingInput { .. })
        ));

        let mut inputs = Inputs::new();

        inputs.add(fan.error, 1.);
        inputs.add(fan.power, 1.);

        assert!(matches!(
            model.eval(&fan.vars, &fan.rules, &inputs),
            Err(FuzzyError::InputNotAntecedent { .. })
        ));
    }

    #[test]
    fn conjunction_and_disjunction_fold_firing_strengths() {
        let fan = fan();
        let mut rules = Rules::new();

        rules
            .add(
                &fan.vars,
                fan.error.is(Error::Low).and(fan.error.is(Error::High)),
                [fan.power.is(Power::Small)],
            )
            .unwrap();
        rules
            .add(
                &fan.vars,
                fan.error.is(Error::Low).or(fan.error.is(Error::High)),
                [fan.power.is(Power::Large)],
            )
            .unwrap();

        let model = MamdaniInference::default();
        let mut inputs = Inputs::new();

        inputs.add(fan.error, 3.);

        let outputs = model.eval(&fan.vars, &rules, &inputs).unwrap();

        // Low = 0.5, High = 0.0 at 3.0
        assert_eq!(outputs.firing_strengths(), &[0., 0.5]);
    }
}
