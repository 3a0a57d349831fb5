use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::{hash::Hash, ops::RangeInclusive};

use fixed_map::Key as FixedKey;
use slotmap::{new_key_type, SlotMap};

use crate::error::FuzzyError;
use crate::linspace::Linspace;
use crate::membership::Shape;
use crate::terms::Terms;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// A cheap, copyable handle to a registered variable, typed by its term enum.
pub struct Variable<I>(pub(crate) VariableKey, PhantomData<I>);

impl<I> Clone for Variable<I> {
    fn clone(&self) -> Self {
        Variable(self.0, PhantomData)
    }
}

impl<I> Copy for Variable<I> {}

// Manual impl so `I` itself does not need `Debug`
impl<I> fmt::Debug for Variable<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Variable").field(&self.0).finish()
    }
}

/// The registry of all linguistic variables of one controller configuration.
///
/// `T` is the flattened term enum covering every variable's terms. The
/// registry is built once at startup and immutable afterward; inference only
/// ever reads it, so one registry can back any number of concurrent sessions.
#[derive(Default)]
pub struct Variables<T>(pub(crate) SlotMap<VariableKey, VariableDef<T>>);

impl<T: Eq + Hash + fmt::Debug> Variables<T> {
    pub fn new() -> Self {
        Self(SlotMap::with_key())
    }

    /// Registers a variable over `universe_range`, discretized at `step`
    /// (default 0.1), with one membership function shape per term.
    ///
    /// Every term's breakpoints must lie within the universe; violations are
    /// rejected here, never at evaluation time.
    pub fn add<I: Into<T> + FixedKey + 'static>(
        &mut self,
        name: impl Into<String>,
        universe_range: RangeInclusive<f64>,
        terms: Terms<I>,
        step: Option<f64>,
    ) -> Result<Variable<I>, FuzzyError> {
        let shapes = terms.0.iter().map(|(k, shape)| (k.into(), *shape));
        let def = VariableDef::new(name.into(), universe_range, shapes, step.unwrap_or(0.1))?;

        Ok(Variable(self.0.insert(def), PhantomData))
    }

    /// The discretized universe of a variable, for plotting membership
    /// functions and aggregates.
    pub fn universe<I>(&self, var: Variable<I>) -> &[f64] {
        &self.0[var.0].universe
    }

    pub fn name<I>(&self, var: Variable<I>) -> &str {
        &self.0[var.0].name
    }

    /// A term's membership function sampled over the variable's universe.
    pub fn term_membership<I: Into<T>>(&self, var: Variable<I>, term: I) -> Option<&[f64]> {
        self.0[var.0].terms.get(&term.into()).map(|def| def.sampled.as_slice())
    }

    pub(crate) fn check_term(&self, key: VariableKey, term: &T) -> Result<(), FuzzyError> {
        let def = &self.0[key];

        if def.terms.contains_key(term) {
            Ok(())
        } else {
            Err(FuzzyError::UnknownTerm {
                variable: def.name.clone(),
                term: format!("{term:?}"),
            })
        }
    }
}

pub(crate) struct VariableDef<T> {
    pub(crate) name: String,
    pub(crate) universe: Vec<f64>,
    pub(crate) min_u: f64,
    pub(crate) max_u: f64,
    pub(crate) terms: HashMap<T, TermDef>,
}

pub(crate) struct TermDef {
    pub(crate) shape: Shape,
    pub(crate) sampled: Vec<f64>,
}

impl<T: Eq + Hash + fmt::Debug> VariableDef<T> {
    fn new(
        name: String,
        universe_range: RangeInclusive<f64>,
        shapes: impl IntoIterator<Item = (T, Shape)>,
        step: f64,
    ) -> Result<Self, FuzzyError> {
        let min_u = *universe_range.start();
        let max_u = *universe_range.end();

        if !(step > 0. && step.is_finite() && min_u < max_u) {
            return Err(FuzzyError::InvalidUniverse { variable: name });
        }

        // floor is closest approx to what python does for int() conversion. But at least one edgecase exists
        // where the decimals are really long: int(4.999999999999999999) == 5
        let num = ((max_u - min_u) / step).floor() as usize + 1;
        let universe: Vec<f64> = Linspace::new(min_u, max_u, num).collect();
        let mut terms = HashMap::new();

        for (term, shape) in shapes {
            let in_bounds = shape.breakpoints().iter().all(|p| (min_u..=max_u).contains(p));

            if !in_bounds {
                return Err(FuzzyError::BreakpointOutOfUniverse {
                    variable: name,
                    term: format!("{term:?}"),
                });
            }

            let sampled = shape.sample(&universe);

            terms.insert(term, TermDef { shape, sampled });
        }

        Ok(Self {
            name,
            universe,
            min_u,
            max_u,
            terms,
        })
    }
}

#[cfg(test)]
mod tests {
    use fixed_map::Key;

    use super::*;

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    enum Pressure {
        Low,
        High,
    }

    fn pressure_terms() -> Terms<Pressure> {
        let mut terms = Terms::new();

        terms.insert(Pressure::Low, Shape::trapezoid([0., 0., 2., 4.]).unwrap());
        terms.insert(Pressure::High, Shape::trapezoid([6., 8., 10., 10.]).unwrap());
        terms
    }

    #[test]
    fn universe_is_discretized_over_the_full_range() {
        let mut vars = Variables::<Pressure>::new();
        let pressure = vars.add("pressure", 0. ..=10., pressure_terms(), Some(0.1)).unwrap();
        let universe = vars.universe(pressure);

        assert_eq!(universe.len(), 101);
        assert_eq!(universe[0], 0.);
        assert_eq!(universe[100], 10.);
    }

    #[test]
    fn term_memberships_are_sampled_at_registration() {
        let mut vars = Variables::<Pressure>::new();
        let pressure = vars.add("pressure", 0. ..=10., pressure_terms(), Some(1.)).unwrap();
        let low = vars.term_membership(pressure, Pressure::Low).unwrap();

        assert_eq!(low, &[1., 1., 1., 0.5, 0., 0., 0., 0., 0., 0., 0.]);
    }

    #[test]
    fn variable_handles_are_copy_and_debug() {
        let mut vars = Variables::<Pressure>::new();
        let pressure = vars.add("pressure", 0. ..=10., pressure_terms(), None).unwrap();
        let copy = pressure;

        assert_eq!(vars.name(copy), "pressure");
        assert!(format!("{pressure:?}").starts_with("Variable"));
    }

    #[test]
    fn invalid_universes_are_rejected() {
        let mut vars = Variables::<Pressure>::new();

        assert!(matches!(
            vars.add("pressure", 0. ..=10., pressure_terms(), Some(-0.1)),
            Err(FuzzyError::InvalidUniverse { .. })
        ));
        assert!(matches!(
            vars.add("pressure", 10. ..=0., pressure_terms(), None),
            Err(FuzzyError::InvalidUniverse { .. })
        ));
    }

    #[test]
    fn out_of_universe_breakpoints_are_rejected() {
        let mut vars = Variables::<Pressure>::new();
        let err = vars.add("pressure", 0. ..=8., pressure_terms(), None).unwrap_err();

        match err {
            FuzzyError::BreakpointOutOfUniverse { variable, term } => {
                assert_eq!(variable, "pressure");
                assert_eq!(term, "High");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
