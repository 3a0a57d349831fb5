use thiserror::Error;

/// Failure conditions surfaced by configuration and inference.
///
/// Configuration errors are detected eagerly when shapes, variables, or rules
/// are constructed and always name the offending identifier. The only runtime
/// errors are input-coverage mismatches at the start of an inference call and,
/// in the simulation loop, an undefined consequent under
/// [`UndefinedPolicy::Fail`](crate::sim::UndefinedPolicy).
#[derive(Debug, Error)]
pub enum FuzzyError {
    #[error("membership breakpoints {points:?} contain a non-finite value")]
    NonFiniteBreakpoints { points: Vec<f64> },

    #[error("membership breakpoints {points:?} are not monotonically non-decreasing")]
    NonMonotonicBreakpoints { points: Vec<f64> },

    #[error("universe of variable `{variable}` must have a positive step and a lower bound below its upper bound")]
    InvalidUniverse { variable: String },

    #[error("term {term} of variable `{variable}` has breakpoints outside the universe")]
    BreakpointOutOfUniverse { variable: String, term: String },

    #[error("rule references unknown term {term} of variable `{variable}`")]
    UnknownTerm { variable: String, term: String },

    #[error("setpoint schedule must contain at least one value")]
    EmptySetpoints,

    #[error("no crisp input supplied for antecedent `{variable}`")]
    MissingInput { variable: String },

    #[error("input supplied for `{variable}`, which is not an antecedent of any rule")]
    InputNotAntecedent { variable: String },

    #[error("no rule fired with nonzero strength for consequent `{variable}`")]
    UndefinedOutput { variable: String },
}
