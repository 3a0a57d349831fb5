//! Mamdani-style fuzzy inference for a mixing-valve process.
//!
//! Two crisp error signals (temperature, flow) are mapped through a fixed
//! nine-rule base to two crisp valve adjustments (cold, hot), and a
//! discrete-time simulation loop feeds the controller's own output back as
//! the next step's input.
//!
//! The building blocks are reusable on their own: variables with validated
//! piecewise-linear membership functions ([`Variables`], [`Shape`]), an
//! expression tree of rule premises ([`Expr`]), an ordered rule base
//! ([`Rules`]), and the engine itself ([`MamdaniInference`]). The
//! mixing-valve configuration lives in [`valve`] and the closed-loop driver
//! in [`sim`].
//!
//! ```
//! use fuzzy_mixer::{CrispOutput, ValveController};
//!
//! let controller = ValveController::new()?;
//! let outputs = controller.compute(15., 0.5)?;
//!
//! if let CrispOutput::Value(cold) = controller.cold(&outputs) {
//!     assert!(cold < 0.); // too hot: close the cold valve
//! }
//! # Ok::<(), fuzzy_mixer::FuzzyError>(())
//! ```

mod dsl;
mod error;
mod inference;
mod inputs;
mod linspace;
mod math;
mod membership;
mod ops;
mod outputs;
mod rules;
pub mod sim;
mod terms;
pub mod valve;
mod variable;

pub use dsl::{Expr, Proposition};
pub use error::FuzzyError;
pub use inference::MamdaniInference;
pub use inputs::Inputs;
pub use membership::Shape;
pub use ops::{AggregationOp, AndOp, DefuzzOp, ImplicationOp, OrOp};
pub use outputs::{AggregateSet, CrispOutput, Outputs};
pub use rules::Rules;
pub use sim::{Bound, Response, Setpoints, Simulation, Trajectory, UndefinedPolicy};
pub use terms::{Key, Term, Terms};
pub use valve::ValveController;
pub use variable::{Variable, VariableKey, Variables};
