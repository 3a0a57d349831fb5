use std::iter::Sum;
use std::ops::AddAssign;

use num::Float;

use crate::math::interp;

/// And operator method for combining the firing strengths of propositions
/// in a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AndOp {
    /// Zadeh intersection
    #[default]
    Min,
    /// Product t-norm
    Prod,
}

impl AndOp {
    pub fn apply<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Min => F::min(u, v),
            Self::Prod => u * v,
        }
    }
}

/// Or operator method for combining the firing strengths of propositions
/// in a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrOp {
    /// Zadeh union
    #[default]
    Max,
    /// Probabilistic sum
    ProbOr,
}

impl OrOp {
    pub fn apply<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => F::max(u, v),
            Self::ProbOr => u + v - u * v,
        }
    }
}

/// Implication operator method for shaping a consequent membership function
/// by a rule's firing strength.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImplicationOp {
    /// Clip at the firing strength (Mamdani)
    #[default]
    Min,
    /// Scale by the firing strength (Larsen)
    Prod,
}

impl ImplicationOp {
    pub fn call<F: Float>(
        self,
        strength: F,
        membership: impl IntoIterator<Item = F>,
    ) -> impl Iterator<Item = F> {
        membership.into_iter().map(move |m| match self {
            Self::Min => F::min(m, strength),
            Self::Prod => m * strength,
        })
    }
}

/// Method for aggregating the clipped consequent sets of all rules targeting
/// one variable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AggregationOp {
    /// Pointwise fuzzy union
    #[default]
    Max,
    /// Pointwise bounded sum
    BoundedSum,
}

impl AggregationOp {
    pub fn call<F: Float>(
        self,
        u: impl IntoIterator<Item = F>,
        v: impl IntoIterator<Item = F>,
    ) -> impl Iterator<Item = F> {
        u.into_iter().zip(v).map(move |(u, v)| match self {
            Self::Max => F::max(u, v),
            Self::BoundedSum => F::min(F::one(), u + v),
        })
    }
}

/// Method for defuzzificating an aggregate membership function.
///
/// Callers guarantee a nonzero aggregate; an all-zero set is reported as an
/// undefined output before defuzzification is reached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DefuzzOp {
    /// Center of gravity over the discretized universe
    #[default]
    Centroid,
    /// Point splitting the aggregate area in half
    Bisector,
    /// Mean of the values for which the membership function is maximum
    MeanOfMax,
}

impl DefuzzOp {
    pub fn call<F: Float + Sum + AddAssign>(self, universe: &[F], membership: &[F]) -> F {
        let two = F::one() + F::one();

        match self {
            Self::Centroid => {
                let num = universe
                    .iter()
                    .copied()
                    .zip(membership.iter().copied())
                    .map(|(u, m)| u * m)
                    .sum::<F>();
                let den = membership.iter().copied().sum::<F>();

                num / den
            }
            Self::Bisector => {
                let n_areas = universe.len() - 1;
                let mut areas = Vec::with_capacity(n_areas);

                for i in 0..n_areas {
                    let base = universe[i + 1] - universe[i];

                    areas.push((membership[i] + membership[i + 1]) * base / two);
                }

                let target = areas.iter().copied().sum::<F>() / two;
                let mut cum_area = F::zero();
                let mut i_area = 0;

                for (i, area) in areas.iter().copied().enumerate() {
                    cum_area += area;
                    i_area = i;
                    if cum_area >= target {
                        break;
                    }
                }

                // Interpolate inside the crossing segment, cumulative area
                // on the x-axis
                let xp = [universe[i_area], universe[i_area + 1]];
                let fp = [cum_area - areas[i_area], cum_area];

                // A zero-area crossing segment has no interior to interpolate
                if fp[0] == fp[1] {
                    return xp[0];
                }

                interp(Some(target), fp.into_iter().zip(xp.into_iter()))
                    .into_iter()
                    .next()
                    .expect("interp yields one value per input")
            }
            Self::MeanOfMax => {
                let maximum = membership.iter().copied().fold(F::zero(), F::max);
                let (len, sum) = universe
                    .iter()
                    .copied()
                    .zip(membership.iter().copied())
                    .filter(|&(_, m)| m == maximum)
                    .fold((0usize, F::zero()), |(len, accum), (u, _)| (len + 1, accum + u));

                sum / F::from(len).expect("universe point count fits in a float")
            }
        }
    }
}
