use crate::error::FuzzyError;

/// A piecewise-linear membership function shape.
///
/// Breakpoints are validated once at construction; evaluation is a pure
/// total function from a crisp value to a degree of membership in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// `[a, b, c, d]`: zero outside `[a, d]`, one over `[b, c]`, linear ramps between.
    Trapezoid([f64; 4]),
    /// `[a, b, c]`: zero outside `[a, c]`, one exactly at `b`.
    Triangle([f64; 3]),
}

impl Shape {
    pub fn trapezoid(points: [f64; 4]) -> Result<Self, FuzzyError> {
        check_breakpoints(&points)?;

        Ok(Self::Trapezoid(points))
    }

    pub fn triangle(points: [f64; 3]) -> Result<Self, FuzzyError> {
        check_breakpoints(&points)?;

        Ok(Self::Triangle(points))
    }

    pub fn breakpoints(&self) -> &[f64] {
        match self {
            Self::Trapezoid(points) => points,
            Self::Triangle(points) => points,
        }
    }

    /// Degree of membership of `x`.
    ///
    /// Degenerate shapes (`a == b` or `c == d`) form a vertical edge: the
    /// plateau test runs before the ramp tests, so the shared breakpoint
    /// evaluates to one and the ramp denominators are never zero.
    pub fn eval(&self, x: f64) -> f64 {
        let [a, b, c, d] = match *self {
            Self::Trapezoid(points) => points,
            Self::Triangle([a, b, c]) => [a, b, b, c],
        };

        if x < a || x > d {
            0.
        } else if x >= b && x <= c {
            1.
        } else if x < b {
            // a < b here, since a <= x < b is non-empty
            (x - a) / (b - a)
        } else {
            // c < d here, since c < x <= d is non-empty
            (d - x) / (d - c)
        }
    }

    /// Evaluates the shape at every point of a discretized universe.
    pub fn sample(&self, universe: &[f64]) -> Vec<f64> {
        universe.iter().map(|u| self.eval(*u)).collect()
    }
}

fn check_breakpoints(points: &[f64]) -> Result<(), FuzzyError> {
    if points.iter().any(|p| !p.is_finite()) {
        return Err(FuzzyError::NonFiniteBreakpoints {
            points: points.to_vec(),
        });
    }

    if points.windows(2).any(|w| w[0] > w[1]) {
        return Err(FuzzyError::NonMonotonicBreakpoints {
            points: points.to_vec(),
        });
    }

    Ok(())
}
