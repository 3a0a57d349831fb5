use crate::variable::{Variable, VariableKey};

/// A leaf condition: one variable taking one of its terms.
pub struct Proposition<T> {
    pub(crate) var: VariableKey,
    pub(crate) term: T,
}

/// An antecedent expression tree over propositions.
///
/// Explicit tagged variants built through the combinator methods; `Not` is
/// the Zadeh complement `1 - u`.
pub enum Expr<T> {
    Leaf(Proposition<T>),
    And(Vec<Expr<T>>),
    Or(Vec<Expr<T>>),
    Not(Box<Expr<T>>),
}

impl<T> From<Proposition<T>> for Expr<T> {
    fn from(prop: Proposition<T>) -> Self {
        Expr::Leaf(prop)
    }
}

impl<T> Proposition<T> {
    pub fn and(self, rhs: impl Into<Expr<T>>) -> Expr<T> {
        Expr::from(self).and(rhs)
    }

    pub fn or(self, rhs: impl Into<Expr<T>>) -> Expr<T> {
        Expr::from(self).or(rhs)
    }

    pub fn not(self) -> Expr<T> {
        Expr::from(self).not()
    }
}

impl<T> Expr<T> {
    pub fn and(self, rhs: impl Into<Expr<T>>) -> Expr<T> {
        Expr::And(vec![self, rhs.into()])
    }

    pub fn or(self, rhs: impl Into<Expr<T>>) -> Expr<T> {
        Expr::Or(vec![self, rhs.into()])
    }

    pub fn not(self) -> Expr<T> {
        Expr::Not(Box::new(self))
    }

    /// All leaves of the tree, in construction order.
    pub(crate) fn propositions(&self) -> Vec<&Proposition<T>> {
        fn walk<'p, T>(expr: &'p Expr<T>, out: &mut Vec<&'p Proposition<T>>) {
            match expr {
                Expr::Leaf(prop) => out.push(prop),
                Expr::And(exprs) | Expr::Or(exprs) => {
                    for expr in exprs {
                        walk(expr, out);
                    }
                }
                Expr::Not(expr) => walk(expr, out),
            }
        }

        let mut props = Vec::new();

        walk(self, &mut props);

        props
    }
}

impl<I> Variable<I> {
    pub fn is<T>(self, rhs: I) -> Proposition<T>
    where
        I: Into<T>,
    {
        Proposition {
            var: self.0,
            term: rhs.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn propositions_walk_every_leaf() {
        let a = VariableKey::default();
        let leaf = |term: u8| Proposition { var: a, term };
        let expr = leaf(0).and(leaf(1).or(leaf(2)).not());
        let terms: Vec<u8> = expr.propositions().iter().map(|p| p.term).collect();

        assert_eq!(terms, vec![0, 1, 2]);
    }
}
