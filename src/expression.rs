use crate::{operator::Operator, types::*};
use std::borrow::Borrow;

/// A logic or set expression stored as a flat prefix (Polish notation) sequence of identifiers.
///
/// Leaves are non-negative identifiers holding the character code of a propositional variable
/// (`p`, `q`, ...) or a set label (`A`, `B`, ...). Operators are negative (see [`Operator::id`])
/// and are followed by exactly [`Operator::arity`] operands.
///
/// Because leaves carry their own name, two expressions resolved from different texts are
/// structurally equal exactly when their sequences are equal.
#[derive(Clone, Eq, PartialOrd, Ord, Debug, Copy, Hash)]
pub struct Expression<T: Borrow<[Identifier]>> {
    data: T,
}

impl<T: Borrow<[Identifier]>, S: Borrow<[Identifier]>> PartialEq<Expression<S>> for Expression<T> {
    fn eq(&self, other: &Expression<S>) -> bool {
        self.data.borrow() == other.data.borrow()
    }
}

/// Returns the leaf identifier for a variable or set label.
///
/// Only ASCII letters can name a leaf.
///
/// # Example
/// ```
/// use mantiq::expression::{leaf_char, leaf_id};
///
/// assert_eq!(leaf_id('p'), Some(112));
/// assert_eq!(leaf_id('ب'), None);
/// assert_eq!(leaf_char(112), Some('p'));
/// assert_eq!(leaf_char(0), None);
/// ```
pub fn leaf_id(c: char) -> Option<Identifier> {
    if c.is_ascii_alphabetic() {
        Some(c as u8 as Identifier)
    } else {
        None
    }
}

pub fn leaf_char(id: Identifier) -> Option<char> {
    u8::try_from(id)
        .ok()
        .map(char::from)
        .filter(|c| c.is_ascii_alphabetic())
}

/// Tests whether the given identifier is an operator
///
/// # Example
/// ```
/// use mantiq::expression::is_operator;
///
/// assert!(is_operator(-2));
/// assert!(!is_operator(0));
/// assert!(!is_operator('p' as i16));
/// ```
pub fn is_operator(x: Identifier) -> bool {
    x < 0
}

impl Expression<Box<[Identifier]>> {
    /// A single variable or set label
    ///
    /// Returns `None` if `c` is not an ASCII letter.
    pub fn leaf(c: char) -> Option<Self> {
        leaf_id(c).map(|id| Expression {
            data: vec![id].into_boxed_slice(),
        })
    }

    /// A leaf that is not a letter, used as a placeholder inside templates
    pub fn placeholder(id: Identifier) -> Self {
        assert!(!is_operator(id), "placeholder must not be an operator");
        Expression {
            data: vec![id].into_boxed_slice(),
        }
    }

    /// Applies `op` to `operands`.
    ///
    /// Returns `None` if the number of operands does not match the arity of `op`.
    ///
    /// # Example
    /// ```
    /// use mantiq::{Expression, Operator};
    ///
    /// let p = Expression::leaf('p').unwrap();
    /// let q = Expression::leaf('q').unwrap();
    /// let e = Expression::apply(Operator::And, &[p.to_slice(), q.to_slice()]).unwrap();
    /// assert_eq!(&**e.data(), &[Operator::And.id(), 'p' as i16, 'q' as i16]);
    /// assert_eq!(Expression::apply(Operator::Not, &[]), None);
    /// ```
    pub fn apply(op: Operator, operands: &[Expression<&[Identifier]>]) -> Option<Self> {
        if operands.len() != op.arity() as usize {
            return None;
        }
        let len = 1 + operands.iter().map(|e| e.data.len()).sum::<usize>();
        let mut data = Vec::with_capacity(len);
        data.push(op.id());
        for e in operands {
            data.extend_from_slice(e.data);
        }
        Some(Expression {
            data: data.into_boxed_slice(),
        })
    }

    pub fn constant(op: Operator) -> Option<Self> {
        Self::apply(op, &[])
    }

    pub fn not<S: Borrow<[Identifier]> + std::fmt::Debug>(operand: &Expression<S>) -> Self {
        Self::apply_unchecked(Operator::Not, &[operand.to_slice()])
    }

    pub fn binary<S: Borrow<[Identifier]> + std::fmt::Debug, U: Borrow<[Identifier]> + std::fmt::Debug>(
        op: Operator,
        left: &Expression<S>,
        right: &Expression<U>,
    ) -> Self {
        assert_eq!(op.arity(), 2, "{:?} is not a binary operator", op);
        Self::apply_unchecked(op, &[left.to_slice(), right.to_slice()])
    }

    /// Joins `operands` into a left-nested chain of `op`, e.g. `((a & b) & c)`.
    ///
    /// Returns `None` if `operands` is empty.
    pub fn chain(op: Operator, operands: Vec<Self>) -> Option<Self> {
        let mut iter = operands.into_iter();
        let first = iter.next()?;
        Some(iter.fold(first, |acc, e| Self::binary(op, &acc, &e)))
    }

    fn apply_unchecked(op: Operator, operands: &[Expression<&[Identifier]>]) -> Self {
        let mut data = vec![op.id()];
        for e in operands {
            data.extend_from_slice(e.data);
        }
        Expression {
            data: data.into_boxed_slice(),
        }
    }
}

impl<T: Borrow<[Identifier]> + std::fmt::Debug> Expression<T> {
    pub fn data<'a>(&'a self) -> &'a T {
        &self.data
    }

    pub fn to_slice<'a>(&'a self) -> Expression<&'a [Identifier]> {
        Expression {
            data: self.data.borrow(),
        }
    }

    pub fn to_boxed(&self) -> OwnedExpression {
        Expression {
            data: Box::from(self.data.borrow()),
        }
    }

    pub fn from_raw(expr: T) -> Option<Self> {
        if Self::check(&expr) {
            Some(Expression { data: expr })
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    /// The operator at the root of this expression, or `None` if it is a leaf
    pub fn head(&self) -> Option<Operator> {
        self.data
            .borrow()
            .first()
            .copied()
            .filter(|&s| is_operator(s))
            .and_then(Operator::from_id)
    }

    /// The identifier of this expression if it is a single leaf
    pub fn as_leaf(&self) -> Option<Identifier> {
        match self.data.borrow() {
            [id] if !is_operator(*id) => Some(*id),
            _ => None,
        }
    }

    /// All leaves of this expression in order of appearance, including repetitions
    pub fn variables<'a>(&'a self) -> impl Iterator<Item = Identifier> + 'a {
        self.data
            .borrow()
            .iter()
            .copied()
            .filter(|s| !is_operator(*s))
    }

    /// All operators of this expression in order of appearance
    pub fn operators<'a>(&'a self) -> impl Iterator<Item = Operator> + 'a {
        self.data
            .borrow()
            .iter()
            .copied()
            .filter(|s| is_operator(*s))
            .filter_map(Operator::from_id)
    }

    /// Returns the subexpression beginning at the given index.
    ///
    /// # Panics
    /// This method panics if start_index is not in the range `0..self.len()`
    ///
    /// # Example
    /// ```
    /// use mantiq::{Expression, Operator};
    ///
    /// let and = Operator::And.id();
    /// let not = Operator::Not.id();
    /// let st = Expression::from_raw(vec![and, 112, not, 113]).unwrap();
    /// assert_eq!(*st.subexpression(2).data(), &[not, 113]);
    /// assert_eq!(*st.subexpression(3).data(), &[113]);
    /// ```
    pub fn subexpression<'a>(&'a self, start_index: usize) -> Expression<&'a [Identifier]> {
        Self::subexpression_check(self.data.borrow(), start_index).unwrap_or_else(|| {
            panic!("malformed prefix sequence {:?}", self.data.borrow())
        })
    }

    /// The direct operands of the root operator, empty for leaves and constants
    ///
    /// # Example
    /// ```
    /// use mantiq::{Expression, Operator};
    ///
    /// let or = Operator::Or.id();
    /// let and = Operator::And.id();
    /// let e = Expression::from_raw(vec![or, and, 112, 113, 114]).unwrap();
    /// let operands = e.operands();
    /// assert_eq!(operands.len(), 2);
    /// assert_eq!(*operands[0].data(), &[and, 112, 113]);
    /// assert_eq!(*operands[1].data(), &[114]);
    /// ```
    pub fn operands<'a>(&'a self) -> Vec<Expression<&'a [Identifier]>> {
        let arity = self.head().map(Operator::arity).unwrap_or(0);
        let mut operands = Vec::with_capacity(arity as usize);
        let mut index = 1;
        for _ in 0..arity {
            let sub = self.subexpression(index);
            index += sub.len();
            operands.push(sub);
        }
        operands
    }

    /// Evaluates a propositional expression under the given assignment of its variables.
    ///
    /// Returns `None` if the expression contains set operators.
    ///
    /// # Example
    /// ```
    /// use mantiq::{Expression, Operator};
    ///
    /// let imp = Operator::Implies.id();
    /// let e = Expression::from_raw(vec![imp, 112, 113]).unwrap();
    /// assert_eq!(e.evaluate(&|v| v == 'q' as i16), Some(true));
    /// assert_eq!(e.evaluate(&|v| v == 'p' as i16), Some(false));
    /// ```
    pub fn evaluate<F: Fn(Identifier) -> bool>(&self, value: &F) -> Option<bool> {
        let op = match self.head() {
            None => return self.as_leaf().map(value),
            Some(op) => op,
        };
        let operands = self.operands();
        let mut values = Vec::with_capacity(operands.len());
        for operand in &operands {
            values.push(operand.evaluate(value)?);
        }
        use Operator::*;
        Some(match (op, values.as_slice()) {
            (True, []) => true,
            (False, []) => false,
            (Not, [a]) => !a,
            (And, [a, b]) => *a && *b,
            (Or, [a, b]) => *a || *b,
            (Implies, [a, b]) => !a || *b,
            (Iff, [a, b]) => a == b,
            (Xor, [a, b]) => a != b,
            _ => return None,
        })
    }

    /// Replaces every leaf that `substitution` maps, leaving the others in place.
    ///
    /// # Example
    /// ```
    /// use mantiq::{Expression, Operator};
    /// use mantiq::expression::WholeSubstitution;
    ///
    /// let and = Operator::And.id();
    /// let template = Expression::from_raw(vec![and, 0, 1]).unwrap();
    /// let p = Expression::leaf('p').unwrap();
    /// let r = Expression::leaf('r').unwrap();
    /// let mut sub = WholeSubstitution::with_capacity(2);
    /// sub.insert(0, p.to_slice());
    /// sub.insert(1, r.to_slice());
    /// assert_eq!(&**template.substitute(&sub).data(), &[and, 'p' as i16, 'r' as i16]);
    /// ```
    pub fn substitute<S: Substitution>(&self, substitution: &S) -> OwnedExpression {
        let mut new_expr = Vec::with_capacity(self.data.borrow().len());
        for symb in self.data.borrow().iter() {
            if is_operator(*symb) {
                new_expr.push(*symb)
            } else {
                if let Some(e) = substitution.substitution_opt(*symb) {
                    new_expr.extend_from_slice(e.data.borrow());
                } else {
                    new_expr.push(*symb);
                }
            }
        }
        Expression {
            data: new_expr.into_boxed_slice(),
        }
    }

    fn check(expr: &T) -> bool {
        Self::subexpression_check(expr.borrow(), 0).map(|s| s.data.len())
            == Some(expr.borrow().len())
    }

    fn subexpression_check<'a>(
        expr: &'a [Identifier],
        start_index: usize,
    ) -> Option<Expression<&'a [Identifier]>> {
        let mut depth: isize = 1;
        for (i, &s) in expr.get(start_index..)?.iter().enumerate() {
            let arity = if is_operator(s) {
                Operator::from_id(s)?.arity()
            } else {
                0
            };
            depth += arity as isize - 1;
            if depth == 0 {
                return Some(Expression {
                    data: &expr[start_index..=start_index + i],
                });
            }
        }
        None
    }
}

/// A [`Substitution`] backed by a vector indexed by leaf id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WholeSubstitution<'a> {
    substitution: Vec<Option<Expression<&'a [Identifier]>>>,
}

impl<'a> WholeSubstitution<'a> {
    /// Creates a substitution with the capacity to store replacements for leaves `0` to
    /// `n - 1`.
    pub fn with_capacity(n: usize) -> Self {
        WholeSubstitution {
            substitution: vec![None; n],
        }
    }

    /// Binds leaf `id` to `expr`.
    ///
    /// # Panics
    /// Panics if `id` is at least the capacity given to [`WholeSubstitution::with_capacity`]
    pub fn insert(&mut self, id: Identifier, expr: Expression<&'a [Identifier]>) {
        self.substitution[id as usize] = Some(expr)
    }
}

impl<'a> Substitution for WholeSubstitution<'a> {
    type T = &'a [Identifier];

    fn substitution_opt(&self, id: Identifier) -> Option<Expression<&'a [Identifier]>> {
        self.substitution.get(id as usize).copied().flatten()
    }
}

/// Maps leaf ids to replacement expressions.
pub trait Substitution {
    type T: Borrow<[Identifier]> + std::fmt::Debug;

    /// The replacement for leaf `id`, or `None` if the leaf stays.
    fn substitution_opt(&self, id: Identifier) -> Option<Expression<Self::T>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(data: Vec<Identifier>) -> Option<OwnedExpression> {
        Expression::from_raw(data.into_boxed_slice())
    }

    #[test]
    fn from_raw_rejects_malformed() {
        let and = Operator::And.id();
        let not = Operator::Not.id();
        assert!(raw(vec![and, 112, 113]).is_some());
        assert!(raw(vec![not, 112]).is_some());
        assert!(raw(vec![Operator::True.id()]).is_some());
        assert!(raw(vec![]).is_none());
        assert!(raw(vec![and, 112]).is_none());
        assert!(raw(vec![not, 112, 113]).is_none());
        assert!(raw(vec![-1]).is_none());
        assert!(raw(vec![-100, 112]).is_none());
    }

    #[test]
    fn chain_nests_to_the_left() {
        let leaves: Vec<_> = "pqr".chars().filter_map(Expression::leaf).collect();
        let e = Expression::chain(Operator::Or, leaves).unwrap();
        let or = Operator::Or.id();
        assert_eq!(&*e.data, &[or, or, 112, 113, 114]);
        assert_eq!(Expression::chain(Operator::Or, vec![]), None);
    }

    #[test]
    fn evaluate_rejects_set_operators() {
        let e = raw(vec![Operator::Union.id(), 65, 66]).unwrap();
        assert_eq!(e.evaluate(&|_| true), None);
    }

    #[test]
    fn substitution_outside_capacity_is_ignored() {
        let sub = WholeSubstitution::with_capacity(1);
        let e = Expression::leaf('p').unwrap();
        assert_eq!(e.substitute(&sub), e);
    }
}
