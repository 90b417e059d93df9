use crate::{
    expression::{leaf_char, Expression},
    operator::{Notation, Operator},
    types::*,
};
use std::borrow::Borrow;
use std::fmt::Write;

/// Renders expressions as text.
///
/// Left-nested chains of an associative operator are written without parentheses, every other
/// binary operand is parenthesised. In [`Notation::Ascii`] the output can be resolved again into
/// the same expression.
///
/// ```
/// use mantiq::{Expression, Formatter, Notation, Operator};
///
/// let p = Expression::leaf('p').unwrap();
/// let q = Expression::leaf('q').unwrap();
/// let r = Expression::leaf('r').unwrap();
/// let pq = Expression::binary(Operator::Or, &p, &q);
/// let e = Expression::binary(Operator::Or, &pq, &Expression::not(&r));
/// let e = Expression::binary(Operator::Implies, &e, &p);
///
/// assert_eq!(Formatter::new(Notation::Ascii).format(&e), "(p | q | ~r) >> p");
/// assert_eq!(Formatter::new(Notation::Unicode).format(&e), "(p ∨ q ∨ ¬r) → p");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formatter {
    notation: Notation,
}

impl Default for Formatter {
    fn default() -> Self {
        Formatter::new(Notation::Ascii)
    }
}

impl Formatter {
    pub fn new(notation: Notation) -> Self {
        Formatter { notation }
    }

    pub fn notation(&self) -> Notation {
        self.notation
    }

    pub fn format<T: Borrow<[Identifier]> + std::fmt::Debug>(&self, expr: &Expression<T>) -> String {
        let mut s = String::new();
        self.format_expression(&mut s, expr);
        s
    }

    pub fn format_leaf(&self, s: &mut String, id: Identifier) {
        match leaf_char(id) {
            Some(c) => s.push(c),
            None => write!(s, "x{}", id).unwrap(),
        }
    }

    pub fn format_expression<T: Borrow<[Identifier]> + std::fmt::Debug>(
        &self,
        s: &mut String,
        expr: &Expression<T>,
    ) {
        match expr.head() {
            None => {
                if let Some(id) = expr.as_leaf() {
                    self.format_leaf(s, id)
                }
            }
            Some(op) => self.format_operator(s, op, &expr.operands()),
        }
    }

    fn format_operator(&self, s: &mut String, op: Operator, operands: &[Expression<&[Identifier]>]) {
        let symb = op.symbol(self.notation);
        match operands {
            [] => s.push_str(symb),
            [operand] => {
                s.push_str(symb);
                self.format_operand(s, operand, is_binary(operand));
            }
            [left, right] => {
                let left_parens = is_binary(left) && !(op.is_associative() && left.head() == Some(op));
                self.format_operand(s, left, left_parens);
                write!(s, " {} ", symb).unwrap();
                self.format_operand(s, right, is_binary(right));
            }
            _ => unreachable!("operators have at most two operands"),
        }
    }

    fn format_operand(&self, s: &mut String, operand: &Expression<&[Identifier]>, parens: bool) {
        if parens {
            s.push('(');
            self.format_expression(s, operand);
            s.push(')');
        } else {
            self.format_expression(s, operand);
        }
    }
}

fn is_binary(expr: &Expression<&[Identifier]>) -> bool {
    expr.head().map(|op| op.arity() == 2).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OwnedExpression;

    fn leaf(c: char) -> OwnedExpression {
        OwnedExpression::leaf(c).unwrap()
    }

    #[test]
    fn right_nested_chains_keep_parentheses() {
        let qr = Expression::binary(Operator::And, &leaf('q'), &leaf('r'));
        let e = Expression::binary(Operator::And, &leaf('p'), &qr);
        assert_eq!(Formatter::default().format(&e), "p & (q & r)");
    }

    #[test]
    fn negation_of_compound() {
        let pq = Expression::binary(Operator::And, &leaf('p'), &leaf('q'));
        let e = Expression::not(&pq);
        assert_eq!(Formatter::default().format(&e), "~(p & q)");
        assert_eq!(Formatter::default().format(&Expression::not(&e)), "~~(p & q)");
    }

    #[test]
    fn set_operators() {
        let ab = Expression::binary(Operator::Union, &leaf('A'), &leaf('B'));
        let e = Expression::binary(Operator::Intersection, &ab, &leaf('C'));
        let c = Expression::apply(Operator::Complement, &[e.to_slice()]).unwrap();
        assert_eq!(Formatter::default().format(&e), "(A ∪ B) ∩ C");
        assert_eq!(Formatter::default().format(&c), "∁((A ∪ B) ∩ C)");
    }

    #[test]
    fn placeholders_and_constants() {
        let e = Expression::binary(
            Operator::Or,
            &OwnedExpression::placeholder(0),
            &OwnedExpression::constant(Operator::False).unwrap(),
        );
        assert_eq!(Formatter::default().format(&e), "x0 | False");
    }
}
