//! The symbolic algebra behind the resolvers and the exercise synthesizer.
//!
//! [`FiniteAlgebra`] enumerates the truth table of an expression and hands its minterms to the
//! espresso minimizer, once for the expression and once for its negation. The minimized covers
//! are sorted, so equivalent expressions over the same letters simplify to the same tree.

use crate::{
    config::{AlgebraConfig, MAX_VARIABLES_LIMIT},
    error::{ExpressionError, PResult},
    expression::Expression,
    operator::Operator,
    types::*,
    value::{Element, SetValue},
};
use espresso_logic::BoolExpr;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, multispace0, one_of},
    combinator::{all_consuming, map, map_opt, opt, value},
    multi::{fold_many0, many0},
    sequence::{delimited, preceded, terminated},
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// Simplification and evaluation of logic expressions, and the operations on finite sets.
///
/// Only [`Algebra::simplify`] and [`Algebra::truth_table`] must be provided; the set
/// operations have their usual meaning by default.
pub trait Algebra: Send + Sync {
    /// Rewrites a propositional expression into a canonical minimal form.
    fn simplify(&self, expr: Expression<&[Identifier]>) -> Result<OwnedExpression, ExpressionError>;

    fn truth_table(&self, expr: Expression<&[Identifier]>) -> Result<TruthTable, ExpressionError>;

    /// Two expressions are equivalent iff they simplify to the same expression.
    fn equivalent(
        &self,
        a: Expression<&[Identifier]>,
        b: Expression<&[Identifier]>,
    ) -> Result<bool, ExpressionError> {
        Ok(self.simplify(a)? == self.simplify(b)?)
    }

    /// Of two equal elements, the one from `a` is kept.
    fn union(&self, a: &SetValue, b: &SetValue) -> SetValue {
        a.iter().chain(b.iter()).cloned().collect()
    }

    fn intersection(&self, a: &SetValue, b: &SetValue) -> SetValue {
        a.iter().filter(|e| b.contains(e)).cloned().collect()
    }

    fn difference(&self, a: &SetValue, b: &SetValue) -> SetValue {
        a.iter().filter(|e| !b.contains(e)).cloned().collect()
    }

    /// The elements of `universe` that are not in `a`
    fn complement(&self, a: &SetValue, universe: &SetValue) -> SetValue {
        self.difference(universe, a)
    }

    fn product(&self, a: &SetValue, b: &SetValue) -> SetValue {
        a.iter()
            .flat_map(|x| b.iter().map(move |y| Element::Tuple(vec![x.clone(), y.clone()])))
            .collect()
    }

    fn is_subset(&self, a: &SetValue, b: &SetValue) -> bool {
        a.iter().all(|e| b.contains(e))
    }

    fn is_proper_subset(&self, a: &SetValue, b: &SetValue) -> bool {
        a.len() < b.len() && self.is_subset(a, b)
    }

    fn set_eq(&self, a: &SetValue, b: &SetValue) -> bool {
        a == b
    }
}

/// The truth table of a propositional expression.
///
/// Rows are in textbook order: the first row assigns `true` to every variable, the last one
/// `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
    pub variables: Vec<Identifier>,
    pub rows: Vec<(Vec<bool>, bool)>,
}

impl TruthTable {
    /// The result column written as `T` and `F`.
    ///
    /// # Example
    /// ```
    /// use mantiq::{Algebra, FiniteAlgebra, Expression, Operator};
    ///
    /// let p = Expression::leaf('p').unwrap();
    /// let q = Expression::leaf('q').unwrap();
    /// let e = Expression::binary(Operator::Implies, &p, &q);
    /// let table = FiniteAlgebra::default().truth_table(e.to_slice()).unwrap();
    /// assert_eq!(table.column(), "TFTT");
    /// ```
    pub fn column(&self) -> String {
        self.rows
            .iter()
            .map(|(_, value)| if *value { 'T' } else { 'F' })
            .collect()
    }
}

/// An exact algebra for expressions with a bounded number of variables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiniteAlgebra {
    max_variables: usize,
}

impl Default for FiniteAlgebra {
    fn default() -> Self {
        FiniteAlgebra::new(&AlgebraConfig::default())
    }
}

/// `(variable, negated)` pairs, sorted by variable
type Term = Vec<(Identifier, bool)>;

/// A product of literals, by variable index: `true` for a positive literal
type Cube = BTreeMap<usize, bool>;

/// A sum of products. The empty cover is false, a cover holding the empty cube is true.
type Cover = Vec<Cube>;

impl FiniteAlgebra {
    /// The limit is clamped to `1..=MAX_VARIABLES_LIMIT`, whether or not `config` was
    /// validated.
    pub fn new(config: &AlgebraConfig) -> Self {
        FiniteAlgebra {
            max_variables: config.max_variables.clamp(1, MAX_VARIABLES_LIMIT),
        }
    }

    pub fn max_variables(&self) -> usize {
        self.max_variables
    }

    fn variables_of(&self, expr: &Expression<&[Identifier]>) -> Result<Vec<Identifier>, ExpressionError> {
        let variables: Vec<Identifier> = expr.variables().collect::<BTreeSet<_>>().into_iter().collect();
        if variables.len() > self.max_variables {
            return Err(ExpressionError::Algebra(format!(
                "{} variables exceed the limit of {}",
                variables.len(),
                self.max_variables
            )));
        }
        Ok(variables)
    }

    /// Evaluates `expr` for every assignment. Index `m` assigns `true` to variable `j` iff
    /// bit `j` of `m` is set.
    fn evaluate_all(
        expr: &Expression<&[Identifier]>,
        variables: &[Identifier],
    ) -> Result<Vec<bool>, ExpressionError> {
        (0..1u32 << variables.len())
            .map(|m| {
                expr.evaluate(&|id| {
                    variables
                        .iter()
                        .position(|&v| v == id)
                        .map_or(false, |j| m & (1 << j) != 0)
                })
                .ok_or_else(|| {
                    ExpressionError::Algebra("set operators in a propositional expression".to_owned())
                })
            })
            .collect()
    }

    /// Minimal sum of products covering exactly `minterms`, computed by espresso.
    ///
    /// Terms are sorted by size, then by their literals, so that equal functions over the
    /// same variables give equal covers.
    fn minimal_cover(minterms: &[u32], variables: &[Identifier]) -> Result<Vec<Term>, ExpressionError> {
        let n = variables.len();
        let minimized = BoolExpr::parse(&sum_of_minterms(minterms, n))
            .map_err(|e| ExpressionError::Algebra(e.to_string()))?
            .minimize()
            .map_err(|e| ExpressionError::Algebra(e.to_string()))?;
        let printed = minimized.to_string();
        let cover = read_cover(&printed)?;

        let exact = cover.iter().all(|cube| cube.keys().all(|&j| j < n))
            && (0..1u32 << n).all(|m| {
                cover.iter().any(|cube| covers(cube, m)) == minterms.contains(&m)
            });
        if !exact {
            return Err(ExpressionError::Algebra(format!(
                "minimized form `{}` does not match the truth table",
                printed
            )));
        }

        let mut terms: Vec<Term> = cover
            .into_iter()
            .map(|cube| cube.into_iter().map(|(j, positive)| (variables[j], !positive)).collect())
            .collect();
        terms.sort_by(|a, b| (a.len(), a).cmp(&(b.len(), b)));
        Ok(terms)
    }
}

fn variable_name(j: usize) -> String {
    format!("v{}", j)
}

/// The canonical input for espresso, e.g. `v0 * ~v1 + ~v0 * v1`. Bit `j` of a minterm is the
/// value of variable `j`.
fn sum_of_minterms(minterms: &[u32], n: usize) -> String {
    minterms
        .iter()
        .map(|&m| {
            (0..n)
                .map(|j| {
                    let sign = if m & (1 << j) != 0 { "" } else { "~" };
                    format!("{}{}", sign, variable_name(j))
                })
                .collect::<Vec<_>>()
                .join(" * ")
        })
        .collect::<Vec<_>>()
        .join(" + ")
}

fn covers(cube: &Cube, minterm: u32) -> bool {
    cube.iter()
        .all(|(&j, &positive)| (minterm & (1 << j) != 0) == positive)
}

fn cover_and(a: &Cover, b: &Cover) -> Cover {
    a.iter()
        .flat_map(|x| {
            b.iter().filter_map(move |y| {
                let mut cube = x.clone();
                for (&j, &positive) in y {
                    if *cube.entry(j).or_insert(positive) != positive {
                        return None;
                    }
                }
                Some(cube)
            })
        })
        .collect()
}

fn cover_not(a: &Cover) -> Cover {
    a.iter().fold(vec![Cube::new()], |acc, cube| {
        let clause: Cover = cube
            .iter()
            .map(|(&j, &positive)| Cube::from([(j, !positive)]))
            .collect();
        cover_and(&acc, &clause)
    })
}

/// Drops every cube that contains the literals of another one.
fn absorb(mut cover: Cover) -> Cover {
    cover.sort_by_key(Cube::len);
    let mut kept: Cover = Vec::new();
    for cube in cover {
        if !kept
            .iter()
            .any(|k| k.iter().all(|(j, positive)| cube.get(j) == Some(positive)))
        {
            kept.push(cube);
        }
    }
    kept
}

/// Reads the printed form of a minimized expression back into a cover. Accepts the usual
/// spellings of the connectives, so a factored form is flattened too.
fn read_cover(printed: &str) -> Result<Cover, ExpressionError> {
    all_consuming(terminated(cover_sum, multispace0))(printed)
        .map(|(_, cover)| absorb(cover))
        .map_err(|_| ExpressionError::Algebra(format!("unreadable minimized form `{}`", printed)))
}

fn cover_sum(input: &str) -> PResult<'_, Cover> {
    let (input, first) = cover_product(input)?;
    fold_many0(
        preceded(preceded(multispace0, one_of("+|∨")), cover_product),
        move || first.clone(),
        |mut acc, cover| {
            acc.extend(cover);
            acc
        },
    )(input)
}

fn cover_product(input: &str) -> PResult<'_, Cover> {
    let (input, first) = cover_factor(input)?;
    fold_many0(
        preceded(opt(preceded(multispace0, one_of("*&∧·"))), cover_factor),
        move || first.clone(),
        |acc, cover| cover_and(&acc, &cover),
    )(input)
}

fn cover_factor(input: &str) -> PResult<'_, Cover> {
    let (input, _) = multispace0(input)?;
    let (input, base) = alt((
        map(preceded(one_of("~!¬"), cover_factor), |c| cover_not(&c)),
        delimited(char('('), cover_sum, preceded(multispace0, char(')'))),
        map(
            preceded(char('v'), map_opt(digit1, |d: &str| d.parse::<usize>().ok())),
            |j| vec![Cube::from([(j, true)])],
        ),
        value(vec![Cube::new()], alt((tag("1"), tag("true")))),
        value(Cover::new(), alt((tag("0"), tag("false")))),
    ))(input)?;
    let (input, primes) = many0(char('\''))(input)?;
    let cover = if primes.len() % 2 == 1 { cover_not(&base) } else { base };
    Ok((input, cover))
}

fn literal(id: Identifier, negated: bool) -> OwnedExpression {
    let leaf = OwnedExpression::placeholder(id);
    if negated {
        Expression::not(&leaf)
    } else {
        leaf
    }
}

fn literal_count(terms: &[Term]) -> usize {
    terms.iter().map(Vec::len).sum()
}

/// Joins `terms` with `outer`, the literals of each term with `inner`. Every term must be
/// non-empty.
fn normal_form(terms: Vec<Term>, outer: Operator, inner: Operator) -> Option<OwnedExpression> {
    let terms = terms
        .into_iter()
        .map(|t| Expression::chain(inner, t.into_iter().map(|(v, n)| literal(v, n)).collect()))
        .collect::<Option<Vec<_>>>()?;
    Expression::chain(outer, terms)
}

impl Algebra for FiniteAlgebra {
    /// ```
    /// use mantiq::{Algebra, FiniteAlgebra, Formatter, LogicResolver};
    ///
    /// let algebra = FiniteAlgebra::default();
    /// let resolver = LogicResolver::new(&algebra);
    /// let (e, _) = resolver.resolve("(p → q) ∧ (q → p)").unwrap();
    /// let simplified = algebra.simplify(e.to_slice()).unwrap();
    /// assert_eq!(Formatter::default().format(&simplified), "(p & q) | (~p & ~q)");
    /// ```
    fn simplify(&self, expr: Expression<&[Identifier]>) -> Result<OwnedExpression, ExpressionError> {
        let variables = self.variables_of(&expr)?;
        let values = Self::evaluate_all(&expr, &variables)?;
        let (ones, zeros): (Vec<u32>, Vec<u32>) = (0..values.len() as u32).partition(|&m| values[m as usize]);
        if zeros.is_empty() {
            return Ok(OwnedExpression::constant(Operator::True).expect("True takes no operands"));
        }
        if ones.is_empty() {
            return Ok(OwnedExpression::constant(Operator::False).expect("False takes no operands"));
        }

        let dnf = Self::minimal_cover(&ones, &variables)?;
        // clauses of the CNF are the negated terms of a minimal DNF of the negation
        let mut cnf: Vec<Term> = Self::minimal_cover(&zeros, &variables)?
            .into_iter()
            .map(|t| t.into_iter().map(|(v, n)| (v, !n)).collect())
            .collect();
        cnf.sort_by(|a, b| (a.len(), a).cmp(&(b.len(), b)));
        trace!(
            dnf = literal_count(&dnf),
            cnf = literal_count(&cnf),
            "minimal normal forms"
        );

        let simplified = if literal_count(&cnf) < literal_count(&dnf) {
            normal_form(cnf, Operator::And, Operator::Or)
        } else {
            normal_form(dnf, Operator::Or, Operator::And)
        };
        simplified.ok_or_else(|| ExpressionError::Algebra("empty term in minimal cover".to_owned()))
    }

    fn truth_table(&self, expr: Expression<&[Identifier]>) -> Result<TruthTable, ExpressionError> {
        let variables = self.variables_of(&expr)?;
        let n = variables.len();
        let values = Self::evaluate_all(&expr, &variables)?;
        let rows = (0..1usize << n)
            .map(|k| {
                // textbook row k: variable j is true iff its bit counted from the left is 0
                let assignment: Vec<bool> = (0..n).map(|j| (k >> (n - 1 - j)) & 1 == 0).collect();
                let m = (0..n).filter(|&j| assignment[j]).fold(0usize, |m, j| m | 1 << j);
                (assignment, values[m])
            })
            .collect();
        Ok(TruthTable { variables, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{formatter::Formatter, logic::LogicResolver};

    fn simplified(text: &str) -> String {
        let algebra = FiniteAlgebra::default();
        let resolver = LogicResolver::new(&algebra);
        let (e, _) = resolver.resolve(text).unwrap();
        Formatter::default().format(&resolver.simplify(&e).unwrap())
    }

    #[test]
    fn absorption_and_idempotence() {
        assert_eq!(simplified("ساده کن (p ∧ q) ∨ (p ∧ ¬q)"), "p");
        assert_eq!(simplified("p | (p & q)"), "p");
        assert_eq!(simplified("p & p"), "p");
        assert_eq!(simplified("~~q"), "q");
    }

    #[test]
    fn de_morgan() {
        assert_eq!(simplified("not (p and q)"), simplified("(not p) or (not q)"));
        assert_eq!(simplified("~(p | q)"), "~p & ~q");
    }

    #[test]
    fn constants() {
        assert_eq!(simplified("p | ~p"), "True");
        assert_eq!(simplified("p & ~p"), "False");
        assert_eq!(simplified("p | True"), "True");
    }

    #[test]
    fn chooses_smaller_normal_form() {
        assert_eq!(simplified("p >> q"), "~p | q");
        assert_eq!(simplified("(p | q) & (p | r)"), "p | (q & r)");
        assert_eq!(simplified("(p & q) | (r & s)"), "(p & q) | (r & s)");
        assert_eq!(simplified("(p | q) & (r | s)"), "(p | q) & (r | s)");
    }

    #[test]
    fn equivalence() {
        let algebra = FiniteAlgebra::default();
        let resolver = LogicResolver::new(&algebra);
        let (a, _) = resolver.resolve("p → q").unwrap();
        let (b, _) = resolver.resolve("¬q → ¬p").unwrap();
        let (c, _) = resolver.resolve("q → p").unwrap();
        assert!(algebra.equivalent(a.to_slice(), b.to_slice()).unwrap());
        assert!(!algebra.equivalent(a.to_slice(), c.to_slice()).unwrap());
    }

    #[test]
    fn truth_table_order() {
        let algebra = FiniteAlgebra::default();
        let resolver = LogicResolver::new(&algebra);
        let (e, _) = resolver.resolve("p & q").unwrap();
        let table = algebra.truth_table(e.to_slice()).unwrap();
        assert_eq!(table.variables, vec!['p' as Identifier, 'q' as Identifier]);
        assert_eq!(table.rows[0].0, vec![true, true]);
        assert_eq!(table.rows[1].0, vec![true, false]);
        assert_eq!(table.rows[3].0, vec![false, false]);
        assert_eq!(table.column(), "TFFF");
        let (e, _) = resolver.resolve("p | ~q").unwrap();
        assert_eq!(algebra.truth_table(e.to_slice()).unwrap().column(), "TTFT");
    }

    #[test]
    fn too_many_variables() {
        let algebra = FiniteAlgebra::new(&AlgebraConfig { max_variables: 2 });
        let resolver = LogicResolver::new(&algebra);
        let (e, _) = resolver.resolve("p & q & r").unwrap();
        assert!(matches!(
            algebra.simplify(e.to_slice()),
            Err(ExpressionError::Algebra(_))
        ));
    }

    #[test]
    fn variable_limit_is_clamped() {
        let wide = FiniteAlgebra::new(&AlgebraConfig { max_variables: 40 });
        assert_eq!(wide.max_variables(), MAX_VARIABLES_LIMIT);
        assert_eq!(FiniteAlgebra::new(&AlgebraConfig { max_variables: 0 }).max_variables(), 1);
        let leaves = (b'a'..=b'q')
            .map(|c| OwnedExpression::leaf(c as char).unwrap())
            .collect();
        let e = Expression::chain(Operator::And, leaves).unwrap();
        assert!(matches!(
            wide.simplify(e.to_slice()),
            Err(ExpressionError::Algebra(_))
        ));
    }

    #[test]
    fn minterms_are_written_for_espresso() {
        assert_eq!(sum_of_minterms(&[1, 2], 2), "v0 * ~v1 + ~v0 * v1");
        assert_eq!(sum_of_minterms(&[3], 2), "v0 * v1");
    }

    #[test]
    fn reads_minimized_forms_back() {
        let cube = |lits: &[(usize, bool)]| lits.iter().copied().collect::<Cube>();
        assert_eq!(
            read_cover("v0 * ~v1 + v2").unwrap(),
            vec![cube(&[(2, true)]), cube(&[(0, true), (1, false)])]
        );
        assert_eq!(
            read_cover("(v0 + v1) * !v2").unwrap(),
            vec![cube(&[(0, true), (2, false)]), cube(&[(1, true), (2, false)])]
        );
        assert_eq!(read_cover("v0' v1").unwrap(), vec![cube(&[(0, false), (1, true)])]);
        assert_eq!(read_cover("v0 + v0 * v1").unwrap(), vec![cube(&[(0, true)])]);
        assert_eq!(read_cover("~(v0 * v1)").unwrap().len(), 2);
        assert!(read_cover("v0 ^ v1").is_err());
    }

    #[test]
    fn five_variables() {
        assert_eq!(simplified("(p & q) | (p & ~q) | (r & s & t) | (r & s & ~t)"), "p | (r & s)");
    }

    #[test]
    fn set_operations() {
        let algebra = FiniteAlgebra::default();
        let a = SetValue::of_ints([1, 2, 3]);
        let b = SetValue::of_ints([3, 4]);
        assert_eq!(algebra.union(&a, &b), SetValue::of_ints([1, 2, 3, 4]));
        assert_eq!(algebra.intersection(&a, &b), SetValue::of_ints([3]));
        assert_eq!(algebra.difference(&a, &b), SetValue::of_ints([1, 2]));
        assert_eq!(
            algebra.complement(&b, &SetValue::of_ints(1..=5)),
            SetValue::of_ints([1, 2, 5])
        );
        assert_eq!(algebra.product(&b, &SetValue::of_tokens(["x"])).len(), 2);
        assert!(algebra.is_subset(&a, &a));
        assert!(!algebra.is_proper_subset(&a, &a));
        assert!(algebra.is_proper_subset(&SetValue::of_ints([1]), &a));
        assert!(algebra.set_eq(&a, &SetValue::of_ints([3, 2, 1])));
    }

    quickcheck! {
        fn simplification_preserves_truth_table(bits: u8) -> bool {
            // any function of three variables, written as a sum of its minterms
            let algebra = FiniteAlgebra::default();
            let vars = ['p', 'q', 'r'];
            let terms: Vec<OwnedExpression> = (0..8u32)
                .filter(|&m| bits & (1 << m) != 0)
                .filter_map(|m| {
                    let lits = (0..3)
                        .map(|j| {
                            let leaf = OwnedExpression::leaf(vars[j]).unwrap();
                            if m & (1 << j) != 0 { leaf } else { Expression::not(&leaf) }
                        })
                        .collect();
                    Expression::chain(Operator::And, lits)
                })
                .collect();
            let expr = match Expression::chain(Operator::Or, terms) {
                Some(e) => e,
                None => return true,
            };
            let simplified = algebra.simplify(expr.to_slice()).unwrap();
            (0..8u32).all(|m| {
                let value = |id: Identifier| {
                    vars.iter()
                        .position(|&v| v as Identifier == id)
                        .map_or(false, |j| m & (1 << j) != 0)
                };
                simplified.evaluate(&value) == expr.evaluate(&value)
            })
        }
    }
}
