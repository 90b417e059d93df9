//! Resolution and evaluation of set-theory text.
//!
//! A text consists of clauses `X = { e, e, ... }` defining named sets and one expression over
//! those names, e.g. `A ∪ B که A = {1,2,3}, B = {3,4,5}`. Definitions may appear before or after
//! the expression and are removed from the text before it is parsed.

use crate::{
    algebra::Algebra,
    error::{or_fail, ExpressionError, PResult},
    expression::{leaf_char, leaf_id, Expression},
    formatter::Formatter,
    grammar::{classify, is_word_char, left_assoc, prefix, word_end},
    normalizer::{Normalizer, POSTFIX_COMPLEMENT},
    operator::Operator,
    types::*,
    value::{Element, NumberSet, SetValue},
};
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{anychar, char, multispace0, satisfy},
    combinator::{all_consuming, map, map_opt, value, verify},
    error::context,
    multi::{many0, separated_list1},
    sequence::{delimited, preceded, terminated, tuple},
};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt::{self, Display};
use tracing::{debug, warn};

/// The answer given when a set expression cannot be reduced to a finite set
pub const MANUAL_COMPUTATION: &str = "محاسبه دستی مورد نیاز";

/// Characters separating definitions from each other and from the expression
const SEPARATORS: [char; 4] = [',', ';', '&', '،'];

/// Finite sets by label, local to one resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedSets {
    sets: BTreeMap<char, SetValue>,
    last: Option<char>,
}

impl NamedSets {
    pub fn new() -> Self {
        NamedSets::default()
    }

    /// Binds `label` to `value`, replacing an earlier definition
    pub fn define(&mut self, label: char, value: SetValue) {
        if let Some(old) = self.sets.insert(label, value) {
            debug!(%label, %old, "set redefined");
        }
        self.last = Some(label);
    }

    pub fn get(&self, label: char) -> Option<&SetValue> {
        self.sets.get(&label)
    }

    /// The most recently defined set
    pub fn last(&self) -> Option<(char, &SetValue)> {
        self.last.and_then(|l| self.sets.get(&l).map(|s| (l, s)))
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// The union of all named sets, against which complements are taken
    pub fn universe<A: Algebra + ?Sized>(&self, algebra: &A) -> SetValue {
        self.sets
            .values()
            .fold(SetValue::new(), |acc, s| algebra.union(&acc, s))
    }
}

impl FromIterator<(char, SetValue)> for NamedSets {
    fn from_iter<I: IntoIterator<Item = (char, SetValue)>>(iter: I) -> Self {
        let mut sets = NamedSets::new();
        for (label, value) in iter {
            sets.define(label, value);
        }
        sets
    }
}

/// The result of evaluating a set expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOutcome {
    Computed(SetValue),
    /// The expression is well formed, but its value is not a finite set this engine can
    /// enumerate
    RequiresManualWork,
}

impl Display for SetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetOutcome::Computed(value) => write!(f, "{}", value),
            SetOutcome::RequiresManualWork => f.write_str(MANUAL_COMPUTATION),
        }
    }
}

/// A parsed set text: the definitions and the expression, if the text has one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetQuery {
    pub sets: NamedSets,
    pub expression: Option<OwnedExpression>,
}

/// Intermediate value during evaluation
enum Partial {
    Finite { value: SetValue, product: bool },
    Infinite(NumberSet),
    Manual,
}

impl Partial {
    fn finite(value: SetValue) -> Self {
        Partial::Finite {
            value,
            product: false,
        }
    }
}

/// Resolves and evaluates set-theory text.
///
/// ```
/// use mantiq::{FiniteAlgebra, SetOutcome, SetResolver, SetValue};
///
/// let algebra = FiniteAlgebra::default();
/// let resolver = SetResolver::new(&algebra);
/// assert_eq!(
///     resolver.resolve("A ∪ B که A = {1,2,3}, B = {3,4,5}").unwrap(),
///     SetOutcome::Computed(SetValue::of_ints(1..=5))
/// );
/// assert!(resolver.resolve("A ∪ B").is_err());
/// ```
pub struct SetResolver<'a, A: Algebra + ?Sized> {
    normalizer: Normalizer,
    algebra: &'a A,
}

impl<'a, A: Algebra + ?Sized> SetResolver<'a, A> {
    pub fn new(algebra: &'a A) -> Self {
        SetResolver {
            normalizer: Normalizer::new(),
            algebra,
        }
    }

    /// Parses and evaluates `text`.
    ///
    /// A text that only defines sets evaluates to the last set it defines.
    ///
    /// # Errors
    /// * `MalformedDefinition` - if a brace list is unterminated, nested or has empty elements
    /// * `UndefinedLabel` - if the expression names a set that is never defined
    /// * `EmptyExpression` - if there is neither an expression nor a definition
    /// * `Parse`, `UnknownOperator` - if the expression is not well formed
    pub fn resolve(&self, text: &str) -> Result<SetOutcome, ExpressionError> {
        let outcome = self.parse(text).and_then(|query| match &query.expression {
            Some(expr) => self.evaluate(expr, &query.sets),
            None => match query.sets.last() {
                Some((_, value)) => Ok(SetOutcome::Computed(value.clone())),
                None => Err(ExpressionError::EmptyExpression {
                    text: text.to_owned(),
                }),
            },
        });
        outcome.map_err(|e| {
            warn!(error = %e, "cannot resolve set expression");
            e
        })
    }

    /// Normalizes `text`, collects its definitions and parses the remaining expression
    pub fn parse(&self, text: &str) -> Result<SetQuery, ExpressionError> {
        let normalized = self.normalizer.normalize(text);
        let (sets, rest) = scan_definitions(&normalized)?;
        let rest: String = rest
            .chars()
            .map(|c| if SEPARATORS.contains(&c) { ' ' } else { c })
            .collect();
        let rest = rest.trim();
        if rest.is_empty() {
            return Ok(SetQuery {
                sets,
                expression: None,
            });
        }
        let expression = parse_set(rest)?;
        debug!(
            expression = %Formatter::default().format(&expression),
            definitions = sets.len(),
            "resolved set expression"
        );
        Ok(SetQuery {
            sets,
            expression: Some(expression),
        })
    }

    /// Evaluates `expr` over `sets`.
    ///
    /// Unions with an infinite set, complements of infinite sets and products of products
    /// cannot be enumerated and give [`SetOutcome::RequiresManualWork`]. Intersections and
    /// differences of a finite set with an infinite one are computed by membership.
    pub fn evaluate<T: Borrow<[Identifier]> + std::fmt::Debug>(
        &self,
        expr: &Expression<T>,
        sets: &NamedSets,
    ) -> Result<SetOutcome, ExpressionError> {
        for id in expr.variables() {
            let label = leaf_char(id).unwrap_or(char::REPLACEMENT_CHARACTER);
            if sets.get(label).is_none() {
                return Err(ExpressionError::UndefinedLabel { label });
            }
        }
        let universe = sets.universe(self.algebra);
        Ok(match self.evaluate_partial(expr.to_slice(), sets, &universe)? {
            Partial::Finite { value, .. } => SetOutcome::Computed(value),
            Partial::Infinite(_) | Partial::Manual => {
                debug!("set expression requires manual computation");
                SetOutcome::RequiresManualWork
            }
        })
    }

    fn evaluate_partial(
        &self,
        expr: Expression<&[Identifier]>,
        sets: &NamedSets,
        universe: &SetValue,
    ) -> Result<Partial, ExpressionError> {
        let op = match expr.head() {
            None => {
                let label = expr.as_leaf().and_then(leaf_char).unwrap_or(char::REPLACEMENT_CHARACTER);
                return sets
                    .get(label)
                    .map(|value| Partial::finite(value.clone()))
                    .ok_or(ExpressionError::UndefinedLabel { label });
            }
            Some(op) => op,
        };
        if let Some(number_set) = NumberSet::from_operator(op) {
            return Ok(Partial::Infinite(number_set));
        }
        let mut operands = Vec::with_capacity(2);
        for operand in expr.operands() {
            operands.push(self.evaluate_partial(operand, sets, universe)?);
        }
        let algebra = self.algebra;
        use Partial::*;
        Ok(match (op, operands.as_slice()) {
            (_, [Manual]) | (_, [Manual, _]) | (_, [_, Manual]) => Manual,
            (Operator::Complement, [Finite { value, .. }]) => {
                Partial::finite(algebra.complement(value, universe))
            }
            (Operator::Complement, [Infinite(_)]) => Manual,
            (Operator::Union, [Finite { value: a, .. }, Finite { value: b, .. }]) => {
                Partial::finite(algebra.union(a, b))
            }
            (Operator::Union, _) => Manual,
            (Operator::Intersection, [Finite { value: a, .. }, Finite { value: b, .. }]) => {
                Partial::finite(algebra.intersection(a, b))
            }
            (Operator::Intersection, [Finite { value, .. }, Infinite(n)])
            | (Operator::Intersection, [Infinite(n), Finite { value, .. }]) => {
                Partial::finite(value.iter().filter(|e| n.contains(e)).cloned().collect())
            }
            (Operator::Intersection, _) => Manual,
            (Operator::Difference, [Finite { value: a, .. }, Finite { value: b, .. }]) => {
                Partial::finite(algebra.difference(a, b))
            }
            (Operator::Difference, [Finite { value, .. }, Infinite(n)]) => {
                Partial::finite(value.iter().filter(|e| !n.contains(e)).cloned().collect())
            }
            (Operator::Difference, _) => Manual,
            (
                Operator::Product,
                [Finite {
                    value: a,
                    product: false,
                }, Finite {
                    value: b,
                    product: false,
                }],
            ) => Finite {
                value: algebra.product(a, b),
                product: true,
            },
            (Operator::Product, _) => Manual,
            (op, _) => {
                return Err(ExpressionError::Algebra(format!(
                    "`{}` is not a set operator",
                    op.canonical()
                )))
            }
        })
    }
}

/// Removes every `X = {...}` clause from `text`, returning the definitions and what remains
fn scan_definitions(text: &str) -> Result<(NamedSets, String), ExpressionError> {
    let malformed = || ExpressionError::MalformedDefinition {
        text: text.to_owned(),
    };
    let mut sets = NamedSets::new();
    let mut rest = String::with_capacity(text.len());
    let mut input = text;
    let mut previous: Option<char> = None;
    while let Some(c) = input.chars().next() {
        if !previous.map_or(false, is_word_char) {
            match definition(input) {
                Ok((after, (label, value))) => {
                    debug!(%label, %value, "set defined");
                    sets.define(label, value);
                    rest.push(' ');
                    input = after;
                    previous = None;
                    continue;
                }
                Err(nom::Err::Error(_)) => {}
                Err(_) => return Err(malformed()),
            }
        }
        rest.push(c);
        previous = Some(c);
        input = &input[c.len_utf8()..];
    }
    if rest.contains(&['{', '}', '='][..]) {
        return Err(malformed());
    }
    Ok((sets, rest))
}

/// `X = { e, ... }`. Everything after the opening brace must be well formed.
fn definition(input: &str) -> PResult<'_, (char, SetValue)> {
    let (input, label) = terminated(satisfy(|c| c.is_ascii_uppercase()), word_end)(input)?;
    let (input, _) = tuple((multispace0, char('='), multispace0, char('{')))(input)?;
    let (input, elements) = or_fail(context(
        "set elements",
        terminated(elements, preceded(multispace0, char('}'))),
    ))(input)?;
    Ok((input, (label, elements.into_iter().collect())))
}

fn elements(input: &str) -> PResult<'_, Vec<Element>> {
    let (rest, _) = multispace0(input)?;
    if rest.starts_with('}') {
        return Ok((rest, Vec::new()));
    }
    separated_list1(char(','), element)(input)
}

fn element(input: &str) -> PResult<'_, Element> {
    map(
        verify(is_not(",{}"), |s: &str| !s.trim().is_empty()),
        Element::parse,
    )(input)
}

/// Parses a set expression without definitions.
///
/// Precedence from tightest to loosest: complement (`∁` prefix, `′` postfix), `×`, `∩`, then
/// `∪` and `-` which associate to the left.
pub fn parse_set(text: &str) -> Result<OwnedExpression, ExpressionError> {
    let (_, raw) = all_consuming(terminated(union, multispace0))(text).map_err(|e| classify(text, e))?;
    Expression::from_raw(raw.into_boxed_slice()).ok_or_else(|| ExpressionError::Parse {
        text: text.to_owned(),
        cause: "malformed expression".to_owned(),
    })
}

fn union(input: &str) -> PResult<'_, Vec<Identifier>> {
    left_assoc(
        input,
        intersection,
        alt((
            value(Operator::Union, tag("∪")),
            value(Operator::Difference, tag("-")),
        )),
    )
}

fn intersection(input: &str) -> PResult<'_, Vec<Identifier>> {
    left_assoc(input, product, value(Operator::Intersection, tag("∩")))
}

fn product(input: &str) -> PResult<'_, Vec<Identifier>> {
    left_assoc(input, complement, value(Operator::Product, tag("×")))
}

fn complement(input: &str) -> PResult<'_, Vec<Identifier>> {
    let (input, _) = multispace0(input)?;
    alt((
        map(preceded(char('∁'), complement), |operand| {
            prefix(Operator::Complement, vec![operand])
        }),
        postfix_complement,
    ))(input)
}

fn postfix_complement(input: &str) -> PResult<'_, Vec<Identifier>> {
    let (input, operand) = atom(input)?;
    let (input, marks) = many0(preceded(multispace0, tag(POSTFIX_COMPLEMENT)))(input)?;
    Ok((
        input,
        marks
            .into_iter()
            .fold(operand, |acc, _| prefix(Operator::Complement, vec![acc])),
    ))
}

fn atom(input: &str) -> PResult<'_, Vec<Identifier>> {
    alt((
        context(
            "parentheses",
            delimited(char('('), union, preceded(multispace0, char(')'))),
        ),
        context("number set", number_set),
        context("label", label),
    ))(input)
}

fn number_set(input: &str) -> PResult<'_, Vec<Identifier>> {
    map_opt(anychar, |c| {
        Operator::ALL
            .iter()
            .copied()
            .filter(|&op| NumberSet::from_operator(op).is_some())
            .find(|op| op.canonical().chars().eq(std::iter::once(c)))
            .map(|op| vec![op.id()])
    })(input)
}

fn label(input: &str) -> PResult<'_, Vec<Identifier>> {
    map_opt(
        terminated(satisfy(|c| c.is_ascii_uppercase()), word_end),
        |c| leaf_id(c).map(|id| vec![id]),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::FiniteAlgebra;

    fn resolve(text: &str) -> Result<SetOutcome, ExpressionError> {
        let algebra = FiniteAlgebra::default();
        SetResolver::new(&algebra).resolve(text)
    }

    fn computed(text: &str) -> SetValue {
        match resolve(text) {
            Ok(SetOutcome::Computed(value)) => value,
            other => panic!("{} resolved to {:?}", text, other),
        }
    }

    fn show(text: &str) -> String {
        Formatter::default().format(&parse_set(text).unwrap())
    }

    #[test]
    fn element_typing() {
        let value = computed("A = {1, 2, x}");
        let elements: Vec<Element> = value.into_iter().collect();
        assert!(matches!(elements[0], Element::Int(1)));
        assert!(matches!(elements[1], Element::Int(2)));
        assert!(matches!(&elements[2], Element::Token(t) if t == "x"));
        assert!(matches!(
            computed("A = {2.5}").iter().next(),
            Some(Element::Float(f)) if *f == 2.5
        ));
        assert_eq!(computed("B = {'a', 'b'}"), SetValue::of_tokens(["a", "b"]));
    }

    #[test]
    fn persian_digits_are_numbers() {
        assert_eq!(computed("A ∪ B که A = {۱, ۲}, B = {1}"), SetValue::of_ints([1, 2]));
        assert_eq!(computed("A = {٣, ٤}"), SetValue::of_ints([3, 4]));
    }

    #[test]
    fn first_definition_of_an_element_wins() {
        assert_eq!(computed("A = {2, 2.0}").to_string(), "{2}");
        assert_eq!(computed("A ∪ B که A = {2.0}, B = {2, 3}").to_string(), "{2.0, 3}");
        assert_eq!(
            computed("A = {9007199254740993, 9007199254740992.0, 9007199254740992}").len(),
            2
        );
    }

    #[test]
    fn definitions_after_expression() {
        assert_eq!(
            computed("A ∪ B که A = {1,2,3}, B = {3,4,5}"),
            SetValue::of_ints(1..=5)
        );
        assert_eq!(
            computed("A = {1,2,3}; B = {3,4,5}; A اشتراک B"),
            SetValue::of_ints([3])
        );
        assert_eq!(computed("A تفاضل B where A = {1,2,3} and B = {3}"), SetValue::of_ints([1, 2]));
    }

    #[test]
    fn later_definitions_overwrite() {
        assert_eq!(computed("A, A = {1}, A = {2}"), SetValue::of_ints([2]));
    }

    #[test]
    fn undefined_label() {
        assert_eq!(
            resolve("A ∪ B"),
            Err(ExpressionError::UndefinedLabel { label: 'A' })
        );
        assert_eq!(
            resolve("A ∪ C, A = {1}"),
            Err(ExpressionError::UndefinedLabel { label: 'C' })
        );
    }

    #[test]
    fn malformed_definitions() {
        for text in ["A = {1, 2", "A = {1, {2}}", "A = {1,,2}", "A = {1, }", "A ∪ B, A = 5"] {
            assert!(
                matches!(resolve(text), Err(ExpressionError::MalformedDefinition { .. })),
                "{}",
                text
            );
        }
        assert_eq!(computed("A = {}"), SetValue::new());
    }

    #[test]
    fn empty_text() {
        assert!(matches!(
            resolve("  "),
            Err(ExpressionError::EmptyExpression { .. })
        ));
    }

    #[test]
    fn precedence() {
        assert_eq!(show("A ∪ B ∩ C"), "A ∪ (B ∩ C)");
        assert_eq!(show("A - B ∪ C"), "(A - B) ∪ C");
        assert_eq!(show("A × B ∩ C"), "(A × B) ∩ C");
        assert_eq!(show("∁A ∩ B ′"), "∁A ∩ ∁B");
        assert_eq!(show("(A ∪ B) ′"), "∁(A ∪ B)");
    }

    #[test]
    fn unknown_symbols() {
        assert!(matches!(
            parse_set("A + B"),
            Err(ExpressionError::UnknownOperator { token, .. }) if token == "+"
        ));
        assert!(matches!(parse_set("A ∪ b"), Err(ExpressionError::Parse { .. })));
        assert!(matches!(parse_set("AB"), Err(ExpressionError::Parse { .. })));
    }

    #[test]
    fn complement_against_all_named_sets() {
        assert_eq!(
            computed("A' که A = {1, 2}, B = {2, 3, 4}"),
            SetValue::of_ints([3, 4])
        );
        assert_eq!(computed("مکمل A, A = {1}"), SetValue::new());
    }

    #[test]
    fn products() {
        let value = computed("A × B, A = {1, 2}, B = {a, b}");
        assert_eq!(value.len(), 4);
        assert_eq!(value.to_string(), "{(1, a), (1, b), (2, a), (2, b)}");
        assert_eq!(
            resolve("A × B × C, A = {1}, B = {2}, C = {3}"),
            Ok(SetOutcome::RequiresManualWork)
        );
    }

    #[test]
    fn infinite_sets() {
        assert_eq!(
            computed("A ∩ ℕ, A = {-1, 0, 1, 2.5, x}"),
            SetValue::of_ints([1])
        );
        assert_eq!(
            computed("A ∩ صحیح, A = {-1, 0, 2.5}"),
            SetValue::of_ints([-1, 0])
        );
        assert_eq!(computed("A - ℤ, A = {1, 2.5}").len(), 1);
        assert_eq!(resolve("A ∪ ℝ, A = {1}"), Ok(SetOutcome::RequiresManualWork));
        assert_eq!(resolve("ℕ ∩ ℤ"), Ok(SetOutcome::RequiresManualWork));
        assert_eq!(resolve("ℕ"), Ok(SetOutcome::RequiresManualWork));
        assert_eq!(
            SetOutcome::RequiresManualWork.to_string(),
            MANUAL_COMPUTATION
        );
    }

    #[test]
    fn evaluates_expressions_built_directly() {
        let algebra = FiniteAlgebra::default();
        let resolver = SetResolver::new(&algebra);
        let sets: NamedSets = [('A', SetValue::of_ints([1, 2])), ('B', SetValue::of_ints([2]))]
            .into_iter()
            .collect();
        let a = OwnedExpression::leaf('A').unwrap();
        let b = OwnedExpression::leaf('B').unwrap();
        let e = Expression::binary(Operator::Difference, &a, &b);
        assert_eq!(
            resolver.evaluate(&e, &sets),
            Ok(SetOutcome::Computed(SetValue::of_ints([1])))
        );
        let logic = Expression::binary(Operator::And, &a, &b);
        assert!(matches!(
            resolver.evaluate(&logic, &sets),
            Err(ExpressionError::Algebra(_))
        ));
    }
}
