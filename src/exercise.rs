//! Randomized practice exercises with canonical answers.
//!
//! Templates are expressions over placeholders `x0`, `x1`, `x2`. Each exercise binds them to
//! freshly drawn letters or set labels and derives its answer with the algebra, so the answer
//! is always consistent with the question.

use crate::{
    algebra::Algebra,
    error::ExpressionError,
    expression::{leaf_char, Expression, WholeSubstitution},
    formatter::Formatter,
    logic::FALLBACK_VARIABLES,
    operator::{Notation, Operator},
    sets::{NamedSets, SetResolver},
    types::*,
    value::SetValue,
};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use tracing::debug;

pub const YES: &str = "بله";
pub const NO: &str = "خیر";
pub const TRUE_ANSWER: &str = "صحیح";
pub const FALSE_ANSWER: &str = "غلط";

/// Tells the student which symbols a simplified answer is written and graded with
pub const ANSWER_NOTATION: &str = "پاسخ را با نمادهای ~ و & و | بنویسید";

const SET_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Logic,
    SetTheory,
}

impl Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Domain::Logic => "logic",
            Domain::SetTheory => "set_theory",
        })
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "logic" | "منطق" => Ok(Domain::Logic),
            "set_theory" | "set" | "sets" | "مجموعه" => Ok(Domain::SetTheory),
            other => Err(format!("unknown domain `{}`", other)),
        }
    }
}

/// A difficulty tier between 1 and 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: Difficulty = Difficulty(1);
    pub const MAX: Difficulty = Difficulty(3);

    pub fn new(tier: u8) -> Option<Self> {
        if (Self::MIN.0..=Self::MAX.0).contains(&tier) {
            Some(Difficulty(tier))
        } else {
            None
        }
    }

    /// The tier suited to a user of the given level
    ///
    /// ```
    /// use mantiq::Difficulty;
    ///
    /// assert_eq!(Difficulty::from_level(0).get(), 1);
    /// assert_eq!(Difficulty::from_level(2).get(), 2);
    /// assert_eq!(Difficulty::from_level(6).get(), 3);
    /// ```
    pub fn from_level(level: u8) -> Self {
        Difficulty(level.clamp(Self::MIN.0, Self::MAX.0))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = String;

    fn try_from(tier: u8) -> Result<Self, Self::Error> {
        Difficulty::new(tier).ok_or_else(|| format!("difficulty must be between 1 and 3, got {}", tier))
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> u8 {
        difficulty.0
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A question together with the answer it is graded against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    question: String,
    answer: String,
    domain: Domain,
    difficulty: Difficulty,
}

impl Exercise {
    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicTemplate {
    Simplification,
    TruthTable,
    Equivalence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetTemplate {
    Operation,
    Relation,
    CartesianProduct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    Logic(LogicTemplate),
    Set(SetTemplate),
}

impl Template {
    const LOGIC: [Template; 3] = [
        Template::Logic(LogicTemplate::Simplification),
        Template::Logic(LogicTemplate::TruthTable),
        Template::Logic(LogicTemplate::Equivalence),
    ];

    const SET: [Template; 3] = [
        Template::Set(SetTemplate::Operation),
        Template::Set(SetTemplate::Relation),
        Template::Set(SetTemplate::CartesianProduct),
    ];

    /// The templates an exercise of `domain` is drawn from
    pub fn pool(domain: Domain) -> &'static [Template] {
        match domain {
            Domain::Logic => &Self::LOGIC,
            Domain::SetTheory => &Self::SET,
        }
    }

    pub fn domain(self) -> Domain {
        match self {
            Template::Logic(_) => Domain::Logic,
            Template::Set(_) => Domain::SetTheory,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Subset,
    ProperSubset,
    Equal,
}

impl Relation {
    fn symbol(self) -> &'static str {
        match self {
            Relation::Subset => "⊆",
            Relation::ProperSubset => "⊂",
            Relation::Equal => "=",
        }
    }
}

fn x(id: Identifier) -> OwnedExpression {
    OwnedExpression::placeholder(id)
}

fn not(e: OwnedExpression) -> OwnedExpression {
    Expression::not(&e)
}

fn bin(op: Operator, l: OwnedExpression, r: OwnedExpression) -> OwnedExpression {
    Expression::binary(op, &l, &r)
}

fn and(l: OwnedExpression, r: OwnedExpression) -> OwnedExpression {
    bin(Operator::And, l, r)
}

fn or(l: OwnedExpression, r: OwnedExpression) -> OwnedExpression {
    bin(Operator::Or, l, r)
}

fn implies(l: OwnedExpression, r: OwnedExpression) -> OwnedExpression {
    bin(Operator::Implies, l, r)
}

fn simplification_patterns(difficulty: Difficulty) -> Vec<OwnedExpression> {
    match difficulty.get() {
        1 => vec![
            or(and(x(0), x(1)), and(x(0), not(x(1)))),
            and(or(x(0), x(1)), or(x(0), not(x(1)))),
            or(x(0), and(not(x(0)), x(1))),
        ],
        2 => vec![
            and(and(or(x(0), x(1)), or(not(x(0)), x(1))), or(x(0), not(x(1)))),
            or(or(and(x(0), x(1)), and(x(0), not(x(1)))), and(not(x(0)), x(1))),
            and(implies(x(0), x(1)), implies(x(1), x(0))),
        ],
        _ => vec![
            and(
                and(or(or(x(0), x(1)), x(2)), or(or(x(0), x(1)), not(x(2)))),
                or(or(x(0), not(x(1))), x(2)),
            ),
            implies(
                implies(x(0), implies(x(1), x(2))),
                implies(implies(x(0), x(1)), implies(x(0), x(2))),
            ),
            and(
                and(not(and(not(x(0)), not(x(1)))), not(and(not(x(0)), not(x(2))))),
                not(and(not(x(1)), not(x(2)))),
            ),
        ],
    }
}

fn truth_table_pattern(difficulty: Difficulty) -> OwnedExpression {
    match difficulty.get() {
        1 => and(x(0), x(1)),
        2 => implies(x(0), x(1)),
        _ => or(implies(x(0), x(1)), implies(x(1), x(2))),
    }
}

/// Pairs of expressions to compare. Harder tiers add pairs to the easier ones.
fn equivalence_pairs(difficulty: Difficulty) -> Vec<(OwnedExpression, OwnedExpression)> {
    let mut pairs = vec![
        (and(x(0), x(1)), and(x(1), x(0))),
        (or(x(0), x(1)), or(x(1), x(0))),
        (and(x(0), x(1)), or(x(0), x(1))),
        (not(and(x(0), x(1))), or(not(x(0)), not(x(1)))),
        (not(or(x(0), x(1))), and(not(x(0)), not(x(1)))),
    ];
    if difficulty.get() >= 2 {
        pairs.push((implies(x(0), x(1)), implies(not(x(1)), not(x(0)))));
        pairs.push((implies(x(0), x(1)), implies(x(1), x(0))));
    }
    if difficulty.get() >= 3 {
        pairs.push((implies(x(0), implies(x(1), x(2))), implies(and(x(0), x(1)), x(2))));
        pairs.push((implies(implies(x(0), x(1)), x(2)), implies(x(0), implies(x(1), x(2)))));
    }
    pairs
}

fn operation_patterns(difficulty: Difficulty) -> Vec<OwnedExpression> {
    let mut patterns = vec![
        bin(Operator::Union, x(0), x(1)),
        bin(Operator::Intersection, x(0), x(1)),
        bin(Operator::Difference, x(0), x(1)),
    ];
    if difficulty.get() >= 2 {
        patterns.push(bin(Operator::Intersection, bin(Operator::Union, x(0), x(1)), x(2)));
        patterns.push(bin(Operator::Union, bin(Operator::Difference, x(0), x(1)), x(2)));
    }
    if difficulty.get() >= 3 {
        patterns.push(bin(
            Operator::Difference,
            bin(Operator::Union, x(0), x(1)),
            bin(Operator::Intersection, x(1), x(2)),
        ));
        let complement = OwnedExpression::apply(
            Operator::Complement,
            &[bin(Operator::Intersection, x(0), x(1)).to_slice()],
        );
        patterns.extend(complement.map(|c| bin(Operator::Intersection, c, x(2))));
    }
    patterns
}

/// The four sets of a tier, each of the first tier with two elements
fn tier_sets(difficulty: Difficulty) -> NamedSets {
    let values: [&[i64]; 4] = match difficulty.get() {
        1 => [&[1, 2], &[2, 3], &[3, 4], &[1, 2]],
        2 => [&[1, 2, 3], &[1, 2, 3, 4, 5], &[2, 4], &[1, 3, 5]],
        _ => [&[1, 2, 3, 4], &[3, 4, 5, 6], &[2, 4, 6, 8], &[1, 3, 5, 7]],
    };
    SET_LABELS
        .iter()
        .zip(values)
        .map(|(&label, elements)| (label, SetValue::of_ints(elements.iter().copied())))
        .collect()
}

fn product_sets() -> NamedSets {
    [
        ('A', SetValue::of_ints([1, 2])),
        ('B', SetValue::of_tokens(["a", "b"])),
        ('C', SetValue::of_tokens(["x", "y"])),
    ]
    .into_iter()
    .collect()
}

/// Replaces placeholder `i` of `template` by the leaf named `names[i]`
fn bind(template: &OwnedExpression, names: &[char]) -> OwnedExpression {
    let leaves: Vec<OwnedExpression> = names.iter().filter_map(|&c| OwnedExpression::leaf(c)).collect();
    let mut substitution = WholeSubstitution::with_capacity(leaves.len());
    for (i, leaf) in leaves.iter().enumerate() {
        substitution.insert(i as Identifier, leaf.to_slice());
    }
    template.substitute(&substitution)
}

/// The sets among `sets` that `expr` refers to, as they appear in a question
fn restrict(expr: &OwnedExpression, sets: &NamedSets, all: bool) -> NamedSets {
    let used: Vec<char> = expr.variables().filter_map(leaf_char).collect();
    SET_LABELS
        .iter()
        .filter(|l| all || used.contains(l))
        .filter_map(|&l| sets.get(l).map(|s| (l, s.clone())))
        .collect()
}

fn describe(sets: &NamedSets) -> String {
    SET_LABELS
        .iter()
        .filter_map(|&l| sets.get(l).map(|s| format!("{} = {}", l, s)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn pick<'t, T, R: Rng + ?Sized>(items: &'t [T], rng: &mut R) -> &'t T {
    &items[rng.gen_range(0..items.len())]
}

/// Generates exercises.
///
/// A synthesizer holds no mutable state; one instance can serve any number of threads.
///
/// ```
/// use mantiq::{Difficulty, Domain, FiniteAlgebra, Synthesizer};
///
/// let algebra = FiniteAlgebra::default();
/// let synthesizer = Synthesizer::new(&algebra);
/// let exercise = synthesizer.synthesize(Domain::Logic, Difficulty::MIN).unwrap();
/// assert_eq!(exercise.domain(), Domain::Logic);
/// assert!(!exercise.answer().is_empty());
/// ```
pub struct Synthesizer<'a, A: Algebra + ?Sized> {
    algebra: &'a A,
    sets: SetResolver<'a, A>,
    question_format: Formatter,
    answer_format: Formatter,
}

impl<'a, A: Algebra + ?Sized> Synthesizer<'a, A> {
    pub fn new(algebra: &'a A) -> Self {
        Synthesizer {
            algebra,
            sets: SetResolver::new(algebra),
            question_format: Formatter::new(Notation::Unicode),
            answer_format: Formatter::new(Notation::Ascii),
        }
    }

    pub fn synthesize(&self, domain: Domain, difficulty: Difficulty) -> Result<Exercise, ExpressionError> {
        self.synthesize_with(domain, difficulty, &mut rand::thread_rng())
    }

    /// Picks a template of `domain` uniformly and generates an exercise from it
    pub fn synthesize_with<R: Rng + ?Sized>(
        &self,
        domain: Domain,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<Exercise, ExpressionError> {
        let template = *pick(Template::pool(domain), rng);
        self.generate(template, difficulty, rng)
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        template: Template,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<Exercise, ExpressionError> {
        let (question, answer) = match template {
            Template::Logic(t) => self.logic(t, difficulty, rng)?,
            Template::Set(t) => self.set(t, difficulty, rng)?,
        };
        debug!(?template, %difficulty, %question, %answer, "synthesized exercise");
        Ok(Exercise {
            question,
            answer,
            domain: template.domain(),
            difficulty,
        })
    }

    fn logic<R: Rng + ?Sized>(
        &self,
        template: LogicTemplate,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<(String, String), ExpressionError> {
        let mut letters = FALLBACK_VARIABLES;
        letters.shuffle(rng);
        let letters = &letters[..3];
        let show = |e: &OwnedExpression| self.question_format.format(e);
        Ok(match template {
            LogicTemplate::Simplification => {
                let expr = bind(pick(&simplification_patterns(difficulty), rng), letters);
                let simplified = self.algebra.simplify(expr.to_slice())?;
                (
                    format!("عبارت منطقی زیر را ساده کنید ({}): {}", ANSWER_NOTATION, show(&expr)),
                    self.answer_format.format(&simplified),
                )
            }
            LogicTemplate::TruthTable => {
                let expr = bind(&truth_table_pattern(difficulty), letters);
                let table = self.algebra.truth_table(expr.to_slice())?;
                let header: Vec<String> = table
                    .variables
                    .iter()
                    .filter_map(|&v| leaf_char(v))
                    .map(String::from)
                    .collect();
                (
                    format!(
                        "جدول درستی عبارت زیر را کامل کنید و ستون نتیجه را با T و F بنویسید \
                         (سطر اول: همه‌ی {} درست): {}",
                        header.join("، "),
                        show(&expr)
                    ),
                    table.column(),
                )
            }
            LogicTemplate::Equivalence => {
                let pairs = equivalence_pairs(difficulty);
                let (a, b) = pick(&pairs, rng);
                let (a, b) = (bind(a, letters), bind(b, letters));
                let equivalent = self.algebra.equivalent(a.to_slice(), b.to_slice())?;
                (
                    format!("آیا عبارت {} با عبارت {} معادل است؟", show(&a), show(&b)),
                    if equivalent { YES } else { NO }.to_owned(),
                )
            }
        })
    }

    fn set<R: Rng + ?Sized>(
        &self,
        template: SetTemplate,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<(String, String), ExpressionError> {
        let mut labels = SET_LABELS;
        labels.shuffle(rng);
        Ok(match template {
            SetTemplate::Operation => {
                let patterns = operation_patterns(difficulty);
                let expr = bind(pick(&patterns, rng), &labels);
                let with_complement = expr.operators().any(|op| op == Operator::Complement);
                let sets = restrict(&expr, &tier_sets(difficulty), with_complement);
                let outcome = self.sets.evaluate(&expr, &sets)?;
                (
                    format!(
                        "حاصل عبارت زیر را محاسبه کنید: {} که در آن {}",
                        self.question_format.format(&expr),
                        describe(&sets)
                    ),
                    outcome.to_string(),
                )
            }
            SetTemplate::Relation => {
                let relations: &[Relation] = match difficulty.get() {
                    1 => &[Relation::Subset, Relation::Equal],
                    _ => &[Relation::Subset, Relation::ProperSubset, Relation::Equal],
                };
                let relation = *pick(relations, rng);
                let sets = tier_sets(difficulty);
                let (l, r) = (labels[0], labels[1]);
                let (a, b) = match (sets.get(l), sets.get(r)) {
                    (Some(a), Some(b)) => (a, b),
                    _ => return Err(ExpressionError::UndefinedLabel { label: l }),
                };
                let holds = match relation {
                    Relation::Subset => self.algebra.is_subset(a, b),
                    Relation::ProperSubset => self.algebra.is_proper_subset(a, b),
                    Relation::Equal => self.algebra.set_eq(a, b),
                };
                let shown: NamedSets = [(l, a.clone()), (r, b.clone())].into_iter().collect();
                (
                    format!(
                        "تعیین کنید که آیا عبارت زیر صحیح است یا غلط: {} {} {} که در آن {}",
                        l,
                        relation.symbol(),
                        r,
                        describe(&shown)
                    ),
                    if holds { TRUE_ANSWER } else { FALSE_ANSWER }.to_owned(),
                )
            }
            SetTemplate::CartesianProduct => {
                let template = match difficulty.get() {
                    1 => bin(Operator::Product, x(0), x(1)),
                    2 => bin(Operator::Product, x(0), bin(Operator::Union, x(1), x(2))),
                    _ => bin(Operator::Product, bin(Operator::Product, x(0), x(1)), x(2)),
                };
                let expr = bind(&template, &['A', 'B', 'C']);
                let sets = restrict(&expr, &product_sets(), false);
                let outcome = self.sets.evaluate(&expr, &sets)?;
                (
                    format!(
                        "حاصل ضرب دکارتی زیر را محاسبه کنید: {} که در آن {}",
                        self.question_format.format(&expr),
                        describe(&sets)
                    ),
                    outcome.to_string(),
                )
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{algebra::FiniteAlgebra, logic::LogicResolver, sets::MANUAL_COMPUTATION, value::Element};
    use rand::{rngs::StdRng, SeedableRng};

    /// Parses the element list of a set as printed in a question
    fn printed_elements(set: &str) -> Vec<Element> {
        set.trim_matches(|c| c == '{' || c == '}')
            .split(", ")
            .filter(|s| !s.is_empty())
            .map(Element::parse)
            .collect()
    }

    const OPERATOR_SYMBOLS: &[char] = &['∪', '∩', '-', '×', '∁', '⊆', '⊂', '='];

    fn tier(n: u8) -> Difficulty {
        Difficulty::new(n).unwrap()
    }

    /// Splits a set question into its expression and its `label = {...}` definitions
    fn split_set_question(question: &str) -> (&str, Vec<(char, Vec<Element>)>) {
        let (head, defs) = question.split_once(" که در آن ").unwrap();
        let expr = head.rsplit_once(": ").unwrap().1;
        let defs = defs
            .split("}, ")
            .map(|d| {
                let (label, set) = d.split_once(" = ").unwrap();
                (label.chars().next().unwrap(), printed_elements(set))
            })
            .collect();
        (expr, defs)
    }

    #[test]
    fn first_tier_set_exercises_are_simple() {
        let algebra = FiniteAlgebra::default();
        let synthesizer = Synthesizer::new(&algebra);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let exercise = synthesizer
                .synthesize_with(Domain::SetTheory, tier(1), &mut rng)
                .unwrap();
            assert_eq!(exercise.domain(), Domain::SetTheory);
            assert!(!exercise.answer().is_empty());
            let (expr, defs) = split_set_question(exercise.question());
            let operators = expr.chars().filter(|c| OPERATOR_SYMBOLS.contains(c)).count();
            assert_eq!(operators, 1, "{}", exercise.question());
            for (label, elements) in defs {
                assert_eq!(elements.len(), 2, "{} in {}", label, exercise.question());
            }
        }
    }

    #[test]
    fn set_operation_answers_are_evaluated() {
        let algebra = FiniteAlgebra::default();
        let synthesizer = Synthesizer::new(&algebra);
        let resolver = SetResolver::new(&algebra);
        let mut rng = StdRng::seed_from_u64(11);
        for difficulty in 1..=3 {
            for _ in 0..50 {
                let exercise = synthesizer
                    .generate(Template::Set(SetTemplate::Operation), tier(difficulty), &mut rng)
                    .unwrap();
                // the question itself is a resolvable set text
                let text = exercise.question().split_once(": ").unwrap().1;
                let outcome = resolver.resolve(text).unwrap();
                assert_eq!(outcome.to_string(), exercise.answer(), "{}", text);
            }
        }
    }

    #[test]
    fn cartesian_products() {
        let algebra = FiniteAlgebra::default();
        let synthesizer = Synthesizer::new(&algebra);
        let mut rng = StdRng::seed_from_u64(3);
        let product = |n| {
            synthesizer
                .generate(Template::Set(SetTemplate::CartesianProduct), tier(n), &mut StdRng::seed_from_u64(n as u64))
                .unwrap()
        };
        assert_eq!(product(1).answer(), "{(1, a), (1, b), (2, a), (2, b)}");
        assert_eq!(product(2).answer().matches('(').count(), 8);
        assert_eq!(product(3).answer(), MANUAL_COMPUTATION);
        let exercise = synthesizer
            .generate(Template::Set(SetTemplate::CartesianProduct), tier(1), &mut rng)
            .unwrap();
        assert!(exercise.question().contains("A × B"));
    }

    #[test]
    fn relations_answer_true_or_false() {
        let algebra = FiniteAlgebra::default();
        let synthesizer = Synthesizer::new(&algebra);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let exercise = synthesizer
                .generate(Template::Set(SetTemplate::Relation), tier(2), &mut rng)
                .unwrap();
            assert!([TRUE_ANSWER, FALSE_ANSWER].contains(&exercise.answer()));
        }
    }

    #[test]
    fn simplification_answers_resolve_to_equivalent_expressions() {
        let algebra = FiniteAlgebra::default();
        let synthesizer = Synthesizer::new(&algebra);
        let resolver = LogicResolver::new(&algebra);
        let mut rng = StdRng::seed_from_u64(42);
        for difficulty in 1..=3 {
            for _ in 0..20 {
                let exercise = synthesizer
                    .generate(Template::Logic(LogicTemplate::Simplification), tier(difficulty), &mut rng)
                    .unwrap();
                assert!(exercise.question().contains(ANSWER_NOTATION));
                assert!(!exercise.answer().contains(['∧', '∨', '¬']));
                let question = exercise.question().split_once(": ").unwrap().1;
                let (question, _) = resolver.resolve(question).unwrap();
                if let Ok((answer, _)) = resolver.resolve(exercise.answer()) {
                    assert!(algebra.equivalent(question.to_slice(), answer.to_slice()).unwrap());
                } else {
                    // constants alone have no variables to resolve
                    assert!(["True", "False"].contains(&exercise.answer()));
                }
            }
        }
    }

    #[test]
    fn truth_table_answers() {
        let algebra = FiniteAlgebra::default();
        let synthesizer = Synthesizer::new(&algebra);
        let mut rng = StdRng::seed_from_u64(1);
        let mut table = |n| {
            synthesizer
                .generate(Template::Logic(LogicTemplate::TruthTable), tier(n), &mut rng)
                .unwrap()
                .answer()
                .to_owned()
        };
        assert_eq!(table(1), "TFFF");
        assert_eq!(table(2).len(), 4);
        assert_eq!(table(3), "TTTTTTTT");
    }

    #[test]
    fn equivalence_answers() {
        let algebra = FiniteAlgebra::default();
        let synthesizer = Synthesizer::new(&algebra);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let exercise = synthesizer
                .generate(Template::Logic(LogicTemplate::Equivalence), tier(3), &mut rng)
                .unwrap();
            assert!([YES, NO].contains(&exercise.answer()));
            assert!(exercise.question().ends_with("معادل است؟"));
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let algebra = FiniteAlgebra::default();
        let synthesizer = Synthesizer::new(&algebra);
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| synthesizer.synthesize_with(Domain::Logic, tier(2), &mut rng).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(17), run(17));
    }

    #[test]
    fn shared_between_threads() {
        let algebra = FiniteAlgebra::default();
        let synthesizer = Synthesizer::new(&algebra);
        std::thread::scope(|scope| {
            for domain in [Domain::Logic, Domain::SetTheory, Domain::Logic, Domain::SetTheory] {
                let synthesizer = &synthesizer;
                scope.spawn(move || {
                    for n in 1..=3 {
                        let exercise = synthesizer.synthesize(domain, tier(n)).unwrap();
                        assert_eq!(exercise.domain(), domain);
                        assert_eq!(exercise.difficulty().get(), n);
                    }
                });
            }
        });
    }

    #[test]
    fn domains_and_difficulties_parse() {
        assert_eq!("logic".parse::<Domain>(), Ok(Domain::Logic));
        assert_eq!(" Set_Theory ".parse::<Domain>(), Ok(Domain::SetTheory));
        assert!("algebra".parse::<Domain>().is_err());
        assert_eq!(Domain::SetTheory.to_string(), "set_theory");
        assert_eq!(Difficulty::new(0), None);
        assert_eq!(Difficulty::new(4), None);
        assert_eq!(Difficulty::try_from(2).map(u8::from), Ok(2));
    }
}
