//! `mantiq` turns free-form propositional logic and set-theory text into canonical expressions,
//! and synthesizes graded practice exercises from them.
//!
//! Input is usually written by students in a mix of scripts: Persian words (`یا`, `اجتماع`),
//! English words (`and`, `union`) and mathematical symbols (`∧`, `∪`). Every text goes through
//! the same pipeline: the [`Normalizer`] rewrites it into one canonical vocabulary, a resolver
//! parses it into an [`Expression`], and the [`Algebra`] simplifies or evaluates that expression.
//!
//! # Expressions
//! An [`Expression`] is a flat prefix encoding of an expression tree. Leaves are the letters of
//! propositional variables or set labels and operators are [`Operator`]s. Since a leaf carries
//! its own letter, expressions resolved from different texts can be compared directly: `p and q`
//! and `p ∧ q` resolve to equal expressions.
//!
//! ## Logic
//! The [`LogicResolver`] accepts exactly the single-letter variables found in the text and the
//! constants `True` and `False`. Nothing else can be named, so resolving a text never evaluates
//! anything but the expression it describes.
//!
//! ## Sets
//! The [`SetResolver`] reads definitions like `A = {1, 2, x}` and evaluates the remaining
//! expression over them. Some expressions are well formed but have no finite value, for example
//! `A ∪ ℕ`; they evaluate to [`SetOutcome::RequiresManualWork`] instead of an error.
//!
//! # Exercises
//! The [`Synthesizer`] draws an exercise from a pool of templates gated by [`Difficulty`] and
//! computes its answer with the same algebra the resolvers use. Answers are graded with
//! [`scoring::grade`] and rewarded according to a [`ScoringPolicy`].
//!
//! ```
//! use mantiq::{scoring, Difficulty, Domain, FiniteAlgebra, ScoringPolicy, Synthesizer};
//!
//! let algebra = FiniteAlgebra::default();
//! let exercise = Synthesizer::new(&algebra)
//!     .synthesize(Domain::SetTheory, Difficulty::MIN)
//!     .unwrap();
//! let correct = scoring::grade(exercise.answer(), &exercise);
//! assert!(correct);
//! assert_eq!(ScoringPolicy::default().points(exercise.difficulty(), correct, exercise.domain()), 12);
//! ```

#[cfg(test)]
#[macro_use]
extern crate quickcheck;

pub mod algebra;
pub mod config;
pub mod error;
pub mod exercise;
pub mod expression;
pub mod formatter;
mod grammar;
pub mod logic;
pub mod normalizer;
pub mod operator;
pub mod scoring;
pub mod sets;
mod types;
pub mod value;

pub use algebra::{Algebra, FiniteAlgebra, TruthTable};
pub use config::{AlgebraConfig, Config, ConfigError};
pub use error::ExpressionError;
pub use exercise::{Difficulty, Domain, Exercise, Synthesizer, Template};
pub use expression::Expression;
pub use formatter::Formatter;
pub use logic::{LogicResolver, VariableSet};
pub use normalizer::{normalize, Normalizer};
pub use operator::{Notation, Operator};
pub use scoring::{ScoreRecord, ScoringPolicy};
pub use sets::{NamedSets, SetOutcome, SetResolver};
pub use types::*;
pub use value::{Element, SetValue};
