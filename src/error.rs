use std::fmt::Display;

use nom::{
    error::{ContextError, ErrorKind, ParseError},
    IResult, Parser,
};
use thiserror::Error;

/// The error produced when text cannot be resolved into an expression or when the algebra
/// capability fails on an expression.
///
/// Every variant is recoverable: callers are expected to fall back to a different way of
/// answering the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    #[error("cannot parse `{text}`: {cause}")]
    Parse { text: String, cause: String },

    #[error("no propositional variables found in `{text}`")]
    NoVariables { text: String },

    #[error("unknown operator `{token}` in `{text}`")]
    UnknownOperator { text: String, token: String },

    #[error("set `{label}` is used but never defined")]
    UndefinedLabel { label: char },

    #[error("malformed set definition in `{text}`")]
    MalformedDefinition { text: String },

    #[error("nothing to evaluate in `{text}`")]
    EmptyExpression { text: String },

    #[error("algebra error: {0}")]
    Algebra(String),
}

/// A nom error which remembers the alternative that got furthest into the input
#[derive(Debug)]
pub struct GreedyError<I>(Vec<(I, GreedyErrorKind)>);

#[derive(Debug)]
enum GreedyErrorKind {
    Context(&'static str),
    Nom(ErrorKind),
    Char(char),
}

pub trait Length {
    fn length(&self) -> usize;
}

impl Length for &str {
    fn length(&self) -> usize {
        self.len()
    }
}

impl Display for GreedyError<&str> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (input, error)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let preview: String = input.chars().take(20).collect();
            match error {
                GreedyErrorKind::Context(ctx) => write!(f, "in {} at {:?}", ctx, preview)?,
                GreedyErrorKind::Nom(kind) => write!(f, "{:?} at {:?}", kind, preview)?,
                GreedyErrorKind::Char(c) => write!(f, "expected {:?} at {:?}", c, preview)?,
            }
        }
        Ok(())
    }
}

impl<I> GreedyError<I> {
    /// The input remaining where the furthest alternative failed
    pub fn position(&self) -> Option<&I> {
        self.0.first().map(|(input, _)| input)
    }
}

impl<I> ParseError<I> for GreedyError<I>
where
    I: Length,
{
    fn from_error_kind(input: I, kind: ErrorKind) -> Self {
        Self(vec![(input, GreedyErrorKind::Nom(kind))])
    }

    fn append(input: I, kind: ErrorKind, mut other: Self) -> Self {
        other.0.push((input, GreedyErrorKind::Nom(kind)));
        other
    }

    fn from_char(input: I, c: char) -> Self {
        Self(vec![(input, GreedyErrorKind::Char(c))])
    }

    fn or(self, other: Self) -> Self {
        if self.0[0].0.length() < other.0[0].0.length() {
            self
        } else {
            other
        }
    }
}

impl<I> ContextError<I> for GreedyError<I> {
    fn add_context(input: I, ctx: &'static str, mut other: Self) -> Self {
        other.0.push((input, GreedyErrorKind::Context(ctx)));
        other
    }
}

pub type PResult<'a, O> = IResult<&'a str, O, GreedyError<&'a str>>;

/// Turns recoverable errors of `f` into failures, so that `alt` stops trying other branches
pub fn or_fail<I, O, E: ParseError<I>, F>(mut f: F) -> impl FnMut(I) -> IResult<I, O, E>
where
    F: Parser<I, O, E>,
{
    move |input| {
        f.parse(input).map_err(|error| match error {
            nom::Err::Error(e) => nom::Err::Failure(e),
            e => e,
        })
    }
}

/// Wraps a nom error into an [`ExpressionError::Parse`] for the given text
pub(crate) fn parse_error(text: &str, error: nom::Err<GreedyError<&str>>) -> ExpressionError {
    let cause = match error {
        nom::Err::Error(e) | nom::Err::Failure(e) => e.to_string(),
        nom::Err::Incomplete(_) => "incomplete input".to_owned(),
    };
    ExpressionError::Parse {
        text: text.to_owned(),
        cause,
    }
}
