//! Parser building blocks shared by the logic and the set grammar.
//!
//! Parsers produce the raw prefix sequence of an expression; the resolvers validate it with
//! [`Expression::from_raw`][crate::Expression::from_raw].

use crate::{
    error::{parse_error, ExpressionError, GreedyError, PResult},
    operator::Operator,
    types::Identifier,
};
use nom::{
    character::complete::{multispace0, satisfy},
    combinator::{not, peek},
};

/// Characters that continue a word, so that `pq` is not read as `p` followed by `q`
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Succeeds without consuming input if the next character does not continue a word
pub(crate) fn word_end(input: &str) -> PResult<'_, ()> {
    not(peek(satisfy(is_word_char)))(input)
}

/// Distinguishes stray operator symbols from other parse failures
pub(crate) fn classify(text: &str, error: nom::Err<GreedyError<&str>>) -> ExpressionError {
    let token = match &error {
        nom::Err::Error(e) | nom::Err::Failure(e) => e.position().and_then(|rest| {
            let token: String = rest
                .trim_start()
                .chars()
                .take_while(|c| !c.is_whitespace() && !is_word_char(*c) && !"()".contains(*c))
                .collect();
            Some(token).filter(|t| !t.is_empty())
        }),
        nom::Err::Incomplete(_) => None,
    };
    match token {
        Some(token) => ExpressionError::UnknownOperator {
            text: text.to_owned(),
            token,
        },
        None => parse_error(text, error),
    }
}

pub(crate) fn prefix(op: Operator, operands: Vec<Vec<Identifier>>) -> Vec<Identifier> {
    let mut res = vec![op.id()];
    for operand in operands {
        res.extend_from_slice(&operand);
    }
    res
}

/// Parses `operand (operator operand)*` and nests the result to the left.
///
/// Whitespace is skipped before each operator only; `operand` must skip its own leading
/// whitespace.
pub(crate) fn left_assoc<'a, P, O>(
    input: &'a str,
    mut operand: P,
    mut operator: O,
) -> PResult<'a, Vec<Identifier>>
where
    P: FnMut(&'a str) -> PResult<'a, Vec<Identifier>>,
    O: FnMut(&'a str) -> PResult<'a, Operator>,
{
    let (mut input, mut acc) = operand(input)?;
    loop {
        let (rest, _) = multispace0::<&str, GreedyError<&str>>(input)?;
        match operator(rest) {
            Ok((rest, op)) => {
                let (rest, rhs) = operand(rest)?;
                acc = prefix(op, vec![acc, rhs]);
                input = rest;
            }
            Err(nom::Err::Error(_)) => return Ok((input, acc)),
            Err(e) => return Err(e),
        }
    }
}
