//! Resolution of free-form propositional logic text into canonical expressions.

use crate::{
    algebra::Algebra,
    error::{ExpressionError, PResult},
    expression::{leaf_id, Expression},
    formatter::Formatter,
    grammar::{classify, is_word_char, left_assoc, prefix, word_end},
    normalizer::Normalizer,
    operator::Operator,
    types::*,
};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, multispace0, satisfy},
    combinator::{all_consuming, map, map_opt, value},
    error::context,
    sequence::{delimited, preceded, terminated},
};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// The free variables of a logic expression
pub type VariableSet = BTreeSet<char>;

/// Letters tried when the text has no isolated single-letter words
pub const FALLBACK_VARIABLES: [char; 4] = ['p', 'q', 'r', 's'];

/// Collects the propositional variables of normalized text.
///
/// A variable is a Latin letter that is neither preceded nor followed by another word
/// character. If there is none, the conventional letters `p`, `q`, `r`, `s` are accepted
/// wherever they are not part of a Latin word.
///
/// # Example
/// ```
/// use mantiq::logic::extract_variables;
///
/// let vars = extract_variables("(p & q) | ~ r");
/// assert_eq!(vars.into_iter().collect::<String>(), "pqr");
/// assert!(extract_variables("True | False").is_empty());
/// assert_eq!(extract_variables("pگ").into_iter().collect::<String>(), "p");
/// ```
pub fn extract_variables(text: &str) -> VariableSet {
    let chars: Vec<char> = text.chars().collect();
    let isolated = |i: usize, joins: fn(char) -> bool| {
        let before = i.checked_sub(1).map(|j| chars[j]);
        let after = chars.get(i + 1).copied();
        !before.map_or(false, joins) && !after.map_or(false, joins)
    };
    let variables: VariableSet = (0..chars.len())
        .filter(|&i| chars[i].is_ascii_alphabetic() && isolated(i, is_word_char))
        .map(|i| chars[i])
        .collect();
    if !variables.is_empty() {
        return variables;
    }
    (0..chars.len())
        .filter(|&i| FALLBACK_VARIABLES.contains(&chars[i]) && isolated(i, |c| c.is_ascii_alphabetic()))
        .map(|i| chars[i])
        .collect()
}

/// Parses normalized logic text.
///
/// The only names the grammar resolves are the letters in `variables` and the constants `True`
/// and `False`; any other identifier is a parse error.
///
/// Precedence from tightest to loosest: `~`, `&`, `^`, `|`, `>>` (right associative), `==`.
pub fn parse_logic(text: &str, variables: &VariableSet) -> Result<OwnedExpression, ExpressionError> {
    let (_, raw) = all_consuming(terminated(|s| iff(variables, s), multispace0))(text)
        .map_err(|e| classify(text, e))?;
    Expression::from_raw(raw.into_boxed_slice()).ok_or_else(|| ExpressionError::Parse {
        text: text.to_owned(),
        cause: "malformed expression".to_owned(),
    })
}

fn iff<'a>(vars: &VariableSet, input: &'a str) -> PResult<'a, Vec<Identifier>> {
    left_assoc(input, |s| implies(vars, s), value(Operator::Iff, tag("==")))
}

fn implies<'a>(vars: &VariableSet, input: &'a str) -> PResult<'a, Vec<Identifier>> {
    let (input, lhs) = or(vars, input)?;
    match preceded(multispace0, tag(">>"))(input) {
        Ok((rest, _)) => {
            let (rest, rhs) = implies(vars, rest)?;
            Ok((rest, prefix(Operator::Implies, vec![lhs, rhs])))
        }
        Err(nom::Err::Error(_)) => Ok((input, lhs)),
        Err(e) => Err(e),
    }
}

fn or<'a>(vars: &VariableSet, input: &'a str) -> PResult<'a, Vec<Identifier>> {
    left_assoc(input, |s| xor(vars, s), value(Operator::Or, tag("|")))
}

fn xor<'a>(vars: &VariableSet, input: &'a str) -> PResult<'a, Vec<Identifier>> {
    left_assoc(input, |s| and(vars, s), value(Operator::Xor, tag("^")))
}

fn and<'a>(vars: &VariableSet, input: &'a str) -> PResult<'a, Vec<Identifier>> {
    left_assoc(input, |s| unary(vars, s), value(Operator::And, tag("&")))
}

fn unary<'a>(vars: &VariableSet, input: &'a str) -> PResult<'a, Vec<Identifier>> {
    let (input, _) = multispace0(input)?;
    alt((
        map(preceded(char('~'), |s| unary(vars, s)), |operand| {
            prefix(Operator::Not, vec![operand])
        }),
        |s| atom(vars, s),
    ))(input)
}

fn atom<'a>(vars: &VariableSet, input: &'a str) -> PResult<'a, Vec<Identifier>> {
    alt((
        context(
            "parentheses",
            delimited(char('('), |s| iff(vars, s), preceded(multispace0, char(')'))),
        ),
        context("constant", constant),
        context("variable", |s| variable(vars, s)),
    ))(input)
}

fn constant(input: &str) -> PResult<'_, Vec<Identifier>> {
    alt((
        value(vec![Operator::True.id()], terminated(tag("True"), word_end)),
        value(vec![Operator::False.id()], terminated(tag("False"), word_end)),
    ))(input)
}

fn variable<'a>(vars: &VariableSet, input: &'a str) -> PResult<'a, Vec<Identifier>> {
    map_opt(
        terminated(satisfy(|c| c.is_ascii_alphabetic()), word_end),
        |c| {
            if vars.contains(&c) {
                leaf_id(c).map(|id| vec![id])
            } else {
                None
            }
        },
    )(input)
}

/// Resolves logic text and simplifies logic expressions.
///
/// ```
/// use mantiq::{FiniteAlgebra, Formatter, LogicResolver};
///
/// let algebra = FiniteAlgebra::default();
/// let resolver = LogicResolver::new(&algebra);
/// let (expr, vars) = resolver.resolve("ساده کن (p ∧ q) ∨ (p ∧ ¬q)").unwrap();
/// assert_eq!(vars.len(), 2);
/// let simplified = resolver.simplify(&expr).unwrap();
/// assert_eq!(Formatter::default().format(&simplified), "p");
/// ```
pub struct LogicResolver<'a, A: Algebra + ?Sized> {
    normalizer: Normalizer,
    algebra: &'a A,
}

impl<'a, A: Algebra + ?Sized> LogicResolver<'a, A> {
    pub fn new(algebra: &'a A) -> Self {
        LogicResolver {
            normalizer: Normalizer::new(),
            algebra,
        }
    }

    /// Normalizes `text`, extracts its variables and parses it.
    ///
    /// # Errors
    /// * `NoVariables` - if no propositional variable could be found
    /// * `UnknownOperator` - if a symbol left after normalization is not an operator
    /// * `Parse` - for every other malformed input, including names that are not variables
    pub fn resolve(&self, text: &str) -> Result<(OwnedExpression, VariableSet), ExpressionError> {
        let normalized = self.normalizer.normalize(text);
        let variables = extract_variables(&normalized);
        if variables.is_empty() {
            warn!(text = %normalized, "no variables in logic expression");
            return Err(ExpressionError::NoVariables { text: normalized });
        }
        let expr = parse_logic(&normalized, &variables).map_err(|e| {
            warn!(error = %e, "cannot resolve logic expression");
            e
        })?;
        debug!(
            expression = %Formatter::default().format(&expr),
            "resolved logic expression"
        );
        Ok((expr, variables))
    }

    pub fn simplify<T: Borrow<[Identifier]> + std::fmt::Debug>(
        &self,
        expr: &Expression<T>,
    ) -> Result<OwnedExpression, ExpressionError> {
        self.algebra.simplify(expr.to_slice()).map_err(|e| {
            warn!(error = %e, "cannot simplify logic expression");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{algebra::FiniteAlgebra, operator::Notation};

    fn resolve(text: &str) -> Result<OwnedExpression, ExpressionError> {
        let algebra = FiniteAlgebra::default();
        LogicResolver::new(&algebra).resolve(text).map(|(e, _)| e)
    }

    fn show(text: &str) -> String {
        Formatter::default().format(&resolve(text).unwrap())
    }

    #[test]
    fn words_and_symbols_resolve_alike() {
        assert_eq!(resolve("p and q").unwrap(), resolve("p ∧ q").unwrap());
        assert_eq!(resolve("p و q").unwrap(), resolve("p & q").unwrap());
        assert_eq!(resolve("not p or q").unwrap(), resolve("¬p ∨ q").unwrap());
        assert_eq!(resolve("p then q").unwrap(), resolve("p ⇒ q").unwrap());
    }

    #[test]
    fn precedence() {
        assert_eq!(show("p | q & r"), "p | (q & r)");
        assert_eq!(show("~p & q"), "~p & q");
        assert_eq!(show("p -> q -> r"), "p >> (q >> r)");
        assert_eq!(show("p <-> q | r"), "p == (q | r)");
        assert_eq!(show("p ^ q & r | s"), "(p ^ (q & r)) | s");
        assert_eq!(show("((p))"), "p");
    }

    #[test]
    fn constants() {
        assert_eq!(show("p | False"), "p | False");
        assert!(resolve("True").is_err());
    }

    #[test]
    fn ascii_output_resolves_back() {
        let algebra = FiniteAlgebra::default();
        let resolver = LogicResolver::new(&algebra);
        for text in ["(p ∧ q) ∨ ¬(r → s)", "p ↔ q ⊕ r", "¬¬p ∧ (q ∨ r ∨ s)"] {
            let (expr, _) = resolver.resolve(text).unwrap();
            let printed = Formatter::new(Notation::Ascii).format(&expr);
            assert_eq!(resolver.resolve(&printed).unwrap().0, expr, "{}", printed);
        }
    }

    #[test]
    fn other_names_are_not_resolvable() {
        assert!(matches!(
            resolve("p & __import__('os')"),
            Err(ExpressionError::Parse { .. }) | Err(ExpressionError::UnknownOperator { .. })
        ));
        assert!(matches!(
            resolve("p & foo"),
            Err(ExpressionError::Parse { .. })
        ));
        assert!(matches!(
            resolve("p.q"),
            Err(ExpressionError::UnknownOperator { .. })
        ));
    }

    #[test]
    fn unknown_operator() {
        match resolve("p + q") {
            Err(ExpressionError::UnknownOperator { token, text }) => {
                assert_eq!(token, "+");
                assert_eq!(text, "p + q");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unbalanced_parentheses() {
        assert!(matches!(resolve("(p & q"), Err(ExpressionError::Parse { .. })));
        assert!(resolve("p & q)").is_err());
        assert!(resolve("p &").is_err());
    }

    #[test]
    fn no_variables() {
        assert_eq!(
            resolve("سلام"),
            Err(ExpressionError::NoVariables {
                text: "سلام".to_owned()
            })
        );
    }
}
