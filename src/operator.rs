use crate::types::Identifier;

/// Every operator known to the engine, in both the logic and the set-theory vocabulary.
///
/// Operators are stored inside expressions as negative identifiers, `-2 - index`, where `index`
/// is the position in [`Operator::ALL`]. `-1` is never used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operator {
    True,
    False,
    Not,
    And,
    Or,
    Implies,
    Iff,
    Xor,
    Union,
    Intersection,
    Difference,
    Complement,
    Product,
    Naturals,
    Integers,
    Rationals,
    Reals,
    Complexes,
}

/// Whether an operator belongs to propositional logic or to set theory
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vocabulary {
    Logic,
    Set,
}

/// How an operator is written
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notation {
    /// Plain keyboard symbols. Answers are rendered this way so they can be typed back.
    Ascii,
    /// Mathematical symbols, used for questions
    Unicode,
}

impl Operator {
    pub const ALL: [Operator; 18] = [
        Operator::True,
        Operator::False,
        Operator::Not,
        Operator::And,
        Operator::Or,
        Operator::Implies,
        Operator::Iff,
        Operator::Xor,
        Operator::Union,
        Operator::Intersection,
        Operator::Difference,
        Operator::Complement,
        Operator::Product,
        Operator::Naturals,
        Operator::Integers,
        Operator::Rationals,
        Operator::Reals,
        Operator::Complexes,
    ];

    /// The identifier used for this operator inside an expression.
    ///
    /// # Example
    /// ```
    /// use mantiq::Operator;
    ///
    /// assert_eq!(Operator::True.id(), -2);
    /// assert_eq!(Operator::from_id(Operator::And.id()), Some(Operator::And));
    /// assert_eq!(Operator::from_id(-1), None);
    /// ```
    pub fn id(self) -> Identifier {
        -2 - self as Identifier
    }

    pub fn from_id(id: Identifier) -> Option<Self> {
        if id > -2 {
            return None;
        }
        Self::ALL.get((-2 - id) as usize).copied()
    }

    pub fn arity(self) -> u8 {
        use Operator::*;
        match self {
            True | False | Naturals | Integers | Rationals | Reals | Complexes => 0,
            Not | Complement => 1,
            And | Or | Implies | Iff | Xor | Union | Intersection | Difference | Product => 2,
        }
    }

    pub fn vocabulary(self) -> Vocabulary {
        use Operator::*;
        match self {
            True | False | Not | And | Or | Implies | Iff | Xor => Vocabulary::Logic,
            _ => Vocabulary::Set,
        }
    }

    /// Operators whose left-nested chains may be written without parentheses
    pub fn is_associative(self) -> bool {
        use Operator::*;
        matches!(self, And | Or | Xor | Union | Intersection)
    }

    pub fn symbol(self, notation: Notation) -> &'static str {
        use Operator::*;
        match (self, notation) {
            (True, _) => "True",
            (False, _) => "False",
            (Not, Notation::Ascii) => "~",
            (Not, Notation::Unicode) => "¬",
            (And, Notation::Ascii) => "&",
            (And, Notation::Unicode) => "∧",
            (Or, Notation::Ascii) => "|",
            (Or, Notation::Unicode) => "∨",
            (Implies, Notation::Ascii) => ">>",
            (Implies, Notation::Unicode) => "→",
            (Iff, Notation::Ascii) => "==",
            (Iff, Notation::Unicode) => "↔",
            (Xor, Notation::Ascii) => "^",
            (Xor, Notation::Unicode) => "⊕",
            (Union, _) => "∪",
            (Intersection, _) => "∩",
            (Difference, _) => "-",
            (Complement, _) => "∁",
            (Product, _) => "×",
            (Naturals, _) => "ℕ",
            (Integers, _) => "ℤ",
            (Rationals, _) => "ℚ",
            (Reals, _) => "ℝ",
            (Complexes, _) => "ℂ",
        }
    }

    /// The symbol the normalizer rewrites every surface form of this operator to
    pub fn canonical(self) -> &'static str {
        self.symbol(Notation::Ascii)
    }
}
