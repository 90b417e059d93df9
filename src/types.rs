/// Type alias for an identifier representing a leaf or operator (see
/// [`Expression`][crate::Expression])
///
/// Leaves are non-negative and hold the character code of a propositional variable or a set
/// label. Operators are negative (see [`Operator::id`][crate::Operator::id]).
pub type Identifier = i16;

/// Type alias for an owned expression, the form returned by every resolver
pub type OwnedExpression = crate::Expression<Box<[Identifier]>>;
