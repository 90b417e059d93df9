//! Concrete set values.

use crate::operator::Operator;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt::{self, Display};

/// A member of a finite set.
///
/// Numbers compare by value regardless of representation, so `2` and `2.0` are the same
/// element. Numbers sort before tokens, tokens before tuples.
#[derive(Clone, Debug)]
pub enum Element {
    Int(i64),
    Float(f64),
    Token(String),
    /// A member of a cartesian product
    Tuple(Vec<Element>),
}

impl Element {
    /// Classifies the text of a single element: integer first, then floating point, and
    /// everything else is kept as an opaque token with surrounding quotes removed. Persian and
    /// Arabic-Indic digits count as digits, `٫` as the decimal separator.
    ///
    /// # Example
    /// ```
    /// use mantiq::Element;
    ///
    /// assert!(matches!(Element::parse("3"), Element::Int(3)));
    /// assert!(matches!(Element::parse("۱۲"), Element::Int(12)));
    /// assert!(matches!(Element::parse(" 2.5 "), Element::Float(f) if f == 2.5));
    /// assert!(matches!(Element::parse("٢٫٥"), Element::Float(f) if f == 2.5));
    /// assert!(matches!(Element::parse("'a'"), Element::Token(t) if t == "a"));
    /// assert!(matches!(Element::parse("inf"), Element::Token(_)));
    /// ```
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let digits = ascii_digits(text);
        if let Ok(i) = digits.parse::<i64>() {
            return Element::Int(i);
        }
        match digits.parse::<f64>() {
            Ok(f) if f.is_finite() => Element::Float(f),
            _ => Element::Token(
                text.trim_matches(|c: char| c == '\'' || c == '"' || c == '′' || c.is_whitespace())
                    .to_owned(),
            ),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Element::Int(i) => Some(*i as f64),
            Element::Float(f) => Some(*f),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Element::Int(_) | Element::Float(_) => 0,
            Element::Token(_) => 1,
            Element::Tuple(_) => 2,
        }
    }
}

/// Rewrites Extended Arabic-Indic (Persian) and Arabic-Indic digits and the Arabic decimal
/// separator to ASCII.
fn ascii_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
            '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
            '٫' => '.',
            c => c,
        })
        .collect()
}

/// Exact comparison of an integer with a float, without rounding the integer to `f64`.
/// NaN sorts after every integer.
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    const BOUND: f64 = 9_223_372_036_854_775_808.0; // 2^63
    if f.is_nan() || f >= BOUND {
        return Ordering::Less;
    }
    if f < -BOUND {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    match i128::from(i).cmp(&(whole as i128)) {
        Ordering::Equal => whole.partial_cmp(&f).unwrap_or(Ordering::Equal),
        unequal => unequal,
    }
}

fn cmp_floats(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

impl Ord for Element {
    fn cmp(&self, other: &Self) -> Ordering {
        use Element::*;
        match (self, other) {
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => cmp_floats(*a, *b),
            (Int(a), Float(b)) => cmp_int_float(*a, *b),
            (Float(a), Int(b)) => cmp_int_float(*b, *a).reverse(),
            (Token(a), Token(b)) => a.cmp(b),
            (Tuple(a), Tuple(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Element {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Element {}

impl Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Int(i) => write!(f, "{}", i),
            Element::Float(x) => write!(f, "{:?}", x),
            Element::Token(t) => f.write_str(t),
            Element::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// A finite set of elements.
///
/// When equal elements are added, the first one is kept: collecting `2` and then `2.0` yields
/// `{2}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct SetValue(BTreeSet<Element>);

impl SetValue {
    pub fn new() -> Self {
        SetValue(BTreeSet::new())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, element: &Element) -> bool {
        self.0.contains(element)
    }

    /// Adds `element` unless an equal one is present, which is then left untouched.
    pub fn insert(&mut self, element: Element) -> bool {
        self.0.insert(element)
    }

    /// The integers in this set, a shorthand for literals in tests and templates
    pub fn of_ints<I: IntoIterator<Item = i64>>(ints: I) -> Self {
        ints.into_iter().map(Element::Int).collect()
    }

    pub fn of_tokens<'a, I: IntoIterator<Item = &'a str>>(tokens: I) -> Self {
        tokens
            .into_iter()
            .map(|t| Element::Token(t.to_owned()))
            .collect()
    }
}

impl FromIterator<Element> for SetValue {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        // `BTreeSet::from_iter` keeps the last of equal elements
        let mut set = SetValue::new();
        for element in iter {
            set.insert(element);
        }
        set
    }
}

impl IntoIterator for SetValue {
    type Item = Element;
    type IntoIter = std::collections::btree_set::IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// ```
/// use mantiq::SetValue;
///
/// assert_eq!(SetValue::of_ints([3, 1, 2, 1]).to_string(), "{1, 2, 3}");
/// assert_eq!(SetValue::new().to_string(), "∅");
/// ```
impl Display for SetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("∅");
        }
        f.write_str("{")?;
        for (i, element) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", element)?;
        }
        f.write_str("}")
    }
}

/// The named infinite sets of numbers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumberSet {
    Naturals,
    Integers,
    Rationals,
    Reals,
    Complexes,
}

impl NumberSet {
    pub fn from_operator(op: Operator) -> Option<Self> {
        match op {
            Operator::Naturals => Some(NumberSet::Naturals),
            Operator::Integers => Some(NumberSet::Integers),
            Operator::Rationals => Some(NumberSet::Rationals),
            Operator::Reals => Some(NumberSet::Reals),
            Operator::Complexes => Some(NumberSet::Complexes),
            _ => None,
        }
    }

    /// Membership test for elements of a finite set. Naturals start at 1. Every finite float
    /// is rational.
    pub fn contains(self, element: &Element) -> bool {
        match (self, element) {
            (NumberSet::Naturals, Element::Int(i)) => *i >= 1,
            (NumberSet::Naturals, Element::Float(x)) => x.fract() == 0.0 && *x >= 1.0,
            (NumberSet::Integers, Element::Int(_)) => true,
            (NumberSet::Integers, Element::Float(x)) => x.fract() == 0.0,
            (_, Element::Int(_)) => true,
            (_, Element::Float(x)) => x.is_finite(),
            _ => false,
        }
    }
}
