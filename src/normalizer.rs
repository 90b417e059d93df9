//! Rewrites mixed Persian, English and Unicode mathematical text into the canonical operator
//! symbols understood by the resolvers.

use crate::operator::Operator;

/// What a surface form is rewritten to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Canonical {
    Operator(Operator),
    /// Complement written after its operand, as in `A′`
    PostfixComplement,
    /// Instruction words and connectives that carry no mathematical meaning
    Prose,
}

pub const POSTFIX_COMPLEMENT: &str = "′";

impl Canonical {
    pub fn text(self) -> &'static str {
        match self {
            Canonical::Operator(op) => op.canonical(),
            Canonical::PostfixComplement => POSTFIX_COMPLEMENT,
            Canonical::Prose => "",
        }
    }
}

const BULLETS: [char; 5] = ['•', '·', '∙', '‣', '⁃'];

/// Every known surface form. The order here is irrelevant, [`Normalizer::new`] sorts it.
pub const TOKEN_MAPPING: &[(&str, Canonical)] = {
    use Canonical::{Operator as Op, PostfixComplement, Prose};
    use Operator::*;
    &[
        ("و", Op(And)),
        ("and", Op(And)),
        ("∧", Op(And)),
        ("⋀", Op(And)),
        ("یا", Op(Or)),
        ("or", Op(Or)),
        ("∨", Op(Or)),
        ("⋁", Op(Or)),
        ("نقیض", Op(Not)),
        ("not", Op(Not)),
        ("¬", Op(Not)),
        ("∼", Op(Not)),
        ("!", Op(Not)),
        ("آنگاه", Op(Implies)),
        ("then", Op(Implies)),
        ("→", Op(Implies)),
        ("⇒", Op(Implies)),
        ("⊃", Op(Implies)),
        ("->", Op(Implies)),
        ("اگر و فقط اگر", Op(Iff)),
        ("iff", Op(Iff)),
        ("↔", Op(Iff)),
        ("⇔", Op(Iff)),
        ("<->", Op(Iff)),
        ("xor", Op(Xor)),
        ("⊕", Op(Xor)),
        ("اجتماع", Op(Union)),
        ("union", Op(Union)),
        ("∪", Op(Union)),
        ("اشتراک", Op(Intersection)),
        ("intersection", Op(Intersection)),
        ("∩", Op(Intersection)),
        ("مکمل", Op(Complement)),
        ("complement", Op(Complement)),
        ("∁", Op(Complement)),
        ("′", PostfixComplement),
        ("'", PostfixComplement),
        ("تفاضل", Op(Difference)),
        ("difference", Op(Difference)),
        ("\\", Op(Difference)),
        ("∖", Op(Difference)),
        ("حاصلضرب", Op(Product)),
        ("حاصل‌ضرب", Op(Product)),
        ("product", Op(Product)),
        ("×", Op(Product)),
        ("⊗", Op(Product)),
        ("طبیعی", Op(Naturals)),
        ("naturals", Op(Naturals)),
        ("ℕ", Op(Naturals)),
        ("صحیح", Op(Integers)),
        ("integers", Op(Integers)),
        ("ℤ", Op(Integers)),
        ("گویا", Op(Rationals)),
        ("rationals", Op(Rationals)),
        ("ℚ", Op(Rationals)),
        ("حقیقی", Op(Reals)),
        ("reals", Op(Reals)),
        ("ℝ", Op(Reals)),
        ("مختلط", Op(Complexes)),
        ("complexes", Op(Complexes)),
        ("ℂ", Op(Complexes)),
        ("ساده کن", Prose),
        ("محاسبه کن", Prose),
        ("عبارت", Prose),
        ("را", Prose),
        ("که در آن", Prose),
        ("که", Prose),
        ("simplify", Prose),
        ("compute", Prose),
        ("evaluate", Prose),
        ("where", Prose),
    ]
};

/// Applies the token mapping longest surface form first.
///
/// A surface form that contains a shorter one (`گویا` contains `یا`, `xor` contains `or`) is
/// always replaced before the shorter one can match inside it.
#[derive(Debug, Clone)]
pub struct Normalizer {
    mapping: Vec<(&'static str, Canonical)>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Normalizer::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        let mut mapping = TOKEN_MAPPING.to_vec();
        mapping.sort_by_key(|(surface, _)| std::cmp::Reverse(surface.chars().count()));
        Normalizer { mapping }
    }

    /// The surface forms in the order they are applied
    pub fn mapping(&self) -> &[(&'static str, Canonical)] {
        &self.mapping
    }

    /// Normalizes `text`. Never fails: text without known tokens is only cleaned.
    ///
    /// Every replacement is padded with spaces, so a replacement can never join with its
    /// neighbours into a new surface form. Passes are repeated until nothing changes, which
    /// makes the result a fixed point.
    ///
    /// # Example
    /// ```
    /// use mantiq::Normalizer;
    ///
    /// let normalizer = Normalizer::new();
    /// assert_eq!(normalizer.normalize("• p  ∧ ¬q"), "p & ~ q");
    /// assert_eq!(normalizer.normalize("p اگر و فقط اگر q"), "p == q");
    /// assert_eq!(normalizer.normalize("  hello  "), "hello");
    /// ```
    pub fn normalize(&self, text: &str) -> String {
        let cleaned: String = text
            .chars()
            .map(|c| if BULLETS.contains(&c) { ' ' } else { c })
            .collect();
        let mut text = collapse_whitespace(&cleaned);
        loop {
            let next = self.replace_pass(&text);
            if next == text {
                return text;
            }
            text = next;
        }
    }

    fn replace_pass(&self, text: &str) -> String {
        let mut text = text.to_owned();
        for (surface, canonical) in &self.mapping {
            if text.contains(surface) {
                text = text.replace(surface, &format!(" {} ", canonical.text()));
            }
        }
        collapse_whitespace(&text)
    }
}

/// Normalizes `text` with a freshly built [`Normalizer`]
pub fn normalize(text: &str) -> String {
    Normalizer::new().normalize(text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
