use std::fmt;

/// A regular expression over single character literals.
///
/// The tree is immutable once parsed. `Empty` is a first class expression and
/// is distinct from the absence of an expression, since alternation branches
/// are allowed to be empty.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RegexTree {
    /// A single alphabet character.
    Literal(char),
    /// The empty string.
    Empty,
    /// Two expressions in sequence.
    Concat(Box<RegexTree>, Box<RegexTree>),
    /// A choice between two expressions.
    Alternation(Box<RegexTree>, Box<RegexTree>),
    /// Zero or more repetitions of the inner expression.
    Star(Box<RegexTree>),
}

impl RegexTree {
    /// The number of grid columns the expression occupies between the state
    /// pair it is constructed in, excluding that pair itself.
    pub fn x_span(&self) -> i32 {
        match self {
            RegexTree::Literal(_) | RegexTree::Empty => 0,
            RegexTree::Concat(left, right) => 1 + left.x_span() + right.x_span(),
            RegexTree::Alternation(left, right) => 2 + left.x_span().max(right.x_span()),
            RegexTree::Star(inner) => 2 + inner.x_span(),
        }
    }

    /// The number of grid rows the expression claims above the row of the
    /// state pair it is constructed in.
    pub fn y_span(&self) -> i32 {
        match self {
            RegexTree::Literal(_) | RegexTree::Empty => 0,
            RegexTree::Concat(left, right) => left.y_span().max(right.y_span()),
            RegexTree::Alternation(left, _) => 1 + left.y_span_nested(),
            RegexTree::Star(inner) => inner.y_span(),
        }
    }

    /// Rows claimed by alternations nested inside the first element of this
    /// expression. Later elements deliberately do not contribute.
    fn y_span_nested(&self) -> i32 {
        match self {
            RegexTree::Literal(_) | RegexTree::Empty => 0,
            RegexTree::Concat(left, _) => left.y_span_nested(),
            RegexTree::Alternation(left, _) => 2 + 2 * left.y_span_nested(),
            RegexTree::Star(inner) => inner.y_span_nested(),
        }
    }
}

/// Writes the fully bracketed canonical form. Reparsing a canonical form
/// yields the same canonical form again.
impl fmt::Display for RegexTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegexTree::Literal(c) => write!(f, "{c}"),
            RegexTree::Empty => write!(f, "ε"),
            RegexTree::Concat(left, right) => write!(f, "({left}{right})"),
            RegexTree::Alternation(left, right) => write!(f, "({left}|{right})"),
            RegexTree::Star(inner) => write!(f, "(({inner})*)"),
        }
    }
}
