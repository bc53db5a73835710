use std::fmt;

/// A transition symbol, either a concrete alphabet character or the epsilon
/// marker for transitions that consume no input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Symbol {
    Epsilon,
    Char(char),
}

impl Symbol {
    /// Returns the alphabet character, or `None` for epsilon.
    pub fn char(&self) -> Option<char> {
        match self {
            Symbol::Epsilon => None,
            Symbol::Char(c) => Some(*c),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Epsilon => write!(f, "ε"),
            Symbol::Char(c) => write!(f, "{c}"),
        }
    }
}
