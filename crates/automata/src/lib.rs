//! Finite automaton state graphs for the FAVIS toolset.
//!
//! An [`Automaton`] owns a dense arena of states addressed by [`StateId`].
//! The same representation serves both the nondeterministic automaton built
//! from an expression tree and the deterministic automaton derived from it;
//! epsilon closures, the coordinate layout pass and Graphviz rendering are
//! provided here as well.
#![forbid(unsafe_code)]

mod automaton;
mod closure;
mod display_dot;
mod state;
mod symbol;

pub use automaton::*;
pub use closure::*;
pub use display_dot::*;
pub use state::*;
pub use symbol::*;
