//! Frame by frame animations for the FAVIS toolset.
//!
//! The three constructions each produce an append-only sequence of immutable
//! [`Frame`] snapshots: [`NfaConstruction`] expands an expression tree into a
//! nondeterministic automaton, [`DfaConstruction`] determinises that
//! automaton while showing both graphs side by side, and [`WordSimulation`]
//! walks a word through the finished deterministic automaton. The [`animate`]
//! entry point ties them together behind the well-formedness gate.
//!
//! Every sequence is deterministic: the same input produces the exact same
//! frames, which is what makes the animations replayable.
#![forbid(unsafe_code)]

mod animate;
mod dfa_construction;
mod frame;
mod nfa_construction;
mod word_simulation;

pub use animate::*;
pub use dfa_construction::*;
pub use frame::*;
pub use nfa_construction::*;
pub use word_simulation::*;
