//! Regular expression syntax for the FAVIS toolset.
//!
//! Provides the well-formedness check and parser for the input dialect
//! (literals, concatenation, alternation, Kleene star and the empty string),
//! the resulting expression trees, a random expression generator for property
//! tests and a store for saved expression lists.
#![forbid(unsafe_code)]

mod io_saved;
mod parser;
mod random_regex;
mod regex_tree;

pub use io_saved::*;
pub use parser::*;
pub use random_regex::*;
pub use regex_tree::*;
