//! Utility types and functions for the FAVIS toolset.
#![forbid(unsafe_code)]

mod error;
mod random_test;
mod timing;

pub use error::*;
pub use random_test::*;
pub use timing::*;
