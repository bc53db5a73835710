use std::error::Error;

/// Boxed dynamic error used at tool boundaries.
///
/// Library crates define their own error enums; those are widened into this
/// alias with `?` inside the binaries.
pub type FavisError = Box<dyn Error + Send + Sync>;
