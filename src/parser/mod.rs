//! Format compiler
//!
//! This module turns format strings into weighted step programs.
//! The main entry point is the `compile` function; handlers are looked up
//! through a `TokenRegistry`.

mod combinators;
mod format;
mod registry;
mod tokens;

pub use format::compile;
pub use registry::{Claimed, CompileState, FallbackMode, TokenHandler, TokenRegistry};
