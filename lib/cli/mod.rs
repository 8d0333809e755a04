//! Command-line interface and argument parsing.

mod args;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub mod styles;

pub use args::*;
