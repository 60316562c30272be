//! Command-line interface module.

mod args;
pub mod check;
pub mod compile;
pub mod normalize;

pub use args::{Cli, Commands};
