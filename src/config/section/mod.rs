//! Configuration section definitions.
//!
//! | Module      | TOML Section   | Purpose                              |
//! |-------------|----------------|--------------------------------------|
//! | `output`    | `[output]`     | Artifact directory and extension     |
//! | `compiler`  | `[compiler]`   | Preset or explicit command templates |
//! | `normalize` | `[normalize]`  | Resource path rewriting              |
//! | `cleanup`   | `[cleanup]`    | Temp root and source discarding      |

mod cleanup;
mod compiler;
mod normalize;
mod output;

pub use cleanup::CleanupConfig;
pub use compiler::CompilerConfig;
pub use normalize::NormalizeConfig;
pub use output::OutputConfig;
