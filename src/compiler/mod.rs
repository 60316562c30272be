//! Running the external TeX toolchain.
//!
//! ```text
//! compiler/
//! ├── pipeline     # Pipeline, CommandTemplate, Preset, CompileStep
//! ├── diagnostic   # DiagnosticLog (captured step output)
//! ├── rerun        # RerunStep: repeat an engine pass until it settles
//! └── file         # compile_file: run a pipeline, locate the artifact
//! ```

mod diagnostic;
mod file;
mod pipeline;
mod rerun;

pub use diagnostic::{DiagnosticLog, EXCERPT_LINES};
pub use file::{CompileJob, compile_file};
pub use pipeline::{CommandTemplate, CompileStep, Pipeline, Preset, StepContext};
pub use rerun::RerunStep;

#[cfg(test)]
pub use pipeline::step_fn;
