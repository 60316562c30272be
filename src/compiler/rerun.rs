//! Run a TeX engine until its output stops asking for another pass.

use super::{CommandTemplate, CompileStep, DiagnosticLog, StepContext};
use crate::debug;
use crate::utils::exec::{Cmd, combined_output};
use anyhow::{Result, bail};

/// Messages LaTeX and common packages print when references are unsettled.
const RERUN_MARKERS: &[&str] = &[
    "Rerun to get",
    "Label(s) may have changed",
    "Rerun LaTeX",
];

/// Repeats one engine pass, at most `max_passes` times.
#[derive(Debug, Clone)]
pub struct RerunStep {
    template: CommandTemplate,
    max_passes: usize,
}

impl RerunStep {
    pub fn new(template: CommandTemplate, max_passes: usize) -> Self {
        Self {
            template,
            max_passes: max_passes.max(1),
        }
    }
}

impl CompileStep for RerunStep {
    fn name(&self) -> &str {
        "rerun"
    }

    fn run(&self, ctx: &StepContext<'_>, log: &mut DiagnosticLog) -> Result<()> {
        let line = self.template.expand(ctx);
        for pass in 1..=self.max_passes {
            log.command(&line);
            debug!("compile"; "pass {}: {}", pass, line);

            let output = Cmd::shell(ctx.shell, &line)
                .cwd(ctx.work_dir)
                .envs(ctx.env_vars())
                .output()?;
            let text = combined_output(&output);
            log.write(&text);

            if !output.status.success() {
                bail!("pass {pass} `{line}` exited with {}", output.status);
            }
            if !needs_rerun(&text) {
                break;
            }
        }
        Ok(())
    }
}

fn needs_rerun(output: &str) -> bool {
    RERUN_MARKERS.iter().any(|marker| output.contains(marker))
}
