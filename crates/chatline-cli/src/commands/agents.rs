use anyhow::{Context, Result};

use super::Workspace;
use crate::output::format::format_rules_summary;
use crate::output::OutputFormat;

pub fn run(workspace: &Workspace, format: OutputFormat) -> Result<()> {
    let rules = workspace.rules()?;
    let output = format_rules_summary(&rules, format).context("Failed to serialize rules")?;
    print!("{output}");
    Ok(())
}
