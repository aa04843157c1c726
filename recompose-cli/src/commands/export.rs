//! `recompose export` command: derive compose documents for matching stacks.

use crate::SnapshotArgs;
use anyhow::Result;
use colored::Colorize;
use recompose_core::compose::RenderOptions;
use recompose_core::{render_stack, StackIndex};
use std::io::{self, Write};

const RULER: &str =
    "//********************************************************************************************//";

pub async fn run(
    stack_pattern: &str,
    strip_prefix: bool,
    encrypt: bool,
    quiet: bool,
    snapshot_args: &SnapshotArgs,
) -> Result<()> {
    let snapshot = super::load_snapshot(snapshot_args).await?;
    let options = RenderOptions { strip_prefix, force_encrypted: encrypt };

    let index = StackIndex::build(snapshot.services);
    let selected = index.select(stack_pattern)?;

    if selected.is_empty() {
        eprintln!("{} no stacks match {}", "!".yellow().bold(), stack_pattern.bold());
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for stack in selected {
        let document = render_stack(stack, &index, &snapshot.networks, &options)?;
        if quiet {
            write!(out, "{}", document)?;
        } else {
            writeln!(out, "//******** Stackname is - {} *******************//", stack)?;
            writeln!(out, "{}", RULER)?;
            writeln!(out, "{}", document)?;
            writeln!(out, "{}", RULER)?;
        }
    }

    Ok(())
}
