//! `boxprofile diff`: show unified diffs for what sync would change.

use anyhow::{Context, Result};
use clap::Args;

use boxprofile_source::{DistroboxSource, Source};
use boxprofile_sync::{diff_target, targets_for_query};

use super::TargetArgs;

/// Arguments for `boxprofile diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub targets: TargetArgs,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let home = super::home()?;
        let targets = targets_for_query(&home, &self.targets.targets)?;

        let source = DistroboxSource::at(&home);
        source.check_dependencies()?;
        let artifacts = source.enumerate().context("failed to list containers")?;

        let mut any = false;
        for target in &targets {
            if let Err(err) = target.check_dependencies() {
                eprintln!("skipping '{}': {err}", target.name());
                continue;
            }
            let diffs = diff_target(target.as_ref(), &artifacts)
                .with_context(|| format!("diff failed for '{}'", target.name()))?;
            for diff in diffs {
                any = true;
                print!("{}", diff.unified_diff);
                if !diff.unified_diff.ends_with('\n') {
                    println!();
                }
            }
        }

        if !any {
            println!("No differences.");
        }
        Ok(())
    }
}
