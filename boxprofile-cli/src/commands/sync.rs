//! `boxprofile sync`: one synchronization pass.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use boxprofile_sync::{pipeline, TargetOutcome, TargetReport, WriteResult};

use super::TargetArgs;

/// Arguments for `boxprofile sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub targets: TargetArgs,

    /// Show what would be written and deleted without touching any file.
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let home = super::home()?;
        let outcomes = pipeline::run_at(&home, &self.targets.targets, self.dry_run)
            .context("sync failed")?;

        if outcomes.is_empty() {
            println!("No targets selected.");
        }
        for outcome in &outcomes {
            match outcome {
                TargetOutcome::Synced(report) => print_report(report),
                TargetOutcome::Skipped { target, reason } => {
                    println!("{} '{target}' skipped: {reason}", "⚠".yellow());
                }
            }
        }
        Ok(())
    }
}

fn print_report(report: &TargetReport) {
    let prefix = if report.reconcile.dry_run { "[dry-run] " } else { "" };
    println!(
        "{prefix}{} '{}' synced ({} written, {} deleted)",
        "✓".green(),
        report.target,
        report.reconcile.written(),
        report.reconcile.deleted.len()
    );

    for w in report.reconcile.writes.iter().chain(std::iter::once(&report.manifest)) {
        match w {
            WriteResult::Written { path } => println!("  ✎  {}", path.display()),
            WriteResult::WouldWrite { path } => println!("  ~  {}", path.display()),
            WriteResult::Unchanged { path } => println!("  ·  {}", path.display()),
        }
    }
    for path in &report.reconcile.deleted {
        println!("  {}  {}", "✗".red(), path.display());
    }
}
