//! `boxprofile watch`: resync whenever containers or settings change.

use anyhow::{Context, Result};
use clap::Args;

use super::TargetArgs;

/// Arguments for `boxprofile watch`.
#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub targets: TargetArgs,
}

impl WatchArgs {
    pub fn run(self) -> Result<()> {
        let home = super::home()?;
        boxprofile_daemon::start_blocking(&home, self.targets.targets).context("watch loop failed")
    }
}
