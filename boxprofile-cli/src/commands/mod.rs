pub mod diff;
pub mod list;
pub mod sync;
pub mod watch;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use boxprofile_core::paths;

/// `--target` selection shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Target to act on (`konsole`, or `all`). Repeatable.
    #[arg(long = "target", short = 't', default_value = "all")]
    pub targets: Vec<String>,
}

pub fn home() -> Result<PathBuf> {
    Ok(paths::home()?)
}
