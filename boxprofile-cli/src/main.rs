//! boxprofile: keep Konsole profiles in step with Distrobox containers.
//!
//! # Usage
//!
//! ```text
//! boxprofile [-l] sync [--target <name>...] [--dry-run]
//! boxprofile [-l] watch [--target <name>...]
//! boxprofile [-l] diff [--target <name>...]
//! boxprofile [-l] list [--target <name>...] [--json]
//! ```

mod commands;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use commands::{diff::DiffArgs, list::ListArgs, sync::SyncArgs, watch::WatchArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "boxprofile",
    version,
    about = "Generate terminal profiles for Distrobox containers",
    long_about = None,
)]
struct Cli {
    /// Log what is being done (info level). `RUST_LOG` overrides.
    #[arg(short, long, global = true)]
    log: bool,

    /// Run even when invoked as root.
    #[arg(long, global = true, hide = true, env = "BOXPROFILE_ALLOW_ROOT")]
    allow_root: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one synchronization pass.
    Sync(SyncArgs),

    /// Keep profiles synchronized as containers come and go.
    Watch(WatchArgs),

    /// Show unified diff of what sync would change.
    Diff(DiffArgs),

    /// List generated profiles from each target's manifest.
    List(ListArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    boxprofile_daemon::init_tracing(cli.log);

    root_guard(cli.allow_root, running_as_root())?;

    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Watch(args) => args.run(),
        Commands::Diff(args) => args.run(),
        Commands::List(args) => args.run(),
    }
}

fn root_guard(allow_root: bool, is_root: bool) -> Result<()> {
    if is_root && !allow_root {
        bail!("refusing to run as root; profiles belong to a regular user (pass --allow-root to override)");
    }
    Ok(())
}

#[cfg(unix)]
fn running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}

#[cfg(not(unix))]
fn running_as_root() -> bool {
    false
}
