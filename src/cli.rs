//! CLI argument parsing via clap.

use std::path::PathBuf;

use accent_sync::color::AccentColor;
use clap::{ArgAction, Parser, Subcommand};

/// Keep the synth-shell prompt colors in step with the desktop accent color.
#[derive(Debug, Parser)]
#[command(name = "accent-sync", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to config file (default: ./accent-sync.toml or ~/.config/accent-sync/accent-sync.toml).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Override the prompt script to patch.
    #[arg(long = "script", global = true)]
    pub script: Option<PathBuf>,

    /// Override the directory holding the per-color config files.
    #[arg(long = "config-dir", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Report what would change without writing the script.
    #[arg(long = "dry-run", global = true)]
    pub dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Follow accent color changes until interrupted (default).
    Watch {
        /// Leave the script on the current color instead of restoring defaults on exit.
        #[arg(long = "keep")]
        keep: bool,
    },
    /// Sync the script once and exit.
    Apply {
        /// Use this color instead of reading the desktop setting.
        #[arg(long = "color", conflicts_with = "value")]
        color: Option<AccentColor>,
        /// Normalize this raw preference value instead of reading the desktop setting.
        #[arg(long = "value")]
        value: Option<String>,
    },
    /// Put the stock synth-shell config paths back and exit.
    Restore,
    /// Print the color a raw preference value maps to.
    Resolve {
        /// Raw preference value, e.g. `'blue'` or `preset-blue-dark`.
        value: String,
    },
}
