use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::cmd::Commands;

/// Simple, file-backed to-do manager.
/// Storage defaults to ~/.taskpad/tasks.json or the directory passed via --data-dir.
/// Running without a subcommand opens the interactive UI.
#[derive(Parser)]
#[command(name = "tp", version, about = "Single-screen to-do manager")]
pub struct Cli {
    /// Directory holding tasks.json.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Path to a TOML config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less log output (-q warn, -qq error).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
