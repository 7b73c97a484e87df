//! # tp - Taskpad
//!
//! A single-screen to-do manager with a scriptable CLI and an interactive
//! terminal user interface (TUI).
//!
//! ## Key Features
//!
//! - **One page**: add form, search and filter bar, and the task list split
//!   into upcoming, overdue and completed sections
//! - **Inline editing**: edit one task at a time, save or cancel
//! - **Scriptable**: every mutation and the list view are CLI subcommands
//! - **Local File Storage**: one JSON file, rewritten atomically on each change
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the TUI
//! tp
//!
//! # Add a task via CLI
//! tp add "Pay rent" --due eom --priority high
//!
//! # List tasks
//! tp list --status active
//! ```
//!
//! Data is stored in `~/.taskpad/tasks.json` unless `--data-dir` or the
//! `data_dir` config key says otherwise.

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod config;
pub mod dates;
pub mod edit;
pub mod fields;
pub mod logging;
pub mod notice;
pub mod storage;
pub mod store;
pub mod task;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod filter_bar;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::Config;
use logging::{default_level, init_tracing, LogTarget};
use storage::FileStore;
use store::TaskStore;
use tracing::info;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Completions need no data directory
    if let Some(Commands::Completions { shell }) = &cli.command {
        cmd_completions(*shell);
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;
    let data_dir = config.resolve_data_dir(cli.data_dir.as_deref())?;
    let file_store = FileStore::open(&data_dir)?;

    let level = default_level(cli.verbose, cli.quiet, &config.log_level);
    let is_ui = matches!(cli.command, None | Some(Commands::Ui));
    let target = if is_ui {
        LogTarget::File(&data_dir)
    } else {
        LogTarget::Stderr
    };
    init_tracing(&level, target)?;
    if let Some(path) = &config.source {
        info!(config = %path.display(), "loaded config");
    }

    let mut store = TaskStore::load(Box::new(file_store));

    match cli.command {
        None | Some(Commands::Ui) => cmd_ui(store, config.notice_ttl()),

        Some(Commands::Add { title, desc, due, priority }) => {
            cmd_add(&mut store, title, desc, due, priority)
        }

        Some(Commands::List { search, priority, status }) => {
            cmd_list(&store, search, priority, status);
            Ok(())
        }

        Some(Commands::Toggle { id }) => cmd_toggle(&mut store, id),

        Some(Commands::Delete { id }) => cmd_delete(&mut store, id),

        Some(Commands::Edit { id, title, desc, due, clear_due, priority }) => {
            cmd_edit(&mut store, id, title, desc, due, clear_due, priority)
        }

        Some(Commands::Completions { shell }) => {
            cmd_completions(shell);
            Ok(())
        }
    }
}
