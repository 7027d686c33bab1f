//! CLI definitions and entry point

use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::debug;

use super::commands;
use taskboard::adapters::HttpStore;
use taskboard::config::{API_URL_ENV, BoardConfig};
use taskboard::core::models::{Priority, TaskStatus};
use taskboard::core::services::BoardEngine;
use taskboard::error::BoardError;
use taskboard::output::{ErrorReport, OutputMode};

/// taskboard - Kanban board client with optimistic updates
#[derive(Parser, Debug)]
#[command(
    name = "taskboard",
    version,
    about = "Kanban board client with optimistic updates",
    long_about = "Show and edit a kanban board kept by the task backend.\n\n\
                  Tasks are grouped into lists. Changes apply to the local board first\n\
                  and are rolled back if the backend refuses them."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Backend base URL (overrides config and environment)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the board grouped by list
    Show {
        /// Only tasks whose title contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Only tasks with this status: "To Do" or "Done"
        #[arg(long)]
        status: Option<TaskStatus>,

        /// Only tasks with this priority: high, normal, low
        #[arg(short, long)]
        priority: Option<Priority>,
    },

    /// List the board's lists
    Lists,

    /// Create a task
    Add {
        /// Task title
        title: String,

        /// List to put the task in (defaults to the fallback list)
        #[arg(short, long)]
        list: Option<String>,

        /// Task description
        #[arg(short, long)]
        description: Option<String>,

        /// Priority: high, normal, low
        #[arg(short, long)]
        priority: Option<Priority>,

        /// Delivery date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
    },

    /// Change fields of a task
    Edit {
        /// Task ID
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New description
        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,

        /// Remove the description
        #[arg(long)]
        clear_description: bool,

        /// New priority: high, normal, low
        #[arg(short, long, conflicts_with = "clear_priority")]
        priority: Option<Priority>,

        /// Remove the priority
        #[arg(long)]
        clear_priority: bool,

        /// New delivery date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,

        /// Remove the delivery date
        #[arg(long)]
        clear_due: bool,

        /// Move to another list
        #[arg(short, long)]
        list: Option<String>,
    },

    /// Flip a task between To Do and Done
    Toggle {
        /// Task ID
        id: String,
    },

    /// Move a task to another list
    Move {
        /// Task ID
        id: String,

        /// Destination list
        list: String,

        /// Position within the destination list (defaults to the end)
        #[arg(long)]
        position: Option<usize>,
    },

    /// Delete a task
    Rm {
        /// Task ID
        id: String,
    },

    /// Show version
    Version,
}

/// Run the CLI
pub fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let Some(command) = cli.command else {
        if output_mode == OutputMode::Json {
            println!(
                "{}",
                serde_json::json!({
                    "version": env!("CARGO_PKG_VERSION"),
                    "hint": "Use --help for usage"
                })
            );
        } else {
            println!("taskboard v{}", env!("CARGO_PKG_VERSION"));
            println!("\nRun 'taskboard --help' for usage");
            println!("Run 'taskboard show' to see the board");
        }
        return Ok(ExitCode::SUCCESS);
    };

    if matches!(command, Command::Version) {
        if output_mode == OutputMode::Json {
            println!(
                "{}",
                serde_json::json!({
                    "version": env!("CARGO_PKG_VERSION")
                })
            );
        } else {
            println!("taskboard v{}", env!("CARGO_PKG_VERSION"));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = BoardConfig::load();
    config.override_api_url(cli.api_url);
    debug!("Using backend {} ({API_URL_ENV} overrides)", config.store.api_url);

    let store = match HttpStore::from_config(&config) {
        Ok(store) => store,
        Err(err) => {
            let err = BoardError::from(err);
            ErrorReport::new(&err, err.to_string()).render(output_mode);
            return Ok(ExitCode::FAILURE);
        },
    };
    let engine = BoardEngine::with_fallback_list(store, config.board.fallback_list.clone());

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    match runtime.block_on(commands::execute(command, &engine, output_mode)) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            let message = match engine.last_error() {
                Some(reason) if !err.is_validation() => format!("{reason} ({err})"),
                _ => err.to_string(),
            };
            ErrorReport::new(&err, message).render(output_mode);
            Ok(ExitCode::FAILURE)
        },
    }
}
