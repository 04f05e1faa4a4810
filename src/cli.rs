//! CLI entry for taskdeck, defining clap subcommands and dispatching each
//! command handler.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::{command, internal::config::Config};

/// The Cli struct represents the root of the command line interface.
#[derive(Parser, Debug)]
#[command(
    name = "taskdeck",
    about = "Taskdeck: a users/tasks CRUD backend with an agent tool server",
    version
)]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Run the CRUD web backend")]
    Serve(command::serve::ServeArgs),
    #[command(about = "Run the agent tool server on stdin/stdout")]
    Agent(command::agent::AgentArgs),
}

/// Parse the command line and execute the corresponding command.
/// - `args`: parse from the process command line if `None`, otherwise parse
///   from the given args (used by tests).
pub async fn parse_async(args: Option<&[&str]>) -> Result<()> {
    let cli = match args {
        Some(args) => Cli::try_parse_from(args)?,
        None => Cli::parse(),
    };

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve(args) => command::serve::execute(args, config).await,
        Commands::Agent(args) => command::agent::execute(args, config).await,
    }
}
