//! The `agent` command: run the tool server on stdin/stdout.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use crate::internal::{
    agent::{
        AgentServer,
        tools::{
            DispatchGateway, ToolRegistry, ToolRegistryBuilder,
            handlers::{files, tasks::TaskTool, users::UserTool},
        },
    },
    config::Config,
    db,
    service::{TaskService, UserService},
};

#[derive(Parser, Debug)]
pub struct AgentArgs {
    /// Per-call tool timeout in seconds, overriding the configured one.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Sandbox root for the file tools, overriding the configured one.
    #[arg(long)]
    pub workspace_root: Option<PathBuf>,

    /// Database URL, overriding the configured one.
    #[arg(long)]
    pub database_url: Option<String>,
}

struct AgentSettings {
    database_url: String,
    timeout: Duration,
    workspace_root: PathBuf,
}

/// Merge CLI overrides onto the configuration. Flags win over the file.
fn resolve_settings(args: AgentArgs, config: Config) -> Result<AgentSettings> {
    // Read the timeout before any field of `config` is moved out.
    let timeout = args
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.tool_timeout());
    let workspace_root = match args.workspace_root.or(config.agent.workspace_root) {
        Some(root) => root,
        None => std::env::current_dir().context("failed to resolve working directory")?,
    };
    Ok(AgentSettings {
        database_url: args.database_url.unwrap_or(config.database.url),
        timeout,
        workspace_root,
    })
}

pub async fn execute(args: AgentArgs, config: Config) -> Result<()> {
    let AgentSettings {
        database_url,
        timeout,
        workspace_root,
    } = resolve_settings(args, config)?;

    let db = db::connect(&database_url)
        .await
        .with_context(|| format!("failed to open database {database_url}"))?;
    let users = Arc::new(UserService::new(db.clone()));
    let tasks = Arc::new(TaskService::new(db));

    let registry = build_registry(users, tasks, workspace_root)?;
    let gateway = DispatchGateway::new(Arc::new(registry), timeout);
    AgentServer::new(gateway).run().await
}

fn build_registry(
    users: Arc<UserService>,
    tasks: Arc<TaskService>,
    workspace_root: PathBuf,
) -> Result<ToolRegistry> {
    let registry = ToolRegistryBuilder::new()
        .register_all(UserTool::all(users))?
        .register_all(TaskTool::all(tasks))?
        .register_all(files::all(workspace_root))?
        .build();
    Ok(registry)
}
