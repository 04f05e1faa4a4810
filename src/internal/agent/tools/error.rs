//! Error types for tool registration, execution, and dispatch.
//!
//! Three distinct failure families, matching what callers need to tell
//! apart:
//! - [`RegistryError`]: startup-time wiring mistakes (fail fast).
//! - [`ToolError`]: a found-and-invoked handler failed; the gateway folds
//!   these into a failure envelope carrying only the message text.
//! - [`DispatchError`]: routing failure — the requested name is not
//!   registered. Surfaced structurally so callers can distinguish "no such
//!   operation" from "operation ran and failed".

use std::path::PathBuf;

use thiserror::Error;

use crate::internal::service::ServiceError;

/// Errors raised by tool handlers during execution.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("failed to parse arguments: {0}")]
    ParseError(String),

    #[error("path must be absolute: {0}")]
    PathNotAbsolute(PathBuf),

    #[error("path outside workspace root: {0}")]
    PathOutsideWorkspace(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("tool execution failed: {0}")]
    ExecutionFailed(String),
}

pub type ToolResult<T> = Result<T, ToolError>;

/// Errors rejected at registration time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("tool name must not be empty")]
    EmptyToolName,

    #[error("a tool named '{0}' is already registered")]
    DuplicateTool(String),
}

/// Routing failure: the invocation named an unregistered tool.
///
/// Deliberately separate from [`ToolError`]; this is the one failure mode
/// that does not produce a response envelope.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
}

impl DispatchError {
    /// JSON-RPC error code for this failure ("method not found").
    pub fn code(&self) -> i32 {
        match self {
            DispatchError::UnknownTool(_) => crate::internal::agent::protocol::METHOD_NOT_FOUND,
        }
    }
}
