//! Concrete tool handlers: CRUD bridges over the persistence services plus
//! a small workspace file toolset.

pub mod files;
pub mod tasks;
pub mod users;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::{ToolError, ToolResult};

/// Decode a handler's typed parameters from the raw arguments object.
pub(crate) fn parse_arguments<T: DeserializeOwned>(arguments: &Value) -> ToolResult<T> {
    serde_json::from_value(arguments.clone()).map_err(|e| ToolError::ParseError(e.to_string()))
}

/// Serialize a service result into a success envelope body.
pub(crate) fn to_json_text<T: serde::Serialize>(value: &T) -> ToolResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| ToolError::ExecutionFailed(e.to_string()))
}
