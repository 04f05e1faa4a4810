//! Tool calling infrastructure for the agent process.
//!
//! - **Spec**: descriptors advertising each tool's name, purpose, and
//!   argument schema
//! - **Registry**: name → handler mapping, built once at startup
//! - **Gateway**: the single dispatch entry point, enforcing a per-call
//!   timeout and one normalized response envelope
//! - **Handlers**: CRUD bridges over the services plus file-system tools

pub mod envelope;
pub mod error;
pub mod gateway;
pub mod registry;
pub mod spec;

pub mod handlers;

pub use envelope::{ToolContent, ToolResponse};
pub use error::{DispatchError, RegistryError, ToolError, ToolResult};
pub use gateway::{DispatchGateway, ToolCallRequest};
pub use registry::{ToolHandler, ToolRegistry, ToolRegistryBuilder};
pub use spec::{ToolParameters, ToolSpec};
