//! The companion agent process: a line-delimited JSON-RPC server over
//! stdio that advertises and dispatches the registered tools.

pub mod protocol;
pub mod server;
pub mod tools;

pub use server::AgentServer;
