//! taskdeck: a demo CRUD backend (users/tasks on SQLite) paired with an
//! agent companion process that exposes the same operations as callable
//! tools over line-delimited JSON-RPC.
//!
//! The interesting part lives in [`internal::agent::tools`]: a registry of
//! named tool handlers, schema advertisement, and a dispatch gateway that
//! bounds every call with a timeout and normalizes every outcome into one
//! response envelope.

pub mod cli;
pub mod command;
pub mod internal;
