//! Command handlers for the CLI subcommands.

pub mod agent;
pub mod serve;
