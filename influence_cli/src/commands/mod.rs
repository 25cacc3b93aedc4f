//! CLI subcommand implementations.

pub mod call;
pub mod choices;
pub mod describe;
pub mod endpoints;
pub mod resolve;
