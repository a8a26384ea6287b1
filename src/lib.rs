//! dcasim — dollar-cost averaging simulator.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`]. [`pipeline`] wires a price source
//! to the core and is shared by the CLI and the web server.

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod pipeline;
pub mod logging;
pub mod cli;
