//! Core domain types and logic: periodization and the DCA simulation.

pub mod price;
pub mod period;
pub mod periodize;
pub mod rounding;
pub mod simulation;
pub mod request;
pub mod config_validation;
pub mod error;
