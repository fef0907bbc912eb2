//! Headless driver for the `lr35902-core` CPU.
//!
//! Loads a raw program image into flat memory, steps the CPU, services
//! interrupts between instructions and captures serial output.

pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod serial;

pub use config::RunConfig;
pub use error::RunError;
pub use runner::{Runner, StopReason, Summary};
