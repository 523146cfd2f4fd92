//! medassist-cli library root.
//!
//! Re-exports the host modules so integration tests can drive them
//! without spawning the binary.

pub mod cli;
pub mod commands;
pub mod config;
