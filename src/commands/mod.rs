//! CLI command implementations for hostmon-dashboard.
//!
//! This module provides implementations for all CLI subcommands:
//! - `render`: Dashboard snapshot rendering
//! - `check`: Configuration and report history validation
//! - `config`: Configuration file generation
//! - `generate`: Synthetic report history generation

pub mod check;
pub mod config;
pub mod generate;
pub mod render;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use generate::command_generate_testdata;
pub use render::command_render;
