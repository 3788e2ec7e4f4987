// src/cli/mod.rs
// Command-line front end for vk-memory-properties
// RELEVANT FILES: src/bin/vk_memory_properties.rs, src/probe.rs

pub mod args;
pub mod memory_properties;

pub use args::{CliConfig, CliError, OutputFormat, USAGE};
pub use memory_properties::{
    exit_code, run_memory_properties_cli, write_report, EXIT_CONFIG_ERROR, EXIT_FAILURE,
};
