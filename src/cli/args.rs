// src/cli/args.rs
// Command-line and environment configuration for vk-memory-properties
// Environment is applied first; explicit flags override it
// RELEVANT FILES: src/cli/memory_properties.rs, src/vulkan/context.rs

use std::fmt;
use std::str::FromStr;

use crate::error::ProbeError;

/// Environment variable selecting the output format.
pub const ENV_FORMAT: &str = "VKMEMPROPS_FORMAT";

/// Environment variable toggling validation layers.
pub const ENV_VALIDATION: &str = "VKMEMPROPS_VALIDATION";

pub const USAGE: &str = "\
Usage: vk-memory-properties [OPTIONS]

Print memory heaps, memory types and heap budgets of every Vulkan physical device.

Options:
  --format <text|json>    Output format (default: text)
  --json                  Shorthand for --format json
  --validation <on|off>   Enable the Khronos validation layer (default: on in debug builds)
  -h, --help              Print this help

Environment:
  VKMEMPROPS_FORMAT       Same values as --format
  VKMEMPROPS_VALIDATION   Same values as --validation
  RUST_LOG                Log filter (e.g. info, debug)";

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(value: &str) -> Result<Self, CliError> {
        match value.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(CliError::new(format!(
                "unknown output format '{other}'; expected text or json"
            ))),
        }
    }
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

/// Error raised when parsing flags or environment values.
#[derive(Debug)]
pub struct CliError {
    msg: String,
}

impl CliError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.msg.fmt(f)
    }
}

impl std::error::Error for CliError {}

impl From<CliError> for ProbeError {
    fn from(err: CliError) -> Self {
        ProbeError::config(err)
    }
}

/// Resolved run configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliConfig {
    pub format: OutputFormat,
    /// `None` keeps the build default (on in debug builds)
    pub validation: Option<bool>,
    pub show_help: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            validation: None,
            show_help: false,
        }
    }
}

fn parse_format(raw: &str, source: &str) -> Result<OutputFormat, CliError> {
    raw.parse().map_err(|_: CliError| {
        CliError::new(format!(
            "invalid {source} value '{raw}'; expected text or json"
        ))
    })
}

fn parse_toggle(raw: &str, source: &str) -> Result<bool, CliError> {
    match raw.to_ascii_lowercase().as_str() {
        "on" | "1" | "true" | "yes" => Ok(true),
        "off" | "0" | "false" | "no" => Ok(false),
        other => Err(CliError::new(format!(
            "invalid {source} value '{other}'; expected on/off or true/false"
        ))),
    }
}

impl CliConfig {
    /// Resolve configuration from the process environment and a flat argument
    /// list (excluding argv[0]).
    pub fn from_env_and_args(args: &[String]) -> Result<Self, CliError> {
        Self::resolve(|key| std::env::var(key).ok(), args)
    }

    /// Same as `from_env_and_args`, with the environment supplied by `env`.
    pub fn resolve<F>(env: F, args: &[String]) -> Result<Self, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = CliConfig::default();
        if let Some(raw) = env(ENV_FORMAT) {
            cfg.format = parse_format(raw.trim(), ENV_FORMAT)?;
        }
        if let Some(raw) = env(ENV_VALIDATION) {
            cfg.validation = Some(parse_toggle(raw.trim(), ENV_VALIDATION)?);
        }
        cfg.apply_args(args)?;
        Ok(cfg)
    }

    /// Apply command-line flags on top of the current values.
    pub fn apply_args(&mut self, args: &[String]) -> Result<(), CliError> {
        let mut i = 0usize;
        while i < args.len() {
            match args[i].as_str() {
                "--format" => {
                    let value = args
                        .get(i + 1)
                        .ok_or_else(|| CliError::new("missing value for --format"))?;
                    self.format = parse_format(value, "--format")?;
                    i += 2;
                }
                "--json" => {
                    self.format = OutputFormat::Json;
                    i += 1;
                }
                "--validation" => {
                    let value = args
                        .get(i + 1)
                        .ok_or_else(|| CliError::new("missing value for --validation"))?;
                    self.validation = Some(parse_toggle(value, "--validation")?);
                    i += 2;
                }
                "-h" | "--help" => {
                    self.show_help = true;
                    i += 1;
                }
                other => {
                    return Err(CliError::new(format!("unknown argument '{other}'")));
                }
            }
        }
        Ok(())
    }

    /// Validation setting after falling back to the build default.
    pub fn validation_enabled(&self) -> bool {
        self.validation.unwrap_or(cfg!(debug_assertions))
    }
}
