use std::env;
use std::io::{self, Write};

use anyhow::Context;
use log::info;

use crate::cli::args::{CliConfig, OutputFormat, USAGE};
use crate::error::{ProbeError, ProbeResult};
use crate::probe::{write_memory_reports, write_memory_reports_json};
use crate::source::MemoryPropertySource;
use crate::vulkan::{InstanceConfig, VulkanContext};

/// Write the report for every device of `source` in the requested format.
pub fn write_report<S, W>(source: &S, format: OutputFormat, out: &mut W) -> ProbeResult<usize>
where
    S: MemoryPropertySource,
    W: Write,
{
    match format {
        OutputFormat::Text => write_memory_reports(source, out),
        OutputFormat::Json => write_memory_reports_json(source, out),
    }
}

/// Exit status for invalid flags or environment values.
pub const EXIT_CONFIG_ERROR: i32 = 1;

/// Exit status for every other failure: loader, driver, output.
pub const EXIT_FAILURE: i32 = -1;

/// Map a failed run to its process exit status.
///
/// `ProbeError` is found through any `.context(..)` layers added on the way up.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ProbeError>() {
        Some(ProbeError::Config(_)) => EXIT_CONFIG_ERROR,
        _ => EXIT_FAILURE,
    }
}

/// Run the memory-properties CLI against the real Vulkan loader.
///
/// Configuration errors surface as `ProbeError::Config`; everything else that
/// fails aborts the whole run, including devices not yet reported.
pub fn run_memory_properties_cli() -> anyhow::Result<()> {
    let all_args: Vec<String> = env::args().skip(1).collect();
    let cfg = CliConfig::from_env_and_args(&all_args).map_err(ProbeError::from)?;

    if cfg.show_help {
        println!("{USAGE}");
        return Ok(());
    }

    let instance_cfg = InstanceConfig {
        validation: cfg.validation_enabled(),
        ..InstanceConfig::default()
    };
    info!(
        "format: {}, validation: {}",
        cfg.format.as_str(),
        instance_cfg.validation
    );

    let ctx = VulkanContext::new(instance_cfg).context("failed to create Vulkan instance")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let devices =
        write_report(&ctx, cfg.format, &mut out).context("failed to report device memory")?;
    info!("Reported {} device(s)", devices);

    Ok(())
}
