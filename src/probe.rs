// src/probe.rs
// Walks every physical device and reports its memory heaps and types
// Budget lines are only queried when the device lists VK_EXT_memory_budget
// RELEVANT FILES: src/source.rs, src/report.rs, src/vulkan/context.rs

use std::io::Write;

use log::{debug, info};

use crate::error::ProbeResult;
use crate::report::DeviceMemoryReport;
use crate::source::MemoryPropertySource;

/// Device extension that exposes per-heap budget and usage.
pub const MEMORY_BUDGET_EXTENSION: &str = "VK_EXT_memory_budget";

/// Whether `extensions` contains the budget-reporting extension.
pub fn supports_memory_budget<S: AsRef<str>>(extensions: &[S]) -> bool {
    extensions
        .iter()
        .any(|name| name.as_ref() == MEMORY_BUDGET_EXTENSION)
}

/// Query one device and build its report.
pub fn query_device<S: MemoryPropertySource>(
    source: &S,
    index: usize,
    device: S::Device,
) -> ProbeResult<DeviceMemoryReport> {
    let extensions = source.device_extensions(device)?;
    let with_budget = supports_memory_budget(&extensions);
    let name = source.device_name(device)?;
    info!(
        "PhysicalDevice {} ({}): {} extensions, memory budget {}",
        index,
        name,
        extensions.len(),
        if with_budget { "supported" } else { "unsupported" }
    );

    let properties = source.memory_properties(device, with_budget)?;
    debug!(
        "PhysicalDevice {}: {} heaps, {} types",
        index,
        properties.heaps.len(),
        properties.types.len()
    );

    Ok(DeviceMemoryReport {
        index,
        name,
        properties,
    })
}

/// Stream the text report of every device to `out`, in enumeration order.
///
/// The first failure stops the walk; devices already written stay written.
pub fn write_memory_reports<S, W>(source: &S, out: &mut W) -> ProbeResult<usize>
where
    S: MemoryPropertySource,
    W: Write,
{
    let devices = source.physical_devices()?;
    info!("Found {} physical device(s)", devices.len());

    for (index, device) in devices.iter().enumerate() {
        let report = query_device(source, index, *device)?;
        write!(out, "{}", report)?;
    }
    out.flush()?;
    Ok(devices.len())
}

/// Query every device before returning anything.
pub fn collect_memory_reports<S: MemoryPropertySource>(
    source: &S,
) -> ProbeResult<Vec<DeviceMemoryReport>> {
    let devices = source.physical_devices()?;
    info!("Found {} physical device(s)", devices.len());

    devices
        .iter()
        .enumerate()
        .map(|(index, device)| query_device(source, index, *device))
        .collect()
}

/// Write all device reports as one pretty-printed JSON array.
pub fn write_memory_reports_json<S, W>(source: &S, out: &mut W) -> ProbeResult<usize>
where
    S: MemoryPropertySource,
    W: Write,
{
    let reports = collect_memory_reports(source)?;
    let views: Vec<_> = reports.iter().map(|r| r.to_json_view()).collect();
    serde_json::to_writer_pretty(&mut *out, &views)?;
    writeln!(out)?;
    out.flush()?;
    Ok(reports.len())
}
