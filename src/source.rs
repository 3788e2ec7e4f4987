//! Seam between the orchestrator and whatever answers device queries.
//!
//! The Vulkan-backed implementation lives in `crate::vulkan`; tests drive the
//! orchestrator through scripted implementations.

use crate::error::ProbeResult;
use crate::report::MemoryProperties;

/// Device enumeration and memory-property queries.
pub trait MemoryPropertySource {
    /// Opaque device handle.
    type Device: Copy;

    /// Physical devices in enumeration order.
    fn physical_devices(&self) -> ProbeResult<Vec<Self::Device>>;

    fn device_name(&self, device: Self::Device) -> ProbeResult<String>;

    /// Names of the device extensions, in the order the driver reports them.
    fn device_extensions(&self, device: Self::Device) -> ProbeResult<Vec<String>>;

    /// Query heaps and types, plus per-heap budgets when `with_budget` is set.
    ///
    /// Callers must only request budgets from devices that expose
    /// `VK_EXT_memory_budget`. Implementations return `budgets: None` whenever
    /// `with_budget` is false.
    fn memory_properties(
        &self,
        device: Self::Device,
        with_budget: bool,
    ) -> ProbeResult<MemoryProperties>;
}
