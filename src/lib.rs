//! Per-device Vulkan memory heap, memory type and heap budget reporting.
//!
//! The Vulkan-backed source lives in [`vulkan`]; [`probe`] walks any
//! [`source::MemoryPropertySource`] and renders [`report::DeviceMemoryReport`]s
//! with the formatters in [`util`].

pub mod cli;
pub mod error;
pub mod probe;
pub mod report;
pub mod source;
pub mod util;
pub mod vulkan;

pub use error::{ProbeError, ProbeResult};
pub use probe::{
    collect_memory_reports, supports_memory_budget, write_memory_reports,
    write_memory_reports_json, MEMORY_BUDGET_EXTENSION,
};
pub use report::{DeviceMemoryReport, HeapBudget, MemoryHeap, MemoryProperties, MemoryType};
pub use source::MemoryPropertySource;
pub use util::{format_flags, format_size};
