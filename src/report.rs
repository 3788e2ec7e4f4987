//! Per-device memory snapshots and their rendered forms
//!
//! A `DeviceMemoryReport` is built fresh for every physical device and is
//! rendered either as the line-oriented text listing (`Display`) or as a
//! serializable JSON view.

use std::fmt;

use ash::vk;
use serde::Serialize;

use crate::util::flag_format::format_flags;
use crate::util::size_format::format_size;

/// One physical device memory heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryHeap {
    pub size: u64,
    pub flags: vk::MemoryHeapFlags,
}

/// One memory type, layered over the heap at `heap_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryType {
    pub heap_index: u32,
    pub property_flags: vk::MemoryPropertyFlags,
}

/// Current budget and usage of one heap, as reported by `VK_EXT_memory_budget`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeapBudget {
    pub budget: u64,
    pub usage: u64,
}

/// Memory heaps and types of a device, ordered by index.
///
/// `budgets`, when present, runs parallel to `heaps`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemoryProperties {
    pub heaps: Vec<MemoryHeap>,
    pub types: Vec<MemoryType>,
    pub budgets: Option<Vec<HeapBudget>>,
}

impl MemoryProperties {
    pub fn heap_budget(&self, heap: usize) -> Option<HeapBudget> {
        self.budgets.as_ref().and_then(|b| b.get(heap).copied())
    }
}

/// Everything printed for one physical device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceMemoryReport {
    /// Position in the enumeration order
    pub index: usize,
    /// Device name reported by the driver
    pub name: String,
    pub properties: MemoryProperties,
}

impl DeviceMemoryReport {
    pub fn budget_supported(&self) -> bool {
        self.properties.budgets.is_some()
    }

    pub fn to_json_view(&self) -> DeviceMemoryJson {
        let props = &self.properties;
        let heaps = props
            .heaps
            .iter()
            .enumerate()
            .map(|(i, heap)| {
                let budget = props.heap_budget(i);
                HeapJson {
                    index: i,
                    size: heap.size,
                    size_text: format_size(heap.size),
                    flags: heap.flags.as_raw(),
                    flags_text: format_flags(heap.flags),
                    budget: budget.map(|b| b.budget),
                    budget_text: budget.map(|b| format_size(b.budget)),
                    usage: budget.map(|b| b.usage),
                    usage_text: budget.map(|b| format_size(b.usage)),
                }
            })
            .collect();
        let types = props
            .types
            .iter()
            .enumerate()
            .map(|(i, ty)| TypeJson {
                index: i,
                heap_index: ty.heap_index,
                flags: ty.property_flags.as_raw(),
                flags_text: format_flags(ty.property_flags),
            })
            .collect();

        DeviceMemoryJson {
            index: self.index,
            name: self.name.clone(),
            memory_budget_supported: self.budget_supported(),
            heaps,
            types,
        }
    }
}

impl fmt::Display for DeviceMemoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let props = &self.properties;
        writeln!(f, "PhysicalDevice {}", self.index)?;

        writeln!(f, "memoryHeapCount: {}", props.heaps.len())?;
        for (j, heap) in props.heaps.iter().enumerate() {
            writeln!(
                f,
                "  {}: size = {}, flags = {}",
                j,
                format_size(heap.size),
                format_flags(heap.flags)
            )?;
            if let Some(budget) = props.heap_budget(j) {
                writeln!(
                    f,
                    "     heapBudget = {}, heapUsage = {}",
                    format_size(budget.budget),
                    format_size(budget.usage)
                )?;
            }
        }

        writeln!(f, "memoryTypeCount: {}", props.types.len())?;
        for (j, ty) in props.types.iter().enumerate() {
            writeln!(
                f,
                "  {}: heapIndex = {}, flags = {}",
                j,
                ty.heap_index,
                format_flags(ty.property_flags)
            )?;
        }
        Ok(())
    }
}

/// JSON view of a device report.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceMemoryJson {
    pub index: usize,
    pub name: String,
    pub memory_budget_supported: bool,
    pub heaps: Vec<HeapJson>,
    pub types: Vec<TypeJson>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeapJson {
    pub index: usize,
    pub size: u64,
    pub size_text: String,
    pub flags: u32,
    pub flags_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeJson {
    pub index: usize,
    pub heap_index: u32,
    pub flags: u32,
    pub flags_text: String,
}
