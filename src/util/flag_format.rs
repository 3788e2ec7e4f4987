// src/util/flag_format.rs
// Pipe-joined names for Vulkan flag masks
// Each flag domain carries a fixed, ordered table of (bit, name) pairs
// RELEVANT FILES: src/report.rs, src/util/size_format.rs

use ash::vk;

/// A bitmask type with a fixed, ordered table of named bits.
///
/// Bit values within `NAMES` must be unique.
pub trait FlagDomain: Copy + 'static {
    const NAMES: &'static [(Self, &'static str)];

    fn bits(self) -> u32;
}

impl FlagDomain for vk::MemoryHeapFlags {
    const NAMES: &'static [(Self, &'static str)] = &[
        (vk::MemoryHeapFlags::DEVICE_LOCAL, "DeviceLocal"),
        (vk::MemoryHeapFlags::MULTI_INSTANCE, "MultiInstance"),
    ];

    fn bits(self) -> u32 {
        self.as_raw()
    }
}

impl FlagDomain for vk::MemoryPropertyFlags {
    const NAMES: &'static [(Self, &'static str)] = &[
        (vk::MemoryPropertyFlags::DEVICE_LOCAL, "DeviceLocal"),
        (vk::MemoryPropertyFlags::HOST_VISIBLE, "HostVisible"),
        (vk::MemoryPropertyFlags::HOST_COHERENT, "HostCoherent"),
        (vk::MemoryPropertyFlags::HOST_CACHED, "HostCached"),
        (vk::MemoryPropertyFlags::LAZILY_ALLOCATED, "LazilyAllocated"),
        (vk::MemoryPropertyFlags::PROTECTED, "Protected"),
        (vk::MemoryPropertyFlags::DEVICE_COHERENT_AMD, "DeviceCoherentAMD"),
        (vk::MemoryPropertyFlags::DEVICE_UNCACHED_AMD, "DeviceUncachedAMD"),
        (vk::MemoryPropertyFlags::RDMA_CAPABLE_NV, "RdmaCapableNV"),
    ];

    fn bits(self) -> u32 {
        self.as_raw()
    }
}

/// Format a flag mask as `{ A | B }` in table order, or `{}` when empty.
///
/// Bits missing from the domain table are not dropped: they are appended as a
/// single hex entry, e.g. `{ DeviceLocal | 0x100 }`.
pub fn format_flags<F: FlagDomain>(value: F) -> String {
    let bits = value.bits();
    if bits == 0 {
        return "{}".to_string();
    }

    let mut names: Vec<String> = Vec::new();
    let mut known = 0u32;
    for (flag, name) in F::NAMES {
        let flag_bits = flag.bits();
        known |= flag_bits;
        if bits & flag_bits == flag_bits {
            names.push((*name).to_string());
        }
    }

    let residual = bits & !known;
    if residual != 0 {
        names.push(format!("{:#x}", residual));
    }

    format!("{{ {} }}", names.join(" | "))
}
