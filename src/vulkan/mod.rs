// src/vulkan/mod.rs
// Vulkan-backed MemoryPropertySource
// Owns the loader entry, the instance and the optional debug messenger
// RELEVANT FILES: src/vulkan/context.rs, src/vulkan/debug.rs, src/source.rs

pub mod context;
pub mod debug;

pub use context::{InstanceConfig, VulkanContext};
