//! Vulkan instance lifetime and device queries
//!
//! `VulkanContext` owns the loader entry, an API 1.1 instance and, when
//! validation is enabled, a debug-utils messenger. Both handles are released
//! in `Drop`, so every exit path tears them down.

use std::ffi::{c_char, CStr};

use ash::vk;
use log::{debug, info, warn};

use crate::error::{ProbeError, ProbeResult};
use crate::report::{HeapBudget, MemoryHeap, MemoryProperties, MemoryType};
use crate::source::MemoryPropertySource;

const APP_NAME: &CStr = c"vk-memory-properties";
const ENGINE_NAME: &CStr = c"vkmemprops";
const VALIDATION_LAYER: &CStr = c"VK_LAYER_KHRONOS_validation";

/// Instance creation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceConfig {
    /// Enable the Khronos validation layer and a debug messenger, if available
    pub validation: bool,
    pub api_version: u32,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            validation: cfg!(debug_assertions),
            api_version: vk::API_VERSION_1_1,
        }
    }
}

struct DebugMessenger {
    loader: ash::ext::debug_utils::Instance,
    messenger: vk::DebugUtilsMessengerEXT,
}

pub struct VulkanContext {
    // Must outlive `instance`: the loader stays mapped until `Drop` has run.
    entry: ash::Entry,
    instance: ash::Instance,
    debug: Option<DebugMessenger>,
}

/// Read a fixed-size, NUL-terminated name array from a Vulkan struct.
fn fixed_name(raw: &[c_char]) -> String {
    // SAFETY: Vulkan guarantees these arrays hold a NUL-terminated string.
    unsafe { CStr::from_ptr(raw.as_ptr()) }
        .to_string_lossy()
        .into_owned()
}

fn contains_name(names: &[String], wanted: &CStr) -> bool {
    let wanted = wanted.to_string_lossy();
    names.iter().any(|n| *n == wanted)
}

/// Copy the driver's fixed-size arrays into owned vectors.
///
/// Counts are clamped to the array lengths so a driver reporting more heaps or
/// types than `VK_MAX_MEMORY_HEAPS`/`VK_MAX_MEMORY_TYPES` cannot index past them.
fn convert_memory_properties(
    core: &vk::PhysicalDeviceMemoryProperties,
    budget: Option<&vk::PhysicalDeviceMemoryBudgetPropertiesEXT<'_>>,
) -> MemoryProperties {
    let heap_count = (core.memory_heap_count as usize).min(vk::MAX_MEMORY_HEAPS);
    let type_count = (core.memory_type_count as usize).min(vk::MAX_MEMORY_TYPES);

    let heaps = core.memory_heaps[..heap_count]
        .iter()
        .map(|h| MemoryHeap {
            size: h.size,
            flags: h.flags,
        })
        .collect();
    let types = core.memory_types[..type_count]
        .iter()
        .map(|t| MemoryType {
            heap_index: t.heap_index,
            property_flags: t.property_flags,
        })
        .collect();
    let budgets = budget.map(|b| {
        (0..heap_count)
            .map(|i| HeapBudget {
                budget: b.heap_budget[i],
                usage: b.heap_usage[i],
            })
            .collect()
    });

    MemoryProperties {
        heaps,
        types,
        budgets,
    }
}

impl VulkanContext {
    /// Load the Vulkan loader and create an instance.
    pub fn new(config: InstanceConfig) -> ProbeResult<Self> {
        // SAFETY: the loaded library is kept alive in `entry` for the
        // lifetime of every handle created from it.
        let entry = unsafe { ash::Entry::load()? };

        let mut layers: Vec<*const c_char> = Vec::new();
        let mut extensions: Vec<*const c_char> = Vec::new();
        let mut debug_utils = false;

        if config.validation {
            let available_layers: Vec<String> =
                unsafe { entry.enumerate_instance_layer_properties() }
                    .map_err(|r| ProbeError::vulkan("vkEnumerateInstanceLayerProperties", r))?
                    .iter()
                    .map(|l| fixed_name(&l.layer_name))
                    .collect();
            let available_extensions: Vec<String> =
                unsafe { entry.enumerate_instance_extension_properties(None) }
                    .map_err(|r| {
                        ProbeError::vulkan("vkEnumerateInstanceExtensionProperties", r)
                    })?
                    .iter()
                    .map(|e| fixed_name(&e.extension_name))
                    .collect();

            if contains_name(&available_layers, VALIDATION_LAYER) {
                layers.push(VALIDATION_LAYER.as_ptr());
            } else {
                warn!(
                    "{} not available; continuing without validation",
                    VALIDATION_LAYER.to_string_lossy()
                );
            }

            let debug_utils_name = ash::ext::debug_utils::NAME;
            if contains_name(&available_extensions, debug_utils_name) {
                extensions.push(debug_utils_name.as_ptr());
                debug_utils = true;
            } else {
                warn!(
                    "{} not available; validation messages will not be logged",
                    debug_utils_name.to_string_lossy()
                );
            }
        }

        let app_info = vk::ApplicationInfo::default()
            .application_name(APP_NAME)
            .application_version(vk::make_api_version(0, 0, 1, 0))
            .engine_name(ENGINE_NAME)
            .engine_version(vk::make_api_version(0, 0, 1, 0))
            .api_version(config.api_version);

        let create_info = vk::InstanceCreateInfo::default()
            .application_info(&app_info)
            .enabled_layer_names(&layers)
            .enabled_extension_names(&extensions);

        let instance = unsafe { entry.create_instance(&create_info, None) }
            .map_err(|r| ProbeError::vulkan("vkCreateInstance", r))?;
        info!(
            "Created Vulkan instance ({} layer(s), {} extension(s))",
            layers.len(),
            extensions.len()
        );

        let mut ctx = Self {
            entry,
            instance,
            debug: None,
        };

        if debug_utils {
            let loader = ash::ext::debug_utils::Instance::new(&ctx.entry, &ctx.instance);
            // On failure `ctx` drops here and destroys the instance.
            let messenger = unsafe {
                loader.create_debug_utils_messenger(&super::debug::messenger_create_info(), None)
            }
            .map_err(|r| ProbeError::vulkan("vkCreateDebugUtilsMessengerEXT", r))?;
            debug!("Debug messenger attached");
            ctx.debug = Some(DebugMessenger { loader, messenger });
        }

        Ok(ctx)
    }
}

impl Drop for VulkanContext {
    fn drop(&mut self) {
        unsafe {
            if let Some(debug) = self.debug.take() {
                debug
                    .loader
                    .destroy_debug_utils_messenger(debug.messenger, None);
            }
            self.instance.destroy_instance(None);
        }
        debug!("Destroyed Vulkan instance");
    }
}

impl MemoryPropertySource for VulkanContext {
    type Device = vk::PhysicalDevice;

    fn physical_devices(&self) -> ProbeResult<Vec<vk::PhysicalDevice>> {
        unsafe { self.instance.enumerate_physical_devices() }
            .map_err(|r| ProbeError::vulkan("vkEnumeratePhysicalDevices", r))
    }

    fn device_name(&self, device: vk::PhysicalDevice) -> ProbeResult<String> {
        let props = unsafe { self.instance.get_physical_device_properties(device) };
        Ok(fixed_name(&props.device_name))
    }

    fn device_extensions(&self, device: vk::PhysicalDevice) -> ProbeResult<Vec<String>> {
        let props = unsafe { self.instance.enumerate_device_extension_properties(device) }
            .map_err(|r| ProbeError::vulkan("vkEnumerateDeviceExtensionProperties", r))?;
        Ok(props.iter().map(|e| fixed_name(&e.extension_name)).collect())
    }

    fn memory_properties(
        &self,
        device: vk::PhysicalDevice,
        with_budget: bool,
    ) -> ProbeResult<MemoryProperties> {
        let mut budget_props = vk::PhysicalDeviceMemoryBudgetPropertiesEXT::default();
        let mut props2 = vk::PhysicalDeviceMemoryProperties2::default();
        if with_budget {
            props2 = props2.push_next(&mut budget_props);
        }
        unsafe {
            self.instance
                .get_physical_device_memory_properties2(device, &mut props2)
        };
        let core = props2.memory_properties;

        Ok(convert_memory_properties(
            &core,
            with_budget.then_some(&budget_props),
        ))
    }
}
