// tests/memory_report.rs
// End-to-end report output driven by a scripted device source
// Covers budget gating, output layout and abort-on-failure behavior

use std::cell::RefCell;

use ash::vk;
use vkmemprops::cli::{write_report, OutputFormat};
use vkmemprops::{
    write_memory_reports, HeapBudget, MemoryHeap, MemoryProperties, MemoryPropertySource,
    MemoryType, ProbeError, ProbeResult, MEMORY_BUDGET_EXTENSION,
};

const GIB: u64 = 1024 * 1024 * 1024;
const MIB: u64 = 1024 * 1024;

#[derive(Clone)]
struct ScriptedDevice {
    name: &'static str,
    extensions: Vec<String>,
    heaps: Vec<MemoryHeap>,
    types: Vec<MemoryType>,
    budgets: Vec<HeapBudget>,
    fail_properties: bool,
}

#[derive(Default)]
struct ScriptedSource {
    devices: Vec<ScriptedDevice>,
    fail_enumeration: bool,
    budget_requests: RefCell<Vec<(usize, bool)>>,
}

impl MemoryPropertySource for ScriptedSource {
    type Device = usize;

    fn physical_devices(&self) -> ProbeResult<Vec<usize>> {
        if self.fail_enumeration {
            return Err(ProbeError::vulkan(
                "vkEnumeratePhysicalDevices",
                vk::Result::ERROR_INITIALIZATION_FAILED,
            ));
        }
        Ok((0..self.devices.len()).collect())
    }

    fn device_name(&self, device: usize) -> ProbeResult<String> {
        Ok(self.devices[device].name.to_string())
    }

    fn device_extensions(&self, device: usize) -> ProbeResult<Vec<String>> {
        Ok(self.devices[device].extensions.clone())
    }

    fn memory_properties(&self, device: usize, with_budget: bool) -> ProbeResult<MemoryProperties> {
        self.budget_requests.borrow_mut().push((device, with_budget));
        let d = &self.devices[device];
        if d.fail_properties {
            return Err(ProbeError::vulkan(
                "vkGetPhysicalDeviceMemoryProperties2",
                vk::Result::ERROR_DEVICE_LOST,
            ));
        }
        Ok(MemoryProperties {
            heaps: d.heaps.clone(),
            types: d.types.clone(),
            budgets: with_budget.then(|| d.budgets.clone()),
        })
    }
}

fn discrete_gpu() -> ScriptedDevice {
    ScriptedDevice {
        name: "Scripted Discrete GPU",
        extensions: vec!["VK_KHR_swapchain".to_string()],
        heaps: vec![
            MemoryHeap {
                size: 2_147_483_648,
                flags: vk::MemoryHeapFlags::DEVICE_LOCAL,
            },
            MemoryHeap {
                size: 536_870_912,
                flags: vk::MemoryHeapFlags::empty(),
            },
        ],
        types: vec![MemoryType {
            heap_index: 0,
            property_flags: vk::MemoryPropertyFlags::DEVICE_LOCAL
                | vk::MemoryPropertyFlags::HOST_VISIBLE,
        }],
        // Present but must never be printed without the extension.
        budgets: vec![
            HeapBudget {
                budget: GIB,
                usage: MIB,
            },
            HeapBudget {
                budget: GIB,
                usage: MIB,
            },
        ],
        fail_properties: false,
    }
}

fn budget_gpu() -> ScriptedDevice {
    ScriptedDevice {
        name: "Scripted Budget GPU",
        extensions: vec![
            "VK_KHR_maintenance4".to_string(),
            MEMORY_BUDGET_EXTENSION.to_string(),
        ],
        heaps: vec![MemoryHeap {
            size: 8 * GIB,
            flags: vk::MemoryHeapFlags::DEVICE_LOCAL,
        }],
        types: vec![
            MemoryType {
                heap_index: 0,
                property_flags: vk::MemoryPropertyFlags::DEVICE_LOCAL,
            },
            MemoryType {
                heap_index: 0,
                property_flags: vk::MemoryPropertyFlags::HOST_COHERENT
                    | vk::MemoryPropertyFlags::HOST_VISIBLE,
            },
        ],
        budgets: vec![HeapBudget {
            budget: 6 * GIB + 512 * MIB,
            usage: 300 * MIB,
        }],
        fail_properties: false,
    }
}

fn render_text(source: &ScriptedSource) -> (ProbeResult<usize>, String) {
    let mut out = Vec::new();
    let result = write_memory_reports(source, &mut out);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn two_heap_device_without_budget() {
    let source = ScriptedSource {
        devices: vec![discrete_gpu()],
        ..Default::default()
    };
    let (result, text) = render_text(&source);
    assert_eq!(result.unwrap(), 1);

    let expected = [
        "PhysicalDevice 0",
        "memoryHeapCount: 2",
        "  0: size = 2 GB, flags = { DeviceLocal }",
        "  1: size = 512 MB, flags = {}",
        "memoryTypeCount: 1",
        "  0: heapIndex = 0, flags = { DeviceLocal | HostVisible }",
    ];
    assert_eq!(text.lines().collect::<Vec<_>>(), expected);
    assert!(!text.contains("heapBudget"));
    assert_eq!(*source.budget_requests.borrow(), vec![(0, false)]);
}

#[test]
fn budget_lines_only_for_devices_with_extension() {
    let source = ScriptedSource {
        devices: vec![discrete_gpu(), budget_gpu()],
        ..Default::default()
    };
    let (result, text) = render_text(&source);
    assert_eq!(result.unwrap(), 2);

    let lines: Vec<&str> = text.lines().collect();
    let second = lines
        .iter()
        .position(|l| *l == "PhysicalDevice 1")
        .expect("second device header");
    assert!(lines[..second].iter().all(|l| !l.contains("heapBudget")));
    assert_eq!(
        &lines[second..],
        &[
            "PhysicalDevice 1",
            "memoryHeapCount: 1",
            "  0: size = 8 GB, flags = { DeviceLocal }",
            "     heapBudget = 6.5 GB, heapUsage = 300 MB",
            "memoryTypeCount: 2",
            "  0: heapIndex = 0, flags = { DeviceLocal }",
            "  1: heapIndex = 0, flags = { HostVisible | HostCoherent }",
        ]
    );
    assert_eq!(
        *source.budget_requests.borrow(),
        vec![(0, false), (1, true)]
    );
}

#[test]
fn enumeration_failure_prints_nothing() {
    let source = ScriptedSource {
        devices: vec![discrete_gpu(), budget_gpu()],
        fail_enumeration: true,
        ..Default::default()
    };
    let (result, text) = render_text(&source);
    let err = result.unwrap_err();
    assert_eq!(err.category(), "Vulkan");
    assert!(err.to_string().contains("vkEnumeratePhysicalDevices"));
    assert!(text.is_empty());
    assert!(source.budget_requests.borrow().is_empty());
}

#[test]
fn device_failure_aborts_remaining_devices() {
    let mut failing = budget_gpu();
    failing.fail_properties = true;
    let source = ScriptedSource {
        devices: vec![discrete_gpu(), failing, discrete_gpu()],
        ..Default::default()
    };
    let (result, text) = render_text(&source);
    assert!(matches!(
        result,
        Err(ProbeError::Vulkan {
            result: vk::Result::ERROR_DEVICE_LOST,
            ..
        })
    ));
    assert!(text.starts_with("PhysicalDevice 0\n"));
    assert!(!text.contains("PhysicalDevice 1"));
    assert!(!text.contains("PhysicalDevice 2"));
    assert_eq!(source.budget_requests.borrow().len(), 2);
}

#[test]
fn no_devices_is_not_an_error() {
    let source = ScriptedSource::default();
    let (result, text) = render_text(&source);
    assert_eq!(result.unwrap(), 0);
    assert!(text.is_empty());
}

#[test]
fn json_report() {
    let source = ScriptedSource {
        devices: vec![discrete_gpu(), budget_gpu()],
        ..Default::default()
    };
    let mut out = Vec::new();
    assert_eq!(write_report(&source, OutputFormat::Json, &mut out).unwrap(), 2);

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let devices = value.as_array().unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0]["name"], "Scripted Discrete GPU");
    assert_eq!(devices[0]["memory_budget_supported"], false);
    assert_eq!(devices[0]["heaps"][1]["size"], 536_870_912u64);
    assert_eq!(devices[0]["heaps"][1]["flags_text"], "{}");
    assert!(devices[0]["heaps"][0].get("budget").is_none());
    assert_eq!(devices[1]["memory_budget_supported"], true);
    assert_eq!(devices[1]["heaps"][0]["budget_text"], "6.5 GB");
    assert_eq!(devices[1]["types"][1]["flags"], 6);
}

#[test]
fn json_failure_writes_nothing() {
    let mut failing = budget_gpu();
    failing.fail_properties = true;
    let source = ScriptedSource {
        devices: vec![discrete_gpu(), failing],
        ..Default::default()
    };
    let mut out = Vec::new();
    assert!(write_report(&source, OutputFormat::Json, &mut out).is_err());
    assert!(out.is_empty());
}

#[test]
fn text_output_is_repeatable() {
    let source = ScriptedSource {
        devices: vec![budget_gpu()],
        ..Default::default()
    };
    let (_, first) = render_text(&source);
    let (_, second) = render_text(&source);
    assert_eq!(first, second);
}
