//! Platform descriptors and the probe dispatch that selects one at boot.
//!
//! Each supported machine contributes one static [Platform] record. During
//! early boot the records are registered into a process-wide table, then
//! probed in registration order against the device tree; the first record
//! whose probe accepts owns the machine for the rest of the boot.

use alloc::vec::Vec;
use dt::DeviceTree;
use log::info;
use spin::{Once, RwLock};

use crate::devtree;
use crate::error::PlatformError;

pub mod sp;
pub mod zz;

pub type ProbeFn = fn(&mut DeviceTree) -> bool;
pub type InitFn = fn();
pub type ExitFn = fn();
pub type PowerFn = fn() -> Result<(), PlatformError>;
pub type PciHookFn = fn(phb_index: u32);
pub type NvramInfoFn = fn() -> Result<u32, PlatformError>;
pub type NvramReadFn = fn(dst: &mut [u8], offset: u32) -> Result<(), PlatformError>;
pub type NvramWriteFn = fn(offset: u32, src: &[u8]) -> Result<(), PlatformError>;
pub type OccTimeoutFn = fn() -> u32;
pub type ElogCommitFn = fn(log_id: u32) -> Result<(), PlatformError>;
pub type SensorReadFn = fn(sensor_handle: u32) -> Result<u32, PlatformError>;
pub type TerminateFn = fn(reason: &str) -> !;
pub type NpuDetectFn = fn(ocapi: &Ocapi) -> bool;

/// Auxiliary control-bus parameters for accelerator link reset and
/// presence detection, consumed by the host-side detection routine.
pub struct Ocapi {
    pub i2c_engine: u8,
    pub i2c_port: u8,
    pub i2c_reset_addr: u8,
    pub i2c_reset_brick2: u8,
    pub i2c_reset_brick3: u8,
    pub i2c_reset_brick4: u8,
    pub i2c_reset_brick5: u8,
    pub i2c_presence_addr: u8,
    pub i2c_presence_brick2: u8,
    pub i2c_presence_brick3: u8,
    pub i2c_presence_brick4: u8,
    pub i2c_presence_brick5: u8,
    pub odl_phy_swap: bool,
}

/// A supported machine: identity probe plus lifecycle and service hooks.
///
/// A `None` hook means the capability is unavailable on this platform, not
/// an error; callers must check before dispatching.
pub struct Platform {
    pub name: &'static str,
    pub probe: ProbeFn,
    pub init: Option<InitFn>,
    pub exit: Option<ExitFn>,
    pub cec_power_down: Option<PowerFn>,
    pub cec_reboot: Option<PowerFn>,
    pub pci_setup_phb: Option<PciHookFn>,
    pub pci_get_slot_info: Option<PciHookFn>,
    pub pci_probe_complete: Option<InitFn>,
    pub nvram_info: Option<NvramInfoFn>,
    pub nvram_start_read: Option<NvramReadFn>,
    pub nvram_write: Option<NvramWriteFn>,
    pub occ_timeout: Option<OccTimeoutFn>,
    pub elog_commit: Option<ElogCommitFn>,
    pub sensor_read: Option<SensorReadFn>,
    pub terminate: Option<TerminateFn>,
    pub ocapi: Option<&'static Ocapi>,
    pub npu_device_detect: Option<NpuDetectFn>,
}

// Append-only, populated during platform registration before probing
// starts; never mutated afterwards.
static PLATFORMS: RwLock<Vec<&'static Platform>> = RwLock::new(Vec::new());

static BUILTINS: Once<()> = Once::new();

/// Add a platform to the probe table.
pub fn register(platform: &'static Platform) {
    PLATFORMS.write().push(platform);
}

/// Register every platform built into this image. Idempotent.
pub fn register_builtin_platforms() {
    BUILTINS.call_once(|| {
        register(&zz::ZZ);
    });
}

/// Probe the registered platforms against `tree` in registration order and
/// return the first that claims the machine.
pub fn probe_all(tree: &mut DeviceTree) -> Option<&'static Platform> {
    let platforms = PLATFORMS.read();
    for platform in platforms.iter() {
        if (platform.probe)(tree) {
            info!("PLAT: detected {} platform", platform.name);
            return Some(platform);
        }
    }
    None
}

/// Probe against the boot-time device tree installed in [devtree].
pub fn probe_platform() -> Option<&'static Platform> {
    register_builtin_platforms();
    devtree::with_mut(probe_all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dt::Property;

    fn accept_test_machine(tree: &mut DeviceTree) -> bool {
        tree.node(tree.root_id).is_compatible("test,machine")
    }

    static TEST_PLATFORM: Platform = Platform {
        name: "test-machine",
        probe: accept_test_machine,
        init: None,
        exit: None,
        cec_power_down: None,
        cec_reboot: None,
        pci_setup_phb: None,
        pci_get_slot_info: None,
        pci_probe_complete: None,
        nvram_info: None,
        nvram_start_read: None,
        nvram_write: None,
        occ_timeout: None,
        elog_commit: None,
        sensor_read: None,
        terminate: None,
        ocapi: None,
        npu_device_detect: None,
    };

    #[test]
    fn probe_all_returns_first_accepting_platform() {
        register_builtin_platforms();
        register(&TEST_PLATFORM);

        let mut tree = DeviceTree::new("");
        tree.node_mut(tree.root_id)
            .set_property(Property::from_str("compatible", "test,machine"));
        let platform = probe_all(&mut tree).expect("registered platform should match");
        assert_eq!(platform.name, "test-machine");
        assert!(platform.nvram_info.is_none());
    }

    #[test]
    fn probe_all_rejects_unknown_machine() {
        register_builtin_platforms();

        let mut tree = DeviceTree::new("");
        tree.node_mut(tree.root_id)
            .set_property(Property::from_str("compatible", "vendor,unknown-box"));
        assert!(probe_all(&mut tree).is_none());
    }
}
