//! The boot-time device tree.
//!
//! The tree is owned exclusively by the boot sequence while the platform
//! layer patches it; the lock is for the SMP world that comes later, not
//! for contention during probing.

use dt::DeviceTree;
use spin::RwLock;

static DEVICE_TREE: RwLock<Option<DeviceTree>> = RwLock::new(None);

/// Install the tree received from the management controller.
pub fn init(tree: DeviceTree) {
    *DEVICE_TREE.write() = Some(tree);
}

/// Run `f` against the tree. Touching the tree before [init] ran is a
/// boot-sequencing bug.
pub fn with<R>(f: impl FnOnce(&DeviceTree) -> R) -> R {
    let guard = DEVICE_TREE.read();
    match guard.as_ref() {
        Some(tree) => f(tree),
        None => panic!("device tree accessed before initialization"),
    }
}

/// Run `f` against the tree with mutable access.
pub fn with_mut<R>(f: impl FnOnce(&mut DeviceTree) -> R) -> R {
    let mut guard = DEVICE_TREE.write();
    match guard.as_mut() {
        Some(tree) => f(tree),
        None => panic!("device tree accessed before initialization"),
    }
}
