//! Platform abstraction layer: platform descriptors, the boot-time device
//! tree, and the per-machine quirks applied to it before the tree is handed
//! to the OS loader.
#![no_std]
extern crate alloc;

pub mod devtree;
pub mod error;
pub mod platform;

pub use platform::{Platform, probe_platform};
