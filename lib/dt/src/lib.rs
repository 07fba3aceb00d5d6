//! In-memory device tree: named nodes carrying typed properties, built and
//! patched by the platform layer before the tree is handed to the OS loader.
#![no_std]
extern crate alloc;

pub mod node;
pub mod prop;

pub use node::{DeviceTree, Node};
pub use prop::{Property, PropertyError};
