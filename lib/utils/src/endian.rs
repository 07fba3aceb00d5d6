//! ## Endianness Module
//! Storage types for big-endian data as it appears in hardware description
//! blobs, together with the [EndianData<T>] trait to read such a value in
//! the endianness of the current architecture.

///[u32] in Big Endianness
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BigEndian32(u32);

///[u64] in Big Endianness
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BigEndian64(u64);

/// This trait defines a packed data in memory with some specific endianness.
pub trait EndianData<T>: Copy + Clone {
    /// Parse the value into the endianness of the current architecture.
    fn value(&self) -> T;
}

/// Get whether the current architecture is big endian
#[cfg(any(
    target_arch = "riscv64",
    target_arch = "loongarch64",
    target_arch = "x86_64",
    target_arch = "aarch64"
))]
macro_rules! arch_is_big_endian {
    () => {
        false
    };
}
#[cfg(not(any(
    target_arch = "riscv64",
    target_arch = "loongarch64",
    target_arch = "x86_64",
    target_arch = "aarch64"
)))]
macro_rules! arch_is_big_endian {
    () => {
        compile_error!("Unsupported architecture!");
    };
}

/// Implement an [EndianData<T>] for a specific type, and explain the data in big endianess
macro_rules! impl_converter_big {
    ($type: tt, $tval: tt) => {
        impl EndianData<$tval> for $type {
            #[inline(always)]
            fn value(&self) -> $tval {
                if arch_is_big_endian!() {
                    self.0 // keep
                } else {
                    self.0.to_be() // reverse
                }
            }
        }
    };
}

impl_converter_big!(BigEndian32, u32);
impl_converter_big!(BigEndian64, u64);
