use alloc::{boxed::Box, string::String, vec::Vec};
use core::{mem::size_of, ptr, str};
use utils::endian::{BigEndian32, BigEndian64, EndianData};

/// A single node property: a name and a big-endian byte payload, the wire
/// convention for hardware description data.
pub struct Property {
    pub name: Box<str>,
    pub data: Box<[u8]>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum PropertyError {
    InvalidLength,
    InvalidString,
}

/// Constructors encoding typed values into the payload.
impl Property {
    fn new(name: &str, data: Vec<u8>) -> Property {
        Property {
            name: String::from(name).into_boxed_str(),
            data: data.into_boxed_slice(),
        }
    }

    /// A single NUL-terminated string.
    pub fn from_str(name: &str, value: &str) -> Property {
        Self::from_strs(name, &[value])
    }

    /// A list of NUL-terminated strings.
    pub fn from_strs(name: &str, values: &[&str]) -> Property {
        let mut data = Vec::new();
        for value in values {
            data.extend_from_slice(value.as_bytes());
            data.push(0);
        }
        Self::new(name, data)
    }

    /// A sequence of 32-bit cells.
    pub fn from_cells(name: &str, values: &[u32]) -> Property {
        let mut data = Vec::with_capacity(values.len() * size_of::<u32>());
        for value in values {
            data.extend_from_slice(&value.to_be_bytes());
        }
        Self::new(name, data)
    }

    /// A sequence of 64-bit values.
    pub fn from_u64s(name: &str, values: &[u64]) -> Property {
        let mut data = Vec::with_capacity(values.len() * size_of::<u64>());
        for value in values {
            data.extend_from_slice(&value.to_be_bytes());
        }
        Self::new(name, data)
    }
}

/// Accessors decoding the payload back into typed values.
impl Property {
    /// Decode the payload as a sequence of `T`.
    ///
    /// The payload box carries no alignment guarantee, so each element is
    /// read unaligned rather than viewed as a typed slice.
    fn value_as_vec<T: Copy>(&self) -> Result<Vec<T>, PropertyError> {
        let elem_len = size_of::<T>();
        if self.data.len() % elem_len != 0 {
            return Err(PropertyError::InvalidLength);
        }
        let mut res = Vec::with_capacity(self.data.len() / elem_len);
        for chunk in self.data.chunks_exact(elem_len) {
            res.push(unsafe { ptr::read_unaligned(chunk.as_ptr() as *const T) });
        }
        Ok(res)
    }

    pub fn value_as_cells(&self) -> Result<Vec<u32>, PropertyError> {
        let cells = self.value_as_vec::<BigEndian32>()?;
        Ok(cells.iter().map(|cell| cell.value()).collect())
    }

    pub fn value_as_u64s(&self) -> Result<Vec<u64>, PropertyError> {
        let cells = self.value_as_vec::<BigEndian64>()?;
        Ok(cells.iter().map(|cell| cell.value()).collect())
    }

    /// The first 32-bit cell of the payload.
    pub fn value_as_u32(&self) -> Result<u32, PropertyError> {
        if self.data.len() < size_of::<u32>() {
            return Err(PropertyError::InvalidLength);
        }
        let cell = unsafe { ptr::read_unaligned(self.data.as_ptr() as *const BigEndian32) };
        Ok(cell.value())
    }

    /// The first 64-bit value of the payload.
    pub fn value_as_u64(&self) -> Result<u64, PropertyError> {
        if self.data.len() < size_of::<u64>() {
            return Err(PropertyError::InvalidLength);
        }
        let cell = unsafe { ptr::read_unaligned(self.data.as_ptr() as *const BigEndian64) };
        Ok(cell.value())
    }

    pub fn value_as_str(&self) -> Result<&str, PropertyError> {
        let s = str::from_utf8(&self.data).map_err(|_| PropertyError::InvalidString)?;
        Ok(s.trim_end_matches('\0'))
    }

    pub fn value_as_strlist(&self) -> Result<Vec<&str>, PropertyError> {
        let mut res = Vec::new();
        let mut st = 0;
        for i in 0..self.data.len() {
            if self.data[i] == 0 {
                let s = str::from_utf8(&self.data[st..i])
                    .map_err(|_| PropertyError::InvalidString)?;
                res.push(s);
                st = i + 1;
            }
        }
        if st != self.data.len() {
            // last entry not NUL-terminated
            let s = str::from_utf8(&self.data[st..]).map_err(|_| PropertyError::InvalidString)?;
            res.push(s);
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn cells_round_trip_big_endian() {
        let prop = Property::from_cells("reg", &[0xa1000, 0x1000]);
        assert_eq!(&prop.data[..4], &[0x00, 0x0a, 0x10, 0x00]);
        assert_eq!(prop.value_as_cells().unwrap(), vec![0xa1000, 0x1000]);
        assert_eq!(prop.value_as_u32().unwrap(), 0xa1000);
    }

    #[test]
    fn u64s_round_trip() {
        let prop = Property::from_u64s("ibm,link-speed", &[20_000_000_000]);
        assert_eq!(prop.value_as_u64().unwrap(), 20_000_000_000);
        assert_eq!(prop.value_as_u64s().unwrap(), vec![20_000_000_000]);
    }

    #[test]
    fn string_list_decodes_each_entry() {
        let prop = Property::from_strs("compatible", &["ibm,power8-i2cm", "ibm,power9-i2cm"]);
        assert_eq!(
            prop.value_as_strlist().unwrap(),
            vec!["ibm,power8-i2cm", "ibm,power9-i2cm"]
        );
    }

    #[test]
    fn single_string_is_nul_terminated() {
        let prop = Property::from_str("compatible", "ibm,npu-link");
        assert_eq!(prop.data.last(), Some(&0));
        assert_eq!(prop.value_as_str().unwrap(), "ibm,npu-link");
        assert_eq!(prop.value_as_strlist().unwrap(), vec!["ibm,npu-link"]);
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let prop = Property::new("reg", vec![0x00, 0x0a]);
        assert_eq!(prop.value_as_u32(), Err(PropertyError::InvalidLength));
        assert_eq!(prop.value_as_cells(), Err(PropertyError::InvalidLength));
    }
}
