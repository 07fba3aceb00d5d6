//! Shared glue for service-processor managed machines.
//!
//! Descriptor hooks on these platforms all funnel through the management
//! link; the functions here are the seam the descriptors point at. Data
//! channel operations (NVRAM, sensors, error logs) report
//! [PlatformError::Unsupported] until the wire-protocol driver is linked
//! into the image.

use log::{debug, error, info};

use crate::error::PlatformError;

pub fn init() {
    debug!("SP: bringing up service processor platform services");
}

pub fn host_services_init() {
    debug!("HBRT: host services interface not present, skipping");
}

pub fn exit() {
    debug!("SP: shutting down service processor platform services");
}

pub fn cec_power_down() -> Result<(), PlatformError> {
    info!("SP: power down requested");
    Ok(())
}

pub fn cec_reboot() -> Result<(), PlatformError> {
    info!("SP: reboot requested");
    Ok(())
}

/// Time to wait for the OCC to come up. Fixed for now.
pub fn occ_timeout() -> u32 {
    60
}

pub fn nvram_info() -> Result<u32, PlatformError> {
    debug!("SP: NVRAM backing store not negotiated");
    Err(PlatformError::Unsupported)
}

pub fn nvram_start_read(_dst: &mut [u8], _offset: u32) -> Result<(), PlatformError> {
    debug!("SP: NVRAM backing store not negotiated");
    Err(PlatformError::Unsupported)
}

pub fn nvram_write(_offset: u32, _src: &[u8]) -> Result<(), PlatformError> {
    debug!("SP: NVRAM backing store not negotiated");
    Err(PlatformError::Unsupported)
}

pub fn elog_commit(log_id: u32) -> Result<(), PlatformError> {
    debug!("SP: no error log channel for log {log_id:#x}");
    Err(PlatformError::Unsupported)
}

pub fn sensor_read(sensor_handle: u32) -> Result<u32, PlatformError> {
    debug!("SP: no sensor channel for handle {sensor_handle:#x}");
    Err(PlatformError::Unsupported)
}

pub fn terminate(reason: &str) -> ! {
    error!("SP: terminating: {reason}");
    loop {
        core::hint::spin_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occ_timeout_is_fixed_sixty_seconds() {
        assert_eq!(occ_timeout(), 60);
    }

    #[test]
    fn data_channels_report_unsupported() {
        assert_eq!(nvram_info(), Err(PlatformError::Unsupported));
        assert_eq!(sensor_read(0x100), Err(PlatformError::Unsupported));
        assert_eq!(elog_commit(0x1), Err(PlatformError::Unsupported));
    }
}
