//! Selected device report
//!
//! The four report lines are scraped by result-collection scripts, so their
//! layout is fixed:
//!
//! ```text
//!     Vendor ID:      0x10DE
//!     Device ID:      0x2684
//!     Device Name:    NVIDIA GeForce RTX 4090
//!     Driver Version: 2300461056
//! ```

use ash::vk;
use std::fmt;

/// Identification fields of a physical device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// PCI vendor id
    pub vendor_id: u32,
    /// Vendor-specific device id
    pub device_id: u32,
    /// Human-readable device name
    pub device_name: String,
    /// Vendor-encoded driver version
    pub driver_version: u32,
}

impl DeviceIdentity {
    /// Extract the identification fields from device properties
    pub fn from_properties(properties: &vk::PhysicalDeviceProperties) -> Self {
        let name_bytes: Vec<u8> = properties
            .device_name
            .iter()
            .take_while(|&&c| c != 0)
            .map(|&c| c.to_ne_bytes()[0])
            .collect();

        Self {
            vendor_id: properties.vendor_id,
            device_id: properties.device_id,
            device_name: String::from_utf8_lossy(&name_bytes).into_owned(),
            driver_version: properties.driver_version,
        }
    }

    /// The report, one entry per line, without line terminators
    pub fn report_lines(&self) -> [String; 4] {
        [
            format!("    Vendor ID:      0x{:X}", self.vendor_id),
            format!("    Device ID:      0x{:X}", self.device_id),
            format!("    Device Name:    {}", self.device_name),
            format!("    Driver Version: {}", self.driver_version),
        ]
    }

    /// Emit the report at info level
    pub fn log(&self) {
        for line in self.report_lines() {
            log::info!("{line}");
        }
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.report_lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
