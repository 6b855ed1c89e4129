//! USB subsystem
//!
//! The scanner only needs three things from a device: where it is, who made
//! it, and a way to reset it. [`UsbHost`] and [`UsbDevice`] describe exactly
//! that, and [`RusbHost`] implements them on top of libusb.

pub mod device;

use crate::error::{DescriptorError, ResetError, ScanError};
use std::fmt;

pub use device::{RusbDevice, RusbHost};

/// Identifying fields of an enumerated device
///
/// Taken from the cached device descriptor, so reading it never opens the
/// device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceLocation {
    pub bus_number: u8,
    pub address: u8,
    pub vendor_id: u16,
    pub product_id: u16,
}

impl fmt::Display for DeviceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bus {:03} address {:03} ({:04x}:{:04x})",
            self.bus_number, self.address, self.vendor_id, self.product_id
        )
    }
}

/// A device handed out by a [`UsbHost`] enumeration
pub trait UsbDevice {
    /// Bus position and VID:PID
    fn location(&self) -> DeviceLocation;

    /// Read the manufacturer string descriptor
    ///
    /// `Ok(None)` means the device does not provide one.
    fn manufacturer(&mut self) -> Result<Option<String>, DescriptorError>;

    /// Issue a USB port reset
    fn reset(&mut self) -> Result<(), ResetError>;
}

/// Source of device snapshots
pub trait UsbHost {
    type Device: UsbDevice;

    /// Enumerate every attached device, in host order
    ///
    /// Each call returns a fresh snapshot.
    fn devices(&self) -> Result<Vec<Self::Device>, ScanError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let location = DeviceLocation {
            bus_number: 3,
            address: 12,
            vendor_id: 0x0483,
            product_id: 0xdf11,
        };
        assert_eq!(location.to_string(), "bus 003 address 012 (0483:df11)");
    }
}
