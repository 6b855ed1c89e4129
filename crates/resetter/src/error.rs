//! Resetter error types

use crate::usb::DeviceLocation;
use thiserror::Error;

/// Faults that end a scan
///
/// Context and enumeration failures are never recovered. A reset failure only
/// surfaces here under [`FailurePolicy::Propagate`](crate::FailurePolicy).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// libusb could not be initialized (no USB subsystem, no permission)
    #[error("Failed to initialize USB context: {0}")]
    Context(rusb::Error),

    /// The host refused to produce a device list
    #[error("Failed to enumerate USB devices: {0}")]
    Enumeration(rusb::Error),

    /// A matching device was found but could not be reset
    #[error("USB reset failed on {location}: {error}")]
    Reset {
        location: DeviceLocation,
        error: ResetError,
    },
}

/// Failure to reset a matched device
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResetError {
    /// Device handle could not be opened
    #[error("could not open device: {0}")]
    Open(rusb::Error),

    /// The reset request itself failed
    #[error("{0}")]
    Reset(rusb::Error),
}

/// Failure to read a device's manufacturer string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("could not read device descriptor: {0}")]
    Descriptor(rusb::Error),

    #[error("could not open device: {0}")]
    Open(rusb::Error),

    #[error("could not read manufacturer string: {0}")]
    String(rusb::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_error_display_is_bare_detail() {
        let err = ResetError::Reset(rusb::Error::Busy);
        assert_eq!(err.to_string(), rusb::Error::Busy.to_string());
    }

    #[test]
    fn test_reset_open_error_display() {
        let err = ResetError::Open(rusb::Error::Access);
        let msg = err.to_string();
        assert!(msg.starts_with("could not open device: "));
        assert!(msg.ends_with(&rusb::Error::Access.to_string()));
    }

    #[test]
    fn test_scan_error_reset_mentions_location() {
        let err = ScanError::Reset {
            location: DeviceLocation {
                bus_number: 1,
                address: 7,
                vendor_id: 0x0483,
                product_id: 0x374b,
            },
            error: ResetError::Reset(rusb::Error::NoDevice),
        };
        let msg = err.to_string();
        assert!(msg.contains("bus 001 address 007"));
        assert!(msg.contains("0483:374b"));
    }
}
