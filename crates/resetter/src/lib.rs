//! stm-usb-reset
//!
//! Scans attached USB devices, finds the first one whose manufacturer string
//! is exactly "STMicroelectronics" (or a configured replacement), and issues
//! a USB reset to it.
//!
//! The binary prints one status line and exits with:
//!
//! | Code | Meaning |
//! |---|---|
//! | 0 | device found and reset |
//! | 1 | device found, reset failed |
//! | 2 | no matching device |
//!
//! With the `propagate` failure policy a reset failure aborts the process
//! instead, and "not found" exits 0.

pub mod config;
pub mod error;
pub mod scanner;
pub mod test_utils;
pub mod usb;

pub use config::{LoggingSettings, ResetterConfig, ScanSettings};
pub use error::{DescriptorError, ResetError, Result, ScanError};
pub use scanner::{
    FailurePolicy, ListedDevice, Outcome, find_first, list_devices, run,
    scan_and_reset,
};
pub use usb::{DeviceLocation, RusbHost, UsbDevice, UsbHost};
