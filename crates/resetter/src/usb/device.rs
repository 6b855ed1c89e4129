//! libusb-backed host and device
//!
//! Wraps rusb's `Context` and `Device` with a cached descriptor and a lazily
//! opened handle, so reading the manufacturer string and resetting the same
//! device share one open.

use super::{DeviceLocation, UsbDevice, UsbHost};
use crate::error::{DescriptorError, ResetError, ScanError};
use rusb::{Context, Device, DeviceDescriptor, DeviceHandle, UsbContext};
use tracing::debug;

/// USB host backed by a libusb context
pub struct RusbHost {
    context: Context,
}

impl RusbHost {
    /// Create a new libusb context
    pub fn new() -> Result<Self, ScanError> {
        let context = Context::new().map_err(ScanError::Context)?;
        Ok(Self { context })
    }
}

impl UsbHost for RusbHost {
    type Device = RusbDevice;

    fn devices(&self) -> Result<Vec<RusbDevice>, ScanError> {
        let list = self.context.devices().map_err(ScanError::Enumeration)?;
        let devices: Vec<RusbDevice> = list.iter().map(RusbDevice::new).collect();

        debug!("Enumerated {} devices", devices.len());
        Ok(devices)
    }
}

/// USB device wrapper with cached descriptor
pub struct RusbDevice {
    /// Underlying rusb device
    device: Device<Context>,
    /// Device descriptor, read once at enumeration
    descriptor: Result<DeviceDescriptor, rusb::Error>,
    /// Device handle (if opened)
    handle: Option<DeviceHandle<Context>>,
}

impl RusbDevice {
    /// Wrap an enumerated device
    pub fn new(device: Device<Context>) -> Self {
        let descriptor = device.device_descriptor();

        Self {
            device,
            descriptor,
            handle: None,
        }
    }

    /// Open the device, reusing an existing handle
    fn open(&mut self) -> Result<&mut DeviceHandle<Context>, rusb::Error> {
        let handle = match self.handle.take() {
            Some(handle) => handle,
            None => {
                let handle = self.device.open()?;
                debug!("Opened device {}", self.location());
                handle
            }
        };

        Ok(self.handle.insert(handle))
    }
}

impl UsbDevice for RusbDevice {
    fn location(&self) -> DeviceLocation {
        let (vendor_id, product_id) = match &self.descriptor {
            Ok(desc) => (desc.vendor_id(), desc.product_id()),
            Err(_) => (0, 0),
        };

        DeviceLocation {
            bus_number: self.device.bus_number(),
            address: self.device.address(),
            vendor_id,
            product_id,
        }
    }

    fn manufacturer(&mut self) -> Result<Option<String>, DescriptorError> {
        let index = match &self.descriptor {
            Ok(desc) => desc.manufacturer_string_index(),
            Err(e) => return Err(DescriptorError::Descriptor(*e)),
        };

        let Some(index) = index else {
            return Ok(None);
        };

        let handle = self.open().map_err(DescriptorError::Open)?;
        handle
            .read_string_descriptor_ascii(index)
            .map(Some)
            .map_err(DescriptorError::String)
    }

    fn reset(&mut self) -> Result<(), ResetError> {
        let handle = self.open().map_err(ResetError::Open)?;
        handle.reset().map_err(ResetError::Reset)?;

        debug!("Reset device {}", self.location());
        Ok(())
    }
}
