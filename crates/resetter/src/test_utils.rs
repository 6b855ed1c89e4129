//! Test utilities for the resetter
//!
//! An in-memory [`UsbHost`] whose devices record every manufacturer read and
//! reset request, so tests can check what the scanner touched.
//!
//! # Example
//!
//! ```
//! use resetter::test_utils::{MockHost, mock_device};
//! use resetter::find_first;
//!
//! let host = MockHost::new(vec![mock_device(1, "Acme"), mock_device(2, "STMicroelectronics")]);
//! let found = find_first(&host, "STMicroelectronics").unwrap();
//! assert!(found.is_some());
//! assert_eq!(host.inspected(), vec![1, 2]);
//! ```

use crate::error::{DescriptorError, ResetError, ScanError};
use crate::usb::{DeviceLocation, UsbDevice, UsbHost};
use std::cell::RefCell;
use std::rc::Rc;

/// Something a mock device was asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockEvent {
    /// Manufacturer string read, by device address
    Inspected(u8),
    /// Reset requested, by device address
    Reset(u8),
}

/// Manufacturer string behaviour of a mock device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockManufacturer {
    Present(String),
    Absent,
    Unreadable(DescriptorError),
}

/// Blueprint for a device the mock host enumerates
#[derive(Debug, Clone)]
pub struct MockDeviceSpec {
    pub location: DeviceLocation,
    pub manufacturer: MockManufacturer,
    pub reset_error: Option<ResetError>,
}

impl MockDeviceSpec {
    /// Make the device's reset fail with `error`
    pub fn with_reset_error(mut self, error: ResetError) -> Self {
        self.reset_error = Some(error);
        self
    }

    /// Override VID:PID
    pub fn with_ids(mut self, vendor_id: u16, product_id: u16) -> Self {
        self.location.vendor_id = vendor_id;
        self.location.product_id = product_id;
        self
    }
}

/// Create a mock device on bus 1 with a manufacturer string
pub fn mock_device(address: u8, manufacturer: &str) -> MockDeviceSpec {
    mock_device_with(address, MockManufacturer::Present(manufacturer.to_string()))
}

/// Create a mock device that has no manufacturer string descriptor
pub fn mock_device_without_manufacturer(address: u8) -> MockDeviceSpec {
    mock_device_with(address, MockManufacturer::Absent)
}

/// Create a mock device whose manufacturer string cannot be read
pub fn mock_unreadable_device(address: u8, error: DescriptorError) -> MockDeviceSpec {
    mock_device_with(address, MockManufacturer::Unreadable(error))
}

fn mock_device_with(address: u8, manufacturer: MockManufacturer) -> MockDeviceSpec {
    MockDeviceSpec {
        location: DeviceLocation {
            bus_number: 1,
            address,
            vendor_id: 0x1234,
            product_id: 0x5678,
        },
        manufacturer,
        reset_error: None,
    }
}

/// In-memory USB host
pub struct MockHost {
    devices: Vec<MockDeviceSpec>,
    enumeration_error: Option<rusb::Error>,
    events: Rc<RefCell<Vec<MockEvent>>>,
}

impl MockHost {
    /// Host that enumerates `devices` in order
    pub fn new(devices: Vec<MockDeviceSpec>) -> Self {
        Self {
            devices,
            enumeration_error: None,
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Host whose enumeration always fails with `error`
    pub fn failing(error: rusb::Error) -> Self {
        Self {
            enumeration_error: Some(error),
            ..Self::new(Vec::new())
        }
    }

    /// Every event recorded so far, in order
    pub fn events(&self) -> Vec<MockEvent> {
        self.events.borrow().clone()
    }

    /// Addresses whose manufacturer string was read
    pub fn inspected(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                MockEvent::Inspected(address) => Some(address),
                MockEvent::Reset(_) => None,
            })
            .collect()
    }

    /// Addresses that were asked to reset
    pub fn reset_calls(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                MockEvent::Reset(address) => Some(address),
                MockEvent::Inspected(_) => None,
            })
            .collect()
    }
}

impl UsbHost for MockHost {
    type Device = MockDevice;

    fn devices(&self) -> Result<Vec<MockDevice>, ScanError> {
        if let Some(error) = self.enumeration_error {
            return Err(ScanError::Enumeration(error));
        }

        Ok(self
            .devices
            .iter()
            .cloned()
            .map(|spec| MockDevice {
                spec,
                events: Rc::clone(&self.events),
            })
            .collect())
    }
}

/// Device produced by [`MockHost`]
pub struct MockDevice {
    spec: MockDeviceSpec,
    events: Rc<RefCell<Vec<MockEvent>>>,
}

impl UsbDevice for MockDevice {
    fn location(&self) -> DeviceLocation {
        self.spec.location
    }

    fn manufacturer(&mut self) -> Result<Option<String>, DescriptorError> {
        self.events
            .borrow_mut()
            .push(MockEvent::Inspected(self.spec.location.address));

        match &self.spec.manufacturer {
            MockManufacturer::Present(name) => Ok(Some(name.clone())),
            MockManufacturer::Absent => Ok(None),
            MockManufacturer::Unreadable(error) => Err(error.clone()),
        }
    }

    fn reset(&mut self) -> Result<(), ResetError> {
        self.events
            .borrow_mut()
            .push(MockEvent::Reset(self.spec.location.address));

        match &self.spec.reset_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}
