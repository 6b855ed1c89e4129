//! Device scanner and resetter
//!
//! Enumerates devices, picks the first one whose manufacturer string equals
//! the configured name, and resets it. Later devices are never inspected once
//! a match is found.

use crate::config::{ResetterConfig, ScanSettings};
use crate::error::{DescriptorError, ResetError, ScanError};
use crate::usb::{DeviceLocation, UsbDevice, UsbHost};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use tracing::{debug, info, warn};

/// What to do when the matched device refuses to reset
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Print the failure and exit with a distinct code
    #[default]
    Report,
    /// Let the failure abort the process
    Propagate,
}

/// Terminal result of a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Matching device found and reset
    Reset(DeviceLocation),
    /// Matching device found but the reset failed
    ResetFailed {
        location: DeviceLocation,
        error: ResetError,
    },
    /// No device matched
    NotFound,
}

impl Outcome {
    /// Status line for stdout, e.g. `STM found and reset`
    pub fn message(&self, label: &str) -> String {
        match self {
            Outcome::Reset(_) => format!("{} found and reset", label),
            Outcome::ResetFailed { error, .. } => {
                format!("{} found, USB reset failed: {}", label, error)
            }
            Outcome::NotFound => format!("{} not found", label),
        }
    }

    /// Process exit code
    ///
    /// | Outcome | `Report` | `Propagate` |
    /// |---|---|---|
    /// | `Reset` | 0 | 0 |
    /// | `ResetFailed` | 1 | n/a |
    /// | `NotFound` | 2 | 0 |
    pub fn exit_code(&self, policy: FailurePolicy) -> u8 {
        match (self, policy) {
            (Outcome::Reset(_), _) => 0,
            (Outcome::ResetFailed { .. }, _) => 1,
            (Outcome::NotFound, FailurePolicy::Report) => 2,
            (Outcome::NotFound, FailurePolicy::Propagate) => 0,
        }
    }
}

/// Find the first device whose manufacturer string equals `manufacturer`
///
/// Comparison is exact and case-sensitive. Devices with no manufacturer
/// string, or one that cannot be read, do not match and the scan moves on.
pub fn find_first<H: UsbHost>(
    host: &H,
    manufacturer: &str,
) -> Result<Option<H::Device>, ScanError> {
    for mut device in host.devices()? {
        if manufacturer_matches(&mut device, manufacturer) {
            return Ok(Some(device));
        }
    }

    Ok(None)
}

fn manufacturer_matches<D: UsbDevice>(device: &mut D, wanted: &str) -> bool {
    match device.manufacturer() {
        Ok(Some(name)) => {
            debug!("{}: manufacturer {:?}", device.location(), name);
            name == wanted
        }
        Ok(None) => {
            debug!("{}: no manufacturer string", device.location());
            false
        }
        Err(e) => {
            debug!("{}: skipped, {}", device.location(), e);
            false
        }
    }
}

/// Find the first matching device and reset it
///
/// Under [`FailurePolicy::Report`] a failed reset comes back as
/// [`Outcome::ResetFailed`]; under [`FailurePolicy::Propagate`] it is
/// returned as [`ScanError::Reset`].
pub fn scan_and_reset<H: UsbHost>(host: &H, settings: &ScanSettings) -> Result<Outcome, ScanError> {
    let Some(mut device) = find_first(host, &settings.manufacturer)? else {
        info!("No {} device attached", settings.manufacturer);
        return Ok(Outcome::NotFound);
    };

    let location = device.location();
    info!("Resetting {} device at {}", settings.manufacturer, location);

    match device.reset() {
        Ok(()) => {
            info!("Reset {} complete", location);
            Ok(Outcome::Reset(location))
        }
        Err(error) => match settings.on_failure {
            FailurePolicy::Report => {
                warn!("Failed to reset {}: {}", location, error);
                Ok(Outcome::ResetFailed { location, error })
            }
            FailurePolicy::Propagate => Err(ScanError::Reset { location, error }),
        },
    }
}

/// Scan, write the status line to `out`, and return the process exit code
///
/// Enumeration faults, and reset faults under [`FailurePolicy::Propagate`],
/// come back as `Err` with nothing written.
pub fn run<H: UsbHost, W: Write>(
    host: &H,
    config: &ResetterConfig,
    out: &mut W,
) -> anyhow::Result<u8> {
    let outcome = scan_and_reset(host, &config.scan)?;

    writeln!(out, "{}", outcome.message(&config.scan.label))
        .context("Failed to write status line")?;

    Ok(outcome.exit_code(config.scan.on_failure))
}

/// One row of `--list-devices` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedDevice {
    pub location: DeviceLocation,
    pub manufacturer: Result<Option<String>, DescriptorError>,
}

impl fmt::Display for ListedDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bus {:03} Device {:03}: ID {:04x}:{:04x} ",
            self.location.bus_number,
            self.location.address,
            self.location.vendor_id,
            self.location.product_id
        )?;

        match &self.manufacturer {
            Ok(Some(name)) => write!(f, "{}", name),
            Ok(None) => write!(f, "<no manufacturer>"),
            Err(e) => write!(f, "<unreadable: {}>", e),
        }
    }
}

/// Enumerate every device with its manufacturer string, without resetting
pub fn list_devices<H: UsbHost>(host: &H) -> Result<Vec<ListedDevice>, ScanError> {
    let listed = host
        .devices()?
        .into_iter()
        .map(|mut device| ListedDevice {
            location: device.location(),
            manufacturer: device.manufacturer(),
        })
        .collect();

    Ok(listed)
}
