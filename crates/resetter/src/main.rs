//! stm-usb-reset
//!
//! Finds the first attached STMicroelectronics USB device and resets it.

use anyhow::{Context, Result};
use clap::Parser;
use common::{LOG_LEVELS, setup_logging};
use resetter::config::expand_path;
use resetter::{FailurePolicy, ResetterConfig, RusbHost, list_devices, run};
use std::process::ExitCode;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "stm-usb-reset")]
#[command(
    author,
    version,
    about = "Reset the first attached STMicroelectronics USB device"
)]
#[command(long_about = "
Scans the attached USB devices in host order, picks the first one whose
manufacturer string is exactly \"STMicroelectronics\", and issues a USB reset.

EXIT STATUS:
    0   device found and reset
    1   device found, reset failed (or any fatal error)
    2   no matching device

    With --on-failure propagate, a failed reset aborts with an error and
    \"not found\" exits 0.

EXAMPLES:
    # Reset the first ST device
    stm-usb-reset

    # Show what would be matched, without resetting anything
    stm-usb-reset --list-devices

    # Match another vendor
    stm-usb-reset --manufacturer \"Raspberry Pi\"

CONFIGURATION:
    The first file found is used:
    1. Path specified with --config
    2. ~/.config/stm-usb-reset/config.toml
    3. /etc/stm-usb-reset/config.toml
    4. Built-in defaults
")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Save default configuration to default location and exit
    #[arg(long)]
    save_config: bool,

    /// List USB devices with their manufacturer strings and exit
    #[arg(long)]
    list_devices: bool,

    /// Manufacturer string to match (exact, case-sensitive)
    #[arg(short, long, value_name = "NAME")]
    manufacturer: Option<String>,

    /// What to do when the reset fails
    #[arg(long, value_enum, value_name = "POLICY")]
    on_failure: Option<FailurePolicy>,

    /// Log level
    #[arg(short, long, value_name = "LEVEL", value_parser = LOG_LEVELS)]
    log_level: Option<String>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    if args.save_config {
        let path = ResetterConfig::default_path();
        ResetterConfig::default()
            .save(&path)
            .context("Failed to save configuration")?;
        println!("Configuration saved to: {}", path.display());
        return Ok(ExitCode::SUCCESS);
    }

    // An explicit --config must load; a broken discovered file only warns
    let (config, discovery_error) = match args.config.as_deref() {
        Some(path) => (
            ResetterConfig::load(&expand_path(path)).context("Failed to load configuration")?,
            None,
        ),
        None => match ResetterConfig::discover() {
            Ok(config) => (config, None),
            Err(e) => (ResetterConfig::default(), Some(e)),
        },
    };

    let config = apply_overrides(config, &args)?;

    setup_logging(&config.logging.level).context("Failed to setup logging")?;

    if let Some(e) = discovery_error {
        warn!("Ignoring configuration file: {:#}", e);
    }

    info!("stm-usb-reset v{}", env!("CARGO_PKG_VERSION"));

    let host = RusbHost::new()?;

    if args.list_devices {
        return list_devices_mode(&host);
    }

    let code = run(&host, &config, &mut std::io::stdout().lock())?;
    Ok(ExitCode::from(code))
}

/// Fold command-line flags over the loaded configuration
fn apply_overrides(mut config: ResetterConfig, args: &Args) -> Result<ResetterConfig> {
    if let Some(manufacturer) = &args.manufacturer {
        config.scan.manufacturer = manufacturer.clone();
    }
    if let Some(policy) = args.on_failure {
        config.scan.on_failure = policy;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }

    config.validate().context("Invalid settings")?;
    Ok(config)
}

/// List USB devices and exit
fn list_devices_mode(host: &RusbHost) -> Result<ExitCode> {
    let devices = list_devices(host)?;

    if devices.is_empty() {
        println!("No USB devices found.");
    } else {
        for device in devices {
            println!("{}", device);
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("stm-usb-reset").chain(argv.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_no_arguments_keeps_defaults() {
        let args = parse(&[]);
        let config = apply_overrides(ResetterConfig::default(), &args).unwrap();
        assert_eq!(config, ResetterConfig::default());
        assert!(!args.list_devices);
        assert!(!args.save_config);
    }

    #[test]
    fn test_flags_override_config() {
        let args = parse(&[
            "--manufacturer",
            "Raspberry Pi",
            "--on-failure",
            "propagate",
            "--log-level",
            "debug",
        ]);
        let config = apply_overrides(ResetterConfig::default(), &args).unwrap();

        assert_eq!(config.scan.manufacturer, "Raspberry Pi");
        assert_eq!(config.scan.on_failure, FailurePolicy::Propagate);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_empty_manufacturer_rejected() {
        let args = parse(&["--manufacturer", ""]);
        assert!(apply_overrides(ResetterConfig::default(), &args).is_err());
    }

    #[test]
    fn test_unknown_log_level_rejected_by_parser() {
        let result = Args::try_parse_from(["stm-usb-reset", "--log-level", "loud"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_policy_rejected_by_parser() {
        let result = Args::try_parse_from(["stm-usb-reset", "--on-failure", "ignore"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
