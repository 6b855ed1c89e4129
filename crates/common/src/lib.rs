//! Common utilities for stm-usb-reset
//!
//! Shared error handling and logging setup used by the resetter crate.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
pub use logging::{LOG_LEVELS, setup_logging};
