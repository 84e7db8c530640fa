//! Raw HID transport for QMK-style keyboards
//!
//! Finds the vendor-defined raw HID interface (usage page 0xFF60, usage 0x61)
//! among the interfaces a keyboard exposes, opens it, and reads reports from
//! it. Report contents are left to the caller apart from the layer byte
//! helpers in [`protocol`].

pub mod error;
pub mod protocol;
pub mod types;

mod discovery;
mod hid_raw;

pub use discovery::{select_raw_hid, HidDiscovery};
pub use error::TransportError;
pub use hid_raw::RawHidDevice;
pub use types::{DeviceId, InterfaceDescriptor};

/// Anything that yields raw HID input reports
///
/// Implemented by [`RawHidDevice`]; tests substitute scripted sources.
pub trait ReportSource {
    /// Read one report into `buf`, waiting at most `timeout_ms`
    ///
    /// Returns the number of bytes read; `0` means no report arrived
    /// within the timeout.
    fn read_report(&mut self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, TransportError>;
}
