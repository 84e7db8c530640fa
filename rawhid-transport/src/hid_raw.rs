//! Opened raw HID interface

use hidapi::HidDevice;
use tracing::debug;

use crate::error::{is_interrupted_message, TransportError};
use crate::types::InterfaceDescriptor;
use crate::ReportSource;

/// An open raw HID interface
///
/// The underlying hidapi handle is closed when this value is dropped, so
/// every exit path out of the owning scope releases the device.
pub struct RawHidDevice {
    device: HidDevice,
    descriptor: InterfaceDescriptor,
}

impl RawHidDevice {
    pub(crate) fn new(device: HidDevice, descriptor: InterfaceDescriptor) -> Self {
        Self { device, descriptor }
    }
}

impl ReportSource for RawHidDevice {
    fn read_report(&mut self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, TransportError> {
        let len = match self.device.read_timeout(buf, timeout_ms) {
            Ok(len) => len,
            // A signal (e.g. Ctrl-C) woke the poll: report it as an empty read
            Err(e) if is_interrupted_message(&e.to_string()) => {
                debug!("raw HID read interrupted: {}", e);
                0
            }
            Err(e) => return Err(e.into()),
        };
        if len > 0 {
            debug!("raw HID read {} bytes: {:02X?}", len, &buf[..len.min(16)]);
        }
        Ok(len)
    }
}

impl Drop for RawHidDevice {
    fn drop(&mut self) {
        debug!("Closing raw HID interface {}", self.descriptor.device);
    }
}
