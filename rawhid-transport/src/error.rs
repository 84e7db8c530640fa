//! Transport error types

use thiserror::Error;

use crate::types::DeviceId;

/// Errors that can occur while discovering, opening or reading a raw HID interface
#[derive(Error, Debug)]
pub enum TransportError {
    /// hidapi could not be initialised (no backend, udev unavailable, ...)
    #[error("HID init failed: {0}")]
    Init(String),

    /// The device exposes no interface with the raw HID usage page/usage pair
    #[error("No HID devices found for {0}")]
    NoMatchingInterface(DeviceId),

    /// The interface exists but the OS refused to open it
    #[error("Could not open any interface for {device} (permission/privilege issue): {reason}")]
    PermissionDenied { device: DeviceId, reason: String },

    /// The interface exists but opening it failed for another reason
    #[error("Could not open any interface for {device}: {reason}")]
    DeviceOpen { device: DeviceId, reason: String },

    /// Reading from an opened interface failed (usually: device unplugged)
    #[error("HID read error: {0}")]
    Read(String),
}

impl TransportError {
    /// Classify an open failure reported by hidapi.
    ///
    /// hidapi only surfaces a message string, so permission problems are
    /// recognised the same way the rest of the stack does: by errno text.
    pub fn open_failed(device: DeviceId, err: hidapi::HidError) -> Self {
        let reason = err.to_string();
        if is_permission_message(&reason) {
            TransportError::PermissionDenied { device, reason }
        } else {
            TransportError::DeviceOpen { device, reason }
        }
    }
}

fn is_permission_message(msg: &str) -> bool {
    msg.contains("Permission denied") || msg.contains("EPERM") || msg.contains("EACCES")
}

/// True when a read was cut short by a signal (EINTR) rather than failing.
///
/// hidapi's Linux backend waits in `poll()`, which is not restarted after a
/// signal handler runs.
pub(crate) fn is_interrupted_message(msg: &str) -> bool {
    msg.contains("Interrupted system call") || msg.contains("EINTR") || msg.contains("os error 4)")
}

impl From<hidapi::HidError> for TransportError {
    fn from(e: hidapi::HidError) -> Self {
        TransportError::Read(e.to_string())
    }
}
