//! Common types for the raw HID transport

use std::ffi::CString;
use std::fmt;

use crate::protocol;

/// USB device identity (VID, PID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId {
    pub vid: u16,
    pub pid: u16,
}

impl DeviceId {
    pub const fn new(vid: u16, pid: u16) -> Self {
        Self { vid, pid }
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}:{:#06x}", self.vid, self.pid)
    }
}

/// One HID interface exposed by a device
///
/// A QMK keyboard usually exposes several: the boot keyboard, consumer
/// control, mouse and the vendor-defined raw HID endpoint. Only the latter
/// carries layer reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    pub device: DeviceId,
    pub usage_page: u16,
    pub usage: u16,
    pub interface_number: i32,
    /// Platform path handed back to hidapi when opening
    pub path: CString,
    pub product_name: Option<String>,
}

impl InterfaceDescriptor {
    /// Check whether this is the raw HID endpoint (usage page 0xFF60, usage 0x61)
    pub fn is_raw_hid(&self) -> bool {
        self.usage_page == protocol::RAW_HID_USAGE_PAGE && self.usage == protocol::RAW_HID_USAGE
    }

    /// Path as printable text
    pub fn path_lossy(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl From<&hidapi::DeviceInfo> for InterfaceDescriptor {
    fn from(info: &hidapi::DeviceInfo) -> Self {
        Self {
            device: DeviceId::new(info.vendor_id(), info.product_id()),
            usage_page: info.usage_page(),
            usage: info.usage(),
            interface_number: info.interface_number(),
            path: info.path().to_owned(),
            product_name: info.product_string().map(str::to_string),
        }
    }
}
