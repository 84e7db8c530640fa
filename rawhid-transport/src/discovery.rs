//! Raw HID interface discovery

use hidapi::HidApi;
use tracing::{debug, info};

use crate::error::TransportError;
use crate::hid_raw::RawHidDevice;
use crate::types::{DeviceId, InterfaceDescriptor};

/// HID device discovery backed by a hidapi context
pub struct HidDiscovery {
    api: HidApi,
}

impl HidDiscovery {
    /// Create a hidapi context and enumerate attached devices
    pub fn new() -> Result<Self, TransportError> {
        let api = HidApi::new().map_err(|e| TransportError::Init(e.to_string()))?;
        Ok(Self { api })
    }

    /// All interfaces the given device exposes, in enumeration order
    pub fn list_interfaces(&self, device: DeviceId) -> Vec<InterfaceDescriptor> {
        self.api
            .device_list()
            .filter(|d| d.vendor_id() == device.vid && d.product_id() == device.pid)
            .map(InterfaceDescriptor::from)
            .inspect(|iface| {
                debug!(
                    "Found interface: {} usage_page=0x{:04X} usage=0x{:02X} if={} path={}",
                    iface.device,
                    iface.usage_page,
                    iface.usage,
                    iface.interface_number,
                    iface.path_lossy()
                );
            })
            .collect()
    }

    /// Find the raw HID interface of a device
    ///
    /// Not retried: a missing interface needs operator action (replug,
    /// different VID/PID, firmware without raw HID).
    pub fn discover(&self, device: DeviceId) -> Result<InterfaceDescriptor, TransportError> {
        select_raw_hid(device, self.list_interfaces(device))
    }

    /// Open a previously discovered interface for reading
    pub fn open(&self, descriptor: &InterfaceDescriptor) -> Result<RawHidDevice, TransportError> {
        let device = self
            .api
            .open_path(&descriptor.path)
            .map_err(|e| TransportError::open_failed(descriptor.device, e))?;

        info!(
            "Opened raw HID interface {} (if={}) at {}",
            descriptor.device,
            descriptor.interface_number,
            descriptor.path_lossy()
        );
        Ok(RawHidDevice::new(device, descriptor.clone()))
    }
}

/// Pick the first raw HID interface out of a device's interfaces
pub fn select_raw_hid(
    device: DeviceId,
    interfaces: impl IntoIterator<Item = InterfaceDescriptor>,
) -> Result<InterfaceDescriptor, TransportError> {
    interfaces
        .into_iter()
        .find(InterfaceDescriptor::is_raw_hid)
        .ok_or(TransportError::NoMatchingInterface(device))
}
