//! QMK raw HID constants and layer report framing

/// Vendor-defined usage page QMK assigns to the raw HID interface
pub const RAW_HID_USAGE_PAGE: u16 = 0xFF60;

/// Usage QMK assigns to the raw HID interface
pub const RAW_HID_USAGE: u16 = 0x61;

/// Default read buffer size; matches the largest raw HID endpoint QMK builds with
pub const DEFAULT_READ_SIZE: usize = 64;

/// How long a single read waits before returning with no data (ms).
///
/// Only bounds how often the caller gets to look at its shutdown flag; a
/// report arriving mid-wait is returned immediately.
pub const READ_POLL_MS: i32 = 200;

/// Byte offset of the layer index inside a report
pub const LAYER_OFFSET: usize = 0;

/// Extract the layer index from a report, `None` for an empty read
pub fn layer_index(report: &[u8]) -> Option<u8> {
    report.get(LAYER_OFFSET).copied()
}

/// Space-separated lowercase hex dump, as printed by the verbose report trace
pub fn hex_dump(report: &[u8]) -> String {
    report
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
