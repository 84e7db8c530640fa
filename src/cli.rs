// CLI definitions using clap

use clap::Parser;
use rawhid_transport::protocol::DEFAULT_READ_SIZE;
use rawhid_transport::DeviceId;

#[derive(Parser, Debug)]
#[command(name = "input-source-listener")]
#[command(
    version,
    about = "Listen to QMK raw HID layer reports and switch the host input source via an external adapter"
)]
pub struct Cli {
    /// USB vendor ID (hex with 0x prefix, or decimal)
    #[arg(long, value_parser = parse_id)]
    pub vid: u16,

    /// USB product ID (hex with 0x prefix, or decimal)
    #[arg(long, value_parser = parse_id)]
    pub pid: u16,

    /// HID read buffer size in bytes
    #[arg(long, default_value_t = DEFAULT_READ_SIZE, value_parser = parse_read_size)]
    pub read_size: usize,

    /// Command that performs the input source switch, called as `CMD <lang>`.
    /// Split shell-style, so flags may be embedded. Without it, reports are
    /// only decoded.
    #[arg(long, value_name = "CMD")]
    pub input_source_adapter: Option<String>,

    /// Print adapter invocations without executing them
    #[arg(long)]
    pub dry_run: bool,

    /// Print every report and adapter call
    #[arg(short, long)]
    pub verbose: bool,

    /// List the device's HID interfaces and exit
    #[arg(long)]
    pub list: bool,

    /// Log level (error, warn, info, debug, trace); RUST_LOG overrides
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    pub fn device(&self) -> DeviceId {
        DeviceId::new(self.vid, self.pid)
    }
}

/// Parse a 16-bit USB id given as `0x3297` or `12951`
pub fn parse_id(s: &str) -> Result<u16, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse::<u16>(),
    };
    parsed.map_err(|e| format!("expected a 16-bit id like 0x3297 or 12951 ({e})"))
}

fn parse_read_size(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("read size must be at least 1 byte".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
