//! Raw HID layer listener.
//!
//! Reads layer reports from the keyboard, turns each into a [`Language`],
//! and hands it to a [`LanguageSink`] only when it differs from the last
//! one handed over (switch-on-change).

use std::sync::atomic::{AtomicBool, Ordering};

use rawhid_transport::protocol::{self, READ_POLL_MS};
use rawhid_transport::{DeviceId, HidDiscovery, ReportSource, TransportError};
use tracing::{debug, info};

use crate::adapter::AdapterInvoker;
use crate::error::ListenerError;
use crate::language::Language;

/// Receiver of language changes
pub trait LanguageSink {
    fn dispatch(&mut self, lang: Language);
}

impl<T: LanguageSink + ?Sized> LanguageSink for Box<T> {
    fn dispatch(&mut self, lang: Language) {
        (**self).dispatch(lang);
    }
}

impl LanguageSink for AdapterInvoker {
    fn dispatch(&mut self, lang: Language) {
        // Failures are already reported by the invoker. Dispatch state is not
        // rolled back on failure, so a broken adapter is not retried per report.
        let _ = self.invoke(lang);
    }
}

/// Sink used when no adapter is configured: decode-only mode
#[derive(Debug, Default)]
pub struct DecodeOnly {
    verbose: bool,
}

impl DecodeOnly {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl LanguageSink for DecodeOnly {
    fn dispatch(&mut self, lang: Language) {
        if self.verbose {
            println!("[hid] input source -> {lang} (no adapter configured)");
        } else {
            debug!("input source -> {} (no adapter configured)", lang);
        }
    }
}

/// Listener settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerConfig {
    /// Read buffer size in bytes
    pub read_size: usize,
    /// Print a trace line for every report
    pub verbose: bool,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            read_size: protocol::DEFAULT_READ_SIZE,
            verbose: false,
        }
    }
}

/// Read loop state: the report source, the sink, and the last dispatched language
pub struct LayerListener<S, D> {
    source: S,
    sink: D,
    config: ListenerConfig,
    last_lang: Option<Language>,
}

impl<S: ReportSource, D: LanguageSink> LayerListener<S, D> {
    pub fn new(source: S, sink: D, config: ListenerConfig) -> Self {
        Self {
            source,
            sink,
            config,
            last_lang: None,
        }
    }

    /// Language most recently handed to the sink, if any
    pub fn last_dispatched(&self) -> Option<Language> {
        self.last_lang
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    /// Process one report. Returns the language if it was dispatched.
    ///
    /// Empty reports are ignored and leave the dispatch state untouched.
    pub fn handle_report(&mut self, report: &[u8]) -> Option<Language> {
        let layer = protocol::layer_index(report)?;
        let lang = Language::from_layer(layer);

        if self.config.verbose {
            println!(
                "[hid] raw={}  layer={}  lang={}",
                protocol::hex_dump(report),
                layer,
                lang
            );
        }

        if self.last_lang == Some(lang) {
            return None;
        }

        self.last_lang = Some(lang);
        self.sink.dispatch(lang);
        Some(lang)
    }

    /// Read and dispatch reports until `running` is cleared or a read fails.
    ///
    /// Reads wait in short slices so the flag is seen within
    /// [`READ_POLL_MS`] of an interrupt while the keyboard is idle. An
    /// adapter call in progress delays that by up to its timeout.
    pub fn run(&mut self, running: &AtomicBool) -> Result<(), TransportError> {
        let mut buf = vec![0u8; self.config.read_size.max(1)];

        while running.load(Ordering::SeqCst) {
            let len = match self.source.read_report(&mut buf, READ_POLL_MS) {
                Ok(len) => len,
                // The interrupt that cleared the flag may also have aborted the read
                Err(e) if !running.load(Ordering::SeqCst) => {
                    debug!("read failed during shutdown: {}", e);
                    break;
                }
                Err(e) => return Err(e),
            };
            self.handle_report(&buf[..len]);
        }

        debug!("read loop stopped, last language {:?}", self.last_lang);
        Ok(())
    }
}

/// Discover, open and listen to the raw HID interface of `device`.
///
/// Returns `Ok(())` once `running` is cleared; the interface is closed
/// before returning on every path.
pub fn listen<D: LanguageSink>(
    discovery: &HidDiscovery,
    device: DeviceId,
    config: ListenerConfig,
    sink: D,
    running: &AtomicBool,
) -> Result<(), ListenerError> {
    let descriptor = discovery.discover(device)?;
    info!(
        "Using raw HID interface {} if={} ({})",
        descriptor.device,
        descriptor.interface_number,
        descriptor.product_name.as_deref().unwrap_or("Unknown")
    );

    let interface = discovery.open(&descriptor)?;
    println!("Started. Waiting for HID report...");

    let mut listener = LayerListener::new(interface, sink, config);
    listener.run(running)?;
    Ok(())
}
