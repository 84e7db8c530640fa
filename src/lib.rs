// QMK raw HID layer listener - shared library
// Layer decoding, switch-on-change dispatch, and adapter invocation

pub mod adapter;
pub mod error;
pub mod language;
pub mod listener;

pub use adapter::{AdapterCommand, AdapterInvoker, AdapterOutcome, InvokeMode, ADAPTER_TIMEOUT};
pub use error::ListenerError;
pub use language::{is_language_code, Language};
pub use listener::{listen, DecodeOnly, LanguageSink, LayerListener, ListenerConfig};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Install a Ctrl-C / SIGTERM handler that clears the returned flag.
pub fn setup_interrupt_handler() -> Result<Arc<AtomicBool>, ListenerError> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })?;

    Ok(running)
}
