//! Listener error types

use rawhid_transport::TransportError;
use thiserror::Error;

use crate::adapter::AdapterConfigError;

/// Errors that end a listener run
#[derive(Error, Debug)]
pub enum ListenerError {
    /// Discovery, open or read failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Adapter command line could not be used
    #[error("Invalid --input-source-adapter: {0}")]
    AdapterConfig(#[from] AdapterConfigError),

    /// Ctrl-C handler could not be installed
    #[error("Failed to install interrupt handler: {0}")]
    InterruptHandler(#[from] ctrlc::Error),
}

impl ListenerError {
    /// Process exit status for this error
    ///
    /// Usage errors share clap's status; everything else is 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            ListenerError::AdapterConfig(_) => 2,
            _ => 1,
        }
    }
}
