//! QMK raw HID input source listener
//!
//! Watches a keyboard's raw HID interface for layer reports and calls an
//! external adapter whenever the layer implies a different input language.

use std::process::ExitCode;

use clap::Parser;
use rawhid_transport::HidDiscovery;
use tracing::info;

mod cli;
use cli::Cli;

use input_source_listener::{
    listen, setup_interrupt_handler, AdapterCommand, AdapterInvoker, DecodeOnly, InvokeMode,
    LanguageSink, ListenerConfig, ListenerError,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), ListenerError> {
    let device = cli.device();

    // Validate the adapter before touching the device
    let sink: Box<dyn LanguageSink> = match &cli.input_source_adapter {
        Some(cmdline) => {
            let command = AdapterCommand::parse(cmdline)?;
            let mode = InvokeMode::from_flags(cli.dry_run, cli.verbose);
            info!("Adapter: {:?} ({:?})", command, mode);
            Box::new(AdapterInvoker::new(command, mode))
        }
        None => Box::new(DecodeOnly::new(cli.verbose)),
    };

    let discovery = HidDiscovery::new()?;

    if cli.list {
        list_interfaces(&discovery, cli);
        return Ok(());
    }

    let running = setup_interrupt_handler()?;
    let config = ListenerConfig {
        read_size: cli.read_size,
        verbose: cli.verbose,
    };

    listen(&discovery, device, config, sink, &running)?;

    println!("\nStopped.");
    Ok(())
}

/// Print every interface of the device, marking the raw HID one
fn list_interfaces(discovery: &HidDiscovery, cli: &Cli) {
    let device = cli.device();
    let interfaces = discovery.list_interfaces(device);
    if interfaces.is_empty() {
        println!("No HID interfaces for {device}");
        return;
    }

    println!("HID interfaces for {device}:");
    for iface in interfaces {
        println!(
            "  usage_page={:04x} usage={:04x} if={} path={}{}",
            iface.usage_page,
            iface.usage,
            iface.interface_number,
            iface.path_lossy(),
            if iface.is_raw_hid() { "  <- raw HID" } else { "" }
        );
    }
}
