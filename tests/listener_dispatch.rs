//! Integration tests for the read loop driving a real adapter process.
//!
//! Reports come from a scripted source instead of a keyboard; the adapter is
//! the bundled `input-source-adapter-test` binary.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use input_source_listener::{
    AdapterCommand, AdapterInvoker, InvokeMode, Language, LanguageSink, LayerListener,
    ListenerConfig,
};
use rawhid_transport::{ReportSource, TransportError};

const TEST_ADAPTER: &str = env!("CARGO_BIN_EXE_input-source-adapter-test");

/// Replays layer reports, then clears `running` like an operator interrupt would
struct ReplayedKeyboard<'a> {
    reports: VecDeque<Vec<u8>>,
    running: &'a AtomicBool,
}

impl<'a> ReplayedKeyboard<'a> {
    fn new(layers: &[Option<u8>], running: &'a AtomicBool) -> Self {
        let reports = layers
            .iter()
            .map(|layer| match layer {
                Some(layer) => {
                    let mut report = vec![0u8; 32];
                    report[0] = *layer;
                    report
                }
                None => Vec::new(),
            })
            .collect();
        Self { reports, running }
    }
}

impl ReportSource for ReplayedKeyboard<'_> {
    fn read_report(&mut self, buf: &mut [u8], _timeout_ms: i32) -> Result<usize, TransportError> {
        match self.reports.pop_front() {
            Some(report) => {
                let len = report.len().min(buf.len());
                buf[..len].copy_from_slice(&report[..len]);
                Ok(len)
            }
            None => {
                self.running.store(false, Ordering::SeqCst);
                Ok(0)
            }
        }
    }
}

/// Wraps the real invoker and remembers what it was asked to do
struct CountingInvoker {
    inner: AdapterInvoker,
    calls: Vec<(Language, bool)>,
}

impl LanguageSink for CountingInvoker {
    fn dispatch(&mut self, lang: Language) {
        let ok = self.inner.invoke(lang).is_success();
        self.calls.push((lang, ok));
    }
}

fn invoker(flags: &str, mode: InvokeMode) -> CountingInvoker {
    let path = shlex::try_quote(TEST_ADAPTER).expect("quotable adapter path");
    let command = AdapterCommand::parse(&format!("{path} {flags}")).expect("valid command line");
    CountingInvoker {
        inner: AdapterInvoker::new(command, mode),
        calls: Vec::new(),
    }
}

#[test]
fn layer_changes_reach_the_adapter() {
    let running = AtomicBool::new(true);
    let keyboard = ReplayedKeyboard::new(
        &[Some(0), Some(0), Some(1), Some(1), Some(1), Some(0)],
        &running,
    );
    let mut listener = LayerListener::new(
        keyboard,
        invoker("", InvokeMode::Verbose),
        ListenerConfig {
            verbose: true,
            ..ListenerConfig::default()
        },
    );

    listener.run(&running).unwrap();

    assert_eq!(
        listener.sink().calls,
        vec![
            (Language::En, true),
            (Language::Ru, true),
            (Language::En, true)
        ]
    );
}

/// A failing adapter still counts as dispatched: the same language is not
/// retried on the next report, and the loop keeps reading.
#[test]
fn failed_switch_is_not_retried() {
    let running = AtomicBool::new(true);
    let keyboard = ReplayedKeyboard::new(&[Some(1), Some(1), None, Some(1), Some(0)], &running);
    let mut listener = LayerListener::new(
        keyboard,
        invoker("--fail", InvokeMode::Normal),
        ListenerConfig::default(),
    );

    listener.run(&running).unwrap();

    assert_eq!(
        listener.sink().calls,
        vec![(Language::Ru, false), (Language::En, false)]
    );
    assert_eq!(listener.last_dispatched(), Some(Language::En));
}

#[test]
fn dry_run_loop_never_spawns() {
    let running = AtomicBool::new(true);
    let keyboard = ReplayedKeyboard::new(&[Some(1), Some(0), Some(1)], &running);
    let cmd = AdapterCommand::parse("/nonexistent/switch-input").unwrap();
    let sink = CountingInvoker {
        inner: AdapterInvoker::new(cmd, InvokeMode::DryRun),
        calls: Vec::new(),
    };
    let mut listener = LayerListener::new(keyboard, sink, ListenerConfig::default());

    listener.run(&running).unwrap();

    // Spawning /nonexistent would have failed; every call succeeded as a dry run
    assert_eq!(
        listener.sink().calls,
        vec![
            (Language::Ru, true),
            (Language::En, true),
            (Language::Ru, true)
        ]
    );
}

#[test]
fn slow_adapter_delays_but_does_not_stop_the_loop() {
    let running = AtomicBool::new(true);
    let keyboard = ReplayedKeyboard::new(&[Some(1), Some(0)], &running);
    let mut sink = invoker("--sleep 30", InvokeMode::Normal);
    sink.inner = sink.inner.with_timeout(Duration::from_millis(200));
    let mut listener = LayerListener::new(keyboard, sink, ListenerConfig::default());

    let start = Instant::now();
    listener.run(&running).unwrap();

    assert_eq!(
        listener.sink().calls,
        vec![(Language::Ru, false), (Language::En, false)]
    );
    assert!(start.elapsed() < Duration::from_secs(5));
}
