//! Input source adapter invocation.
//!
//! The adapter is an external executable that performs the OS-specific
//! input source switch. It is called as `<adapter argv...> <lang>` and only
//! its exit status is looked at. Every failure (spawn error, non-zero exit,
//! hang) is turned into an [`AdapterOutcome`] and a diagnostic line; nothing
//! is returned to the caller as an error, so a broken adapter cannot stop the
//! HID read loop.

use std::io::{self, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

use crate::language::Language;

/// Maximum time an adapter call may take before it is killed
pub const ADAPTER_TIMEOUT: Duration = Duration::from_secs(5);

/// Interval between child status checks while waiting
const WAIT_POLL: Duration = Duration::from_millis(10);

/// How invocations are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvokeMode {
    /// Print only failures
    #[default]
    Normal,
    /// Print each call and its success
    Verbose,
    /// Print what would be called, never spawn
    DryRun,
}

impl InvokeMode {
    /// Resolve the CLI flags; dry-run takes precedence over verbose
    pub fn from_flags(dry_run: bool, verbose: bool) -> Self {
        if dry_run {
            InvokeMode::DryRun
        } else if verbose {
            InvokeMode::Verbose
        } else {
            InvokeMode::Normal
        }
    }
}

/// Adapter command line rejected at startup
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AdapterConfigError {
    #[error("adapter command is empty")]
    Empty,

    #[error("cannot split adapter command {0:?} (unbalanced quotes?)")]
    Unparsable(String),
}

/// Tokenised adapter command line, without the language argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterCommand {
    argv: Vec<String>,
}

impl AdapterCommand {
    /// Split a command line shell-style so operators can embed flags,
    /// e.g. `"/usr/local/bin/switch-input --layout-set us"`.
    pub fn parse(cmdline: &str) -> Result<Self, AdapterConfigError> {
        let argv = shlex::split(cmdline)
            .ok_or_else(|| AdapterConfigError::Unparsable(cmdline.to_string()))?;
        if argv.is_empty() {
            return Err(AdapterConfigError::Empty);
        }
        Ok(Self { argv })
    }

    /// Full argv for one call, language token last
    pub fn argv_for(&self, lang: Language) -> Vec<String> {
        let mut argv = self.argv.clone();
        argv.push(lang.code().to_string());
        argv
    }
}

/// Result of one adapter call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterOutcome {
    /// Dry-run: nothing was spawned
    DryRun,
    /// Adapter exited 0
    Success,
    /// Adapter exited with a non-zero code, or was killed by a signal (`code` = None)
    NonZeroExit { code: Option<i32>, status: String },
    /// Adapter did not exit within the timeout and was killed
    Timeout(Duration),
    /// Adapter could not be started
    SpawnFailed(String),
    /// Adapter started but its status could not be collected
    WaitFailed(String),
}

impl AdapterOutcome {
    fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            AdapterOutcome::Success
        } else {
            AdapterOutcome::NonZeroExit {
                code: status.code(),
                status: status.to_string(),
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AdapterOutcome::Success | AdapterOutcome::DryRun)
    }

    /// Line for stderr, if this outcome is a failure
    pub fn diagnostic(&self, cmd: &str) -> Option<String> {
        match self {
            AdapterOutcome::DryRun | AdapterOutcome::Success => None,
            AdapterOutcome::NonZeroExit {
                code: Some(code), ..
            } => Some(format!("[adapter] non-zero exit ({code}) for: {cmd}")),
            AdapterOutcome::NonZeroExit { code: None, status } => {
                Some(format!("[adapter] non-zero exit ({status}) for: {cmd}"))
            }
            AdapterOutcome::Timeout(after) => Some(format!(
                "[adapter] timed out after {}s: {cmd}",
                after.as_secs_f64()
            )),
            AdapterOutcome::SpawnFailed(err) => {
                Some(format!("[adapter] could not execute {cmd}: {err}"))
            }
            AdapterOutcome::WaitFailed(err) => {
                Some(format!("[adapter] could not wait for {cmd}: {err}"))
            }
        }
    }

    /// Line for stdout, depending on the mode
    pub fn status_line(&self, cmd: &str, mode: InvokeMode) -> Option<String> {
        match (self, mode) {
            (AdapterOutcome::DryRun, _) => Some(format!("[dry-run] would call: {cmd}")),
            (AdapterOutcome::Success, InvokeMode::Verbose) => {
                Some("[adapter] ok (exit 0)".to_string())
            }
            _ => None,
        }
    }
}

/// Runs the adapter for each language change
#[derive(Debug, Clone)]
pub struct AdapterInvoker {
    command: AdapterCommand,
    mode: InvokeMode,
    timeout: Duration,
}

impl AdapterInvoker {
    pub fn new(command: AdapterCommand, mode: InvokeMode) -> Self {
        Self {
            command,
            mode,
            timeout: ADAPTER_TIMEOUT,
        }
    }

    /// Override the call timeout (default [`ADAPTER_TIMEOUT`])
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Call the adapter with `lang`, print the result, and return it.
    ///
    /// Blocks for at most the configured timeout (plus the time needed to
    /// reap a killed child).
    pub fn invoke(&self, lang: Language) -> AdapterOutcome {
        self.invoke_to(lang, &mut io::stdout(), &mut io::stderr())
    }

    /// Same as [`invoke`](Self::invoke), with status lines written to `out`
    /// and diagnostics to `err`. At most one diagnostic line is written.
    pub fn invoke_to(
        &self,
        lang: Language,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> AdapterOutcome {
        let argv = self.command.argv_for(lang);
        let cmd = format!("{argv:?}");

        let outcome = if self.mode == InvokeMode::DryRun {
            AdapterOutcome::DryRun
        } else {
            if self.mode == InvokeMode::Verbose {
                let _ = writeln!(out, "[adapter] calling: {cmd}");
            }
            self.execute(&argv)
        };

        if let Some(line) = outcome.status_line(&cmd, self.mode) {
            let _ = writeln!(out, "{line}");
        }
        if let Some(line) = outcome.diagnostic(&cmd) {
            let _ = writeln!(err, "{line}");
        }
        debug!("adapter {} -> {:?}", lang, outcome);
        outcome
    }

    fn execute(&self, argv: &[String]) -> AdapterOutcome {
        let Some((program, args)) = argv.split_first() else {
            return AdapterOutcome::SpawnFailed("empty command".to_string());
        };

        let mut child = match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => return AdapterOutcome::SpawnFailed(e.to_string()),
        };

        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return AdapterOutcome::from_status(status),
                Ok(None) if Instant::now() >= deadline => {
                    warn!("adapter pid {} timed out, killing", child.id());
                    child.kill().ok();
                    child.wait().ok();
                    return AdapterOutcome::Timeout(self.timeout);
                }
                Ok(None) => std::thread::sleep(WAIT_POLL),
                Err(e) => {
                    child.kill().ok();
                    child.wait().ok();
                    return AdapterOutcome::WaitFailed(e.to_string());
                }
            }
        }
    }
}
