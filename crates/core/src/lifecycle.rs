//! Application lifecycle controller
//!
//! Owns a single child server process per instance and exposes start/stop
//! with deterministic readiness detection and clean teardown.
//!
//! State machine: `Idle -> Starting -> Running -> Stopping -> Idle`, plus a
//! `Failed` state reachable from `Starting` when readiness is never
//! observed. Invariants:
//!
//! - at most one child process is alive per controller instance; a second
//!   `start` while one is alive fails fast instead of spawning
//! - `start` returns only after a connection probe has succeeded, never
//!   before, and a failed start leaves no process behind
//! - `stop` returns only after the OS process has actually exited
//! - `stop` from `Idle` is a no-op
//!
//! Readiness is detected by actively probing the expected TCP port with
//! jittered backoff rather than scanning the child's output for a
//! listening marker or sleeping a fixed allowance; probing observes the
//! condition callers actually depend on (the socket accepts) and is not
//! tied to the application's log format. Child output is still accumulated
//! for diagnostics.

use crate::errors::LifecycleError;
use crate::retry::RetryConfig;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tracing::{debug, info, instrument, warn};

/// Per-probe connection attempt timeout.
const PROBE_CONNECT_TIMEOUT: Duration = Duration::from_millis(250);

/// Lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Idle,
    Starting,
    Running,
    Stopping,
    Failed,
}

impl AppState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppState::Idle => "idle",
            AppState::Starting => "starting",
            AppState::Running => "running",
            AppState::Stopping => "stopping",
            AppState::Failed => "failed",
        }
    }
}

/// Options controlling how the application is started and probed
#[derive(Debug, Clone)]
pub struct StartOptions {
    /// Program to spawn (defaults to `npm`)
    pub program: String,
    /// Arguments (defaults to `start`)
    pub args: Vec<String>,
    /// Port the application is expected to bind; exported as `PORT`
    pub port: u16,
    /// Additional environment variables layered over the inherited ones
    pub env: Vec<(String, String)>,
    /// Bound on the total wait for readiness
    pub readiness_timeout: Duration,
    /// Backoff configuration for connection probes
    pub probe_backoff: RetryConfig,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self {
            program: "npm".to_string(),
            args: vec!["start".to_string()],
            port: 3000,
            env: Vec::new(),
            readiness_timeout: Duration::from_secs(10),
            probe_backoff: RetryConfig::default(),
        }
    }
}

impl StartOptions {
    /// Options for the default start command on a specific port
    pub fn on_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }
}

/// Controller for one application process
///
/// The child process handle and its streams are exclusively owned by this
/// instance. The controller does not report the bound port; callers
/// configure it through [`StartOptions`] and know it.
#[derive(Debug)]
pub struct AppLifecycle {
    dir: PathBuf,
    state: AppState,
    child: Option<Child>,
    output: Arc<Mutex<String>>,
}

impl AppLifecycle {
    /// Create a controller for the application in `dir`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            state: AppState::Idle,
            child: None,
            output: Arc::new(Mutex::new(String::new())),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> AppState {
        self.state
    }

    /// Output accumulated from the child's stdout and stderr so far
    pub fn captured_output(&self) -> String {
        self.output.lock().map(|o| o.clone()).unwrap_or_default()
    }

    /// Start the application and wait until it accepts connections
    ///
    /// Fails fast with `InvalidState` unless the controller is `Idle`.
    /// On readiness timeout or early child exit the process tree is
    /// terminated before the error is returned, so callers never observe
    /// a leaked process.
    #[instrument(skip(self, opts), fields(dir = %self.dir.display(), port = opts.port))]
    pub async fn start(&mut self, opts: &StartOptions) -> Result<(), LifecycleError> {
        if self.state != AppState::Idle {
            return Err(LifecycleError::InvalidState {
                operation: "start".to_string(),
                state: self.state.as_str().to_string(),
            });
        }
        self.state = AppState::Starting;

        let mut command = Command::new(&opts.program);
        command
            .args(&opts.args)
            .current_dir(&self.dir)
            .env("PORT", opts.port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (key, value) in &opts.env {
            command.env(key, value);
        }
        // Own process group so teardown can signal the whole tree (npm
        // forks the actual server process).
        #[cfg(unix)]
        command.process_group(0);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(source) => {
                self.state = AppState::Idle;
                return Err(LifecycleError::Spawn(source));
            }
        };

        if let Some(stdout) = child.stdout.take() {
            accumulate(stdout, Arc::clone(&self.output));
        }
        if let Some(stderr) = child.stderr.take() {
            accumulate(stderr, Arc::clone(&self.output));
        }

        debug!("Spawned application process, probing port {}", opts.port);
        let deadline = Instant::now() + opts.readiness_timeout;
        let mut attempt: u32 = 0;

        loop {
            // A child that died before binding will never become ready
            match child.try_wait() {
                Ok(Some(status)) => {
                    self.state = AppState::Failed;
                    self.child = None;
                    let code = status.code().unwrap_or(-1);
                    warn!(
                        "Application exited with code {} before readiness; output:\n{}",
                        code,
                        self.captured_output()
                    );
                    return Err(LifecycleError::EarlyExit { code });
                }
                Ok(None) => {}
                Err(source) => {
                    self.child = Some(child);
                    self.fail_and_cleanup().await;
                    return Err(LifecycleError::Termination {
                        message: format!("Failed to poll application process: {source}"),
                    });
                }
            }

            let probe = tokio::time::timeout(
                PROBE_CONNECT_TIMEOUT,
                TcpStream::connect(("127.0.0.1", opts.port)),
            )
            .await;
            if let Ok(Ok(_stream)) = probe {
                info!("Application ready on port {}", opts.port);
                self.child = Some(child);
                self.state = AppState::Running;
                return Ok(());
            }

            if Instant::now() >= deadline {
                self.child = Some(child);
                self.fail_and_cleanup().await;
                warn!(
                    "Readiness timeout on port {}; output:\n{}",
                    opts.port,
                    self.captured_output()
                );
                return Err(LifecycleError::ReadinessTimeout {
                    port: opts.port,
                    timeout_secs: opts.readiness_timeout.as_secs(),
                });
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            let delay = opts.probe_backoff.calculate_delay(attempt).min(remaining);
            tokio::time::sleep(delay).await;
            attempt = attempt.saturating_add(1);
        }
    }

    /// Stop the application and wait for the process to exit
    ///
    /// Graceful termination first, escalating to a forceful kill if the
    /// process outlives `grace`. Calling `stop` when already `Idle`
    /// succeeds immediately.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub async fn stop(&mut self, grace: Duration) -> Result<(), LifecycleError> {
        match self.state {
            AppState::Idle => return Ok(()),
            AppState::Running | AppState::Failed => {}
            AppState::Starting | AppState::Stopping => {
                return Err(LifecycleError::InvalidState {
                    operation: "stop".to_string(),
                    state: self.state.as_str().to_string(),
                });
            }
        }
        self.state = AppState::Stopping;

        if let Some(mut child) = self.child.take() {
            terminate_gracefully(&mut child).await;

            let exited = tokio::time::timeout(grace, child.wait()).await;
            match exited {
                Ok(Ok(status)) => {
                    debug!("Application exited with status {:?}", status.code());
                }
                Ok(Err(source)) => {
                    self.state = AppState::Idle;
                    return Err(LifecycleError::Termination {
                        message: format!("Failed to wait for application exit: {source}"),
                    });
                }
                Err(_elapsed) => {
                    warn!("Application did not exit within grace period, killing");
                    kill_forcefully(&mut child).await;
                    child.wait().await.map_err(|source| {
                        self.state = AppState::Idle;
                        LifecycleError::Termination {
                            message: format!("Failed to reap killed application: {source}"),
                        }
                    })?;
                }
            }
        }

        self.state = AppState::Idle;
        Ok(())
    }

    /// Best-effort cleanup after a failed start: kill the process tree and
    /// reap it, then park in `Failed`.
    async fn fail_and_cleanup(&mut self) {
        if let Some(mut child) = self.child.take() {
            kill_forcefully(&mut child).await;
            if let Err(source) = child.wait().await {
                warn!("Failed to reap application after failed start: {}", source);
            }
        }
        self.state = AppState::Failed;
    }
}

/// Spawn readers that append the child's output lines to the shared buffer
fn accumulate(stream: impl AsyncRead + Unpin + Send + 'static, sink: Arc<Mutex<String>>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            debug!("app: {}", line);
            if let Ok(mut buffer) = sink.lock() {
                buffer.push_str(&line);
                buffer.push('\n');
            }
        }
    });
}

/// Send a graceful termination signal to the child's process group
#[cfg(unix)]
async fn terminate_gracefully(child: &mut Child) {
    if let Some(pid) = child.id() {
        // The child leads its own process group (process_group(0) at
        // spawn), so signalling -pid reaches npm and the node server.
        signal_group(pid, "TERM").await;
    } else {
        start_kill_logged(child);
    }
}

#[cfg(not(unix))]
async fn terminate_gracefully(child: &mut Child) {
    start_kill_logged(child);
}

/// Forcefully kill the child (and its group on unix)
#[cfg(unix)]
async fn kill_forcefully(child: &mut Child) {
    if let Some(pid) = child.id() {
        signal_group(pid, "KILL").await;
    }
    start_kill_logged(child);
}

#[cfg(not(unix))]
async fn kill_forcefully(child: &mut Child) {
    start_kill_logged(child);
}

#[cfg(unix)]
async fn signal_group(pid: u32, signal: &str) {
    let status = Command::new("kill")
        .arg(format!("-{signal}"))
        .arg(format!("-{pid}"))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    if let Err(source) = status {
        warn!("Failed to signal process group {}: {}", pid, source);
    }
}

fn start_kill_logged(child: &mut Child) {
    if let Err(source) = child.start_kill() {
        warn!("Failed to kill application process: {}", source);
    }
}
