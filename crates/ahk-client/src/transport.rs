//! Request/response exchange over daemon processes.
//!
//! Two call strategies share one exchange routine:
//!
//! - **Blocking**: one persistent [`DaemonProcess`] is started lazily on
//!   first use and reused for every call. The daemon's command loop is
//!   single-threaded and FIFO, so the pipe is an exclusive channel: exactly
//!   one exchange may be in flight, which `&mut self` enforces here and the
//!   facade's mutex enforces across tasks.
//! - **Non-blocking**: each call spawns a brand-new daemon process, runs
//!   the identical exchange inside a task, and unconditionally kills that
//!   process before the task resolves. Ephemeral calls never queue behind
//!   the persistent channel, at the cost of daemon startup latency per
//!   call.
//!
//! There is no auto-reconnect, no retry, and no transport-level timeout. A
//! failed exchange on the persistent process leaves this transport unusable
//! until the embedding application builds a fresh one.

use std::sync::Arc;

use ahk_wire::{Payload, Request, Tag, parse_count};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::DaemonConfig;
use crate::error::{Error, Result};
use crate::process::DaemonProcess;

/// Transport driving the persistent daemon process.
pub struct DaemonTransport {
    config: Arc<DaemonConfig>,
    proc: Option<DaemonProcess>,
    closed: bool,
}

impl DaemonTransport {
    #[must_use]
    pub fn new(config: DaemonConfig) -> Self {
        Self {
            config: Arc::new(config),
            proc: None,
            closed: false,
        }
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.proc.is_some()
    }

    /// Whether [`DaemonTransport::close`] has been called. A closed
    /// transport never re-enters the ready state.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[must_use]
    pub(crate) fn config(&self) -> Arc<DaemonConfig> {
        self.config.clone()
    }

    /// Start the persistent daemon process.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if the daemon cannot be started.
    ///
    /// # Panics
    ///
    /// Panics if called twice; the ready state is entered at most once and
    /// re-entry is a programming error in the caller.
    pub fn init(&mut self) -> Result<()> {
        assert!(self.proc.is_none(), "cannot start the daemon process twice");
        if self.closed {
            return Err(Error::Disconnected);
        }
        self.proc = Some(DaemonProcess::spawn(&self.config)?);
        Ok(())
    }

    /// Perform one blocking exchange over the persistent process.
    ///
    /// # Errors
    ///
    /// - [`Error::Disconnected`] if the daemon died mid-conversation
    /// - [`Error::Wire`] on a malformed envelope or unknown tag
    /// - [`Error::Remote`] if the daemon reported an execution failure
    ///
    /// # Panics
    ///
    /// Panics if the transport was never initialized.
    pub async fn send(&mut self, request: &Request) -> Result<Payload> {
        let proc = self
            .proc
            .as_mut()
            .expect("transport must be initialized before sending");
        exchange(proc, request).await
    }

    /// Perform one exchange on a dedicated ephemeral process, returning a
    /// handle to the eventual result.
    ///
    /// The spawned process is killed on every exit path, including decode
    /// failures. Dropping the returned [`FutureResult`] detaches the task;
    /// the exchange keeps running and the process is still reaped once it
    /// finishes.
    #[must_use]
    pub fn send_nonblocking(&self, request: Request) -> FutureResult<Payload> {
        send_nonblocking(self.config.clone(), request)
    }

    /// Tear down the persistent process, if any. Best-effort; after this
    /// blocking calls on this transport fail with
    /// [`Error::Disconnected`] rather than respawning the daemon.
    pub async fn close(&mut self) {
        self.closed = true;
        if let Some(mut proc) = self.proc.take() {
            proc.kill().await;
        }
    }
}

/// Spawn an ephemeral daemon for exactly one request.
pub(crate) fn send_nonblocking(
    config: Arc<DaemonConfig>,
    request: Request,
) -> FutureResult<Payload> {
    let handle = tokio::spawn(async move {
        debug!(
            "spawning ephemeral daemon for {}",
            request.function_name()
        );
        let mut proc = DaemonProcess::spawn(&config)?;
        let result = exchange(&mut proc, &request).await;
        // Unconditional reap so a failed exchange cannot leak the process.
        proc.kill().await;
        result
    });
    FutureResult { handle }
}

/// The exchange algorithm shared by both call strategies: encode, write,
/// flush, then read the self-describing response envelope and decode it.
async fn exchange(proc: &mut DaemonProcess, request: &Request) -> Result<Payload> {
    proc.write(&request.encode()).await?;
    proc.flush().await?;

    let tag_line = proc.read_line().await?;
    let tag = Tag::parse(&tag_line)?;
    let count_line = proc.read_line().await?;
    let count = parse_count(&count_line)?;

    // The payload spans count + 1 lines; their concatenation carries one
    // synthetic trailing newline baked in by the writer side.
    let mut body = Vec::new();
    for _ in 0..=count {
        body.extend_from_slice(&proc.read_line().await?);
    }
    body.pop();

    Ok(Payload::decode(tag, &body)?)
}

/// Handle to the eventual result of a non-blocking call.
///
/// Errors from the exchange propagate through here and surface only when
/// the caller awaits [`FutureResult::result`].
#[derive(Debug)]
pub struct FutureResult<T> {
    handle: JoinHandle<Result<T>>,
}

impl<T: Send + 'static> FutureResult<T> {
    /// Wrap a future that performs the call, so typed wrappers can layer a
    /// payload conversion on top of a raw non-blocking exchange.
    pub(crate) fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }

    /// Wait for the call to complete and return its result.
    ///
    /// # Errors
    ///
    /// Returns the exchange's own error, or [`Error::TaskFailed`] if the
    /// driving task panicked or was cancelled.
    pub async fn result(self) -> Result<T> {
        self.handle
            .await
            .map_err(|e| Error::TaskFailed(e.to_string()))?
    }

    /// Whether the underlying call has completed (successfully or not).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
