//! Synchronous facade for callers without an async runtime.
//!
//! Wraps the async [`crate::Ahk`] client around a private single-threaded
//! tokio runtime. Every blocking call is `block_on` over the async path, so
//! the two facades cannot drift: there is exactly one protocol
//! implementation.
//!
//! The handle-producing operations (window listing and friends) stay on the
//! async client; the window handles they return drive further async calls
//! and have no synchronous twin. Use the raw [`Ahk::function_call`] here
//! for anything without a typed wrapper.

use std::sync::Arc;

use ahk_wire::Payload;
use tokio::runtime::{Builder, Handle, Runtime};

use crate::config::DaemonConfig;
use crate::error::Result;
use crate::transport::FutureResult;

/// Synchronous client over one automation daemon context.
///
/// Cheap to clone; clones share the runtime and the persistent daemon
/// process.
#[derive(Clone, Debug)]
pub struct Ahk {
    runtime: Arc<Runtime>,
    engine: crate::Ahk,
}

impl Ahk {
    /// Build a client configured from the `AHK_PATH` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ExecutableNotFound`] if no executable is
    /// configured, or [`crate::Error::Io`] if the runtime cannot start.
    pub fn new() -> Result<Self> {
        Self::from_engine(crate::Ahk::new()?)
    }

    /// Build a client with an explicit daemon configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the runtime cannot start.
    pub fn with_config(config: DaemonConfig) -> Result<Self> {
        Self::from_engine(crate::Ahk::with_config(config))
    }

    fn from_engine(engine: crate::Ahk) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;
        Ok(Self {
            runtime: Arc::new(runtime),
            engine,
        })
    }

    /// The async client this facade wraps.
    #[must_use]
    pub fn engine(&self) -> &crate::Ahk {
        &self.engine
    }

    /// Invoke a remote function and wait for its decoded response.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub fn function_call(&self, function_name: &str, args: Vec<String>) -> Result<Payload> {
        self.runtime
            .block_on(self.engine.function_call(function_name, args))
    }

    /// Invoke a remote function without waiting, on a disposable daemon
    /// process of its own.
    #[must_use]
    pub fn function_call_nonblocking(
        &self,
        function_name: &str,
        args: Vec<String>,
    ) -> BlockingFutureResult<Payload> {
        // Enter the runtime so the call's driving task lands on it.
        let _guard = self.runtime.enter();
        BlockingFutureResult {
            fut: self.engine.function_call_nonblocking(function_name, args),
            handle: Handle::current(),
        }
    }

    /// Current mouse position.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub fn mouse_get_pos(&self) -> Result<(i32, i32)> {
        self.runtime.block_on(self.engine.mouse_get_pos())
    }

    /// Send keystrokes, interpreting key notation.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub fn send(&self, keys: &str) -> Result<()> {
        self.runtime.block_on(self.engine.send(keys))
    }

    /// Send keystrokes without waiting on the shared daemon.
    #[must_use]
    pub fn send_nonblocking(&self, keys: &str) -> BlockingFutureResult<()> {
        let _guard = self.runtime.enter();
        BlockingFutureResult {
            fut: self.engine.send_nonblocking(keys),
            handle: Handle::current(),
        }
    }

    /// Whether a key is currently down.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub fn key_state(&self, key_name: &str) -> Result<bool> {
        self.runtime.block_on(self.engine.key_state(key_name))
    }

    /// Shut down the persistent daemon process, if it was started.
    pub fn close(&self) {
        self.runtime.block_on(self.engine.close());
    }
}

/// Synchronous handle to the eventual result of a non-blocking call.
#[derive(Debug)]
pub struct BlockingFutureResult<T> {
    fut: FutureResult<T>,
    handle: Handle,
}

impl<T: Send + 'static> BlockingFutureResult<T> {
    /// Block until the call completes and return its result.
    ///
    /// # Errors
    ///
    /// Propagates the exchange's own error, or [`crate::Error::TaskFailed`]
    /// if the driving task panicked or was cancelled.
    pub fn result(self) -> Result<T> {
        let Self { fut, handle } = self;
        handle.block_on(fut.result())
    }

    /// Whether the underlying call has completed (successfully or not).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.fut.is_finished()
    }
}
