//! Error types for the client crate.

use ahk_wire::WireError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The daemon executable could not be located. Set the path explicitly
    /// or via the `AHK_PATH` environment variable.
    #[error("automation executable not found: {0}")]
    ExecutableNotFound(String),

    /// The daemon process could not be spawned.
    #[error("failed to spawn {path}: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Pipe I/O failed mid-exchange.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The daemon closed its end of the pipe. The client is unusable for
    /// further blocking calls until re-initialized.
    #[error("daemon closed the pipe")]
    Disconnected,

    /// The response could not be decoded.
    #[error(transparent)]
    Wire(WireError),

    /// The remote reported a failure executing the requested function.
    /// This is an application-level error, not a transport failure.
    #[error("remote execution failed: {0}")]
    Remote(String),

    /// The response decoded fine but its kind does not match what the
    /// function contract promises.
    #[error("unexpected {got} response to {function}")]
    UnexpectedResponse {
        function: String,
        got: &'static str,
    },

    /// The task driving a non-blocking call panicked or was cancelled.
    #[error("non-blocking call task failed: {0}")]
    TaskFailed(String),
}

impl From<WireError> for Error {
    fn from(e: WireError) -> Self {
        // A remote-reported exception is an application failure; everything
        // else is a protocol failure.
        match e {
            WireError::Remote(msg) => Error::Remote(msg),
            other => Error::Wire(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
