//! Ownership of one spawned daemon process and its pipes.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, warn};

use crate::config::DaemonConfig;
use crate::error::{Error, Result};

/// A running daemon process with exclusive ownership of its stdin/stdout.
///
/// State machine: spawned by [`DaemonProcess::spawn`], then either killed
/// explicitly via [`DaemonProcess::kill`] or reaped on drop (the child is
/// spawned with `kill_on_drop`, so an abandoned handle cannot leak the OS
/// process past this one's shutdown).
#[derive(Debug)]
pub struct DaemonProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl DaemonProcess {
    /// Spawn the daemon with all three stdio streams piped.
    ///
    /// stderr is not part of the protocol; a background task drains it into
    /// the log so daemon-side diagnostics are not lost.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if the executable is missing or not
    /// invocable.
    pub fn spawn(config: &DaemonConfig) -> Result<Self> {
        let path = config.executable_path();
        let mut child = Command::new(path)
            .args(config.launch_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::Spawn {
                path: path.display().to_string(),
                source,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Io(std::io::Error::other("failed to get stdin handle")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Io(std::io::Error::other("failed to get stdout handle")))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::Io(std::io::Error::other("failed to get stderr handle")))?;

        tokio::spawn(async move {
            let reader = BufReader::new(stderr);
            let mut lines = reader.lines();
            while let Ok(Some(line)) = lines.next_line().await {
                warn!("[daemon] stderr: {}", line);
            }
        });

        debug!("spawned daemon process from {}", path.display());

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    /// Write bytes to the daemon's stdin. Does not flush.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the pipe write fails.
    pub async fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.stdin.write_all(bytes).await?;
        Ok(())
    }

    /// Flush buffered stdin bytes through to the OS pipe. The daemon blocks
    /// reading a full line, so every request write must be followed by one
    /// explicit flush.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the flush fails.
    pub async fn flush(&mut self) -> Result<()> {
        self.stdin.flush().await?;
        Ok(())
    }

    /// Read one line from the daemon's stdout, including the trailing `\n`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disconnected`] on EOF (the daemon died or closed
    /// its pipe mid-conversation) and [`Error::Io`] on read failure. Both
    /// are surfaced, never swallowed.
    pub async fn read_line(&mut self) -> Result<Vec<u8>> {
        let mut line = Vec::new();
        let n = self.stdout.read_until(b'\n', &mut line).await?;
        if n == 0 {
            return Err(Error::Disconnected);
        }
        Ok(line)
    }

    /// Best-effort forceful termination. Runs in cleanup context, so any
    /// failure is logged and ignored rather than masking the primary error.
    pub async fn kill(&mut self) {
        if let Err(e) = self.child.kill().await {
            debug!("failed to kill daemon process: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spawn_missing_executable_is_spawn_error() {
        let config = DaemonConfig::new("/nonexistent/definitely-not-here.exe");
        let err = DaemonProcess::spawn(&config).unwrap_err();
        match err {
            Error::Spawn { path, .. } => assert!(path.contains("definitely-not-here")),
            other => panic!("expected Spawn, got {other:?}"),
        }
    }
}
