//! Daemon launch configuration.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable that overrides the automation executable path.
pub const AHK_PATH_ENV: &str = "AHK_PATH";

/// Default file name of the bootstrap script, resolved next to the
/// executable when no explicit script path is given.
pub const DAEMON_SCRIPT_NAME: &str = "daemon.ahk";

/// Where and how to launch the automation daemon.
///
/// The daemon is always started as
/// `<executable> /CP65001 /ErrorStdOut <script>`: UTF-8 code page, errors
/// routed to stdout, and the fixed bootstrap script that runs the command
/// loop. Communication happens exclusively over stdin/stdout; stderr is
/// diagnostic-only.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    executable_path: PathBuf,
    daemon_script: PathBuf,
}

impl DaemonConfig {
    /// Configuration for an explicit executable, with the bootstrap script
    /// expected beside it.
    #[must_use]
    pub fn new(executable_path: impl Into<PathBuf>) -> Self {
        let executable_path = executable_path.into();
        let daemon_script = executable_path
            .parent()
            .map_or_else(|| PathBuf::from(DAEMON_SCRIPT_NAME), Path::to_path_buf)
            .join(DAEMON_SCRIPT_NAME);
        Self {
            executable_path,
            daemon_script,
        }
    }

    /// Configuration from the `AHK_PATH` environment variable.
    ///
    /// Executable discovery beyond this override is deliberately not
    /// implemented; embedding applications know where their engine lives.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExecutableNotFound`] if the variable is unset or
    /// empty.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(AHK_PATH_ENV) {
            Some(path) if !path.is_empty() => Ok(Self::new(PathBuf::from(path))),
            _ => Err(Error::ExecutableNotFound(format!(
                "set the {AHK_PATH_ENV} environment variable or configure an explicit path"
            ))),
        }
    }

    /// Use a specific bootstrap script instead of the one beside the
    /// executable.
    #[must_use]
    pub fn with_daemon_script(mut self, script: impl Into<PathBuf>) -> Self {
        self.daemon_script = script.into();
        self
    }

    #[must_use]
    pub fn executable_path(&self) -> &Path {
        &self.executable_path
    }

    #[must_use]
    pub fn daemon_script(&self) -> &Path {
        &self.daemon_script
    }

    /// Arguments passed to the executable at spawn time.
    pub(crate) fn launch_args(&self) -> Vec<OsString> {
        vec![
            OsString::from("/CP65001"),
            OsString::from("/ErrorStdOut"),
            self.daemon_script.clone().into_os_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_defaults_beside_executable() {
        let config = DaemonConfig::new("/opt/ahk/AutoHotkey.exe");
        assert_eq!(
            config.daemon_script(),
            Path::new("/opt/ahk/daemon.ahk")
        );
    }

    #[test]
    fn test_explicit_script_override() {
        let config = DaemonConfig::new("/opt/ahk/AutoHotkey.exe")
            .with_daemon_script("/srv/scripts/custom.ahk");
        assert_eq!(config.daemon_script(), Path::new("/srv/scripts/custom.ahk"));
    }

    #[test]
    fn test_launch_args_shape() {
        let config = DaemonConfig::new("/opt/ahk/AutoHotkey.exe");
        let args = config.launch_args();
        assert_eq!(args[0], "/CP65001");
        assert_eq!(args[1], "/ErrorStdOut");
        assert_eq!(args[2], "/opt/ahk/daemon.ahk");
    }
}
