//! The client facade.
//!
//! [`Ahk`] owns the transport and exposes the generic "call a named remote
//! function with string arguments" primitive every higher-level operation is
//! built on, plus a representative set of typed wrappers. The full daemon
//! command surface is hundreds of such wrappers; each is one argument list
//! and one payload conversion away from [`Ahk::function_call`].

use std::sync::Arc;

use ahk_wire::{Payload, Position, Request};
use tokio::sync::Mutex;
use tracing::debug;

use crate::catalog;
use crate::config::DaemonConfig;
use crate::error::{Error, Result};
use crate::transport::{DaemonTransport, FutureResult, send_nonblocking};
use crate::window::Window;

/// Handle to one automation daemon context.
///
/// Cheap to clone; clones share the same persistent daemon process. All
/// blocking calls on one `Ahk` serialize FIFO through that process's pipe.
/// Non-blocking calls each spawn their own disposable daemon and run
/// independently.
#[derive(Clone)]
pub struct Ahk {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Mutex<DaemonTransport>,
    config: Arc<DaemonConfig>,
}

impl Ahk {
    /// Build a client configured from the `AHK_PATH` environment variable.
    ///
    /// The daemon process itself is not started until the first blocking
    /// call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExecutableNotFound`] if no executable is configured.
    pub fn new() -> Result<Self> {
        Ok(Self::with_config(DaemonConfig::from_env()?))
    }

    /// Build a client with an explicit daemon configuration.
    #[must_use]
    pub fn with_config(config: DaemonConfig) -> Self {
        let transport = DaemonTransport::new(config);
        let config = transport.config();
        Self {
            inner: Arc::new(Inner {
                transport: Mutex::new(transport),
                config,
            }),
        }
    }

    /// Invoke a remote function and wait for its decoded response.
    ///
    /// This is the blocking strategy: the exchange runs over the shared
    /// persistent daemon process, started lazily on the first call.
    ///
    /// # Errors
    ///
    /// Transport and decode errors propagate directly; a remote-reported
    /// failure surfaces as [`Error::Remote`].
    pub async fn function_call(
        &self,
        function_name: &str,
        args: Vec<String>,
    ) -> Result<Payload> {
        let request = Request::new(function_name, args);
        let mut transport = self.inner.transport.lock().await;
        if !transport.is_started() {
            transport.init()?;
        }
        let payload = transport.send(&request).await?;
        if let Some(expected) = catalog::expected_kind(function_name) {
            if payload.kind() != expected {
                // Advisory only: some operations legitimately answer with
                // no-value when nothing matched.
                debug!(
                    "{} answered with {} payload, catalog expects {}",
                    function_name,
                    payload.kind().name(),
                    expected.name()
                );
            }
        }
        Ok(payload)
    }

    /// Invoke a remote function without waiting, on a disposable daemon
    /// process of its own.
    ///
    /// The returned handle resolves to the decoded response; errors surface
    /// when the caller awaits it. Concurrent non-blocking calls do not
    /// contend with each other or with blocking calls.
    #[must_use]
    pub fn function_call_nonblocking(
        &self,
        function_name: &str,
        args: Vec<String>,
    ) -> FutureResult<Payload> {
        send_nonblocking(
            self.inner.config.clone(),
            Request::new(function_name, args),
        )
    }

    /// Shut down the persistent daemon process, if it was started.
    ///
    /// Blocking calls after this will fail; build a fresh client to
    /// reconnect.
    pub async fn close(&self) {
        self.inner.transport.lock().await.close().await;
    }

    // Screen ---------------------------------------------------------------

    /// Current mouse position.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn mouse_get_pos(&self) -> Result<(i32, i32)> {
        let payload = self.function_call("MouseGetPos", vec![]).await?;
        expect_coordinate("MouseGetPos", payload)
    }

    /// Color of the pixel at screen coordinates, as the daemon reports it.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn pixel_get_color(&self, x: i32, y: i32) -> Result<String> {
        let payload = self
            .function_call("PixelGetColor", vec![x.to_string(), y.to_string()])
            .await?;
        expect_string("PixelGetColor", payload)
    }

    /// Search a screen region for a pixel of `color`.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn pixel_search(
        &self,
        color: &str,
        upper_left: (i32, i32),
        lower_right: (i32, i32),
    ) -> Result<(i32, i32)> {
        let args = vec![
            upper_left.0.to_string(),
            upper_left.1.to_string(),
            lower_right.0.to_string(),
            lower_right.1.to_string(),
            color.to_string(),
        ];
        let payload = self.function_call("PixelSearch", args).await?;
        expect_coordinate("PixelSearch", payload)
    }

    /// Search a screen region for an image file; `None` when not found.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn image_search(
        &self,
        image_path: &str,
        upper_left: (i32, i32),
        lower_right: (i32, i32),
    ) -> Result<Option<(i32, i32)>> {
        let args = vec![
            upper_left.0.to_string(),
            upper_left.1.to_string(),
            lower_right.0.to_string(),
            lower_right.1.to_string(),
            image_path.to_string(),
        ];
        match self.function_call("ImageSearch", args).await? {
            Payload::NoValue => Ok(None),
            Payload::Tuple(items) => {
                let ints: Vec<i64> = items.iter().filter_map(ahk_wire::Literal::as_int).collect();
                match ints[..] {
                    [x, y] => Ok(Some((coord(x)?, coord(y)?))),
                    _ => Err(Error::UnexpectedResponse {
                        function: "ImageSearch".to_string(),
                        got: "tuple",
                    }),
                }
            }
            other => Err(unexpected("ImageSearch", &other)),
        }
    }

    // Mouse ----------------------------------------------------------------

    /// Move the mouse to absolute or relative coordinates.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn mouse_move(&self, x: i32, y: i32, speed: u8, relative: bool) -> Result<()> {
        let args = vec![
            x.to_string(),
            y.to_string(),
            speed.to_string(),
            if relative { "R".to_string() } else { String::new() },
        ];
        let payload = self.function_call("MouseMove", args).await?;
        expect_unit("MouseMove", payload)
    }

    /// Click at screen coordinates.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn click(&self, x: i32, y: i32) -> Result<()> {
        let payload = self
            .function_call("Click", vec![x.to_string(), y.to_string()])
            .await?;
        expect_unit("Click", payload)
    }

    /// Drag the mouse from one point to another with a button held.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn mouse_click_drag(
        &self,
        button: &str,
        from: (i32, i32),
        to: (i32, i32),
    ) -> Result<()> {
        let args = vec![
            button.to_string(),
            from.0.to_string(),
            from.1.to_string(),
            to.0.to_string(),
            to.1.to_string(),
        ];
        let payload = self.function_call("MouseClickDrag", args).await?;
        expect_unit("MouseClickDrag", payload)
    }

    /// Set the coordinate mode for a target subsystem (`Mouse`, `Pixel`, ...).
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn coord_mode(&self, target: &str, relative_to: &str) -> Result<()> {
        let payload = self
            .function_call(
                "CoordMode",
                vec![target.to_string(), relative_to.to_string()],
            )
            .await?;
        expect_unit("CoordMode", payload)
    }

    // Keyboard -------------------------------------------------------------

    /// Send keystrokes, interpreting key notation.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn send(&self, keys: &str) -> Result<()> {
        let payload = self.function_call("Send", vec![keys.to_string()]).await?;
        expect_unit("Send", payload)
    }

    /// Send keystrokes without waiting on the shared daemon; each call runs
    /// on its own disposable process.
    #[must_use]
    pub fn send_nonblocking(&self, keys: &str) -> FutureResult<()> {
        let fut = self.function_call_nonblocking("Send", vec![keys.to_string()]);
        FutureResult::spawn(async move { expect_unit("Send", fut.result().await?) })
    }

    /// Send keystrokes literally, without key-notation interpretation.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn send_raw(&self, keys: &str) -> Result<()> {
        let payload = self
            .function_call("SendRaw", vec![keys.to_string()])
            .await?;
        expect_unit("SendRaw", payload)
    }

    /// Send keystrokes via the input buffer.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn send_input(&self, keys: &str) -> Result<()> {
        let payload = self
            .function_call("SendInput", vec![keys.to_string()])
            .await?;
        expect_unit("SendInput", payload)
    }

    /// Set the delay between sent keystrokes, in milliseconds.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn set_key_delay(&self, delay_ms: i32) -> Result<()> {
        let payload = self
            .function_call("SetKeyDelay", vec![delay_ms.to_string()])
            .await?;
        expect_unit("SetKeyDelay", payload)
    }

    /// Whether a key is currently down.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn key_state(&self, key_name: &str) -> Result<bool> {
        let payload = self
            .function_call("AHKKeyState", vec![key_name.to_string()])
            .await?;
        expect_boolean("AHKKeyState", payload)
    }

    /// Wait for a key to be pressed or released. The timeout travels as a
    /// protocol argument; there is no transport-level timeout. Returns the
    /// daemon's wait outcome (0 on timeout, 1 otherwise).
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn key_wait(&self, key_name: &str, timeout_seconds: Option<f64>) -> Result<i64> {
        let options = timeout_seconds.map_or_else(String::new, |t| format!("T{t}"));
        let payload = self
            .function_call("KeyWait", vec![key_name.to_string(), options])
            .await?;
        expect_integer("KeyWait", payload)
    }

    /// Force the caps-lock state (`On`, `Off`, `AlwaysOn`, `AlwaysOff`).
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn set_caps_lock_state(&self, state: &str) -> Result<()> {
        let payload = self
            .function_call("SetCapsLockState", vec![state.to_string()])
            .await?;
        expect_unit("SetCapsLockState", payload)
    }

    // Windows --------------------------------------------------------------

    /// All windows the daemon can see, as handles bound to this client.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn list_windows(&self) -> Result<Vec<Window>> {
        let payload = self.function_call("WindowList", vec![]).await?;
        match payload {
            Payload::WindowList(ids) => Ok(ids
                .into_iter()
                .map(|id| Window::new(self.clone(), id))
                .collect()),
            other => Err(unexpected("WindowList", &other)),
        }
    }

    /// The window currently under the mouse, if any.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn win_from_mouse(&self) -> Result<Option<Window>> {
        let payload = self.function_call("FromMouse", vec![]).await?;
        match payload {
            Payload::String(id) | Payload::Window(id) => {
                let id = id.trim().to_string();
                if id.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Window::new(self.clone(), id)))
                }
            }
            Payload::NoValue => Ok(None),
            other => Err(unexpected("FromMouse", &other)),
        }
    }

    /// The active window, if one exists.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn get_active_window(&self) -> Result<Option<Window>> {
        let payload = self
            .function_call("AHKWinGetID", vec!["A".to_string()])
            .await?;
        match payload {
            Payload::Window(id) if !id.is_empty() => Ok(Some(Window::new(self.clone(), id))),
            Payload::Window(_) | Payload::NoValue => Ok(None),
            other => Err(unexpected("AHKWinGetID", &other)),
        }
    }
}

impl std::fmt::Debug for Ahk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ahk")
            .field("executable", &self.inner.config.executable_path())
            .finish_non_exhaustive()
    }
}

fn unexpected(function: &str, payload: &Payload) -> Error {
    Error::UnexpectedResponse {
        function: function.to_string(),
        got: payload.kind().name(),
    }
}

fn coord(n: i64) -> Result<i32> {
    i32::try_from(n).map_err(|_| {
        Error::Wire(ahk_wire::WireError::Framing(format!(
            "coordinate {n} out of range"
        )))
    })
}

pub(crate) fn expect_unit(function: &str, payload: Payload) -> Result<()> {
    match payload {
        Payload::NoValue => Ok(()),
        other => Err(unexpected(function, &other)),
    }
}

pub(crate) fn expect_coordinate(function: &str, payload: Payload) -> Result<(i32, i32)> {
    match payload {
        Payload::Coordinate(x, y) => Ok((x, y)),
        other => Err(unexpected(function, &other)),
    }
}

pub(crate) fn expect_integer(function: &str, payload: Payload) -> Result<i64> {
    match payload {
        Payload::Integer(n) => Ok(n),
        other => Err(unexpected(function, &other)),
    }
}

pub(crate) fn expect_boolean(function: &str, payload: Payload) -> Result<bool> {
    match payload {
        Payload::Boolean(b) => Ok(b),
        other => Err(unexpected(function, &other)),
    }
}

pub(crate) fn expect_string(function: &str, payload: Payload) -> Result<String> {
    match payload {
        Payload::String(s) => Ok(s),
        other => Err(unexpected(function, &other)),
    }
}

pub(crate) fn expect_position(function: &str, payload: Payload) -> Result<Position> {
    match payload {
        Payload::Position(pos) => Ok(pos),
        other => Err(unexpected(function, &other)),
    }
}
