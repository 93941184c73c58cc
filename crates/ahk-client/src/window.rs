//! Window and control handles.
//!
//! A handle is a client-side reference: a decoded id bound to the [`Ahk`]
//! instance that produced it, so further operations run against the same
//! automation context. Handles hold no OS resources; a window can vanish
//! between the call that produced the handle and the next call through it,
//! in which case the daemon reports the failure for that call.

use ahk_wire::{Payload, Position};

use crate::engine::{
    Ahk, expect_boolean, expect_position, expect_string, expect_unit,
};
use crate::error::{Error, Result};

/// A window, identified by the daemon's window id.
#[derive(Clone)]
pub struct Window {
    engine: Ahk,
    ahk_id: String,
}

impl Window {
    pub(crate) fn new(engine: Ahk, ahk_id: String) -> Self {
        Self { engine, ahk_id }
    }

    /// The daemon's id for this window.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.ahk_id
    }

    /// The title-matching argument addressing exactly this window.
    fn title_arg(&self) -> String {
        format!("ahk_id {}", self.ahk_id)
    }

    async fn call(&self, function_name: &str, mut extra: Vec<String>) -> Result<Payload> {
        let mut args = vec![self.title_arg()];
        args.append(&mut extra);
        self.engine.function_call(function_name, args).await
    }

    /// Whether the window still exists.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn exists(&self) -> Result<bool> {
        expect_boolean("AHKWinExist", self.call("AHKWinExist", vec![]).await?)
    }

    /// The window title.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn get_title(&self) -> Result<String> {
        expect_string("WinGetTitle", self.call("WinGetTitle", vec![]).await?)
    }

    /// Change the window title.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn set_title(&self, new_title: &str) -> Result<()> {
        expect_unit(
            "WinSetTitle",
            self.call("WinSetTitle", vec![new_title.to_string()]).await?,
        )
    }

    /// The window's class name.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn get_class(&self) -> Result<String> {
        expect_string("WinGetClass", self.call("WinGetClass", vec![]).await?)
    }

    /// The window's visible text.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn get_text(&self) -> Result<String> {
        expect_string("WinGetText", self.call("WinGetText", vec![]).await?)
    }

    /// The window rectangle.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn get_pos(&self) -> Result<Position> {
        expect_position("AHKWinGetPos", self.call("AHKWinGetPos", vec![]).await?)
    }

    /// Move the window's top-left corner.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn move_to(&self, x: i32, y: i32) -> Result<()> {
        expect_unit(
            "AHKWinMove",
            self.call("AHKWinMove", vec![x.to_string(), y.to_string()])
                .await?,
        )
    }

    /// Bring the window to the foreground.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn activate(&self) -> Result<()> {
        expect_unit("WinActivate", self.call("WinActivate", vec![]).await?)
    }

    /// Ask the window to close.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn close(&self) -> Result<()> {
        expect_unit("AHKWinClose", self.call("AHKWinClose", vec![]).await?)
    }

    /// Forcefully close the window.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn kill(&self) -> Result<()> {
        expect_unit("WinKill", self.call("WinKill", vec![]).await?)
    }

    /// Hide the window.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn hide(&self) -> Result<()> {
        expect_unit("WinHide", self.call("WinHide", vec![]).await?)
    }

    /// Show a hidden window.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn show(&self) -> Result<()> {
        expect_unit("WinShow", self.call("WinShow", vec![]).await?)
    }

    /// Maximize the window.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn maximize(&self) -> Result<()> {
        expect_unit("WinMaximize", self.call("WinMaximize", vec![]).await?)
    }

    /// Minimize the window.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn minimize(&self) -> Result<()> {
        expect_unit("WinMinimize", self.call("WinMinimize", vec![]).await?)
    }

    /// Restore a minimized or maximized window.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn restore(&self) -> Result<()> {
        expect_unit("WinRestore", self.call("WinRestore", vec![]).await?)
    }

    /// Whether the window is pinned above others.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn is_always_on_top(&self) -> Result<bool> {
        expect_boolean(
            "AHKWinIsAlwaysOnTop",
            self.call("AHKWinIsAlwaysOnTop", vec![]).await?,
        )
    }

    /// Pin or unpin the window (`On`, `Off`, `Toggle`).
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn set_always_on_top(&self, toggle: &str) -> Result<()> {
        expect_unit(
            "AHKWinSetAlwaysOnTop",
            self.call("AHKWinSetAlwaysOnTop", vec![toggle.to_string()])
                .await?,
        )
    }

    /// Send keystrokes directly to this window.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn send(&self, keys: &str) -> Result<()> {
        expect_unit("WinSend", self.call("WinSend", vec![keys.to_string()]).await?)
    }

    /// Enumerate the window's controls as handles bound to the same client.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn list_controls(&self) -> Result<Vec<Control>> {
        match self.call("AHKWinGetControlList", vec![]).await? {
            Payload::WindowControlList {
                window_id,
                controls,
            } => {
                let window = Window::new(self.engine.clone(), window_id);
                Ok(controls
                    .into_iter()
                    .map(|(hwnd, control_class)| Control {
                        window: window.clone(),
                        hwnd,
                        control_class,
                    })
                    .collect())
            }
            other => Err(Error::UnexpectedResponse {
                function: "AHKWinGetControlList".to_string(),
                got: other.kind().name(),
            }),
        }
    }
}

impl PartialEq for Window {
    fn eq(&self, other: &Self) -> bool {
        self.ahk_id == other.ahk_id
    }
}

impl Eq for Window {}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window").field("ahk_id", &self.ahk_id).finish()
    }
}

/// A control inside a window.
#[derive(Clone)]
pub struct Control {
    window: Window,
    hwnd: String,
    control_class: String,
}

impl Control {
    #[must_use]
    pub fn hwnd(&self) -> &str {
        &self.hwnd
    }

    #[must_use]
    pub fn control_class(&self) -> &str {
        &self.control_class
    }

    /// The window this control belongs to.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Send keystrokes directly to this control.
    ///
    /// # Errors
    ///
    /// Propagates transport, decode, and remote errors.
    pub async fn send(&self, keys: &str) -> Result<()> {
        let args = vec![
            self.window.title_arg(),
            self.control_class.clone(),
            keys.to_string(),
        ];
        let payload = self.window.engine.function_call("ControlSend", args).await?;
        expect_unit("ControlSend", payload)
    }
}

impl std::fmt::Debug for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Control")
            .field("hwnd", &self.hwnd)
            .field("class", &self.control_class)
            .finish()
    }
}
