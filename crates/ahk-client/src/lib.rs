//! Client for an AutoHotkey-style automation daemon.
//!
//! The daemon is a script interpreter started as a child process; it reads
//! one command per line on stdin and answers on stdout with a tagged,
//! self-describing envelope (see the `ahk-wire` crate for the codec). This
//! crate owns everything process-shaped: spawning the daemon, the pipe
//! transport, the two call strategies, and the typed client facade.
//!
//! Two call strategies coexist on one client:
//!
//! - **Blocking** calls share a single persistent daemon process and
//!   serialize FIFO through its pipe.
//! - **Non-blocking** calls each spawn a disposable daemon process and
//!   return a [`FutureResult`] handle; they never queue behind blocking
//!   calls or each other.
//!
//! ```no_run
//! use ahk_client::Ahk;
//!
//! # async fn demo() -> ahk_client::Result<()> {
//! let ahk = Ahk::new()?;
//! let (x, y) = ahk.mouse_get_pos().await?;
//! ahk.mouse_move(x + 10, y, 2, false).await?;
//!
//! // Fire-and-track on a disposable daemon process.
//! let typing = ahk.send_nonblocking("Hello{Enter}");
//! typing.result().await?;
//! # Ok(())
//! # }
//! ```
//!
//! Callers without an async runtime can use the [`blocking`] facade, which
//! runs the same client over a private runtime.

pub mod blocking;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod process;
pub mod transport;
pub mod window;

pub use config::{AHK_PATH_ENV, DaemonConfig};
pub use engine::Ahk;
pub use error::{Error, Result};
pub use transport::FutureResult;
pub use window::{Control, Window};
