//! Wire protocol codec for the AutoHotkey automation daemon.
//!
//! The daemon speaks a textual request/response protocol over its stdin and
//! stdout pipes. This crate contains the pure encode/decode half of that
//! protocol: no I/O, no process management.
//!
//! # Request frames
//!
//! A request is a single line: the remote function name, then comma-joined
//! arguments, terminated by `\n`. Any literal newline inside an argument is
//! escaped to the two-character sequence `` `n `` so the frame stays on one
//! line. See [`Request`].
//!
//! # Response frames
//!
//! A response is self-describing:
//!
//! ```text
//! <TAG>\n            -- 3 chars identifying the payload kind
//! <N>\n              -- decimal count of additional body lines
//! <payload line 0>\n
//! ...
//! <payload line N>\n
//! ```
//!
//! The payload is lines `0..=N` joined with `\n`, minus one synthetic
//! trailing newline baked in by the writer side. [`Payload::decode`] turns
//! the tag plus payload bytes into a typed value.
//!
//! # Tags
//!
//! Tags are assigned to payload kinds by registration order over the fixed
//! alphabet `0-9A-Za-z`: the first registered kind gets `"000"`, the next
//! `"001"`, and so on. The table is built once, deterministically, from the
//! ordered kind list in [`payload::KINDS`]. See [`tag::TagRegistry`].

pub mod error;
pub mod literal;
pub mod payload;
pub mod request;
pub mod tag;

pub use error::{Result, WireError};
pub use literal::Literal;
pub use payload::{Kind, NO_VALUE_SENTINEL, Payload, Position, encode_response, parse_count};
pub use request::Request;
pub use tag::{Tag, TagRegistry};
