//! The concurrent request/response engine.
//!
//! This module implements `SPEC_FULL.md` §3–§5: a [`dispatch::Engine`]
//! spawns three `tokio` tasks — Writer, Reader, Handler — around a
//! [`shared::Shared`] state block, and multiplexes any number of
//! in-flight commands over a single connection according to the
//! pipelining and state-legality rules in [`commands`].
//!
//! Submodules mirror the spec's component boundaries directly rather
//! than folding everything into one file, the way `crate::connection`
//! splits `client`/`stream`/`framed`/`idle` by concern.

pub mod commands;
pub mod dispatch;
pub mod handler;
pub mod lines;
pub mod parser_state;
pub mod producer;
pub mod reader;
pub mod request;
pub mod shared;
pub mod transport;
pub mod writer;

pub use commands::{lookup, quote_if_needed, register_xatom, CommandSpec};
pub use dispatch::{DispatchResult, Engine, IdleToken};
pub use producer::{AuthProducer, CramMd5Producer, ContinuationProducer};
pub use request::{ErrorKind, Outcome, Request, TaggedOutcome, UntaggedPayload};
pub use transport::ProcessTransport;
