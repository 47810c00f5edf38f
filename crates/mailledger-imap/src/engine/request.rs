//! The in-flight command slot.
//!
//! A [`Request`] is created by the facade, travels through the output and
//! input queues, and is destroyed once its ready signal fires and the
//! waiter (or callback) has consumed it. See `SPEC_FULL.md` §3/§4.1.

use std::fmt;
use std::sync::Mutex;

use tokio::sync::oneshot;

use crate::types::Tag;

/// One accumulated untagged payload: a bare line, or a literal's header
/// line paired with its raw octets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UntaggedPayload {
    /// A plain untagged response line with its leading `"* TYPE "` stripped.
    Plain(String),
    /// A header line that announced a literal, paired with the literal's
    /// raw bytes.
    Literal(String, Vec<u8>),
}

/// The outcome of a completed command, as delivered to a [`Request`].
#[derive(Debug, Clone)]
pub struct TaggedOutcome {
    /// `"OK"`, `"NO"`, or `"BAD"`.
    pub status: String,
    /// The human-readable text following the status.
    pub text: String,
}

/// Why a [`Request`] was aborted instead of completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Logical/program error: illegal command for state, BAD response,
    /// malformed data. The connection remains usable.
    Error,
    /// Service error: BYE, socket failure, parser exception. The
    /// connection should be discarded.
    Abort,
    /// Subtype of `Abort`: the mailbox silently turned read-only.
    ReadOnly,
}

enum Delivery {
    /// No callback was installed; deliver via the oneshot.
    Channel(oneshot::Sender<Outcome>),
    /// A callback is installed; deliver by invoking it directly.
    Callback(Box<dyn FnOnce(Outcome) + Send>),
}

/// What actually got delivered to a [`Request`]: a successful tagged
/// completion, or an abort with its kind and message.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The command completed (possibly with status NO/BAD, which the
    /// facade maps to an error kind on the synchronous path).
    Done(TaggedOutcome),
    /// The command (or connection) was aborted.
    Aborted(ErrorKind, String),
}

/// One outstanding command or continuation slot.
///
/// Exactly one of the oneshot's `send`/the callback is ever invoked, and
/// it is invoked exactly once — the dispatcher guarantees single
/// delivery, `Request` does not re-check.
pub struct Request {
    /// The tag this request was dispatched under (or the sentinel
    /// `"continuation"` tag for the shared continuation slot).
    pub tag: Tag,
    /// The bare command name, e.g. `"SELECT"`, used for the command-table
    /// legality check and for logging.
    pub name: String,
    /// The fully-rendered wire bytes for the command's first line
    /// (including any `{n}` literal-length suffix and trailing CRLF).
    pub wire_bytes: Vec<u8>,
    delivery: Mutex<Option<Delivery>>,
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("tag", &self.tag)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Request {
    /// Creates a new request and its paired waiter.
    pub fn new(tag: Tag, name: impl Into<String>, wire_bytes: Vec<u8>) -> (Self, oneshot::Receiver<Outcome>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                tag,
                name: name.into(),
                wire_bytes,
                delivery: Mutex::new(Some(Delivery::Channel(tx))),
            },
            rx,
        )
    }

    /// Creates a request whose completion is delivered by invoking
    /// `callback` exactly once, instead of through a oneshot waiter.
    pub fn with_callback(
        tag: Tag,
        name: impl Into<String>,
        wire_bytes: Vec<u8>,
        callback: impl FnOnce(Outcome) + Send + 'static,
    ) -> Self {
        Self {
            tag,
            name: name.into(),
            wire_bytes,
            delivery: Mutex::new(Some(Delivery::Callback(Box::new(callback)))),
        }
    }

    /// Delivers a successful completion.
    ///
    /// If a callback is installed it is invoked now, on the Handler task;
    /// otherwise the value is sent through the oneshot and the waiter
    /// wakes.
    pub fn deliver(&self, outcome: TaggedOutcome) {
        self.finish(Outcome::Done(outcome));
    }

    /// Aborts this request with `kind`/`message` instead of completing it.
    pub fn abort(&self, kind: ErrorKind, message: impl Into<String>) {
        self.finish(Outcome::Aborted(kind, message.into()));
    }

    fn finish(&self, outcome: Outcome) {
        let delivery = self.delivery.lock().unwrap_or_else(|e| e.into_inner()).take();
        match delivery {
            Some(Delivery::Channel(tx)) => {
                // The receiver may have been dropped (caller gave up waiting);
                // that is not our problem to report.
                let _ = tx.send(outcome);
            }
            Some(Delivery::Callback(cb)) => cb(outcome),
            None => {
                tracing::error!(tag = %self.tag, "request delivered more than once");
            }
        }
    }
}
