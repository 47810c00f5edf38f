//! State shared between the dispatcher and the Handler task.
//!
//! Mutation of this state happens only on the Handler task (per
//! `spec.md` §5: "the Handler is the sole writer of per-connection
//! mutable state after initialization"); callers only read it through
//! the accessor methods below, which take the lock for the minimum time
//! needed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{oneshot, Notify};

use crate::engine::request::{ErrorKind, Request, UntaggedPayload};
use crate::types::Tag;

/// Reply routed back to whichever caller is waiting on the shared
/// continuation slot: whether the response really was a `+` (`true`) or
/// some other unexpected line arrived while a continuation was armed
/// (`false`), plus the response text.
pub type ContinuationReply = (bool, String);

/// The Request parked for an in-flight IDLE, plus when to force `DONE`.
pub struct IdleState {
    /// The IDLE command's own Request (its tagged completion arrives
    /// only after `DONE` is sent).
    pub idle_rqb: Arc<Request>,
    /// Wall-clock instant at which the engine synthesizes
    /// `"* IDLE TIMEOUT"` and sends `DONE` on the caller's behalf.
    pub idle_timeout: std::time::Instant,
}

/// State shared between the dispatcher, Writer, Reader, and Handler.
pub struct Shared {
    tagged_commands: Mutex<HashMap<String, Arc<Request>>>,
    untagged_responses: Mutex<HashMap<String, Vec<UntaggedPayload>>>,
    continuation_slot: Mutex<Option<oneshot::Sender<ContinuationReply>>>,
    idle_state: Mutex<Option<IdleState>>,
    /// Signaled iff `tagged_commands` is empty; non-pipelineable
    /// dispatch waits on this before sending.
    pub state_change_free: Notify,
    /// Set once BYE is observed or the connection is otherwise torn
    /// down. No further command is accepted after this is true.
    pub terminating: AtomicBool,
    tag_prefix: char,
    tag_counter: AtomicU32,
}

impl Shared {
    /// Builds a fresh, empty shared state with the given two-letter tag
    /// prefix (derived from a random seed at connection creation, per
    /// `spec.md` §3).
    #[must_use]
    pub fn new(tag_prefix: char) -> Arc<Self> {
        Arc::new(Self {
            tagged_commands: Mutex::new(HashMap::new()),
            untagged_responses: Mutex::new(HashMap::new()),
            continuation_slot: Mutex::new(None),
            idle_state: Mutex::new(None),
            state_change_free: Notify::const_new(),
            terminating: AtomicBool::new(false),
            tag_prefix,
            tag_counter: AtomicU32::new(0),
        })
    }

    /// Allocates the next tag: the connection's letter prefix
    /// concatenated with a monotonically increasing counter.
    pub fn next_tag(&self) -> Tag {
        let n = self.tag_counter.fetch_add(1, Ordering::Relaxed);
        Tag::new(format!("{}{n:04}", self.tag_prefix))
    }

    /// Registers a request as outstanding under its own tag.
    pub fn register(&self, request: Arc<Request>) {
        self.tagged_commands
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(request.tag.as_str().to_string(), request);
    }

    /// Removes and returns the outstanding request for `tag`, if any.
    /// Signals `state_change_free` when the map becomes empty.
    pub fn take_tagged(&self, tag: &str) -> Option<Arc<Request>> {
        let mut guard = self
            .tagged_commands
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let found = guard.remove(tag);
        if found.is_some() && guard.is_empty() {
            self.state_change_free.notify_waiters();
        }
        found
    }

    /// True iff no tagged command is currently outstanding.
    pub fn is_free(&self) -> bool {
        self.tagged_commands
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .is_empty()
    }

    /// Appends `payload` under `response_type`.
    pub fn push_untagged(&self, response_type: &str, payload: UntaggedPayload) {
        self.untagged_responses
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .entry(response_type.to_string())
            .or_default()
            .push(payload);
    }

    /// Drains and returns all payloads accumulated under
    /// `response_type`, clearing it. This is the "drain on return"
    /// behavior by which untagged responses are attributed to the
    /// command that completes next (`spec.md` §5).
    pub fn drain_untagged(&self, response_type: &str) -> Vec<UntaggedPayload> {
        self.untagged_responses
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(response_type)
            .unwrap_or_default()
    }

    /// Clears the per-command `OK`/`NO`/`BAD` untagged entries, done at
    /// the start of every dispatch (`spec.md` §4.2 step 5).
    pub fn clear_status_codes(&self) {
        let mut guard = self
            .untagged_responses
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        for key in ["OK", "NO", "BAD", "CODE"] {
            guard.remove(key);
        }
    }

    /// Arms the shared continuation slot, returning a receiver that
    /// resolves when the Handler routes a `+` (or an unexpected
    /// non-`+` line) to it.
    pub fn arm_continuation(&self) -> oneshot::Receiver<ContinuationReply> {
        let (tx, rx) = oneshot::channel();
        *self
            .continuation_slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(tx);
        rx
    }

    /// Routes a continuation reply to the armed slot, if any. Returns
    /// `false` if no continuation was expected (the caller should log
    /// it as unexpected).
    pub fn deliver_continuation(&self, reply: ContinuationReply) -> bool {
        let slot = self
            .continuation_slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        match slot {
            Some(tx) => {
                let _ = tx.send(reply);
                true
            }
            None => false,
        }
    }

    /// Records the currently running IDLE, replacing any previous one.
    pub fn set_idle(&self, state: IdleState) {
        *self
            .idle_state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(state);
    }

    /// Takes the current IDLE state, if any is running.
    pub fn take_idle(&self) -> Option<IdleState> {
        self.idle_state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take()
    }

    /// The deadline of the running IDLE, if any.
    pub fn idle_deadline(&self) -> Option<std::time::Instant> {
        self.idle_state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .as_ref()
            .map(|s| s.idle_timeout)
    }

    /// Aborts every outstanding tagged request and the armed
    /// continuation slot (if any) with `kind`/`message`, then signals
    /// `state_change_free`. Used on BYE, socket failure, or parser
    /// exception (`spec.md` §4.3, §5).
    pub fn abort_all(&self, kind: ErrorKind, message: &str) {
        self.terminating.store(true, Ordering::SeqCst);
        let drained: Vec<Arc<Request>> = self
            .tagged_commands
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .drain()
            .map(|(_, r)| r)
            .collect();
        for request in drained {
            request.abort(kind, message.to_string());
        }
        if let Some(tx) = self
            .continuation_slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take()
        {
            let _ = tx.send((false, message.to_string()));
        }
        self.take_idle();
        self.state_change_free.notify_waiters();
    }
}
