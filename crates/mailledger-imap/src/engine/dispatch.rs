//! The Client-facade dispatch discipline.
//!
//! Implements the ten-step sequencing of `spec.md` §4.2 on top of
//! [`Shared`] and the Writer/Reader/Handler tasks spawned by
//! [`Engine::spawn`].

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tokio::task::JoinHandle;

use crate::engine::commands::{self, lookup};
use crate::engine::handler;
use crate::engine::producer::ContinuationProducer;
use crate::engine::request::{ErrorKind, Outcome, Request, TaggedOutcome, UntaggedPayload};
use crate::engine::shared::Shared;
use crate::engine::writer::{OutputItem, ReaderEvent};
use crate::protocol::state::StateKind;
use crate::types::Tag;
use crate::{Error, Result};

/// A connected engine: the three background tasks plus the shared state
/// and output queue the dispatcher writes to.
pub struct Engine {
    shared: Arc<Shared>,
    output_tx: mpsc::Sender<OutputItem>,
    state_change_pending: AsyncMutex<()>,
    writer_task: JoinHandle<()>,
    reader_task: JoinHandle<()>,
    handler_task: JoinHandle<()>,
}

/// Outcome of dispatching a command: the final status word (`"OK"` on
/// the synchronous happy path) and any untagged payloads the caller
/// asked to drain.
pub type DispatchResult = (String, Vec<UntaggedPayload>);

/// A running IDLE: holds the request so the caller can later await its
/// tagged completion once `DONE` is sent (by [`Engine::end_idle`] or by
/// the Handler's own timeout).
pub struct IdleToken {
    request: Arc<Request>,
    rx: tokio::sync::oneshot::Receiver<Outcome>,
}

impl Engine {
    /// Spawns the Writer, Reader, and Handler tasks over `stream` and
    /// returns a dispatcher bound to them. `tag_prefix` is the
    /// connection's two-letter (here, single-letter for brevity) tag
    /// seed described in `spec.md` §3.
    pub fn spawn<S>(stream: S, tag_prefix: char) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        let shared = Shared::new(tag_prefix);
        let (output_tx, output_rx) = mpsc::channel::<OutputItem>(64);
        let (input_tx, input_rx) = mpsc::unbounded_channel::<ReaderEvent>();

        let writer_task = tokio::spawn(crate::engine::writer::run(write_half, output_rx, shared.clone(), input_tx.clone()));
        let reader_task = tokio::spawn(crate::engine::reader::run(read_half, input_tx));
        let handler_task = tokio::spawn(handler::run(shared.clone(), input_rx, output_tx.clone()));

        Self {
            shared,
            output_tx,
            state_change_pending: AsyncMutex::new(()),
            writer_task,
            reader_task,
            handler_task,
        }
    }

    /// Dispatches a command with no literal or producer sub-protocol:
    /// steps 1–10 of `spec.md` §4.2 in full.
    pub async fn dispatch(&self, name: &str, args_line: &str, state: StateKind, requires_write: bool, mailbox_read_only: bool) -> Result<DispatchResult> {
        let guard = self.state_change_pending.lock().await;

        self.end_idle_for_dispatch().await;

        let spec = lookup(name).ok_or_else(|| Error::InvalidState(format!("unknown command {name}")))?;
        if !spec.pipelineable {
            self.wait_until_free().await;
        }

        if self.shared.terminating.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(Error::Aborted("connection is closed (BYE received)".to_string()));
        }
        self.shared.clear_status_codes();

        if !spec.states.contains(&state) {
            return Err(Error::InvalidState(format!("{name} is not valid in state {state:?}")));
        }
        if requires_write && mailbox_read_only {
            return Err(Error::ReadOnly("mailbox".to_string()));
        }

        let tag = self.shared.next_tag();
        let wire = render_command_line(&tag, name, args_line, None);
        let (request, rx) = Request::new(tag, name, wire);
        let request = Arc::new(request);
        self.shared.register(request.clone());
        self.output_tx
            .send(OutputItem::Send(request.clone()))
            .await
            .map_err(|_| Error::Aborted("writer task is gone".to_string()))?;

        if spec.pipelineable {
            drop(guard);
        }
        let result = self.await_completion(&request, rx).await;
        drop(guard);
        result
    }

    /// Dispatches a command whose first line ends in a literal-length
    /// suffix, then — once the server's `+` continuation arrives — sends
    /// `literal` followed by CRLF, per `spec.md` §4.2's literal
    /// sub-protocol. Always non-pipelineable in practice (`APPEND`).
    pub async fn dispatch_with_literal(&self, name: &str, args_line: &str, literal: &[u8], state: StateKind) -> Result<DispatchResult> {
        let guard = self.state_change_pending.lock().await;
        self.end_idle_for_dispatch().await;
        self.wait_until_free().await;

        if self.shared.terminating.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(Error::Aborted("connection is closed (BYE received)".to_string()));
        }
        self.shared.clear_status_codes();

        let spec = lookup(name).ok_or_else(|| Error::InvalidState(format!("unknown command {name}")))?;
        if !spec.states.contains(&state) {
            return Err(Error::InvalidState(format!("{name} is not valid in state {state:?}")));
        }

        let tag = self.shared.next_tag();
        let wire = render_command_line(&tag, name, args_line, Some(literal.len()));
        let (request, rx) = Request::new(tag, name, wire);
        let request = Arc::new(request);
        self.shared.register(request.clone());

        let continuation = self.shared.arm_continuation();
        self.output_tx
            .send(OutputItem::Send(request.clone()))
            .await
            .map_err(|_| Error::Aborted("writer task is gone".to_string()))?;

        match continuation.await {
            Ok((true, _text)) => {
                let normalized = commands::normalize_literal_crlf(literal);
                let mut body = normalized;
                body.extend_from_slice(b"\r\n");
                let _ = self.output_tx.send(OutputItem::Raw(body)).await;
            }
            Ok((false, text)) => {
                self.shared.take_tagged(request.tag.as_str());
                return Err(Error::Bad(text));
            }
            Err(_) => return Err(Error::Aborted("connection closed while awaiting continuation".to_string())),
        }

        let result = self.await_completion(&request, rx).await;
        drop(guard);
        result
    }

    /// Dispatches a command driven by a [`ContinuationProducer`]
    /// (`AUTHENTICATE`, streamed `APPEND`). Loops sending each chunk the
    /// producer yields until it returns `None`.
    pub async fn dispatch_with_producer(&self, name: &str, args_line: &str, mut producer: Box<dyn ContinuationProducer>, state: StateKind) -> Result<DispatchResult> {
        let guard = self.state_change_pending.lock().await;
        self.end_idle_for_dispatch().await;
        self.wait_until_free().await;

        let spec = lookup(name).ok_or_else(|| Error::InvalidState(format!("unknown command {name}")))?;
        if !spec.states.contains(&state) {
            return Err(Error::InvalidState(format!("{name} is not valid in state {state:?}")));
        }
        self.shared.clear_status_codes();

        let tag = self.shared.next_tag();
        let wire = render_command_line(&tag, name, args_line, None);
        let (request, rx) = Request::new(tag, name, wire);
        let request = Arc::new(request);
        self.shared.register(request.clone());

        let mut continuation = self.shared.arm_continuation();
        self.output_tx
            .send(OutputItem::Send(request.clone()))
            .await
            .map_err(|_| Error::Aborted("writer task is gone".to_string()))?;

        loop {
            match continuation.await {
                Ok((true, text)) => match producer.next(text.as_bytes()) {
                    Some(mut chunk) => {
                        chunk.extend_from_slice(b"\r\n");
                        let _ = self.output_tx.send(OutputItem::Raw(chunk)).await;
                        continuation = self.shared.arm_continuation();
                    }
                    None => break,
                },
                Ok((false, _text)) => break,
                Err(_) => {
                    drop(guard);
                    return Err(Error::Aborted("connection closed during authentication".to_string()));
                }
            }
        }

        let result = self.await_completion(&request, rx).await;
        drop(guard);
        result
    }

    /// Starts an `IDLE`: sends the command, waits for the server's `+`,
    /// records the deadline, and returns immediately without waiting for
    /// the tagged completion (the facade releases its dispatch lock and
    /// hands control back to the caller, per `spec.md` §4.7).
    pub async fn start_idle(&self, timeout: Duration, state: StateKind) -> Result<IdleToken> {
        let _guard = self.state_change_pending.lock().await;
        self.end_idle_for_dispatch().await;
        self.wait_until_free().await;

        let spec = lookup("IDLE").ok_or_else(|| Error::InvalidState("IDLE not registered".to_string()))?;
        if !spec.states.contains(&state) {
            return Err(Error::InvalidState(format!("IDLE is not valid in state {state:?}")));
        }

        let tag = self.shared.next_tag();
        let wire = render_command_line(&tag, "IDLE", "", None);
        let (request, rx) = Request::new(tag, "IDLE", wire);
        let request = Arc::new(request);
        self.shared.register(request.clone());

        let continuation = self.shared.arm_continuation();
        self.output_tx
            .send(OutputItem::Send(request.clone()))
            .await
            .map_err(|_| Error::Aborted("writer task is gone".to_string()))?;

        match continuation.await {
            Ok((true, _)) => {
                handler::start_idle(&self.shared, request.clone(), timeout);
                Ok(IdleToken { request, rx })
            }
            Ok((false, text)) => {
                self.shared.take_tagged(request.tag.as_str());
                Err(Error::Bad(text))
            }
            Err(_) => Err(Error::Aborted("connection closed while starting IDLE".to_string())),
        }
    }

    /// Ends a running IDLE by sending `DONE\r\n` and awaiting the
    /// original IDLE command's tagged completion.
    pub async fn end_idle(&self, token: IdleToken) -> Result<DispatchResult> {
        if self.shared.take_idle().is_some() {
            let _ = self.output_tx.send(OutputItem::Raw(b"DONE\r\n".to_vec())).await;
        }
        self.await_completion(&token.request, token.rx).await
    }

    /// Closes the connection: transitions are the caller's
    /// responsibility, but this always flushes the output queue and
    /// joins all three tasks, per `spec.md` §6 `logout()`.
    pub async fn shutdown(self) {
        let _ = self.output_tx.send(OutputItem::Shutdown).await;
        let _ = self.writer_task.await;
        let _ = self.reader_task.await;
        let _ = self.handler_task.await;
    }

    /// Drains the untagged responses accumulated under `response_type`
    /// since the last drain — e.g. `capability()`/`fetch()` calling this
    /// after their own completion.
    #[must_use]
    pub fn drain_untagged(&self, response_type: &str) -> Vec<UntaggedPayload> {
        self.shared.drain_untagged(response_type)
    }

    async fn end_idle_for_dispatch(&self) {
        // Any IDLE is ended as step 2 of every dispatch, regardless of
        // whether this call is itself an IDLE-related one; the caller
        // holding an `IdleToken` is responsible for awaiting its own
        // completion separately via `end_idle`.
        if let Some(idle) = self.shared.take_idle() {
            let _ = self.output_tx.send(OutputItem::Raw(b"DONE\r\n".to_vec())).await;
            drop(idle);
        }
    }

    async fn wait_until_free(&self) {
        while !self.shared.is_free() {
            let notified = self.shared.state_change_free.notified();
            if self.shared.is_free() {
                break;
            }
            notified.await;
        }
    }

    async fn await_completion(&self, request: &Arc<Request>, rx: tokio::sync::oneshot::Receiver<Outcome>) -> Result<DispatchResult> {
        match rx.await {
            Ok(Outcome::Done(TaggedOutcome { status, text })) => {
                if self.shared.terminating.load(std::sync::atomic::Ordering::SeqCst) {
                    let bye = self.shared.drain_untagged("BYE");
                    if !bye.is_empty() {
                        return Ok(("BYE".to_string(), bye));
                    }
                }
                match status.as_str() {
                    "BAD" => Err(Error::Bad(text)),
                    "NO" => Err(Error::No(text)),
                    _ => Ok((status, self.shared.drain_untagged(&request.name))),
                }
            }
            Ok(Outcome::Aborted(ErrorKind::ReadOnly, message)) => Err(Error::ReadOnly(message)),
            Ok(Outcome::Aborted(_, message)) => Err(Error::Aborted(message)),
            Err(_) => Err(Error::Aborted("request dropped without delivery".to_string())),
        }
    }
}

/// Renders `"<tag> <NAME>[ <args>][ {n}]\r\n"`.
fn render_command_line(tag: &Tag, name: &str, args_line: &str, literal_len: Option<usize>) -> Vec<u8> {
    let mut line = format!("{tag} {name}");
    if !args_line.is_empty() {
        line.push(' ');
        line.push_str(args_line);
    }
    if let Some(n) = literal_len {
        line.push_str(&format!(" {{{n}}}"));
    }
    line.push_str("\r\n");
    line.into_bytes()
}
