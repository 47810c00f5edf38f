//! The Handler task: drives the parser and completes requests.
//!
//! See `SPEC_FULL.md` §4.3. The Handler is the sole task that mutates
//! [`Shared`]'s tagged-command map and untagged-response map once the
//! connection is up; it owns [`ParserState`] and the raw byte buffer
//! between Reader chunks and complete response lines.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::engine::lines::{classify, extract_response_code, LineKind};
use crate::engine::parser_state::ParserState;
use crate::engine::request::{ErrorKind, UntaggedPayload};
use crate::engine::shared::{IdleState, Shared};
use crate::engine::writer::{OutputItem, ReaderEvent};

/// Runs the Handler loop until the connection terminates.
pub async fn run(shared: Arc<Shared>, mut input_rx: mpsc::UnboundedReceiver<ReaderEvent>, output_tx: mpsc::Sender<OutputItem>) {
    let mut parser = ParserState::default();
    let mut buffer: Vec<u8> = Vec::new();

    loop {
        let idle_deadline = shared.idle_deadline();
        let event = match idle_deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(std::time::Instant::now());
                tokio::select! {
                    biased;
                    event = input_rx.recv() => event,
                    () = tokio::time::sleep(remaining) => {
                        force_idle_timeout(&shared, &output_tx).await;
                        continue;
                    }
                }
            }
            None => input_rx.recv().await,
        };

        let Some(event) = event else { break };
        match event {
            ReaderEvent::TransportError(message) => {
                tracing::warn!(%message, "handler: transport error, aborting connection");
                shared.abort_all(ErrorKind::Abort, &message);
                break;
            }
            ReaderEvent::Chunk(chunk) => {
                buffer.extend_from_slice(&chunk);
                process_buffer(&shared, &mut parser, &mut buffer, &output_tx).await;
            }
        }
    }
}

/// Consumes as many complete frames (literals and lines) as `buffer`
/// currently holds.
async fn process_buffer(shared: &Arc<Shared>, parser: &mut ParserState, buffer: &mut Vec<u8>, output_tx: &mpsc::Sender<OutputItem>) {
    loop {
        if parser.expecting_data > 0 {
            let Some(tail) = parser.feed_literal(buffer) else {
                buffer.clear();
                return;
            };
            if let Some((response_type, header_line, bytes)) = parser.take_literal() {
                shared.push_untagged(&response_type, UntaggedPayload::Literal(header_line, bytes));
            }
            *buffer = tail;
            continue;
        }

        let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') else {
            return;
        };
        let raw_line: Vec<u8> = buffer.drain(..=newline_pos).collect();
        let line_text = String::from_utf8_lossy(&raw_line);
        let trimmed = line_text.trim_end_matches(['\r', '\n']);

        handle_line(shared, parser, trimmed, output_tx).await;
    }
}

async fn handle_line(shared: &Arc<Shared>, parser: &mut ParserState, line: &str, output_tx: &mpsc::Sender<OutputItem>) {
    match classify(line) {
        LineKind::Tagged { tag, status, rest } => {
            // A tagged line while a continuation was armed means the
            // server refused the continuation instead of sending "+".
            if shared.deliver_continuation((false, line.to_string())) {
                tracing::debug!(%tag, "handler: continuation refused by tagged response");
            }
            record_response_code(shared, &rest);
            if let Some(request) = shared.take_tagged(&tag) {
                request.deliver(crate::engine::request::TaggedOutcome { status, text: rest });
            } else {
                tracing::warn!(%tag, "handler: tagged response for unknown request, ignored");
            }
        }
        LineKind::Untagged { response_type, rest } => {
            if shared.deliver_continuation((false, line.to_string())) {
                tracing::debug!("handler: continuation superseded by untagged response");
            }
            if let Some(len) = ParserState::literal_suffix_len(&rest) {
                parser.begin_literal(response_type, line.to_string(), len);
                return;
            }
            record_response_code(shared, &rest);
            shared.push_untagged(&response_type, UntaggedPayload::Plain(rest));
            if response_type != "OK" {
                end_idle_if_running(shared, output_tx).await;
            }
        }
        LineKind::Continuation { rest } => {
            let text = rest.unwrap_or_default();
            if !shared.deliver_continuation((true, text)) {
                tracing::warn!(%line, "handler: unexpected continuation response");
            }
        }
        LineKind::Unrecognized(raw) => {
            tracing::warn!(%raw, "handler: unrecognized response line, ignored");
        }
    }
}

fn record_response_code(shared: &Arc<Shared>, rest: &str) {
    if let Some((code, _tail)) = extract_response_code(rest) {
        shared.push_untagged("CODE", UntaggedPayload::Plain(code));
    }
}

/// Ends a running IDLE by sending `DONE\r\n`, without waiting for the
/// tagged completion (that arrives later and is delivered normally to
/// the IDLE request's own tag).
async fn end_idle_if_running(shared: &Arc<Shared>, output_tx: &mpsc::Sender<OutputItem>) {
    if shared.take_idle().is_some() {
        let _ = output_tx.send(OutputItem::Raw(b"DONE\r\n".to_vec())).await;
    }
}

/// Synthesizes `"* IDLE TIMEOUT"` and feeds it through the parser when
/// the running IDLE's deadline has passed (`spec.md` §4.7).
async fn force_idle_timeout(shared: &Arc<Shared>, output_tx: &mpsc::Sender<OutputItem>) {
    if shared.take_idle().is_some() {
        shared.push_untagged("IDLE", UntaggedPayload::Plain("TIMEOUT".to_string()));
        let _ = output_tx.send(OutputItem::Raw(b"DONE\r\n".to_vec())).await;
    }
}

/// Re-arms and restores the idle deadline after a no-op Handler tick.
/// Exposed for the dispatcher to record a freshly started IDLE.
pub fn start_idle(shared: &Arc<Shared>, idle_rqb: Arc<crate::engine::request::Request>, timeout: Duration) {
    shared.set_idle(IdleState {
        idle_rqb,
        idle_timeout: std::time::Instant::now() + timeout,
    });
}
