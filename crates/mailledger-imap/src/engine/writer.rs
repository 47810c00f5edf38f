//! The Writer task: drains the output queue onto the wire.
//!
//! See `SPEC_FULL.md` §4.4. Exactly one task owns the write half of the
//! Transport for the lifetime of the connection.

use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::engine::request::{ErrorKind, Request};
use crate::engine::shared::Shared;

/// An item on the output queue: either a request's wire bytes to write,
/// or the flush-and-exit sentinel.
pub enum OutputItem {
    /// Write this request's bytes as a single unit.
    Send(Arc<Request>),
    /// Write raw bytes with no associated `Request` — a literal body,
    /// a SASL continuation reply, or the `DONE\r\n` that ends an IDLE.
    Raw(Vec<u8>),
    /// Flush any buffered data and exit.
    Shutdown,
}

/// The input queue's item type: raw bytes from the Reader, or a
/// transport-failure sentinel posted by the Reader or Writer.
pub enum ReaderEvent {
    /// A raw chunk of bytes read from the Transport. The Handler is
    /// responsible for re-framing this into lines and literals.
    Chunk(Vec<u8>),
    /// The Transport failed; tear the connection down.
    TransportError(String),
}

/// Runs the Writer loop until a [`OutputItem::Shutdown`] sentinel or a
/// write failure.
pub async fn run<W>(mut sink: W, mut queue: mpsc::Receiver<OutputItem>, shared: Arc<Shared>, input_tx: mpsc::UnboundedSender<ReaderEvent>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(item) = queue.recv().await {
        match item {
            OutputItem::Shutdown => {
                let _ = sink.flush().await;
                break;
            }
            OutputItem::Send(request) => {
                tracing::trace!(tag = %request.tag, bytes = request.wire_bytes.len(), "writer: sending command");
                if let Err(err) = sink.write_all(&request.wire_bytes).await {
                    let message = format!("write failed: {err}");
                    tracing::error!(%message, "writer: transport failure");
                    request.abort(ErrorKind::Abort, message.clone());
                    shared.abort_all(ErrorKind::Abort, &message);
                    let _ = input_tx.send(ReaderEvent::TransportError(message));
                    return;
                }
                if let Err(err) = sink.flush().await {
                    let message = format!("flush failed: {err}");
                    request.abort(ErrorKind::Abort, message.clone());
                    shared.abort_all(ErrorKind::Abort, &message);
                    let _ = input_tx.send(ReaderEvent::TransportError(message));
                    return;
                }
            }
            OutputItem::Raw(bytes) => {
                if let Err(err) = sink.write_all(&bytes).await.and(sink.flush().await) {
                    let message = format!("write failed: {err}");
                    shared.abort_all(ErrorKind::Abort, &message);
                    let _ = input_tx.send(ReaderEvent::TransportError(message));
                    return;
                }
            }
        }
    }
}
