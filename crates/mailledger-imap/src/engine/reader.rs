//! The Reader task: pumps raw Transport bytes into the input queue.
//!
//! See `SPEC_FULL.md` §4.5. A literal's octets may contain arbitrary
//! bytes including bare LF, so the Reader does not attempt to split on
//! LF itself — only the Handler knows, via [`ParserState`], whether the
//! next byte belongs to a literal or to line text. The Reader's only
//! job is handing over raw chunks promptly.
//!
//! [`ParserState`]: crate::engine::parser_state::ParserState

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;

use crate::engine::writer::ReaderEvent;

const CHUNK_SIZE: usize = 32 * 1024;

/// Runs the Reader loop until EOF or a read error, posting raw chunks
/// to `tx` as [`ReaderEvent::Chunk`].
///
/// A zero-length read is treated as EOF (see `spec.md` §9's open
/// question: rather than sleep-and-retry on a half-closed peer, a
/// zero-byte read is surfaced immediately as a transport error so the
/// connection aborts promptly instead of spinning).
pub async fn run<R>(mut source: R, tx: mpsc::UnboundedSender<ReaderEvent>)
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0_u8; CHUNK_SIZE];
    loop {
        match source.read(&mut buf).await {
            Ok(0) => {
                let _ = tx.send(ReaderEvent::TransportError("peer closed connection".to_string()));
                return;
            }
            Ok(n) => {
                if tx.send(ReaderEvent::Chunk(buf[..n].to_vec())).is_err() {
                    return;
                }
            }
            Err(err) => {
                let _ = tx.send(ReaderEvent::TransportError(format!("read failed: {err}")));
                return;
            }
        }
    }
}
