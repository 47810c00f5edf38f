//! Continuation producers for `AUTHENTICATE`, `IDLE`, and streamed
//! `APPEND` literals.
//!
//! See `SPEC_FULL.md` §4.6/§4.7. A producer is called with the
//! server's continuation payload and returns the next chunk to emit, or
//! `None` to end the exchange.

use base64::Engine as _;
use hmac::{Hmac, Mac};
use md5::Md5;

/// One step of a continuation-driven exchange (SASL authentication,
/// streamed `APPEND`, or `IDLE`'s indefinite wait).
pub trait ContinuationProducer: Send {
    /// Called with the server's continuation payload (already
    /// base64-decoded for SASL producers; raw text otherwise). Returns
    /// the next chunk of wire bytes to emit (without trailing CRLF —
    /// the dispatcher appends it), or `None` to end the exchange
    /// without sending anything further.
    fn next(&mut self, server_payload: &[u8]) -> Option<Vec<u8>>;
}

/// Generic SASL producer: base64-decodes the challenge, hands it to a
/// caller-supplied closure, base64-encodes the reply. Returning `None`
/// from the closure emits a single `"*"` to abort the exchange, per
/// RFC 3501 §6.2.2.
pub struct AuthProducer<F> {
    respond: F,
}

impl<F> AuthProducer<F>
where
    F: FnMut(&[u8]) -> Option<Vec<u8>> + Send,
{
    /// Wraps `respond` as a producer.
    pub const fn new(respond: F) -> Self {
        Self { respond }
    }
}

impl<F> ContinuationProducer for AuthProducer<F>
where
    F: FnMut(&[u8]) -> Option<Vec<u8>> + Send,
{
    fn next(&mut self, server_payload: &[u8]) -> Option<Vec<u8>> {
        let challenge = base64::engine::general_purpose::STANDARD.decode(server_payload).ok()?;
        match (self.respond)(&challenge) {
            Some(reply) => Some(base64::engine::general_purpose::STANDARD.encode(reply).into_bytes()),
            None => Some(b"*".to_vec()),
        }
    }
}

/// CRAM-MD5 (RFC 2195): replies to the server's single challenge with
/// `"<user> <hex HMAC-MD5(password, challenge)>"`, then ends the
/// exchange.
pub struct CramMd5Producer {
    username: String,
    password: String,
    done: bool,
}

impl CramMd5Producer {
    /// Creates a CRAM-MD5 producer for `username`/`password`.
    #[must_use]
    pub const fn new(username: String, password: String) -> Self {
        Self { username, password, done: false }
    }
}

impl ContinuationProducer for CramMd5Producer {
    fn next(&mut self, server_payload: &[u8]) -> Option<Vec<u8>> {
        if self.done {
            return None;
        }
        self.done = true;
        let challenge = base64::engine::general_purpose::STANDARD.decode(server_payload).ok()?;
        let mut mac = Hmac::<Md5>::new_from_slice(self.password.as_bytes()).ok()?;
        mac.update(&challenge);
        let digest = mac.finalize().into_bytes();
        let hex = digest.iter().map(|b| format!("{b:02x}")).collect::<String>();
        let reply = format!("{} {hex}", self.username);
        Some(base64::engine::general_purpose::STANDARD.encode(reply).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_producer_aborts_on_none() {
        let mut producer = AuthProducer::new(|_challenge| None);
        let server_payload = base64::engine::general_purpose::STANDARD.encode(b"hello");
        assert_eq!(producer.next(server_payload.as_bytes()), Some(b"*".to_vec()));
    }

    #[test]
    fn auth_producer_encodes_reply() {
        let mut producer = AuthProducer::new(|challenge| Some(challenge.to_vec()));
        let server_payload = base64::engine::general_purpose::STANDARD.encode(b"ping");
        let reply = producer.next(server_payload.as_bytes()).unwrap();
        assert_eq!(reply, base64::engine::general_purpose::STANDARD.encode(b"ping").into_bytes());
    }

    #[test]
    fn cram_md5_replies_once_then_ends() {
        let mut producer = CramMd5Producer::new("user".to_string(), "pass".to_string());
        let challenge = base64::engine::general_purpose::STANDARD.encode(b"<1234@example.com>");
        let first = producer.next(challenge.as_bytes());
        assert!(first.is_some());
        assert!(producer.next(challenge.as_bytes()).is_none());
    }
}
