//! Incremental literal-aware line framing.
//!
//! The handler consumes raw lines from the Reader one at a time. Most
//! lines are complete responses; some announce a literal (`{n}` at the
//! end of the line) whose `n` raw octets follow immediately, themselves
//! possibly followed by more response text on the same "line". This
//! module tracks that state across calls. See `SPEC_FULL.md` §3, §4.3.

/// What the handler should currently do with incoming bytes.
#[derive(Debug, Default)]
pub struct ParserState {
    /// Remaining octets expected for the literal currently being read.
    pub expecting_data: usize,
    /// Bytes accumulated so far for the current literal.
    pub accumulated_data: Vec<u8>,
    /// The untagged response type and header line a completed literal
    /// will be filed under, once `expecting_data` reaches zero.
    pub literal_expected: Option<(String, String)>,
    /// Whether a `+` response should be routed to the shared
    /// continuation slot rather than logged as unexpected.
    pub continuation_expected: bool,
}

impl ParserState {
    /// Returns the trailing `{n}` literal length a response line
    /// announces, if any. `rest` is the text after the response type,
    /// e.g. `"FOO {123}"` -> `Some(123)`.
    #[must_use]
    pub fn literal_suffix_len(rest: &str) -> Option<u64> {
        let rest = rest.trim_end();
        let inner = rest.strip_suffix('}')?;
        let (_, digits) = inner.rsplit_once('{')?;
        let digits = digits.strip_suffix('+').unwrap_or(digits);
        digits.parse::<u64>().ok()
    }

    /// Begins accumulating a literal of `len` bytes, to be filed under
    /// `response_type` with `header_line` once complete.
    pub fn begin_literal(&mut self, response_type: impl Into<String>, header_line: impl Into<String>, len: u64) {
        self.expecting_data = len as usize;
        self.accumulated_data.clear();
        self.literal_expected = Some((response_type.into(), header_line.into()));
    }

    /// Feeds raw bytes into an in-progress literal. Returns the leftover
    /// bytes beyond the literal's length (the start of the next response
    /// line's tail), if the literal was completed by this call.
    pub fn feed_literal(&mut self, data: &[u8]) -> Option<Vec<u8>> {
        let need = self.expecting_data.saturating_sub(self.accumulated_data.len());
        let take = need.min(data.len());
        self.accumulated_data.extend_from_slice(&data[..take]);
        if self.accumulated_data.len() >= self.expecting_data {
            Some(data[take..].to_vec())
        } else {
            None
        }
    }

    /// Takes the completed literal's `(response_type, header_line,
    /// bytes)`, clearing the in-progress state.
    pub fn take_literal(&mut self) -> Option<(String, String, Vec<u8>)> {
        let (response_type, header_line) = self.literal_expected.take()?;
        self.expecting_data = 0;
        let bytes = std::mem::take(&mut self.accumulated_data);
        Some((response_type, header_line, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_literal_suffix() {
        assert_eq!(ParserState::literal_suffix_len("FETCH (BODY[] {42}"), Some(42));
        assert_eq!(ParserState::literal_suffix_len("FETCH (BODY[] {42+}"), Some(42));
        assert_eq!(ParserState::literal_suffix_len("OK done"), None);
    }

    #[test]
    fn accumulates_a_literal_across_feeds() {
        let mut st = ParserState::default();
        st.begin_literal("FETCH", "* 1 FETCH (BODY[] {10}", 10);
        assert!(st.feed_literal(b"abcde").is_none());
        let tail = st.feed_literal(b"fghij)\r\n").unwrap();
        assert_eq!(tail, b")\r\n");
        let (ty, header, bytes) = st.take_literal().unwrap();
        assert_eq!(ty, "FETCH");
        assert_eq!(header, "* 1 FETCH (BODY[] {10}");
        assert_eq!(bytes, b"abcdefghij");
    }
}
