//! Hand-written line classifier.
//!
//! Per `spec.md` §9 ("Regex-driven parsing... replace with a
//! hand-written line scanner"), tagged/untagged/continuation
//! classification is a small amount of string splitting, not a grammar
//! that needs backtracking.

/// The three shapes an IMAP response line can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// `"<tag> <status> <rest>"`.
    Tagged {
        /// The command tag this completes.
        tag: String,
        /// `"OK"`, `"NO"`, `"BAD"`, or any other token in that position
        /// (the dispatcher treats anything else as unexpected).
        status: String,
        /// Text following the status.
        rest: String,
    },
    /// `"* <TYPE>[ <rest>]"` or `"* <n> <TYPE>[ <rest>]"` — the numeric
    /// form's leading count is folded into `rest` as its first token.
    Untagged {
        /// The response type, e.g. `"EXISTS"`, `"FETCH"`, `"OK"`.
        response_type: String,
        /// Everything after the type (may be empty).
        rest: String,
    },
    /// `"+[ <rest>]"`.
    Continuation {
        /// Text following the `+`, if any.
        rest: Option<String>,
    },
    /// A line that matched none of the above; forwarded as-is so the
    /// caller can log-and-ignore it per `spec.md` §7.
    Unrecognized(String),
}

/// Classifies a single response line with its trailing CRLF/LF already
/// stripped.
#[must_use]
pub fn classify(line: &str) -> LineKind {
    if let Some(body) = line.strip_prefix("* ") {
        return classify_untagged(body);
    }
    if line == "*" {
        return LineKind::Untagged {
            response_type: String::new(),
            rest: String::new(),
        };
    }
    if let Some(rest) = line.strip_prefix('+') {
        let rest = rest.strip_prefix(' ').unwrap_or(rest);
        return LineKind::Continuation {
            rest: if rest.is_empty() { None } else { Some(rest.to_string()) },
        };
    }
    if let Some((tag, remainder)) = line.split_once(' ') {
        let (status, rest) = remainder.split_once(' ').unwrap_or((remainder, ""));
        return LineKind::Tagged {
            tag: tag.to_string(),
            status: status.to_string(),
            rest: rest.to_string(),
        };
    }
    LineKind::Unrecognized(line.to_string())
}

fn classify_untagged(body: &str) -> LineKind {
    let (first, remainder) = body.split_once(' ').unwrap_or((body, ""));
    if !first.is_empty() && first.bytes().all(|b| b.is_ascii_digit()) {
        // Numeric form: "* <n> <TYPE>[ <rest>]" — fold <n> into rest.
        let (ty, tail) = remainder.split_once(' ').unwrap_or((remainder, ""));
        let rest = if tail.is_empty() {
            first.to_string()
        } else {
            format!("{first} {tail}")
        };
        return LineKind::Untagged {
            response_type: ty.to_string(),
            rest,
        };
    }
    LineKind::Untagged {
        response_type: first.to_string(),
        rest: remainder.to_string(),
    }
}

/// If `rest` begins with a bracketed response code (`[UIDVALIDITY 5]
/// trailing text`), returns `(code, trailing text)`.
#[must_use]
pub fn extract_response_code(rest: &str) -> Option<(String, String)> {
    let rest = rest.trim_start();
    let inner = rest.strip_prefix('[')?;
    let (code, tail) = inner.split_once(']')?;
    Some((code.to_string(), tail.trim_start().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_tagged_completion() {
        assert_eq!(
            classify("A0001 OK LOGIN completed"),
            LineKind::Tagged {
                tag: "A0001".to_string(),
                status: "OK".to_string(),
                rest: "LOGIN completed".to_string(),
            }
        );
    }

    #[test]
    fn classifies_plain_untagged() {
        assert_eq!(
            classify("* CAPABILITY IMAP4rev1 IDLE"),
            LineKind::Untagged {
                response_type: "CAPABILITY".to_string(),
                rest: "IMAP4rev1 IDLE".to_string(),
            }
        );
    }

    #[test]
    fn classifies_numeric_untagged() {
        assert_eq!(
            classify("* 23 EXISTS"),
            LineKind::Untagged {
                response_type: "EXISTS".to_string(),
                rest: "23".to_string(),
            }
        );
        assert_eq!(
            classify("* 5 FETCH (FLAGS (\\Seen))"),
            LineKind::Untagged {
                response_type: "FETCH".to_string(),
                rest: "5 (FLAGS (\\Seen))".to_string(),
            }
        );
    }

    #[test]
    fn classifies_continuation() {
        assert_eq!(
            classify("+ go ahead"),
            LineKind::Continuation {
                rest: Some("go ahead".to_string())
            }
        );
        assert_eq!(classify("+"), LineKind::Continuation { rest: None });
    }

    #[test]
    fn extracts_response_code() {
        assert_eq!(
            extract_response_code("[READ-ONLY] INBOX selected"),
            Some(("READ-ONLY".to_string(), "INBOX selected".to_string()))
        );
        assert_eq!(extract_response_code("no code here"), None);
    }
}
