//! The static command table and argument quoting.
//!
//! See `SPEC_FULL.md` §3 ("Command Table") and `spec.md` §4.2's quoting
//! rule.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use crate::protocol::state::StateKind;

/// Where a command is legal, and whether it may be pipelined.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    /// States in which the command may be dispatched.
    pub states: &'static [StateKind],
    /// Whether this command may be in flight alongside other pipelineable
    /// commands. Non-pipelineable commands require the in-flight set to be
    /// empty both before dispatch and until they complete.
    pub pipelineable: bool,
}

macro_rules! spec {
    ($states:expr, $pipelineable:expr) => {
        CommandSpec {
            states: $states,
            pipelineable: $pipelineable,
        }
    };
}

use StateKind::{Authenticated, NotAuthenticated, Selected};

const ANY: &[StateKind] = &[NotAuthenticated, Authenticated, Selected];
const AUTH_PLUS: &[StateKind] = &[Authenticated, Selected];
const NOT_AUTH: &[StateKind] = &[NotAuthenticated];
const SELECTED_ONLY: &[StateKind] = &[Selected];

/// The immutable, compiled-in base command table.
static BASE_TABLE: LazyLock<HashMap<&'static str, CommandSpec>> = LazyLock::new(|| {
    HashMap::from([
        ("CAPABILITY", spec!(ANY, true)),
        ("NOOP", spec!(ANY, true)),
        ("LOGOUT", spec!(ANY, false)),
        ("STARTTLS", spec!(NOT_AUTH, false)),
        ("LOGIN", spec!(NOT_AUTH, false)),
        ("AUTHENTICATE", spec!(NOT_AUTH, false)),
        ("SELECT", spec!(AUTH_PLUS, false)),
        ("EXAMINE", spec!(AUTH_PLUS, false)),
        ("CREATE", spec!(AUTH_PLUS, true)),
        ("DELETE", spec!(AUTH_PLUS, true)),
        ("RENAME", spec!(AUTH_PLUS, true)),
        ("SUBSCRIBE", spec!(AUTH_PLUS, true)),
        ("UNSUBSCRIBE", spec!(AUTH_PLUS, true)),
        ("LIST", spec!(AUTH_PLUS, true)),
        ("LSUB", spec!(AUTH_PLUS, true)),
        ("STATUS", spec!(AUTH_PLUS, true)),
        ("APPEND", spec!(AUTH_PLUS, false)),
        ("NAMESPACE", spec!(AUTH_PLUS, true)),
        ("ID", spec!(ANY, true)),
        ("ENABLE", spec!(AUTH_PLUS, false)),
        ("IDLE", spec!(AUTH_PLUS, false)),
        ("CHECK", spec!(SELECTED_ONLY, true)),
        ("CLOSE", spec!(SELECTED_ONLY, false)),
        ("EXPUNGE", spec!(SELECTED_ONLY, true)),
        ("SEARCH", spec!(SELECTED_ONLY, true)),
        ("UID SEARCH", spec!(SELECTED_ONLY, true)),
        ("FETCH", spec!(SELECTED_ONLY, true)),
        ("UID FETCH", spec!(SELECTED_ONLY, true)),
        ("STORE", spec!(SELECTED_ONLY, true)),
        ("UID STORE", spec!(SELECTED_ONLY, true)),
        ("COPY", spec!(SELECTED_ONLY, true)),
        ("UID COPY", spec!(SELECTED_ONLY, true)),
        ("MOVE", spec!(SELECTED_ONLY, true)),
        ("UID MOVE", spec!(SELECTED_ONLY, true)),
        ("SORT", spec!(SELECTED_ONLY, true)),
        ("UID SORT", spec!(SELECTED_ONLY, true)),
        ("THREAD", spec!(SELECTED_ONLY, true)),
        ("UID THREAD", spec!(SELECTED_ONLY, true)),
        ("GETQUOTA", spec!(AUTH_PLUS, true)),
        ("GETQUOTAROOT", spec!(AUTH_PLUS, true)),
        ("SETQUOTA", spec!(AUTH_PLUS, true)),
        ("GETACL", spec!(AUTH_PLUS, true)),
        ("SETACL", spec!(AUTH_PLUS, true)),
        ("DELETEACL", spec!(AUTH_PLUS, true)),
        ("MYRIGHTS", spec!(AUTH_PLUS, true)),
        ("SETANNOTATION", spec!(AUTH_PLUS, true)),
        ("GETANNOTATION", spec!(AUTH_PLUS, true)),
    ])
});

/// Mutable override layer atop `BASE_TABLE`, for `xatom`-style dynamic
/// registration of server extensions. Guarded the same way
/// `commands_lock` guards `tagged_commands` in `spec.md` §5.
static XATOM_TABLE: Mutex<Vec<(String, CommandSpec)>> = Mutex::new(Vec::new());

/// Registers an additional command, e.g. one advertised only via a
/// server-specific `CAPABILITY` token.
pub fn register_xatom(name: impl Into<String>, spec: CommandSpec) {
    XATOM_TABLE
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .push((name.into(), spec));
}

/// Looks up a command by name (case-insensitive), consulting the xatom
/// override layer first.
#[must_use]
pub fn lookup(name: &str) -> Option<CommandSpec> {
    let upper = name.to_ascii_uppercase();
    let xatom = XATOM_TABLE.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    if let Some((_, spec)) = xatom.iter().find(|(n, _)| n.eq_ignore_ascii_case(&upper)) {
        return Some(*spec);
    }
    drop(xatom);
    BASE_TABLE.get(upper.as_str()).copied()
}

/// Characters that may appear unquoted in an IMAP atom, per `spec.md`
/// §4.2's quoting rule.
fn is_atom_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_!#$%&'*+,.:;<=>?^`|~-".contains(c)
}

/// Quotes `s` with double quotes (escaping `\` and `"`) iff it is
/// non-empty, not already wrapped in `"…"` or `(…)`, and contains any
/// character outside the atom-safe set.
#[must_use]
pub fn quote_if_needed(s: &str) -> String {
    if s.is_empty() {
        return "\"\"".to_string();
    }
    let already_wrapped = (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('(') && s.ends_with(')') && s.len() >= 2);
    if already_wrapped {
        return s.to_string();
    }
    if s.chars().all(is_atom_safe) {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '\\' || c == '"' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Normalizes bare `CR` or `LF` inside a literal body to `CRLF`, as
/// required before dispatching an `APPEND` literal.
#[must_use]
pub fn normalize_literal_crlf(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        match data[i] {
            b'\r' if data.get(i + 1) == Some(&b'\n') => {
                out.push(b'\r');
                out.push(b'\n');
                i += 2;
            }
            b'\r' | b'\n' => {
                out.push(b'\r');
                out.push(b'\n');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoting_passes_through_safe_atoms() {
        assert_eq!(quote_if_needed("INBOX"), "INBOX");
        assert_eq!(quote_if_needed(""), "\"\"");
    }

    #[test]
    fn quoting_wraps_unsafe_strings() {
        assert_eq!(quote_if_needed("has space"), "\"has space\"");
        assert_eq!(quote_if_needed("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote_if_needed("a\\b"), "\"a\\\\b\"");
    }

    #[test]
    fn quoting_leaves_existing_quotes_and_lists_alone() {
        assert_eq!(quote_if_needed("\"already\""), "\"already\"");
        assert_eq!(quote_if_needed("(FLAGGED)"), "(FLAGGED)");
    }

    #[test]
    fn login_and_select_require_the_right_states() {
        let login = lookup("LOGIN").unwrap();
        assert!(!login.pipelineable);
        assert!(login.states.contains(&StateKind::NotAuthenticated));
        assert!(!login.states.contains(&StateKind::Selected));

        let fetch = lookup("FETCH").unwrap();
        assert!(fetch.pipelineable);
        assert_eq!(fetch.states, SELECTED_ONLY);
    }

    #[test]
    fn literal_crlf_normalization() {
        assert_eq!(normalize_literal_crlf(b"a\nb\rc\r\nd"), b"a\r\nb\r\nc\r\nd");
    }
}
