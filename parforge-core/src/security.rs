//! Credential redaction for generated Data Pump text.
//!
//! A generated parameter file or command line carries two secrets: the
//! password inside `USERID` and the `ENCRYPTION_PASSWORD` value. Anything
//! that is logged or echoed for review goes through [`redact_parfile`]
//! first. The original text is never modified.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Replacement for every masked secret
pub const MASK: &str = "****";

#[allow(clippy::expect_used)] // literal patterns, each exercised by the tests
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern compiles")
}

static USERID_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"\bUSERID=('[^']*'|\S+)"));
static ENCRYPTION_PASSWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"\bENCRYPTION_PASSWORD=('[^']*'|"[^"]*"|\S+)"#));

/// Masks the password of an Oracle connect string.
///
/// The password is the text after the first `/`, up to the connect
/// identifier (`@`), whitespace or a quote. A double-quoted password is
/// masked inside its quotes. Connect strings without a password, such as
/// `system` or `/ as sysdba`, are returned unchanged.
///
/// # Example
///
/// ```rust
/// use parforge_core::security::redact_userid;
///
/// assert_eq!(redact_userid("hr/secret@orcl"), "hr/****@orcl");
/// assert_eq!(redact_userid("/ as sysdba"), "/ as sysdba");
/// ```
pub fn redact_userid(userid: &str) -> String {
    let Some((user, rest)) = userid.split_once('/') else {
        return userid.to_string();
    };

    if let Some(quoted) = rest.strip_prefix('"') {
        return match quoted.split_once('"') {
            Some((password, tail)) if !password.is_empty() => {
                format!("{}/\"{}\"{}", user, MASK, tail)
            }
            _ => userid.to_string(),
        };
    }

    let password_len = rest
        .find(|c: char| c == '@' || c == '\'' || c == '"' || c.is_whitespace())
        .unwrap_or(rest.len());
    if password_len == 0 {
        return userid.to_string();
    }

    let tail = rest.get(password_len..).unwrap_or_default();
    format!("{}/{}{}", user, MASK, tail)
}

/// Masks every credential in a parameter file body or command line.
///
/// # Example
///
/// ```rust
/// use parforge_core::security::redact_parfile;
///
/// let body = "USERID='hr/secret@orcl'\nENCRYPTION_PASSWORD=hunter2\nSCHEMAS=HR";
/// assert_eq!(
///     redact_parfile(body),
///     "USERID='hr/****@orcl'\nENCRYPTION_PASSWORD=****\nSCHEMAS=HR"
/// );
/// ```
pub fn redact_parfile(text: &str) -> String {
    let masked = ENCRYPTION_PASSWORD_RE.replace_all(text, format!("ENCRYPTION_PASSWORD={}", MASK));
    USERID_RE
        .replace_all(&masked, |caps: &Captures<'_>| {
            let value = caps.get(1).map_or("", |m| m.as_str());
            format!("USERID={}", redact_userid(value))
        })
        .into_owned()
}
