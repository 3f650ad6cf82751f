//! Literal escaping helpers

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// How a backend escapes string literals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralEscape {
    /// Single quotes doubled
    #[default]
    Standard,
    /// Backslashes escaped, then single quotes doubled
    Backslash,
}

/// Double every occurrence of `ch`
pub fn double_char(value: &str, ch: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        out.push(c);
        if c == ch {
            out.push(c);
        }
    }
    out
}

pub fn escape_backslashes(value: &str) -> String {
    value.replace('\\', "\\\\")
}

/// Wrap a value in single quotes, escaping it for the given mode.
///
/// ```
/// use dbnav_core::{LiteralEscape, quote_literal};
///
/// assert_eq!(quote_literal("it's", LiteralEscape::Standard), "'it''s'");
/// assert_eq!(quote_literal(r"C:\tmp", LiteralEscape::Backslash), r"'C:\\tmp'");
/// ```
pub fn quote_literal(value: &str, mode: LiteralEscape) -> String {
    let escaped = match mode {
        LiteralEscape::Standard => double_char(value, '\''),
        LiteralEscape::Backslash => double_char(&escape_backslashes(value), '\''),
    };
    format!("'{escaped}'")
}

/// Quote a command argument the way redis-cli prints it.
///
/// Plain arguments pass through untouched; anything empty or containing
/// whitespace, quotes, backslashes or control characters is double-quoted.
pub fn quote_command_arg(arg: &str) -> Cow<'_, str> {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| !c.is_whitespace() && !c.is_control() && c != '"' && c != '\'' && c != '\\');
    if plain {
        return Cow::Borrowed(arg);
    }

    let mut out = String::with_capacity(arg.len() + 2);
    out.push('"');
    for c in arg.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    Cow::Owned(out)
}
