//! Identifier quoting styles

use serde::{Deserialize, Serialize};

use crate::escape::double_char;

/// How a backend delimits identifiers.
///
/// Quoting doubles any embedded closing delimiter, so
/// `unquote(quote(x)) == Some(x)` holds for every style:
///
/// ```
/// use dbnav_core::QuoteStyle;
///
/// let quoted = QuoteStyle::Bracket.quote("odd]name");
/// assert_eq!(quoted, "[odd]]name]");
/// assert_eq!(QuoteStyle::Bracket.unquote(&quoted).as_deref(), Some("odd]name"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStyle {
    /// `` `name` `` (MySQL, MariaDB)
    Backtick,
    /// `"name"` (PostgreSQL, SQLite)
    DoubleQuote,
    /// `[name]` (SQL Server)
    Bracket,
    /// Names are used verbatim and validated by the dialect instead
    None,
}

impl QuoteStyle {
    /// Opening and closing delimiters
    pub fn delimiters(&self) -> Option<(char, char)> {
        match self {
            Self::Backtick => Some(('`', '`')),
            Self::DoubleQuote => Some(('"', '"')),
            Self::Bracket => Some(('[', ']')),
            Self::None => None,
        }
    }

    pub fn quote(&self, ident: &str) -> String {
        match self.delimiters() {
            Some((open, close)) => {
                let mut out = String::with_capacity(ident.len() + 2);
                out.push(open);
                out.push_str(&double_char(ident, close));
                out.push(close);
                out
            }
            None => ident.to_string(),
        }
    }

    /// Reverse [`quote`](Self::quote). Returns `None` when the input is not a
    /// well-formed quoted identifier.
    pub fn unquote(&self, quoted: &str) -> Option<String> {
        let Some((open, close)) = self.delimiters() else {
            return Some(quoted.to_string());
        };

        let inner = quoted.strip_prefix(open)?.strip_suffix(close)?;
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == close {
                // a lone closing delimiter would have ended the identifier
                if chars.next() != Some(close) {
                    return None;
                }
            }
            out.push(c);
        }
        Some(out)
    }

    /// Quote each part and join with `.`
    pub fn qualify<'a, I>(&self, parts: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        parts
            .into_iter()
            .map(|part| self.quote(part))
            .collect::<Vec<_>>()
            .join(".")
    }
}
