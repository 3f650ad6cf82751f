//! SQL filters for MiniJinja templates

use minijinja::{Environment, Value};

use crate::{LiteralEscape, QuoteStyle, quote_literal};

/// SQL-specific filters, bound to one dialect's quoting rules
#[derive(Debug, Clone, Copy)]
pub struct SqlFilters {
    quote_style: QuoteStyle,
    escape: LiteralEscape,
}

impl SqlFilters {
    pub fn new(quote_style: QuoteStyle, escape: LiteralEscape) -> Self {
        Self {
            quote_style,
            escape,
        }
    }

    /// Quote a string literal
    pub fn sqlquote(&self, value: &str) -> String {
        quote_literal(value, self.escape)
    }

    /// Quote an identifier (table/column name)
    pub fn identifier(&self, value: &str) -> String {
        self.quote_style.quote(value)
    }

    /// Quote and dot-join the defined parts of a name, skipping missing ones
    pub fn qualified(&self, parts: &[Value]) -> String {
        let parts: Vec<&str> = parts
            .iter()
            .filter(|part| !part.is_undefined() && !part.is_none())
            .filter_map(|part| part.as_str())
            .collect();
        self.quote_style.qualify(parts)
    }
}

/// Register the SQL filters with a MiniJinja environment
pub fn register_filters(env: &mut Environment, filters: SqlFilters) {
    env.add_filter("sqlquote", move |value: String| filters.sqlquote(&value));
    env.add_filter("identifier", move |value: String| filters.identifier(&value));
    env.add_filter("qualified", move |parts: Vec<Value>| filters.qualified(&parts));
}
