//! Template engine using MiniJinja

use std::fmt;

use minijinja::Environment;
use serde::Serialize;

use crate::filters::{SqlFilters, register_filters};
use crate::{LiteralEscape, QuoteStyle, Result};

/// SQL template engine with filters bound to one dialect's quoting rules.
///
/// Templates see `identifier`, `qualified` and `sqlquote` filters:
///
/// ```
/// use dbnav_core::{LiteralEscape, QuoteStyle, TemplateEngine};
///
/// let engine = TemplateEngine::new(QuoteStyle::Backtick, LiteralEscape::Backslash);
/// let sql = engine
///     .render_with(
///         "CREATE VIEW {{ [db, name] | qualified }} AS SELECT {{ note | sqlquote }}",
///         &serde_json::json!({"db": "shop", "name": "v", "note": "it's"}),
///     )
///     .unwrap();
/// assert_eq!(sql, "CREATE VIEW `shop`.`v` AS SELECT 'it''s'");
/// ```
pub struct TemplateEngine {
    env: Environment<'static>,
    filters: SqlFilters,
}

impl TemplateEngine {
    pub fn new(quote_style: QuoteStyle, escape: LiteralEscape) -> Self {
        let filters = SqlFilters::new(quote_style, escape);
        let mut env = Environment::new();
        register_filters(&mut env, filters);
        Self { env, filters }
    }

    /// Render a SQL template with a serde-serializable context
    pub fn render_with<T: Serialize>(&self, template: &str, context: &T) -> Result<String> {
        let tmpl = self.env.template_from_str(template)?;
        Ok(tmpl.render(context)?)
    }
}

impl fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateEngine")
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DialectError;
    use serde_json::json;

    #[test]
    fn test_render_identifier() {
        let engine = TemplateEngine::new(QuoteStyle::DoubleQuote, LiteralEscape::Standard);
        let sql = engine
            .render_with("DROP TABLE {{ t | identifier }}", &json!({"t": "a\"b"}))
            .unwrap();
        assert_eq!(sql, "DROP TABLE \"a\"\"b\"");
    }

    #[test]
    fn test_render_with_fallback_name() {
        let engine = TemplateEngine::new(QuoteStyle::Bracket, LiteralEscape::Standard);
        let sql = engine
            .render_with(
                "CREATE TABLE {{ [schema, table or 'new_table'] | qualified }}",
                &json!({"schema": "dbo", "table": null}),
            )
            .unwrap();
        assert_eq!(sql, "CREATE TABLE [dbo].[new_table]");
    }

    #[test]
    fn test_syntax_error_is_template_error() {
        let engine = TemplateEngine::new(QuoteStyle::None, LiteralEscape::Standard);
        let err = engine.render_with("{{ unclosed", &json!({})).unwrap_err();
        assert!(matches!(err, DialectError::Template(_)));
    }
}
