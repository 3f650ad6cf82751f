//! Statement pieces shared by the SQL-family dialects

use serde::Serialize;

use dbnav_core::{ColumnSpec, Dialect, Pagination, Result};

/// `SELECT <columns> FROM <from> [WHERE a AND b] ORDER BY <order_by>`
pub(crate) fn select(columns: &str, from: &str, conditions: &[String], order_by: &str) -> String {
    let mut sql = format!("SELECT {columns} FROM {from}");
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    if !order_by.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(order_by);
    }
    sql
}

/// `<column> = '<value>'`
pub(crate) fn eq<D: Dialect + ?Sized>(dialect: &D, column: &str, value: &str) -> String {
    format!("{column} = {}", dialect.quote_literal(value))
}

pub(crate) fn page(qualified: &str, page: &Pagination) -> String {
    format!("SELECT * FROM {qualified} {}", page.limit_offset())
}

pub(crate) fn count(qualified: &str) -> String {
    format!("SELECT COUNT(*) FROM {qualified}")
}

/// `<name> <type> [NOT NULL] [DEFAULT '<value>']`
pub(crate) fn column_definition<D: Dialect + ?Sized>(
    dialect: &D,
    column: &ColumnSpec,
) -> Result<String> {
    let mut definition = format!(
        "{} {}",
        dialect.quote_identifier(&column.name),
        dialect.native_type(column)?
    );
    if !column.nullable {
        definition.push_str(" NOT NULL");
    }
    if let Some(default) = &column.default {
        definition.push_str(" DEFAULT ");
        definition.push_str(&dialect.quote_literal(default));
    }
    Ok(definition)
}

/// Names handed to object templates; unset names fall back inside the
/// template itself
#[derive(Debug, Serialize)]
pub(crate) struct TemplateContext<'a> {
    pub database: Option<&'a str>,
    pub schema: Option<&'a str>,
    pub table: Option<&'a str>,
    pub name: Option<&'a str>,
    pub charset: Option<&'a str>,
}

impl<'a> TemplateContext<'a> {
    pub fn from_request(request: &'a dbnav_core::OperationRequest) -> Self {
        Self {
            database: request.database(),
            schema: request.schema(),
            table: request.table(),
            name: request.name(),
            charset: None,
        }
    }

    pub fn with_schema(mut self, schema: &'a str) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_charset(mut self, charset: &'a str) -> Self {
        self.charset = Some(charset);
        self
    }
}
