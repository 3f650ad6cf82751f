//! Operation requests: one operation plus the generic parameters it needs

use serde::{Deserialize, Serialize};

use crate::{ColumnSpec, DialectError, Operation, RequestField, Result};

/// A single statement-generation request.
///
/// ```
/// use dbnav_core::{Operation, OperationRequest};
///
/// let request = OperationRequest::new(Operation::BuildPage)
///     .with_database("shop")
///     .with_table("orders")
///     .with_page_size(20)
///     .with_page_index(2);
/// assert_eq!(request.table(), Some("orders"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRequest {
    operation: Operation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    table: Option<String>,
    /// View, procedure, function, trigger, index or user name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    new_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    column: Option<ColumnSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    page_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    page_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password: Option<String>,
}

impl OperationRequest {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            database: None,
            schema: None,
            table: None,
            name: None,
            new_name: None,
            column: None,
            page_size: None,
            page_index: None,
            cursor: None,
            password: None,
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_new_name(mut self, new_name: impl Into<String>) -> Self {
        self.new_name = Some(new_name.into());
        self
    }

    pub fn with_column(mut self, column: ColumnSpec) -> Self {
        self.column = Some(column);
        self
    }

    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_page_index(mut self, page_index: i64) -> Self {
        self.page_index = Some(page_index);
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn new_name(&self) -> Option<&str> {
        self.new_name.as_deref()
    }

    pub fn column(&self) -> Option<&ColumnSpec> {
        self.column.as_ref()
    }

    pub fn page_size(&self) -> Option<i64> {
        self.page_size
    }

    pub fn page_index(&self) -> Option<i64> {
        self.page_index
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Textual value of a field, if it is set
    pub fn field(&self, field: RequestField) -> Option<&str> {
        match field {
            RequestField::Database => self.database(),
            RequestField::Schema => self.schema(),
            RequestField::Table => self.table(),
            RequestField::Name => self.name(),
            RequestField::NewName => self.new_name(),
            RequestField::Column => self.column.as_ref().map(|c| c.name.as_str()),
            RequestField::ColumnType => self.column.as_ref().map(|c| c.logical_type.as_str()),
            RequestField::Cursor => self.cursor(),
            RequestField::Password => self.password(),
            RequestField::PageSize | RequestField::PageIndex => None,
        }
    }

    /// Value of a field, or `InvalidRequest` if it is absent or blank
    pub fn require(&self, field: RequestField) -> Result<&str> {
        match self.field(field) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(DialectError::invalid(field, "is required")),
        }
    }

    /// The column spec, or `InvalidRequest` if absent
    pub fn require_column(&self) -> Result<&ColumnSpec> {
        self.column
            .as_ref()
            .ok_or_else(|| DialectError::invalid(RequestField::Column, "is required"))
    }

    /// Check the request against the fields an operation needs.
    ///
    /// Optional identifiers that are set must not be blank.
    pub fn validate(&self, required: &[RequestField]) -> Result<()> {
        for field in required {
            match field {
                RequestField::PageSize | RequestField::PageIndex => {}
                _ => {
                    self.require(*field)?;
                }
            }
        }

        const IDENTIFIER_FIELDS: [RequestField; 6] = [
            RequestField::Database,
            RequestField::Schema,
            RequestField::Table,
            RequestField::Name,
            RequestField::NewName,
            RequestField::Column,
        ];
        for field in IDENTIFIER_FIELDS {
            if self.field(field).is_some_and(|value| value.trim().is_empty()) {
                return Err(DialectError::invalid(field, "cannot be blank"));
            }
        }

        const TEXT_FIELDS: [RequestField; 9] = [
            RequestField::Database,
            RequestField::Schema,
            RequestField::Table,
            RequestField::Name,
            RequestField::NewName,
            RequestField::Column,
            RequestField::ColumnType,
            RequestField::Cursor,
            RequestField::Password,
        ];
        for field in TEXT_FIELDS {
            if self.field(field).is_some_and(|value| value.contains('\0')) {
                return Err(DialectError::invalid(field, "contains a NUL character"));
            }
        }

        if let Some(page_size) = self.page_size
            && page_size <= 0
        {
            return Err(DialectError::invalid(
                RequestField::PageSize,
                format!("must be greater than zero, got {page_size}"),
            ));
        }
        if let Some(page_index) = self.page_index
            && page_index < 0
        {
            return Err(DialectError::invalid(
                RequestField::PageIndex,
                format!("must not be negative, got {page_index}"),
            ));
        }

        Ok(())
    }
}
