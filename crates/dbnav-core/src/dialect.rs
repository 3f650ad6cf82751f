//! The dialect contract

use std::fmt;

use crate::{
    BackendKind, Capabilities, ColumnSpec, DialectError, LiteralEscape, Operation,
    OperationRequest, QuoteStyle, RequestField, Result, Statement, StatementResult, quote_literal,
};

/// Statement generation for one backend.
///
/// Implementors supply identity, a capability table, quoting rules, type
/// mapping and [`render`](Self::render). Callers go through
/// [`generate`](Self::generate), which consults the capability table before
/// validating and rendering.
pub trait Dialect: Send + Sync + fmt::Debug {
    fn backend(&self) -> BackendKind;

    fn capabilities(&self) -> &Capabilities;

    fn quote_style(&self) -> QuoteStyle;

    fn literal_escape(&self) -> LiteralEscape {
        LiteralEscape::Standard
    }

    /// Map a column's logical type to the backend keyword
    fn native_type(&self, column: &ColumnSpec) -> Result<String>;

    /// Build the statement for a validated request whose operation this
    /// dialect declares as supported.
    fn render(&self, request: &OperationRequest) -> Result<Statement>;

    fn name(&self) -> &'static str {
        self.backend().tag()
    }

    fn supports(&self, operation: Operation) -> bool {
        self.capabilities().supports(operation)
    }

    /// Fields a request must carry for this dialect to render `operation`
    fn required_fields(&self, operation: Operation) -> &'static [RequestField] {
        operation.required_fields()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.quote_style().quote(ident)
    }

    fn unquote_identifier(&self, quoted: &str) -> Option<String> {
        self.quote_style().unquote(quoted)
    }

    fn quote_literal(&self, value: &str) -> String {
        quote_literal(value, self.literal_escape())
    }

    /// Quote and dot-join the present parts of a name
    fn qualify(&self, parts: &[Option<&str>]) -> String {
        self.quote_style().qualify(parts.iter().flatten().copied())
    }

    /// Generate the statement for a request.
    ///
    /// Unsupported operations come back as [`StatementResult::Unsupported`]
    /// without the request being validated.
    fn generate(&self, request: &OperationRequest) -> Result<StatementResult> {
        let operation = request.operation();
        if let Some(reason) = self.capabilities().unsupported_reason(operation) {
            tracing::trace!(backend = %self.backend(), %operation, reason, "operation unsupported");
            return Ok(StatementResult::unsupported(operation, reason));
        }

        request.validate(self.required_fields(operation))?;
        let statement = self.render(request)?;
        tracing::trace!(backend = %self.backend(), %operation, "statement generated");
        Ok(StatementResult::Generated(statement))
    }

    /// Error for an operation `render` has no arm for
    fn mismatch(&self, operation: Operation) -> DialectError {
        tracing::error!(
            backend = %self.backend(),
            %operation,
            "capability table and renderer disagree"
        );
        DialectError::CapabilityMismatch {
            backend: self.backend(),
            operation,
        }
    }
}

/// One method per operation, building the request for the caller.
///
/// ```ignore
/// let sql = dialect.build_page("shop", "orders", 20, 2)?;
/// ```
pub trait DialectExt: Dialect {
    fn show_databases(&self) -> Result<StatementResult> {
        self.generate(&OperationRequest::new(Operation::ShowDatabases))
    }

    fn show_schemas(&self, database: &str) -> Result<StatementResult> {
        self.generate(&in_database(Operation::ShowSchemas, database))
    }

    fn show_tables(&self, database: &str) -> Result<StatementResult> {
        self.generate(&in_database(Operation::ShowTables, database))
    }

    fn show_columns(&self, database: &str, table: &str) -> Result<StatementResult> {
        self.generate(&in_database(Operation::ShowColumns, database).with_table(table))
    }

    fn show_views(&self, database: &str) -> Result<StatementResult> {
        self.generate(&in_database(Operation::ShowViews, database))
    }

    fn show_system_views(&self, database: &str) -> Result<StatementResult> {
        self.generate(&in_database(Operation::ShowSystemViews, database))
    }

    fn show_users(&self) -> Result<StatementResult> {
        self.generate(&OperationRequest::new(Operation::ShowUsers))
    }

    fn show_triggers(&self, database: &str) -> Result<StatementResult> {
        self.generate(&in_database(Operation::ShowTriggers, database))
    }

    fn show_procedures(&self, database: &str) -> Result<StatementResult> {
        self.generate(&in_database(Operation::ShowProcedures, database))
    }

    fn show_functions(&self, database: &str) -> Result<StatementResult> {
        self.generate(&in_database(Operation::ShowFunctions, database))
    }

    fn show_indexes(&self, database: &str, table: &str) -> Result<StatementResult> {
        self.generate(&in_database(Operation::ShowIndexes, database).with_table(table))
    }

    fn add_column(&self, table: &str, column: ColumnSpec) -> Result<StatementResult> {
        self.generate(
            &OperationRequest::new(Operation::AddColumn)
                .with_table(table)
                .with_column(column),
        )
    }

    /// Redefine a column, optionally renaming it
    fn update_column(
        &self,
        table: &str,
        column: ColumnSpec,
        new_name: Option<&str>,
    ) -> Result<StatementResult> {
        let mut request = OperationRequest::new(Operation::UpdateColumn)
            .with_table(table)
            .with_column(column);
        if let Some(new_name) = new_name {
            request = request.with_new_name(new_name);
        }
        self.generate(&request)
    }

    fn rename_column(&self, table: &str, column: &str, new_name: &str) -> Result<StatementResult> {
        self.generate(
            &OperationRequest::new(Operation::RenameColumn)
                .with_table(table)
                .with_column(ColumnSpec::new(column, ""))
                .with_new_name(new_name),
        )
    }

    /// First page of a table
    fn build_page_sql(
        &self,
        database: &str,
        table: &str,
        page_size: i64,
    ) -> Result<StatementResult> {
        self.build_page(database, table, page_size, 0)
    }

    fn build_page(
        &self,
        database: &str,
        table: &str,
        page_size: i64,
        page_index: i64,
    ) -> Result<StatementResult> {
        self.generate(
            &in_database(Operation::BuildPage, database)
                .with_table(table)
                .with_page_size(page_size)
                .with_page_index(page_index),
        )
    }

    fn count_sql(&self, database: &str, table: &str) -> Result<StatementResult> {
        self.generate(&in_database(Operation::Count, database).with_table(table))
    }

    fn create_database(&self, database: &str) -> Result<StatementResult> {
        self.generate(&in_database(Operation::CreateDatabase, database))
    }

    fn truncate_database(&self, database: &str) -> Result<StatementResult> {
        self.generate(&in_database(Operation::TruncateDatabase, database))
    }

    fn rename_table(&self, database: &str, table: &str, new_name: &str) -> Result<StatementResult> {
        self.generate(
            &in_database(Operation::RenameTable, database)
                .with_table(table)
                .with_new_name(new_name),
        )
    }

    fn rename_view(&self, database: &str, view: &str, new_name: &str) -> Result<StatementResult> {
        self.generate(&renamed(Operation::RenameView, database, view, new_name))
    }

    fn rename_procedure(
        &self,
        database: &str,
        procedure: &str,
        new_name: &str,
    ) -> Result<StatementResult> {
        self.generate(&renamed(Operation::RenameProcedure, database, procedure, new_name))
    }

    fn rename_function(
        &self,
        database: &str,
        function: &str,
        new_name: &str,
    ) -> Result<StatementResult> {
        self.generate(&renamed(Operation::RenameFunction, database, function, new_name))
    }

    fn rename_trigger(
        &self,
        database: &str,
        trigger: &str,
        new_name: &str,
    ) -> Result<StatementResult> {
        self.generate(&renamed(Operation::RenameTrigger, database, trigger, new_name))
    }

    fn show_table_source(&self, database: &str, table: &str) -> Result<StatementResult> {
        self.generate(&in_database(Operation::ShowTableSource, database).with_table(table))
    }

    fn show_view_source(&self, database: &str, view: &str) -> Result<StatementResult> {
        self.generate(&in_database(Operation::ShowViewSource, database).with_name(view))
    }

    fn show_procedure_source(&self, database: &str, procedure: &str) -> Result<StatementResult> {
        self.generate(&in_database(Operation::ShowProcedureSource, database).with_name(procedure))
    }

    fn show_function_source(&self, database: &str, function: &str) -> Result<StatementResult> {
        self.generate(&in_database(Operation::ShowFunctionSource, database).with_name(function))
    }

    fn show_trigger_source(&self, database: &str, trigger: &str) -> Result<StatementResult> {
        self.generate(&in_database(Operation::ShowTriggerSource, database).with_name(trigger))
    }

    fn create_user(&self, user: &str, password: &str) -> Result<StatementResult> {
        self.generate(
            &OperationRequest::new(Operation::CreateUser)
                .with_name(user)
                .with_password(password),
        )
    }

    fn table_template(&self) -> Result<StatementResult> {
        self.generate(&OperationRequest::new(Operation::TableTemplate))
    }

    fn view_template(&self) -> Result<StatementResult> {
        self.generate(&OperationRequest::new(Operation::ViewTemplate))
    }

    fn procedure_template(&self) -> Result<StatementResult> {
        self.generate(&OperationRequest::new(Operation::ProcedureTemplate))
    }

    fn trigger_template(&self) -> Result<StatementResult> {
        self.generate(&OperationRequest::new(Operation::TriggerTemplate))
    }

    fn function_template(&self) -> Result<StatementResult> {
        self.generate(&OperationRequest::new(Operation::FunctionTemplate))
    }

    fn drop_index(&self, table: &str, index: &str) -> Result<StatementResult> {
        self.generate(
            &OperationRequest::new(Operation::DropIndex)
                .with_table(table)
                .with_name(index),
        )
    }

    fn drop_trigger(&self, trigger: &str) -> Result<StatementResult> {
        self.generate(&OperationRequest::new(Operation::DropTrigger).with_name(trigger))
    }

    fn process_list(&self) -> Result<StatementResult> {
        self.generate(&OperationRequest::new(Operation::ProcessList))
    }

    fn variable_list(&self) -> Result<StatementResult> {
        self.generate(&OperationRequest::new(Operation::VariableList))
    }

    fn status_list(&self) -> Result<StatementResult> {
        self.generate(&OperationRequest::new(Operation::StatusList))
    }

    fn ping(&self) -> Result<StatementResult> {
        self.generate(&OperationRequest::new(Operation::Ping))
    }
}

impl<T: Dialect + ?Sized> DialectExt for T {}

fn in_database(operation: Operation, database: &str) -> OperationRequest {
    OperationRequest::new(operation).with_database(database)
}

fn renamed(operation: Operation, database: &str, name: &str, new_name: &str) -> OperationRequest {
    in_database(operation, database)
        .with_name(name)
        .with_new_name(new_name)
}
