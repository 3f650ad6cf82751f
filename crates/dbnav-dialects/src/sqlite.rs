//! SQLite dialect

use dbnav_core::{
    BackendKind, Capabilities, ColumnSpec, Dialect, DialectError, GeneratorConfig, LiteralEscape,
    LogicalType, Operation, OperationRequest, Pagination, QuoteStyle, RequestField, Result,
    Statement, TemplateEngine,
};

use crate::ansi::{self, TemplateContext};

/// Schema name of the primary database file
pub const MAIN_SCHEMA: &str = "main";

const NO_ROUTINES: &str = "SQLite has no stored procedures or SQL-defined functions";
const NO_USERS: &str = "SQLite has no user accounts";
const NO_SERVER: &str = "SQLite is an embedded engine with no server to inspect";

const CAPABILITIES: Capabilities = Capabilities::all_except(&[
    (
        Operation::ShowSchemas,
        "SQLite has no schemas; attached databases are listed by show-databases",
    ),
    (Operation::ShowUsers, NO_USERS),
    (Operation::ShowProcedures, NO_ROUTINES),
    (Operation::ShowFunctions, NO_ROUTINES),
    (
        Operation::UpdateColumn,
        "SQLite cannot alter a column definition; rebuild the table instead",
    ),
    (
        Operation::CreateDatabase,
        "SQLite databases are files; attach one with ATTACH DATABASE",
    ),
    (
        Operation::RenameView,
        "SQLite cannot rename views; drop and recreate instead",
    ),
    (Operation::RenameProcedure, NO_ROUTINES),
    (Operation::RenameFunction, NO_ROUTINES),
    (
        Operation::RenameTrigger,
        "SQLite cannot rename triggers; drop and recreate instead",
    ),
    (Operation::ShowProcedureSource, NO_ROUTINES),
    (Operation::ShowFunctionSource, NO_ROUTINES),
    (Operation::CreateUser, NO_USERS),
    (Operation::ProcedureTemplate, NO_ROUTINES),
    (Operation::FunctionTemplate, NO_ROUTINES),
    (Operation::ProcessList, NO_SERVER),
    (Operation::StatusList, NO_SERVER),
]);

const TABLE_TEMPLATE: &str = r#"CREATE TABLE {{ [database, table or 'new_table'] | qualified }} (
    "id" INTEGER PRIMARY KEY AUTOINCREMENT,
    "create_time" TEXT DEFAULT CURRENT_TIMESTAMP,
    "update_time" TEXT,
    "name" TEXT
)"#;

const VIEW_TEMPLATE: &str = r#"CREATE VIEW {{ [database, name or 'new_view'] | qualified }} AS
SELECT * FROM {{ (table or 'source_table') | identifier }}"#;

const TRIGGER_TEMPLATE: &str = r#"CREATE TRIGGER {{ [database, name or 'new_trigger'] | qualified }}
AFTER INSERT ON {{ (table or 'source_table') | identifier }}
FOR EACH ROW
BEGIN
    SELECT 1;
END"#;

/// SQLite dialect.
///
/// The request's database names an attached schema (`main` when absent).
/// Column types map to SQLite's storage affinities.
#[derive(Debug)]
pub struct SqliteDialect {
    default_page_size: u64,
    templates: TemplateEngine,
}

impl SqliteDialect {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            default_page_size: config.default_page_size,
            templates: TemplateEngine::new(QuoteStyle::DoubleQuote, LiteralEscape::Standard),
        }
    }

    fn schema<'a>(&self, request: &'a OperationRequest) -> &'a str {
        request.database().unwrap_or(MAIN_SCHEMA)
    }

    fn object(&self, request: &OperationRequest, field: RequestField) -> Result<String> {
        Ok(self.qualify(&[request.database(), Some(request.require(field)?)]))
    }

    /// `"schema".sqlite_master`
    fn master(&self, request: &OperationRequest) -> String {
        format!("{}.sqlite_master", self.quote_identifier(self.schema(request)))
    }

    fn objects_of_type(&self, request: &OperationRequest, object_type: &str) -> String {
        ansi::select(
            "name",
            &self.master(request),
            &[
                format!("type = '{object_type}'"),
                "name NOT LIKE 'sqlite\\_%' ESCAPE '\\'".to_string(),
            ],
            "name",
        )
    }

    fn source(
        &self,
        request: &OperationRequest,
        object_type: &str,
        field: RequestField,
    ) -> Result<String> {
        Ok(ansi::select(
            "sql AS source",
            &self.master(request),
            &[
                format!("type = '{object_type}'"),
                ansi::eq(self, "name", request.require(field)?),
            ],
            "",
        ))
    }

    fn render_template(&self, template: &str, request: &OperationRequest) -> Result<String> {
        self.templates
            .render_with(template, &TemplateContext::from_request(request))
    }
}

impl Dialect for SqliteDialect {
    fn backend(&self) -> BackendKind {
        BackendKind::Sqlite
    }

    fn capabilities(&self) -> &Capabilities {
        &CAPABILITIES
    }

    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::DoubleQuote
    }

    fn required_fields(&self, operation: Operation) -> &'static [RequestField] {
        use RequestField::{Name, Table};

        match operation {
            Operation::ShowTables
            | Operation::ShowViews
            | Operation::ShowSystemViews
            | Operation::ShowTriggers
            | Operation::TruncateDatabase => &[],
            Operation::ShowColumns | Operation::ShowIndexes => &[Table],
            Operation::DropIndex => &[Name],
            _ => operation.required_fields(),
        }
    }

    fn native_type(&self, column: &ColumnSpec) -> Result<String> {
        let affinity = match column.resolved_type()? {
            LogicalType::String
            | LogicalType::Text
            | LogicalType::Date
            | LogicalType::Time
            | LogicalType::DateTime
            | LogicalType::Timestamp
            | LogicalType::Json
            | LogicalType::Uuid => "TEXT",
            LogicalType::Integer
            | LogicalType::BigInt
            | LogicalType::SmallInt
            | LogicalType::Boolean => "INTEGER",
            LogicalType::Decimal => "NUMERIC",
            LogicalType::Float | LogicalType::Double => "REAL",
            LogicalType::Blob => "BLOB",
        };
        Ok(affinity.to_string())
    }

    fn render(&self, request: &OperationRequest) -> Result<Statement> {
        use RequestField::{Name, NewName, Table};

        let operation = request.operation();
        let sql = match operation {
            Operation::ShowDatabases => {
                ansi::select("name, file", "pragma_database_list", &[], "seq")
            }
            Operation::ShowTables => self.objects_of_type(request, "table"),
            Operation::ShowColumns => format!(
                "SELECT name, type, \"notnull\" AS not_null, dflt_value AS default_value, pk \
                 FROM pragma_table_info({}, {}) ORDER BY cid",
                self.quote_literal(request.require(Table)?),
                self.quote_literal(self.schema(request))
            ),
            Operation::ShowViews => self.objects_of_type(request, "view"),
            Operation::ShowSystemViews => ansi::select(
                "name, type",
                &self.master(request),
                &["name LIKE 'sqlite\\_%' ESCAPE '\\'".to_string()],
                "name",
            ),
            Operation::ShowTriggers => ansi::select(
                "name, tbl_name AS table_name",
                &self.master(request),
                &["type = 'trigger'".to_string()],
                "name",
            ),
            Operation::ShowIndexes => ansi::select(
                "name, sql",
                &self.master(request),
                &[
                    "type = 'index'".to_string(),
                    ansi::eq(self, "tbl_name", request.require(Table)?),
                ],
                "name",
            ),
            Operation::AddColumn => {
                let column = request.require_column()?;
                if !column.nullable && column.default.is_none() {
                    return Err(DialectError::invalid(
                        RequestField::Column,
                        "SQLite requires a default value when adding a NOT NULL column",
                    ));
                }
                format!(
                    "ALTER TABLE {} ADD COLUMN {}",
                    self.object(request, Table)?,
                    ansi::column_definition(self, column)?
                )
            }
            Operation::RenameColumn => format!(
                "ALTER TABLE {} RENAME COLUMN {} TO {}",
                self.object(request, Table)?,
                self.quote_identifier(&request.require_column()?.name),
                self.quote_identifier(request.require(NewName)?)
            ),
            Operation::BuildPage => {
                let page = Pagination::from_request(request, self.default_page_size)?;
                ansi::page(&self.object(request, Table)?, &page)
            }
            Operation::Count => ansi::count(&self.object(request, Table)?),
            // SQLite has no TRUNCATE; emit one DELETE per table
            Operation::TruncateDatabase => format!(
                "SELECT 'DELETE FROM ' || {} || '.\"' || replace(name, '\"', '\"\"') || '\";' AS statement \
                 FROM {} WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' ORDER BY name",
                self.quote_literal(&self.quote_identifier(self.schema(request))),
                self.master(request)
            ),
            Operation::RenameTable => format!(
                "ALTER TABLE {} RENAME TO {}",
                self.object(request, Table)?,
                self.quote_identifier(request.require(NewName)?)
            ),
            Operation::ShowTableSource => self.source(request, "table", Table)?,
            Operation::ShowViewSource => self.source(request, "view", Name)?,
            Operation::ShowTriggerSource => self.source(request, "trigger", Name)?,
            Operation::TableTemplate => self.render_template(TABLE_TEMPLATE, request)?,
            Operation::ViewTemplate => self.render_template(VIEW_TEMPLATE, request)?,
            Operation::TriggerTemplate => self.render_template(TRIGGER_TEMPLATE, request)?,
            Operation::DropIndex => format!("DROP INDEX {}", self.object(request, Name)?),
            Operation::DropTrigger => {
                format!("DROP TRIGGER IF EXISTS {}", self.object(request, Name)?)
            }
            Operation::VariableList => {
                "SELECT compile_options AS name FROM pragma_compile_options ORDER BY name"
                    .to_string()
            }
            Operation::Ping => "SELECT 1".to_string(),
            Operation::ShowSchemas
            | Operation::ShowUsers
            | Operation::ShowProcedures
            | Operation::ShowFunctions
            | Operation::UpdateColumn
            | Operation::CreateDatabase
            | Operation::RenameView
            | Operation::RenameProcedure
            | Operation::RenameFunction
            | Operation::RenameTrigger
            | Operation::ShowProcedureSource
            | Operation::ShowFunctionSource
            | Operation::CreateUser
            | Operation::ProcedureTemplate
            | Operation::FunctionTemplate
            | Operation::ProcessList
            | Operation::StatusList => return Err(self.mismatch(operation)),
        };
        Ok(Statement::Sql(sql))
    }
}
