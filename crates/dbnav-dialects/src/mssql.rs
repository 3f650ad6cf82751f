//! T-SQL dialect for Microsoft SQL Server
//!
//! Identifiers are bracket-quoted, objects are addressed as
//! `[database].[schema].[object]`, and pagination uses `OFFSET .. FETCH`,
//! which requires an `ORDER BY`.

use dbnav_core::{
    BackendKind, Capabilities, ColumnSpec, Dialect, DialectError, GeneratorConfig, LiteralEscape,
    LogicalType, Operation, OperationRequest, Pagination, QuoteStyle, RequestField, Result,
    Statement, TemplateEngine,
};

use crate::ansi::{self, TemplateContext};

const CAPABILITIES: Capabilities = Capabilities::all_except(&[(
    Operation::ShowTableSource,
    "SQL Server keeps no table DDL; OBJECT_DEFINITION covers modules only",
)]);

const TABLE_TEMPLATE: &str = r#"CREATE TABLE {{ [database, schema, table or 'new_table'] | qualified }} (
    [id] INT IDENTITY(1,1) PRIMARY KEY,
    [create_time] DATETIME2 DEFAULT SYSDATETIME(),
    [update_time] DATETIME2,
    [name] NVARCHAR(255)
)"#;

// CREATE VIEW/PROCEDURE/FUNCTION/TRIGGER accept at most a schema prefix
const VIEW_TEMPLATE: &str = r#"CREATE VIEW {{ [schema, name or 'new_view'] | qualified }} AS
SELECT * FROM {{ [schema, table or 'source_table'] | qualified }}"#;

const PROCEDURE_TEMPLATE: &str = r#"CREATE PROCEDURE {{ [schema, name or 'new_procedure'] | qualified }}
AS
BEGIN
    SET NOCOUNT ON;
END"#;

const TRIGGER_TEMPLATE: &str = r#"CREATE TRIGGER {{ [schema, name or 'new_trigger'] | qualified }}
ON {{ [schema, table or 'source_table'] | qualified }}
AFTER INSERT
AS
BEGIN
    SET NOCOUNT ON;
END"#;

const FUNCTION_TEMPLATE: &str = r#"CREATE FUNCTION {{ [schema, name or 'new_function'] | qualified }}()
RETURNS INT
AS
BEGIN
    RETURN 0;
END"#;

/// T-SQL dialect for Microsoft SQL Server
///
/// # Example
///
/// ```
/// use dbnav_core::{Dialect, DialectExt, GeneratorConfig};
/// use dbnav_dialects::MssqlDialect;
///
/// let dialect = MssqlDialect::new(&GeneratorConfig::default());
///
/// // Closing brackets are doubled
/// assert_eq!(dialect.quote_identifier("user[data]"), "[user[data]]]");
///
/// // Pages are addressed with OFFSET FETCH over an arbitrary order
/// let page = dialect.build_page("shop", "orders", 10, 2).unwrap();
/// assert_eq!(
///     page.sql(),
///     Some("SELECT * FROM [shop].[dbo].[orders] ORDER BY (SELECT NULL) OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY")
/// );
/// ```
#[derive(Debug)]
pub struct MssqlDialect {
    default_schema: String,
    default_page_size: u64,
    templates: TemplateEngine,
}

impl MssqlDialect {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            default_schema: config.mssql.default_schema.clone(),
            default_page_size: config.default_page_size,
            templates: TemplateEngine::new(QuoteStyle::Bracket, LiteralEscape::Standard),
        }
    }

    fn schema<'a>(&'a self, request: &'a OperationRequest) -> &'a str {
        request.schema().unwrap_or(&self.default_schema)
    }

    /// `[database].[schema].[object]`, or `[schema].[object]` without a database
    fn object(&self, request: &OperationRequest, field: RequestField) -> Result<String> {
        Ok(self.qualify(&[
            request.database(),
            Some(self.schema(request)),
            Some(request.require(field)?),
        ]))
    }

    /// `[schema].[object]`
    fn schema_object(&self, request: &OperationRequest, field: RequestField) -> Result<String> {
        Ok(self.qualify(&[Some(self.schema(request)), Some(request.require(field)?)]))
    }

    /// `[database].<view>` for catalog views
    fn catalog(&self, request: &OperationRequest, view: &str) -> Result<String> {
        Ok(format!(
            "{}.{view}",
            self.quote_identifier(request.require(RequestField::Database)?)
        ))
    }

    /// System procedure call, run in the request's database when one is named
    fn exec(&self, request: &OperationRequest, procedure: &str, args: &[String]) -> String {
        let target = match request.database() {
            Some(database) => format!("{}.sys.{procedure}", self.quote_identifier(database)),
            None => procedure.to_string(),
        };
        format!("EXEC {target} {}", args.join(", "))
    }

    /// `sp_rename` for an object addressed by `field`
    fn rename(&self, request: &OperationRequest, field: RequestField) -> Result<String> {
        Ok(self.exec(
            request,
            "sp_rename",
            &[
                self.quote_literal(&self.schema_object(request, field)?),
                self.quote_literal(request.require(RequestField::NewName)?),
            ],
        ))
    }

    fn routines(&self, request: &OperationRequest, routine_type: &str) -> Result<String> {
        Ok(ansi::select(
            "ROUTINE_NAME AS name",
            &self.catalog(request, "INFORMATION_SCHEMA.ROUTINES")?,
            &[
                ansi::eq(self, "ROUTINE_SCHEMA", self.schema(request)),
                format!("ROUTINE_TYPE = '{routine_type}'"),
            ],
            "ROUTINE_NAME",
        ))
    }

    fn object_definition(&self, request: &OperationRequest) -> Result<String> {
        Ok(format!(
            "SELECT OBJECT_DEFINITION(OBJECT_ID({})) AS source",
            self.quote_literal(&self.object(request, RequestField::Name)?)
        ))
    }

    fn add_column(&self, request: &OperationRequest) -> Result<Statement> {
        let column = request.require_column()?;
        let mut statements = vec![format!(
            "ALTER TABLE {} ADD {}",
            self.object(request, RequestField::Table)?,
            ansi::column_definition(self, column)?
        )];
        if let Some(comment) = &column.comment {
            let property: [&str; 8] = [
                "MS_Description",
                comment,
                "SCHEMA",
                self.schema(request),
                "TABLE",
                request.require(RequestField::Table)?,
                "COLUMN",
                &column.name,
            ];
            let args: Vec<String> = property
                .iter()
                .map(|arg| self.quote_literal(arg))
                .collect();
            statements.push(self.exec(request, "sp_addextendedproperty", &args));
        }
        Ok(Statement::script(statements))
    }

    fn update_column(&self, request: &OperationRequest) -> Result<Statement> {
        let table = self.object(request, RequestField::Table)?;
        let column = request.require_column()?;
        let quoted = self.quote_identifier(&column.name);

        let mut statements = vec![format!(
            "ALTER TABLE {table} ALTER COLUMN {quoted} {} {}",
            self.native_type(column)?,
            if column.nullable { "NULL" } else { "NOT NULL" }
        )];
        if let Some(default) = &column.default {
            statements.push(format!(
                "ALTER TABLE {table} ADD DEFAULT {} FOR {quoted}",
                self.quote_literal(default)
            ));
        }
        if let Some(new_name) = request.new_name()
            && new_name != column.name
        {
            statements.push(self.rename_column(request, new_name)?);
        }
        Ok(Statement::script(statements))
    }

    fn rename_column(&self, request: &OperationRequest, new_name: &str) -> Result<String> {
        let column = request.require_column()?;
        let path = format!(
            "{}.{}",
            self.schema_object(request, RequestField::Table)?,
            self.quote_identifier(&column.name)
        );
        Ok(self.exec(
            request,
            "sp_rename",
            &[
                self.quote_literal(&path),
                self.quote_literal(new_name),
                "'COLUMN'".to_string(),
            ],
        ))
    }

    fn create_user(&self, request: &OperationRequest) -> Result<Statement> {
        let login = self.quote_identifier(request.require(RequestField::Name)?);
        let password = self.quote_literal(request.require(RequestField::Password)?);
        let mut statements = vec![format!("CREATE LOGIN {login} WITH PASSWORD = {password}")];
        if let Some(database) = request.database() {
            statements.push(format!("USE {}", self.quote_identifier(database)));
            statements.push(format!("CREATE USER {login} FOR LOGIN {login}"));
        }
        Ok(Statement::script(statements))
    }

    fn render_template(&self, template: &str, request: &OperationRequest) -> Result<String> {
        let context = TemplateContext::from_request(request).with_schema(self.schema(request));
        self.templates.render_with(template, &context)
    }
}

impl Dialect for MssqlDialect {
    fn backend(&self) -> BackendKind {
        BackendKind::SqlServer
    }

    fn capabilities(&self) -> &Capabilities {
        &CAPABILITIES
    }

    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::Bracket
    }

    fn required_fields(&self, operation: Operation) -> &'static [RequestField] {
        use RequestField::{Name, Password};

        match operation {
            Operation::CreateUser => &[Name, Password],
            _ => operation.required_fields(),
        }
    }

    fn native_type(&self, column: &ColumnSpec) -> Result<String> {
        let native = match column.resolved_type()? {
            LogicalType::String => format!("NVARCHAR({})", column.string_length()),
            LogicalType::Text => "NVARCHAR(MAX)".to_string(),
            LogicalType::Integer => "INT".to_string(),
            LogicalType::BigInt => "BIGINT".to_string(),
            LogicalType::SmallInt => "SMALLINT".to_string(),
            LogicalType::Decimal => {
                let (precision, scale) = column.precision();
                format!("DECIMAL({precision}, {scale})")
            }
            LogicalType::Float => "REAL".to_string(),
            LogicalType::Double => "FLOAT".to_string(),
            LogicalType::Boolean => "BIT".to_string(),
            LogicalType::Date => "DATE".to_string(),
            LogicalType::Time => "TIME".to_string(),
            LogicalType::DateTime => "DATETIME2".to_string(),
            LogicalType::Timestamp => "DATETIMEOFFSET".to_string(),
            LogicalType::Blob => "VARBINARY(MAX)".to_string(),
            // no native JSON column type
            LogicalType::Json => {
                return Err(DialectError::unsupported_type(&column.logical_type));
            }
            LogicalType::Uuid => "UNIQUEIDENTIFIER".to_string(),
        };
        Ok(native)
    }

    fn render(&self, request: &OperationRequest) -> Result<Statement> {
        use RequestField::{Database, Name, NewName, Table};

        let operation = request.operation();
        let sql = match operation {
            Operation::ShowDatabases => ansi::select("name", "sys.databases", &[], "name"),
            Operation::ShowSchemas => {
                ansi::select("name", &self.catalog(request, "sys.schemas")?, &[], "name")
            }
            Operation::ShowTables => ansi::select(
                "TABLE_NAME AS name",
                &self.catalog(request, "INFORMATION_SCHEMA.TABLES")?,
                &[
                    ansi::eq(self, "TABLE_SCHEMA", self.schema(request)),
                    "TABLE_TYPE = 'BASE TABLE'".to_string(),
                ],
                "TABLE_NAME",
            ),
            Operation::ShowColumns => ansi::select(
                "COLUMN_NAME AS name, DATA_TYPE AS type, IS_NULLABLE AS nullable, \
                 COLUMN_DEFAULT AS default_value, CHARACTER_MAXIMUM_LENGTH AS max_length",
                &self.catalog(request, "INFORMATION_SCHEMA.COLUMNS")?,
                &[
                    ansi::eq(self, "TABLE_SCHEMA", self.schema(request)),
                    ansi::eq(self, "TABLE_NAME", request.require(Table)?),
                ],
                "ORDINAL_POSITION",
            ),
            Operation::ShowViews => ansi::select(
                "TABLE_NAME AS name",
                &self.catalog(request, "INFORMATION_SCHEMA.VIEWS")?,
                &[ansi::eq(self, "TABLE_SCHEMA", self.schema(request))],
                "TABLE_NAME",
            ),
            Operation::ShowSystemViews => {
                ansi::select("name", &self.catalog(request, "sys.system_views")?, &[], "name")
            }
            Operation::ShowUsers => ansi::select(
                "name, type_desc AS type",
                "sys.server_principals",
                &["type IN ('S', 'U', 'G')".to_string()],
                "name",
            ),
            Operation::ShowTriggers => {
                let database = request.require(Database)?;
                ansi::select(
                    &format!(
                        "t.name AS name, OBJECT_NAME(t.parent_id, DB_ID({})) AS table_name",
                        self.quote_literal(database)
                    ),
                    &format!("{} t", self.catalog(request, "sys.triggers")?),
                    &["t.parent_class = 1".to_string()],
                    "t.name",
                )
            }
            Operation::ShowProcedures => self.routines(request, "PROCEDURE")?,
            Operation::ShowFunctions => self.routines(request, "FUNCTION")?,
            Operation::ShowIndexes => ansi::select(
                "i.name AS name, i.type_desc AS type, i.is_unique AS is_unique",
                &format!("{} i", self.catalog(request, "sys.indexes")?),
                &[
                    format!(
                        "i.object_id = OBJECT_ID({})",
                        self.quote_literal(&self.object(request, Table)?)
                    ),
                    "i.name IS NOT NULL".to_string(),
                ],
                "i.name",
            ),
            Operation::AddColumn => return self.add_column(request),
            Operation::UpdateColumn => return self.update_column(request),
            Operation::RenameColumn => self.rename_column(request, request.require(NewName)?)?,
            Operation::BuildPage => {
                let page = Pagination::from_request(request, self.default_page_size)?;
                format!(
                    "SELECT * FROM {} ORDER BY (SELECT NULL) {}",
                    self.object(request, Table)?,
                    page.offset_fetch()
                )
            }
            Operation::Count => ansi::count(&self.object(request, Table)?),
            Operation::CreateDatabase => format!(
                "CREATE DATABASE {}",
                self.quote_identifier(request.require(Database)?)
            ),
            Operation::TruncateDatabase => ansi::select(
                "'TRUNCATE TABLE ' + QUOTENAME(TABLE_CATALOG) + '.' + QUOTENAME(TABLE_SCHEMA) \
                 + '.' + QUOTENAME(TABLE_NAME) + ';' AS statement",
                &self.catalog(request, "INFORMATION_SCHEMA.TABLES")?,
                &["TABLE_TYPE = 'BASE TABLE'".to_string()],
                "TABLE_SCHEMA, TABLE_NAME",
            ),
            Operation::RenameTable => self.rename(request, Table)?,
            Operation::RenameView
            | Operation::RenameProcedure
            | Operation::RenameFunction
            | Operation::RenameTrigger => self.rename(request, Name)?,
            Operation::ShowViewSource
            | Operation::ShowProcedureSource
            | Operation::ShowFunctionSource
            | Operation::ShowTriggerSource => self.object_definition(request)?,
            Operation::CreateUser => return self.create_user(request),
            Operation::TableTemplate => self.render_template(TABLE_TEMPLATE, request)?,
            Operation::ViewTemplate => self.render_template(VIEW_TEMPLATE, request)?,
            Operation::ProcedureTemplate => self.render_template(PROCEDURE_TEMPLATE, request)?,
            Operation::TriggerTemplate => self.render_template(TRIGGER_TEMPLATE, request)?,
            Operation::FunctionTemplate => self.render_template(FUNCTION_TEMPLATE, request)?,
            Operation::DropIndex => format!(
                "DROP INDEX {} ON {}",
                self.quote_identifier(request.require(Name)?),
                self.object(request, Table)?
            ),
            Operation::DropTrigger => format!(
                "DROP TRIGGER IF EXISTS {}",
                self.schema_object(request, Name)?
            ),
            Operation::ProcessList => ansi::select(
                "session_id, login_name, host_name, program_name, status",
                "sys.dm_exec_sessions",
                &["is_user_process = 1".to_string()],
                "session_id",
            ),
            Operation::VariableList => ansi::select(
                "name, value, value_in_use, description",
                "sys.configurations",
                &[],
                "name",
            ),
            Operation::StatusList => ansi::select(
                "object_name, counter_name, instance_name, cntr_value",
                "sys.dm_os_performance_counters",
                &[],
                "object_name, counter_name",
            ),
            Operation::Ping => "SELECT 1".to_string(),
            Operation::ShowTableSource => return Err(self.mismatch(operation)),
        };
        Ok(Statement::Sql(sql))
    }
}
