//! MySQL and MariaDB dialect

use dbnav_core::config::MySqlConfig;
use dbnav_core::{
    BackendKind, Capabilities, ColumnSpec, Dialect, GeneratorConfig, LiteralEscape, LogicalType,
    Operation, OperationRequest, Pagination, QuoteStyle, RequestField, Result, Statement,
    TemplateEngine,
};

use crate::ansi::{self, TemplateContext};

const CAPABILITIES: Capabilities = Capabilities::all_except(&[
    (
        Operation::ShowSchemas,
        "MySQL schemas are databases; use show-databases",
    ),
    (
        Operation::RenameProcedure,
        "MySQL cannot rename stored procedures; drop and recreate instead",
    ),
    (
        Operation::RenameFunction,
        "MySQL cannot rename stored functions; drop and recreate instead",
    ),
    (
        Operation::RenameTrigger,
        "MySQL cannot rename triggers; drop and recreate instead",
    ),
]);

const TABLE_TEMPLATE: &str = r#"CREATE TABLE {{ [database, table or 'new_table'] | qualified }} (
    `id` INT NOT NULL AUTO_INCREMENT PRIMARY KEY,
    `create_time` DATETIME DEFAULT CURRENT_TIMESTAMP,
    `update_time` DATETIME,
    `name` VARCHAR(255)
) DEFAULT CHARSET = {{ charset }}"#;

const VIEW_TEMPLATE: &str = r#"CREATE VIEW {{ [database, name or 'new_view'] | qualified }} AS
SELECT * FROM {{ [database, table or 'source_table'] | qualified }}"#;

const PROCEDURE_TEMPLATE: &str = r#"CREATE PROCEDURE {{ [database, name or 'new_procedure'] | qualified }}()
BEGIN
    SELECT 1;
END"#;

const TRIGGER_TEMPLATE: &str = r#"CREATE TRIGGER {{ [database, name or 'new_trigger'] | qualified }}
BEFORE INSERT ON {{ [database, table or 'source_table'] | qualified }}
FOR EACH ROW
BEGIN
    -- trigger body
END"#;

const FUNCTION_TEMPLATE: &str = r#"CREATE FUNCTION {{ [database, name or 'new_function'] | qualified }}() RETURNS INT
DETERMINISTIC
BEGIN
    RETURN 0;
END"#;

/// MySQL dialect, also serving MariaDB.
///
/// Identifiers are backtick-quoted, string literals escape backslashes,
/// and pagination uses `LIMIT .. OFFSET ..`.
#[derive(Debug)]
pub struct MySqlDialect {
    backend: BackendKind,
    config: MySqlConfig,
    default_page_size: u64,
    templates: TemplateEngine,
}

impl MySqlDialect {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self::for_backend(BackendKind::MySql, config)
    }

    pub fn mariadb(config: &GeneratorConfig) -> Self {
        Self::for_backend(BackendKind::MariaDb, config)
    }

    fn for_backend(backend: BackendKind, config: &GeneratorConfig) -> Self {
        Self {
            backend,
            config: config.mysql.clone(),
            default_page_size: config.default_page_size,
            templates: TemplateEngine::new(QuoteStyle::Backtick, LiteralEscape::Backslash),
        }
    }

    /// `database`.`object` for a required object field
    fn object(&self, request: &OperationRequest, field: RequestField) -> Result<String> {
        Ok(self.qualify(&[request.database(), Some(request.require(field)?)]))
    }

    fn schema_filter(&self, column: &str, request: &OperationRequest) -> Result<String> {
        Ok(ansi::eq(self, column, request.require(RequestField::Database)?))
    }

    /// Column definition with MySQL's inline comment
    fn column_definition(&self, column: &ColumnSpec) -> Result<String> {
        let mut definition = ansi::column_definition(self, column)?;
        if let Some(comment) = &column.comment {
            definition.push_str(" COMMENT ");
            definition.push_str(&self.quote_literal(comment));
        }
        Ok(definition)
    }

    fn routines(&self, request: &OperationRequest, routine_type: &str) -> Result<String> {
        Ok(ansi::select(
            "ROUTINE_NAME AS name",
            "information_schema.ROUTINES",
            &[
                self.schema_filter("ROUTINE_SCHEMA", request)?,
                format!("ROUTINE_TYPE = '{routine_type}'"),
            ],
            "ROUTINE_NAME",
        ))
    }

    fn render_template(&self, template: &str, request: &OperationRequest) -> Result<String> {
        self.config.validate()?;
        let context = TemplateContext::from_request(request).with_charset(&self.config.charset);
        self.templates.render_with(template, &context)
    }

    /// `'user'@'host'`, defaulting the host to `%`
    fn account(&self, user: &str) -> String {
        let (user, host) = user.split_once('@').unwrap_or((user, "%"));
        format!("{}@{}", self.quote_literal(user), self.quote_literal(host))
    }
}

impl Dialect for MySqlDialect {
    fn backend(&self) -> BackendKind {
        self.backend
    }

    fn capabilities(&self) -> &Capabilities {
        &CAPABILITIES
    }

    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::Backtick
    }

    fn literal_escape(&self) -> LiteralEscape {
        LiteralEscape::Backslash
    }

    fn required_fields(&self, operation: Operation) -> &'static [RequestField] {
        match operation {
            Operation::ShowSystemViews => &[],
            _ => operation.required_fields(),
        }
    }

    fn native_type(&self, column: &ColumnSpec) -> Result<String> {
        let native = match column.resolved_type()? {
            LogicalType::String => format!("VARCHAR({})", column.string_length()),
            LogicalType::Text => "TEXT".to_string(),
            LogicalType::Integer => "INT".to_string(),
            LogicalType::BigInt => "BIGINT".to_string(),
            LogicalType::SmallInt => "SMALLINT".to_string(),
            LogicalType::Decimal => {
                let (precision, scale) = column.precision();
                format!("DECIMAL({precision}, {scale})")
            }
            LogicalType::Float => "FLOAT".to_string(),
            LogicalType::Double => "DOUBLE".to_string(),
            LogicalType::Boolean => "TINYINT(1)".to_string(),
            LogicalType::Date => "DATE".to_string(),
            LogicalType::Time => "TIME".to_string(),
            LogicalType::DateTime => "DATETIME".to_string(),
            LogicalType::Timestamp => "TIMESTAMP".to_string(),
            LogicalType::Blob => "BLOB".to_string(),
            LogicalType::Json => "JSON".to_string(),
            LogicalType::Uuid => "CHAR(36)".to_string(),
        };
        Ok(native)
    }

    fn render(&self, request: &OperationRequest) -> Result<Statement> {
        use RequestField::{Database, Name, NewName, Table};

        let operation = request.operation();
        let sql = match operation {
            Operation::ShowDatabases => "SHOW DATABASES".to_string(),
            Operation::ShowTables => ansi::select(
                "TABLE_NAME AS name, TABLE_COMMENT AS comment, TABLE_ROWS AS table_rows",
                "information_schema.TABLES",
                &[
                    self.schema_filter("TABLE_SCHEMA", request)?,
                    "TABLE_TYPE = 'BASE TABLE'".to_string(),
                ],
                "TABLE_NAME",
            ),
            Operation::ShowColumns => ansi::select(
                "COLUMN_NAME AS name, DATA_TYPE AS simple_type, COLUMN_TYPE AS type, \
                 COLUMN_COMMENT AS comment, COLUMN_KEY AS `key`, IS_NULLABLE AS nullable, \
                 CHARACTER_MAXIMUM_LENGTH AS max_length, COLUMN_DEFAULT AS default_value, \
                 EXTRA AS extra",
                "information_schema.COLUMNS",
                &[
                    self.schema_filter("TABLE_SCHEMA", request)?,
                    ansi::eq(self, "TABLE_NAME", request.require(Table)?),
                ],
                "ORDINAL_POSITION",
            ),
            Operation::ShowViews => ansi::select(
                "TABLE_NAME AS name",
                "information_schema.VIEWS",
                &[self.schema_filter("TABLE_SCHEMA", request)?],
                "TABLE_NAME",
            ),
            Operation::ShowSystemViews => ansi::select(
                "TABLE_SCHEMA AS schema_name, TABLE_NAME AS name",
                "information_schema.TABLES",
                &["TABLE_SCHEMA IN ('information_schema', 'performance_schema', 'sys')"
                    .to_string()],
                "TABLE_SCHEMA, TABLE_NAME",
            ),
            Operation::ShowUsers => {
                "SELECT CONCAT(user, '@', host) AS name FROM mysql.user ORDER BY user, host"
                    .to_string()
            }
            Operation::ShowTriggers => ansi::select(
                "TRIGGER_NAME AS name, EVENT_OBJECT_TABLE AS table_name, \
                 ACTION_TIMING AS timing, EVENT_MANIPULATION AS event",
                "information_schema.TRIGGERS",
                &[self.schema_filter("TRIGGER_SCHEMA", request)?],
                "TRIGGER_NAME",
            ),
            Operation::ShowProcedures => self.routines(request, "PROCEDURE")?,
            Operation::ShowFunctions => self.routines(request, "FUNCTION")?,
            Operation::ShowIndexes => ansi::select(
                "INDEX_NAME AS name, COLUMN_NAME AS column_name, NON_UNIQUE AS non_unique, \
                 SEQ_IN_INDEX AS seq, INDEX_TYPE AS index_type",
                "information_schema.STATISTICS",
                &[
                    self.schema_filter("TABLE_SCHEMA", request)?,
                    ansi::eq(self, "TABLE_NAME", request.require(Table)?),
                ],
                "INDEX_NAME, SEQ_IN_INDEX",
            ),
            Operation::AddColumn => format!(
                "ALTER TABLE {} ADD COLUMN {}",
                self.object(request, Table)?,
                self.column_definition(request.require_column()?)?
            ),
            Operation::UpdateColumn => {
                let column = request.require_column()?;
                let mut renamed = column.clone();
                if let Some(new_name) = request.new_name() {
                    renamed.name = new_name.to_string();
                }
                format!(
                    "ALTER TABLE {} CHANGE {} {}",
                    self.object(request, Table)?,
                    self.quote_identifier(&column.name),
                    self.column_definition(&renamed)?
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
            Operation::CreateDatabase => {
                self.config.validate()?;
                format!(
                    "CREATE DATABASE {} DEFAULT CHARACTER SET {} COLLATE {}",
                    self.quote_identifier(request.require(Database)?),
                    self.config.charset,
                    self.config.collation
                )
            }
            Operation::TruncateDatabase => ansi::select(
                "CONCAT('TRUNCATE TABLE `', REPLACE(TABLE_SCHEMA, '`', '``'), '`.`', \
                 REPLACE(TABLE_NAME, '`', '``'), '`;') AS statement",
                "information_schema.TABLES",
                &[
                    self.schema_filter("TABLE_SCHEMA", request)?,
                    "TABLE_TYPE = 'BASE TABLE'".to_string(),
                ],
                "TABLE_NAME",
            ),
            Operation::RenameTable => format!(
                "RENAME TABLE {} TO {}",
                self.object(request, Table)?,
                self.object(request, NewName)?
            ),
            Operation::RenameView => format!(
                "RENAME TABLE {} TO {}",
                self.object(request, Name)?,
                self.object(request, NewName)?
            ),
            Operation::ShowTableSource => {
                format!("SHOW CREATE TABLE {}", self.object(request, Table)?)
            }
            Operation::ShowViewSource => {
                format!("SHOW CREATE VIEW {}", self.object(request, Name)?)
            }
            Operation::ShowProcedureSource => {
                format!("SHOW CREATE PROCEDURE {}", self.object(request, Name)?)
            }
            Operation::ShowFunctionSource => {
                format!("SHOW CREATE FUNCTION {}", self.object(request, Name)?)
            }
            Operation::ShowTriggerSource => {
                format!("SHOW CREATE TRIGGER {}", self.object(request, Name)?)
            }
            Operation::CreateUser => {
                let mut sql = format!("CREATE USER {}", self.account(request.require(Name)?));
                if let Some(password) = request.password() {
                    sql.push_str(" IDENTIFIED BY ");
                    sql.push_str(&self.quote_literal(password));
                }
                sql
            }
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
            Operation::DropTrigger => {
                format!("DROP TRIGGER IF EXISTS {}", self.object(request, Name)?)
            }
            Operation::ProcessList => "SHOW FULL PROCESSLIST".to_string(),
            Operation::VariableList => "SHOW GLOBAL VARIABLES".to_string(),
            Operation::StatusList => "SHOW GLOBAL STATUS".to_string(),
            Operation::Ping => "SELECT 1".to_string(),
            Operation::ShowSchemas
            | Operation::RenameProcedure
            | Operation::RenameFunction
            | Operation::RenameTrigger => return Err(self.mismatch(operation)),
        };
        Ok(Statement::Sql(sql))
    }
}
