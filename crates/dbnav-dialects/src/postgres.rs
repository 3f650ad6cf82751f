//! PostgreSQL dialect

use dbnav_core::{
    BackendKind, Capabilities, ColumnSpec, Dialect, GeneratorConfig, LiteralEscape, LogicalType,
    Operation, OperationRequest, Pagination, QuoteStyle, RequestField, Result, Statement,
    TemplateEngine,
};

use crate::ansi::{self, TemplateContext};

const CAPABILITIES: Capabilities = Capabilities::all_except(&[(
    Operation::ShowTableSource,
    "PostgreSQL has no server-side SHOW CREATE TABLE; reconstruct the DDL from the catalog",
)]);

const TABLE_TEMPLATE: &str = r#"CREATE TABLE {{ [schema, table or 'new_table'] | qualified }} (
    "id" SERIAL PRIMARY KEY,
    "create_time" TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    "update_time" TIMESTAMP,
    "name" VARCHAR(255)
)"#;

const VIEW_TEMPLATE: &str = r#"CREATE VIEW {{ [schema, name or 'new_view'] | qualified }} AS
SELECT * FROM {{ [schema, table or 'source_table'] | qualified }}"#;

const PROCEDURE_TEMPLATE: &str = r#"CREATE PROCEDURE {{ [schema, name or 'new_procedure'] | qualified }}()
LANGUAGE plpgsql
AS $$
BEGIN
    -- procedure body
END;
$$"#;

const FUNCTION_TEMPLATE: &str = r#"CREATE FUNCTION {{ [schema, name or 'new_function'] | qualified }}()
RETURNS INTEGER
LANGUAGE plpgsql
AS $$
BEGIN
    RETURN 0;
END;
$$"#;

// A trigger needs its function first
const TRIGGER_TEMPLATE: &str = r#"{% set trigger = name or 'new_trigger' -%}
CREATE FUNCTION {{ [schema, trigger ~ '_fn'] | qualified }}()
RETURNS TRIGGER
LANGUAGE plpgsql
AS $$
BEGIN
    RETURN NEW;
END;
$$;
CREATE TRIGGER {{ trigger | identifier }}
BEFORE INSERT ON {{ [schema, table or 'source_table'] | qualified }}
FOR EACH ROW
EXECUTE FUNCTION {{ [schema, trigger ~ '_fn'] | qualified }}()"#;

/// PostgreSQL dialect.
///
/// Objects are qualified by schema (the request's, or the configured
/// default), never by database: a connection is bound to one database.
#[derive(Debug)]
pub struct PostgresDialect {
    default_schema: String,
    default_page_size: u64,
    templates: TemplateEngine,
}

impl PostgresDialect {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            default_schema: config.postgres.default_schema.clone(),
            default_page_size: config.default_page_size,
            templates: TemplateEngine::new(QuoteStyle::DoubleQuote, LiteralEscape::Standard),
        }
    }

    fn schema<'a>(&'a self, request: &'a OperationRequest) -> &'a str {
        request.schema().unwrap_or(&self.default_schema)
    }

    /// `"schema"."object"` for a required object field
    fn object(&self, request: &OperationRequest, field: RequestField) -> Result<String> {
        Ok(self.qualify(&[Some(self.schema(request)), Some(request.require(field)?)]))
    }

    fn catalog_filters(
        &self,
        request: &OperationRequest,
        catalog: &str,
        schema: &str,
    ) -> Result<Vec<String>> {
        Ok(vec![
            ansi::eq(self, catalog, request.require(RequestField::Database)?),
            ansi::eq(self, schema, self.schema(request)),
        ])
    }

    fn routines(&self, request: &OperationRequest, routine_type: &str) -> Result<String> {
        let mut conditions = self.catalog_filters(request, "routine_catalog", "routine_schema")?;
        conditions.push(format!("routine_type = '{routine_type}'"));
        Ok(ansi::select(
            "routine_name AS name",
            "information_schema.routines",
            &conditions,
            "routine_name",
        ))
    }

    fn comment_on_column(&self, table: &str, column: &str, comment: &str) -> String {
        format!(
            "COMMENT ON COLUMN {table}.{} IS {}",
            self.quote_identifier(column),
            self.quote_literal(comment)
        )
    }

    fn update_column(&self, request: &OperationRequest) -> Result<Statement> {
        let table = self.object(request, RequestField::Table)?;
        let column = request.require_column()?;
        let quoted = self.quote_identifier(&column.name);
        let alter = format!("ALTER TABLE {table} ALTER COLUMN {quoted}");

        let mut statements = vec![format!("{alter} TYPE {}", self.native_type(column)?)];
        statements.push(if column.nullable {
            format!("{alter} DROP NOT NULL")
        } else {
            format!("{alter} SET NOT NULL")
        });
        if let Some(default) = &column.default {
            statements.push(format!("{alter} SET DEFAULT {}", self.quote_literal(default)));
        }
        if let Some(comment) = &column.comment {
            statements.push(self.comment_on_column(&table, &column.name, comment));
        }
        if let Some(new_name) = request.new_name()
            && new_name != column.name
        {
            statements.push(format!(
                "ALTER TABLE {table} RENAME COLUMN {quoted} TO {}",
                self.quote_identifier(new_name)
            ));
        }
        Ok(Statement::script(statements))
    }

    fn function_source(&self, request: &OperationRequest) -> Result<String> {
        let function = self.object(request, RequestField::Name)?;
        Ok(format!(
            "SELECT pg_get_functiondef({}::regproc) AS source",
            self.quote_literal(&function)
        ))
    }

    fn render_template(&self, template: &str, request: &OperationRequest) -> Result<String> {
        let context = TemplateContext::from_request(request).with_schema(self.schema(request));
        self.templates.render_with(template, &context)
    }
}

impl Dialect for PostgresDialect {
    fn backend(&self) -> BackendKind {
        BackendKind::PostgreSql
    }

    fn capabilities(&self) -> &Capabilities {
        &CAPABILITIES
    }

    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::DoubleQuote
    }

    fn required_fields(&self, operation: Operation) -> &'static [RequestField] {
        use RequestField::{Name, NewName, Table};

        match operation {
            Operation::ShowSystemViews => &[],
            Operation::RenameTrigger => &[Name, NewName, Table],
            Operation::DropIndex => &[Name],
            Operation::DropTrigger => &[Name, Table],
            _ => operation.required_fields(),
        }
    }

    fn native_type(&self, column: &ColumnSpec) -> Result<String> {
        let native = match column.resolved_type()? {
            LogicalType::String => format!("VARCHAR({})", column.string_length()),
            LogicalType::Text => "TEXT".to_string(),
            LogicalType::Integer => "INTEGER".to_string(),
            LogicalType::BigInt => "BIGINT".to_string(),
            LogicalType::SmallInt => "SMALLINT".to_string(),
            LogicalType::Decimal => {
                let (precision, scale) = column.precision();
                format!("NUMERIC({precision}, {scale})")
            }
            LogicalType::Float => "REAL".to_string(),
            LogicalType::Double => "DOUBLE PRECISION".to_string(),
            LogicalType::Boolean => "BOOLEAN".to_string(),
            LogicalType::Date => "DATE".to_string(),
            LogicalType::Time => "TIME".to_string(),
            LogicalType::DateTime => "TIMESTAMP".to_string(),
            LogicalType::Timestamp => "TIMESTAMPTZ".to_string(),
            LogicalType::Blob => "BYTEA".to_string(),
            LogicalType::Json => "JSONB".to_string(),
            LogicalType::Uuid => "UUID".to_string(),
        };
        Ok(native)
    }

    fn render(&self, request: &OperationRequest) -> Result<Statement> {
        use RequestField::{Database, Name, NewName, Table};

        let operation = request.operation();
        let sql = match operation {
            Operation::ShowDatabases => ansi::select(
                "datname AS name",
                "pg_database",
                &["datistemplate = false".to_string()],
                "datname",
            ),
            Operation::ShowSchemas => ansi::select(
                "schema_name AS name",
                "information_schema.schemata",
                &[ansi::eq(self, "catalog_name", request.require(Database)?)],
                "schema_name",
            ),
            Operation::ShowTables => {
                let mut conditions =
                    self.catalog_filters(request, "table_catalog", "table_schema")?;
                conditions.push("table_type = 'BASE TABLE'".to_string());
                ansi::select(
                    "table_name AS name",
                    "information_schema.tables",
                    &conditions,
                    "table_name",
                )
            }
            Operation::ShowColumns => {
                let mut conditions =
                    self.catalog_filters(request, "table_catalog", "table_schema")?;
                conditions.push(ansi::eq(self, "table_name", request.require(Table)?));
                ansi::select(
                    "column_name AS name, data_type AS type, is_nullable AS nullable, \
                     column_default AS default_value, character_maximum_length AS max_length",
                    "information_schema.columns",
                    &conditions,
                    "ordinal_position",
                )
            }
            Operation::ShowViews => ansi::select(
                "table_name AS name",
                "information_schema.views",
                &self.catalog_filters(request, "table_catalog", "table_schema")?,
                "table_name",
            ),
            Operation::ShowSystemViews => ansi::select(
                "table_schema AS schema_name, table_name AS name",
                "information_schema.views",
                &["table_schema IN ('information_schema', 'pg_catalog')".to_string()],
                "table_schema, table_name",
            ),
            Operation::ShowUsers => {
                ansi::select("usename AS name", "pg_catalog.pg_user", &[], "usename")
            }
            Operation::ShowTriggers => ansi::select(
                "trigger_name AS name, event_object_table AS table_name, \
                 action_timing AS timing, event_manipulation AS event",
                "information_schema.triggers",
                &self.catalog_filters(request, "trigger_catalog", "trigger_schema")?,
                "trigger_name",
            ),
            Operation::ShowProcedures => self.routines(request, "PROCEDURE")?,
            Operation::ShowFunctions => self.routines(request, "FUNCTION")?,
            Operation::ShowIndexes => ansi::select(
                "indexname AS name, indexdef AS definition",
                "pg_indexes",
                &[
                    ansi::eq(self, "schemaname", self.schema(request)),
                    ansi::eq(self, "tablename", request.require(Table)?),
                ],
                "indexname",
            ),
            Operation::AddColumn => {
                let table = self.object(request, Table)?;
                let column = request.require_column()?;
                let mut statements = vec![format!(
                    "ALTER TABLE {table} ADD COLUMN {}",
                    ansi::column_definition(self, column)?
                )];
                if let Some(comment) = &column.comment {
                    statements.push(self.comment_on_column(&table, &column.name, comment));
                }
                return Ok(Statement::script(statements));
            }
            Operation::UpdateColumn => return self.update_column(request),
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
            Operation::CreateDatabase => format!(
                "CREATE DATABASE {}",
                self.quote_identifier(request.require(Database)?)
            ),
            Operation::TruncateDatabase => ansi::select(
                "'TRUNCATE TABLE ' || quote_ident(schemaname) || '.' || quote_ident(tablename) \
                 || ' CASCADE;' AS statement",
                "pg_tables",
                &[ansi::eq(self, "schemaname", self.schema(request))],
                "tablename",
            ),
            Operation::RenameTable => format!(
                "ALTER TABLE {} RENAME TO {}",
                self.object(request, Table)?,
                self.quote_identifier(request.require(NewName)?)
            ),
            Operation::RenameView => format!(
                "ALTER VIEW {} RENAME TO {}",
                self.object(request, Name)?,
                self.quote_identifier(request.require(NewName)?)
            ),
            Operation::RenameProcedure => format!(
                "ALTER PROCEDURE {} RENAME TO {}",
                self.object(request, Name)?,
                self.quote_identifier(request.require(NewName)?)
            ),
            Operation::RenameFunction => format!(
                "ALTER FUNCTION {} RENAME TO {}",
                self.object(request, Name)?,
                self.quote_identifier(request.require(NewName)?)
            ),
            Operation::RenameTrigger => format!(
                "ALTER TRIGGER {} ON {} RENAME TO {}",
                self.quote_identifier(request.require(Name)?),
                self.object(request, Table)?,
                self.quote_identifier(request.require(NewName)?)
            ),
            Operation::ShowViewSource => format!(
                "SELECT pg_get_viewdef({}::regclass, true) AS source",
                self.quote_literal(&self.object(request, Name)?)
            ),
            Operation::ShowProcedureSource | Operation::ShowFunctionSource => {
                self.function_source(request)?
            }
            Operation::ShowTriggerSource => ansi::select(
                "pg_get_triggerdef(t.oid, true) AS source",
                "pg_trigger t JOIN pg_class c ON c.oid = t.tgrelid \
                 JOIN pg_namespace n ON n.oid = c.relnamespace",
                &[
                    ansi::eq(self, "t.tgname", request.require(Name)?),
                    ansi::eq(self, "n.nspname", self.schema(request)),
                ],
                "",
            ),
            Operation::CreateUser => {
                let mut sql = format!(
                    "CREATE USER {}",
                    self.quote_identifier(request.require(Name)?)
                );
                if let Some(password) = request.password() {
                    sql.push_str(" WITH PASSWORD ");
                    sql.push_str(&self.quote_literal(password));
                }
                sql
            }
            Operation::TableTemplate => self.render_template(TABLE_TEMPLATE, request)?,
            Operation::ViewTemplate => self.render_template(VIEW_TEMPLATE, request)?,
            Operation::ProcedureTemplate => self.render_template(PROCEDURE_TEMPLATE, request)?,
            Operation::TriggerTemplate => self.render_template(TRIGGER_TEMPLATE, request)?,
            Operation::FunctionTemplate => self.render_template(FUNCTION_TEMPLATE, request)?,
            Operation::DropIndex => format!("DROP INDEX {}", self.object(request, Name)?),
            Operation::DropTrigger => format!(
                "DROP TRIGGER IF EXISTS {} ON {}",
                self.quote_identifier(request.require(Name)?),
                self.object(request, Table)?
            ),
            Operation::ProcessList => {
                "SELECT pid, usename, datname, client_addr, state, query_start, query \
                 FROM pg_stat_activity ORDER BY pid"
                    .to_string()
            }
            Operation::VariableList => ansi::select(
                "name, setting, unit, short_desc",
                "pg_settings",
                &[],
                "name",
            ),
            Operation::StatusList => {
                "SELECT * FROM pg_stat_database WHERE datname = current_database()".to_string()
            }
            Operation::Ping => "SELECT 1".to_string(),
            Operation::ShowTableSource => return Err(self.mismatch(operation)),
        };
        Ok(Statement::Sql(sql))
    }
}
