//! Redis dialect: command pipelines

use dbnav_core::{
    BackendKind, Capabilities, ColumnSpec, Command, Dialect, DialectError, GeneratorConfig,
    Operation, OperationRequest, Pagination, QuoteStyle, RequestField, Result, Statement,
};

const NO_SCHEMA: &str = "keys have no schema";
const NO_VIEW: &str = "no view concept";
const NO_TRIGGER: &str = "no trigger concept";
const NO_ROUTINES: &str = "no stored routines; use Lua scripts or functions loaded at runtime";
const NO_INDEX: &str = "no secondary indexes";
const NO_SOURCE: &str = "keys have no DDL source";
const NO_TEMPLATE: &str = "keys are created by writing them";

const CAPABILITIES: Capabilities = Capabilities::all_except(&[
    (Operation::ShowSchemas, NO_SCHEMA),
    (Operation::ShowColumns, NO_SCHEMA),
    (Operation::ShowViews, NO_VIEW),
    (Operation::ShowSystemViews, NO_VIEW),
    (Operation::ShowTriggers, NO_TRIGGER),
    (Operation::ShowProcedures, NO_ROUTINES),
    (Operation::ShowFunctions, NO_ROUTINES),
    (Operation::ShowIndexes, NO_INDEX),
    (Operation::AddColumn, NO_SCHEMA),
    (Operation::UpdateColumn, NO_SCHEMA),
    (Operation::RenameColumn, NO_SCHEMA),
    (
        Operation::CreateDatabase,
        "databases are a fixed set of numbered slots",
    ),
    (Operation::RenameView, NO_VIEW),
    (Operation::RenameProcedure, NO_ROUTINES),
    (Operation::RenameFunction, NO_ROUTINES),
    (Operation::RenameTrigger, NO_TRIGGER),
    (Operation::ShowTableSource, NO_SOURCE),
    (Operation::ShowViewSource, NO_VIEW),
    (Operation::ShowProcedureSource, NO_ROUTINES),
    (Operation::ShowFunctionSource, NO_ROUTINES),
    (Operation::ShowTriggerSource, NO_TRIGGER),
    (Operation::TableTemplate, NO_TEMPLATE),
    (Operation::ViewTemplate, NO_VIEW),
    (Operation::ProcedureTemplate, NO_ROUTINES),
    (Operation::TriggerTemplate, NO_TRIGGER),
    (Operation::FunctionTemplate, NO_ROUTINES),
    (Operation::DropIndex, NO_INDEX),
    (Operation::DropTrigger, NO_TRIGGER),
]);

/// Parse a logical database as a Redis database index
pub fn parse_database_index(database: &str) -> Result<u32> {
    database.trim().parse::<u32>().map_err(|_| {
        DialectError::invalid(
            RequestField::Database,
            format!("must be a numeric database index, got {database:?}"),
        )
    })
}

/// Redis dialect.
///
/// Databases are numbered slots, tables are keys or key patterns, and every
/// keyspace statement is prefixed with a `SELECT` of the target slot.
#[derive(Debug)]
pub struct RedisDialect {
    default_page_size: u64,
    scan_count: u64,
}

impl RedisDialect {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            default_page_size: config.default_page_size,
            scan_count: config.redis.scan_count,
        }
    }

    fn in_database(&self, request: &OperationRequest, command: Command) -> Result<Statement> {
        let index = parse_database_index(request.require(RequestField::Database)?)?;
        Ok(Statement::Commands(vec![
            Command::new(["SELECT".to_string(), index.to_string()]),
            command,
        ]))
    }

    fn scan(&self, request: &OperationRequest) -> Result<Command> {
        let page = Pagination::from_request(request, self.default_page_size)?;
        let cursor = match request.cursor() {
            Some(cursor) => cursor.trim().parse::<u64>().map_err(|_| {
                DialectError::invalid(RequestField::Cursor, "must be a numeric SCAN cursor")
            })?,
            None if page.is_first_page() => 0,
            None => {
                return Err(DialectError::invalid(
                    RequestField::Cursor,
                    format!(
                        "is required to reach page {}; SCAN positions are only known by cursor",
                        page.page_index
                    ),
                ));
            }
        };

        Ok(Command::new([
            "SCAN".to_string(),
            cursor.to_string(),
            "MATCH".to_string(),
            request.table().unwrap_or("*").to_string(),
            "COUNT".to_string(),
            page.page_size.to_string(),
        ]))
    }
}

impl Dialect for RedisDialect {
    fn backend(&self) -> BackendKind {
        BackendKind::Redis
    }

    fn capabilities(&self) -> &Capabilities {
        &CAPABILITIES
    }

    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::None
    }

    fn required_fields(&self, operation: Operation) -> &'static [RequestField] {
        use RequestField::{Database, Name, NewName, Table};

        match operation {
            Operation::BuildPage | Operation::Count => &[Database],
            Operation::RenameTable => &[Database, Table, NewName],
            Operation::CreateUser => &[Name],
            _ => operation.required_fields(),
        }
    }

    fn native_type(&self, column: &ColumnSpec) -> Result<String> {
        Err(DialectError::unsupported_type(&column.logical_type))
    }

    fn render(&self, request: &OperationRequest) -> Result<Statement> {
        let operation = request.operation();
        match operation {
            Operation::ShowDatabases => single(["CONFIG", "GET", "databases"]),
            Operation::ShowTables => self.in_database(
                request,
                Command::new([
                    "SCAN".to_string(),
                    "0".to_string(),
                    "MATCH".to_string(),
                    "*".to_string(),
                    "COUNT".to_string(),
                    self.scan_count.to_string(),
                ]),
            ),
            Operation::ShowUsers => single(["ACL", "USERS"]),
            Operation::BuildPage => {
                let scan = self.scan(request)?;
                self.in_database(request, scan)
            }
            Operation::Count => self.in_database(request, Command::new(["DBSIZE"])),
            Operation::TruncateDatabase => self.in_database(request, Command::new(["FLUSHDB"])),
            Operation::RenameTable => {
                let rename = Command::new([
                    "RENAME",
                    request.require(RequestField::Table)?,
                    request.require(RequestField::NewName)?,
                ]);
                self.in_database(request, rename)
            }
            Operation::CreateUser => {
                let name = request.require(RequestField::Name)?;
                let secret = match request.password() {
                    Some(password) if !password.is_empty() => format!(">{password}"),
                    _ => "nopass".to_string(),
                };
                Ok(Statement::Commands(vec![Command::new([
                    "ACL".to_string(),
                    "SETUSER".to_string(),
                    name.to_string(),
                    "on".to_string(),
                    secret,
                    "~*".to_string(),
                    "+@all".to_string(),
                ])]))
            }
            Operation::ProcessList => single(["CLIENT", "LIST"]),
            Operation::VariableList => single(["CONFIG", "GET", "*"]),
            Operation::StatusList => single(["INFO"]),
            Operation::Ping => single(["PING"]),
            Operation::ShowSchemas
            | Operation::ShowColumns
            | Operation::ShowViews
            | Operation::ShowSystemViews
            | Operation::ShowTriggers
            | Operation::ShowProcedures
            | Operation::ShowFunctions
            | Operation::ShowIndexes
            | Operation::AddColumn
            | Operation::UpdateColumn
            | Operation::RenameColumn
            | Operation::CreateDatabase
            | Operation::RenameView
            | Operation::RenameProcedure
            | Operation::RenameFunction
            | Operation::RenameTrigger
            | Operation::ShowTableSource
            | Operation::ShowViewSource
            | Operation::ShowProcedureSource
            | Operation::ShowFunctionSource
            | Operation::ShowTriggerSource
            | Operation::TableTemplate
            | Operation::ViewTemplate
            | Operation::ProcedureTemplate
            | Operation::TriggerTemplate
            | Operation::FunctionTemplate
            | Operation::DropIndex
            | Operation::DropTrigger => Err(self.mismatch(operation)),
        }
    }
}

fn single<const N: usize>(args: [&str; N]) -> Result<Statement> {
    Ok(Statement::Commands(vec![Command::new(args)]))
}
