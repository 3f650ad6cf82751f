//! MongoDB dialect: database commands for `runCommand`

use serde_json::{Value, json};

use dbnav_core::{
    BackendKind, Capabilities, ColumnSpec, Dialect, DialectError, DocumentCommand,
    GeneratorConfig, LogicalType, Operation, OperationRequest, Pagination, QuoteStyle,
    RequestField, Result, Statement,
};

const ADMIN: &str = "admin";

const SCHEMALESS: &str = "collections are schemaless; there are no column definitions";
const NO_TRIGGER: &str = "no trigger concept; use change streams instead";
const NO_ROUTINES: &str = "no server-side stored routines";

const CAPABILITIES: Capabilities = Capabilities::all_except(&[
    (Operation::ShowSchemas, "no schema level between database and collection"),
    (Operation::ShowColumns, SCHEMALESS),
    (Operation::ShowTriggers, NO_TRIGGER),
    (Operation::ShowProcedures, NO_ROUTINES),
    (Operation::ShowFunctions, NO_ROUTINES),
    (Operation::AddColumn, SCHEMALESS),
    (Operation::UpdateColumn, SCHEMALESS),
    (Operation::RenameColumn, SCHEMALESS),
    (
        Operation::CreateDatabase,
        "databases are created implicitly by the first write",
    ),
    (
        Operation::TruncateDatabase,
        "no truncate; drop the collections instead",
    ),
    (
        Operation::RenameView,
        "views cannot be renamed; drop and recreate instead",
    ),
    (Operation::RenameProcedure, NO_ROUTINES),
    (Operation::RenameFunction, NO_ROUTINES),
    (Operation::RenameTrigger, NO_TRIGGER),
    (Operation::ShowTableSource, SCHEMALESS),
    (
        Operation::ShowViewSource,
        "view pipelines are listed by listCollections",
    ),
    (Operation::ShowProcedureSource, NO_ROUTINES),
    (Operation::ShowFunctionSource, NO_ROUTINES),
    (Operation::ShowTriggerSource, NO_TRIGGER),
    (Operation::ProcedureTemplate, NO_ROUTINES),
    (Operation::TriggerTemplate, NO_TRIGGER),
    (Operation::FunctionTemplate, NO_ROUTINES),
    (Operation::DropTrigger, NO_TRIGGER),
]);

const FORBIDDEN_DATABASE_CHARS: [char; 12] =
    ['/', '\\', '.', ' ', '"', '$', '*', '<', '>', ':', '|', '?'];

const MAX_DATABASE_NAME_BYTES: usize = 64;

pub fn validate_database_name(name: &str) -> Result<&str> {
    if name.is_empty() {
        return Err(DialectError::invalid(RequestField::Database, "cannot be empty"));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_DATABASE_CHARS.contains(c)) {
        return Err(DialectError::invalid(
            RequestField::Database,
            format!("contains forbidden character {c:?}"),
        ));
    }
    if name.len() >= MAX_DATABASE_NAME_BYTES {
        return Err(DialectError::invalid(
            RequestField::Database,
            format!("must be shorter than {MAX_DATABASE_NAME_BYTES} bytes"),
        ));
    }
    Ok(name)
}

/// Check a collection name. `system.` collections may be read but not created.
pub fn validate_collection_name(field: RequestField, name: &str, creating: bool) -> Result<&str> {
    if name.contains('$') {
        return Err(DialectError::invalid(field, "cannot contain '$'"));
    }
    if creating && name.starts_with("system.") {
        return Err(DialectError::invalid(
            field,
            "cannot use the reserved 'system.' prefix",
        ));
    }
    Ok(name)
}

/// MongoDB dialect.
///
/// Every statement is a single database command addressed to one database;
/// server-level commands go to `admin`.
#[derive(Debug)]
pub struct MongoDbDialect {
    default_page_size: u64,
}

impl MongoDbDialect {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            default_page_size: config.default_page_size,
        }
    }

    fn database<'a>(&self, request: &'a OperationRequest) -> Result<&'a str> {
        validate_database_name(request.require(RequestField::Database)?)
    }

    fn collection<'a>(&self, request: &'a OperationRequest) -> Result<&'a str> {
        validate_collection_name(
            RequestField::Table,
            request.require(RequestField::Table)?,
            false,
        )
    }

    fn on_database(&self, request: &OperationRequest, command: Value) -> Result<Statement> {
        Ok(Statement::Document(DocumentCommand::new(
            self.database(request)?,
            command,
        )))
    }

    /// Database for statements that fall back to a placeholder
    fn database_or<'a>(&self, request: &'a OperationRequest, fallback: &'a str) -> Result<&'a str> {
        match request.database() {
            Some(database) => validate_database_name(database),
            None => Ok(fallback),
        }
    }

    fn list_collections(&self, request: &OperationRequest, filter: Value) -> Result<Statement> {
        self.on_database(
            request,
            json!({
                "listCollections": 1,
                "filter": filter,
                "nameOnly": true,
            }),
        )
    }

    fn new_collection<'a>(
        &self,
        request: &'a OperationRequest,
        fallback: &'a str,
    ) -> Result<&'a str> {
        match request.name() {
            Some(name) => validate_collection_name(RequestField::Name, name, true),
            None => Ok(fallback),
        }
    }
}

impl Dialect for MongoDbDialect {
    fn backend(&self) -> BackendKind {
        BackendKind::MongoDb
    }

    fn capabilities(&self) -> &Capabilities {
        &CAPABILITIES
    }

    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::None
    }

    fn required_fields(&self, operation: Operation) -> &'static [RequestField] {
        use RequestField::{Database, Name, NewName, Password, Table};

        match operation {
            Operation::BuildPage | Operation::Count => &[Database, Table],
            Operation::RenameTable => &[Database, Table, NewName],
            Operation::DropIndex => &[Database, Table, Name],
            Operation::CreateUser => &[Name, Password],
            _ => operation.required_fields(),
        }
    }

    fn native_type(&self, column: &ColumnSpec) -> Result<String> {
        let native = match column.resolved_type()? {
            LogicalType::String | LogicalType::Text | LogicalType::Uuid => "string",
            LogicalType::Integer | LogicalType::SmallInt => "int",
            LogicalType::BigInt => "long",
            LogicalType::Float | LogicalType::Double => "double",
            LogicalType::Decimal => "decimal",
            LogicalType::Boolean => "bool",
            LogicalType::Date | LogicalType::DateTime | LogicalType::Timestamp => "date",
            LogicalType::Blob => "binData",
            LogicalType::Json => "object",
            LogicalType::Time => return Err(DialectError::unsupported_type(&column.logical_type)),
        };
        Ok(native.to_string())
    }

    fn render(&self, request: &OperationRequest) -> Result<Statement> {
        let operation = request.operation();
        match operation {
            Operation::ShowDatabases => Ok(Statement::Document(DocumentCommand::new(
                ADMIN,
                json!({ "listDatabases": 1, "nameOnly": true }),
            ))),
            Operation::ShowTables => {
                self.list_collections(request, json!({ "type": "collection" }))
            }
            Operation::ShowViews => self.list_collections(request, json!({ "type": "view" })),
            Operation::ShowSystemViews => {
                self.list_collections(request, json!({ "name": { "$regex": "^system\\." } }))
            }
            Operation::ShowUsers => Ok(Statement::Document(DocumentCommand::new(
                self.database_or(request, ADMIN)?,
                json!({ "usersInfo": 1 }),
            ))),
            Operation::ShowIndexes => {
                let collection = self.collection(request)?;
                self.on_database(request, json!({ "listIndexes": collection }))
            }
            Operation::BuildPage => {
                let page = Pagination::from_request(request, self.default_page_size)?;
                let collection = self.collection(request)?;
                self.on_database(
                    request,
                    json!({
                        "find": collection,
                        "filter": {},
                        "skip": page.offset,
                        "limit": page.page_size,
                    }),
                )
            }
            Operation::Count => {
                let collection = self.collection(request)?;
                self.on_database(request, json!({ "count": collection }))
            }
            Operation::RenameTable => {
                let database = self.database(request)?;
                let collection = self.collection(request)?;
                let new_name = validate_collection_name(
                    RequestField::NewName,
                    request.require(RequestField::NewName)?,
                    true,
                )?;
                Ok(Statement::Document(DocumentCommand::new(
                    ADMIN,
                    json!({
                        "renameCollection": format!("{database}.{collection}"),
                        "to": format!("{database}.{new_name}"),
                        "dropTarget": false,
                    }),
                )))
            }
            Operation::CreateUser => {
                let database = self.database_or(request, ADMIN)?;
                Ok(Statement::Document(DocumentCommand::new(
                    database,
                    json!({
                        "createUser": request.require(RequestField::Name)?,
                        "pwd": request.require(RequestField::Password)?,
                        "roles": [{ "role": "readWrite", "db": database }],
                    }),
                )))
            }
            Operation::TableTemplate => {
                let database = self.database_or(request, "new_database")?;
                let name = self.new_collection(request, "new_collection")?;
                Ok(Statement::Document(DocumentCommand::new(
                    database,
                    json!({ "create": name }),
                )))
            }
            Operation::ViewTemplate => {
                let database = self.database_or(request, "new_database")?;
                let name = self.new_collection(request, "new_view")?;
                let source = match request.table() {
                    Some(table) => validate_collection_name(RequestField::Table, table, false)?,
                    None => "new_collection",
                };
                Ok(Statement::Document(DocumentCommand::new(
                    database,
                    json!({ "create": name, "viewOn": source, "pipeline": [] }),
                )))
            }
            Operation::DropIndex => {
                let collection = self.collection(request)?;
                self.on_database(
                    request,
                    json!({
                        "dropIndexes": collection,
                        "index": request.require(RequestField::Name)?,
                    }),
                )
            }
            Operation::ProcessList => admin(json!({ "currentOp": 1 })),
            Operation::VariableList => admin(json!({ "getParameter": "*" })),
            Operation::StatusList => admin(json!({ "serverStatus": 1 })),
            Operation::Ping => admin(json!({ "ping": 1 })),
            Operation::ShowSchemas
            | Operation::ShowColumns
            | Operation::ShowTriggers
            | Operation::ShowProcedures
            | Operation::ShowFunctions
            | Operation::AddColumn
            | Operation::UpdateColumn
            | Operation::RenameColumn
            | Operation::CreateDatabase
            | Operation::TruncateDatabase
            | Operation::RenameView
            | Operation::RenameProcedure
            | Operation::RenameFunction
            | Operation::RenameTrigger
            | Operation::ShowTableSource
            | Operation::ShowViewSource
            | Operation::ShowProcedureSource
            | Operation::ShowFunctionSource
            | Operation::ShowTriggerSource
            | Operation::ProcedureTemplate
            | Operation::TriggerTemplate
            | Operation::FunctionTemplate
            | Operation::DropTrigger => Err(self.mismatch(operation)),
        }
    }
}

fn admin(command: Value) -> Result<Statement> {
    Ok(Statement::Document(DocumentCommand::new(ADMIN, command)))
}
