//! Elasticsearch dialect: REST request descriptors

use serde_json::json;

use dbnav_core::{
    BackendKind, Capabilities, ColumnSpec, Dialect, DialectError, GeneratorConfig, HttpRequest,
    LogicalType, Operation, OperationRequest, Pagination, QuoteStyle, RequestField, Result,
    Statement,
};

const NO_DATABASE: &str = "no database level; indices are top-level";
const NO_SCHEMA: &str = "no schema concept";
const NO_VIEW: &str = "no view concept";
const NO_TRIGGER: &str = "no trigger concept";
const NO_PROCEDURE: &str = "no stored procedure concept";
const NO_FUNCTION: &str = "no stored function concept";
const NO_DDL_SOURCE: &str = "no DDL source; inspect the index mapping instead";
const IMMUTABLE_MAPPING: &str = "field mappings cannot change in place; reindex instead";

const CAPABILITIES: Capabilities = Capabilities::all_except(&[
    (Operation::ShowDatabases, NO_DATABASE),
    (Operation::ShowSchemas, NO_SCHEMA),
    (Operation::ShowViews, NO_VIEW),
    (Operation::ShowSystemViews, NO_VIEW),
    (Operation::ShowTriggers, NO_TRIGGER),
    (Operation::ShowProcedures, NO_PROCEDURE),
    (Operation::ShowFunctions, NO_FUNCTION),
    (
        Operation::ShowIndexes,
        "no secondary indexes; every mapped field is indexed",
    ),
    (Operation::UpdateColumn, IMMUTABLE_MAPPING),
    (Operation::RenameColumn, IMMUTABLE_MAPPING),
    (Operation::CreateDatabase, NO_DATABASE),
    (Operation::TruncateDatabase, NO_DATABASE),
    (
        Operation::RenameTable,
        "indices cannot be renamed; reindex or add an alias instead",
    ),
    (Operation::RenameView, NO_VIEW),
    (Operation::RenameProcedure, NO_PROCEDURE),
    (Operation::RenameFunction, NO_FUNCTION),
    (Operation::RenameTrigger, NO_TRIGGER),
    (Operation::ShowTableSource, NO_DDL_SOURCE),
    (Operation::ShowViewSource, NO_VIEW),
    (Operation::ShowProcedureSource, NO_PROCEDURE),
    (Operation::ShowFunctionSource, NO_FUNCTION),
    (Operation::ShowTriggerSource, NO_TRIGGER),
    (Operation::ViewTemplate, NO_VIEW),
    (Operation::ProcedureTemplate, NO_PROCEDURE),
    (Operation::TriggerTemplate, NO_TRIGGER),
    (Operation::FunctionTemplate, NO_FUNCTION),
    (
        Operation::DropIndex,
        "no secondary indexes; every mapped field is indexed",
    ),
    (Operation::DropTrigger, NO_TRIGGER),
]);

/// Characters Elasticsearch rejects in index names
const FORBIDDEN_INDEX_CHARS: [char; 11] = ['\\', '/', '*', '?', '"', '<', '>', '|', ',', '#', ':'];

const MAX_INDEX_NAME_BYTES: usize = 255;

/// Check an index name against Elasticsearch's naming rules
pub fn validate_index_name(field: RequestField, name: &str) -> Result<&str> {
    let reason = if name == "." || name == ".." {
        Some("cannot be '.' or '..'".to_string())
    } else if name.starts_with(['-', '_', '+']) {
        Some("cannot start with '-', '_' or '+'".to_string())
    } else if name.chars().any(|c| c.is_ascii_uppercase()) {
        Some("must be lowercase".to_string())
    } else if let Some(c) = name
        .chars()
        .find(|c| c.is_whitespace() || FORBIDDEN_INDEX_CHARS.contains(c))
    {
        Some(format!("contains forbidden character {c:?}"))
    } else if name.len() > MAX_INDEX_NAME_BYTES {
        Some(format!("is longer than {MAX_INDEX_NAME_BYTES} bytes"))
    } else {
        None
    };

    match reason {
        Some(reason) => Err(DialectError::invalid(field, reason)),
        None => Ok(name),
    }
}

/// Elasticsearch dialect.
///
/// Tables are indices, columns are mapped fields, and pages are served by
/// the scroll API: the first page opens a scroll context and later pages
/// continue it by cursor.
#[derive(Debug)]
pub struct ElasticsearchDialect {
    default_page_size: u64,
    scroll_keep_alive: String,
}

impl ElasticsearchDialect {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            default_page_size: config.default_page_size,
            scroll_keep_alive: config.elasticsearch.scroll_keep_alive.clone(),
        }
    }

    fn index<'a>(&self, request: &'a OperationRequest) -> Result<&'a str> {
        validate_index_name(RequestField::Table, request.require(RequestField::Table)?)
    }

    fn build_page(&self, request: &OperationRequest) -> Result<HttpRequest> {
        let page = Pagination::from_request(request, self.default_page_size)?;

        if let Some(cursor) = request.cursor() {
            return Ok(HttpRequest::post("/_search/scroll").with_body(json!({
                "scroll": self.scroll_keep_alive,
                "scroll_id": cursor,
            })));
        }
        if !page.is_first_page() {
            return Err(DialectError::invalid(
                RequestField::Cursor,
                format!(
                    "is required to reach page {} of a scroll; only the first page opens one",
                    page.page_index
                ),
            ));
        }

        Ok(HttpRequest::post(format!(
            "/{}/_search?scroll={}",
            self.index(request)?,
            self.scroll_keep_alive
        ))
        .with_body(json!({
            "size": page.page_size,
            "query": { "match_all": {} },
        })))
    }

    /// User names travel in the URL path
    fn user_name<'a>(&self, request: &'a OperationRequest) -> Result<&'a str> {
        let name = request.require(RequestField::Name)?;
        if name.contains(['/', '?', '#', '%']) || name.chars().any(char::is_whitespace) {
            return Err(DialectError::invalid(
                RequestField::Name,
                "cannot contain '/', '?', '#', '%' or whitespace",
            ));
        }
        Ok(name)
    }
}

impl Dialect for ElasticsearchDialect {
    fn backend(&self) -> BackendKind {
        BackendKind::ElasticSearch
    }

    fn capabilities(&self) -> &Capabilities {
        &CAPABILITIES
    }

    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::None
    }

    fn required_fields(&self, operation: Operation) -> &'static [RequestField] {
        use RequestField::{Name, Password, Table};

        match operation {
            Operation::ShowTables => &[],
            Operation::ShowColumns => &[Table],
            Operation::CreateUser => &[Name, Password],
            _ => operation.required_fields(),
        }
    }

    fn native_type(&self, column: &ColumnSpec) -> Result<String> {
        let native = match column.resolved_type()? {
            LogicalType::String | LogicalType::Uuid => "keyword",
            LogicalType::Text => "text",
            LogicalType::Integer => "integer",
            LogicalType::BigInt => "long",
            LogicalType::SmallInt => "short",
            LogicalType::Float => "float",
            LogicalType::Double => "double",
            LogicalType::Boolean => "boolean",
            LogicalType::Date | LogicalType::DateTime | LogicalType::Timestamp => "date",
            LogicalType::Blob => "binary",
            LogicalType::Json => "object",
            LogicalType::Decimal | LogicalType::Time => {
                return Err(DialectError::unsupported_type(&column.logical_type));
            }
        };
        Ok(native.to_string())
    }

    fn render(&self, request: &OperationRequest) -> Result<Statement> {
        let operation = request.operation();
        let http = match operation {
            Operation::ShowTables => HttpRequest::get("/_cat/indices?format=json"),
            Operation::ShowColumns => {
                HttpRequest::get(format!("/{}/_mapping", self.index(request)?))
            }
            Operation::ShowUsers => HttpRequest::get("/_security/user"),
            Operation::AddColumn => {
                let column = request.require_column()?;
                HttpRequest::put(format!("/{}/_mapping", self.index(request)?)).with_body(json!({
                    "properties": {
                        column.name.as_str(): { "type": self.native_type(column)? }
                    }
                }))
            }
            Operation::BuildPage => self.build_page(request)?,
            Operation::Count => HttpRequest::get(format!("/{}/_count", self.index(request)?)),
            Operation::CreateUser => {
                HttpRequest::post(format!("/_security/user/{}", self.user_name(request)?))
                    .with_body(json!({
                        "password": request.require(RequestField::Password)?,
                        "roles": [],
                    }))
            }
            Operation::TableTemplate => {
                let index = match request.table() {
                    Some(table) => validate_index_name(RequestField::Table, table)?,
                    None => "new_index",
                };
                HttpRequest::put(format!("/{index}")).with_body(json!({
                    "settings": {
                        "number_of_shards": 1,
                        "number_of_replicas": 1,
                    },
                    "mappings": {
                        "properties": {
                            "name": { "type": "keyword" },
                            "create_time": { "type": "date" },
                        }
                    }
                }))
            }
            Operation::ProcessList => HttpRequest::get("/_tasks?detailed=true"),
            Operation::VariableList => HttpRequest::get("/_cluster/settings?include_defaults=true"),
            Operation::StatusList => HttpRequest::get("/_cluster/health"),
            Operation::Ping => HttpRequest::get("/"),
            Operation::ShowDatabases
            | Operation::ShowSchemas
            | Operation::ShowViews
            | Operation::ShowSystemViews
            | Operation::ShowTriggers
            | Operation::ShowProcedures
            | Operation::ShowFunctions
            | Operation::ShowIndexes
            | Operation::UpdateColumn
            | Operation::RenameColumn
            | Operation::CreateDatabase
            | Operation::TruncateDatabase
            | Operation::RenameTable
            | Operation::RenameView
            | Operation::RenameProcedure
            | Operation::RenameFunction
            | Operation::RenameTrigger
            | Operation::ShowTableSource
            | Operation::ShowViewSource
            | Operation::ShowProcedureSource
            | Operation::ShowFunctionSource
            | Operation::ShowTriggerSource
            | Operation::ViewTemplate
            | Operation::ProcedureTemplate
            | Operation::TriggerTemplate
            | Operation::FunctionTemplate
            | Operation::DropIndex
            | Operation::DropTrigger => return Err(self.mismatch(operation)),
        };
        Ok(Statement::Http(http))
    }
}
