//! Generated statements and generation results

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;

use crate::Operation;
use crate::escape::quote_command_arg;

/// HTTP verb of a REST request descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

/// REST request for search engines addressed over HTTP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Renders in console form: the request line, then the pretty-printed body
impl fmt::Display for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)?;
        if let Some(body) = &self.body {
            let pretty = serde_json::to_string_pretty(body).map_err(|_| fmt::Error)?;
            write!(f, "\n{pretty}")?;
        }
        Ok(())
    }
}

/// A database command for document stores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentCommand {
    pub database: String,
    pub command: Value,
}

impl DocumentCommand {
    pub fn new(database: impl Into<String>, command: Value) -> Self {
        Self {
            database: database.into(),
            command,
        }
    }
}

impl fmt::Display for DocumentCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let database = serde_json::to_string(&self.database).map_err(|_| fmt::Error)?;
        write!(f, "db.getSiblingDB({database}).runCommand({})", self.command)
    }
}

/// One key-value store command as an argument vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Command {
    pub args: Vec<String>,
}

impl Command {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

/// Renders as a redis-cli line, quoting arguments that need it
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&quote_command_arg(arg))?;
        }
        Ok(())
    }
}

/// A generated payload, ready for the caller's executor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum Statement {
    /// SQL text; scripts separate statements with `;\n`
    Sql(String),
    Http(HttpRequest),
    Document(DocumentCommand),
    Commands(Vec<Command>),
}

impl Statement {
    pub fn sql(text: impl Into<String>) -> Self {
        Self::Sql(text.into())
    }

    /// Join several SQL statements into one script
    pub fn script<I, S>(statements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parts: Vec<String> = statements
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        if parts.len() == 1 {
            return Self::Sql(parts.into_iter().collect());
        }
        Self::Sql(format!("{};", parts.join(";\n")))
    }

    pub fn as_sql(&self) -> Option<&str> {
        match self {
            Self::Sql(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_http(&self) -> Option<&HttpRequest> {
        match self {
            Self::Http(request) => Some(request),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&DocumentCommand> {
        match self {
            Self::Document(command) => Some(command),
            _ => None,
        }
    }

    pub fn as_commands(&self) -> Option<&[Command]> {
        match self {
            Self::Commands(commands) => Some(commands),
            _ => None,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sql(text) => f.write_str(text),
            Self::Http(request) => fmt::Display::fmt(request, f),
            Self::Document(command) => fmt::Display::fmt(command, f),
            Self::Commands(commands) => {
                for (i, command) in commands.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    fmt::Display::fmt(command, f)?;
                }
                Ok(())
            }
        }
    }
}

/// Outcome of asking a dialect for an operation.
///
/// `Unsupported` is data, not a failure: the backend structurally cannot
/// express the operation and the reason is shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum StatementResult {
    Generated(Statement),
    Unsupported {
        operation: Operation,
        reason: Cow<'static, str>,
    },
}

impl StatementResult {
    pub fn unsupported(operation: Operation, reason: impl Into<Cow<'static, str>>) -> Self {
        Self::Unsupported {
            operation,
            reason: reason.into(),
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }

    pub fn statement(&self) -> Option<&Statement> {
        match self {
            Self::Generated(statement) => Some(statement),
            Self::Unsupported { .. } => None,
        }
    }

    pub fn into_statement(self) -> Option<Statement> {
        match self {
            Self::Generated(statement) => Some(statement),
            Self::Unsupported { .. } => None,
        }
    }

    /// SQL text, when a SQL statement was generated
    pub fn sql(&self) -> Option<&str> {
        self.statement().and_then(Statement::as_sql)
    }

    pub fn unsupported_reason(&self) -> Option<&str> {
        match self {
            Self::Generated(_) => None,
            Self::Unsupported { reason, .. } => Some(reason),
        }
    }
}
