//! Command-line arguments

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use dbnav_core::{ColumnSpec, Operation, OperationRequest};
use strum::IntoEnumIterator;

/// dbnav - statement generation for database navigator backends
#[derive(Parser, Debug)]
#[command(name = "dbnav")]
#[command(about = "Generate backend statements for database navigator operations", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Generator settings file (TOML); defaults to the user config directory
    #[arg(long, global = true, env = "DBNAV_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Also write JSON logs to the log directory
    #[arg(long, global = true)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List backend tags, aliases and families
    Backends,

    /// Show which operations backends support
    Capabilities {
        /// Limit output to one backend, listing reasons for unsupported operations
        #[arg(short, long)]
        backend: Option<String>,
    },

    /// Generate the statement for one operation
    Generate(GenerateArgs),

    /// Print the effective generator configuration as TOML
    Config,
}

/// Output format for generated statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The statement as it would be sent
    Text,
    /// The full generation result as JSON
    Json,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Backend tag or alias (mysql, pg, mssql, es, mongo, ...)
    pub backend: String,

    /// Operation name (show-tables, build-page, ...)
    pub operation: String,

    #[arg(long)]
    pub database: Option<String>,

    #[arg(long)]
    pub schema: Option<String>,

    #[arg(long)]
    pub table: Option<String>,

    /// Object name (view, routine, trigger, index or user)
    #[arg(long, conflicts_with = "user")]
    pub name: Option<String>,

    #[arg(long)]
    pub new_name: Option<String>,

    /// Column name for column operations
    #[arg(long)]
    pub column: Option<String>,

    /// Logical column type (string, integer, decimal, ...)
    #[arg(long = "type", value_name = "TYPE", requires = "column")]
    pub column_type: Option<String>,

    #[arg(long, requires = "column")]
    pub length: Option<u32>,

    #[arg(long, requires = "column")]
    pub scale: Option<u32>,

    #[arg(long, requires = "column")]
    pub not_null: bool,

    #[arg(long, requires = "column")]
    pub default: Option<String>,

    #[arg(long, requires = "column")]
    pub comment: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub page_size: Option<i64>,

    /// Zero-based page index
    #[arg(long = "page", allow_negative_numbers = true)]
    pub page_index: Option<i64>,

    /// Continuation cursor for scroll/scan paging
    #[arg(long)]
    pub cursor: Option<String>,

    /// User name for create-user
    #[arg(long)]
    pub user: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl GenerateArgs {
    pub fn parse_operation(&self) -> Result<Operation> {
        Operation::from_str(self.operation.trim()).with_context(|| {
            let known: Vec<&str> = Operation::iter().map(|op| op.name()).collect();
            format!(
                "unknown operation '{}'; expected one of: {}",
                self.operation,
                known.join(", ")
            )
        })
    }

    /// Build the request the dialect will see
    pub fn to_request(&self) -> Result<OperationRequest> {
        let mut request = OperationRequest::new(self.parse_operation()?);

        if let Some(database) = &self.database {
            request = request.with_database(database);
        }
        if let Some(schema) = &self.schema {
            request = request.with_schema(schema);
        }
        if let Some(table) = &self.table {
            request = request.with_table(table);
        }
        if let Some(name) = self.name.as_ref().or(self.user.as_ref()) {
            request = request.with_name(name);
        }
        if let Some(new_name) = &self.new_name {
            request = request.with_new_name(new_name);
        }
        if let Some(column) = self.column_spec() {
            request = request.with_column(column);
        }
        if let Some(page_size) = self.page_size {
            request = request.with_page_size(page_size);
        }
        if let Some(page_index) = self.page_index {
            request = request.with_page_index(page_index);
        }
        if let Some(cursor) = &self.cursor {
            request = request.with_cursor(cursor);
        }
        if let Some(password) = &self.password {
            request = request.with_password(password);
        }

        Ok(request)
    }

    fn column_spec(&self) -> Option<ColumnSpec> {
        let name = self.column.as_ref()?;
        let mut column = ColumnSpec::new(name, self.column_type.as_deref().unwrap_or_default())
            .with_nullable(!self.not_null);
        if let Some(length) = self.length {
            column = column.with_length(length);
        }
        if let Some(scale) = self.scale {
            column = column.with_scale(scale);
        }
        if let Some(default) = &self.default {
            column = column.with_default(default);
        }
        if let Some(comment) = &self.comment {
            column = column.with_comment(comment);
        }
        Some(column)
    }
}
