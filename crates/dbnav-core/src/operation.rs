//! The fixed operation set every dialect answers for

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// A navigator action that produces a statement.
///
/// Names render in kebab-case (`show-tables`) and parse case-insensitively.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
pub enum Operation {
    // Listing
    ShowDatabases,
    ShowSchemas,
    ShowTables,
    ShowColumns,
    ShowViews,
    ShowSystemViews,
    ShowUsers,
    ShowTriggers,
    ShowProcedures,
    ShowFunctions,
    ShowIndexes,

    // Column DDL
    AddColumn,
    UpdateColumn,
    RenameColumn,

    // Data
    BuildPage,
    Count,

    // Database DDL
    CreateDatabase,
    TruncateDatabase,

    // Renames
    RenameTable,
    RenameView,
    RenameProcedure,
    RenameFunction,
    RenameTrigger,

    // Object source
    ShowTableSource,
    ShowViewSource,
    ShowProcedureSource,
    ShowFunctionSource,
    ShowTriggerSource,

    // Users
    CreateUser,

    // Templates
    TableTemplate,
    ViewTemplate,
    ProcedureTemplate,
    TriggerTemplate,
    FunctionTemplate,

    // Maintenance
    DropIndex,
    DropTrigger,
    ProcessList,
    VariableList,
    StatusList,
    Ping,
}

/// Grouping used when presenting operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OperationCategory {
    Listing,
    ColumnDdl,
    Data,
    DatabaseDdl,
    Rename,
    Source,
    User,
    Template,
    Maintenance,
}

/// A field of an [`OperationRequest`](crate::OperationRequest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RequestField {
    Database,
    Schema,
    Table,
    Name,
    NewName,
    Column,
    ColumnType,
    PageSize,
    PageIndex,
    Cursor,
    Password,
}

impl Operation {
    pub fn category(&self) -> OperationCategory {
        match self {
            Self::ShowDatabases
            | Self::ShowSchemas
            | Self::ShowTables
            | Self::ShowColumns
            | Self::ShowViews
            | Self::ShowSystemViews
            | Self::ShowUsers
            | Self::ShowTriggers
            | Self::ShowProcedures
            | Self::ShowFunctions
            | Self::ShowIndexes => OperationCategory::Listing,
            Self::AddColumn | Self::UpdateColumn | Self::RenameColumn => {
                OperationCategory::ColumnDdl
            }
            Self::BuildPage | Self::Count => OperationCategory::Data,
            Self::CreateDatabase | Self::TruncateDatabase => OperationCategory::DatabaseDdl,
            Self::RenameTable
            | Self::RenameView
            | Self::RenameProcedure
            | Self::RenameFunction
            | Self::RenameTrigger => OperationCategory::Rename,
            Self::ShowTableSource
            | Self::ShowViewSource
            | Self::ShowProcedureSource
            | Self::ShowFunctionSource
            | Self::ShowTriggerSource => OperationCategory::Source,
            Self::CreateUser => OperationCategory::User,
            Self::TableTemplate
            | Self::ViewTemplate
            | Self::ProcedureTemplate
            | Self::TriggerTemplate
            | Self::FunctionTemplate => OperationCategory::Template,
            Self::DropIndex
            | Self::DropTrigger
            | Self::ProcessList
            | Self::VariableList
            | Self::StatusList
            | Self::Ping => OperationCategory::Maintenance,
        }
    }

    /// Fields that must be present and non-empty for this operation.
    ///
    /// Dialects may narrow or widen this through
    /// [`Dialect::required_fields`](crate::Dialect::required_fields).
    pub fn required_fields(&self) -> &'static [RequestField] {
        use RequestField::*;

        match self {
            Self::ShowDatabases | Self::ShowUsers => &[],
            Self::ShowSchemas
            | Self::ShowTables
            | Self::ShowViews
            | Self::ShowSystemViews
            | Self::ShowTriggers
            | Self::ShowProcedures
            | Self::ShowFunctions => &[Database],
            Self::ShowColumns | Self::ShowIndexes => &[Database, Table],
            Self::AddColumn | Self::UpdateColumn => &[Table, Column, ColumnType],
            Self::RenameColumn => &[Table, Column, NewName],
            Self::BuildPage | Self::Count => &[Table],
            Self::CreateDatabase | Self::TruncateDatabase => &[Database],
            Self::RenameTable => &[Table, NewName],
            Self::RenameView
            | Self::RenameProcedure
            | Self::RenameFunction
            | Self::RenameTrigger => &[Name, NewName],
            Self::ShowTableSource => &[Table],
            Self::ShowViewSource
            | Self::ShowProcedureSource
            | Self::ShowFunctionSource
            | Self::ShowTriggerSource => &[Name],
            Self::CreateUser => &[Name],
            Self::TableTemplate
            | Self::ViewTemplate
            | Self::ProcedureTemplate
            | Self::TriggerTemplate
            | Self::FunctionTemplate => &[],
            Self::DropIndex => &[Table, Name],
            Self::DropTrigger => &[Name],
            Self::ProcessList | Self::VariableList | Self::StatusList | Self::Ping => &[],
        }
    }

    /// Canonical kebab-case name
    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub fn is_template(&self) -> bool {
        self.category() == OperationCategory::Template
    }
}
