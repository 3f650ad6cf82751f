//! Logical column types and column specifications

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

use crate::{DialectError, Result};

/// Default length applied to `String` columns without an explicit length
pub const DEFAULT_STRING_LENGTH: u32 = 255;
/// Default precision and scale applied to `Decimal` columns
pub const DEFAULT_DECIMAL_PRECISION: u32 = 10;
pub const DEFAULT_DECIMAL_SCALE: u32 = 2;

/// Backend-neutral column type, mapped to a native keyword by each dialect
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LogicalType {
    String,
    Text,
    Integer,
    BigInt,
    SmallInt,
    Decimal,
    Float,
    Double,
    Boolean,
    Date,
    Time,
    DateTime,
    Timestamp,
    Blob,
    Json,
    Uuid,
}

impl LogicalType {
    /// Parse a logical type name, accepting common aliases.
    ///
    /// ```
    /// use dbnav_core::LogicalType;
    ///
    /// assert_eq!(LogicalType::parse("VARCHAR").unwrap(), LogicalType::String);
    /// assert_eq!(LogicalType::parse("bool").unwrap(), LogicalType::Boolean);
    /// assert!(LogicalType::parse("currency").is_err());
    /// ```
    pub fn parse(name: &str) -> Result<Self> {
        let ty = match name.trim().to_ascii_lowercase().as_str() {
            "string" | "varchar" | "char" | "keyword" => Self::String,
            "text" | "clob" | "longtext" => Self::Text,
            "integer" | "int" | "int4" => Self::Integer,
            "bigint" | "big_int" | "long" | "int8" => Self::BigInt,
            "smallint" | "small_int" | "short" | "int2" => Self::SmallInt,
            "decimal" | "numeric" => Self::Decimal,
            "float" | "real" | "float4" => Self::Float,
            "double" | "float8" => Self::Double,
            "boolean" | "bool" | "bit" => Self::Boolean,
            "date" => Self::Date,
            "time" => Self::Time,
            "datetime" | "date_time" => Self::DateTime,
            "timestamp" | "timestamptz" => Self::Timestamp,
            "blob" | "binary" | "bytes" | "bytea" => Self::Blob,
            "json" | "jsonb" | "object" => Self::Json,
            "uuid" | "guid" => Self::Uuid,
            _ => return Err(DialectError::unsupported_type(name)),
        };
        Ok(ty)
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Whether a length modifier applies
    pub fn takes_length(&self) -> bool {
        matches!(self, Self::String)
    }

    /// Whether precision/scale modifiers apply
    pub fn takes_precision(&self) -> bool {
        matches!(self, Self::Decimal)
    }
}

/// A column definition carried by column DDL requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    /// Free-form logical type name, resolved through [`LogicalType::parse`]
    pub logical_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Default value, rendered as a string literal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

fn default_nullable() -> bool {
    true
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, logical_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            logical_type: logical_type.into(),
            length: None,
            scale: None,
            nullable: true,
            default: None,
            comment: None,
        }
    }

    /// Length for strings, precision for decimals
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Resolve the logical type name
    pub fn resolved_type(&self) -> Result<LogicalType> {
        LogicalType::parse(&self.logical_type)
    }

    pub fn string_length(&self) -> u32 {
        self.length.unwrap_or(DEFAULT_STRING_LENGTH)
    }

    /// Precision and scale for decimal types
    pub fn precision(&self) -> (u32, u32) {
        (
            self.length.unwrap_or(DEFAULT_DECIMAL_PRECISION),
            self.scale.unwrap_or(DEFAULT_DECIMAL_SCALE),
        )
    }
}
