//! Backend identity: the fixed set of data sources a navigator can connect to

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{DialectError, Result};

/// A backend kind, as carried by a connection descriptor.
///
/// Tags parse case-insensitively and accept the common aliases a
/// connection descriptor may use:
///
/// ```
/// use dbnav_core::BackendKind;
///
/// assert_eq!(BackendKind::from_tag("pg").unwrap(), BackendKind::PostgreSql);
/// assert_eq!(BackendKind::from_tag("SqlServer").unwrap(), BackendKind::SqlServer);
/// assert_eq!(BackendKind::MongoDb.to_string(), "mongodb");
/// ```
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
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum BackendKind {
    MySql,
    #[strum(to_string = "mariadb", serialize = "maria")]
    MariaDb,
    #[strum(to_string = "postgresql", serialize = "postgres", serialize = "pg")]
    PostgreSql,
    #[strum(to_string = "sqlite", serialize = "sqlite3")]
    Sqlite,
    #[strum(to_string = "sqlserver", serialize = "mssql")]
    SqlServer,
    #[strum(to_string = "elasticsearch", serialize = "es", serialize = "elastic")]
    ElasticSearch,
    #[strum(to_string = "mongodb", serialize = "mongo")]
    MongoDb,
    Redis,
    Ssh,
}

/// Coarse grouping of backends by statement language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BackendFamily {
    Relational,
    DocumentSearch,
    Document,
    KeyValue,
    Tunnel,
}

impl BackendKind {
    /// Parse a connection-descriptor tag, failing with `UnknownBackend`
    pub fn from_tag(tag: &str) -> Result<Self> {
        tag.trim().parse().map_err(|_| {
            tracing::warn!(tag = %tag, "unknown backend tag");
            DialectError::unknown_backend(tag)
        })
    }

    /// Canonical lowercase tag
    pub fn tag(&self) -> &'static str {
        self.into()
    }

    pub fn family(&self) -> BackendFamily {
        match self {
            Self::MySql | Self::MariaDb | Self::PostgreSql | Self::Sqlite | Self::SqlServer => {
                BackendFamily::Relational
            }
            Self::ElasticSearch => BackendFamily::DocumentSearch,
            Self::MongoDb => BackendFamily::Document,
            Self::Redis => BackendFamily::KeyValue,
            Self::Ssh => BackendFamily::Tunnel,
        }
    }

    /// Human-readable product name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MySql => "MySQL",
            Self::MariaDb => "MariaDB",
            Self::PostgreSql => "PostgreSQL",
            Self::Sqlite => "SQLite",
            Self::SqlServer => "SQL Server",
            Self::ElasticSearch => "Elasticsearch",
            Self::MongoDb => "MongoDB",
            Self::Redis => "Redis",
            Self::Ssh => "SSH",
        }
    }

    pub fn is_relational(&self) -> bool {
        self.family() == BackendFamily::Relational
    }
}
