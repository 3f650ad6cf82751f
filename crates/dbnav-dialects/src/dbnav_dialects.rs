//! Backend dialects for dbnav
//!
//! One dialect per backend family, plus the registry that maps a
//! [`BackendKind`](dbnav_core::BackendKind) to its dialect. MariaDB shares the
//! MySQL dialect.

mod ansi;
mod elasticsearch;
mod mongodb;
mod mssql;
mod mysql;
mod postgres;
mod redis;
mod registry;
mod sqlite;
mod ssh;

#[cfg(test)]
mod elasticsearch_tests;
#[cfg(test)]
mod mongodb_tests;
#[cfg(test)]
mod mssql_tests;
#[cfg(test)]
mod mysql_tests;
#[cfg(test)]
mod postgres_tests;
#[cfg(test)]
mod redis_tests;
#[cfg(test)]
mod registry_tests;
#[cfg(test)]
mod sqlite_tests;

pub use elasticsearch::{ElasticsearchDialect, validate_index_name};
pub use mongodb::{MongoDbDialect, validate_collection_name, validate_database_name};
pub use mssql::MssqlDialect;
pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;
pub use redis::{RedisDialect, parse_database_index};
pub use registry::DialectRegistry;
pub use sqlite::SqliteDialect;
pub use ssh::SshDialect;
