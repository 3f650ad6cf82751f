//! dbnav core - the dialect contract for the database navigator
//!
//! This crate defines what every backend dialect answers for:
//!
//! - `BackendKind` / `Operation` - the fixed backend and operation sets
//! - `OperationRequest` / `ColumnSpec` - generic parameters for one operation
//! - `Statement` / `StatementResult` - generated payloads, or `Unsupported`
//! - `Capabilities` - static per-dialect support tables
//! - `Dialect` / `DialectExt` - the contract and its convenience surface
//! - quoting, escaping, pagination and template helpers shared by dialects
//!
//! Generation is pure: no connections are opened and nothing is executed.

mod backend;
mod capability;
pub mod config;
mod dialect;
mod error;
pub mod escape;
mod filters;
mod operation;
mod pagination;
mod quoting;
mod request;
mod statement;
mod template;
mod types;

pub use backend::*;
pub use capability::*;
pub use config::GeneratorConfig;
pub use dialect::*;
pub use error::*;
pub use escape::{LiteralEscape, quote_literal};
pub use filters::SqlFilters;
pub use operation::*;
pub use pagination::*;
pub use quoting::*;
pub use request::*;
pub use statement::*;
pub use template::*;
pub use types::*;

#[cfg(test)]
mod quoting_tests;
#[cfg(test)]
mod request_tests;
#[cfg(test)]
mod types_tests;
