//! Contract tests run against every registered dialect
//!
//! Each dialect must agree with its own capability table: a supported
//! operation generates a statement for a fully populated request, an
//! unsupported one reports a reason, and neither path ever hits a
//! capability mismatch.

use anyhow::{Context, Result};
use dbnav_core::{
    BackendKind, ColumnSpec, Dialect, DialectError, DialectExt, Operation, OperationRequest,
    QuoteStyle, RequestField, StatementResult,
};
use dbnav_dialects::DialectRegistry;
use rstest::{fixture, rstest};
use std::sync::Arc;
use strum::IntoEnumIterator;

#[fixture]
fn registry() -> DialectRegistry {
    DialectRegistry::with_defaults()
}

fn dialect(registry: &DialectRegistry, kind: BackendKind) -> Result<Arc<dyn Dialect>> {
    registry
        .resolve(kind)
        .with_context(|| format!("no dialect for {kind}"))
}

/// A request carrying every field any dialect might require
fn populated(kind: BackendKind, operation: Operation) -> OperationRequest {
    let database = match kind {
        BackendKind::Redis => "0",
        _ => "shop",
    };
    OperationRequest::new(operation)
        .with_database(database)
        .with_schema("sales")
        .with_table("orders")
        .with_name("report")
        .with_new_name("report_v2")
        .with_column(ColumnSpec::new("total", "integer"))
        .with_page_size(20)
        .with_page_index(0)
        .with_password("s3cret")
}

#[rstest]
#[case::mysql(BackendKind::MySql)]
#[case::mariadb(BackendKind::MariaDb)]
#[case::postgres(BackendKind::PostgreSql)]
#[case::sqlite(BackendKind::Sqlite)]
#[case::sqlserver(BackendKind::SqlServer)]
#[case::elasticsearch(BackendKind::ElasticSearch)]
#[case::mongodb(BackendKind::MongoDb)]
#[case::redis(BackendKind::Redis)]
#[case::ssh(BackendKind::Ssh)]
fn test_generate_agrees_with_capabilities(
    registry: DialectRegistry,
    #[case] kind: BackendKind,
) -> Result<()> {
    let dialect = dialect(&registry, kind)?;
    assert_eq!(dialect.backend(), kind);

    for operation in Operation::iter() {
        let request = populated(kind, operation);
        let result = dialect
            .generate(&request)
            .with_context(|| format!("{kind} failed to generate {operation}"))?;

        if dialect.supports(operation) {
            assert!(result.is_generated(), "{kind} {operation}: {result:?}");
        } else {
            let reason = result.unsupported_reason().unwrap_or_default();
            assert!(!reason.is_empty(), "{kind} {operation} has no reason");
            assert_eq!(
                Some(reason),
                dialect.capabilities().unsupported_reason(operation),
            );
        }
    }
    Ok(())
}

#[rstest]
#[case::mysql(BackendKind::MySql)]
#[case::postgres(BackendKind::PostgreSql)]
#[case::sqlite(BackendKind::Sqlite)]
#[case::sqlserver(BackendKind::SqlServer)]
#[case::elasticsearch(BackendKind::ElasticSearch)]
#[case::mongodb(BackendKind::MongoDb)]
#[case::redis(BackendKind::Redis)]
fn test_generation_is_deterministic(
    registry: DialectRegistry,
    #[case] kind: BackendKind,
) -> Result<()> {
    let dialect = dialect(&registry, kind)?;
    for operation in dialect.capabilities().supported() {
        let request = populated(kind, operation);
        assert_eq!(dialect.generate(&request)?, dialect.generate(&request)?);
    }
    Ok(())
}

#[rstest]
#[case::mysql(BackendKind::MySql)]
#[case::sqlite(BackendKind::Sqlite)]
#[case::sqlserver(BackendKind::SqlServer)]
fn test_unsupported_skips_validation(
    registry: DialectRegistry,
    #[case] kind: BackendKind,
) -> Result<()> {
    let dialect = dialect(&registry, kind)?;
    for (operation, _) in dialect.capabilities().unsupported() {
        // an empty request would fail validation for most operations
        let result = dialect.generate(&OperationRequest::new(operation))?;
        assert!(result.is_unsupported());
    }
    Ok(())
}

#[rstest]
fn test_quoting_round_trips(
    registry: DialectRegistry,
    #[values("users", "odd`name", "odd\"name", "odd]name", "[x]", "", "émoji 🎉")] ident: &str,
) -> Result<()> {
    for kind in registry.kinds() {
        let dialect = dialect(&registry, kind)?;
        let quoted = dialect.quote_identifier(ident);
        assert_eq!(
            dialect.unquote_identifier(&quoted).as_deref(),
            Some(ident),
            "{kind} {quoted}"
        );
    }
    Ok(())
}

#[rstest]
#[case::mysql(BackendKind::MySql, QuoteStyle::Backtick)]
#[case::mariadb(BackendKind::MariaDb, QuoteStyle::Backtick)]
#[case::postgres(BackendKind::PostgreSql, QuoteStyle::DoubleQuote)]
#[case::sqlite(BackendKind::Sqlite, QuoteStyle::DoubleQuote)]
#[case::sqlserver(BackendKind::SqlServer, QuoteStyle::Bracket)]
#[case::elasticsearch(BackendKind::ElasticSearch, QuoteStyle::None)]
fn test_quote_styles(
    registry: DialectRegistry,
    #[case] kind: BackendKind,
    #[case] style: QuoteStyle,
) -> Result<()> {
    assert_eq!(dialect(&registry, kind)?.quote_style(), style);
    Ok(())
}

#[rstest]
fn test_mysql_second_page(registry: DialectRegistry) -> Result<()> {
    let result = registry
        .resolve_tag("mysql")?
        .build_page("shop", "orders", 20, 2)?;
    assert_eq!(
        result.sql(),
        Some("SELECT * FROM `shop`.`orders` LIMIT 20 OFFSET 40")
    );
    Ok(())
}

#[rstest]
fn test_elasticsearch_triggers_unsupported(registry: DialectRegistry) -> Result<()> {
    let result = registry
        .resolve(BackendKind::ElasticSearch)?
        .show_triggers("logs")?;
    assert_eq!(
        result,
        StatementResult::unsupported(Operation::ShowTriggers, "no trigger concept")
    );
    Ok(())
}

#[rstest]
#[case::mysql(BackendKind::MySql)]
#[case::postgres(BackendKind::PostgreSql)]
#[case::sqlite(BackendKind::Sqlite)]
#[case::sqlserver(BackendKind::SqlServer)]
fn test_unknown_logical_type(registry: DialectRegistry, #[case] kind: BackendKind) -> Result<()> {
    let err = dialect(&registry, kind)?
        .add_column("orders", ColumnSpec::new("price", "currency"))
        .unwrap_err();
    assert!(
        matches!(&err, DialectError::UnsupportedType { logical_type } if logical_type == "currency"),
        "{err}"
    );
    Ok(())
}

#[rstest]
fn test_unknown_backend_tag(registry: DialectRegistry) {
    let err = registry.resolve_tag("db2").unwrap_err();
    assert!(matches!(err, DialectError::UnknownBackend { tag } if tag == "db2"));
}

#[rstest]
#[case::negative_size(-1, 0)]
#[case::zero_size(0, 0)]
#[case::negative_index(10, -1)]
fn test_invalid_paging_rejected(
    registry: DialectRegistry,
    #[case] page_size: i64,
    #[case] page_index: i64,
) -> Result<()> {
    for kind in registry.kinds() {
        let dialect = dialect(&registry, kind)?;
        if !dialect.supports(Operation::BuildPage) {
            continue;
        }
        let request = populated(kind, Operation::BuildPage)
            .with_page_size(page_size)
            .with_page_index(page_index);
        let err = dialect.generate(&request).unwrap_err();
        assert!(
            matches!(err, DialectError::InvalidRequest { .. }),
            "{kind}: {err}"
        );
    }
    Ok(())
}

#[rstest]
fn test_blank_names_rejected(
    registry: DialectRegistry,
    #[values(
        BackendKind::MySql,
        BackendKind::MariaDb,
        BackendKind::PostgreSql,
        BackendKind::Sqlite,
        BackendKind::SqlServer
    )]
    kind: BackendKind,
    #[values("", "  ")] blank: &str,
) -> Result<()> {
    let dialect = dialect(&registry, kind)?;

    let err = dialect.build_page(blank, "orders", 20, 2).unwrap_err();
    assert_eq!(err.invalid_field(), Some(RequestField::Database), "{kind}");

    let err = dialect.count_sql(blank, "orders").unwrap_err();
    assert_eq!(err.invalid_field(), Some(RequestField::Database), "{kind}");

    let request = OperationRequest::new(Operation::BuildPage)
        .with_schema(blank)
        .with_table("orders");
    let err = dialect.generate(&request).unwrap_err();
    assert_eq!(err.invalid_field(), Some(RequestField::Schema), "{kind}");
    Ok(())
}
