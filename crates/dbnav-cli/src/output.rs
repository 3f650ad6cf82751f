//! Terminal output formatting

use anyhow::Result;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use dbnav_core::{BackendKind, Dialect, Operation, StatementResult};
use dbnav_dialects::DialectRegistry;
use strum::IntoEnumIterator;

use crate::args::OutputFormat;

const SUPPORTED: &str = "✓";
const UNSUPPORTED: &str = "–";

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn backends_table(registry: &DialectRegistry) -> Result<Table> {
    let mut table = table();
    table.set_header(vec!["Tag", "Backend", "Family", "Supported operations"]);
    for kind in registry.kinds() {
        let dialect = registry.resolve(kind)?;
        table.add_row(vec![
            kind.tag().to_string(),
            kind.display_name().to_string(),
            kind.family().to_string(),
            format!(
                "{}/{}",
                dialect.capabilities().supported().count(),
                Operation::iter().count()
            ),
        ]);
    }
    Ok(table)
}

/// Operations down, backends across
pub fn capability_matrix(registry: &DialectRegistry) -> Result<Table> {
    let kinds: Vec<BackendKind> = registry.kinds();
    let dialects = kinds
        .iter()
        .map(|kind| registry.resolve(*kind))
        .collect::<dbnav_core::Result<Vec<_>>>()?;

    let mut table = table();
    let mut header = vec!["Operation".to_string()];
    header.extend(kinds.iter().map(|kind| kind.tag().to_string()));
    table.set_header(header);

    for operation in Operation::iter() {
        let mut row = vec![operation.name().to_string()];
        row.extend(dialects.iter().map(|dialect| {
            if dialect.supports(operation) {
                SUPPORTED.to_string()
            } else {
                UNSUPPORTED.to_string()
            }
        }));
        table.add_row(row);
    }
    Ok(table)
}

/// One backend's operations, with the reason for each unsupported one
pub fn capability_list(dialect: &dyn Dialect) -> Table {
    let mut table = table();
    table.set_header(vec!["Operation", "Category", "Supported", "Reason"]);
    for operation in Operation::iter() {
        let reason = dialect.capabilities().unsupported_reason(operation);
        table.add_row(vec![
            operation.name().to_string(),
            operation.category().to_string(),
            if reason.is_none() { SUPPORTED } else { UNSUPPORTED }.to_string(),
            reason.unwrap_or_default().to_string(),
        ]);
    }
    table
}

/// Text for stdout. Unsupported results render as an explanation in text mode.
pub fn format_result(result: &StatementResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Text => Ok(match result {
            StatementResult::Generated(statement) => statement.to_string(),
            StatementResult::Unsupported { operation, reason } => {
                format!("{operation} is not supported: {reason}")
            }
        }),
    }
}
