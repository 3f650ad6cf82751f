//! SSH tunnels: a backend with no statement language

use dbnav_core::{
    BackendKind, Capabilities, ColumnSpec, Dialect, DialectError, OperationRequest, QuoteStyle,
    Result, Statement,
};

const CAPABILITIES: Capabilities = Capabilities::nothing(
    "SSH connections only tunnel other backends; there is no statement language",
);

/// Dialect for SSH connections. Every operation is unsupported.
#[derive(Debug, Default)]
pub struct SshDialect;

impl SshDialect {
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for SshDialect {
    fn backend(&self) -> BackendKind {
        BackendKind::Ssh
    }

    fn capabilities(&self) -> &Capabilities {
        &CAPABILITIES
    }

    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::None
    }

    fn native_type(&self, column: &ColumnSpec) -> Result<String> {
        Err(DialectError::unsupported_type(&column.logical_type))
    }

    fn render(&self, request: &OperationRequest) -> Result<Statement> {
        Err(self.mismatch(request.operation()))
    }
}
