//! Dialect registry for resolving backends to their dialects

use std::collections::HashMap;
use std::sync::Arc;

use dbnav_core::{BackendKind, Dialect, DialectError, GeneratorConfig, Result};
use strum::IntoEnumIterator;

use crate::{
    ElasticsearchDialect, MongoDbDialect, MssqlDialect, MySqlDialect, PostgresDialect,
    RedisDialect, SqliteDialect, SshDialect,
};

/// Registry of dialects keyed by backend.
///
/// Built once, then only read; lookups can be shared across threads.
pub struct DialectRegistry {
    dialects: HashMap<BackendKind, Arc<dyn Dialect>>,
}

impl DialectRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            dialects: HashMap::new(),
        }
    }

    /// Create a registry with every built-in dialect and default settings
    pub fn with_defaults() -> Self {
        Self::builtins(&GeneratorConfig::default())
    }

    /// Create a registry with every built-in dialect, configured from `config`.
    ///
    /// Fails with [`DialectError::Config`] if `config` does not validate.
    pub fn with_config(config: &GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::builtins(config))
    }

    fn builtins(config: &GeneratorConfig) -> Self {
        let mut registry = Self::new();
        for kind in BackendKind::iter() {
            registry.register(kind, builtin(kind, config));
        }
        registry
    }

    /// Register a dialect, replacing any previous one for the same backend
    pub fn register(&mut self, kind: BackendKind, dialect: Arc<dyn Dialect>) {
        tracing::info!(backend = %kind, dialect = dialect.name(), "registering dialect");
        self.dialects.insert(kind, dialect);
    }

    pub fn resolve(&self, kind: BackendKind) -> Result<Arc<dyn Dialect>> {
        match self.dialects.get(&kind) {
            Some(dialect) => {
                tracing::debug!(backend = %kind, "resolved dialect");
                Ok(Arc::clone(dialect))
            }
            None => {
                tracing::warn!(backend = %kind, "dialect not found in registry");
                Err(DialectError::unknown_backend(kind.tag()))
            }
        }
    }

    /// Resolve a backend by its tag or one of its aliases
    pub fn resolve_tag(&self, tag: &str) -> Result<Arc<dyn Dialect>> {
        self.resolve(BackendKind::from_tag(tag)?)
    }

    /// Registered backends in declaration order
    pub fn kinds(&self) -> Vec<BackendKind> {
        BackendKind::iter()
            .filter(|kind| self.dialects.contains_key(kind))
            .collect()
    }

    pub fn has(&self, kind: BackendKind) -> bool {
        self.dialects.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.dialects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialects.is_empty()
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for DialectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialectRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

fn builtin(kind: BackendKind, config: &GeneratorConfig) -> Arc<dyn Dialect> {
    match kind {
        BackendKind::MySql => Arc::new(MySqlDialect::new(config)),
        BackendKind::MariaDb => Arc::new(MySqlDialect::mariadb(config)),
        BackendKind::PostgreSql => Arc::new(PostgresDialect::new(config)),
        BackendKind::Sqlite => Arc::new(SqliteDialect::new(config)),
        BackendKind::SqlServer => Arc::new(MssqlDialect::new(config)),
        BackendKind::ElasticSearch => Arc::new(ElasticsearchDialect::new(config)),
        BackendKind::MongoDb => Arc::new(MongoDbDialect::new(config)),
        BackendKind::Redis => Arc::new(RedisDialect::new(config)),
        BackendKind::Ssh => Arc::new(SshDialect::new()),
    }
}
