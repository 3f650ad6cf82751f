//! Generator configuration
//!
//! Dialects read their configuration once, at construction. The values
//! below are the embedded defaults; a user file only needs the keys it
//! overrides:
//!
//! ```toml
//! default_page_size = 50
//!
//! [postgres]
//! default_schema = "app"
//! ```

use serde::{Deserialize, Serialize};

use crate::{DialectError, Result};

/// The embedded default configuration file
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config/defaults.toml");

/// Top-level generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Rows per page when a request does not name one
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    #[serde(default)]
    pub mysql: MySqlConfig,
    #[serde(default)]
    pub postgres: PostgresConfig,
    #[serde(default)]
    pub mssql: MssqlConfig,
    #[serde(default)]
    pub elasticsearch: ElasticsearchConfig,
    #[serde(default)]
    pub redis: RedisConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MySqlConfig {
    #[serde(default = "default_charset")]
    pub charset: String,
    #[serde(default = "default_collation")]
    pub collation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostgresConfig {
    /// Schema used when a request names none
    #[serde(default = "default_postgres_schema")]
    pub default_schema: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MssqlConfig {
    #[serde(default = "default_mssql_schema")]
    pub default_schema: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElasticsearchConfig {
    /// Scroll context lifetime, in Elasticsearch time units (`30s`, `1m`)
    #[serde(default = "default_scroll_keep_alive")]
    pub scroll_keep_alive: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_scan_count")]
    pub scan_count: u64,
}

fn default_page_size() -> u64 {
    100
}

fn default_charset() -> String {
    "utf8mb4".to_string()
}

fn default_collation() -> String {
    "utf8mb4_general_ci".to_string()
}

fn default_postgres_schema() -> String {
    "public".to_string()
}

fn default_mssql_schema() -> String {
    "dbo".to_string()
}

fn default_scroll_keep_alive() -> String {
    "1m".to_string()
}

fn default_scan_count() -> u64 {
    100
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            mysql: MySqlConfig::default(),
            postgres: PostgresConfig::default(),
            mssql: MssqlConfig::default(),
            elasticsearch: ElasticsearchConfig::default(),
            redis: RedisConfig::default(),
        }
    }
}

impl Default for MySqlConfig {
    fn default() -> Self {
        Self {
            charset: default_charset(),
            collation: default_collation(),
        }
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            default_schema: default_postgres_schema(),
        }
    }
}

impl Default for MssqlConfig {
    fn default() -> Self {
        Self {
            default_schema: default_mssql_schema(),
        }
    }
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            scroll_keep_alive: default_scroll_keep_alive(),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            scan_count: default_scan_count(),
        }
    }
}

impl GeneratorConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| DialectError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// The embedded defaults, parsed
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(DEFAULT_CONFIG_TOML)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| DialectError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_page_size == 0 {
            return Err(DialectError::Config(
                "default_page_size must be greater than zero".to_string(),
            ));
        }
        if i64::try_from(self.default_page_size).is_err() {
            return Err(DialectError::Config(format!(
                "default_page_size {} is too large",
                self.default_page_size
            )));
        }
        self.mysql.validate()?;
        require_non_empty("postgres.default_schema", &self.postgres.default_schema)?;
        require_non_empty("mssql.default_schema", &self.mssql.default_schema)?;
        if !is_time_value(&self.elasticsearch.scroll_keep_alive) {
            return Err(DialectError::Config(format!(
                "elasticsearch.scroll_keep_alive '{}' is not a time value such as 30s or 1m",
                self.elasticsearch.scroll_keep_alive
            )));
        }
        if self.redis.scan_count == 0 {
            return Err(DialectError::Config(
                "redis.scan_count must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl MySqlConfig {
    /// Charset and collation must be plain names; they are spliced into DDL unquoted
    pub fn validate(&self) -> Result<()> {
        require_word("mysql.charset", &self.charset)?;
        require_word("mysql.collation", &self.collation)
    }
}

fn require_non_empty(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() || value.contains('\0') {
        return Err(DialectError::Config(format!("{key} must not be empty")));
    }
    Ok(())
}

fn require_word(key: &str, value: &str) -> Result<()> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DialectError::Config(format!(
            "{key} '{value}' must be a plain name of letters, digits and underscores"
        )));
    }
    Ok(())
}

fn is_time_value(value: &str) -> bool {
    const UNITS: [&str; 7] = ["nanos", "micros", "ms", "s", "m", "h", "d"];
    let digits = value.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && UNITS.contains(&&value[digits..])
}
